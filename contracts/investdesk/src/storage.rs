use soroban_sdk::{Address, Env, IntoVal, String, Symbol, TryFromVal, Val, Vec};

use crate::types::{
    DataKey, Deposit, Gateway, HistoryKind, Invest, MailTemplate, PlatformTotals, Schema,
    Settings, Ticket, TicketMessage, Transaction, User, Withdrawal,
};
use crate::MAX_PAGE_SIZE;

const INSTANCE_TTL_THRESHOLD: u32 = 100;
const INSTANCE_TTL_EXTEND: u32 = 500;
const PERSISTENT_TTL_THRESHOLD: u32 = 100;
const PERSISTENT_TTL_EXTEND: u32 = 1000;

// --- Admin ---

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    extend_instance_ttl(env);
}

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn is_staff(env: &Env, addr: &Address) -> bool {
    read(env, &DataKey::Staff(addr.clone())).unwrap_or(false)
}

pub fn set_staff(env: &Env, addr: &Address, enabled: bool) {
    let key = DataKey::Staff(addr.clone());
    if enabled {
        write(env, &key, &true);
    } else {
        env.storage().persistent().remove(&key);
    }
}

// --- Settings / Totals ---

pub fn get_settings(env: &Env) -> Option<Settings> {
    env.storage().instance().get(&DataKey::Settings)
}

pub fn set_settings(env: &Env, settings: &Settings) {
    env.storage().instance().set(&DataKey::Settings, settings);
    extend_instance_ttl(env);
}

pub fn get_totals(env: &Env) -> PlatformTotals {
    env.storage()
        .instance()
        .get(&DataKey::Totals)
        .unwrap_or_default()
}

pub fn set_totals(env: &Env, totals: &PlatformTotals) {
    env.storage().instance().set(&DataKey::Totals, totals);
    extend_instance_ttl(env);
}

// --- Counters ---

pub fn get_counter(env: &Env, key: &DataKey) -> u64 {
    env.storage().instance().get(key).unwrap_or(0)
}

/// Increments the counter under `key` and returns the new value.
pub fn next_id(env: &Env, key: &DataKey) -> u64 {
    let id = get_counter(env, key) + 1;
    env.storage().instance().set(key, &id);
    extend_instance_ttl(env);
    id
}

// --- Users ---

pub fn get_user(env: &Env, addr: &Address) -> Option<User> {
    read(env, &DataKey::User(addr.clone()))
}

pub fn set_user(env: &Env, user: &User) {
    write(env, &DataKey::User(user.address.clone()), user);
}

pub fn has_user(env: &Env, addr: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::User(addr.clone()))
}

pub fn get_user_at(env: &Env, index: u64) -> Option<Address> {
    read(env, &DataKey::UserAt(index))
}

pub fn set_user_at(env: &Env, index: u64, addr: &Address) {
    write(env, &DataKey::UserAt(index), addr);
}

// --- Per-user history ---

pub fn history_len(env: &Env, user: &Address, kind: HistoryKind) -> u32 {
    read(env, &DataKey::HistoryLen(user.clone(), kind)).unwrap_or(0)
}

/// Appends `id` under its own key so the write cost does not grow with
/// the history.
pub fn push_history(env: &Env, user: &Address, kind: HistoryKind, id: u64) {
    let len = history_len(env, user, kind);
    write(env, &DataKey::HistoryEntry(user.clone(), kind, len), &id);
    write(env, &DataKey::HistoryLen(user.clone(), kind), &(len + 1));
}

/// Ids at positions `start..start + limit` (0-based), capped at
/// `MAX_PAGE_SIZE`.
pub fn history_page(
    env: &Env,
    user: &Address,
    kind: HistoryKind,
    start: u32,
    limit: u32,
) -> Vec<u64> {
    let end = start
        .saturating_add(limit.min(MAX_PAGE_SIZE))
        .min(history_len(env, user, kind));
    let mut ids = Vec::new(env);
    for index in start..end {
        if let Some(id) = read(env, &DataKey::HistoryEntry(user.clone(), kind, index)) {
            ids.push_back(id);
        }
    }
    ids
}

// --- Ledger ---

pub fn get_txn(env: &Env, id: u64) -> Option<Transaction> {
    read(env, &DataKey::Txn(id))
}

pub fn set_txn(env: &Env, txn: &Transaction) {
    write(env, &DataKey::Txn(txn.id), txn);
}

pub fn is_reference_used(env: &Env, reference: &String) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::UsedRef(reference.clone()))
}

pub fn mark_reference_used(env: &Env, reference: &String) {
    write(env, &DataKey::UsedRef(reference.clone()), &true);
}

// --- Gateways ---

pub fn get_gateway(env: &Env, id: u64) -> Option<Gateway> {
    read(env, &DataKey::Gateway(id))
}

pub fn set_gateway(env: &Env, gateway: &Gateway) {
    write(env, &DataKey::Gateway(gateway.id), gateway);
}

// --- Deposits / Withdrawals ---

pub fn get_deposit(env: &Env, id: u64) -> Option<Deposit> {
    read(env, &DataKey::Deposit(id))
}

pub fn set_deposit(env: &Env, deposit: &Deposit) {
    write(env, &DataKey::Deposit(deposit.id), deposit);
}

pub fn get_withdrawal(env: &Env, id: u64) -> Option<Withdrawal> {
    read(env, &DataKey::Withdrawal(id))
}

pub fn set_withdrawal(env: &Env, withdrawal: &Withdrawal) {
    write(env, &DataKey::Withdrawal(withdrawal.id), withdrawal);
}

// --- Schemas / Invests ---

pub fn get_schema(env: &Env, id: u64) -> Option<Schema> {
    read(env, &DataKey::Schema(id))
}

pub fn set_schema(env: &Env, schema: &Schema) {
    write(env, &DataKey::Schema(schema.id), schema);
}

pub fn get_invest(env: &Env, id: u64) -> Option<Invest> {
    read(env, &DataKey::Invest(id))
}

pub fn set_invest(env: &Env, invest: &Invest) {
    write(env, &DataKey::Invest(invest.id), invest);
}

// --- Templates ---

pub fn get_template(env: &Env, code: &Symbol) -> Option<MailTemplate> {
    read(env, &DataKey::Template(code.clone()))
}

pub fn set_template(env: &Env, template: &MailTemplate) {
    write(env, &DataKey::Template(template.code.clone()), template);
}

pub fn get_template_codes(env: &Env) -> Vec<Symbol> {
    read(env, &DataKey::TemplateCodes).unwrap_or(Vec::new(env))
}

pub fn set_template_codes(env: &Env, codes: &Vec<Symbol>) {
    write(env, &DataKey::TemplateCodes, codes);
}

// --- Tickets ---

pub fn get_ticket(env: &Env, id: u64) -> Option<Ticket> {
    read(env, &DataKey::Ticket(id))
}

pub fn set_ticket(env: &Env, ticket: &Ticket) {
    write(env, &DataKey::Ticket(ticket.id), ticket);
}

pub fn get_ticket_message(env: &Env, ticket_id: u64, index: u32) -> Option<TicketMessage> {
    read(env, &DataKey::TicketMessage(ticket_id, index))
}

pub fn set_ticket_message(env: &Env, ticket_id: u64, index: u32, message: &TicketMessage) {
    write(env, &DataKey::TicketMessage(ticket_id, index), message);
}

// --- Id lists (pending queues, small indexes) ---

pub fn get_ids(env: &Env, key: &DataKey) -> Vec<u64> {
    read(env, key).unwrap_or(Vec::new(env))
}

pub fn push_id(env: &Env, key: &DataKey, id: u64) {
    let mut ids = get_ids(env, key);
    ids.push_back(id);
    write(env, key, &ids);
}

pub fn remove_id(env: &Env, key: &DataKey, id: u64) {
    let ids = get_ids(env, key);
    let mut kept = Vec::new(env);
    for i in ids.iter() {
        if i != id {
            kept.push_back(i);
        }
    }
    write(env, key, &kept);
}

// --- Persistent helpers ---

fn read<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: TryFromVal<Env, Val>,
    V::Error: core::fmt::Debug,
{
    let result = env.storage().persistent().get(key);
    if result.is_some() {
        extend_persistent_ttl(env, key);
    }
    result
}

fn write<V: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &V) {
    env.storage().persistent().set(key, value);
    extend_persistent_ttl(env, key);
}

// --- TTL Management ---

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}
