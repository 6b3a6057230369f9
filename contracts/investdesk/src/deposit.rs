use soroban_sdk::{log, token, Address, Env, String, Vec};

use crate::admin;
use crate::errors::ContractError;
use crate::gateway;
use crate::ledger::{self, Entry};
use crate::storage;
use crate::template;
use crate::types::{
    DataKey, Deposit, GatewayKind, GatewayPurpose, HistoryKind, RequestStatus, TxnKind,
    UserStatus, Wallet,
};
use crate::user;
use crate::MAX_PAGE_SIZE;

/// Creates a deposit request. Automatic gateways pull the tokens and
/// credit the user in the same call; manual gateways queue the request
/// for an admin unless the gateway auto-approves.
pub fn deposit(
    env: &Env,
    user: Address,
    gateway_id: u64,
    amount: i128,
    reference: Option<String>,
) -> Result<u64, ContractError> {
    user.require_auth();
    admin::require_feature(env, |s| s.deposit_enabled)?;
    user::require_active(env, &user)?;

    let gateway = gateway::load_for(env, gateway_id, GatewayPurpose::Deposit, amount)?;
    let charge = gateway::charge_for(&gateway.config, amount)?;
    let total = amount.checked_add(charge).ok_or(ContractError::Overflow)?;
    let pay_amount = gateway::convert(&gateway.config, total)?;
    if pay_amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }

    if let Some(reference) = &reference {
        ledger::claim_reference(env, reference)?;
    }

    let id = storage::next_id(env, &DataKey::DepositCounter);
    let deposit = Deposit {
        id,
        user: user.clone(),
        gateway_id,
        amount,
        charge,
        pay_amount,
        reference,
        status: RequestStatus::Pending,
        note: String::from_str(env, ""),
        created_at: env.ledger().timestamp(),
        processed_at: 0,
    };
    storage::set_deposit(env, &deposit);
    storage::push_history(env, &user, HistoryKind::Deposits, id);

    env.events()
        .publish((crate::symbol_short!("dep_new"), user.clone()), (id, amount, pay_amount));

    let config = gateway.config;
    match config.kind {
        GatewayKind::Automatic(asset) => {
            token::Client::new(env, &asset).transfer(
                &user,
                &env.current_contract_address(),
                &pay_amount,
            );
            settle(env, deposit, config.name, TxnKind::Deposit)?;
        }
        GatewayKind::Manual if config.auto_approve => {
            settle(env, deposit, config.name, TxnKind::ManualDeposit)?;
        }
        GatewayKind::Manual => {
            storage::push_id(env, &DataKey::PendingDeposits, id);
        }
    }

    Ok(id)
}

pub fn approve_deposit(env: &Env, caller: Address, id: u64) -> Result<(), ContractError> {
    admin::require_admin(env, &caller)?;
    approve_pending(env, id)
}

pub fn reject_deposit(
    env: &Env,
    caller: Address,
    id: u64,
    reason: String,
) -> Result<(), ContractError> {
    admin::require_admin(env, &caller)?;

    let mut deposit = load_pending(env, id)?;
    deposit.status = RequestStatus::Rejected;
    deposit.note = reason;
    deposit.processed_at = env.ledger().timestamp();
    storage::set_deposit(env, &deposit);
    storage::remove_id(env, &DataKey::PendingDeposits, id);

    env.events()
        .publish((crate::symbol_short!("dep_rej"), deposit.user.clone()), id);
    template::notify(env, crate::symbol_short!("dep_rej"), &deposit.user);

    Ok(())
}

/// Approves up to `limit` queued deposits, oldest first. Deposits of
/// banned users stay in the queue. Returns how many were approved.
pub fn approve_pending_deposits(env: &Env, caller: Address, limit: u32) -> Result<u32, ContractError> {
    admin::require_admin(env, &caller)?;

    let limit = limit.min(MAX_PAGE_SIZE);
    let mut approved = 0u32;
    for id in storage::get_ids(env, &DataKey::PendingDeposits).iter() {
        if approved >= limit {
            break;
        }
        let Some(deposit) = storage::get_deposit(env, id) else {
            continue;
        };
        match storage::get_user(env, &deposit.user) {
            Some(u) if u.status == UserStatus::Active => {}
            _ => {
                log!(env, "deposit held", id);
                continue;
            }
        }
        approve_pending(env, id)?;
        approved += 1;
    }

    Ok(approved)
}

pub fn get_deposit(env: &Env, id: u64) -> Result<Deposit, ContractError> {
    storage::get_deposit(env, id).ok_or(ContractError::DepositNotFound)
}

pub fn get_pending_deposits(env: &Env) -> Vec<Deposit> {
    collect(env, storage::get_ids(env, &DataKey::PendingDeposits))
}

pub fn get_user_deposits(env: &Env, user: Address, start: u32, limit: u32) -> Vec<Deposit> {
    collect(
        env,
        storage::history_page(env, &user, HistoryKind::Deposits, start, limit),
    )
}

fn approve_pending(env: &Env, id: u64) -> Result<(), ContractError> {
    let deposit = load_pending(env, id)?;
    let method = gateway::get_gateway(env, deposit.gateway_id)?.config.name;
    storage::remove_id(env, &DataKey::PendingDeposits, id);
    settle(env, deposit, method, TxnKind::ManualDeposit)
}

fn load_pending(env: &Env, id: u64) -> Result<Deposit, ContractError> {
    let deposit = get_deposit(env, id)?;
    if deposit.status != RequestStatus::Pending {
        return Err(ContractError::NotPending);
    }
    Ok(deposit)
}

/// Marks the deposit approved and credits the main wallet.
fn settle(env: &Env, mut deposit: Deposit, method: String, kind: TxnKind) -> Result<(), ContractError> {
    deposit.status = RequestStatus::Approved;
    deposit.processed_at = env.ledger().timestamp();
    storage::set_deposit(env, &deposit);

    let entry = Entry::new(env, kind, "", deposit.id)
        .with_charge(deposit.charge)
        .with_method(method);
    ledger::credit(env, &deposit.user, Wallet::Main, deposit.amount, entry)?;

    env.events().publish(
        (crate::symbol_short!("dep_appr"), deposit.user.clone()),
        (deposit.id, deposit.amount),
    );
    template::notify(env, crate::symbol_short!("dep_appr"), &deposit.user);

    Ok(())
}

fn collect(env: &Env, ids: Vec<u64>) -> Vec<Deposit> {
    let mut out = Vec::new(env);
    for id in ids.iter() {
        if let Some(deposit) = storage::get_deposit(env, id) {
            out.push_back(deposit);
        }
    }
    out
}
