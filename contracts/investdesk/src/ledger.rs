//! Every balance change on the platform goes through this module.
//!
//! `credit` and `debit` update one wallet of one user with checked
//! arithmetic and append a `Transaction` recording the resulting balance.
//! Entries are never rewritten: a reversal is a new entry of its own.
//! Since a contract invocation is atomic, a later error in the caller
//! discards both the balance change and its entry.

use soroban_sdk::{Address, Env, String, Vec};

use crate::errors::ContractError;
use crate::storage;
use crate::types::{DataKey, HistoryKind, PlatformTotals, Transaction, TxnKind, User, Wallet};
use crate::MAX_PAGE_SIZE;

/// Descriptive fields of a ledger entry.
pub struct Entry {
    pub kind: TxnKind,
    pub charge: i128,
    pub method: String,
    pub note: String,
    pub related_id: u64,
}

impl Entry {
    pub fn new(env: &Env, kind: TxnKind, method: &str, related_id: u64) -> Self {
        Entry {
            kind,
            charge: 0,
            method: String::from_str(env, method),
            note: String::from_str(env, ""),
            related_id,
        }
    }

    pub fn with_charge(mut self, charge: i128) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.note = note;
        self
    }

    pub fn with_method(mut self, method: String) -> Self {
        self.method = method;
        self
    }
}

pub fn credit(
    env: &Env,
    addr: &Address,
    wallet: Wallet,
    amount: i128,
    entry: Entry,
) -> Result<u64, ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    let mut user = storage::get_user(env, addr).ok_or(ContractError::UserNotFound)?;

    let balance = wallet_balance(&mut user, wallet);
    *balance = balance.checked_add(amount).ok_or(ContractError::Overflow)?;
    let balance_after = *balance;

    apply_totals(&mut user, entry.kind, amount)?;
    storage::set_user(env, &user);

    append(env, addr, wallet, amount, balance_after, entry)
}

pub fn debit(
    env: &Env,
    addr: &Address,
    wallet: Wallet,
    amount: i128,
    entry: Entry,
) -> Result<u64, ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    let mut user = storage::get_user(env, addr).ok_or(ContractError::UserNotFound)?;

    let balance = wallet_balance(&mut user, wallet);
    if *balance < amount {
        return Err(ContractError::InsufficientBalance);
    }
    *balance -= amount;
    let balance_after = *balance;

    apply_totals(&mut user, entry.kind, amount)?;
    storage::set_user(env, &user);

    append(env, addr, wallet, amount, balance_after, entry)
}

/// Records a payout that left the platform. The balance was already
/// debited when the withdrawal was requested.
pub fn settle_withdrawal(env: &Env, addr: &Address, amount: i128) -> Result<(), ContractError> {
    let mut user = storage::get_user(env, addr).ok_or(ContractError::UserNotFound)?;
    user.total_withdraw = user
        .total_withdraw
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;
    storage::set_user(env, &user);

    let mut totals = storage::get_totals(env);
    totals.total_withdrawn = totals
        .total_withdrawn
        .checked_add(amount)
        .ok_or(ContractError::Overflow)?;
    storage::set_totals(env, &totals);
    Ok(())
}

/// Claims an external reference so it cannot be booked twice.
pub fn claim_reference(env: &Env, reference: &String) -> Result<(), ContractError> {
    if reference.len() == 0 {
        return Err(ContractError::InvalidReference);
    }
    if storage::is_reference_used(env, reference) {
        return Err(ContractError::DuplicateReference);
    }
    storage::mark_reference_used(env, reference);
    Ok(())
}

pub fn get_transaction(env: &Env, id: u64) -> Result<Transaction, ContractError> {
    storage::get_txn(env, id).ok_or(ContractError::TransactionNotFound)
}

/// Transactions with ids in `start..start + limit`, oldest first.
pub fn get_transactions(env: &Env, start: u64, limit: u32) -> Vec<Transaction> {
    let last = storage::get_counter(env, &DataKey::TxnCounter);
    let mut out = Vec::new(env);
    let mut id = start.max(1);
    while id <= last && out.len() < limit.min(MAX_PAGE_SIZE) {
        if let Some(txn) = storage::get_txn(env, id) {
            out.push_back(txn);
        }
        id += 1;
    }
    out
}

/// A user's transactions from position `start` (0-based) of their history.
pub fn get_user_transactions(env: &Env, user: &Address, start: u32, limit: u32) -> Vec<Transaction> {
    let mut out = Vec::new(env);
    for id in storage::history_page(env, user, HistoryKind::Txns, start, limit).iter() {
        if let Some(txn) = storage::get_txn(env, id) {
            out.push_back(txn);
        }
    }
    out
}

fn wallet_balance(user: &mut User, wallet: Wallet) -> &mut i128 {
    match wallet {
        Wallet::Main => &mut user.balance,
        Wallet::Profit => &mut user.profit_balance,
    }
}

/// Keeps the per-user and platform totals in step with the entry kinds
/// they summarise.
fn apply_totals(user: &mut User, kind: TxnKind, amount: i128) -> Result<(), ContractError> {
    let user_total = match kind {
        TxnKind::Deposit | TxnKind::ManualDeposit => &mut user.total_deposit,
        TxnKind::Invest => &mut user.total_invest,
        TxnKind::Interest => &mut user.total_profit,
        _ => return Ok(()),
    };
    *user_total = user_total.checked_add(amount).ok_or(ContractError::Overflow)?;
    Ok(())
}

fn apply_platform_totals(totals: &mut PlatformTotals, kind: TxnKind, amount: i128) -> Result<(), ContractError> {
    let total = match kind {
        TxnKind::Deposit | TxnKind::ManualDeposit => &mut totals.total_deposited,
        TxnKind::Invest => &mut totals.total_invested,
        TxnKind::Interest => &mut totals.total_profit,
        _ => return Ok(()),
    };
    *total = total.checked_add(amount).ok_or(ContractError::Overflow)?;
    Ok(())
}

fn append(
    env: &Env,
    addr: &Address,
    wallet: Wallet,
    amount: i128,
    balance_after: i128,
    entry: Entry,
) -> Result<u64, ContractError> {
    let mut totals = storage::get_totals(env);
    apply_platform_totals(&mut totals, entry.kind, amount)?;
    storage::set_totals(env, &totals);

    let id = storage::next_id(env, &DataKey::TxnCounter);
    let txn = Transaction {
        id,
        user: addr.clone(),
        kind: entry.kind,
        wallet,
        amount,
        charge: entry.charge,
        balance_after,
        method: entry.method,
        note: entry.note,
        related_id: entry.related_id,
        created_at: env.ledger().timestamp(),
    };
    storage::set_txn(env, &txn);
    storage::push_history(env, addr, HistoryKind::Txns, id);

    env.events().publish(
        (crate::symbol_short!("txn"), addr.clone()),
        (id, entry.kind, wallet, amount, balance_after),
    );

    Ok(id)
}
