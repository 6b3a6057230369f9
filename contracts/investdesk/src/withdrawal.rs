use soroban_sdk::{log, token, Address, Env, String, Vec};

use crate::admin;
use crate::errors::ContractError;
use crate::gateway;
use crate::ledger::{self, Entry};
use crate::storage;
use crate::template;
use crate::types::{
    DataKey, GatewayKind, GatewayPurpose, HistoryKind, RequestStatus, TxnKind, UserStatus,
    Wallet, Withdrawal,
};
use crate::user;
use crate::MAX_PAGE_SIZE;

/// Debits `amount` plus the method charge from `wallet` and opens a
/// withdrawal request.
pub fn withdraw(
    env: &Env,
    user: Address,
    method_id: u64,
    wallet: Wallet,
    amount: i128,
    account: String,
) -> Result<u64, ContractError> {
    user.require_auth();
    admin::require_feature(env, |s| s.withdraw_enabled)?;
    user::require_active(env, &user)?;

    let method = gateway::load_for(env, method_id, GatewayPurpose::Withdraw, amount)?;
    let charge = gateway::charge_for(&method.config, amount)?;
    let total = amount.checked_add(charge).ok_or(ContractError::Overflow)?;
    let pay_amount = gateway::convert(&method.config, amount)?;
    if pay_amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }

    let id = storage::next_id(env, &DataKey::WithdrawalCounter);
    let entry = Entry::new(env, TxnKind::Withdraw, "", id)
        .with_charge(charge)
        .with_method(method.config.name.clone());
    ledger::debit(env, &user, wallet, total, entry)?;

    let withdrawal = Withdrawal {
        id,
        user: user.clone(),
        method_id,
        wallet,
        amount,
        charge,
        pay_amount,
        kind: method.config.kind.clone(),
        account,
        status: RequestStatus::Pending,
        note: String::from_str(env, ""),
        created_at: env.ledger().timestamp(),
        processed_at: 0,
    };
    storage::set_withdrawal(env, &withdrawal);
    storage::push_history(env, &user, HistoryKind::Withdrawals, id);

    env.events()
        .publish((crate::symbol_short!("wd_new"), user), (id, amount, charge));

    let instant = method.config.auto_approve
        && matches!(method.config.kind, GatewayKind::Automatic(_));
    if instant {
        pay_out(env, withdrawal)?;
    } else {
        storage::push_id(env, &DataKey::PendingWithdrawals, id);
    }

    Ok(id)
}

pub fn approve_withdrawal(env: &Env, caller: Address, id: u64) -> Result<(), ContractError> {
    admin::require_admin(env, &caller)?;
    approve_pending(env, id)
}

/// Rejects a pending withdrawal and refunds amount plus charge to the
/// wallet it came from.
pub fn reject_withdrawal(
    env: &Env,
    caller: Address,
    id: u64,
    reason: String,
) -> Result<(), ContractError> {
    admin::require_admin(env, &caller)?;

    let mut withdrawal = load_pending(env, id)?;
    withdrawal.status = RequestStatus::Rejected;
    withdrawal.note = reason.clone();
    withdrawal.processed_at = env.ledger().timestamp();
    storage::set_withdrawal(env, &withdrawal);
    storage::remove_id(env, &DataKey::PendingWithdrawals, id);

    let refund = withdrawal
        .amount
        .checked_add(withdrawal.charge)
        .ok_or(ContractError::Overflow)?;
    let entry = Entry::new(env, TxnKind::Refund, "withdraw", id).with_note(reason);
    ledger::credit(env, &withdrawal.user, withdrawal.wallet, refund, entry)?;

    env.events()
        .publish((crate::symbol_short!("wd_rej"), withdrawal.user.clone()), (id, refund));
    template::notify(env, crate::symbol_short!("wd_rej"), &withdrawal.user);

    Ok(())
}

/// Approves up to `limit` queued withdrawals, oldest first, holding back
/// those of banned users. Returns how many were approved.
pub fn approve_pending_withdrawals(
    env: &Env,
    caller: Address,
    limit: u32,
) -> Result<u32, ContractError> {
    admin::require_admin(env, &caller)?;

    let limit = limit.min(MAX_PAGE_SIZE);
    let mut approved = 0u32;
    for id in storage::get_ids(env, &DataKey::PendingWithdrawals).iter() {
        if approved >= limit {
            break;
        }
        let Some(withdrawal) = storage::get_withdrawal(env, id) else {
            continue;
        };
        match storage::get_user(env, &withdrawal.user) {
            Some(u) if u.status == UserStatus::Active => {}
            _ => {
                log!(env, "withdrawal held", id);
                continue;
            }
        }
        approve_pending(env, id)?;
        approved += 1;
    }

    Ok(approved)
}

pub fn get_withdrawal(env: &Env, id: u64) -> Result<Withdrawal, ContractError> {
    storage::get_withdrawal(env, id).ok_or(ContractError::WithdrawalNotFound)
}

pub fn get_pending_withdrawals(env: &Env) -> Vec<Withdrawal> {
    collect(env, storage::get_ids(env, &DataKey::PendingWithdrawals))
}

pub fn get_user_withdrawals(env: &Env, user: Address, start: u32, limit: u32) -> Vec<Withdrawal> {
    collect(
        env,
        storage::history_page(env, &user, HistoryKind::Withdrawals, start, limit),
    )
}

fn approve_pending(env: &Env, id: u64) -> Result<(), ContractError> {
    let withdrawal = load_pending(env, id)?;
    storage::remove_id(env, &DataKey::PendingWithdrawals, id);
    pay_out(env, withdrawal)
}

fn load_pending(env: &Env, id: u64) -> Result<Withdrawal, ContractError> {
    let withdrawal = get_withdrawal(env, id)?;
    if withdrawal.status != RequestStatus::Pending {
        return Err(ContractError::NotPending);
    }
    Ok(withdrawal)
}

/// Marks the withdrawal approved. Requests made through an on-chain
/// method are transferred here in the token recorded on the request;
/// manual ones are paid outside the contract.
fn pay_out(env: &Env, mut withdrawal: Withdrawal) -> Result<(), ContractError> {
    withdrawal.status = RequestStatus::Approved;
    withdrawal.processed_at = env.ledger().timestamp();
    storage::set_withdrawal(env, &withdrawal);

    if let GatewayKind::Automatic(asset) = &withdrawal.kind {
        token::Client::new(env, asset).transfer(
            &env.current_contract_address(),
            &withdrawal.user,
            &withdrawal.pay_amount,
        );
    }
    ledger::settle_withdrawal(env, &withdrawal.user, withdrawal.amount)?;

    env.events().publish(
        (crate::symbol_short!("wd_appr"), withdrawal.user.clone()),
        (withdrawal.id, withdrawal.amount),
    );
    template::notify(env, crate::symbol_short!("wd_appr"), &withdrawal.user);

    Ok(())
}

fn collect(env: &Env, ids: Vec<u64>) -> Vec<Withdrawal> {
    let mut out = Vec::new(env);
    for id in ids.iter() {
        if let Some(withdrawal) = storage::get_withdrawal(env, id) {
            out.push_back(withdrawal);
        }
    }
    out
}
