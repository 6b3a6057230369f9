use soroban_sdk::{Address, Env, String, Vec};

use crate::admin;
use crate::errors::ContractError;
use crate::ledger::{self, Entry};
use crate::storage;
use crate::types::{DataKey, TxnKind, User, UserStatus, Wallet};
use crate::MAX_PAGE_SIZE;

pub fn register(env: &Env, user: Address, name: String, email: String) -> Result<(), ContractError> {
    user.require_auth();

    if storage::has_user(env, &user) {
        return Err(ContractError::UserExists);
    }

    let index = storage::next_id(env, &DataKey::UserCount);
    storage::set_user_at(env, index, &user);
    storage::set_user(
        env,
        &User {
            address: user.clone(),
            name,
            email,
            status: UserStatus::Active,
            balance: 0,
            profit_balance: 0,
            total_deposit: 0,
            total_withdraw: 0,
            total_invest: 0,
            total_profit: 0,
            joined_at: env.ledger().timestamp(),
        },
    );

    env.events()
        .publish((crate::symbol_short!("usr_reg"),), (user, index));

    Ok(())
}

pub fn update_profile(
    env: &Env,
    user: Address,
    name: String,
    email: String,
) -> Result<(), ContractError> {
    user.require_auth();

    let mut record = get_user(env, &user)?;
    record.name = name;
    record.email = email;
    storage::set_user(env, &record);

    env.events()
        .publish((crate::symbol_short!("usr_upd"),), user);

    Ok(())
}

pub fn get_user(env: &Env, user: &Address) -> Result<User, ContractError> {
    storage::get_user(env, user).ok_or(ContractError::UserNotFound)
}

/// Loads a user that may move money: registered and not banned.
pub fn require_active(env: &Env, user: &Address) -> Result<User, ContractError> {
    let record = get_user(env, user)?;
    if record.status == UserStatus::Banned {
        return Err(ContractError::UserBanned);
    }
    Ok(record)
}

/// Users in registration order, starting at position `start` (1-based).
pub fn get_users(env: &Env, start: u64, limit: u32) -> Vec<User> {
    let count = storage::get_counter(env, &DataKey::UserCount);
    let mut out = Vec::new(env);
    let mut index = start.max(1);
    while index <= count && out.len() < limit.min(MAX_PAGE_SIZE) {
        if let Some(user) = storage::get_user_at(env, index).and_then(|a| storage::get_user(env, &a)) {
            out.push_back(user);
        }
        index += 1;
    }
    out
}

pub fn set_user_status(
    env: &Env,
    caller: Address,
    user: Address,
    status: UserStatus,
) -> Result<(), ContractError> {
    admin::require_admin(env, &caller)?;

    let mut record = get_user(env, &user)?;
    record.status = status;
    storage::set_user(env, &record);

    env.events()
        .publish((crate::symbol_short!("usr_stat"),), (user, status));

    Ok(())
}

/// Manual balance correction by an admin. Subtractions never take a
/// wallet below zero.
pub fn adjust_balance(
    env: &Env,
    caller: Address,
    user: Address,
    wallet: Wallet,
    amount: i128,
    add: bool,
    note: String,
) -> Result<u64, ContractError> {
    admin::require_admin(env, &caller)?;
    get_user(env, &user)?;

    if add {
        let entry = Entry::new(env, TxnKind::AddBalance, "admin", 0).with_note(note);
        ledger::credit(env, &user, wallet, amount, entry)
    } else {
        let entry = Entry::new(env, TxnKind::SubtractBalance, "admin", 0).with_note(note);
        ledger::debit(env, &user, wallet, amount, entry)
    }
}
