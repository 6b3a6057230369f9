use soroban_sdk::{Address, Env, String};

use crate::errors::ContractError;
use crate::storage;
use crate::types::{DataKey, PlatformStats, Settings};
use crate::MAX_PROFIT_BATCH;

pub fn initialize(env: &Env, admin: &Address, site_title: String) {
    if storage::has_admin(env) {
        panic!("already initialized");
    }
    storage::set_admin(env, admin);
    storage::set_settings(
        env,
        &Settings {
            site_title,
            deposit_enabled: true,
            withdraw_enabled: true,
            invest_enabled: true,
            tickets_enabled: true,
            profit_batch_limit: MAX_PROFIT_BATCH,
        },
    );
}

pub fn get_admin(env: &Env) -> Result<Address, ContractError> {
    storage::get_admin(env).ok_or(ContractError::NotInitialized)
}

/// True for the super admin and for every enabled staff admin.
pub fn is_admin(env: &Env, addr: &Address) -> bool {
    match storage::get_admin(env) {
        Some(admin) if admin == *addr => true,
        _ => storage::is_staff(env, addr),
    }
}

/// Authenticates `caller` and checks it holds back-office rights.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
    caller.require_auth();
    if !storage::has_admin(env) {
        return Err(ContractError::NotInitialized);
    }
    if !is_admin(env, caller) {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// Staff and settings management is reserved to the super admin.
pub fn require_super_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
    caller.require_auth();
    if *caller != get_admin(env)? {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

pub fn add_staff(env: &Env, caller: Address, staff: Address) -> Result<(), ContractError> {
    require_super_admin(env, &caller)?;
    storage::set_staff(env, &staff, true);

    env.events()
        .publish((crate::symbol_short!("staff_add"),), staff);

    Ok(())
}

pub fn remove_staff(env: &Env, caller: Address, staff: Address) -> Result<(), ContractError> {
    require_super_admin(env, &caller)?;
    storage::set_staff(env, &staff, false);

    env.events()
        .publish((crate::symbol_short!("staff_rm"),), staff);

    Ok(())
}

pub fn transfer_admin(env: &Env, caller: Address, new_admin: Address) -> Result<(), ContractError> {
    require_super_admin(env, &caller)?;
    new_admin.require_auth();
    storage::set_admin(env, &new_admin);

    env.events()
        .publish((crate::symbol_short!("adm_chng"),), (caller, new_admin));

    Ok(())
}

pub fn get_settings(env: &Env) -> Result<Settings, ContractError> {
    storage::get_settings(env).ok_or(ContractError::NotInitialized)
}

pub fn update_settings(env: &Env, caller: Address, settings: Settings) -> Result<(), ContractError> {
    require_super_admin(env, &caller)?;

    if settings.profit_batch_limit == 0 || settings.profit_batch_limit > MAX_PROFIT_BATCH {
        return Err(ContractError::InvalidSettings);
    }
    if settings.site_title.len() == 0 {
        return Err(ContractError::InvalidSettings);
    }

    storage::set_settings(env, &settings);

    env.events()
        .publish((crate::symbol_short!("settings"),), caller);

    Ok(())
}

/// Fails with `FeatureDisabled` unless `enabled` picks a switch that is on.
pub fn require_feature(
    env: &Env,
    enabled: impl Fn(&Settings) -> bool,
) -> Result<Settings, ContractError> {
    let settings = get_settings(env)?;
    if !enabled(&settings) {
        return Err(ContractError::FeatureDisabled);
    }
    Ok(settings)
}

pub fn get_stats(env: &Env) -> PlatformStats {
    let totals = storage::get_totals(env);
    PlatformStats {
        users: storage::get_counter(env, &DataKey::UserCount),
        total_deposited: totals.total_deposited,
        total_withdrawn: totals.total_withdrawn,
        total_invested: totals.total_invested,
        total_profit: totals.total_profit,
        pending_deposits: storage::get_ids(env, &DataKey::PendingDeposits).len(),
        pending_withdrawals: storage::get_ids(env, &DataKey::PendingWithdrawals).len(),
        open_tickets: storage::get_ids(env, &DataKey::OpenTickets).len(),
    }
}
