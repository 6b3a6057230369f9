use soroban_sdk::{Address, Env, Vec};

use crate::admin;
use crate::errors::ContractError;
use crate::storage;
use crate::types::{ChargeType, DataKey, Gateway, GatewayConfig, GatewayPurpose};
use crate::{BPS_DENOMINATOR, RATE_SCALE};

pub fn add_gateway(
    env: &Env,
    caller: Address,
    purpose: GatewayPurpose,
    config: GatewayConfig,
) -> Result<u64, ContractError> {
    admin::require_admin(env, &caller)?;
    validate(&config)?;

    let id = storage::next_id(env, &DataKey::GatewayCounter);
    let gateway = Gateway {
        id,
        purpose,
        config,
        enabled: true,
    };
    storage::set_gateway(env, &gateway);
    storage::push_id(env, &DataKey::GatewayIds(purpose), id);

    env.events()
        .publish((crate::symbol_short!("gw_add"),), (id, purpose));

    Ok(id)
}

pub fn update_gateway(
    env: &Env,
    caller: Address,
    id: u64,
    config: GatewayConfig,
) -> Result<(), ContractError> {
    admin::require_admin(env, &caller)?;
    validate(&config)?;

    let mut gateway = storage::get_gateway(env, id).ok_or(ContractError::GatewayNotFound)?;
    gateway.config = config;
    storage::set_gateway(env, &gateway);

    env.events()
        .publish((crate::symbol_short!("gw_upd"),), id);

    Ok(())
}

pub fn set_gateway_enabled(
    env: &Env,
    caller: Address,
    id: u64,
    enabled: bool,
) -> Result<(), ContractError> {
    admin::require_admin(env, &caller)?;

    let mut gateway = storage::get_gateway(env, id).ok_or(ContractError::GatewayNotFound)?;
    gateway.enabled = enabled;
    storage::set_gateway(env, &gateway);

    env.events()
        .publish((crate::symbol_short!("gw_state"),), (id, enabled));

    Ok(())
}

pub fn get_gateway(env: &Env, id: u64) -> Result<Gateway, ContractError> {
    storage::get_gateway(env, id).ok_or(ContractError::GatewayNotFound)
}

pub fn get_gateways(env: &Env, purpose: GatewayPurpose) -> Vec<Gateway> {
    let mut out = Vec::new(env);
    for id in storage::get_ids(env, &DataKey::GatewayIds(purpose)).iter() {
        if let Some(gateway) = storage::get_gateway(env, id) {
            out.push_back(gateway);
        }
    }
    out
}

/// Loads a gateway for a user request: it must serve `purpose`, be
/// enabled, and accept `amount`.
pub fn load_for(
    env: &Env,
    id: u64,
    purpose: GatewayPurpose,
    amount: i128,
) -> Result<Gateway, ContractError> {
    let gateway = get_gateway(env, id)?;
    if gateway.purpose != purpose {
        return Err(ContractError::GatewayNotFound);
    }
    if !gateway.enabled {
        return Err(ContractError::GatewayDisabled);
    }
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    if amount < gateway.config.minimum || amount > gateway.config.maximum {
        return Err(ContractError::AmountOutOfRange);
    }
    Ok(gateway)
}

pub fn charge_for(config: &GatewayConfig, amount: i128) -> Result<i128, ContractError> {
    match config.charge_type {
        ChargeType::Fixed => Ok(config.charge),
        ChargeType::Percent => amount
            .checked_mul(config.charge)
            .map(|v| v / BPS_DENOMINATOR)
            .ok_or(ContractError::Overflow),
    }
}

/// Converts platform units into the gateway currency.
pub fn convert(config: &GatewayConfig, amount: i128) -> Result<i128, ContractError> {
    amount
        .checked_mul(config.rate)
        .map(|v| v / RATE_SCALE)
        .ok_or(ContractError::Overflow)
}

fn validate(config: &GatewayConfig) -> Result<(), ContractError> {
    if config.name.len() == 0 || config.minimum <= 0 || config.maximum < config.minimum {
        return Err(ContractError::InvalidGateway);
    }
    if config.rate <= 0 || config.charge < 0 {
        return Err(ContractError::InvalidGateway);
    }
    if config.charge_type == ChargeType::Percent && config.charge > BPS_DENOMINATOR {
        return Err(ContractError::InvalidGateway);
    }
    Ok(())
}
