use soroban_sdk::{Address, Env, Vec};

use crate::admin;
use crate::errors::ContractError;
use crate::storage;
use crate::types::{DataKey, Interest, ReturnType, Schema, SchemaAmount, SchemaTerms};
use crate::{BPS_DENOMINATOR, MAX_PERIOD_SECS, MIN_PERIOD_SECS};

pub fn add_schema(env: &Env, caller: Address, terms: SchemaTerms) -> Result<u64, ContractError> {
    admin::require_admin(env, &caller)?;
    validate(&terms)?;

    let id = storage::next_id(env, &DataKey::SchemaCounter);
    storage::set_schema(
        env,
        &Schema {
            id,
            terms,
            enabled: true,
            created_at: env.ledger().timestamp(),
        },
    );

    env.events()
        .publish((crate::symbol_short!("sch_add"),), id);

    Ok(id)
}

/// Replaces the terms of a plan. Running invests keep the terms they
/// were opened with.
pub fn update_schema(
    env: &Env,
    caller: Address,
    id: u64,
    terms: SchemaTerms,
) -> Result<(), ContractError> {
    admin::require_admin(env, &caller)?;
    validate(&terms)?;

    let mut schema = get_schema(env, id)?;
    schema.terms = terms;
    storage::set_schema(env, &schema);

    env.events()
        .publish((crate::symbol_short!("sch_upd"),), id);

    Ok(())
}

pub fn set_schema_enabled(
    env: &Env,
    caller: Address,
    id: u64,
    enabled: bool,
) -> Result<(), ContractError> {
    admin::require_admin(env, &caller)?;

    let mut schema = get_schema(env, id)?;
    schema.enabled = enabled;
    storage::set_schema(env, &schema);

    env.events()
        .publish((crate::symbol_short!("sch_state"),), (id, enabled));

    Ok(())
}

pub fn get_schema(env: &Env, id: u64) -> Result<Schema, ContractError> {
    storage::get_schema(env, id).ok_or(ContractError::SchemaNotFound)
}

pub fn get_schemas(env: &Env) -> Vec<Schema> {
    let mut out = Vec::new(env);
    for id in 1..=storage::get_counter(env, &DataKey::SchemaCounter) {
        if let Some(schema) = storage::get_schema(env, id) {
            out.push_back(schema);
        }
    }
    out
}

/// Checks `amount` against the plan's fixed amount or range.
pub fn accepts(terms: &SchemaTerms, amount: i128) -> bool {
    match terms.amount {
        SchemaAmount::Fixed(fixed) => amount == fixed,
        SchemaAmount::Range(min, max) => amount >= min && amount <= max,
    }
}

/// Profit paid each period for an invest of `amount`.
pub fn interest_for(terms: &SchemaTerms, amount: i128) -> Result<i128, ContractError> {
    match terms.interest {
        Interest::Fixed(fixed) => Ok(fixed),
        Interest::Percent(bps) => amount
            .checked_mul(bps as i128)
            .map(|v| v / BPS_DENOMINATOR)
            .ok_or(ContractError::Overflow),
    }
}

fn validate(terms: &SchemaTerms) -> Result<(), ContractError> {
    if terms.name.len() == 0 {
        return Err(ContractError::InvalidSchema);
    }
    if terms.period_secs < MIN_PERIOD_SECS || terms.period_secs > MAX_PERIOD_SECS {
        return Err(ContractError::InvalidSchema);
    }
    let amount_ok = match terms.amount {
        SchemaAmount::Fixed(fixed) => fixed > 0,
        SchemaAmount::Range(min, max) => min > 0 && max >= min,
    };
    let interest_ok = match terms.interest {
        Interest::Percent(bps) => bps > 0,
        Interest::Fixed(fixed) => fixed > 0,
    };
    let return_ok = match terms.return_type {
        ReturnType::Period(n) => n > 0,
        ReturnType::Lifetime => !terms.capital_back,
    };
    if !amount_ok || !interest_ok || !return_ok {
        return Err(ContractError::InvalidSchema);
    }
    Ok(())
}
