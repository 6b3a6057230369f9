use soroban_sdk::{Address, Env, String, Vec};

use crate::admin;
use crate::errors::ContractError;
use crate::ledger::{self, Entry};
use crate::schema;
use crate::storage;
use crate::template;
use crate::types::{DataKey, HistoryKind, Invest, InvestStatus, ReturnType, TxnKind, Wallet};
use crate::user;
use crate::{MAX_PAGE_SIZE, MAX_PROFIT_BATCH};

/// Opens an investment in plan `schema_id`, paid from `wallet`. The first
/// profit falls due one period from now.
pub fn invest(
    env: &Env,
    user: Address,
    schema_id: u64,
    wallet: Wallet,
    amount: i128,
) -> Result<u64, ContractError> {
    user.require_auth();
    admin::require_feature(env, |s| s.invest_enabled)?;
    user::require_active(env, &user)?;

    let schema = schema::get_schema(env, schema_id)?;
    if !schema.enabled {
        return Err(ContractError::SchemaDisabled);
    }
    if amount <= 0 {
        return Err(ContractError::InvalidAmount);
    }
    if !schema::accepts(&schema.terms, amount) {
        return Err(ContractError::AmountOutOfRange);
    }
    let interest = schema::interest_for(&schema.terms, amount)?;
    if interest <= 0 {
        return Err(ContractError::InvalidAmount);
    }

    let id = storage::next_id(env, &DataKey::InvestCounter);
    let entry = Entry::new(env, TxnKind::Invest, "", id).with_method(schema.terms.name.clone());
    ledger::debit(env, &user, wallet, amount, entry)?;

    let now = env.ledger().timestamp();
    let next_profit_at = now
        .checked_add(schema.terms.period_secs)
        .ok_or(ContractError::Overflow)?;
    let total_periods = match schema.terms.return_type {
        ReturnType::Period(n) => n,
        ReturnType::Lifetime => 0,
    };
    let invest = Invest {
        id,
        user: user.clone(),
        schema_id,
        wallet,
        amount,
        interest,
        period_secs: schema.terms.period_secs,
        total_periods,
        paid_periods: 0,
        total_profit: 0,
        capital_back: schema.terms.capital_back,
        next_profit_at,
        last_profit_at: 0,
        status: InvestStatus::Ongoing,
        created_at: now,
    };
    storage::set_invest(env, &invest);
    storage::push_history(env, &user, HistoryKind::Invests, id);

    env.events()
        .publish((crate::symbol_short!("inv_new"), user.clone()), (id, schema_id, amount));
    template::notify(env, crate::symbol_short!("inv_start"), &user);

    Ok(id)
}

/// Pays every period that has fallen due, up to the configured batch
/// limit. Callable by anyone; returns the number of periods paid.
pub fn collect_profit(env: &Env, invest_id: u64) -> Result<u32, ContractError> {
    let mut invest = load_ongoing(env, invest_id)?;
    let limit = admin::get_settings(env)?.profit_batch_limit;
    let now = env.ledger().timestamp();

    let mut paid = 0u32;
    while paid < limit && invest.next_profit_at <= now && remaining(&invest) > 0 {
        pay_period(env, &mut invest)?;
        invest.last_profit_at = invest.next_profit_at;
        invest.next_profit_at = invest
            .next_profit_at
            .checked_add(invest.period_secs)
            .ok_or(ContractError::Overflow)?;
        paid += 1;
    }
    if paid == 0 {
        return Err(ContractError::NoProfitDue);
    }

    complete_if_done(env, &mut invest)?;
    storage::set_invest(env, &invest);

    Ok(paid)
}

/// Manual profit distribution: pays up to `periods` periods now, whatever
/// the schedule says, and restarts the timer from now.
pub fn distribute_profit(
    env: &Env,
    caller: Address,
    invest_id: u64,
    periods: u32,
) -> Result<u32, ContractError> {
    admin::require_admin(env, &caller)?;

    if periods == 0 {
        return Err(ContractError::InvalidAmount);
    }
    let mut invest = load_ongoing(env, invest_id)?;
    let count = periods.min(remaining(&invest)).min(MAX_PROFIT_BATCH);
    for _ in 0..count {
        pay_period(env, &mut invest)?;
    }

    let now = env.ledger().timestamp();
    invest.last_profit_at = now;
    invest.next_profit_at = now
        .checked_add(invest.period_secs)
        .ok_or(ContractError::Overflow)?;
    complete_if_done(env, &mut invest)?;
    storage::set_invest(env, &invest);

    env.events().publish(
        (crate::symbol_short!("inv_manu"), invest.user.clone()),
        (invest_id, count),
    );

    Ok(count)
}

/// Stops an ongoing invest. With `refund_capital` the invested amount
/// goes back to the user's main wallet.
pub fn cancel_invest(
    env: &Env,
    caller: Address,
    invest_id: u64,
    refund_capital: bool,
) -> Result<(), ContractError> {
    admin::require_admin(env, &caller)?;

    let mut invest = load_ongoing(env, invest_id)?;
    invest.status = InvestStatus::Canceled;
    storage::set_invest(env, &invest);

    if refund_capital {
        let entry = Entry::new(env, TxnKind::Refund, "invest", invest_id)
            .with_note(String::from_str(env, "invest canceled"));
        ledger::credit(env, &invest.user, Wallet::Main, invest.amount, entry)?;
    }

    env.events().publish(
        (crate::symbol_short!("inv_cncl"), invest.user),
        (invest_id, refund_capital),
    );

    Ok(())
}

pub fn get_invest(env: &Env, id: u64) -> Result<Invest, ContractError> {
    storage::get_invest(env, id).ok_or(ContractError::InvestNotFound)
}

pub fn get_user_invests(env: &Env, user: Address, start: u32, limit: u32) -> Vec<Invest> {
    let mut out = Vec::new(env);
    for id in storage::history_page(env, &user, HistoryKind::Invests, start, limit).iter() {
        if let Some(invest) = storage::get_invest(env, id) {
            out.push_back(invest);
        }
    }
    out
}

pub fn get_invests(env: &Env, start: u64, limit: u32) -> Vec<Invest> {
    let last = storage::get_counter(env, &DataKey::InvestCounter);
    let mut out = Vec::new(env);
    let mut id = start.max(1);
    while id <= last && out.len() < limit.min(MAX_PAGE_SIZE) {
        if let Some(invest) = storage::get_invest(env, id) {
            out.push_back(invest);
        }
        id += 1;
    }
    out
}

fn load_ongoing(env: &Env, id: u64) -> Result<Invest, ContractError> {
    let invest = get_invest(env, id)?;
    if invest.status != InvestStatus::Ongoing {
        return Err(ContractError::InvestNotOngoing);
    }
    Ok(invest)
}

/// Periods still to pay; lifetime plans never run out.
fn remaining(invest: &Invest) -> u32 {
    if invest.total_periods == 0 {
        u32::MAX
    } else {
        invest.total_periods.saturating_sub(invest.paid_periods)
    }
}

fn pay_period(env: &Env, invest: &mut Invest) -> Result<(), ContractError> {
    let entry = Entry::new(env, TxnKind::Interest, "interest", invest.id);
    ledger::credit(env, &invest.user, Wallet::Profit, invest.interest, entry)?;
    invest.paid_periods += 1;
    invest.total_profit = invest
        .total_profit
        .checked_add(invest.interest)
        .ok_or(ContractError::Overflow)?;
    Ok(())
}

fn complete_if_done(env: &Env, invest: &mut Invest) -> Result<(), ContractError> {
    if invest.total_periods == 0 || invest.paid_periods < invest.total_periods {
        return Ok(());
    }
    invest.status = InvestStatus::Completed;

    if invest.capital_back {
        let entry = Entry::new(env, TxnKind::CapitalBack, "capital", invest.id);
        ledger::credit(env, &invest.user, Wallet::Main, invest.amount, entry)?;
    }

    env.events().publish(
        (crate::symbol_short!("inv_done"), invest.user.clone()),
        (invest.id, invest.total_profit),
    );
    template::notify(env, crate::symbol_short!("inv_done"), &invest.user);

    Ok(())
}
