use soroban_sdk::{symbol_short, testutils::Ledger, Address, Env, String};

use crate::test::{add_template, mail_sent, register_user, setup_env};
use crate::types::*;
use crate::{ContractError, InvestDeskContractClient, MAX_PERIOD_SECS};

const DAY: u64 = 86_400;

/// 5% per day for three days, capital returned at the end.
fn starter_plan(env: &Env) -> SchemaTerms {
    SchemaTerms {
        name: String::from_str(env, "Starter"),
        amount: SchemaAmount::Range(100, 10_000),
        interest: Interest::Percent(500),
        period_secs: DAY,
        return_type: ReturnType::Period(3),
        capital_back: true,
        featured: true,
    }
}

fn lifetime_plan(env: &Env) -> SchemaTerms {
    SchemaTerms {
        name: String::from_str(env, "Forever"),
        amount: SchemaAmount::Fixed(1_000),
        interest: Interest::Fixed(7),
        period_secs: DAY,
        return_type: ReturnType::Lifetime,
        capital_back: false,
        featured: false,
    }
}

/// A registered user with `amount` credited to the main wallet by an admin.
fn user_with_balance(
    env: &Env,
    client: &InvestDeskContractClient,
    admin: &Address,
    amount: i128,
) -> Address {
    let user = register_user(env, client);
    client.adjust_balance(
        admin,
        &user,
        &Wallet::Main,
        &amount,
        &true,
        &String::from_str(env, "opening balance"),
    );
    user
}

fn set_time(env: &Env, timestamp: u64) {
    env.ledger().set_timestamp(timestamp);
}

// ─── Schemas ────────────────────────────────────────────────────────

#[test]
fn test_schema_lifecycle() {
    let (env, admin, client, _token) = setup_env();

    let id = client.add_schema(&admin, &starter_plan(&env));
    let lifetime = client.add_schema(&admin, &lifetime_plan(&env));
    assert_eq!(client.get_schemas().len(), 2);

    let schema = client.get_schema(&id);
    assert!(schema.enabled);
    assert_eq!(schema.terms, starter_plan(&env));

    let mut terms = starter_plan(&env);
    terms.interest = Interest::Percent(700);
    client.update_schema(&admin, &id, &terms);
    assert_eq!(client.get_schema(&id).terms.interest, Interest::Percent(700));

    client.set_schema_enabled(&admin, &lifetime, &false);
    assert!(!client.get_schema(&lifetime).enabled);

    let result = client.try_get_schema(&42);
    assert_eq!(result, Err(Ok(ContractError::SchemaNotFound)));
}

#[test]
fn test_invalid_schema_rejected() {
    let (env, admin, client, _token) = setup_env();

    let mut terms = starter_plan(&env);
    terms.period_secs = 60;
    assert_eq!(
        client.try_add_schema(&admin, &terms),
        Err(Ok(ContractError::InvalidSchema))
    );

    let mut terms = starter_plan(&env);
    terms.amount = SchemaAmount::Range(500, 100);
    assert_eq!(
        client.try_add_schema(&admin, &terms),
        Err(Ok(ContractError::InvalidSchema))
    );

    let mut terms = starter_plan(&env);
    terms.return_type = ReturnType::Period(0);
    assert_eq!(
        client.try_add_schema(&admin, &terms),
        Err(Ok(ContractError::InvalidSchema))
    );

    // Capital can only come back from a plan that ends
    let mut terms = lifetime_plan(&env);
    terms.capital_back = true;
    assert_eq!(
        client.try_add_schema(&admin, &terms),
        Err(Ok(ContractError::InvalidSchema))
    );

    let mut terms = starter_plan(&env);
    terms.interest = Interest::Percent(0);
    assert_eq!(
        client.try_add_schema(&admin, &terms),
        Err(Ok(ContractError::InvalidSchema))
    );

    for period in [MAX_PERIOD_SECS + 1, u64::MAX] {
        let mut terms = starter_plan(&env);
        terms.period_secs = period;
        assert_eq!(
            client.try_add_schema(&admin, &terms),
            Err(Ok(ContractError::InvalidSchema))
        );
    }
}

// ─── Invests ────────────────────────────────────────────────────────

#[test]
fn test_invest_debits_wallet() {
    let (env, admin, client, _token) = setup_env();
    let schema_id = client.add_schema(&admin, &starter_plan(&env));
    let user = user_with_balance(&env, &client, &admin, 1_000);
    set_time(&env, 1_000);

    let id = client.invest(&user, &schema_id, &Wallet::Main, &500);

    let invest = client.get_invest(&id);
    assert_eq!(invest.status, InvestStatus::Ongoing);
    assert_eq!(invest.interest, 25);
    assert_eq!(invest.total_periods, 3);
    assert_eq!(invest.next_profit_at, 1_000 + DAY);

    let record = client.get_user(&user);
    assert_eq!(record.balance, 500);
    assert_eq!(record.total_invest, 500);
    assert_eq!(client.get_stats().total_invested, 500);

    let txns = client.get_user_transactions(&user, &0, &10);
    let txn = txns.get(1).unwrap();
    assert_eq!(txn.kind, TxnKind::Invest);
    assert_eq!(txn.related_id, id);
    assert_eq!(txn.method, String::from_str(&env, "Starter"));

    assert_eq!(client.get_user_invests(&user, &0, &10).len(), 1);
    assert_eq!(client.get_invests(&1, &10).len(), 1);
}

#[test]
fn test_invest_validation() {
    let (env, admin, client, _token) = setup_env();
    let starter = client.add_schema(&admin, &starter_plan(&env));
    let lifetime = client.add_schema(&admin, &lifetime_plan(&env));
    let user = user_with_balance(&env, &client, &admin, 5_000);

    let result = client.try_invest(&user, &starter, &Wallet::Main, &50);
    assert_eq!(result, Err(Ok(ContractError::AmountOutOfRange)));

    // Fixed plans take exactly their amount
    let result = client.try_invest(&user, &lifetime, &Wallet::Main, &999);
    assert_eq!(result, Err(Ok(ContractError::AmountOutOfRange)));

    let result = client.try_invest(&user, &starter, &Wallet::Profit, &500);
    assert_eq!(result, Err(Ok(ContractError::InsufficientBalance)));

    client.set_schema_enabled(&admin, &starter, &false);
    let result = client.try_invest(&user, &starter, &Wallet::Main, &500);
    assert_eq!(result, Err(Ok(ContractError::SchemaDisabled)));

    let mut settings = client.get_settings();
    settings.invest_enabled = false;
    client.update_settings(&admin, &settings);
    let result = client.try_invest(&user, &lifetime, &Wallet::Main, &1_000);
    assert_eq!(result, Err(Ok(ContractError::FeatureDisabled)));

    assert_eq!(client.get_user(&user).balance, 5_000);
}

#[test]
fn test_invest_schedule_overflow_is_an_error() {
    let (env, admin, client, _token) = setup_env();
    let mut terms = starter_plan(&env);
    terms.period_secs = MAX_PERIOD_SECS;
    let schema_id = client.add_schema(&admin, &terms);
    let user = user_with_balance(&env, &client, &admin, 1_000);

    set_time(&env, u64::MAX - 10);
    let result = client.try_invest(&user, &schema_id, &Wallet::Main, &500);
    assert_eq!(result, Err(Ok(ContractError::Overflow)));
    assert_eq!(client.get_user(&user).balance, 1_000);
}

#[test]
fn test_invest_from_profit_wallet() {
    let (env, admin, client, _token) = setup_env();
    let schema_id = client.add_schema(&admin, &starter_plan(&env));
    let user = register_user(&env, &client);
    client.adjust_balance(
        &admin,
        &user,
        &Wallet::Profit,
        &300,
        &true,
        &String::from_str(&env, "promo"),
    );

    let id = client.invest(&user, &schema_id, &Wallet::Profit, &200);
    assert_eq!(client.get_invest(&id).wallet, Wallet::Profit);
    assert_eq!(client.get_user(&user).profit_balance, 100);
}

// ─── Profit ─────────────────────────────────────────────────────────

#[test]
fn test_collect_profit_until_completion() {
    let (env, admin, client, _token) = setup_env();
    let schema_id = client.add_schema(&admin, &starter_plan(&env));
    let user = user_with_balance(&env, &client, &admin, 1_000);
    let id = client.invest(&user, &schema_id, &Wallet::Main, &500);

    let result = client.try_collect_profit(&id);
    assert_eq!(result, Err(Ok(ContractError::NoProfitDue)));

    set_time(&env, DAY);
    assert_eq!(client.collect_profit(&id), 1);
    assert_eq!(client.get_user(&user).profit_balance, 25);

    let result = client.try_collect_profit(&id);
    assert_eq!(result, Err(Ok(ContractError::NoProfitDue)));

    // Two periods elapsed at once are both paid
    set_time(&env, 3 * DAY + 10);
    assert_eq!(client.collect_profit(&id), 2);

    let invest = client.get_invest(&id);
    assert_eq!(invest.status, InvestStatus::Completed);
    assert_eq!(invest.paid_periods, 3);
    assert_eq!(invest.total_profit, 75);
    assert_eq!(invest.last_profit_at, 3 * DAY);

    // Capital is back in the main wallet
    let record = client.get_user(&user);
    assert_eq!(record.balance, 1_000);
    assert_eq!(record.profit_balance, 75);
    assert_eq!(record.total_profit, 75);
    assert_eq!(client.get_stats().total_profit, 75);

    let txns = client.get_user_transactions(&user, &0, &10);
    let last = txns.get(txns.len() - 1).unwrap();
    assert_eq!(last.kind, TxnKind::CapitalBack);
    assert_eq!(last.amount, 500);

    let result = client.try_collect_profit(&id);
    assert_eq!(result, Err(Ok(ContractError::InvestNotOngoing)));
}

#[test]
fn test_collect_profit_respects_batch_limit() {
    let (env, admin, client, _token) = setup_env();
    let mut settings = client.get_settings();
    settings.profit_batch_limit = 2;
    client.update_settings(&admin, &settings);

    let schema_id = client.add_schema(&admin, &lifetime_plan(&env));
    let user = user_with_balance(&env, &client, &admin, 1_000);
    let id = client.invest(&user, &schema_id, &Wallet::Main, &1_000);

    set_time(&env, 5 * DAY);
    assert_eq!(client.collect_profit(&id), 2);
    assert_eq!(client.collect_profit(&id), 2);
    assert_eq!(client.collect_profit(&id), 1);
    assert_eq!(
        client.try_collect_profit(&id),
        Err(Ok(ContractError::NoProfitDue))
    );

    let invest = client.get_invest(&id);
    assert_eq!(invest.status, InvestStatus::Ongoing);
    assert_eq!(invest.paid_periods, 5);
    assert_eq!(client.get_user(&user).profit_balance, 35);
    assert_eq!(client.get_user(&user).balance, 0);
}

#[test]
fn test_manual_profit_distribution() {
    let (env, admin, client, _token) = setup_env();
    let schema_id = client.add_schema(&admin, &starter_plan(&env));
    let user = user_with_balance(&env, &client, &admin, 1_000);
    let id = client.invest(&user, &schema_id, &Wallet::Main, &1_000);

    set_time(&env, 100);
    assert_eq!(client.distribute_profit(&admin, &id, &2), 2);
    let invest = client.get_invest(&id);
    assert_eq!(invest.paid_periods, 2);
    assert_eq!(invest.next_profit_at, 100 + DAY);
    assert_eq!(client.get_user(&user).profit_balance, 100);

    // Only one period is left on the plan
    assert_eq!(client.distribute_profit(&admin, &id, &5), 1);
    let invest = client.get_invest(&id);
    assert_eq!(invest.status, InvestStatus::Completed);
    assert_eq!(client.get_user(&user).balance, 1_000);
    assert_eq!(client.get_user(&user).profit_balance, 150);

    let result = client.try_distribute_profit(&admin, &id, &1);
    assert_eq!(result, Err(Ok(ContractError::InvestNotOngoing)));
}

#[test]
fn test_invest_mail() {
    let (env, admin, client, _token) = setup_env();
    let schema_id = client.add_schema(&admin, &starter_plan(&env));
    let user = user_with_balance(&env, &client, &admin, 1_000);
    add_template(&env, &client, &admin, &symbol_short!("inv_start"));
    add_template(&env, &client, &admin, &symbol_short!("inv_done"));

    let id = client.invest(&user, &schema_id, &Wallet::Main, &500);
    assert!(mail_sent(&env, &client, symbol_short!("inv_start"), &user));

    client.distribute_profit(&admin, &id, &2);
    assert!(!mail_sent(&env, &client, symbol_short!("inv_done"), &user));

    client.distribute_profit(&admin, &id, &1);
    assert!(mail_sent(&env, &client, symbol_short!("inv_done"), &user));
}

#[test]
fn test_manual_profit_requires_admin() {
    let (env, admin, client, _token) = setup_env();
    let schema_id = client.add_schema(&admin, &starter_plan(&env));
    let user = user_with_balance(&env, &client, &admin, 1_000);
    let id = client.invest(&user, &schema_id, &Wallet::Main, &1_000);

    let result = client.try_distribute_profit(&user, &id, &1);
    assert_eq!(result, Err(Ok(ContractError::Unauthorized)));

    let result = client.try_distribute_profit(&admin, &id, &0);
    assert_eq!(result, Err(Ok(ContractError::InvalidAmount)));
}

#[test]
fn test_cancel_invest() {
    let (env, admin, client, _token) = setup_env();
    let schema_id = client.add_schema(&admin, &starter_plan(&env));
    let user = user_with_balance(&env, &client, &admin, 1_000);
    let kept = client.invest(&user, &schema_id, &Wallet::Main, &400);
    let refunded = client.invest(&user, &schema_id, &Wallet::Main, &600);
    assert_eq!(client.get_user(&user).balance, 0);

    client.cancel_invest(&admin, &kept, &false);
    client.cancel_invest(&admin, &refunded, &true);

    assert_eq!(client.get_invest(&kept).status, InvestStatus::Canceled);
    assert_eq!(client.get_invest(&refunded).status, InvestStatus::Canceled);
    assert_eq!(client.get_user(&user).balance, 600);

    set_time(&env, 2 * DAY);
    let result = client.try_collect_profit(&refunded);
    assert_eq!(result, Err(Ok(ContractError::InvestNotOngoing)));

    let result = client.try_cancel_invest(&admin, &kept, &true);
    assert_eq!(result, Err(Ok(ContractError::InvestNotOngoing)));
}
