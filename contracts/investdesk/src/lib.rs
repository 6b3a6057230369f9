//! # InvestDesk
//!
//! Back-office contract for an investment platform. Users deposit through
//! configured gateways, invest their balance in admin-defined plans
//! ("schemas"), earn profit per period and withdraw through configured
//! methods. Admins approve manual deposits and withdrawals, manage plans
//! and gateways, distribute profit by hand, maintain mail templates and
//! answer support tickets.
//!
//! All balance changes go through the `ledger` module, which keeps an
//! append-only transaction log.

#![no_std]

use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Map, String, Symbol, Vec};

mod admin;
mod deposit;
mod errors;
mod gateway;
mod invest;
mod ledger;
mod schema;
mod storage;
mod template;
mod ticket;
mod types;
mod user;
mod withdrawal;

pub use errors::ContractError;
pub use types::*;

/// Basis points denominator (10000 = 100%).
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Fixed-point scale for gateway rates (7 decimals).
pub const RATE_SCALE: i128 = 10_000_000;

/// Upper bound on items returned or processed by one call.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Upper bound on profit periods paid by one call.
pub const MAX_PROFIT_BATCH: u32 = 50;

/// Shortest allowed profit period: one hour.
pub const MIN_PERIOD_SECS: u64 = 60 * 60;

/// Longest allowed profit period: one year.
pub const MAX_PERIOD_SECS: u64 = 365 * 24 * 60 * 60;

#[contract]
pub struct InvestDeskContract;

#[contractimpl]
impl InvestDeskContract {
    /// Initialize the platform with its super admin.
    pub fn __constructor(env: Env, admin: Address, site_title: String) {
        admin::initialize(&env, &admin, site_title);
    }

    // ─── Admin / Settings ───────────────────────────────────────────

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        admin::get_admin(&env)
    }

    pub fn is_admin(env: Env, addr: Address) -> bool {
        admin::is_admin(&env, &addr)
    }

    /// Grant back-office rights to a staff admin. Super admin only.
    pub fn add_staff(env: Env, admin: Address, staff: Address) -> Result<(), ContractError> {
        admin::add_staff(&env, admin, staff)
    }

    pub fn remove_staff(env: Env, admin: Address, staff: Address) -> Result<(), ContractError> {
        admin::remove_staff(&env, admin, staff)
    }

    /// Hand the super admin role to another address.
    pub fn transfer_admin(
        env: Env,
        admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        admin::transfer_admin(&env, admin, new_admin)
    }

    pub fn get_settings(env: Env) -> Result<Settings, ContractError> {
        admin::get_settings(&env)
    }

    pub fn update_settings(
        env: Env,
        admin: Address,
        settings: Settings,
    ) -> Result<(), ContractError> {
        admin::update_settings(&env, admin, settings)
    }

    /// Dashboard totals and queue sizes.
    pub fn get_stats(env: Env) -> PlatformStats {
        admin::get_stats(&env)
    }

    // ─── Users ──────────────────────────────────────────────────────

    pub fn register(env: Env, user: Address, name: String, email: String) -> Result<(), ContractError> {
        user::register(&env, user, name, email)
    }

    pub fn update_profile(
        env: Env,
        user: Address,
        name: String,
        email: String,
    ) -> Result<(), ContractError> {
        user::update_profile(&env, user, name, email)
    }

    pub fn get_user(env: Env, user: Address) -> Result<User, ContractError> {
        user::get_user(&env, &user)
    }

    /// Users in registration order, starting at position `start` (1-based).
    pub fn get_users(env: Env, start: u64, limit: u32) -> Vec<User> {
        user::get_users(&env, start, limit)
    }

    /// Ban or reactivate a user.
    pub fn set_user_status(
        env: Env,
        admin: Address,
        user: Address,
        status: UserStatus,
    ) -> Result<(), ContractError> {
        user::set_user_status(&env, admin, user, status)
    }

    /// Manually add to or subtract from a user's wallet. Returns the
    /// transaction id.
    pub fn adjust_balance(
        env: Env,
        admin: Address,
        user: Address,
        wallet: Wallet,
        amount: i128,
        add: bool,
        note: String,
    ) -> Result<u64, ContractError> {
        user::adjust_balance(&env, admin, user, wallet, amount, add, note)
    }

    // ─── Ledger ─────────────────────────────────────────────────────

    pub fn get_transaction(env: Env, id: u64) -> Result<Transaction, ContractError> {
        ledger::get_transaction(&env, id)
    }

    /// Transactions with ids from `start`, oldest first.
    pub fn get_transactions(env: Env, start: u64, limit: u32) -> Vec<Transaction> {
        ledger::get_transactions(&env, start, limit)
    }

    /// A user's transactions from position `start` (0-based) of their history.
    pub fn get_user_transactions(
        env: Env,
        user: Address,
        start: u32,
        limit: u32,
    ) -> Vec<Transaction> {
        ledger::get_user_transactions(&env, &user, start, limit)
    }

    // ─── Gateways ───────────────────────────────────────────────────

    /// Configure a deposit gateway or withdraw method.
    pub fn add_gateway(
        env: Env,
        admin: Address,
        purpose: GatewayPurpose,
        config: GatewayConfig,
    ) -> Result<u64, ContractError> {
        gateway::add_gateway(&env, admin, purpose, config)
    }

    pub fn update_gateway(
        env: Env,
        admin: Address,
        id: u64,
        config: GatewayConfig,
    ) -> Result<(), ContractError> {
        gateway::update_gateway(&env, admin, id, config)
    }

    pub fn set_gateway_enabled(
        env: Env,
        admin: Address,
        id: u64,
        enabled: bool,
    ) -> Result<(), ContractError> {
        gateway::set_gateway_enabled(&env, admin, id, enabled)
    }

    pub fn get_gateway(env: Env, id: u64) -> Result<Gateway, ContractError> {
        gateway::get_gateway(&env, id)
    }

    pub fn get_gateways(env: Env, purpose: GatewayPurpose) -> Vec<Gateway> {
        gateway::get_gateways(&env, purpose)
    }

    // ─── Deposits ───────────────────────────────────────────────────

    /// Deposit `amount` platform units through a gateway. `reference` is
    /// an external payment id and can only be used once.
    pub fn deposit(
        env: Env,
        user: Address,
        gateway_id: u64,
        amount: i128,
        reference: Option<String>,
    ) -> Result<u64, ContractError> {
        deposit::deposit(&env, user, gateway_id, amount, reference)
    }

    pub fn approve_deposit(env: Env, admin: Address, id: u64) -> Result<(), ContractError> {
        deposit::approve_deposit(&env, admin, id)
    }

    pub fn reject_deposit(
        env: Env,
        admin: Address,
        id: u64,
        reason: String,
    ) -> Result<(), ContractError> {
        deposit::reject_deposit(&env, admin, id, reason)
    }

    /// Approve queued deposits in order, up to `limit`.
    pub fn approve_pending_deposits(
        env: Env,
        admin: Address,
        limit: u32,
    ) -> Result<u32, ContractError> {
        deposit::approve_pending_deposits(&env, admin, limit)
    }

    pub fn get_deposit(env: Env, id: u64) -> Result<Deposit, ContractError> {
        deposit::get_deposit(&env, id)
    }

    pub fn get_pending_deposits(env: Env) -> Vec<Deposit> {
        deposit::get_pending_deposits(&env)
    }

    /// A user's deposits from position `start` (0-based), oldest first.
    pub fn get_user_deposits(env: Env, user: Address, start: u32, limit: u32) -> Vec<Deposit> {
        deposit::get_user_deposits(&env, user, start, limit)
    }

    // ─── Withdrawals ────────────────────────────────────────────────

    /// Request a withdrawal of `amount` from `wallet`. The charge is
    /// taken on top of the amount.
    pub fn withdraw(
        env: Env,
        user: Address,
        method_id: u64,
        wallet: Wallet,
        amount: i128,
        account: String,
    ) -> Result<u64, ContractError> {
        withdrawal::withdraw(&env, user, method_id, wallet, amount, account)
    }

    pub fn approve_withdrawal(env: Env, admin: Address, id: u64) -> Result<(), ContractError> {
        withdrawal::approve_withdrawal(&env, admin, id)
    }

    /// Reject a withdrawal and refund it to the user.
    pub fn reject_withdrawal(
        env: Env,
        admin: Address,
        id: u64,
        reason: String,
    ) -> Result<(), ContractError> {
        withdrawal::reject_withdrawal(&env, admin, id, reason)
    }

    pub fn approve_pending_withdrawals(
        env: Env,
        admin: Address,
        limit: u32,
    ) -> Result<u32, ContractError> {
        withdrawal::approve_pending_withdrawals(&env, admin, limit)
    }

    pub fn get_withdrawal(env: Env, id: u64) -> Result<Withdrawal, ContractError> {
        withdrawal::get_withdrawal(&env, id)
    }

    pub fn get_pending_withdrawals(env: Env) -> Vec<Withdrawal> {
        withdrawal::get_pending_withdrawals(&env)
    }

    pub fn get_user_withdrawals(
        env: Env,
        user: Address,
        start: u32,
        limit: u32,
    ) -> Vec<Withdrawal> {
        withdrawal::get_user_withdrawals(&env, user, start, limit)
    }

    // ─── Schemas ────────────────────────────────────────────────────

    pub fn add_schema(env: Env, admin: Address, terms: SchemaTerms) -> Result<u64, ContractError> {
        schema::add_schema(&env, admin, terms)
    }

    pub fn update_schema(
        env: Env,
        admin: Address,
        id: u64,
        terms: SchemaTerms,
    ) -> Result<(), ContractError> {
        schema::update_schema(&env, admin, id, terms)
    }

    pub fn set_schema_enabled(
        env: Env,
        admin: Address,
        id: u64,
        enabled: bool,
    ) -> Result<(), ContractError> {
        schema::set_schema_enabled(&env, admin, id, enabled)
    }

    pub fn get_schema(env: Env, id: u64) -> Result<Schema, ContractError> {
        schema::get_schema(&env, id)
    }

    pub fn get_schemas(env: Env) -> Vec<Schema> {
        schema::get_schemas(&env)
    }

    // ─── Invests / Profit ───────────────────────────────────────────

    pub fn invest(
        env: Env,
        user: Address,
        schema_id: u64,
        wallet: Wallet,
        amount: i128,
    ) -> Result<u64, ContractError> {
        invest::invest(&env, user, schema_id, wallet, amount)
    }

    /// Pay out every profit period that has fallen due. Anyone can call this.
    pub fn collect_profit(env: Env, invest_id: u64) -> Result<u32, ContractError> {
        invest::collect_profit(&env, invest_id)
    }

    /// Manual profit distribution: pay `periods` periods immediately.
    pub fn distribute_profit(
        env: Env,
        admin: Address,
        invest_id: u64,
        periods: u32,
    ) -> Result<u32, ContractError> {
        invest::distribute_profit(&env, admin, invest_id, periods)
    }

    pub fn cancel_invest(
        env: Env,
        admin: Address,
        invest_id: u64,
        refund_capital: bool,
    ) -> Result<(), ContractError> {
        invest::cancel_invest(&env, admin, invest_id, refund_capital)
    }

    pub fn get_invest(env: Env, id: u64) -> Result<Invest, ContractError> {
        invest::get_invest(&env, id)
    }

    pub fn get_user_invests(env: Env, user: Address, start: u32, limit: u32) -> Vec<Invest> {
        invest::get_user_invests(&env, user, start, limit)
    }

    pub fn get_invests(env: Env, start: u64, limit: u32) -> Vec<Invest> {
        invest::get_invests(&env, start, limit)
    }

    // ─── Mail Templates ─────────────────────────────────────────────

    /// Create or replace a template. A new template starts enabled.
    pub fn upsert_template(
        env: Env,
        admin: Address,
        code: Symbol,
        name: String,
        subject: String,
        body: String,
    ) -> Result<(), ContractError> {
        template::upsert_template(&env, admin, code, name, subject, body)
    }

    pub fn set_template_enabled(
        env: Env,
        admin: Address,
        code: Symbol,
        enabled: bool,
    ) -> Result<(), ContractError> {
        template::set_template_enabled(&env, admin, code, enabled)
    }

    pub fn get_template(env: Env, code: Symbol) -> Result<MailTemplate, ContractError> {
        template::get_template(&env, code)
    }

    pub fn get_template_codes(env: Env) -> Vec<Symbol> {
        template::get_template_codes(&env)
    }

    /// Fill a template's `[[shortcode]]` placeholders from `values`.
    pub fn render_template(
        env: Env,
        code: Symbol,
        values: Map<String, String>,
    ) -> Result<RenderedMail, ContractError> {
        template::render_template(&env, code, values)
    }

    // ─── Support Tickets ────────────────────────────────────────────

    pub fn open_ticket(
        env: Env,
        user: Address,
        title: String,
        message: String,
        priority: TicketPriority,
    ) -> Result<u64, ContractError> {
        ticket::open_ticket(&env, user, title, message, priority)
    }

    /// Reply as the ticket owner or as an admin.
    pub fn reply_ticket(
        env: Env,
        author: Address,
        id: u64,
        message: String,
    ) -> Result<(), ContractError> {
        ticket::reply_ticket(&env, author, id, message)
    }

    pub fn close_ticket(env: Env, caller: Address, id: u64) -> Result<(), ContractError> {
        ticket::close_ticket(&env, caller, id)
    }

    pub fn reopen_ticket(env: Env, caller: Address, id: u64) -> Result<(), ContractError> {
        ticket::reopen_ticket(&env, caller, id)
    }

    pub fn get_ticket(env: Env, id: u64) -> Result<Ticket, ContractError> {
        ticket::get_ticket(&env, id)
    }

    pub fn get_ticket_messages(env: Env, id: u64) -> Result<Vec<TicketMessage>, ContractError> {
        ticket::get_ticket_messages(&env, id)
    }

    pub fn get_user_tickets(env: Env, user: Address, start: u32, limit: u32) -> Vec<Ticket> {
        ticket::get_user_tickets(&env, user, start, limit)
    }

    pub fn get_open_tickets(env: Env) -> Vec<Ticket> {
        ticket::get_open_tickets(&env)
    }
}

#[cfg(test)]
mod test_invest;
