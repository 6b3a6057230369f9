use soroban_sdk::{contracttype, Address, String, Symbol};

// ─── Configuration ──────────────────────────────────────────────────

/// Platform-wide switches, editable by the super admin.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub site_title: String,
    pub deposit_enabled: bool,
    pub withdraw_enabled: bool,
    pub invest_enabled: bool,
    pub tickets_enabled: bool,
    /// Upper bound on profit periods paid by a single `collect_profit` call.
    pub profit_batch_limit: u32,
}

/// Running platform totals, updated in the same invocation as the
/// ledger entries they summarise.
#[contracttype]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlatformTotals {
    pub total_deposited: i128,
    pub total_withdrawn: i128,
    pub total_invested: i128,
    pub total_profit: i128,
}

/// Dashboard view returned by `get_stats`.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct PlatformStats {
    pub users: u64,
    pub total_deposited: i128,
    pub total_withdrawn: i128,
    pub total_invested: i128,
    pub total_profit: i128,
    pub pending_deposits: u32,
    pub pending_withdrawals: u32,
    pub open_tickets: u32,
}

// ─── Users ──────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Banned,
}

/// Which of a user's two balances an entry touches.
#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wallet {
    Main,   // Deposits and returned capital
    Profit, // Interest from investments
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub address: Address,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub balance: i128,
    pub profit_balance: i128,
    pub total_deposit: i128,
    pub total_withdraw: i128,
    pub total_invest: i128,
    pub total_profit: i128,
    pub joined_at: u64,
}

// ─── Ledger ─────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxnKind {
    Deposit,
    ManualDeposit,
    Withdraw,
    Refund,
    Invest,
    Interest,
    CapitalBack,
    AddBalance,
    SubtractBalance,
}

/// One append-only ledger line. `balance_after` is the wallet balance
/// once this entry was applied.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub id: u64,
    pub user: Address,
    pub kind: TxnKind,
    pub wallet: Wallet,
    pub amount: i128,
    pub charge: i128,
    pub balance_after: i128,
    pub method: String,
    pub note: String,
    /// Deposit, withdrawal or invest id this entry belongs to (0 if none).
    pub related_id: u64,
    pub created_at: u64,
}

// ─── Gateways ───────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatewayPurpose {
    Deposit,
    Withdraw,
}

/// How a gateway settles funds.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub enum GatewayKind {
    /// Settled on-chain in the given Stellar token.
    Automatic(Address),
    /// Settled off-chain; an admin confirms each request.
    Manual,
}

#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChargeType {
    Fixed,
    Percent, // basis points
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct GatewayConfig {
    pub name: String,
    pub kind: GatewayKind,
    pub currency: String,
    pub charge: i128,
    pub charge_type: ChargeType,
    pub minimum: i128,
    pub maximum: i128,
    /// Gateway currency per platform unit, scaled by `RATE_SCALE`.
    pub rate: i128,
    pub auto_approve: bool,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Gateway {
    pub id: u64,
    pub purpose: GatewayPurpose,
    pub config: GatewayConfig,
    pub enabled: bool,
}

// ─── Deposits / Withdrawals ─────────────────────────────────────────

#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Deposit {
    pub id: u64,
    pub user: Address,
    pub gateway_id: u64,
    pub amount: i128,
    pub charge: i128,
    /// What the user pays in the gateway currency.
    pub pay_amount: i128,
    pub reference: Option<String>,
    pub status: RequestStatus,
    pub note: String,
    pub created_at: u64,
    pub processed_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Withdrawal {
    pub id: u64,
    pub user: Address,
    pub method_id: u64,
    pub wallet: Wallet,
    pub amount: i128,
    pub charge: i128,
    /// What the user receives in the method currency.
    pub pay_amount: i128,
    /// Settlement kind of the method when the request was made.
    pub kind: GatewayKind,
    pub account: String,
    pub status: RequestStatus,
    pub note: String,
    pub created_at: u64,
    pub processed_at: u64,
}

// ─── Schemas / Invests ──────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaAmount {
    Fixed(i128),
    Range(i128, i128),
}

/// Profit paid per period.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub enum Interest {
    Percent(u32),
    Fixed(i128),
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub enum ReturnType {
    Period(u32),
    Lifetime,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaTerms {
    pub name: String,
    pub amount: SchemaAmount,
    pub interest: Interest,
    pub period_secs: u64,
    pub return_type: ReturnType,
    pub capital_back: bool,
    pub featured: bool,
}

/// An investment plan.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    pub id: u64,
    pub terms: SchemaTerms,
    pub enabled: bool,
    pub created_at: u64,
}

#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvestStatus {
    Ongoing,
    Completed,
    Canceled,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Invest {
    pub id: u64,
    pub user: Address,
    pub schema_id: u64,
    pub wallet: Wallet,
    pub amount: i128,
    /// Profit per period, fixed when the invest is created.
    pub interest: i128,
    pub period_secs: u64,
    /// Zero for lifetime plans.
    pub total_periods: u32,
    pub paid_periods: u32,
    pub total_profit: i128,
    pub capital_back: bool,
    pub next_profit_at: u64,
    pub last_profit_at: u64,
    pub status: InvestStatus,
    pub created_at: u64,
}

// ─── Templates ──────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct MailTemplate {
    pub code: Symbol,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub enabled: bool,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMail {
    pub subject: String,
    pub body: String,
}

// ─── Tickets ────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketStatus {
    Open,     // Waiting on staff
    Answered, // Waiting on the user
    Closed,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Ticket {
    pub id: u64,
    pub user: Address,
    pub title: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub messages: u32,
    pub created_at: u64,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct TicketMessage {
    pub author: Address,
    pub from_admin: bool,
    pub body: String,
    pub created_at: u64,
}

/// Per-user record lists, kept as one entry per key.
#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryKind {
    Txns,
    Deposits,
    Withdrawals,
    Invests,
    Tickets,
}

/// Storage keys for all contract data.
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Staff(Address),
    Settings,
    Totals,
    // Users
    UserCount,
    User(Address),
    UserAt(u64),
    HistoryLen(Address, HistoryKind),
    HistoryEntry(Address, HistoryKind, u32),
    // Ledger
    TxnCounter,
    Txn(u64),
    UsedRef(String),
    // Gateways
    GatewayCounter,
    Gateway(u64),
    GatewayIds(GatewayPurpose),
    // Deposits
    DepositCounter,
    Deposit(u64),
    PendingDeposits,
    // Withdrawals
    WithdrawalCounter,
    Withdrawal(u64),
    PendingWithdrawals,
    // Schemas / invests
    SchemaCounter,
    Schema(u64),
    InvestCounter,
    Invest(u64),
    // Templates
    Template(Symbol),
    TemplateCodes,
    // Tickets
    TicketCounter,
    Ticket(u64),
    TicketMessage(u64, u32),
    OpenTickets,
}
