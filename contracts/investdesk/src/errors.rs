use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    Unauthorized = 2,
    InvalidAmount = 3,
    Overflow = 4,
    InsufficientBalance = 5,
    FeatureDisabled = 6,
    InvalidSettings = 7,
    // Users
    UserExists = 10,
    UserNotFound = 11,
    UserBanned = 12,
    // Gateways
    GatewayNotFound = 20,
    GatewayDisabled = 21,
    InvalidGateway = 22,
    AmountOutOfRange = 23,
    // Deposits / withdrawals
    DepositNotFound = 30,
    WithdrawalNotFound = 31,
    NotPending = 32,
    DuplicateReference = 33,
    InvalidReference = 34,
    // Schemas / invests
    SchemaNotFound = 40,
    SchemaDisabled = 41,
    InvalidSchema = 42,
    InvestNotFound = 43,
    InvestNotOngoing = 44,
    NoProfitDue = 45,
    // Templates
    TemplateNotFound = 50,
    TemplateTooLarge = 51,
    MalformedTemplate = 52,
    // Tickets
    TicketNotFound = 60,
    TicketClosed = 61,
    TicketNotClosed = 62,
    EmptyMessage = 63,
    // Ledger
    TransactionNotFound = 70,
}
