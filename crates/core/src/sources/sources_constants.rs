/// Bank transaction type tags
pub mod bank_transaction_types {
    pub const CREDIT: &str = "CREDIT";
    pub const DEBIT: &str = "DEBIT";
}

/// Tank transaction type tags
pub mod tank_transaction_types {
    pub const ADDITION: &str = "ADDITION";
    pub const REMOVAL: &str = "REMOVAL";
}

/// Supplier transaction type tags
pub mod supplier_transaction_types {
    pub const PURCHASE: &str = "PURCHASE";
    pub const PAYMENT: &str = "PAYMENT";
}

/// Customer transaction type tags
pub mod customer_transaction_types {
    pub const BILL: &str = "BILL";
    pub const CREDIT: &str = "CREDIT";
    pub const PAYMENT: &str = "PAYMENT";
    pub const DEBIT: &str = "DEBIT";
}
