pub mod dates;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use dates::{optional_date, DateRange, PeriodBucket};
pub use enums::Period;
pub use error::CoreError;
pub use structs::{
    ExpenseRecord, IncomeRecord, LedgerEntry, NewExpense, NewIncome, NewLedgerEntry, NewProperty,
    Property, MAX_AMOUNT,
};
