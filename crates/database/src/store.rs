use crate::DbError;
use async_trait::async_trait;
use core_types::{
    DateRange, ExpenseRecord, IncomeRecord, NewExpense, NewIncome, NewProperty, Property,
};
use uuid::Uuid;

/// Data access used by the reporter and the HTTP handlers.
///
/// `DbRepository` is the production implementation; `InMemoryStore` (behind
/// the `test-util` feature) backs the tests.
#[async_trait]
pub trait PortfolioStore: Send + Sync + std::fmt::Debug + 'static {
    /// All properties, ordered by name.
    async fn list_properties(&self) -> Result<Vec<Property>, DbError>;

    /// Fails with `DbError::NotFound` when the id is unknown.
    async fn get_property(&self, id: Uuid) -> Result<Property, DbError>;

    async fn create_property(&self, property: NewProperty) -> Result<Property, DbError>;

    /// Income rows dated inside `range` (inclusive), oldest first.
    async fn list_income(&self, range: DateRange) -> Result<Vec<IncomeRecord>, DbError>;

    /// Fails with `DbError::UnknownProperty` when the row references a missing property.
    async fn create_income(&self, income: NewIncome) -> Result<IncomeRecord, DbError>;

    /// Expense rows dated inside `range` (inclusive), oldest first.
    async fn list_expenses(&self, range: DateRange) -> Result<Vec<ExpenseRecord>, DbError>;

    async fn create_expense(&self, expense: NewExpense) -> Result<ExpenseRecord, DbError>;
}
