use crate::store::PortfolioStore;
use crate::DbError;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{
    DateRange, ExpenseRecord, IncomeRecord, NewExpense, NewIncome, NewProperty, Property,
};
use sqlx::postgres::PgPool;
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a foreign-key violation on `property_id` to a domain error.
fn map_ledger_insert_error(err: sqlx::Error, property_id: Uuid) -> DbError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            DbError::UnknownProperty(property_id)
        }
        _ => err.into(),
    }
}

#[async_trait]
impl PortfolioStore for DbRepository {
    async fn list_properties(&self) -> Result<Vec<Property>, DbError> {
        let properties = sqlx::query_as::<_, Property>(
            "SELECT id, name, address, purchase_price, current_value, created_at FROM properties ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(properties)
    }

    async fn get_property(&self, id: Uuid) -> Result<Property, DbError> {
        sqlx::query_as::<_, Property>(
            "SELECT id, name, address, purchase_price, current_value, created_at FROM properties WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::NotFound)
    }

    async fn create_property(&self, property: NewProperty) -> Result<Property, DbError> {
        let created = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (id, name, address, purchase_price, current_value, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, address, purchase_price, current_value, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&property.name)
        .bind(&property.address)
        .bind(property.purchase_price)
        .bind(property.current_value)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(property_id = %created.id, name = %created.name, "Property created.");
        Ok(created)
    }

    async fn list_income(&self, range: DateRange) -> Result<Vec<IncomeRecord>, DbError> {
        let rows = sqlx::query_as::<_, IncomeRecord>(
            r#"
            SELECT id, property_id, amount, category, date, description
            FROM income
            WHERE date >= $1 AND date <= $2
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_income(&self, income: NewIncome) -> Result<IncomeRecord, DbError> {
        sqlx::query_as::<_, IncomeRecord>(
            r#"
            INSERT INTO income (id, property_id, amount, category, date, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, property_id, amount, category, date, description
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(income.property_id)
        .bind(income.amount)
        .bind(&income.category)
        .bind(income.date)
        .bind(&income.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_ledger_insert_error(e, income.property_id))
    }

    async fn list_expenses(&self, range: DateRange) -> Result<Vec<ExpenseRecord>, DbError> {
        let rows = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            SELECT id, property_id, amount, category, date, description
            FROM expenses
            WHERE date >= $1 AND date <= $2
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_expense(&self, expense: NewExpense) -> Result<ExpenseRecord, DbError> {
        sqlx::query_as::<_, ExpenseRecord>(
            r#"
            INSERT INTO expenses (id, property_id, amount, category, date, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, property_id, amount, category, date, description
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(expense.property_id)
        .bind(expense.amount)
        .bind(&expense.category)
        .bind(expense.date)
        .bind(&expense.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_ledger_insert_error(e, expense.property_id))
    }
}
