use crate::store::PortfolioStore;
use crate::DbError;
use async_trait::async_trait;
use chrono::Utc;
use core_types::{
    DateRange, ExpenseRecord, IncomeRecord, NewExpense, NewIncome, NewProperty, Property,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    properties: Vec<Property>,
    income: Vec<IncomeRecord>,
    expenses: Vec<ExpenseRecord>,
}

/// A `PortfolioStore` held entirely in memory, with the same ordering and
/// referential checks as the PostgreSQL repository.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    fail_reads: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every read fails, for exercising error paths.
    pub fn failing() -> Self {
        Self { fail_reads: true, ..Self::default() }
    }

    fn check_reads(&self) -> Result<(), DbError> {
        if self.fail_reads {
            return Err(DbError::ConnectionError(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl PortfolioStore for InMemoryStore {
    async fn list_properties(&self) -> Result<Vec<Property>, DbError> {
        self.check_reads()?;
        let mut properties = self.tables.read().await.properties.clone();
        properties.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(properties)
    }

    async fn get_property(&self, id: Uuid) -> Result<Property, DbError> {
        self.check_reads()?;
        self.tables
            .read()
            .await
            .properties
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(DbError::NotFound)
    }

    async fn create_property(&self, property: NewProperty) -> Result<Property, DbError> {
        let created = Property {
            id: Uuid::new_v4(),
            name: property.name,
            address: property.address,
            purchase_price: property.purchase_price,
            current_value: property.current_value,
            created_at: Utc::now(),
        };
        self.tables.write().await.properties.push(created.clone());
        Ok(created)
    }

    async fn list_income(&self, range: DateRange) -> Result<Vec<IncomeRecord>, DbError> {
        self.check_reads()?;
        let mut rows: Vec<IncomeRecord> = self
            .tables
            .read()
            .await
            .income
            .iter()
            .filter(|row| range.contains(row.date))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn create_income(&self, income: NewIncome) -> Result<IncomeRecord, DbError> {
        let mut tables = self.tables.write().await;
        if !tables.properties.iter().any(|p| p.id == income.property_id) {
            return Err(DbError::UnknownProperty(income.property_id));
        }
        let row = IncomeRecord {
            id: Uuid::new_v4(),
            property_id: income.property_id,
            amount: income.amount,
            category: income.category,
            date: income.date,
            description: income.description,
        };
        tables.income.push(row.clone());
        Ok(row)
    }

    async fn list_expenses(&self, range: DateRange) -> Result<Vec<ExpenseRecord>, DbError> {
        self.check_reads()?;
        let mut rows: Vec<ExpenseRecord> = self
            .tables
            .read()
            .await
            .expenses
            .iter()
            .filter(|row| range.contains(row.date))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn create_expense(&self, expense: NewExpense) -> Result<ExpenseRecord, DbError> {
        let mut tables = self.tables.write().await;
        if !tables.properties.iter().any(|p| p.id == expense.property_id) {
            return Err(DbError::UnknownProperty(expense.property_id));
        }
        let row = ExpenseRecord {
            id: Uuid::new_v4(),
            property_id: expense.property_id,
            amount: expense.amount,
            category: expense.category,
            date: expense.date,
            description: expense.description,
        };
        tables.expenses.push(row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::NewLedgerEntry;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn rejects_rows_for_unknown_property() {
        let store = InMemoryStore::new();
        let err = store
            .create_income(NewLedgerEntry {
                property_id: Uuid::new_v4(),
                amount: dec!(100),
                category: "rent".to_string(),
                date: date(2024, 1, 1),
                description: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UnknownProperty(_)));
    }

    #[tokio::test]
    async fn lists_rows_inside_range_oldest_first() {
        let store = InMemoryStore::new();
        let property = store
            .create_property(NewProperty {
                name: "Birch Court".to_string(),
                address: "4 Birch Court".to_string(),
                purchase_price: dec!(150000),
                current_value: None,
            })
            .await
            .unwrap();

        for (day, amount) in [(20, dec!(30)), (2, dec!(10)), (40, dec!(99))] {
            let on = date(2024, 3, 1) + chrono::Duration::days(day - 1);
            store
                .create_expense(NewLedgerEntry {
                    property_id: property.id,
                    amount,
                    category: "repairs".to_string(),
                    date: on,
                    description: None,
                })
                .await
                .unwrap();
        }

        let march = DateRange::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        let rows = store.list_expenses(march).await.unwrap();
        let amounts: Vec<_> = rows.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![dec!(10), dec!(30)]);
        assert_eq!(store.get_property(property.id).await.unwrap().name, "Birch Court");
        assert!(matches!(store.get_property(Uuid::new_v4()).await, Err(DbError::NotFound)));
    }
}
