use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Largest amount a ledger or price column holds (`NUMERIC(14, 2)`).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, 2);

/// Amounts are stored to the cent.
pub const AMOUNT_SCALE: u32 = 2;

/// A property held in the landlord's portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub purchase_price: Decimal,
    /// The latest appraisal, when one has been recorded.
    pub current_value: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Property {
    /// The value used for ROI calculations: the latest appraisal, falling back
    /// to the purchase price.
    pub fn valuation(&self) -> Decimal {
        self.current_value.unwrap_or(self.purchase_price)
    }
}

/// A single income booking (rent, late fees, deposits kept, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IncomeRecord {
    pub id: Uuid,
    pub property_id: Uuid,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub description: Option<String>,
}

/// A single expense booking (maintenance, taxes, insurance, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: Uuid,
    pub property_id: Uuid,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub description: Option<String>,
}

/// Common view over income and expense rows for the aggregation code.
pub trait LedgerEntry {
    fn property_id(&self) -> Uuid;
    fn amount(&self) -> Decimal;
    fn category(&self) -> &str;
}

impl LedgerEntry for IncomeRecord {
    fn property_id(&self) -> Uuid {
        self.property_id
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn category(&self) -> &str {
        &self.category
    }
}

impl LedgerEntry for ExpenseRecord {
    fn property_id(&self) -> Uuid {
        self.property_id
    }
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn category(&self) -> &str {
        &self.category
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub name: String,
    pub address: String,
    pub purchase_price: Decimal,
    #[serde(default)]
    pub current_value: Option<Decimal>,
}

impl NewProperty {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("name", &self.name)?;
        require_amount("purchasePrice", self.purchase_price)?;
        if let Some(value) = self.current_value {
            require_amount("currentValue", value)?;
        }
        Ok(())
    }
}

/// Creation payload shared by income and expense rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLedgerEntry {
    pub property_id: Uuid,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

pub type NewIncome = NewLedgerEntry;
pub type NewExpense = NewLedgerEntry;

impl NewLedgerEntry {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("category", &self.category)?;
        require_amount("amount", self.amount)
    }
}

fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidInput(field.to_string(), "must not be empty".to_string()));
    }
    Ok(())
}

fn require_amount(field: &str, value: Decimal) -> Result<(), CoreError> {
    if value < Decimal::ZERO {
        return Err(CoreError::InvalidInput(field.to_string(), format!("must not be negative, got {}", value)));
    }
    if value > MAX_AMOUNT {
        return Err(CoreError::InvalidInput(field.to_string(), format!("must not exceed {}, got {}", MAX_AMOUNT, value)));
    }
    if value.normalize().scale() > AMOUNT_SCALE {
        return Err(CoreError::InvalidInput(
            field.to_string(),
            format!("must have at most {} decimal places, got {}", AMOUNT_SCALE, value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn valuation_prefers_current_value() {
        let mut property = Property {
            id: Uuid::new_v4(),
            name: "Elm Street".to_string(),
            address: "12 Elm Street".to_string(),
            purchase_price: dec!(200000),
            current_value: None,
            created_at: Utc::now(),
        };
        assert_eq!(property.valuation(), dec!(200000));
        property.current_value = Some(dec!(250000));
        assert_eq!(property.valuation(), dec!(250000));
    }

    #[test]
    fn ledger_entry_validation() {
        let mut entry = NewLedgerEntry {
            property_id: Uuid::new_v4(),
            amount: dec!(1000),
            category: "rent".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: None,
        };
        assert!(entry.validate().is_ok());

        entry.amount = dec!(-1);
        assert!(entry.validate().is_err());

        entry.amount = dec!(0);
        entry.category = "  ".to_string();
        assert!(entry.validate().is_err());
    }

    #[test]
    fn max_amount_matches_column_limit() {
        assert_eq!(MAX_AMOUNT, dec!(999999999999.99));
    }

    #[test]
    fn amounts_are_bounded_to_the_cent() {
        let mut entry = NewLedgerEntry {
            property_id: Uuid::new_v4(),
            amount: MAX_AMOUNT,
            category: "rent".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: None,
        };
        assert!(entry.validate().is_ok());

        entry.amount = dec!(10.50000);
        assert!(entry.validate().is_ok());

        entry.amount = dec!(10.005);
        let err = entry.validate().unwrap_err();
        assert!(err.to_string().contains("decimal places"));

        entry.amount = dec!(1000000000000);
        assert!(entry.validate().unwrap_err().to_string().contains("must not exceed"));

        entry.amount = dec!(7000000000000000000000000000);
        assert!(entry.validate().is_err());

        let property = NewProperty {
            name: "Elm".to_string(),
            address: "1 Elm".to_string(),
            purchase_price: dec!(250000),
            current_value: Some(dec!(1000000000000000)),
        };
        assert!(matches!(property.validate(), Err(CoreError::InvalidInput(field, _)) if field == "currentValue"));
    }

    #[test]
    fn new_property_rejects_blank_name() {
        let property = NewProperty {
            name: String::new(),
            address: "1 Main".to_string(),
            purchase_price: dec!(1),
            current_value: None,
        };
        assert!(matches!(property.validate(), Err(CoreError::InvalidInput(field, _)) if field == "name"));
    }

    #[test]
    fn ledger_payload_reads_camel_case_json() {
        let json = r#"{"propertyId":"6f1c1e3e-3c1f-4b8e-9a55-0d6f7b0f2a10","amount":1250.5,"category":"rent","date":"2024-03-01"}"#;
        let entry: NewLedgerEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.amount, dec!(1250.5));
        assert_eq!(entry.description, None);
    }
}
