use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The complete financial summary of a portfolio over one date range.
///
/// Serialised with camelCase keys; this is the body of
/// `GET /api/portfolio/financial-summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummaryReport {
    pub summary: SummaryTotals,
    pub income_by_category: Vec<CategoryTotal>,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub income_by_property: Vec<PropertyTotal>,
    pub expenses_by_property: Vec<PropertyTotal>,
    pub property_roi: Vec<PropertyRoi>,
    pub time_series_data: Vec<TimeSeriesPoint>,
}

/// Headline figures for the selected range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_cash_flow: Decimal,
    pub portfolio_value: Decimal,
    /// Annualised net cash flow over portfolio value, in percent.
    pub portfolio_roi: Decimal,
    pub income_change_percent: Decimal,
    pub expenses_change_percent: Decimal,
    pub cash_flow_change_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
    /// Share of the grand total, in percent.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyTotal {
    pub property_id: Uuid,
    pub property_name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRoi {
    pub property_id: Uuid,
    pub property_name: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net_cash_flow: Decimal,
    pub property_value: Decimal,
    pub roi: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Bucket key such as `2024-01`, `2024-Q1` or `2024`.
    pub period: String,
    pub label: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub cash_flow: Decimal,
}
