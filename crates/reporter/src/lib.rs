use crate::error::ReporterError;
use analytics::{
    checked_total, CategoryTotal, FinancialEngine, FinancialSummaryReport, PeriodTotals,
    SummaryInput, TimeSeriesPoint,
};
use chrono::NaiveDate;
use core_types::{DateRange, Period};
use database::PortfolioStore;
use serde::Deserialize;

pub mod error;

/// The query accepted by the portfolio endpoints and the `summary` command.
///
/// Missing or blank dates fall back to the current calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    #[serde(default, deserialize_with = "core_types::optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "core_types::optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub period: Period,
}

impl SummaryRequest {
    pub fn resolve_range(&self, today: NaiveDate) -> Result<DateRange, ReporterError> {
        Ok(DateRange::resolve(self.start_date, self.end_date, today)?)
    }
}

/// Fetches ledger rows from a `PortfolioStore` and runs them through the
/// `FinancialEngine`.
#[derive(Debug, Default)]
pub struct Reporter {
    engine: FinancialEngine,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the full portfolio financial summary for the requested window,
    /// including the comparison against the window just before it.
    pub async fn financial_summary(
        &self,
        store: &dyn PortfolioStore,
        request: &SummaryRequest,
        today: NaiveDate,
    ) -> Result<FinancialSummaryReport, ReporterError> {
        let range = request.resolve_range(today)?;
        let prior = range.previous()?;

        // 1. Fetch current and prior windows concurrently
        let (properties, income, expenses, prior_income, prior_expenses) = tokio::try_join!(
            store.list_properties(),
            store.list_income(range),
            store.list_expenses(range),
            store.list_income(prior),
            store.list_expenses(prior),
        )?;

        tracing::info!(
            start = %range.start,
            end = %range.end,
            period = %request.period,
            properties = properties.len(),
            "Building portfolio financial summary."
        );

        // 2. Reduce the prior window to totals
        let previous = PeriodTotals::from_rows(&prior_income, &prior_expenses)?;

        // 3. Summarise
        let report = self.engine.summarize(&SummaryInput {
            range,
            period: request.period,
            properties: &properties,
            income: &income,
            expenses: &expenses,
            previous,
        })?;

        Ok(report)
    }

    /// Income, expenses and cash flow per calendar bucket of the window.
    pub async fn cash_flow_series(
        &self,
        store: &dyn PortfolioStore,
        request: &SummaryRequest,
        today: NaiveDate,
    ) -> Result<Vec<TimeSeriesPoint>, ReporterError> {
        let range = request.resolve_range(today)?;
        let (income, expenses) = tokio::try_join!(store.list_income(range), store.list_expenses(range))?;

        let income: Vec<_> = income.iter().filter(|r| range.contains(r.date)).collect();
        let expenses: Vec<_> = expenses.iter().filter(|r| range.contains(r.date)).collect();
        Ok(self.engine.time_series(&range, request.period, &income, &expenses)?)
    }

    /// Expenses of the window grouped by category, largest first.
    pub async fn expense_breakdown(
        &self,
        store: &dyn PortfolioStore,
        request: &SummaryRequest,
        today: NaiveDate,
    ) -> Result<Vec<CategoryTotal>, ReporterError> {
        let range = request.resolve_range(today)?;
        let expenses = store.list_expenses(range).await?;

        let rows: Vec<_> = expenses.iter().filter(|r| range.contains(r.date)).collect();
        let total = checked_total(rows.iter().map(|r| r.amount))?;
        Ok(self.engine.by_category(&rows, total)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{NewLedgerEntry, NewProperty};
    use database::InMemoryStore;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn book(store: &InMemoryStore, property_id: Uuid, income: bool, amount: Decimal, category: &str, on: NaiveDate) {
        let entry = NewLedgerEntry {
            property_id,
            amount,
            category: category.to_string(),
            date: on,
            description: None,
        };
        if income {
            store.create_income(entry).await.unwrap();
        } else {
            store.create_expense(entry).await.unwrap();
        }
    }

    async fn seeded_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        let house = store
            .create_property(NewProperty {
                name: "Maple House".to_string(),
                address: "9 Maple Road".to_string(),
                purchase_price: dec!(200000),
                current_value: Some(dec!(216000)),
            })
            .await
            .unwrap();

        // February, the prior window for March.
        book(&store, house.id, true, dec!(1000), "rent", date(2024, 2, 1)).await;
        book(&store, house.id, false, dec!(500), "maintenance", date(2024, 2, 12)).await;

        // March.
        book(&store, house.id, true, dec!(1000), "rent", date(2024, 3, 1)).await;
        book(&store, house.id, true, dec!(200), "late_fees", date(2024, 3, 8)).await;
        book(&store, house.id, false, dec!(300), "maintenance", date(2024, 3, 20)).await;
        store
    }

    #[tokio::test]
    async fn summary_compares_against_prior_window() {
        let store = seeded_store().await;
        let request = SummaryRequest {
            start_date: Some(date(2024, 3, 1)),
            end_date: Some(date(2024, 3, 31)),
            period: Period::Monthly,
        };

        let report = Reporter::new()
            .financial_summary(&store, &request, date(2024, 6, 1))
            .await
            .unwrap();

        let s = &report.summary;
        assert_eq!(s.total_income, dec!(1200));
        assert_eq!(s.total_expenses, dec!(300));
        assert_eq!(s.net_cash_flow, dec!(900));
        assert_eq!(s.portfolio_value, dec!(216000));
        assert_eq!(s.portfolio_roi, dec!(5));
        assert_eq!(s.income_change_percent, dec!(20));
        assert_eq!(s.expenses_change_percent, dec!(-40));
        // 900 against 500.
        assert_eq!(s.cash_flow_change_percent, dec!(80));
        assert_eq!(report.property_roi.len(), 1);
        assert_eq!(report.property_roi[0].roi, dec!(5));
    }

    #[tokio::test]
    async fn defaults_to_current_month() {
        let store = seeded_store().await;
        let report = Reporter::new()
            .financial_summary(&store, &SummaryRequest::default(), date(2024, 2, 15))
            .await
            .unwrap();

        assert_eq!(report.summary.total_income, dec!(1000));
        assert_eq!(report.summary.total_expenses, dec!(500));
        assert_eq!(report.time_series_data.len(), 1);
        assert_eq!(report.time_series_data[0].period, "2024-02");
    }

    #[tokio::test]
    async fn inverted_range_is_a_client_error() {
        let store = seeded_store().await;
        let request = SummaryRequest {
            start_date: Some(date(2024, 4, 1)),
            end_date: Some(date(2024, 3, 1)),
            period: Period::Monthly,
        };

        let err = Reporter::new()
            .financial_summary(&store, &request, date(2024, 6, 1))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let store = InMemoryStore::failing();
        let err = Reporter::new()
            .financial_summary(&store, &SummaryRequest::default(), date(2024, 6, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ReporterError::Database(_)));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn quarterly_cash_flow_and_expense_breakdown() {
        let store = seeded_store().await;
        let request = SummaryRequest {
            start_date: Some(date(2024, 1, 1)),
            end_date: Some(date(2024, 6, 30)),
            period: Period::Quarterly,
        };
        let reporter = Reporter::new();

        let series = reporter.cash_flow_series(&store, &request, date(2024, 7, 1)).await.unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].period, "2024-Q1");
        assert_eq!(series[0].income, dec!(2200));
        assert_eq!(series[0].expenses, dec!(800));
        assert_eq!(series[0].cash_flow, dec!(1400));
        assert_eq!(series[1].cash_flow, Decimal::ZERO);

        let breakdown = reporter.expense_breakdown(&store, &request, date(2024, 7, 1)).await.unwrap();
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].category, "maintenance");
        assert_eq!(breakdown[0].amount, dec!(800));
        assert_eq!(breakdown[0].percentage, dec!(100));
    }

    #[tokio::test]
    async fn arithmetic_overflow_is_a_server_error() {
        let store = seeded_store().await;
        let house = store.list_properties().await.unwrap()[0].id;
        book(&store, house, true, dec!(7000000000000000000000000000), "rent", date(2024, 3, 2)).await;
        let request = SummaryRequest {
            start_date: Some(date(2024, 3, 1)),
            end_date: Some(date(2024, 3, 31)),
            period: Period::Monthly,
        };

        let err = Reporter::new()
            .financial_summary(&store, &request, date(2024, 6, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ReporterError::Analytics(_)));
        assert!(!err.is_client_error());
    }
}
