use crate::error::AnalyticsError;
use crate::metrics::{
    accumulate, checked_total, percentage_change, roi_percent, share_percent, PeriodTotals,
};
use crate::report::{
    CategoryTotal, FinancialSummaryReport, PropertyRoi, PropertyTotal, SummaryTotals,
    TimeSeriesPoint,
};
use chrono::NaiveDate;
use core_types::{DateRange, ExpenseRecord, IncomeRecord, LedgerEntry, Period, Property};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

pub const UNKNOWN_PROPERTY: &str = "Unknown property";

/// Everything the engine needs to summarise one date range.
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    pub range: DateRange,
    pub period: Period,
    pub properties: &'a [Property],
    pub income: &'a [IncomeRecord],
    pub expenses: &'a [ExpenseRecord],
    /// Totals of the window immediately preceding `range`.
    pub previous: PeriodTotals,
}

/// A stateless calculator for deriving portfolio financials from ledger rows.
#[derive(Debug, Default)]
pub struct FinancialEngine {}

impl FinancialEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for building a financial summary.
    ///
    /// Rows dated outside `input.range` are ignored, so callers may pass a
    /// wider fetch without skewing the figures.
    pub fn summarize(&self, input: &SummaryInput<'_>) -> Result<FinancialSummaryReport, AnalyticsError> {
        let income: Vec<&IncomeRecord> = input
            .income
            .iter()
            .filter(|row| input.range.contains(row.date))
            .collect();
        let expenses: Vec<&ExpenseRecord> = input
            .expenses
            .iter()
            .filter(|row| input.range.contains(row.date))
            .collect();

        let current = PeriodTotals::new(
            checked_total(income.iter().map(|row| row.amount))?,
            checked_total(expenses.iter().map(|row| row.amount))?,
        )?;
        let portfolio_value = checked_total(input.properties.iter().map(Property::valuation))?;

        tracing::debug!(
            range_start = %input.range.start,
            range_end = %input.range.end,
            period = %input.period,
            income_rows = income.len(),
            expense_rows = expenses.len(),
            "Summarising portfolio financials."
        );

        let summary = SummaryTotals {
            total_income: current.income,
            total_expenses: current.expenses,
            net_cash_flow: current.net_cash_flow,
            portfolio_value,
            portfolio_roi: roi_percent(current.net_cash_flow, input.period, portfolio_value)?,
            income_change_percent: percentage_change(current.income, input.previous.income)?,
            expenses_change_percent: percentage_change(current.expenses, input.previous.expenses)?,
            cash_flow_change_percent: percentage_change(
                current.net_cash_flow,
                input.previous.net_cash_flow,
            )?,
        };

        let names: HashMap<Uuid, &str> = input
            .properties
            .iter()
            .map(|p| (p.id, p.name.as_str()))
            .collect();

        Ok(FinancialSummaryReport {
            summary,
            income_by_category: self.by_category(&income, current.income)?,
            expenses_by_category: self.by_category(&expenses, current.expenses)?,
            income_by_property: self.by_property(&income, &names)?,
            expenses_by_property: self.by_property(&expenses, &names)?,
            property_roi: self.property_roi(input.properties, &income, &expenses, input.period)?,
            time_series_data: self.time_series(&input.range, input.period, &income, &expenses)?,
        })
    }

    /// Groups rows by category, largest first.
    pub fn by_category<E: LedgerEntry>(
        &self,
        rows: &[&E],
        total: Decimal,
    ) -> Result<Vec<CategoryTotal>, AnalyticsError> {
        let mut sums: HashMap<&str, Decimal> = HashMap::new();
        for row in rows {
            accumulate(sums.entry(row.category()).or_default(), row.amount())?;
        }

        let mut totals = sums
            .into_iter()
            .map(|(category, amount)| -> Result<CategoryTotal, AnalyticsError> {
                Ok(CategoryTotal {
                    category: category.to_string(),
                    amount,
                    percentage: share_percent(amount, total)?,
                })
            })
            .collect::<Result<Vec<_>, AnalyticsError>>()?;
        totals.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
        Ok(totals)
    }

    /// Groups rows by the property they were booked against, largest first.
    fn by_property<E: LedgerEntry>(
        &self,
        rows: &[&E],
        names: &HashMap<Uuid, &str>,
    ) -> Result<Vec<PropertyTotal>, AnalyticsError> {
        let mut sums: HashMap<Uuid, Decimal> = HashMap::new();
        for row in rows {
            accumulate(sums.entry(row.property_id()).or_default(), row.amount())?;
        }

        let mut totals: Vec<PropertyTotal> = sums
            .into_iter()
            .map(|(property_id, amount)| PropertyTotal {
                property_id,
                property_name: names.get(&property_id).copied().unwrap_or(UNKNOWN_PROPERTY).to_string(),
                amount,
            })
            .collect();
        totals.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.property_name.cmp(&b.property_name))
                .then_with(|| a.property_id.cmp(&b.property_id))
        });
        Ok(totals)
    }

    /// One ROI line per property, including properties with no activity.
    fn property_roi(
        &self,
        properties: &[Property],
        income: &[&IncomeRecord],
        expenses: &[&ExpenseRecord],
        period: Period,
    ) -> Result<Vec<PropertyRoi>, AnalyticsError> {
        let mut per_property: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        for row in income {
            accumulate(&mut per_property.entry(row.property_id).or_default().0, row.amount)?;
        }
        for row in expenses {
            accumulate(&mut per_property.entry(row.property_id).or_default().1, row.amount)?;
        }

        let mut lines = properties
            .iter()
            .map(|property| -> Result<PropertyRoi, AnalyticsError> {
                let (income, expenses) = per_property.get(&property.id).copied().unwrap_or_default();
                let totals = PeriodTotals::new(income, expenses)?;
                let value = property.valuation();
                Ok(PropertyRoi {
                    property_id: property.id,
                    property_name: property.name.clone(),
                    income: totals.income,
                    expenses: totals.expenses,
                    net_cash_flow: totals.net_cash_flow,
                    property_value: value,
                    roi: roi_percent(totals.net_cash_flow, period, value)?,
                })
            })
            .collect::<Result<Vec<_>, AnalyticsError>>()?;
        lines.sort_by(|a, b| a.property_name.cmp(&b.property_name).then_with(|| a.property_id.cmp(&b.property_id)));
        Ok(lines)
    }

    /// Accumulates income, expenses and cash flow per calendar bucket.
    pub fn time_series(
        &self,
        range: &DateRange,
        period: Period,
        income: &[&IncomeRecord],
        expenses: &[&ExpenseRecord],
    ) -> Result<Vec<TimeSeriesPoint>, AnalyticsError> {
        let buckets = period.buckets(range)?;
        let index: HashMap<&str, usize> = buckets
            .iter()
            .enumerate()
            .map(|(i, bucket)| (bucket.key.as_str(), i))
            .collect();
        let mut points: Vec<TimeSeriesPoint> = buckets
            .iter()
            .map(|bucket| TimeSeriesPoint {
                period: bucket.key.clone(),
                label: bucket.label.clone(),
                income: Decimal::ZERO,
                expenses: Decimal::ZERO,
                cash_flow: Decimal::ZERO,
            })
            .collect();

        for row in income {
            let i = slot(&index, period, row.date)?;
            accumulate(&mut points[i].income, row.amount)?;
        }
        for row in expenses {
            let i = slot(&index, period, row.date)?;
            accumulate(&mut points[i].expenses, row.amount)?;
        }
        for point in &mut points {
            point.cash_flow = PeriodTotals::new(point.income, point.expenses)?.net_cash_flow;
        }

        Ok(points)
    }
}

/// Position of the bucket holding `date`, looked up by its calendar key.
fn slot(index: &HashMap<&str, usize>, period: Period, date: NaiveDate) -> Result<usize, AnalyticsError> {
    let bucket = period.bucket_of(date)?;
    index
        .get(bucket.key.as_str())
        .copied()
        .ok_or_else(|| AnalyticsError::Calculation(format!("no bucket covers {}", date)))
}
