//! # Rentfolio Analytics Engine
//!
//! This crate turns raw ledger rows into the portfolio financial summary:
//! totals, category and property breakdowns, calendar time series,
//! period-over-period change and annualised ROI.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `FinancialEngine` is a stateless calculator. It takes
//!   properties and ledger rows as input and produces a `FinancialSummaryReport` as output.
//! - **Decimal Money:** All amounts are `rust_decimal::Decimal`. Every division is
//!   guarded and all arithmetic is checked, so overflow surfaces as
//!   `AnalyticsError::Calculation` rather than a panic.
//!
//! ## Public API
//!
//! - `FinancialEngine`: The main struct that contains the aggregation logic.
//! - `FinancialSummaryReport`: The standardized report returned to API and CLI callers.
//! - `annualized_value`, `percentage_change`, `roi_percent`: The ratio helpers.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod metrics;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{FinancialEngine, SummaryInput, UNKNOWN_PROPERTY};
pub use error::AnalyticsError;
pub use metrics::{
    annualized_value, checked_total, percentage_change, roi_percent, share_percent, PeriodTotals,
};
pub use report::{
    CategoryTotal, FinancialSummaryReport, PropertyRoi, PropertyTotal, SummaryTotals,
    TimeSeriesPoint,
};
