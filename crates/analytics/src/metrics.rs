use crate::error::AnalyticsError;
use core_types::{LedgerEntry, Period};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds to two places, halves away from zero.
fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn overflow(operation: &str, value: Decimal) -> AnalyticsError {
    AnalyticsError::Calculation(format!("overflow while {} {}", operation, value))
}

/// `numerator / denominator * 100`, rounded to two places.
fn ratio_percent(numerator: Decimal, denominator: Decimal) -> Result<Decimal, AnalyticsError> {
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .map(round2)
        .ok_or_else(|| overflow("dividing", numerator))
}

/// Adds `amount` into `total`.
pub fn accumulate(total: &mut Decimal, amount: Decimal) -> Result<(), AnalyticsError> {
    *total = total.checked_add(amount).ok_or_else(|| overflow("adding", amount))?;
    Ok(())
}

/// Sums `amounts`, failing instead of wrapping past `Decimal::MAX`.
pub fn checked_total<I: IntoIterator<Item = Decimal>>(amounts: I) -> Result<Decimal, AnalyticsError> {
    let mut total = Decimal::ZERO;
    for amount in amounts {
        accumulate(&mut total, amount)?;
    }
    Ok(total)
}

/// Scales a per-period amount up to a yearly figure.
pub fn annualized_value(amount: Decimal, period: Period) -> Result<Decimal, AnalyticsError> {
    amount
        .checked_mul(Decimal::from(period.annualization_factor()))
        .ok_or_else(|| overflow("annualising", amount))
}

/// Percentage change from `previous` to `current`, rounded to two places.
///
/// The change is measured against the magnitude of `previous` so that a
/// shrinking loss reads as an improvement. Returns zero when there is no
/// prior figure to compare against.
pub fn percentage_change(current: Decimal, previous: Decimal) -> Result<Decimal, AnalyticsError> {
    if previous.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let delta = current
        .checked_sub(previous)
        .ok_or_else(|| overflow("subtracting", previous))?;
    ratio_percent(delta, previous.abs())
}

/// Annualised return on `value`, in percent, rounded to two places.
pub fn roi_percent(net_cash_flow: Decimal, period: Period, value: Decimal) -> Result<Decimal, AnalyticsError> {
    if value <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    ratio_percent(annualized_value(net_cash_flow, period)?, value)
}

/// `part` as a percentage of `total`, rounded to two places.
pub fn share_percent(part: Decimal, total: Decimal) -> Result<Decimal, AnalyticsError> {
    if total.is_zero() {
        return Ok(Decimal::ZERO);
    }
    ratio_percent(part, total)
}

pub fn sum_amounts<E: LedgerEntry>(rows: &[E]) -> Result<Decimal, AnalyticsError> {
    checked_total(rows.iter().map(LedgerEntry::amount))
}

/// Income, expenses and their difference for one window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net_cash_flow: Decimal,
}

impl PeriodTotals {
    pub fn new(income: Decimal, expenses: Decimal) -> Result<Self, AnalyticsError> {
        let net_cash_flow = income
            .checked_sub(expenses)
            .ok_or_else(|| overflow("subtracting", expenses))?;
        Ok(Self { income, expenses, net_cash_flow })
    }

    pub fn from_rows<I: LedgerEntry, E: LedgerEntry>(income: &[I], expenses: &[E]) -> Result<Self, AnalyticsError> {
        Self::new(sum_amounts(income)?, sum_amounts(expenses)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn annualizes_by_period() {
        assert_eq!(annualized_value(dec!(900), Period::Monthly).unwrap(), dec!(10800));
        assert_eq!(annualized_value(dec!(900), Period::Quarterly).unwrap(), dec!(3600));
        assert_eq!(annualized_value(dec!(900), Period::Yearly).unwrap(), dec!(900));
    }

    #[test]
    fn percentage_change_guards_zero_denominator() {
        assert_eq!(percentage_change(dec!(500), Decimal::ZERO).unwrap(), Decimal::ZERO);
        assert_eq!(percentage_change(Decimal::ZERO, Decimal::ZERO).unwrap(), Decimal::ZERO);
        assert_eq!(percentage_change(dec!(1200), dec!(1000)).unwrap(), dec!(20));
        assert_eq!(percentage_change(dec!(250), dec!(1000)).unwrap(), dec!(-75));
        assert_eq!(percentage_change(dec!(1), dec!(3)).unwrap(), dec!(-66.67));
    }

    #[test]
    fn percentage_change_against_negative_prior() {
        // A loss of 200 shrinking to a loss of 100 is a 50% improvement.
        assert_eq!(percentage_change(dec!(-100), dec!(-200)).unwrap(), dec!(50));
    }

    #[test]
    fn roi_is_zero_without_value() {
        assert_eq!(roi_percent(dec!(900), Period::Monthly, Decimal::ZERO).unwrap(), Decimal::ZERO);
        assert_eq!(roi_percent(dec!(900), Period::Monthly, dec!(-5)).unwrap(), Decimal::ZERO);
        assert_eq!(roi_percent(dec!(900), Period::Monthly, dec!(216000)).unwrap(), dec!(5));
    }

    #[test]
    fn share_percent_rounds() {
        assert_eq!(share_percent(dec!(200), dec!(1200)).unwrap(), dec!(16.67));
        assert_eq!(share_percent(dec!(1), Decimal::ZERO).unwrap(), Decimal::ZERO);
        assert_eq!(share_percent(dec!(1), dec!(800)).unwrap(), dec!(0.13));
    }

    #[test]
    fn overflow_is_an_error_not_a_panic() {
        assert!(matches!(
            annualized_value(Decimal::MAX, Period::Monthly),
            Err(AnalyticsError::Calculation(_))
        ));
        assert!(roi_percent(dec!(7000000000000000000000000000), Period::Monthly, dec!(1)).is_err());
        assert!(percentage_change(Decimal::MAX, Decimal::MIN).is_err());
        assert!(share_percent(Decimal::MAX, dec!(0.01)).is_err());
        assert!(checked_total([Decimal::MAX, Decimal::ONE]).is_err());
        assert!(PeriodTotals::new(Decimal::MIN, Decimal::MAX).is_err());
    }

    #[test]
    fn totals_net_is_difference() {
        let totals = PeriodTotals::new(dec!(1200), dec!(300)).unwrap();
        assert_eq!(totals.net_cash_flow, dec!(900));
        assert_eq!(totals.income - totals.expenses, totals.net_cash_flow);
    }
}
