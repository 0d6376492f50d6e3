//! Hourly wage to monthly and annual salary conversion.
//!
//! Basic hours include the weekly paid rest day, which is worth one fifth of
//! the contracted weekly hours. A month is 4.345 weeks.

use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::models::{
    CompensationBreakdown, SupplementalRateOverrides, SupplementalRates, WageInputs,
};

use super::rounding::{round_hours, round_to_won, saturating_add, saturating_mul, sum_won};

/// Average weeks per month.
pub const WEEKS_PER_MONTH: Decimal = Decimal::from_parts(4345, 0, 0, false, 3);

/// Multiplier for overtime and holiday overtime hours.
pub const OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Premium on top of basic pay for night and holiday hours.
pub const NIGHT_HOLIDAY_PREMIUM: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Legal cap on average weekly working hours, overtime included.
pub const LEGAL_WEEKLY_HOUR_CAP: Decimal = Decimal::from_parts(52, 0, 0, false, 0);

const WORKDAYS_PER_WEEK: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Converts hour and wage inputs into monthly and annual figures.
///
/// `minimum_wage` is the minimum hourly wage for the selected year; `None`
/// when the year is missing from the table, in which case the wage is never
/// flagged as below minimum. Negative inputs are treated as zero and
/// out-of-range results saturate.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::convert_wages;
/// use payroll_engine::models::{NontaxableAllowances, WageInputs};
/// use rust_decimal::Decimal;
///
/// let inputs = WageInputs {
///     weekly_hours: Decimal::from(40),
///     hourly_wage: 10_000,
///     monthly_overtime_hours: Decimal::ZERO,
///     monthly_night_hours: Decimal::ZERO,
///     monthly_holiday_hours: Decimal::ZERO,
///     monthly_extra_holiday_hours: Decimal::ZERO,
///     allowances: NontaxableAllowances::none(),
/// };
///
/// let breakdown = convert_wages(&inputs, Some(10_030));
/// assert_eq!(breakdown.monthly_basic_hours, Decimal::from(209));
/// assert_eq!(breakdown.monthly_basic_amount, 2_090_000);
/// assert!(breakdown.is_below_minimum_wage);
/// ```
pub fn convert_wages(inputs: &WageInputs, minimum_wage: Option<i64>) -> CompensationBreakdown {
    let weekly_hours = inputs.weekly_hours.max(Decimal::ZERO);
    let hourly_wage = inputs.hourly_wage.max(0);
    let wage = Decimal::from(hourly_wage);
    let overtime_hours = inputs.monthly_overtime_hours.max(Decimal::ZERO);
    let night_hours = inputs.monthly_night_hours.max(Decimal::ZERO);
    let holiday_hours = inputs.monthly_holiday_hours.max(Decimal::ZERO);
    let extra_holiday_hours = inputs.monthly_extra_holiday_hours.max(Decimal::ZERO);

    let monthly_basic_hours = round_hours(saturating_mul(
        saturating_add(weekly_hours, weekly_hours / WORKDAYS_PER_WEEK),
        WEEKS_PER_MONTH,
    ));
    let monthly_basic_amount = round_to_won(saturating_mul(monthly_basic_hours, wage));

    let premium_pay = |hours: Decimal, multiplier: Decimal| {
        round_to_won(saturating_mul(saturating_mul(hours, wage), multiplier))
    };
    let monthly_overtime_amount = premium_pay(overtime_hours, OVERTIME_MULTIPLIER);
    let monthly_extra_holiday_amount = premium_pay(extra_holiday_hours, OVERTIME_MULTIPLIER);
    let monthly_night_amount = premium_pay(night_hours, NIGHT_HOLIDAY_PREMIUM);
    let monthly_holiday_amount = premium_pay(holiday_hours, NIGHT_HOLIDAY_PREMIUM);

    let monthly_allowance_amount = inputs.allowances.included_total();

    let monthly_total_amount = sum_won([
        monthly_basic_amount,
        monthly_overtime_amount,
        monthly_extra_holiday_amount,
        monthly_night_amount,
        monthly_holiday_amount,
        monthly_allowance_amount,
    ]);

    let extra_hours = saturating_add(overtime_hours, extra_holiday_hours);
    let total_monthly_work_hours = saturating_add(monthly_basic_hours, extra_hours);
    let weekly_total_work_hours = saturating_add(weekly_hours, extra_hours / WEEKS_PER_MONTH);

    CompensationBreakdown {
        monthly_basic_hours,
        monthly_basic_amount,
        monthly_overtime_amount,
        monthly_night_amount,
        monthly_holiday_amount,
        monthly_extra_holiday_amount,
        monthly_allowance_amount,
        monthly_total_amount,
        annual_total_amount: monthly_total_amount.saturating_mul(12),
        total_monthly_work_hours,
        weekly_total_work_hours: weekly_total_work_hours.round_dp(2),
        is_over_legal_weekly_cap: weekly_total_work_hours > LEGAL_WEEKLY_HOUR_CAP,
        is_below_minimum_wage: is_below_minimum_wage(hourly_wage, minimum_wage),
    }
}

/// Whether a positive wage falls below the year's minimum.
///
/// A zero wage means "not entered yet" and is never flagged, and neither is
/// any wage when the year has no minimum on record.
pub fn is_below_minimum_wage(hourly_wage: i64, minimum_wage: Option<i64>) -> bool {
    match minimum_wage {
        Some(minimum) => hourly_wage > 0 && hourly_wage < minimum,
        None => false,
    }
}

/// The calculator's reset state for `year`.
///
/// Unknown years reset the hourly wage to zero.
pub fn reset_inputs(config: &EngineConfig, year: i32) -> WageInputs {
    WageInputs::reset(config.minimum_wage_for(year).unwrap_or(0))
}

/// Derives supplemental hourly rates from an hourly wage.
///
/// The weekday rate is the wage itself; overtime, night and holiday rates
/// are one and a half times the wage. A nonzero override replaces the
/// derived value for its rate.
pub fn derive_supplemental_rates(
    hourly_wage: i64,
    overrides: &SupplementalRateOverrides,
) -> SupplementalRates {
    let hourly_wage = hourly_wage.max(0);
    let premium_rate = round_to_won(Decimal::from(hourly_wage) * OVERTIME_MULTIPLIER);
    let pick = |value: Option<i64>, derived: i64| match value {
        Some(rate) if rate > 0 => rate,
        _ => derived,
    };

    SupplementalRates {
        weekday: pick(overrides.weekday, hourly_wage),
        overtime: pick(overrides.overtime, premium_rate),
        night: pick(overrides.night, premium_rate),
        holiday: pick(overrides.holiday, premium_rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Allowance, NontaxableAllowances};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn inputs(weekly_hours: &str, hourly_wage: i64) -> WageInputs {
        WageInputs {
            weekly_hours: dec(weekly_hours),
            hourly_wage,
            monthly_overtime_hours: Decimal::ZERO,
            monthly_night_hours: Decimal::ZERO,
            monthly_holiday_hours: Decimal::ZERO,
            monthly_extra_holiday_hours: Decimal::ZERO,
            allowances: NontaxableAllowances::none(),
        }
    }

    #[test]
    fn test_basic_hours_for_full_time_week() {
        let breakdown = convert_wages(&inputs("40", 10_000), None);

        assert_eq!(breakdown.monthly_basic_hours, dec("209"));
        assert_eq!(breakdown.monthly_basic_amount, 2_090_000);
        assert_eq!(breakdown.monthly_total_amount, 2_090_000);
        assert_eq!(breakdown.annual_total_amount, 25_080_000);
    }

    #[test]
    fn test_basic_hours_for_part_time_week() {
        // (20 + 4) * 4.345 = 104.28
        let breakdown = convert_wages(&inputs("20", 10_030), None);
        assert_eq!(breakdown.monthly_basic_hours, dec("104"));
        assert_eq!(breakdown.monthly_basic_amount, 1_043_120);
    }

    #[test]
    fn test_overtime_and_extra_holiday_use_one_and_a_half() {
        let mut inputs = inputs("40", 10_030);
        inputs.monthly_overtime_hours = dec("10");
        inputs.monthly_extra_holiday_hours = dec("3.5");

        let breakdown = convert_wages(&inputs, None);

        assert_eq!(breakdown.monthly_overtime_amount, 150_450);
        // 3.5 * 10030 * 1.5 = 52657.5
        assert_eq!(breakdown.monthly_extra_holiday_amount, 52_658);
        assert_eq!(breakdown.total_monthly_work_hours, dec("222.5"));
    }

    #[test]
    fn test_night_and_holiday_use_half_premium() {
        let mut inputs = inputs("40", 10_001);
        inputs.monthly_night_hours = dec("1");
        inputs.monthly_holiday_hours = dec("8");

        let breakdown = convert_wages(&inputs, None);

        // 1 * 10001 * 0.5 = 5000.5
        assert_eq!(breakdown.monthly_night_amount, 5_001);
        assert_eq!(breakdown.monthly_holiday_amount, 40_004);
        // night and holiday hours are already inside basic hours
        assert_eq!(breakdown.total_monthly_work_hours, dec("209"));
    }

    #[test]
    fn test_total_includes_only_included_allowances() {
        let mut inputs = inputs("40", 10_000);
        inputs.allowances = NontaxableAllowances {
            meal: Allowance::included(200_000),
            car: Allowance {
                amount: 200_000,
                included: false,
            },
            childcare: Allowance::included(100_000),
        };

        let breakdown = convert_wages(&inputs, None);

        assert_eq!(breakdown.monthly_allowance_amount, 300_000);
        assert_eq!(breakdown.monthly_total_amount, 2_390_000);
        assert_eq!(breakdown.annual_total_amount, 2_390_000 * 12);
        assert_eq!(breakdown.taxable_amount(), 2_090_000);
    }

    #[test]
    fn test_weekly_cap_boundary() {
        let mut at_cap = inputs("40", 10_000);
        // 52.1 / 4.345 is just under 12 extra hours a week
        at_cap.monthly_overtime_hours = dec("52.1");
        let breakdown = convert_wages(&at_cap, None);
        assert!(!breakdown.is_over_legal_weekly_cap);

        let mut over_cap = inputs("40", 10_000);
        over_cap.monthly_overtime_hours = dec("40");
        over_cap.monthly_extra_holiday_hours = dec("13");
        let breakdown = convert_wages(&over_cap, None);
        assert!(breakdown.is_over_legal_weekly_cap);
        assert_eq!(breakdown.weekly_total_work_hours, dec("52.20"));
    }

    #[test]
    fn test_exactly_at_cap_is_not_over() {
        let mut inputs = inputs("52", 10_000);
        inputs.monthly_overtime_hours = Decimal::ZERO;
        assert!(!convert_wages(&inputs, None).is_over_legal_weekly_cap);
    }

    #[test]
    fn test_minimum_wage_flag() {
        assert!(is_below_minimum_wage(9_000, Some(10_030)));
        assert!(!is_below_minimum_wage(10_030, Some(10_030)));
        assert!(!is_below_minimum_wage(0, Some(10_030)));
        assert!(!is_below_minimum_wage(5_000, None));
    }

    #[test]
    fn test_negative_inputs_treated_as_zero() {
        let mut inputs = inputs("40", -100);
        inputs.monthly_overtime_hours = dec("-5");
        let breakdown = convert_wages(&inputs, Some(10_030));

        assert_eq!(breakdown.monthly_basic_amount, 0);
        assert_eq!(breakdown.monthly_overtime_amount, 0);
        assert!(!breakdown.is_below_minimum_wage);
    }

    #[test]
    fn test_reset_inputs_uses_year_minimum() {
        let config = EngineConfig::default();

        assert_eq!(reset_inputs(&config, 2025).hourly_wage, 10_030);
        assert_eq!(reset_inputs(&config, 1990).hourly_wage, 0);
        assert_eq!(reset_inputs(&config, 2025).weekly_hours, dec("40"));
        assert_eq!(reset_inputs(&config, 2025).allowances.included_total(), 500_000);
    }

    #[test]
    fn test_derive_supplemental_rates() {
        let rates = derive_supplemental_rates(10_030, &SupplementalRateOverrides::default());

        assert_eq!(rates.weekday, 10_030);
        assert_eq!(rates.overtime, 15_045);
        assert_eq!(rates.night, 15_045);
        assert_eq!(rates.holiday, 15_045);
    }

    #[test]
    fn test_nonzero_override_wins() {
        let overrides = SupplementalRateOverrides {
            weekday: Some(12_000),
            overtime: Some(0),
            night: None,
            holiday: Some(20_000),
        };
        let rates = derive_supplemental_rates(10_001, &overrides);

        assert_eq!(rates.weekday, 12_000);
        // 10001 * 1.5 = 15001.5
        assert_eq!(rates.overtime, 15_002);
        assert_eq!(rates.night, 15_002);
        assert_eq!(rates.holiday, 20_000);
    }

    #[test]
    fn test_extreme_wage_saturates() {
        let breakdown = convert_wages(&WageInputs::reset(i64::MAX), None);

        assert_eq!(breakdown.monthly_basic_amount, i64::MAX);
        assert_eq!(breakdown.monthly_total_amount, i64::MAX);
        assert_eq!(breakdown.annual_total_amount, i64::MAX);
        assert!(!breakdown.is_below_minimum_wage);
    }

    #[test]
    fn test_extreme_hours_saturate() {
        let inputs = WageInputs {
            weekly_hours: Decimal::MAX,
            monthly_overtime_hours: Decimal::MAX,
            monthly_extra_holiday_hours: Decimal::MAX,
            ..inputs("40", 10_030)
        };
        let breakdown = convert_wages(&inputs, Some(10_030));

        assert_eq!(breakdown.monthly_basic_amount, i64::MAX);
        assert_eq!(breakdown.monthly_overtime_amount, i64::MAX);
        assert_eq!(breakdown.annual_total_amount, i64::MAX);
        assert_eq!(breakdown.total_monthly_work_hours, Decimal::MAX);
        assert!(breakdown.is_over_legal_weekly_cap);
    }
}
