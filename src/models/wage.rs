//! Wage calculator inputs and the derived compensation breakdown.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default monthly meal allowance applied on reset.
pub const DEFAULT_MEAL_ALLOWANCE: i64 = 200_000;
/// Default monthly vehicle allowance applied on reset.
pub const DEFAULT_CAR_ALLOWANCE: i64 = 200_000;
/// Default monthly childcare allowance applied on reset.
pub const DEFAULT_CHILDCARE_ALLOWANCE: i64 = 100_000;
/// Contracted weekly hours applied on reset.
pub const DEFAULT_WEEKLY_HOURS: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

/// A nontaxable allowance amount and whether it is part of the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    /// Monthly amount in whole currency units.
    pub amount: i64,
    /// Whether the allowance is paid (and excluded from the tax base).
    #[serde(default = "default_included")]
    pub included: bool,
}

fn default_included() -> bool {
    true
}

impl Allowance {
    /// Creates an included allowance.
    pub fn included(amount: i64) -> Self {
        Self {
            amount,
            included: true,
        }
    }

    /// The amount actually paid: zero when not included.
    pub fn effective_amount(&self) -> i64 {
        if self.included { self.amount.max(0) } else { 0 }
    }
}

/// The three nontaxable allowance categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NontaxableAllowances {
    /// Meal allowance.
    pub meal: Allowance,
    /// Vehicle allowance.
    pub car: Allowance,
    /// Childcare allowance.
    pub childcare: Allowance,
}

impl Default for NontaxableAllowances {
    fn default() -> Self {
        Self {
            meal: Allowance::included(DEFAULT_MEAL_ALLOWANCE),
            car: Allowance::included(DEFAULT_CAR_ALLOWANCE),
            childcare: Allowance::included(DEFAULT_CHILDCARE_ALLOWANCE),
        }
    }
}

impl NontaxableAllowances {
    /// All three allowances set to zero and excluded.
    pub fn none() -> Self {
        let zero = Allowance {
            amount: 0,
            included: false,
        };
        Self {
            meal: zero,
            car: zero,
            childcare: zero,
        }
    }

    /// Sum of the included allowance amounts, saturating at `i64::MAX`.
    pub fn included_total(&self) -> i64 {
        self.meal
            .effective_amount()
            .saturating_add(self.car.effective_amount())
            .saturating_add(self.childcare.effective_amount())
    }
}

/// Hour and wage inputs to the wage calculator.
///
/// # Example
///
/// ```
/// use payroll_engine::models::WageInputs;
///
/// let inputs = WageInputs::reset(10_030);
/// assert_eq!(inputs.hourly_wage, 10_030);
/// assert_eq!(inputs.weekly_hours, rust_decimal::Decimal::from(40));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageInputs {
    /// Contracted weekly working hours.
    pub weekly_hours: Decimal,
    /// Hourly wage in whole currency units.
    pub hourly_wage: i64,
    /// Monthly overtime hours.
    #[serde(default)]
    pub monthly_overtime_hours: Decimal,
    /// Monthly night hours (already inside basic hours).
    #[serde(default)]
    pub monthly_night_hours: Decimal,
    /// Monthly holiday hours (already inside basic hours).
    #[serde(default)]
    pub monthly_holiday_hours: Decimal,
    /// Monthly overtime hours worked on holidays.
    #[serde(default)]
    pub monthly_extra_holiday_hours: Decimal,
    /// Nontaxable allowances.
    #[serde(default = "NontaxableAllowances::none")]
    pub allowances: NontaxableAllowances,
}

impl WageInputs {
    /// The calculator's reset state for the selected year's minimum wage.
    pub fn reset(minimum_wage: i64) -> Self {
        Self {
            weekly_hours: DEFAULT_WEEKLY_HOURS,
            hourly_wage: minimum_wage,
            monthly_overtime_hours: Decimal::ZERO,
            monthly_night_hours: Decimal::ZERO,
            monthly_holiday_hours: Decimal::ZERO,
            monthly_extra_holiday_hours: Decimal::ZERO,
            allowances: NontaxableAllowances::default(),
        }
    }
}

/// Monthly and annual figures derived from [`WageInputs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationBreakdown {
    /// Paid basic hours per month, including weekly paid rest.
    pub monthly_basic_hours: Decimal,
    /// Basic hours times the hourly wage.
    pub monthly_basic_amount: i64,
    /// Overtime premium amount.
    pub monthly_overtime_amount: i64,
    /// Night premium amount.
    pub monthly_night_amount: i64,
    /// Holiday premium amount.
    pub monthly_holiday_amount: i64,
    /// Holiday overtime amount.
    pub monthly_extra_holiday_amount: i64,
    /// Included nontaxable allowances.
    pub monthly_allowance_amount: i64,
    /// Everything paid in a month.
    pub monthly_total_amount: i64,
    /// Twelve months of the monthly total.
    pub annual_total_amount: i64,
    /// Basic plus overtime plus holiday overtime hours.
    pub total_monthly_work_hours: Decimal,
    /// Average weekly hours including overtime.
    pub weekly_total_work_hours: Decimal,
    /// Whether weekly hours exceed the legal cap.
    pub is_over_legal_weekly_cap: bool,
    /// Whether the wage is positive but under the year's minimum.
    pub is_below_minimum_wage: bool,
}

impl CompensationBreakdown {
    /// The monthly total less included nontaxable allowances.
    pub fn taxable_amount(&self) -> i64 {
        self.monthly_total_amount
            .saturating_sub(self.monthly_allowance_amount)
            .max(0)
    }
}
