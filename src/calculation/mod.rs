//! Calculation logic for the payroll engine.
//!
//! This module contains the wage converter, the statutory deduction
//! calculator, compensation profile construction, previous-record selection
//! and the payroll statement builder.

mod deductions;
mod profile;
mod rounding;
mod selection;
mod statement_builder;
mod wage_converter;

pub use deductions::{DeductionCalculation, calculate_deductions, income_tax, local_income_tax};
pub use profile::{
    apply_hourly_wage, build_profile, estimate_deductions, load_previous_compensation,
    monthly_total, payment_fields, taxable_amount, validate_bonuses, validate_profile,
};
pub use rounding::{apply_rate, round_hours, round_to_won};
pub use selection::{most_recent, select_previous_contract, select_previous_statement};
pub use statement_builder::{PayrollStatementBuilder, StatementRepository};
pub use wage_converter::{
    LEGAL_WEEKLY_HOUR_CAP, NIGHT_HOLIDAY_PREMIUM, OVERTIME_MULTIPLIER, WEEKS_PER_MONTH,
    convert_wages, derive_supplemental_rates, is_below_minimum_wage, reset_inputs,
};
