//! Employment contract and compensation profile models.
//!
//! A contract is split into a [`ContractHeader`] (dates, attachments,
//! enrollment, salary timing) and a [`ContractCompensationProfile`]. Only the
//! profile travels when compensation is copied from a previous contract.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::statement::BonusLine;
use super::wage::{CompensationBreakdown, NontaxableAllowances};

/// The pay-structure classification of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayStructure {
    /// Fixed monthly pay with statutory premiums folded in.
    InclusiveAnnual,
    /// Fixed base pay; premiums settled each period from attendance.
    NonInclusiveAnnual,
    /// Hourly-rate-only compensation.
    PartTime,
}

impl PayStructure {
    /// Whether the classification carries supplemental hourly rates.
    pub fn uses_supplemental_rates(&self) -> bool {
        matches!(self, PayStructure::NonInclusiveAnnual | PayStructure::PartTime)
    }
}

/// Which calendar month a payroll month settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalaryTiming {
    /// Pay is settled for the payroll month itself.
    #[default]
    Current,
    /// Pay is settled for the month before the payroll month.
    Next,
}

/// Social insurance enrollment taken from the contract header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnrollmentFlags {
    /// Enrolled in the national pension.
    #[serde(default)]
    pub national_pension: bool,
    /// Enrolled in health insurance (and therefore long-term care).
    #[serde(default)]
    pub health_insurance: bool,
    /// Enrolled in employment insurance.
    #[serde(default)]
    pub employment_insurance: bool,
    /// Covered by workers' compensation; employer-borne, no deduction.
    #[serde(default)]
    pub workers_compensation: bool,
}

impl EnrollmentFlags {
    /// Enrollment in every scheme.
    pub fn all() -> Self {
        Self {
            national_pension: true,
            health_insurance: true,
            employment_insurance: true,
            workers_compensation: true,
        }
    }
}

/// An uploaded document referenced by a contract or statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// Opaque storage reference owned by the upload collaborator.
    pub reference: String,
}

/// The non-compensation part of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractHeader {
    /// Contract identifier.
    pub contract_id: String,
    /// Employee identifier.
    pub employee_id: String,
    /// First day of the contract.
    pub start_date: NaiveDate,
    /// Last day of the contract, if fixed-term.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Which month a payroll month settles; the organization default when unset.
    #[serde(default)]
    pub salary_timing: Option<SalaryTiming>,
    /// Social insurance enrollment.
    #[serde(default)]
    pub enrollment: EnrollmentFlags,
    /// Signed contract scans and similar files.
    #[serde(default)]
    pub attachments: Vec<FileAttachment>,
}

/// Premium amounts stored by inclusive annual contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PremiumAmounts {
    /// Monthly overtime premium.
    pub overtime: i64,
    /// Monthly night premium.
    pub night: i64,
    /// Monthly holiday premium.
    pub holiday: i64,
    /// Monthly holiday overtime.
    pub extra_holiday: i64,
}

/// Hourly rates used to settle premiums from attendance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupplementalRates {
    /// Ordinary weekday rate.
    pub weekday: i64,
    /// Overtime rate.
    pub overtime: i64,
    /// Night rate.
    pub night: i64,
    /// Holiday rate.
    pub holiday: i64,
}

/// Rates entered by hand; a nonzero value wins over the derived rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupplementalRateOverrides {
    /// Weekday rate override.
    #[serde(default)]
    pub weekday: Option<i64>,
    /// Overtime rate override.
    #[serde(default)]
    pub overtime: Option<i64>,
    /// Night rate override.
    #[serde(default)]
    pub night: Option<i64>,
    /// Holiday rate override.
    #[serde(default)]
    pub holiday: Option<i64>,
}

/// Hours reported by attendance for one settlement period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodAttendance {
    /// Ordinary weekday hours (part-time pay).
    #[serde(default)]
    pub weekday_hours: Decimal,
    /// Overtime hours.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Night hours.
    #[serde(default)]
    pub night_hours: Decimal,
    /// Holiday hours.
    #[serde(default)]
    pub holiday_hours: Decimal,
}

/// The compensation record persisted with each contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCompensationProfile {
    /// Pay-structure classification.
    pub pay_structure: PayStructure,
    /// Hourly wage the profile was built from.
    pub hourly_wage: i64,
    /// The calculator output the amounts came from, if any.
    #[serde(default)]
    pub breakdown: Option<CompensationBreakdown>,
    /// Monthly base pay; absent for part-time.
    #[serde(default)]
    pub basic_amount: Option<i64>,
    /// Folded-in premium amounts; inclusive annual only.
    #[serde(default)]
    pub premiums: Option<PremiumAmounts>,
    /// Nontaxable allowances.
    #[serde(default = "NontaxableAllowances::none")]
    pub allowances: NontaxableAllowances,
    /// Supplemental hourly rates; absent for inclusive annual.
    #[serde(default)]
    pub supplemental_rates: Option<SupplementalRates>,
    /// Hand-entered rate overrides.
    #[serde(default)]
    pub rate_overrides: SupplementalRateOverrides,
    /// Recurring bonus lines.
    #[serde(default)]
    pub bonuses: Vec<BonusLine>,
}

/// A contract as the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentContract {
    /// Dates, enrollment and attachments.
    pub header: ContractHeader,
    /// Compensation fields.
    pub compensation: ContractCompensationProfile,
}
