//! Request types for the payroll engine API.

use serde::{Deserialize, Serialize};

use crate::models::{
    ContractCompensationProfile, ContractHeader, EnrollmentFlags, PeriodAttendance, WageInputs,
    YearMonth,
};

/// Request body for `POST /wages/convert`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertWagesRequest {
    /// Year whose minimum wage the result is checked against.
    pub year: i32,
    /// Hour and wage inputs.
    pub inputs: WageInputs,
}

/// Request body for `POST /wages/reset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetWagesRequest {
    /// Year whose minimum wage seeds the hourly wage.
    pub year: i32,
}

/// Request body for `POST /deductions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionsRequest {
    /// Year selecting the statutory rate table.
    pub year: i32,
    /// Monthly pay less included nontaxable allowances.
    pub taxable_amount: i64,
    /// Social insurance enrollment.
    #[serde(default)]
    pub enrollment: EnrollmentFlags,
}

/// Request body for `POST /statements/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementPreviewRequest {
    /// The contract header the statement is for.
    pub header: ContractHeader,
    /// The contract's compensation profile.
    pub profile: ContractCompensationProfile,
    /// The payroll month, `YYYY-MM`.
    pub payroll_period: YearMonth,
    /// Attendance totals for the settlement period, if available.
    #[serde(default)]
    pub attendance: Option<PeriodAttendance>,
}
