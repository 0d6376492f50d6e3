//! Statutory deduction result model.

use serde::{Deserialize, Serialize};

use super::codes::DeductionCode;

/// Employee-side statutory deductions for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeductionResult {
    /// National pension contribution.
    pub national_pension: i64,
    /// Health insurance premium.
    pub health_insurance: i64,
    /// Long-term care premium.
    pub long_term_care: i64,
    /// Employment insurance premium.
    pub employment_insurance: i64,
    /// Income tax (simplified bracket approximation).
    pub income_tax: i64,
    /// Local income tax.
    pub local_income_tax: i64,
}

impl DeductionResult {
    /// Sum of all six deductions.
    pub fn total(&self) -> i64 {
        [
            self.health_insurance,
            self.long_term_care,
            self.employment_insurance,
            self.income_tax,
            self.local_income_tax,
        ]
        .into_iter()
        .fold(self.national_pension, i64::saturating_add)
    }

    /// The amount for a statutory code; `None` for organization-defined codes.
    pub fn amount_for(&self, code: &DeductionCode) -> Option<i64> {
        match code {
            DeductionCode::NationalPension => Some(self.national_pension),
            DeductionCode::HealthInsurance => Some(self.health_insurance),
            DeductionCode::LongTermCare => Some(self.long_term_care),
            DeductionCode::EmploymentInsurance => Some(self.employment_insurance),
            DeductionCode::IncomeTax => Some(self.income_tax),
            DeductionCode::LocalIncomeTax => Some(self.local_income_tax),
            DeductionCode::Other(_) => None,
        }
    }
}
