//! Canonical line-item codes and the legacy code mapping.
//!
//! Payment concepts used to travel under two naming schemes: short codes
//! (`base_salary`) and legacy hierarchical codes (`PAY.01.BASIC`). Inside the
//! engine only the enums below exist. Both spellings are accepted when
//! deserializing, and the short code is always written back out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when an inbound code matches neither naming scheme.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown payment code '{0}'")]
pub struct UnknownCode(pub String);

/// A payment line-item concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaymentCode {
    /// Fixed monthly base pay.
    BaseSalary,
    /// Overtime premium.
    Overtime,
    /// Night work premium.
    Night,
    /// Holiday work premium.
    Holiday,
    /// Overtime worked on a holiday.
    ExtraHoliday,
    /// Hours-times-rate pay for part-time contracts.
    HourlyPay,
    /// Nontaxable meal allowance.
    MealAllowance,
    /// Nontaxable vehicle allowance.
    CarAllowance,
    /// Nontaxable childcare allowance.
    ChildcareAllowance,
}

/// `(canonical, short code, legacy code, display name)`.
const PAYMENT_CODE_TABLE: [(PaymentCode, &str, &str, &str); 9] = [
    (PaymentCode::BaseSalary, "base_salary", "PAY.01.BASIC", "Base salary"),
    (PaymentCode::Overtime, "overtime_pay", "PAY.02.OVERTIME", "Overtime pay"),
    (PaymentCode::Night, "night_pay", "PAY.03.NIGHT", "Night work pay"),
    (PaymentCode::Holiday, "holiday_pay", "PAY.04.HOLIDAY", "Holiday work pay"),
    (PaymentCode::ExtraHoliday, "extra_holiday_pay", "PAY.05.HOLIDAY_OT", "Holiday overtime pay"),
    (PaymentCode::HourlyPay, "hourly_pay", "PAY.06.HOURLY", "Hourly pay"),
    (PaymentCode::MealAllowance, "meal_allowance", "PAY.10.MEAL", "Meal allowance"),
    (PaymentCode::CarAllowance, "car_allowance", "PAY.11.VEHICLE", "Vehicle allowance"),
    (PaymentCode::ChildcareAllowance, "childcare_allowance", "PAY.12.CHILDCARE", "Childcare allowance"),
];

impl PaymentCode {
    fn entry(&self) -> (PaymentCode, &'static str, &'static str, &'static str) {
        PAYMENT_CODE_TABLE
            .iter()
            .copied()
            .find(|(code, ..)| code == self)
            .unwrap_or((*self, "", "", ""))
    }

    /// The canonical short code written on the wire.
    pub fn as_str(&self) -> &'static str {
        self.entry().1
    }

    /// The legacy hierarchical code for collaborators that still expect it.
    pub fn legacy_code(&self) -> &'static str {
        self.entry().2
    }

    /// A default human-readable label used when the catalog has none.
    pub fn default_name(&self) -> &'static str {
        self.entry().3
    }

    /// Resolves either a short code or a legacy code.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        PAYMENT_CODE_TABLE
            .iter()
            .find(|(_, short, legacy, _)| *short == code || *legacy == code)
            .map(|(canonical, ..)| *canonical)
    }

    /// Whether this payment is excluded from the income-tax base.
    pub fn is_nontaxable(&self) -> bool {
        matches!(
            self,
            PaymentCode::MealAllowance | PaymentCode::CarAllowance | PaymentCode::ChildcareAllowance
        )
    }
}

impl fmt::Display for PaymentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentCode {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownCode(s.to_string()))
    }
}

impl TryFrom<String> for PaymentCode {
    type Error = UnknownCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PaymentCode> for String {
    fn from(value: PaymentCode) -> Self {
        value.as_str().to_string()
    }
}

/// A deduction line-item concept.
///
/// The six statutory deductions are computed by the engine; anything else an
/// organization configures (union dues, loan repayments) travels as `Other`
/// and is only ever edited by hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeductionCode {
    /// National pension contribution.
    NationalPension,
    /// Health insurance premium.
    HealthInsurance,
    /// Long-term care insurance, levied on the health premium.
    LongTermCare,
    /// Employment insurance premium.
    EmploymentInsurance,
    /// Withheld income tax.
    IncomeTax,
    /// Local income tax, a fixed share of income tax.
    LocalIncomeTax,
    /// An organization-defined deduction.
    Other(String),
}

const DEDUCTION_CODE_TABLE: [(DeductionCode, &str, &str, &str); 6] = [
    (DeductionCode::NationalPension, "national_pension", "DED.01.PENSION", "National pension"),
    (DeductionCode::HealthInsurance, "health_insurance", "DED.02.HEALTH", "Health insurance"),
    (DeductionCode::LongTermCare, "long_term_care", "DED.03.LTC", "Long-term care insurance"),
    (DeductionCode::EmploymentInsurance, "employment_insurance", "DED.04.EMPLOYMENT", "Employment insurance"),
    (DeductionCode::IncomeTax, "income_tax", "DED.10.INCOME_TAX", "Income tax"),
    (DeductionCode::LocalIncomeTax, "local_income_tax", "DED.11.LOCAL_TAX", "Local income tax"),
];

impl DeductionCode {
    /// The statutory deductions in statement order.
    pub const STATUTORY: [DeductionCode; 6] = [
        DeductionCode::NationalPension,
        DeductionCode::HealthInsurance,
        DeductionCode::LongTermCare,
        DeductionCode::EmploymentInsurance,
        DeductionCode::IncomeTax,
        DeductionCode::LocalIncomeTax,
    ];

    /// The canonical short code written on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            DeductionCode::Other(code) => code,
            statutory => DEDUCTION_CODE_TABLE
                .iter()
                .find(|(code, ..)| code == statutory)
                .map(|(_, short, ..)| *short)
                .unwrap_or_default(),
        }
    }

    /// The legacy hierarchical code; custom codes map to themselves.
    pub fn legacy_code(&self) -> &str {
        match self {
            DeductionCode::Other(code) => code,
            statutory => DEDUCTION_CODE_TABLE
                .iter()
                .find(|(code, ..)| code == statutory)
                .map(|(_, _, legacy, _)| *legacy)
                .unwrap_or_default(),
        }
    }

    /// A default human-readable label used when the catalog has none.
    pub fn default_name(&self) -> &str {
        match self {
            DeductionCode::Other(code) => code,
            statutory => DEDUCTION_CODE_TABLE
                .iter()
                .find(|(code, ..)| code == statutory)
                .map(|(.., name)| *name)
                .unwrap_or_default(),
        }
    }

    /// Whether the engine computes this deduction from the rate table.
    pub fn is_statutory(&self) -> bool {
        !matches!(self, DeductionCode::Other(_))
    }
}

impl fmt::Display for DeductionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for DeductionCode {
    fn from(value: &str) -> Self {
        let value = value.trim();
        DEDUCTION_CODE_TABLE
            .iter()
            .find(|(_, short, legacy, _)| *short == value || *legacy == value)
            .map(|(code, ..)| code.clone())
            .unwrap_or_else(|| DeductionCode::Other(value.to_string()))
    }
}

impl From<String> for DeductionCode {
    fn from(value: String) -> Self {
        DeductionCode::from(value.as_str())
    }
}

impl From<DeductionCode> for String {
    fn from(value: DeductionCode) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_code_accepts_both_naming_schemes() {
        assert_eq!(PaymentCode::from_code("base_salary"), Some(PaymentCode::BaseSalary));
        assert_eq!(PaymentCode::from_code("PAY.01.BASIC"), Some(PaymentCode::BaseSalary));
        assert_eq!(PaymentCode::from_code("PAY.11.VEHICLE"), Some(PaymentCode::CarAllowance));
        assert_eq!(PaymentCode::from_code("bogus"), None);
    }

    #[test]
    fn test_payment_code_mapping_is_bidirectional() {
        for (code, short, legacy, _) in PAYMENT_CODE_TABLE {
            assert_eq!(code.as_str(), short);
            assert_eq!(code.legacy_code(), legacy);
            assert_eq!(PaymentCode::from_code(code.legacy_code()), Some(code));
            assert_eq!(PaymentCode::from_code(code.as_str()), Some(code));
        }
    }

    #[test]
    fn test_payment_code_serializes_short_code() {
        let json = serde_json::to_string(&PaymentCode::ExtraHoliday).unwrap();
        assert_eq!(json, "\"extra_holiday_pay\"");

        let parsed: PaymentCode = serde_json::from_str("\"PAY.03.NIGHT\"").unwrap();
        assert_eq!(parsed, PaymentCode::Night);

        assert!(serde_json::from_str::<PaymentCode>("\"PAY.99.NOPE\"").is_err());
    }

    #[test]
    fn test_only_allowances_are_nontaxable() {
        assert!(PaymentCode::MealAllowance.is_nontaxable());
        assert!(PaymentCode::CarAllowance.is_nontaxable());
        assert!(PaymentCode::ChildcareAllowance.is_nontaxable());
        assert!(!PaymentCode::BaseSalary.is_nontaxable());
        assert!(!PaymentCode::Overtime.is_nontaxable());
    }

    #[test]
    fn test_deduction_code_legacy_and_custom() {
        assert_eq!(DeductionCode::from("DED.03.LTC"), DeductionCode::LongTermCare);
        assert_eq!(DeductionCode::from("income_tax"), DeductionCode::IncomeTax);
        assert_eq!(
            DeductionCode::from("union_dues"),
            DeductionCode::Other("union_dues".to_string())
        );
        assert_eq!(DeductionCode::LocalIncomeTax.legacy_code(), "DED.11.LOCAL_TAX");
    }

    #[test]
    fn test_deduction_code_serde() {
        let json = serde_json::to_string(&DeductionCode::HealthInsurance).unwrap();
        assert_eq!(json, "\"health_insurance\"");

        let custom: DeductionCode = serde_json::from_str("\"union_dues\"").unwrap();
        assert_eq!(custom.as_str(), "union_dues");
        assert!(!custom.is_statutory());
    }

    #[test]
    fn test_statutory_list_is_complete() {
        assert_eq!(DeductionCode::STATUTORY.len(), DEDUCTION_CODE_TABLE.len());
        assert!(DeductionCode::STATUTORY.iter().all(|c| c.is_statutory()));
    }
}
