//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, plus built-in defaults
//! for callers that do not ship their own files.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DeductionCode, PaymentCode, SalaryTiming};

/// Organization settings injected into every engine entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationConfig {
    /// Organization identifier.
    pub organization_id: String,
    /// Display name.
    pub name: String,
    /// Salary timing used when a contract header does not say.
    #[serde(default)]
    pub default_salary_timing: SalaryTiming,
}

/// The statutory minimum hourly wage for a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumWage {
    /// Calendar year.
    pub year: i32,
    /// Minimum hourly wage in whole currency units.
    pub minimum_wage: i64,
}

/// minimum_wages.yaml structure.
#[derive(Debug, Clone, Deserialize)]
pub struct MinimumWagesConfig {
    /// One entry per year.
    pub minimum_wages: Vec<MinimumWage>,
}

/// A payment item in the organization catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCatalogItem {
    /// Canonical code (short or legacy spelling accepted).
    pub code: PaymentCode,
    /// Display name.
    pub name: String,
}

/// A deduction item in the organization catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionCatalogItem {
    /// Canonical code.
    pub code: DeductionCode,
    /// Display name.
    pub name: String,
    /// Amount used when the line is added by hand.
    #[serde(default)]
    pub default_amount: i64,
    /// Whether new drafts start with this line.
    #[serde(default)]
    pub default_line: bool,
}

/// A bonus category in the organization catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusCategory {
    /// Category code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Amount used when the line is added.
    #[serde(default)]
    pub default_amount: i64,
    /// Remark used when the line is added.
    #[serde(default)]
    pub default_remark: String,
}

/// The organization's configured item codes (catalog.yaml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCatalog {
    /// Payment lines, in statement order.
    pub payment_items: Vec<PaymentCatalogItem>,
    /// Deduction lines, in statement order.
    pub deduction_items: Vec<DeductionCatalogItem>,
    /// Bonus categories.
    #[serde(default)]
    pub bonus_categories: Vec<BonusCategory>,
}

impl ItemCatalog {
    /// Looks up a payment item.
    pub fn payment_item(&self, code: PaymentCode) -> Option<&PaymentCatalogItem> {
        self.payment_items.iter().find(|item| item.code == code)
    }

    /// Looks up a deduction item.
    pub fn deduction_item(&self, code: &DeductionCode) -> Option<&DeductionCatalogItem> {
        self.deduction_items.iter().find(|item| &item.code == code)
    }

    /// Looks up a bonus category.
    pub fn bonus_category(&self, code: &str) -> Option<&BonusCategory> {
        self.bonus_categories.iter().find(|category| category.code == code)
    }

    /// The display name for a payment code, falling back to the built-in label.
    pub fn payment_name(&self, code: PaymentCode) -> String {
        self.payment_item(code)
            .map(|item| item.name.clone())
            .unwrap_or_else(|| code.default_name().to_string())
    }

    /// The display name for a deduction code, falling back to the built-in label.
    pub fn deduction_name(&self, code: &DeductionCode) -> String {
        self.deduction_item(code)
            .map(|item| item.name.clone())
            .unwrap_or_else(|| code.default_name().to_string())
    }

    /// The first code listed twice within one section, if any.
    ///
    /// Short and legacy spellings of the same concept count as the same
    /// code.
    pub fn duplicate_code(&self) -> Option<String> {
        let mut payments = HashSet::new();
        if let Some(item) = self.payment_items.iter().find(|item| !payments.insert(item.code)) {
            return Some(item.code.to_string());
        }

        let mut deductions = HashSet::new();
        if let Some(item) = self
            .deduction_items
            .iter()
            .find(|item| !deductions.insert(&item.code))
        {
            return Some(item.code.to_string());
        }

        let mut bonuses = HashSet::new();
        self.bonus_categories
            .iter()
            .find(|category| !bonuses.insert(category.code.as_str()))
            .map(|category| category.code.clone())
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        let payment_items = [
            PaymentCode::BaseSalary,
            PaymentCode::Overtime,
            PaymentCode::Night,
            PaymentCode::Holiday,
            PaymentCode::ExtraHoliday,
            PaymentCode::MealAllowance,
            PaymentCode::CarAllowance,
            PaymentCode::ChildcareAllowance,
        ]
        .into_iter()
        .map(|code| PaymentCatalogItem {
            code,
            name: code.default_name().to_string(),
        })
        .collect();

        let deduction_items = DeductionCode::STATUTORY
            .into_iter()
            .map(|code| DeductionCatalogItem {
                name: code.default_name().to_string(),
                code,
                default_amount: 0,
                default_line: true,
            })
            .collect();

        Self {
            payment_items,
            deduction_items,
            bonus_categories: vec![],
        }
    }
}

/// One step of the income-tax bracket function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxBracket {
    /// Amount the marginal rate applies above.
    pub lower_bound: i64,
    /// Inclusive upper bound; `None` for the top bracket.
    #[serde(default)]
    pub upper_bound: Option<i64>,
    /// Tax accumulated below `lower_bound`.
    pub base_tax: i64,
    /// Marginal rate.
    pub rate: Decimal,
}

/// Statutory rates for one year (rates/<year>.yaml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryRates {
    /// First year these rates apply to.
    pub year: i32,
    /// Employee share of the national pension.
    pub national_pension_rate: Decimal,
    /// Employee share of health insurance.
    pub health_insurance_rate: Decimal,
    /// Long-term care, as a share of the health premium.
    pub long_term_care_rate: Decimal,
    /// Employee share of employment insurance.
    pub employment_insurance_rate: Decimal,
    /// Local income tax, as a share of income tax.
    pub local_income_tax_rate: Decimal,
    /// Income-tax brackets, lowest first.
    pub income_tax_brackets: Vec<IncomeTaxBracket>,
}

impl Default for StatutoryRates {
    /// The 2025 table with the single-dependent income-tax approximation.
    fn default() -> Self {
        let bracket = |lower_bound, upper_bound, base_tax, rate| IncomeTaxBracket {
            lower_bound,
            upper_bound,
            base_tax,
            rate: Decimal::new(rate, 2),
        };
        Self {
            year: 2025,
            national_pension_rate: Decimal::new(45, 3),
            health_insurance_rate: Decimal::new(3545, 5),
            long_term_care_rate: Decimal::new(1281, 4),
            employment_insurance_rate: Decimal::new(9, 3),
            local_income_tax_rate: Decimal::new(10, 2),
            income_tax_brackets: vec![
                bracket(0, Some(1_060_000), 0, 0),
                bracket(1_060_000, Some(1_500_000), 0, 6),
                bracket(1_500_000, Some(3_000_000), 26_400, 15),
                bracket(3_000_000, Some(4_500_000), 251_400, 24),
                bracket(4_500_000, Some(8_700_000), 611_400, 35),
                bracket(8_700_000, None, 2_081_400, 38),
            ],
        }
    }
}

/// The complete engine configuration.
///
/// This struct aggregates all configuration loaded from the various YAML
/// files in a configuration directory and replaces any process-wide
/// organization defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    organization: OrganizationConfig,
    /// Sorted by year ascending.
    minimum_wages: Vec<MinimumWage>,
    /// Sorted by year ascending, never empty.
    rates: Vec<StatutoryRates>,
    catalog: ItemCatalog,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        organization: OrganizationConfig,
        minimum_wages: Vec<MinimumWage>,
        rates: Vec<StatutoryRates>,
        catalog: ItemCatalog,
    ) -> Self {
        let mut minimum_wages = minimum_wages;
        minimum_wages.sort_by_key(|entry| entry.year);
        let mut rates = rates;
        if rates.is_empty() {
            rates.push(StatutoryRates::default());
        }
        rates.sort_by_key(|table| table.year);
        Self {
            organization,
            minimum_wages,
            rates,
            catalog,
        }
    }

    /// Returns the organization settings.
    pub fn organization(&self) -> &OrganizationConfig {
        &self.organization
    }

    /// Returns the item catalog.
    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Returns the minimum-wage table.
    pub fn minimum_wages(&self) -> &[MinimumWage] {
        &self.minimum_wages
    }

    /// Returns all statutory rate tables.
    pub fn rates(&self) -> &[StatutoryRates] {
        &self.rates
    }

    /// The minimum wage for exactly the given year, if the table has it.
    pub fn minimum_wage_for(&self, year: i32) -> Option<i64> {
        self.minimum_wages
            .iter()
            .find(|entry| entry.year == year)
            .map(|entry| entry.minimum_wage)
    }

    /// The newest rate table effective on or before `year`.
    ///
    /// Years older than every table fall back to the oldest table.
    pub fn rates_for(&self, year: i32) -> &StatutoryRates {
        self.rates
            .iter()
            .rfind(|table| table.year <= year)
            .or_else(|| self.rates.first())
            .unwrap_or(&DEFAULT_RATES)
    }
}

static DEFAULT_RATES: std::sync::LazyLock<StatutoryRates> =
    std::sync::LazyLock::new(StatutoryRates::default);

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(
            OrganizationConfig {
                organization_id: "default".to_string(),
                name: "Default organization".to_string(),
                default_salary_timing: SalaryTiming::Current,
            },
            vec![
                MinimumWage {
                    year: 2024,
                    minimum_wage: 9_860,
                },
                MinimumWage {
                    year: 2025,
                    minimum_wage: 10_030,
                },
                MinimumWage {
                    year: 2026,
                    minimum_wage: 10_320,
                },
            ],
            vec![StatutoryRates::default()],
            ItemCatalog::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates_match_published_table() {
        let rates = StatutoryRates::default();
        assert_eq!(rates.national_pension_rate, Decimal::new(45, 3));
        assert_eq!(rates.health_insurance_rate.to_string(), "0.03545");
        assert_eq!(rates.long_term_care_rate.to_string(), "0.1281");
        assert_eq!(rates.employment_insurance_rate.to_string(), "0.009");
        assert_eq!(rates.income_tax_brackets.len(), 6);
        assert!(rates.income_tax_brackets.last().unwrap().upper_bound.is_none());
    }

    #[test]
    fn test_minimum_wage_lookup_is_exact_year() {
        let config = EngineConfig::default();
        assert_eq!(config.minimum_wage_for(2025), Some(10_030));
        assert_eq!(config.minimum_wage_for(2019), None);
    }

    #[test]
    fn test_rates_for_picks_newest_effective_table() {
        let mut newer = StatutoryRates::default();
        newer.year = 2026;
        newer.national_pension_rate = Decimal::new(475, 4);
        let config = EngineConfig::new(
            EngineConfig::default().organization().clone(),
            vec![],
            vec![newer, StatutoryRates::default()],
            ItemCatalog::default(),
        );

        assert_eq!(config.rates_for(2025).year, 2025);
        assert_eq!(config.rates_for(2026).year, 2026);
        assert_eq!(config.rates_for(2030).year, 2026);
        assert_eq!(config.rates_for(2010).year, 2025);
    }

    #[test]
    fn test_empty_rates_fall_back_to_default_table() {
        let config = EngineConfig::new(
            EngineConfig::default().organization().clone(),
            vec![],
            vec![],
            ItemCatalog::default(),
        );
        assert_eq!(config.rates().len(), 1);
        assert_eq!(config.rates_for(2025), &StatutoryRates::default());
    }

    #[test]
    fn test_duplicate_code_treats_legacy_spelling_as_same_code() {
        let mut catalog = ItemCatalog::default();
        assert_eq!(catalog.duplicate_code(), None);

        catalog.payment_items.push(PaymentCatalogItem {
            code: "PAY.01.BASIC".parse().unwrap(),
            name: "Basic pay".to_string(),
        });
        assert_eq!(catalog.duplicate_code(), Some("base_salary".to_string()));
    }

    #[test]
    fn test_duplicate_code_checks_deductions_and_bonuses() {
        let mut catalog = ItemCatalog::default();
        catalog.deduction_items.push(DeductionCatalogItem {
            code: DeductionCode::from("DED.11.LOCAL_TAX"),
            name: "Local tax".to_string(),
            default_amount: 0,
            default_line: false,
        });
        assert_eq!(catalog.duplicate_code(), Some("local_income_tax".to_string()));

        let mut catalog = ItemCatalog::default();
        let bonus = BonusCategory {
            code: "performance".to_string(),
            name: "Performance bonus".to_string(),
            default_amount: 0,
            default_remark: String::new(),
        };
        catalog.bonus_categories = vec![bonus.clone(), bonus];
        assert_eq!(catalog.duplicate_code(), Some("performance".to_string()));
    }

    #[test]
    fn test_default_catalog_lookups() {
        let catalog = ItemCatalog::default();
        assert!(catalog.payment_item(PaymentCode::BaseSalary).is_some());
        assert!(catalog.payment_item(PaymentCode::HourlyPay).is_none());
        assert_eq!(catalog.payment_name(PaymentCode::HourlyPay), "Hourly pay");
        assert!(
            catalog
                .deduction_items
                .iter()
                .all(|item| item.default_line && item.code.is_statutory())
        );
    }
}
