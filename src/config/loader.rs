//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading organization
//! payroll configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{
    EngineConfig, ItemCatalog, MinimumWagesConfig, OrganizationConfig, StatutoryRates,
};

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/default/
/// ├── organization.yaml   # Organization id, name, salary timing
/// ├── minimum_wages.yaml  # Minimum hourly wage per year
/// ├── catalog.yaml        # Payment items, deduction items, bonus categories
/// └── rates/
///     └── 2025.yaml       # Statutory rates effective from this year
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Organization: {}", loader.config().organization().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing or contains
    /// invalid YAML, if the catalog lists a code twice, or if the rates
    /// directory holds no rate files.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let organization = Self::load_yaml::<OrganizationConfig>(&path.join("organization.yaml"))?;
        let minimum_wages = Self::load_yaml::<MinimumWagesConfig>(&path.join("minimum_wages.yaml"))?;
        let catalog_path = path.join("catalog.yaml");
        let catalog = Self::load_yaml::<ItemCatalog>(&catalog_path)?;
        if let Some(code) = catalog.duplicate_code() {
            return Err(EngineError::ConfigParseError {
                path: catalog_path.display().to_string(),
                message: format!("item code '{}' is listed more than once", code),
            });
        }
        let rates = Self::load_rates(&path.join("rates"))?;

        let config = EngineConfig::new(organization, minimum_wages.minimum_wages, rates, catalog);

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all rate files from the rates directory.
    fn load_rates(rates_dir: &Path) -> EngineResult<Vec<StatutoryRates>> {
        let rates_dir_str = rates_dir.display().to_string();

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut rates = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                rates.push(Self::load_yaml::<StatutoryRates>(&path)?);
            }
        }

        if rates.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", rates_dir_str),
            });
        }

        Ok(rates)
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeductionCode, PaymentCode, SalaryTiming};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn config_path() -> &'static str {
        concat!(env!("CARGO_MANIFEST_DIR"), "/config/default")
    }

    #[test]
    fn test_load_default_config() {
        let loader = ConfigLoader::load(config_path());
        assert!(loader.is_ok(), "Failed to load config: {:?}", loader.err());
    }

    #[test]
    fn test_organization_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let organization = loader.config().organization();

        assert_eq!(organization.organization_id, "org_default");
        assert_eq!(organization.default_salary_timing, SalaryTiming::Current);
    }

    #[test]
    fn test_minimum_wages_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert_eq!(loader.config().minimum_wage_for(2024), Some(9_860));
        assert_eq!(loader.config().minimum_wage_for(2025), Some(10_030));
        assert_eq!(loader.config().minimum_wage_for(2026), Some(10_320));
        assert_eq!(loader.config().minimum_wage_for(1999), None);
    }

    #[test]
    fn test_rates_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let rates = loader.config().rates_for(2025);

        assert_eq!(rates.national_pension_rate, dec("0.045"));
        assert_eq!(rates.health_insurance_rate, dec("0.03545"));
        assert_eq!(rates.long_term_care_rate, dec("0.1281"));
        assert_eq!(rates.employment_insurance_rate, dec("0.009"));
        assert_eq!(rates.local_income_tax_rate, dec("0.10"));
        assert_eq!(rates.income_tax_brackets.len(), 6);
        assert_eq!(rates.income_tax_brackets[3].base_tax, 251_400);
    }

    #[test]
    fn test_catalog_accepts_legacy_codes() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let catalog = loader.config().catalog();

        assert!(catalog.payment_item(PaymentCode::BaseSalary).is_some());
        assert!(catalog.payment_item(PaymentCode::CarAllowance).is_some());
        assert!(catalog.deduction_item(&DeductionCode::IncomeTax).is_some());
        assert!(catalog.bonus_category("holiday_bonus").is_some());

        let union_dues = catalog
            .deduction_item(&DeductionCode::from("union_dues"))
            .unwrap();
        assert!(!union_dues.default_line);
        assert_eq!(union_dues.default_amount, 10_000);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("organization.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = std::env::temp_dir().join(format!("payroll-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("organization.yaml"), "organization_id: [unclosed").unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).ok();

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.contains("organization.yaml"));
            }
            _ => panic!("Expected ConfigParseError error"),
        }
    }

    #[test]
    fn test_empty_rates_directory_returns_error() {
        let source = Path::new(config_path());
        let dir = std::env::temp_dir().join(format!("payroll-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(dir.join("rates")).unwrap();
        for file in ["organization.yaml", "minimum_wages.yaml", "catalog.yaml"] {
            fs::copy(source.join(file), dir.join(file)).unwrap();
        }

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).ok();

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("no rate files found"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_catalog_with_repeated_code_is_rejected() {
        let source = Path::new(config_path());
        let dir = std::env::temp_dir().join(format!("payroll-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(dir.join("rates")).unwrap();
        for file in ["organization.yaml", "minimum_wages.yaml", "rates/2025.yaml"] {
            fs::copy(source.join(file), dir.join(file)).unwrap();
        }
        fs::write(
            dir.join("catalog.yaml"),
            "payment_items:\n  - code: base_salary\n    name: Base salary\n  - code: PAY.01.BASIC\n    name: Basic pay\ndeduction_items: []\n",
        )
        .unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).ok();

        match result {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert!(path.contains("catalog.yaml"));
                assert!(message.contains("base_salary"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other.err()),
        }
    }
}
