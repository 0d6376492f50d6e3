//! Configuration loading and management for the payroll engine.
//!
//! This module loads organization settings, the minimum-wage table,
//! year-versioned statutory rates and the item catalog from YAML files.
//! The resulting [`EngineConfig`] is passed explicitly to every engine entry
//! point.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded organization: {}", loader.config().organization().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BonusCategory, DeductionCatalogItem, EngineConfig, IncomeTaxBracket, ItemCatalog,
    MinimumWage, MinimumWagesConfig, OrganizationConfig, PaymentCatalogItem, StatutoryRates,
};
