//! Compensation and payroll statement engine.
//!
//! This crate converts hourly wages and worked hours into monthly and annual
//! salary breakdowns, builds per-contract compensation profiles, estimates
//! statutory insurance and tax deductions, and assembles monthly payroll
//! statements with payment and deduction line items.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
