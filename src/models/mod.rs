//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod codes;
mod contract;
mod deduction;
mod statement;
mod wage;
mod year_month;

pub use audit::AuditStep;
pub use codes::{DeductionCode, PaymentCode, UnknownCode};
pub use contract::{
    ContractCompensationProfile, ContractHeader, EmploymentContract, EnrollmentFlags,
    FileAttachment, PayStructure, PeriodAttendance, PremiumAmounts, SalaryTiming,
    SupplementalRateOverrides, SupplementalRates,
};
pub use deduction::DeductionResult;
pub use statement::{
    AmountInput, BonusLine, DeductionItem, LineItemKind, LookupOutcome, PaymentItem,
    PayrollLineItem, PayrollStatement, StatementMode, StatementStatus,
};
pub use wage::{
    Allowance, CompensationBreakdown, DEFAULT_CAR_ALLOWANCE, DEFAULT_CHILDCARE_ALLOWANCE,
    DEFAULT_MEAL_ALLOWANCE, DEFAULT_WEEKLY_HOURS, NontaxableAllowances, WageInputs,
};
pub use year_month::YearMonth;
