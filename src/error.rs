//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every rejection the engine can report. Validation failures leave the
//! caller's draft untouched and editable; only [`EngineError::Persistence`]
//! signals that an outward side effect failed.

use thiserror::Error;

use crate::models::LineItemKind;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::MissingRequiredField {
///     field: "payment_date".to_string(),
/// };
/// assert_eq!(error.to_string(), "Required field missing: payment_date");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A payroll month string was not in `YYYY-MM` form.
    #[error("Invalid payroll month '{value}': expected YYYY-MM")]
    InvalidYearMonth {
        /// The rejected input.
        value: String,
    },

    /// A field required before submission was empty.
    #[error("Required field missing: {field}")]
    MissingRequiredField {
        /// The name of the missing field.
        field: String,
    },

    /// A bonus line carried a zero or negative amount.
    #[error("Bonus '{category}' must have an amount greater than zero; remove the line instead")]
    NonPositiveBonus {
        /// The bonus category code.
        category: String,
        /// The rejected amount.
        amount: i64,
    },

    /// A line item with the same code already exists on the statement.
    #[error("{kind} item '{code}' is already added")]
    DuplicateLineItem {
        /// Whether the duplicate was a payment, deduction or bonus line.
        kind: LineItemKind,
        /// The duplicated code.
        code: String,
    },

    /// No line item with the given code exists on the statement.
    #[error("{kind} item '{code}' not found on statement")]
    LineItemNotFound {
        /// The kind of line that was looked up.
        kind: LineItemKind,
        /// The missing code.
        code: String,
    },

    /// The organization catalog has no entry for the given code.
    #[error("{kind} code '{code}' is not in the organization catalog")]
    CatalogEntryNotFound {
        /// The catalog that was searched.
        kind: LineItemKind,
        /// The unknown code.
        code: String,
    },

    /// A supplemental hourly rate failed validation.
    #[error("Invalid supplemental rate: {message}")]
    InvalidSupplementalRate {
        /// A description of what made the rate invalid.
        message: String,
    },

    /// The statement is backed by a replacement file, so line items are locked.
    #[error("Statement is in file mode; computed line items are unavailable")]
    FileModeActive,

    /// The statement has been emailed and its contents are frozen.
    #[error("Statement is {status} and can no longer be edited")]
    StatementLocked {
        /// The statement's current status.
        status: String,
    },

    /// The statement cannot move between the given states.
    #[error("Cannot move statement from {from} to {to}")]
    InvalidStateTransition {
        /// The current state.
        from: String,
        /// The requested state.
        to: String,
    },

    /// The persistence collaborator failed; the operation was aborted.
    #[error("Failed to persist statement: {message}")]
    Persistence {
        /// The message surfaced by the repository.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
