//! Response types for the payroll engine API.
//!
//! This module defines the success bodies, the error response structure and
//! the mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{AuditStep, DeductionResult, LookupOutcome, PayrollStatement};

/// Response body for `POST /deductions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionsResponse {
    /// Year of the rate table that was applied.
    pub rate_year: i32,
    /// The taxable amount after clamping.
    pub taxable_amount: i64,
    /// The six statutory deductions.
    pub deductions: DeductionResult,
    /// Sum of all deductions.
    pub total_deduction_amount: i64,
    /// How each amount was reached.
    pub audit_steps: Vec<AuditStep>,
}

/// Response body for `POST /statements/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementPreviewResponse {
    /// The draft statement.
    pub statement: PayrollStatement,
    /// Whether attendance was supplied and applied.
    pub attendance: LookupOutcome,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a missing field error response.
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::with_details(
            "MISSING_FIELD",
            format!("missing field: {}", field),
            format!("Required field '{}' was not provided", field),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
            EngineError::ConfigParseError { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration parse error", message),
            },
            EngineError::Persistence { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::new("PERSISTENCE_ERROR", message),
            },
            EngineError::MissingRequiredField { field } => {
                Self::bad_request(ApiError::missing_field(field))
            }
            EngineError::InvalidYearMonth { .. } => {
                Self::bad_request(ApiError::new("INVALID_YEAR_MONTH", message))
            }
            EngineError::NonPositiveBonus { .. } => {
                Self::bad_request(ApiError::new("INVALID_BONUS", message))
            }
            EngineError::DuplicateLineItem { .. } => {
                Self::bad_request(ApiError::new("DUPLICATE_LINE_ITEM", message))
            }
            EngineError::LineItemNotFound { .. } => {
                Self::bad_request(ApiError::new("LINE_ITEM_NOT_FOUND", message))
            }
            EngineError::CatalogEntryNotFound { .. } => {
                Self::bad_request(ApiError::new("CATALOG_ENTRY_NOT_FOUND", message))
            }
            EngineError::InvalidSupplementalRate { .. } => {
                Self::bad_request(ApiError::new("INVALID_SUPPLEMENTAL_RATE", message))
            }
            EngineError::FileModeActive => {
                Self::bad_request(ApiError::new("FILE_MODE_ACTIVE", message))
            }
            EngineError::StatementLocked { .. } => {
                Self::bad_request(ApiError::new("STATEMENT_LOCKED", message))
            }
            EngineError::InvalidStateTransition { .. } => {
                Self::bad_request(ApiError::new("INVALID_STATE_TRANSITION", message))
            }
        }
    }
}
