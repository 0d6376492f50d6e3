//! HTTP API module for the payroll engine.
//!
//! This module exposes the wage converter, the deduction calculator and
//! statement previews as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ConvertWagesRequest, DeductionsRequest, ResetWagesRequest, StatementPreviewRequest,
};
pub use response::{ApiError, ApiErrorResponse, DeductionsResponse, StatementPreviewResponse};
pub use state::AppState;
