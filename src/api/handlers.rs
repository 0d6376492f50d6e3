//! HTTP request handlers for the payroll engine API.
//!
//! Every endpoint is a thin JSON wrapper around a pure engine transform;
//! nothing is persisted.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    PayrollStatementBuilder, calculate_deductions, convert_wages, reset_inputs, validate_profile,
};
use crate::error::EngineResult;

use super::request::{
    ConvertWagesRequest, DeductionsRequest, ResetWagesRequest, StatementPreviewRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, DeductionsResponse, StatementPreviewResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/wages/convert", post(convert_wages_handler))
        .route("/wages/reset", post(reset_wages_handler))
        .route("/deductions", post(deductions_handler))
        .route("/statements/preview", post(statement_preview_handler))
        .with_state(state)
}

/// Handler for POST /wages/convert.
async fn convert_wages_handler(
    State(state): State<AppState>,
    payload: Result<Json<ConvertWagesRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing wage conversion request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let minimum_wage = state.config().minimum_wage_for(request.year);
    if minimum_wage.is_none() {
        warn!(
            correlation_id = %correlation_id,
            year = request.year,
            "No minimum wage on record for year"
        );
    }

    let breakdown = convert_wages(&request.inputs, minimum_wage);

    info!(
        correlation_id = %correlation_id,
        monthly_total = breakdown.monthly_total_amount,
        below_minimum = breakdown.is_below_minimum_wage,
        over_weekly_cap = breakdown.is_over_legal_weekly_cap,
        "Wage conversion completed"
    );

    json_ok(&breakdown)
}

/// Handler for POST /wages/reset.
async fn reset_wages_handler(
    State(state): State<AppState>,
    payload: Result<Json<ResetWagesRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing wage reset request");

    match payload {
        Ok(Json(request)) => json_ok(&reset_inputs(state.config(), request.year)),
        Err(rejection) => rejection_response(correlation_id, rejection),
    }
}

/// Handler for POST /deductions.
async fn deductions_handler(
    State(state): State<AppState>,
    payload: Result<Json<DeductionsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing deduction request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let rates = state.config().rates_for(request.year);
    let calculation = calculate_deductions(request.taxable_amount, &request.enrollment, rates, 1);

    let response = DeductionsResponse {
        rate_year: rates.year,
        taxable_amount: calculation.taxable_amount,
        total_deduction_amount: calculation.deductions.total(),
        deductions: calculation.deductions,
        audit_steps: calculation.audit_steps,
    };

    info!(
        correlation_id = %correlation_id,
        rate_year = response.rate_year,
        total_deduction = response.total_deduction_amount,
        "Deduction calculation completed"
    );

    json_ok(&response)
}

/// Handler for POST /statements/preview.
///
/// Builds a draft statement from a contract profile and optional attendance.
async fn statement_preview_handler(
    State(state): State<AppState>,
    payload: Result<Json<StatementPreviewRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing statement preview request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match preview_statement(&state, &request) {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %response.statement.employee_id,
                payroll_period = %response.statement.payroll_period,
                net_pay = response.statement.net_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Statement preview completed"
            );
            json_ok(&response)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Statement preview failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn preview_statement(
    state: &AppState,
    request: &StatementPreviewRequest,
) -> EngineResult<StatementPreviewResponse> {
    validate_profile(&request.profile)?;

    let mut builder =
        PayrollStatementBuilder::initialize_draft(state.config(), &request.header, request.payroll_period);
    builder.apply_contract_profile(&request.profile)?;
    let attendance = builder.apply_attendance(request.attendance.as_ref())?;

    Ok(StatementPreviewResponse {
        statement: builder.into_statement(),
        attendance,
    })
}

fn json_ok<T: Serialize>(body: &T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    ApiErrorResponse::bad_request(error).into_response()
}
