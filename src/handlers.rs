// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact relay.
//!
//! The static site's form posts here. Each submission moves through
//! validation, the submission gate and the provider call; the first step
//! that stops it decides the response.

use crate::dispatcher::{DispatchOutcome, EmailDispatcher};
use crate::models::ContactSubmission;
use crate::validator::{ContactValidator, ValidationErrors};
use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, info, warn};

pub const INVALID_FORM_MESSAGE: &str = "Please fix the form errors and try again.";

/// Shared application state.
pub struct AppState {
    pub validator: ContactValidator,
    pub dispatcher: EmailDispatcher,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Contact submission response.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

/// Validation-only response.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub errors: ValidationErrors,
}

/// Build the service routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/contact", post(contact))
        .route("/contact/validate", post(validate))
        .with_state(state)
}

/// CORS policy for the site posting the form.
pub fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::POST, Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    match allowed_origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        Some(origin) => layer.allow_origin(AllowOrigin::exact(origin)),
        None => {
            if let Some(origin) = allowed_origin {
                warn!(%origin, "Ignoring unparseable CORS origin");
            }
            layer.allow_origin(Any)
        }
    }
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-relay",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Validate a submission without sending it.
pub async fn validate(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<ContactSubmission>,
) -> Json<ValidateResponse> {
    let errors = state.validator.validate(&submission);
    Json(ValidateResponse {
        valid: errors.is_empty(),
        errors,
    })
}

/// Validate, gate and send a contact submission.
///
/// The submission gate is keyed by the peer IP, so one visitor running out
/// of quota does not block anyone else.
pub async fn contact(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(submission): Json<ContactSubmission>,
) -> Response {
    let ip = addr.ip();
    debug!(ip = %ip, email = %submission.email, "Processing contact submission");

    let errors = state.validator.validate(&submission);
    if !errors.is_empty() {
        info!(fields = ?errors.fields().collect::<Vec<_>>(), "Submission rejected by validation");
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ContactResponse {
                success: false,
                message: INVALID_FORM_MESSAGE.to_string(),
                errors: Some(errors),
            }),
        )
            .into_response();
    }

    let result = state
        .dispatcher
        .send_email(&submission, &ip.to_string())
        .await;
    let body = Json(ContactResponse {
        success: result.success,
        message: result.message,
        errors: None,
    });

    match result.outcome {
        DispatchOutcome::Sent => (StatusCode::OK, body).into_response(),
        DispatchOutcome::RateLimited {
            retry_after_minutes,
        } => {
            let retry_secs = retry_after_minutes.saturating_mul(60);
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_secs.to_string())],
                body,
            )
                .into_response()
        }
        DispatchOutcome::Failed(_) => (StatusCode::BAD_GATEWAY, body).into_response(),
    }
}
