//! Error handling for the ROI API
//!
//! Every handler returns [`ApiError`], which maps onto an HTTP status code and
//! a JSON body with a stable `code` string.

use axum::{
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use roi_calculator::FieldErrors;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::dispatch::DeliveryError;
use crate::mailer::MailError;
use crate::pdf::RenderError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request body or query (400 Bad Request)
    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    /// Form fields that failed validation (400 Bad Request)
    #[error("Validation failed for {} field(s)", errors.len())]
    Validation { errors: FieldErrors },

    /// Mail is switched off in the configuration (503 Service Unavailable)
    #[error("Mail delivery is not configured")]
    MailDisabled,

    /// PDF rendering failed (500 Internal Server Error)
    #[error("Failed to generate PDF: {0}")]
    Render(#[from] RenderError),

    /// SMTP delivery failed (502 Bad Gateway)
    #[error("Failed to send email: {0}")]
    Mail(#[from] MailError),

    /// Internal server errors (500 Internal Server Error)
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::MailDisabled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Mail(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::MailDisabled => "MAIL_DISABLED",
            ApiError::Render(_) => "PDF_RENDER_ERROR",
            ApiError::Mail(_) => "MAIL_DELIVERY_ERROR",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> ApiErrorResponse {
        let details = match self {
            ApiError::Validation { errors } => serde_json::to_value(errors).ok(),
            _ => None,
        };

        ApiErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details,
            request_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,

    #[schema(example = "Validation failed for 2 field(s)")]
    pub message: String,

    /// Field messages for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// Echo of the `x-request-id` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    pub timestamp: DateTime<Utc>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = self.to_response();
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Copies the request's `x-request-id` into JSON error bodies.
///
/// Runs inside the layer that assigns the id, so every request carries one.
pub async fn attach_request_id(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let mut response = next.run(request).await;
    let Some(mut body) = response.extensions_mut().remove::<ApiErrorResponse>() else {
        return response;
    };
    body.request_id = request_id;

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    (parts, Json(body)).into_response()
}

impl From<DeliveryError> for ApiError {
    fn from(err: DeliveryError) -> Self {
        match err {
            DeliveryError::Render(err) => ApiError::Render(err),
            DeliveryError::Mail(err) => ApiError::Mail(err),
        }
    }
}

impl From<askama::Error> for ApiError {
    fn from(err: askama::Error) -> Self {
        ApiError::internal(format!("template rendering failed: {err}"))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
