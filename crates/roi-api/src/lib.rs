//! HTTP service for the ROI calculator
//!
//! Wires the calculator and the report views into an axum router: JSON
//! calculation and form validation, the HTML results and print pages, PDF
//! download, and emailed reports (immediate or delayed after a form
//! submission).

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod pdf;
pub mod tracing_setup;
pub mod types;

use config::RoiConfig;
use dispatch::{ReportDelivery, ReportDispatcher};
use mailer::{MailDispatcher, MailError, SmtpMailer};
use pdf::ReportRenderer;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::calculate,
        handlers::validate_step,
        handlers::submit,
        handlers::report_page,
        handlers::print_page,
        handlers::download_pdf,
        handlers::send_email,
    ),
    components(schemas(
        roi_calculator::RoiInput,
        roi_calculator::RoiResult,
        roi_calculator::RoiReport,
        roi_calculator::RoiForm,
        roi_calculator::FieldErrors,
        types::HealthResponse,
        types::CalculateResponse,
        types::ValidateStepRequest,
        types::ValidateStepResponse,
        types::SubmitResponse,
        types::PdfRequest,
        types::SendEmailRequest,
        types::SendEmailResponse,
        error::ApiErrorResponse,
    )),
    tags((name = "roi", description = "Event attendance automation ROI calculator"))
)]
pub struct ApiDoc;

/// Shared state of the HTTP handlers.
pub struct AppState {
    pub config: RoiConfig,
    pub start_time: DateTime<Utc>,
    pub renderer: Arc<dyn ReportRenderer>,
    /// Present when mail delivery is configured.
    pub dispatcher: Option<ReportDispatcher>,
}

impl AppState {
    pub fn new(
        config: RoiConfig,
        renderer: Arc<dyn ReportRenderer>,
        mailer: Option<Arc<dyn MailDispatcher>>,
    ) -> Self {
        let dispatcher = mailer.map(|mailer| {
            let delivery = ReportDelivery::new(
                Arc::clone(&renderer),
                mailer,
                config.mail.subject.clone(),
                config.pdf.file_name.clone(),
            );
            ReportDispatcher::new(Arc::new(delivery))
        });
        Self { config, start_time: Utc::now(), renderer, dispatcher }
    }

    /// Builds the configured renderer and, when mail is enabled, the SMTP
    /// mailer.
    pub fn from_config(config: RoiConfig) -> Result<Self, MailError> {
        let renderer = pdf::build_renderer(&config.pdf, config.server.base_url.as_deref());
        let mailer: Option<Arc<dyn MailDispatcher>> = if config.mail.enabled {
            Some(Arc::new(SmtpMailer::from_config(&config.mail)?))
        } else {
            info!("Mail delivery disabled");
            None
        };
        Ok(Self::new(config, renderer, mailer))
    }

    pub fn elapsed(&self) -> Duration {
        (Utc::now() - self.start_time).to_std().unwrap_or_default()
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.limits.max_body_size_kb * 1024;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/calculate", post(handlers::calculate))
        .route("/api/validate-step", post(handlers::validate_step))
        .route("/api/submit", post(handlers::submit))
        .route("/api/report", post(handlers::report_page))
        .route("/roi-pdf", get(handlers::print_page))
        .route("/api/download-roi-pdf", post(handlers::download_pdf))
        .route("/api/send-roi-email", post(handlers::send_email))
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::from_fn(error::attach_request_id))
                .layer(CorsLayer::permissive())
                .map_response(IntoResponse::into_response)
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
}
