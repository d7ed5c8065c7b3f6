use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::header,
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use lettre::Address;
use roi_calculator::{FieldErrors, INVALID_EMAIL, RoiForm, RoiInput, compute, looks_like_email};
use roi_web::{ReportView, render_print_page, render_report_page};
use tracing::{debug, info, instrument};

use crate::AppState;
use crate::dispatch::Recipient;
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::types::{
    CalculateResponse, HealthResponse, PdfRequest, PrintQuery, SendEmailRequest,
    SendEmailResponse, SubmitResponse, ValidateStepRequest, ValidateStepResponse,
};

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Whether the mailer will accept `email` as a recipient.
fn deliverable(email: &str) -> bool {
    looks_like_email(email) && email.trim().parse::<Address>().is_ok()
}

fn invalid_email() -> ApiError {
    let mut errors = FieldErrors::new();
    errors.insert("email", INVALID_EMAIL);
    ApiError::Validation { errors }
}

fn view_of(input: RoiInput) -> ReportView {
    ReportView::new(&compute(input).report())
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "roi",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.elapsed().as_secs(),
        timestamp: Utc::now(),
    })
}

#[utoipa::path(
    post,
    path = "/api/calculate",
    tag = "roi",
    request_body = RoiInput,
    responses(
        (status = 200, description = "Computed metrics", body = CalculateResponse),
        (status = 400, description = "Body is not a JSON object", body = ApiErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn calculate(
    payload: Result<Json<RoiInput>, JsonRejection>,
) -> ApiResult<Json<CalculateResponse>> {
    let input = json_body(payload)?;
    let response = CalculateResponse::from(compute(input));
    debug!(roi = %response.report.roi, "ROI calculated");
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/validate-step",
    tag = "roi",
    request_body = ValidateStepRequest,
    responses(
        (status = 200, description = "Field errors of the step", body = ValidateStepResponse),
        (status = 400, description = "Unknown step or malformed body", body = ApiErrorResponse)
    )
)]
pub async fn validate_step(
    payload: Result<Json<ValidateStepRequest>, JsonRejection>,
) -> ApiResult<Json<ValidateStepResponse>> {
    let ValidateStepRequest { step, form } = json_body(payload)?;
    let errors = form.validate_step(step);
    let valid = errors.is_empty();
    Ok(Json(ValidateStepResponse {
        valid,
        errors,
        next_step: if valid { step.next() } else { None },
    }))
}

#[utoipa::path(
    post,
    path = "/api/submit",
    tag = "roi",
    request_body = RoiForm,
    responses(
        (status = 200, description = "Report and email scheduling", body = SubmitResponse),
        (status = 400, description = "Field errors", body = ApiErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RoiForm>, JsonRejection>,
) -> ApiResult<Json<SubmitResponse>> {
    let form = json_body(payload)?;
    let mut errors = form.validate_all();
    if errors.get("email").is_none() && !deliverable(&form.email) {
        errors.insert("email", INVALID_EMAIL);
    }
    if !errors.is_empty() {
        debug!(fields = errors.len(), "Submission rejected");
        return Err(ApiError::Validation { errors });
    }

    let report = compute(form.to_input()).report();

    let dispatch = match (&state.dispatcher, form.send_report) {
        (Some(dispatcher), true) => {
            let recipient =
                Recipient { email: form.email.trim().to_string(), name: form.full_name() };
            Some(dispatcher.schedule(recipient, report.clone(), state.config.mail.send_delay()))
        }
        (None, true) => {
            info!("Report email requested but mail is disabled");
            None
        }
        (_, false) => None,
    };

    info!(
        organization_type = %form.organization_type,
        email_scheduled = dispatch.is_some(),
        "ROI form submitted"
    );

    Ok(Json(SubmitResponse {
        report,
        email_scheduled: dispatch.is_some(),
        dispatch_id: dispatch.map(|d| d.id.to_string()),
    }))
}

#[utoipa::path(
    post,
    path = "/api/report",
    tag = "roi",
    request_body = RoiInput,
    responses(
        (status = 200, description = "Results page", content_type = "text/html", body = String)
    )
)]
pub async fn report_page(
    payload: Result<Json<RoiInput>, JsonRejection>,
) -> ApiResult<Html<String>> {
    let input = json_body(payload)?;
    Ok(Html(render_report_page(&view_of(input))?))
}

#[utoipa::path(
    get,
    path = "/roi-pdf",
    tag = "roi",
    params(("data" = String, Query, description = "JSON-encoded input record")),
    responses(
        (status = 200, description = "Print page", content_type = "text/html", body = String),
        (status = 400, description = "data is not JSON", body = ApiErrorResponse)
    )
)]
pub async fn print_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PrintQuery>,
) -> ApiResult<Html<String>> {
    let input: RoiInput = serde_json::from_str(&query.data).map_err(|err| {
        ApiError::bad_request(format!("data is not a valid input record: {err}"))
    })?;
    let origin = state.config.server.base_url.as_deref();
    Ok(Html(render_print_page(&view_of(input), origin)?))
}

#[utoipa::path(
    post,
    path = "/api/download-roi-pdf",
    tag = "roi",
    request_body = PdfRequest,
    responses(
        (status = 200, description = "PDF attachment", content_type = "application/pdf"),
        (status = 500, description = "PDF rendering failed", body = ApiErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn download_pdf(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PdfRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let request = json_body(payload)?;
    let pdf = state.renderer.render(&view_of(request.roi_data)).await?;
    debug!(renderer = state.renderer.name(), bytes = pdf.len(), "PDF rendered");

    let disposition = format!("attachment; filename={}", state.config.pdf.file_name);
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    Ok((headers, pdf).into_response())
}

#[utoipa::path(
    post,
    path = "/api/send-roi-email",
    tag = "roi",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Email sent", body = SendEmailResponse),
        (status = 400, description = "Invalid recipient", body = ApiErrorResponse),
        (status = 503, description = "Mail is not configured", body = ApiErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendEmailRequest>, JsonRejection>,
) -> ApiResult<Json<SendEmailResponse>> {
    let request = json_body(payload)?;
    if !deliverable(&request.email) {
        return Err(invalid_email());
    }
    let dispatcher = state.dispatcher.as_ref().ok_or(ApiError::MailDisabled)?;

    let recipient = Recipient { email: request.email.trim().to_string(), name: request.name };
    let report = compute(request.roi_data).report();
    dispatcher.delivery().deliver(&recipient, &report).await?;

    info!(recipient = %recipient.email, "Report email sent");
    Ok(Json(SendEmailResponse { success: true }))
}
