//! Request and response bodies of the HTTP API.

use chrono::{DateTime, Utc};
use roi_calculator::{FieldErrors, FormStep, RoiForm, RoiInput, RoiReport, RoiResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

/// Raw metrics plus the fixed-precision projection every renderer uses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalculateResponse {
    pub result: RoiResult,
    pub report: RoiReport,
}

impl From<RoiResult> for CalculateResponse {
    fn from(result: RoiResult) -> Self {
        Self { report: result.report(), result }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ValidateStepRequest {
    /// Step number, 1 to 4.
    #[schema(value_type = u8, example = 1)]
    pub step: FormStep,
    #[serde(default)]
    pub form: RoiForm,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateStepResponse {
    pub valid: bool,
    pub errors: FieldErrors,
    /// The step to show next when this one is valid.
    #[schema(value_type = Option<u8>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<FormStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub report: RoiReport,
    pub email_scheduled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch_id: Option<String>,
}

/// Body of the PDF download.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PdfRequest {
    #[serde(default)]
    pub roi_data: RoiInput,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub email: String,
    /// Greeting name; optional.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roi_data: RoiInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendEmailResponse {
    pub success: bool,
}

/// Query of the print page: `data` is a JSON-encoded input record.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintQuery {
    pub data: String,
}
