//! Multi-step form model.
//!
//! The prospect fills the calculator in four steps. Each step is validated
//! on its own before the next one is shown, and the whole form once more on
//! submit. Values stay as the text that was typed until [`RoiForm::to_input`]
//! coerces them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use crate::coerce::parse_leading_number;
use crate::input::{MAX_INPUT, RoiInput};

/// One page of the calculator form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FormStep {
    /// Organization profile and event volume.
    Organization,
    /// Staff hours per task and hourly rate.
    StaffTime,
    /// Error rate and rework.
    ErrorsAndRework,
    /// Lead capture.
    Contact,
}

impl FormStep {
    pub const ALL: [FormStep; 4] =
        [FormStep::Organization, FormStep::StaffTime, FormStep::ErrorsAndRework, FormStep::Contact];

    /// 1-based position of the step, as shown in the progress bar.
    pub fn number(self) -> u8 {
        match self {
            FormStep::Organization => 1,
            FormStep::StaffTime => 2,
            FormStep::ErrorsAndRework => 3,
            FormStep::Contact => 4,
        }
    }

    pub fn next(self) -> Option<FormStep> {
        FormStep::try_from(self.number() + 1).ok()
    }

    pub fn previous(self) -> Option<FormStep> {
        self.number().checked_sub(1).and_then(|n| FormStep::try_from(n).ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("form step must be between 1 and 4, got {0}")]
pub struct InvalidStep(pub u8);

impl TryFrom<u8> for FormStep {
    type Error = InvalidStep;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FormStep::Organization),
            2 => Ok(FormStep::StaffTime),
            3 => Ok(FormStep::ErrorsAndRework),
            4 => Ok(FormStep::Contact),
            other => Err(InvalidStep(other)),
        }
    }
}

impl From<FormStep> for u8 {
    fn from(step: FormStep) -> Self {
        step.number()
    }
}

/// Field-level validation messages keyed by the form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Records `message` for `field` unless the field already has one.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, message) in other.0 {
            self.0.entry(field).or_insert(message);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Everything the prospect types into the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct RoiForm {
    pub organization_type: String,
    pub organization_size: String,

    pub events_per_year: String,
    pub avg_attendees_per_event: String,

    pub registration_hours: String,
    pub check_in_hours: String,
    pub badge_printing_hours: String,
    pub certificate_hours: String,
    pub reporting_hours: String,

    pub avg_hourly_rate: String,

    pub error_rate: String,
    pub rework_hours: String,

    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub phone: String,

    /// Whether to email the PDF report after submission.
    pub send_report: bool,
}

impl Default for RoiForm {
    fn default() -> Self {
        Self {
            organization_type: String::new(),
            organization_size: String::new(),
            events_per_year: String::new(),
            avg_attendees_per_event: String::new(),
            registration_hours: String::new(),
            check_in_hours: String::new(),
            badge_printing_hours: String::new(),
            certificate_hours: String::new(),
            reporting_hours: String::new(),
            avg_hourly_rate: String::new(),
            error_rate: String::new(),
            rework_hours: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            company: String::new(),
            phone: String::new(),
            send_report: true,
        }
    }
}

type Accessor = fn(&RoiForm) -> &str;

struct RequiredField {
    name: &'static str,
    value: Accessor,
    message: &'static str,
    numeric: bool,
}

const fn text(name: &'static str, value: Accessor, message: &'static str) -> RequiredField {
    RequiredField { name, value, message, numeric: false }
}

const fn number(name: &'static str, value: Accessor, message: &'static str) -> RequiredField {
    RequiredField { name, value, message, numeric: true }
}

const ORGANIZATION_FIELDS: &[RequiredField] = &[
    text("organizationType", |f| f.organization_type.as_str(), "Organization type is required."),
    text("organizationSize", |f| f.organization_size.as_str(), "Organization size is required."),
    number("eventsPerYear", |f| f.events_per_year.as_str(), "Events per year is required."),
    number("avgAttendeesPerEvent", |f| f.avg_attendees_per_event.as_str(), "Average attendees is required."),
];

const STAFF_TIME_FIELDS: &[RequiredField] = &[
    number("registrationHours", |f| f.registration_hours.as_str(), "Required."),
    number("checkInHours", |f| f.check_in_hours.as_str(), "Required."),
    number("badgePrintingHours", |f| f.badge_printing_hours.as_str(), "Required."),
    number("certificateHours", |f| f.certificate_hours.as_str(), "Required."),
    number("reportingHours", |f| f.reporting_hours.as_str(), "Required."),
    number("avgHourlyRate", |f| f.avg_hourly_rate.as_str(), "Required."),
];

const ERROR_FIELDS: &[RequiredField] = &[
    number("errorRate", |f| f.error_rate.as_str(), "Error rate is required."),
    number("reworkHours", |f| f.rework_hours.as_str(), "Rework hours are required."),
];

const CONTACT_FIELDS: &[RequiredField] = &[
    text("firstName", |f| f.first_name.as_str(), "First name is required."),
    text("lastName", |f| f.last_name.as_str(), "Last name is required."),
    text("email", |f| f.email.as_str(), "Email is required."),
    text("company", |f| f.company.as_str(), "Organization name is required."),
];

const NOT_A_NUMBER: &str = "Must be a number zero or greater.";
const TOO_LARGE: &str = "Must be at most 1,000,000,000,000.";
const ERROR_RATE_RANGE: &str = "Error rate must be between 0 and 100.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";

fn fields_for(step: FormStep) -> &'static [RequiredField] {
    match step {
        FormStep::Organization => ORGANIZATION_FIELDS,
        FormStep::StaffTime => STAFF_TIME_FIELDS,
        FormStep::ErrorsAndRework => ERROR_FIELDS,
        FormStep::Contact => CONTACT_FIELDS,
    }
}

fn strict_non_negative(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

pub fn looks_like_email(address: &str) -> bool {
    let address = address.trim();
    if address.chars().any(char::is_whitespace) {
        return false;
    }
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|label| !label.is_empty())
        }
        None => false,
    }
}

impl RoiForm {
    /// Validates the fields shown on `step`.
    pub fn validate_step(&self, step: FormStep) -> FieldErrors {
        let mut errors = FieldErrors::new();

        for field in fields_for(step) {
            let value = (field.value)(self).trim();
            if value.is_empty() {
                errors.insert(field.name, field.message);
            } else if field.numeric {
                match strict_non_negative(value) {
                    None => errors.insert(field.name, NOT_A_NUMBER),
                    Some(number) if number > MAX_INPUT => errors.insert(field.name, TOO_LARGE),
                    Some(_) => {}
                }
            }
        }

        match step {
            FormStep::ErrorsAndRework => {
                if strict_non_negative(&self.error_rate).is_some_and(|rate| rate > 100.0) {
                    errors.insert("errorRate", ERROR_RATE_RANGE);
                }
            }
            FormStep::Contact => {
                if !self.email.trim().is_empty() && !looks_like_email(&self.email) {
                    errors.insert("email", INVALID_EMAIL);
                }
            }
            FormStep::Organization | FormStep::StaffTime => {}
        }

        errors
    }

    /// Validates every step, as done on final submission.
    pub fn validate_all(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for step in FormStep::ALL {
            errors.merge(self.validate_step(step));
        }
        errors
    }

    /// First step that still has errors, if any.
    pub fn first_invalid_step(&self) -> Option<FormStep> {
        FormStep::ALL.into_iter().find(|step| !self.validate_step(*step).is_empty())
    }

    /// Coerces the typed values into a calculator input.
    ///
    /// Never fails: anything that does not start with a number counts as zero.
    pub fn to_input(&self) -> RoiInput {
        let coerce = |name: &str, text: &str| {
            let value = parse_leading_number(text);
            if value == 0.0 && !text.trim().is_empty() && strict_non_negative(text).is_none() {
                debug!(field = name, raw = text, "coerced non-numeric form value to zero");
            }
            value
        };

        RoiInput {
            events_per_year: coerce("eventsPerYear", &self.events_per_year),
            avg_attendees_per_event: coerce("avgAttendeesPerEvent", &self.avg_attendees_per_event),
            registration_hours: coerce("registrationHours", &self.registration_hours),
            check_in_hours: coerce("checkInHours", &self.check_in_hours),
            badge_printing_hours: coerce("badgePrintingHours", &self.badge_printing_hours),
            certificate_hours: coerce("certificateHours", &self.certificate_hours),
            reporting_hours: coerce("reportingHours", &self.reporting_hours),
            avg_hourly_rate: coerce("avgHourlyRate", &self.avg_hourly_rate),
            error_rate: coerce("errorRate", &self.error_rate),
            rework_hours: coerce("reworkHours", &self.rework_hours),
        }
    }

    /// Display name used to greet the prospect.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim()).trim().to_string()
    }
}
