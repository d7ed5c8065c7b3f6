use serde::{Deserialize, Serialize};

use crate::coerce::{finite_or_zero, lenient_number};

/// Largest magnitude any input field takes part in the arithmetic with.
///
/// Keeps every derived figure finite: with all ten fields at this bound the
/// largest product stays far below `f64::MAX`.
pub const MAX_INPUT: f64 = 1e12;

fn bounded(value: f64) -> f64 {
    finite_or_zero(value).clamp(-MAX_INPUT, MAX_INPUT)
}

/// Operational figures entered by the prospect.
///
/// Every field deserializes leniently: a missing, `null` or non-numeric
/// value becomes `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RoiInput {
    #[serde(default, deserialize_with = "lenient_number")]
    pub events_per_year: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub avg_attendees_per_event: f64,

    /// Staff hours per event spent on registration.
    #[serde(default, deserialize_with = "lenient_number")]
    pub registration_hours: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub check_in_hours: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub badge_printing_hours: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub certificate_hours: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub reporting_hours: f64,

    /// Loaded staff cost per hour.
    #[serde(default, deserialize_with = "lenient_number")]
    pub avg_hourly_rate: f64,

    /// Share of process hours that need correction, as a percentage (0-100).
    #[serde(default, deserialize_with = "lenient_number")]
    pub error_rate: f64,
    /// Extra per-event hours spent on rework, on top of `error_rate`.
    #[serde(default, deserialize_with = "lenient_number")]
    pub rework_hours: f64,
}

impl RoiInput {
    /// Returns a copy with every non-finite field replaced by zero and every
    /// field clamped to `±MAX_INPUT`.
    pub fn sanitized(self) -> Self {
        Self {
            events_per_year: bounded(self.events_per_year),
            avg_attendees_per_event: bounded(self.avg_attendees_per_event),
            registration_hours: bounded(self.registration_hours),
            check_in_hours: bounded(self.check_in_hours),
            badge_printing_hours: bounded(self.badge_printing_hours),
            certificate_hours: bounded(self.certificate_hours),
            reporting_hours: bounded(self.reporting_hours),
            avg_hourly_rate: bounded(self.avg_hourly_rate),
            error_rate: bounded(self.error_rate),
            rework_hours: bounded(self.rework_hours),
        }
    }
}
