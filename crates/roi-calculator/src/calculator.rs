//! The ROI computation.
//!
//! All arithmetic runs in full `f64` precision. Nothing here rounds; the
//! fixed-precision projection lives in [`crate::report`].

use serde::{Deserialize, Serialize};

use crate::input::RoiInput;
use crate::report::RoiReport;

/// Share of manual process hours removed by automation.
pub const EFFICIENCY_GAIN: f64 = 0.85;

/// Share of error-correction cost removed by automation.
pub const ERROR_REDUCTION_FACTOR: f64 = 0.95;

/// Annual subscription estimate. Flat for every event volume.
pub const ESTIMATED_ANNUAL_COST: f64 = 2028.0;

/// Standard annual working hours of one full-time employee.
pub const WORK_HOURS_PER_FTE: f64 = 2080.0;

const YEARS_PROJECTED: f64 = 5.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Every metric derived from a [`RoiInput`], unrounded.
///
/// A result is computed once per submission and handed by value to the
/// renderers and the mailer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RoiResult {
    pub events_per_year: f64,
    pub total_attendees: f64,
    pub hours_per_event: f64,
    pub error_hours_per_event: f64,
    pub total_hours_per_event: f64,
    pub annual_hours: f64,
    pub annual_cost: f64,
    pub efficiency_gain: f64,
    pub hours_saved: f64,
    pub cost_savings: f64,
    pub error_reduction: f64,
    pub total_first_year_savings: f64,
    pub five_year_savings: f64,
    pub estimated_annual_cost: f64,
    pub net_savings: f64,
    pub roi: f64,
    /// Months until the subscription pays for itself.
    ///
    /// `None` when first-year savings are zero or negative, or too small for
    /// the payback period to be a finite number of months.
    pub payback_months: Option<f64>,
    pub ftes_saved: f64,
    pub efficiency_percentage: f64,
    pub time_per_event_after: f64,
}

/// Computes the ROI metrics for `input`.
///
/// Total: non-finite inputs are treated as zero, inputs are clamped to
/// [`MAX_INPUT`](crate::input::MAX_INPUT), and every derived figure is
/// finite. Error and rework hours are added on top of the process hours
/// before annualising, so the error cost is part of `annual_cost` and is
/// also reported on its own as `error_reduction`.
pub fn compute(input: RoiInput) -> RoiResult {
    let input = input.sanitized();

    let total_attendees = input.events_per_year * input.avg_attendees_per_event;

    let hours_per_event = input.registration_hours
        + input.check_in_hours
        + input.badge_printing_hours
        + input.certificate_hours
        + input.reporting_hours;
    let error_hours_per_event = hours_per_event * input.error_rate / 100.0 + input.rework_hours;
    let total_hours_per_event = hours_per_event + error_hours_per_event;

    let annual_hours = total_hours_per_event * input.events_per_year;
    let annual_cost = annual_hours * input.avg_hourly_rate;

    let hours_saved = annual_hours * EFFICIENCY_GAIN;
    let cost_savings = hours_saved * input.avg_hourly_rate;
    let error_reduction =
        annual_hours * (input.error_rate / 100.0) * input.avg_hourly_rate * ERROR_REDUCTION_FACTOR;

    let total_first_year_savings = cost_savings;
    let five_year_savings = total_first_year_savings * YEARS_PROJECTED;

    let estimated_annual_cost = ESTIMATED_ANNUAL_COST;
    let net_savings = total_first_year_savings - estimated_annual_cost;
    let roi = (net_savings / estimated_annual_cost) * 100.0;
    let payback_months = (total_first_year_savings > 0.0)
        .then(|| estimated_annual_cost / (total_first_year_savings / MONTHS_PER_YEAR))
        .filter(|months| months.is_finite());

    RoiResult {
        events_per_year: input.events_per_year,
        total_attendees,
        hours_per_event,
        error_hours_per_event,
        total_hours_per_event,
        annual_hours,
        annual_cost,
        efficiency_gain: EFFICIENCY_GAIN,
        hours_saved,
        cost_savings,
        error_reduction,
        total_first_year_savings,
        five_year_savings,
        estimated_annual_cost,
        net_savings,
        roi,
        payback_months,
        ftes_saved: hours_saved / WORK_HOURS_PER_FTE,
        efficiency_percentage: EFFICIENCY_GAIN * 100.0,
        time_per_event_after: total_hours_per_event * (1.0 - EFFICIENCY_GAIN),
    }
}

impl RoiResult {
    /// Whether the subscription ever pays for itself.
    pub fn has_payback(&self) -> bool {
        self.payback_months.is_some()
    }

    /// Projects the result onto its display precision.
    pub fn report(&self) -> RoiReport {
        RoiReport::from_result(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> RoiInput {
        RoiInput {
            events_per_year: 50.0,
            avg_attendees_per_event: 150.0,
            registration_hours: 2.0,
            check_in_hours: 3.0,
            badge_printing_hours: 1.5,
            certificate_hours: 2.0,
            reporting_hours: 1.5,
            avg_hourly_rate: 35.0,
            error_rate: 5.0,
            rework_hours: 1.0,
        }
    }

    #[test]
    fn per_event_hours_include_error_overhead() {
        let result = compute(sample_input());
        assert_eq!(result.hours_per_event, 10.0);
        assert_eq!(result.error_hours_per_event, 1.5);
        assert_eq!(result.total_hours_per_event, 11.5);
    }

    #[test]
    fn error_cost_is_counted_in_annual_cost_and_reported_separately() {
        let result = compute(sample_input());
        // 575 annual hours already include the 75 error hours.
        assert_eq!(result.annual_hours, 575.0);
        assert_eq!(result.annual_cost, 20125.0);
        assert_eq!(result.error_reduction, 575.0 * 0.05 * 35.0 * 0.95);
    }

    #[test]
    fn payback_is_absent_without_savings() {
        let result = compute(RoiInput { events_per_year: 10.0, ..RoiInput::default() });
        assert_eq!(result.total_first_year_savings, 0.0);
        assert_eq!(result.payback_months, None);
        assert!(!result.has_payback());
        assert_eq!(result.roi, -100.0);
    }

    #[test]
    fn negative_savings_have_no_payback() {
        let result = compute(RoiInput {
            events_per_year: 1.0,
            registration_hours: 1.0,
            avg_hourly_rate: -10.0,
            ..RoiInput::default()
        });
        assert!(result.total_first_year_savings < 0.0);
        assert_eq!(result.payback_months, None);
        assert!(result.roi.is_finite());
    }

    #[test]
    fn non_finite_inputs_are_zeroed() {
        let result = compute(RoiInput {
            events_per_year: f64::NAN,
            avg_attendees_per_event: 100.0,
            ..RoiInput::default()
        });
        assert_eq!(result.events_per_year, 0.0);
        assert_eq!(result.total_attendees, 0.0);
    }

    #[test]
    fn vanishing_savings_have_no_payback() {
        let result = compute(RoiInput {
            events_per_year: 1e-300,
            registration_hours: 1e-10,
            avg_hourly_rate: 1.0,
            ..RoiInput::default()
        });
        assert!(result.total_first_year_savings > 0.0);
        assert_eq!(result.payback_months, None);
        assert_eq!(result.report().payback_months, None);
    }
}
