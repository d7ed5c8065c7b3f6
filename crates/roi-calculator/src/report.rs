//! Fixed-precision projection of an [`RoiResult`].
//!
//! Rounding happens here and nowhere else. Currency, annual hours and ROI
//! use no decimals, per-event hours and payback months one, FTEs two.

use serde::{Deserialize, Serialize};

use crate::calculator::RoiResult;

/// Decimal digits kept past the requested precision when looking for an
/// exact half. Far below the spacing of any `f64` that can sit on a tie.
const TIE_GUARD_DIGITS: usize = 30;

/// Formats `value` with exactly `digits` fraction digits.
///
/// Exact halves round away from zero, matching `Number.prototype.toFixed`
/// rather than the round-half-to-even of `format!`. Non-finite values are
/// spelled `Infinity`, `-Infinity` and `NaN`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    let expanded = format!("{:.*}", digits + TIE_GUARD_DIGITS, magnitude);
    let (head, tail) = expanded.split_at(expanded.len() - TIE_GUARD_DIGITS);
    let is_tie = tail.starts_with('5') && tail.bytes().skip(1).all(|b| b == b'0');

    let body = if is_tie {
        let truncated: f64 = head.trim_end_matches('.').parse().unwrap_or(0.0);
        format!("{:.*}", digits, truncated + 10f64.powi(-(digits as i32)))
    } else {
        format!("{:.*}", digits, magnitude)
    };

    if value < 0.0 { format!("-{body}") } else { body }
}

/// Shortest round-trip text of a number, with `-0` shown as `0`.
fn plain_number(value: f64) -> String {
    if value == 0.0 { "0".to_string() } else { value.to_string() }
}

/// The numbers shown to the prospect, as display strings.
///
/// Every renderer (HTML view, print page, PDF document, email) reads this
/// one projection so the figures can never disagree between outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RoiReport {
    pub events_per_year: String,
    pub total_attendees: String,
    pub hours_per_event: String,
    pub error_hours_per_event: String,
    pub total_hours_per_event: String,
    pub annual_hours: String,
    pub annual_cost: String,
    pub hours_saved: String,
    pub cost_savings: String,
    pub error_reduction: String,
    pub total_first_year_savings: String,
    pub five_year_savings: String,
    pub ftes_saved: String,
    pub estimated_annual_cost: String,
    pub net_savings: String,
    pub roi: String,
    /// `None` when the subscription never pays for itself.
    pub payback_months: Option<String>,
    pub efficiency_percentage: String,
    pub time_per_event_after: String,
}

impl RoiReport {
    pub fn from_result(result: &RoiResult) -> Self {
        Self {
            events_per_year: plain_number(result.events_per_year),
            total_attendees: plain_number(result.total_attendees),
            hours_per_event: to_fixed(result.hours_per_event, 1),
            error_hours_per_event: to_fixed(result.error_hours_per_event, 1),
            total_hours_per_event: to_fixed(result.total_hours_per_event, 1),
            annual_hours: to_fixed(result.annual_hours, 0),
            annual_cost: to_fixed(result.annual_cost, 0),
            hours_saved: to_fixed(result.hours_saved, 0),
            cost_savings: to_fixed(result.cost_savings, 0),
            error_reduction: to_fixed(result.error_reduction, 0),
            total_first_year_savings: to_fixed(result.total_first_year_savings, 0),
            five_year_savings: to_fixed(result.five_year_savings, 0),
            ftes_saved: to_fixed(result.ftes_saved, 2),
            estimated_annual_cost: to_fixed(result.estimated_annual_cost, 0),
            net_savings: to_fixed(result.net_savings, 0),
            roi: to_fixed(result.roi, 0),
            payback_months: result.payback_months.map(|months| to_fixed(months, 1)),
            efficiency_percentage: to_fixed(result.efficiency_percentage, 0),
            time_per_event_after: to_fixed(result.time_per_event_after, 1),
        }
    }
}

impl From<&RoiResult> for RoiReport {
    fn from(result: &RoiResult) -> Self {
        Self::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_fixed_rounds_halves_away_from_zero() {
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(-2.5, 0), "-3");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(1.25, 1), "1.3");
    }

    #[test]
    fn to_fixed_respects_binary_representation() {
        // 1.005 is stored slightly below the half, so it rounds down.
        assert_eq!(to_fixed(1.005, 2), "1.00");
        // 0.45 is stored slightly above.
        assert_eq!(to_fixed(0.45, 1), "0.5");
    }

    #[test]
    fn to_fixed_pads_and_keeps_sign() {
        assert_eq!(to_fixed(3.0, 2), "3.00");
        assert_eq!(to_fixed(-0.4, 0), "-0");
        assert_eq!(to_fixed(0.0, 1), "0.0");
        assert_eq!(to_fixed(17106.25, 0), "17106");
    }

    #[test]
    fn to_fixed_spells_non_finite_values() {
        assert_eq!(to_fixed(f64::INFINITY, 1), "Infinity");
        assert_eq!(to_fixed(f64::NEG_INFINITY, 0), "-Infinity");
        assert_eq!(to_fixed(f64::NAN, 2), "NaN");
    }

    #[test]
    fn plain_number_drops_trailing_zero_fraction() {
        assert_eq!(plain_number(7500.0), "7500");
        assert_eq!(plain_number(12.5), "12.5");
        assert_eq!(plain_number(-0.0), "0");
    }
}
