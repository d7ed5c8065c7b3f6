//! ROI calculator for event attendance automation.
//!
//! This crate provides the pure computation that turns operational figures
//! (event volume, staff hours, hourly rate, error rate) into the cost,
//! savings, ROI and payback metrics shown to a prospect, together with the
//! fixed-precision report projection used by every renderer and the
//! multi-step form model that collects the inputs.
//!
//! ```
//! use roi_calculator::{RoiInput, compute};
//!
//! let input = RoiInput { events_per_year: 12.0, avg_hourly_rate: 30.0, ..RoiInput::default() };
//! let result = compute(input);
//! assert_eq!(result.total_attendees, 0.0);
//! ```

pub mod calculator;
pub mod coerce;
pub mod form;
pub mod input;
pub mod report;

pub use calculator::{
    EFFICIENCY_GAIN, ERROR_REDUCTION_FACTOR, ESTIMATED_ANNUAL_COST, RoiResult, WORK_HOURS_PER_FTE,
    compute,
};
pub use form::{FieldErrors, FormStep, INVALID_EMAIL, InvalidStep, RoiForm, looks_like_email};
pub use input::{MAX_INPUT, RoiInput};
pub use report::{RoiReport, to_fixed};
