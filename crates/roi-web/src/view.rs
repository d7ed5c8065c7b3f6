//! Display model shared by every report output.
//!
//! The HTML page, the print page, the email and the PDF document all lay out
//! the same cards and sections built here, so a figure cannot appear with a
//! different value or precision in one output than in another.

use roi_calculator::RoiReport;
use serde::Serialize;

use crate::format::{format_currency, format_number};

pub const PRODUCT_NAME: &str = "i-Attend";
pub const REPORT_TITLE: &str = "Your ROI Analysis";
pub const REPORT_SUBTITLE: &str = "Here's what manual attendance tracking is really costing you";
pub const NO_PAYBACK: &str = "N/A";

pub const DISCLAIMER: &str = "Disclaimer: This tool is for informational purposes only and should \
not be considered financial advice. Results are estimates and may not reflect actual outcomes.";

pub const FOOTER_LINES: [&str; 4] = [
    "i-Attend Platform",
    "https://www.i-attend.com",
    "Registration * Attendance Tracking * Certificates * Surveys * Reports",
    "Copyright \u{a9} TNETIC, Inc., All rights reserved.",
];

/// Colour family of a card or section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Red,
    Green,
    Blue,
}

impl Accent {
    pub fn css_class(&self) -> &'static str {
        match self {
            Accent::Red => "red",
            Accent::Green => "green",
            Accent::Blue => "blue",
        }
    }

    /// 8-bit RGB components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Accent::Red => (0xd9, 0x53, 0x4f),
            Accent::Green => (0x0a, 0x9b, 0x50),
            Accent::Blue => (0x0d, 0x6e, 0xfd),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadlineCard {
    pub title: &'static str,
    pub value: String,
    pub caption: String,
    pub accent: Accent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub title: String,
    pub accent: Accent,
    pub rows: Vec<ReportRow>,
    pub total: ReportRow,
}

/// Display-ready figures of one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportView {
    pub events_per_year: String,
    pub total_attendees: String,
    pub hours_per_event: String,
    pub annual_hours: String,
    pub annual_cost: String,
    pub hours_saved: String,
    pub cost_savings: String,
    pub error_reduction: String,
    pub ftes_saved: String,
    pub efficiency_percentage: String,
    pub time_per_event_after: String,
    pub estimated_annual_cost: String,
    pub net_savings: String,
    pub roi: String,
    pub payback_months: String,
    pub has_payback: bool,
    pub five_year_savings: String,
}

fn row(label: &'static str, value: String) -> ReportRow {
    ReportRow { label, value }
}

impl ReportView {
    pub fn new(report: &RoiReport) -> Self {
        Self {
            events_per_year: format_number(&report.events_per_year),
            total_attendees: format_number(&report.total_attendees),
            // The form shows per-event hours including error overhead.
            hours_per_event: report.total_hours_per_event.clone(),
            annual_hours: format_number(&report.annual_hours),
            annual_cost: format_currency(&report.annual_cost),
            hours_saved: format_number(&report.hours_saved),
            cost_savings: format_currency(&report.cost_savings),
            error_reduction: format_currency(&report.error_reduction),
            ftes_saved: report.ftes_saved.clone(),
            efficiency_percentage: report.efficiency_percentage.clone(),
            time_per_event_after: report.time_per_event_after.clone(),
            estimated_annual_cost: format_currency(&report.estimated_annual_cost),
            net_savings: format_currency(&report.net_savings),
            roi: format_number(&report.roi),
            payback_months: report
                .payback_months
                .clone()
                .unwrap_or_else(|| NO_PAYBACK.to_string()),
            has_payback: report.payback_months.is_some(),
            five_year_savings: format_currency(&report.five_year_savings),
        }
    }

    fn payback_text(&self) -> String {
        if self.has_payback {
            format!("{} months", self.payback_months)
        } else {
            NO_PAYBACK.to_string()
        }
    }

    pub fn cards(&self) -> Vec<HeadlineCard> {
        vec![
            HeadlineCard {
                title: "Annual Cost (Current)",
                value: self.annual_cost.clone(),
                caption: format!("{} hours per year", self.annual_hours),
                accent: Accent::Red,
            },
            HeadlineCard {
                title: "Annual Savings",
                value: self.cost_savings.clone(),
                caption: format!("{} hours saved", self.hours_saved),
                accent: Accent::Green,
            },
            HeadlineCard {
                title: "ROI",
                value: format!("{}%", self.roi),
                caption: if self.has_payback {
                    format!("Payback in {} months", self.payback_months)
                } else {
                    "No payback at current volume".to_string()
                },
                accent: Accent::Blue,
            },
        ]
    }

    pub fn sections(&self) -> Vec<ReportSection> {
        vec![
            ReportSection {
                title: "Current Manual Process".to_string(),
                accent: Accent::Red,
                rows: vec![
                    row("Events per year:", self.events_per_year.clone()),
                    row("Total attendees annually:", self.total_attendees.clone()),
                    row("Hours per event:", format!("{} hours", self.hours_per_event)),
                    row("Annual labor hours:", format!("{} hours", self.annual_hours)),
                ],
                total: row("Total annual cost:", self.annual_cost.clone()),
            },
            ReportSection {
                title: format!("With {PRODUCT_NAME} Automation"),
                accent: Accent::Green,
                rows: vec![
                    row("Hours saved annually:", format!("{} hours", self.hours_saved)),
                    row("FTE equivalent saved:", format!("{} FTE", self.ftes_saved)),
                    row("Efficiency improvement:", format!("{}%", self.efficiency_percentage)),
                    row("Time per event (after):", format!("{} hours", self.time_per_event_after)),
                    row("Error and rework cost avoided:", self.error_reduction.clone()),
                ],
                total: row("Annual cost savings:", self.cost_savings.clone()),
            },
            ReportSection {
                title: "Investment Analysis".to_string(),
                accent: Accent::Blue,
                rows: vec![
                    row(
                        "Estimated i-Attend cost:",
                        format!("{}/year", self.estimated_annual_cost),
                    ),
                    row("Net first-year savings:", self.net_savings.clone()),
                    row("Return on investment:", format!("{}%", self.roi)),
                    row("Payback period:", self.payback_text()),
                ],
                total: row("5-year total savings:", self.five_year_savings.clone()),
            },
        ]
    }
}

impl From<&RoiReport> for ReportView {
    fn from(report: &RoiReport) -> Self {
        Self::new(report)
    }
}
