//! Presentation layer for the ROI report.
//!
//! [`view::ReportView`] turns the fixed-precision [`roi_calculator::RoiReport`]
//! into display strings (thousands separators, currency signs, the payback
//! sentinel) and groups them into cards and sections. The askama templates in
//! [`templates`] render that view as the results page, the print page fed to
//! a headless browser, and the two parts of the report email.

pub mod format;
pub mod templates;
pub mod view;

pub use format::{format_currency, format_number};
pub use templates::{
    DEMO_URL, EmailBody, PrintPage, ReportPage, render_email, render_print_page,
    render_report_page,
};
pub use view::{
    Accent, DISCLAIMER, FOOTER_LINES, HeadlineCard, NO_PAYBACK, PRODUCT_NAME, REPORT_SUBTITLE,
    REPORT_TITLE, ReportRow, ReportSection, ReportView,
};
