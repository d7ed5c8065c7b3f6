use roi_calculator::{RoiInput, compute};
use roi_web::{ReportView, render_email, render_print_page, render_report_page};

fn sample_view() -> ReportView {
    let input = RoiInput {
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
    };
    ReportView::new(&compute(input).report())
}

#[test]
fn report_page_shows_headline_figures() {
    let html = render_report_page(&sample_view()).unwrap();
    assert!(html.contains("Your ROI Analysis"));
    assert!(html.contains("$20,125"));
    assert!(html.contains("$17,106"));
    assert!(html.contains("744%"));
    assert!(html.contains("Payback in 1.4 months"));
    assert!(html.contains("What Could You Do With 489 Extra Hours?"));
    assert!(html.contains("Scale Your Events"));
    assert!(html.contains("https://i-attend.com/register_livedemo.html"));
}

#[test]
fn report_page_lists_every_section() {
    let html = render_report_page(&sample_view()).unwrap();
    for title in ["Current Manual Process", "With i-Attend Automation", "Investment Analysis"] {
        assert!(html.contains(title), "missing section {title}");
    }
    assert!(html.contains("5-year total savings:"));
    assert!(html.contains("$85,531"));
}

#[test]
fn print_page_carries_footer_and_optional_logo() {
    let view = sample_view();

    let with_logo = render_print_page(&view, Some("https://roi.example.com")).unwrap();
    assert!(with_logo.contains("https://roi.example.com/i-attend-h-300.png"));
    assert!(with_logo.contains("Disclaimer:"));
    assert!(with_logo.contains("TNETIC, Inc."));
    assert!(with_logo.contains("size: A4"));

    let without_logo = render_print_page(&view, None).unwrap();
    assert!(!without_logo.contains("<img"));
    assert!(without_logo.contains("$85,531"));
}

#[test]
fn print_page_shows_sentinel_without_payback() {
    let view = ReportView::new(&compute(RoiInput::default()).report());
    let html = render_print_page(&view, None).unwrap();
    assert!(html.contains("No payback at current volume"));
    assert!(!html.contains("Infinity"));
}

#[test]
fn email_greets_recipient_in_both_parts() {
    let body = render_email(&sample_view(), "Ada Lovelace").unwrap();
    assert!(body.html.contains("Hi Ada Lovelace,"));
    assert!(body.text.starts_with("Hi Ada Lovelace,"));
    assert!(body.text.contains("Annual Savings: $17,106 (489 hours saved)"));
    assert!(body.html.contains("744%"));
}

#[test]
fn email_without_name_uses_generic_greeting() {
    let body = render_email(&sample_view(), "  ").unwrap();
    assert!(body.text.starts_with("Hi there,"));
}

#[test]
fn html_escapes_recipient_name() {
    let body = render_email(&sample_view(), "<script>").unwrap();
    assert!(!body.html.contains("<script>"));
    assert!(body.text.contains("<script>"));
}
