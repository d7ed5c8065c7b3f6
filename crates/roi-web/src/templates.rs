//! askama templates for the report outputs.

use askama::Template;

use crate::view::{
    DISCLAIMER, FOOTER_LINES, HeadlineCard, PRODUCT_NAME, REPORT_SUBTITLE, REPORT_TITLE,
    ReportSection, ReportView,
};

pub const DEMO_URL: &str = "https://i-attend.com/register_livedemo.html";
pub const LOGO_PATH: &str = "/i-attend-h-300.png";

pub struct Benefit {
    pub heading: &'static str,
    pub text: &'static str,
}

pub const BENEFITS: [Benefit; 4] = [
    Benefit {
        heading: "Focus on Strategy",
        text: "Spend time improving programs instead of managing spreadsheets",
    },
    Benefit {
        heading: "Better Member Experience",
        text: "Faster check-ins and instant certificates delight attendees",
    },
    Benefit {
        heading: "Data-Driven Decisions",
        text: "Real-time insights to optimize programming and engagement",
    },
    Benefit { heading: "Scale Your Events", text: "Handle more events without adding staff" },
];

fn logo_url(origin: Option<&str>) -> Option<String> {
    origin
        .map(|o| o.trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(|o| format!("{o}{LOGO_PATH}"))
}

/// On-screen results page.
#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportPage<'a> {
    pub view: &'a ReportView,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub product: &'static str,
    pub logo_url: String,
    pub demo_url: &'static str,
    pub cards: Vec<HeadlineCard>,
    pub sections: Vec<ReportSection>,
    pub benefits: &'static [Benefit],
}

impl<'a> ReportPage<'a> {
    pub fn new(view: &'a ReportView) -> Self {
        Self {
            view,
            title: REPORT_TITLE,
            subtitle: REPORT_SUBTITLE,
            product: PRODUCT_NAME,
            logo_url: LOGO_PATH.to_string(),
            demo_url: DEMO_URL,
            cards: view.cards(),
            sections: view.sections(),
            benefits: &BENEFITS,
        }
    }
}

/// Page printed to PDF by a headless browser.
///
/// `origin` is the public base URL the browser loads the logo from; without
/// it the logo is left out.
#[derive(Template)]
#[template(path = "print.html")]
pub struct PrintPage {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub has_logo: bool,
    pub logo_url: String,
    pub cards: Vec<HeadlineCard>,
    pub sections: Vec<ReportSection>,
    pub disclaimer: &'static str,
    pub footer_lines: &'static [&'static str],
}

impl PrintPage {
    pub fn new(view: &ReportView, origin: Option<&str>) -> Self {
        let logo_url = logo_url(origin);
        Self {
            title: REPORT_TITLE,
            subtitle: REPORT_SUBTITLE,
            has_logo: logo_url.is_some(),
            logo_url: logo_url.unwrap_or_default(),
            cards: view.cards(),
            sections: view.sections(),
            disclaimer: DISCLAIMER,
            footer_lines: &FOOTER_LINES,
        }
    }
}

#[derive(Template)]
#[template(path = "email.html")]
pub struct EmailHtml<'a> {
    pub recipient_name: &'a str,
    pub cards: Vec<HeadlineCard>,
    pub demo_url: &'static str,
    pub disclaimer: &'static str,
}

#[derive(Template)]
#[template(path = "email.txt")]
pub struct EmailText<'a> {
    pub recipient_name: &'a str,
    pub cards: Vec<HeadlineCard>,
    pub demo_url: &'static str,
    pub disclaimer: &'static str,
}

/// Both parts of the report email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailBody {
    pub html: String,
    pub text: String,
}

pub fn render_report_page(view: &ReportView) -> askama::Result<String> {
    ReportPage::new(view).render()
}

pub fn render_print_page(view: &ReportView, origin: Option<&str>) -> askama::Result<String> {
    PrintPage::new(view, origin).render()
}

/// Renders the email body. An empty `recipient_name` greets generically.
pub fn render_email(view: &ReportView, recipient_name: &str) -> askama::Result<EmailBody> {
    let recipient_name = match recipient_name.trim() {
        "" => "there",
        name => name,
    };
    let html = EmailHtml {
        recipient_name,
        cards: view.cards(),
        demo_url: DEMO_URL,
        disclaimer: DISCLAIMER,
    }
    .render()?;
    let text = EmailText {
        recipient_name,
        cards: view.cards(),
        demo_url: DEMO_URL,
        disclaimer: DISCLAIMER,
    }
    .render()?;
    Ok(EmailBody { html, text })
}
