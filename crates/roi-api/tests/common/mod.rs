#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use roi_api::config::RoiConfig;
use roi_api::mailer::{MailDispatcher, MailError, ReportEmail};
use roi_api::pdf::{RenderError, ReportRenderer};
use roi_web::ReportView;
use serde_json::{Value, json};

pub const FAKE_PDF: &[u8] = b"%PDF-1.4 fake report";

/// Returns fixed bytes and remembers the last headline figure it was given.
#[derive(Default)]
pub struct FakeRenderer {
    pub last_savings: Mutex<Option<String>>,
}

#[async_trait]
impl ReportRenderer for FakeRenderer {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn render(&self, view: &ReportView) -> Result<Vec<u8>, RenderError> {
        *self.last_savings.lock().unwrap() = Some(view.cost_savings.clone());
        Ok(FAKE_PDF.to_vec())
    }
}

pub struct FailingRenderer;

#[async_trait]
impl ReportRenderer for FailingRenderer {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn render(&self, _view: &ReportView) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::BrowserUnavailable)
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<ReportEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<ReportEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Polls until `count` emails have been recorded or `timeout` passes.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<ReportEmail> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let sent = self.sent();
            if sent.len() >= count || tokio::time::Instant::now() >= deadline {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl MailDispatcher for RecordingMailer {
    async fn send(&self, email: ReportEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

pub struct RejectingMailer;

#[async_trait]
impl MailDispatcher for RejectingMailer {
    async fn send(&self, email: ReportEmail) -> Result<(), MailError> {
        Err(MailError::InvalidAddress(email.to))
    }
}

pub fn test_config() -> RoiConfig {
    let mut config = RoiConfig::default();
    config.mail.send_delay_seconds = 0;
    config
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}

pub fn worked_example() -> Value {
    json!({
        "eventsPerYear": 50,
        "avgAttendeesPerEvent": 150,
        "registrationHours": 2,
        "checkInHours": 3,
        "badgePrintingHours": 1.5,
        "certificateHours": 2,
        "reportingHours": 1.5,
        "avgHourlyRate": 35,
        "errorRate": 5,
        "reworkHours": 1
    })
}

pub fn completed_form() -> Value {
    json!({
        "organizationType": "Association",
        "organizationSize": "51-200",
        "eventsPerYear": "50",
        "avgAttendeesPerEvent": "150",
        "registrationHours": "2",
        "checkInHours": "3",
        "badgePrintingHours": "1.5",
        "certificateHours": "2",
        "reportingHours": "1.5",
        "avgHourlyRate": "35",
        "errorRate": "5",
        "reworkHours": "1",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.com",
        "company": "Analytical Society",
        "sendReport": true
    })
}
