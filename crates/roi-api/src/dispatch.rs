//! Report delivery: render the PDF, compose the email, hand it to the mailer.
//!
//! [`ReportDispatcher::schedule`] runs a delivery on a detached tokio task
//! after a delay. A scheduled delivery is never retried or cancelled; its
//! outcome is logged and available through the join handle.

use std::sync::Arc;
use std::time::Duration;

use roi_calculator::RoiReport;
use roi_web::{ReportView, render_email};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::mailer::{MailDispatcher, MailError, ReportEmail};
use crate::pdf::{RenderError, ReportRenderer};

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

impl From<askama::Error> for DeliveryError {
    fn from(err: askama::Error) -> Self {
        DeliveryError::Render(RenderError::Template(err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub email: String,
    pub name: String,
}

pub struct ReportDelivery {
    renderer: Arc<dyn ReportRenderer>,
    mailer: Arc<dyn MailDispatcher>,
    subject: String,
    attachment_name: String,
}

impl ReportDelivery {
    pub fn new(
        renderer: Arc<dyn ReportRenderer>,
        mailer: Arc<dyn MailDispatcher>,
        subject: impl Into<String>,
        attachment_name: impl Into<String>,
    ) -> Self {
        Self { renderer, mailer, subject: subject.into(), attachment_name: attachment_name.into() }
    }

    pub async fn deliver(
        &self,
        recipient: &Recipient,
        report: &RoiReport,
    ) -> Result<(), DeliveryError> {
        let view = ReportView::new(report);
        let pdf = self.renderer.render(&view).await?;
        let body = render_email(&view, &recipient.name)?;
        self.mailer
            .send(ReportEmail {
                to: recipient.email.clone(),
                recipient_name: recipient.name.clone(),
                subject: self.subject.clone(),
                body,
                attachment_name: self.attachment_name.clone(),
                pdf,
            })
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    Failed(String),
}

#[derive(Debug)]
pub struct ScheduledDispatch {
    pub id: Uuid,
    pub handle: JoinHandle<DispatchOutcome>,
}

#[derive(Clone)]
pub struct ReportDispatcher {
    delivery: Arc<ReportDelivery>,
}

impl ReportDispatcher {
    pub fn new(delivery: Arc<ReportDelivery>) -> Self {
        Self { delivery }
    }

    pub fn delivery(&self) -> &ReportDelivery {
        &self.delivery
    }

    pub fn schedule(
        &self,
        recipient: Recipient,
        report: RoiReport,
        delay: Duration,
    ) -> ScheduledDispatch {
        let id = Uuid::new_v4();
        let delivery = Arc::clone(&self.delivery);
        info!(
            dispatch_id = %id,
            recipient = %recipient.email,
            delay_secs = delay.as_secs(),
            "Report email scheduled"
        );

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match delivery.deliver(&recipient, &report).await {
                Ok(()) => {
                    info!(dispatch_id = %id, recipient = %recipient.email, "Report email sent");
                    DispatchOutcome::Delivered
                }
                Err(err) => {
                    error!(
                        dispatch_id = %id,
                        recipient = %recipient.email,
                        error = %err,
                        "Report email failed"
                    );
                    DispatchOutcome::Failed(err.to_string())
                }
            }
        });

        ScheduledDispatch { id, handle }
    }
}
