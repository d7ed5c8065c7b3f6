//! Outbound report mail over SMTP.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use roi_web::EmailBody;
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::MailConfig;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("invalid email address '{0}'")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        MailError::Message(err.to_string())
    }
}

/// One report email, ready to send.
#[derive(Debug, Clone)]
pub struct ReportEmail {
    pub to: String,
    pub recipient_name: String,
    pub subject: String,
    pub body: EmailBody,
    pub attachment_name: String,
    pub pdf: Vec<u8>,
}

#[async_trait]
pub trait MailDispatcher: Send + Sync {
    async fn send(&self, email: ReportEmail) -> Result<(), MailError>;
}

fn parse_address(address: &str) -> Result<Address, MailError> {
    address.trim().parse().map_err(|_| MailError::InvalidAddress(address.to_string()))
}

/// Builds the MIME message: an HTML/plain alternative part followed by the
/// PDF attachment.
pub fn build_message(from: &Mailbox, email: &ReportEmail) -> Result<Message, MailError> {
    let name = email.recipient_name.trim();
    let to = Mailbox::new((!name.is_empty()).then(|| name.to_string()), parse_address(&email.to)?);
    let pdf_type = ContentType::parse("application/pdf")
        .map_err(|err| MailError::Message(err.to_string()))?;

    let message = Message::builder()
        .from(from.clone())
        .to(to)
        .subject(email.subject.as_str())
        .multipart(
            MultiPart::mixed()
                .multipart(MultiPart::alternative_plain_html(
                    email.body.text.clone(),
                    email.body.html.clone(),
                ))
                .singlepart(
                    Attachment::new(email.attachment_name.clone())
                        .body(email.pdf.clone(), pdf_type),
                ),
        )?;
    Ok(message)
}

/// Sends through an SMTP relay with STARTTLS.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(mail: &MailConfig) -> Result<Self, MailError> {
        let from = Mailbox::new(None, parse_address(&mail.from)?);
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&mail.smtp_host)?
            .port(mail.smtp_port);
        if let (Some(username), Some(password)) = (&mail.username, &mail.password) {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                password.expose_secret().to_string(),
            ));
        }
        info!(host = %mail.smtp_host, port = mail.smtp_port, "SMTP mailer configured");
        Ok(Self { transport: builder.build(), from })
    }
}

#[async_trait]
impl MailDispatcher for SmtpMailer {
    async fn send(&self, email: ReportEmail) -> Result<(), MailError> {
        let message = build_message(&self.from, &email)?;
        let response = self.transport.send(message).await?;
        debug!(recipient = %email.to, code = %response.code(), "SMTP server accepted message");
        Ok(())
    }
}
