//! SMTP client — the single place application emails are built and sent.
//! No other module talks to the mail transport directly.

pub mod templates;

use bytes::Bytes;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Everything needed to notify both parties about one submission.
#[derive(Debug, Clone)]
pub struct ApplicationEmail {
    pub job_id: String,
    pub job_title: String,
    pub full_name: String,
    pub applicant_email: String,
    pub phone: String,
    pub message: String,
    pub attachment_name: String,
    pub attachment: Bytes,
}

/// Async SMTP transport plus the fixed mailboxes from config.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    hr: Mailbox,
    admin_cc: Option<Mailbox>,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.smtp_username.parse()?,
            hr: config.hr_email.parse()?,
            admin_cc: config
                .admin_email
                .as_deref()
                .map(|address| address.parse::<Mailbox>())
                .transpose()?,
        })
    }

    /// Checks the SMTP connection at startup. Failure is logged, not fatal —
    /// job browsing must stay up even when the mail account is misconfigured.
    pub async fn verify(&self) {
        match self.transport.test_connection().await {
            Ok(true) => info!("SMTP transport ready to send emails"),
            Ok(false) => warn!("SMTP transport connection test failed"),
            Err(e) => warn!("SMTP setup failed: {e}"),
        }
    }

    /// Sends the HR notification and the applicant confirmation concurrently.
    pub async fn send_application_emails(&self, email: &ApplicationEmail) -> Result<(), MailError> {
        let hr_message = self.hr_notification(email)?;
        let applicant_message = self.applicant_confirmation(email)?;

        tokio::try_join!(
            self.transport.send(hr_message),
            self.transport.send(applicant_message)
        )?;
        info!(
            "Application emails sent to {} and {}",
            self.hr, email.applicant_email
        );
        Ok(())
    }

    /// The internal notification, with the resume attached.
    fn hr_notification(&self, email: &ApplicationEmail) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.hr.clone())
            .subject(templates::hr_subject(&email.job_title, &email.job_id));
        if let Some(cc) = &self.admin_cc {
            builder = builder.cc(cc.clone());
        }

        let attachment = Attachment::new(email.attachment_name.clone()).body(
            email.attachment.to_vec(),
            attachment_content_type(&email.attachment_name),
        );

        Ok(builder.multipart(
            MultiPart::mixed()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(templates::hr_body(email)),
                )
                .singlepart(attachment),
        )?)
    }

    /// The automated acknowledgement to the applicant.
    fn applicant_confirmation(&self, email: &ApplicationEmail) -> Result<Message, MailError> {
        Ok(Message::builder()
            .from(self.from.clone())
            .to(email.applicant_email.parse()?)
            .subject(templates::applicant_subject(&email.job_title))
            .header(ContentType::TEXT_HTML)
            .body(templates::applicant_body(email))?)
    }
}

/// Picks the attachment content type from the resume extension.
fn attachment_content_type(name: &str) -> ContentType {
    let ext = std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let mime = match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    };
    ContentType::parse(mime).unwrap_or(ContentType::TEXT_PLAIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_email() -> ApplicationEmail {
        ApplicationEmail {
            job_id: "66b1f0a2e4b0c53d9c000001".to_string(),
            job_title: "Backend Engineer".to_string(),
            full_name: "Asha Rao".to_string(),
            applicant_email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            message: "I build backends.".to_string(),
            attachment_name: "resume.pdf".to_string(),
            attachment: Bytes::from_static(b"%PDF-1.4"),
        }
    }

    fn test_config() -> Config {
        Config {
            mongo_uri: "mongodb://localhost:27017".to_string(),
            db_name: "careers_test".to_string(),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_username: "careers@example.com".to_string(),
            smtp_password: "app-password".to_string(),
            hr_email: "hr@example.com".to_string(),
            admin_email: Some("admin@example.com".to_string()),
            frontend_origin: "*".to_string(),
            port: 0,
            upload_dir: "uploads".into(),
            rust_log: "info".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mailer_builds_from_config() {
        assert!(Mailer::from_config(&test_config()).is_ok());
    }

    #[tokio::test]
    async fn test_mailer_rejects_invalid_hr_address() {
        let mut config = test_config();
        config.hr_email = "not an address".to_string();
        assert!(matches!(
            Mailer::from_config(&config),
            Err(MailError::Address(_))
        ));
    }

    #[tokio::test]
    async fn test_hr_notification_builds_multipart_message() {
        let mailer = Mailer::from_config(&test_config()).unwrap();
        assert!(mailer.hr_notification(&sample_email()).is_ok());
    }

    #[tokio::test]
    async fn test_applicant_confirmation_builds_message() {
        let mailer = Mailer::from_config(&test_config()).unwrap();
        assert!(mailer.applicant_confirmation(&sample_email()).is_ok());
    }

    #[tokio::test]
    async fn test_applicant_confirmation_rejects_bad_recipient() {
        let mailer = Mailer::from_config(&test_config()).unwrap();
        let mut email = sample_email();
        email.applicant_email = "no-at-sign".to_string();
        assert!(mailer.applicant_confirmation(&email).is_err());
    }

    #[test]
    fn test_attachment_content_type_by_extension() {
        assert_eq!(
            attachment_content_type("cv.pdf"),
            ContentType::parse("application/pdf").unwrap()
        );
        assert_eq!(
            attachment_content_type("cv.DOC"),
            ContentType::parse("application/msword").unwrap()
        );
        assert_eq!(
            attachment_content_type("cv.unknown"),
            ContentType::parse("application/octet-stream").unwrap()
        );
    }
}
