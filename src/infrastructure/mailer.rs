//! SMTP delivery of alert decisions

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::application::alerts::AlertDecision;
use crate::application::errors::MailError;
use crate::config::SmtpConfig;

/// Sends plain-text alert reports over SMTP with STARTTLS.
///
/// Credentials live in configuration only; the alert evaluator hands this
/// mailer a finished `AlertDecision` and knows nothing about delivery.
pub struct AlertMailer {
    config: SmtpConfig,
}

impl AlertMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    pub async fn send(&self, decision: &AlertDecision) -> Result<(), MailError> {
        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(self.config.to_address.parse()?)
            .subject(&decision.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(decision.body.clone())?;

        let credentials = Credentials::new(
            self.config.username.clone(),
            self.config.password.clone(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
            .port(self.config.port)
            .credentials(credentials)
            .build();

        mailer.send(email).await?;
        tracing::info!(to = %self.config.to_address, subject = %decision.subject, "alert email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_addresses_are_rejected_before_any_network_io() {
        let mailer = AlertMailer::new(SmtpConfig {
            host: "smtp.example.org".to_string(),
            port: 587,
            username: "user".to_string(),
            password: "pass".to_string(),
            from_address: "not-an-address".to_string(),
            to_address: "analyst@example.org".to_string(),
        });

        let decision = AlertDecision {
            triggered: true,
            subject: "s".to_string(),
            body: "b".to_string(),
        };

        assert!(matches!(
            mailer.send(&decision).await,
            Err(MailError::Address(_))
        ));
    }
}
