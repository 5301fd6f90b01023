//! Email transport for dispatching one-time codes (§4.3).

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::error::{MfaArbiterError, Result};

/// Abstracts over sending a one-time code by email.
pub trait EmailTransport: Send + Sync {
    /// Dispatch a one-time code to `to`.
    ///
    /// # Errors
    ///
    /// Returns `MfaArbiterError::OtpDispatchFailed` if the message could
    /// not be built or sent.
    async fn send_otp(&self, to: &str, otp: &str) -> Result<()>;
}

/// SMTP-backed `EmailTransport` using Lettre.
#[derive(Clone)]
pub struct SmtpEmailTransport {
    smtp_server: String,
    smtp_port: u16,
    credentials: Credentials,
    from_email: String,
    from_name: String,
}

impl SmtpEmailTransport {
    /// Build a transport from SMTP connection settings.
    #[must_use]
    pub fn new(
        smtp_server: String,
        smtp_port: u16,
        smtp_username: String,
        smtp_password: String,
        from_email: String,
        from_name: String,
    ) -> Self {
        Self {
            smtp_server,
            smtp_port,
            credentials: Credentials::new(smtp_username, smtp_password),
            from_email,
            from_name,
        }
    }

    /// Build a fresh SMTP transport. Creates a new one per email to avoid
    /// connection pooling issues.
    fn build_transport(&self) -> Result<SmtpTransport> {
        Ok(SmtpTransport::relay(&self.smtp_server)
            .map_err(|e| MfaArbiterError::Internal(format!("SMTP relay error: {e}")))?
            .port(self.smtp_port)
            .credentials(self.credentials.clone())
            .build())
    }

    fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

impl EmailTransport for SmtpEmailTransport {
    async fn send_otp(&self, to: &str, otp: &str) -> Result<()> {
        let html_body = format!(
            r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Your sign-in code</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #2563eb;">Your sign-in code</h2>
        <p>Enter the following code to finish signing in. This code expires in 5 minutes.</p>
        <p style="font-size: 32px; font-weight: bold; letter-spacing: 4px; margin: 30px 0;">{otp}</p>
        <p style="color: #666; font-size: 14px;">
            If you didn't try to sign in, you can safely ignore this email.
        </p>
    </div>
</body>
</html>
            "#
        );

        let email = Message::builder()
            .from(
                self.from_header()
                    .parse()
                    .map_err(|e| MfaArbiterError::Internal(format!("invalid from address: {e}")))?,
            )
            .to(to.parse().map_err(|e| MfaArbiterError::Internal(format!("invalid to address: {e}")))?)
            .subject("Your sign-in code")
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .map_err(|e| MfaArbiterError::Internal(format!("failed to build email: {e}")))?;

        let mailer = self.build_transport()?;

        let send_result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|_| MfaArbiterError::OtpDispatchFailed)?;

        send_result.map(|_| ()).map_err(|e| {
            tracing::warn!(error = %e, "smtp send failed");
            MfaArbiterError::OtpDispatchFailed
        })
    }
}
