use async_trait::async_trait;

use crate::error::ProviderResult;

/// Email port (spec §6): `send(to, subject, text_body, optional_ics)`.
/// Transport (SMTP/Mailgun/etc.) is explicitly out of scope, so this
/// crate defines only the port and a default sink; real deployments
/// swap in an implementation that actually delivers mail.
#[async_trait]
pub trait EmailPort: Send + Sync {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        ics: Option<&str>,
    ) -> ProviderResult<()>;
}

/// Default sink: logs the envelope instead of delivering it. Used
/// whenever no transport is wired in, which keeps the booking
/// lifecycle fully exercised without a real mail server.
pub struct LoggingEmailSink;

#[async_trait]
impl EmailPort for LoggingEmailSink {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        ics: Option<&str>,
    ) -> ProviderResult<()> {
        tracing::info!(
            to,
            subject,
            has_ics = ics.is_some(),
            "email dispatched: {text_body}"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn logging_sink_never_fails() {
        let sink = LoggingEmailSink;
        let result = sink.send("invitee@example.com", "subject", "body", Some("BEGIN:VCALENDAR")).await;
        assert!(result.is_ok());
    }
}
