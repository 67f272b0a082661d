//! Acknowledgment email dispatch.
//!
//! # Design Decisions
//! - Fire-and-forget: the send runs as a detached task after the HTTP
//!   response is produced; its outcome never joins the request path
//! - Failures are logged and counted, never retried or surfaced
//! - The recipient name is HTML-escaped before template interpolation

use std::time::Duration;

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

use crate::config::schema::MailConfig;
use crate::observability::metrics;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

const ACK_SUBJECT: &str = "We received your request";

const ACK_TEMPLATE: &str = "\
<html>\
  <body>\
    <h2>Hello {name},</h2>\
    <p>Thank you for reaching out. We have received your request and \
will get back to you shortly.</p>\
    <p>— The team</p>\
  </body>\
</html>";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mailbox: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Outbound mail relay client.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    pub fn from_config(config: &MailConfig) -> Result<Self, MailError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        let from = config.from_address.parse::<Mailbox>()?;

        Ok(Self { transport, from })
    }

    /// Send the acknowledgment from a detached task.
    ///
    /// Returns immediately; the caller must not depend on the outcome.
    pub fn dispatch_acknowledgment(&self, name: &str, email: &str) {
        let mailer = self.clone();
        let name = name.to_string();
        let email = email.to_string();

        tokio::spawn(async move {
            if let Err(e) = mailer.send_acknowledgment(&name, &email).await {
                tracing::error!(error = %e, recipient = %email, "Acknowledgment email failed");
                metrics::record_mail_failure();
            } else {
                tracing::debug!(recipient = %email, "Acknowledgment email sent");
            }
        });
    }

    async fn send_acknowledgment(&self, name: &str, email: &str) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.parse::<Mailbox>()?)
            .subject(ACK_SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(render_acknowledgment(name))?;

        self.transport.send(message).await?;
        Ok(())
    }
}

fn render_acknowledgment(name: &str) -> String {
    ACK_TEMPLATE.replace("{name}", &escape_html(name))
}

/// Minimal HTML entity escaping for text interpolated into the template.
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_substitutes_name() {
        let body = render_acknowledgment("Alice");
        assert!(body.contains("Hello Alice,"));
        assert!(!body.contains("{name}"));
    }

    #[test]
    fn test_name_is_escaped() {
        let body = render_acknowledgment("<script>alert(1)</script>");
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_escape_html_covers_entities() {
        assert_eq!(
            escape_html(r#"a & b < c > d " e ' f"#),
            "a &amp; b &lt; c &gt; d &quot; e &#39; f"
        );
        assert_eq!(escape_html("plain name"), "plain name");
    }
}
