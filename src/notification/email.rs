//! # Email Dispatcher
//!
//! Resolves SMTP defaults, builds a plain-text RFC 5322 message and hands it
//! to a `MailTransport`. Dialing an SMTP server is the transport's job.

use super::{NotificationDispatcher, NotificationError};
use crate::constants::{DEFAULT_SMTP_PLAIN_PORT, DEFAULT_SMTP_TLS_PORT};
use crate::crd::EmailNotificationConfig;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::info;
use zeroize::Zeroizing;

/// A fully resolved message ready for delivery
pub struct OutboundEmail {
    /// `host:port`
    pub server_addr: String,
    pub use_tls: bool,
    pub username: String,
    pub password: Zeroizing<String>,
    pub from: String,
    pub recipients: Vec<String>,
    pub subject: String,
    /// Headers and body, CRLF line endings
    pub message: Vec<u8>,
}

impl fmt::Debug for OutboundEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboundEmail")
            .field("server_addr", &self.server_addr)
            .field("use_tls", &self.use_tls)
            .field("username", &self.username)
            .field("from", &self.from)
            .field("recipients", &self.recipients)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

/// Delivers a resolved message
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, email: OutboundEmail) -> Result<(), NotificationError>;
}

/// Transport that only records the envelope in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn deliver(&self, email: OutboundEmail) -> Result<(), NotificationError> {
        info!(
            server = %email.server_addr,
            tls = email.use_tls,
            from = %email.from,
            recipients = %email.recipients.join(","),
            subject = %email.subject,
            bytes = email.message.len(),
            "Zombie report email prepared"
        );
        Ok(())
    }
}

/// `NotificationDispatcher` for `EmailNotificationConfig`
pub struct EmailDispatcher {
    fallback_password: Option<Zeroizing<String>>,
    transport: Arc<dyn MailTransport>,
}

impl fmt::Debug for EmailDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailDispatcher")
            .field("has_fallback_password", &self.fallback_password.is_some())
            .finish_non_exhaustive()
    }
}

impl EmailDispatcher {
    /// `fallback_password` is used for configs that leave `password` empty
    pub fn new(fallback_password: Option<String>, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            fallback_password: fallback_password
                .filter(|p| !p.is_empty())
                .map(Zeroizing::new),
            transport,
        }
    }

    /// Resolve defaults and build the message for `config`
    pub fn prepare(
        &self,
        subject: &str,
        body: &str,
        config: &EmailNotificationConfig,
    ) -> Result<OutboundEmail, NotificationError> {
        if config.recipients.is_empty() {
            return Err(NotificationError::NoRecipients);
        }
        if config.smtp_server.is_empty() {
            return Err(NotificationError::MissingServer);
        }

        let port = resolve_port(config);
        let username = if config.username.is_empty() {
            config.from.clone()
        } else {
            config.username.clone()
        };
        let password = if config.password.is_empty() {
            self.fallback_password
                .clone()
                .ok_or(NotificationError::MissingPassword)?
        } else {
            Zeroizing::new(config.password.clone())
        };

        Ok(OutboundEmail {
            server_addr: format!("{}:{port}", config.smtp_server),
            use_tls: config.use_tls,
            username,
            password,
            from: config.from.clone(),
            recipients: config.recipients.clone(),
            subject: subject.to_string(),
            message: build_message(&config.from, &config.recipients, subject, body),
        })
    }
}

#[async_trait]
impl NotificationDispatcher for EmailDispatcher {
    async fn send(
        &self,
        subject: &str,
        body: &str,
        config: &EmailNotificationConfig,
    ) -> Result<(), NotificationError> {
        if !config.enabled {
            return Ok(());
        }
        let email = self.prepare(subject, body, config)?;
        self.transport.deliver(email).await
    }
}

fn resolve_port(config: &EmailNotificationConfig) -> u16 {
    match (config.smtp_port, config.use_tls) {
        (0, true) => DEFAULT_SMTP_TLS_PORT,
        (0, false) => DEFAULT_SMTP_PLAIN_PORT,
        (port, _) => port,
    }
}

fn build_message(from: &str, recipients: &[String], subject: &str, body: &str) -> Vec<u8> {
    let mut message = String::with_capacity(body.len() + 256);
    message.push_str(&format!("From: {from}\r\n"));
    message.push_str(&format!("To: {}\r\n", recipients.join(",")));
    message.push_str(&format!("Subject: {subject}\r\n"));
    message.push_str("Content-Type: text/plain; charset=UTF-8\r\n");
    message.push_str("\r\n");
    message.push_str(body);
    message.into_bytes()
}
