//! # Notifications
//!
//! Delivery of zombie reports. The scan renders subject and body; a
//! `NotificationDispatcher` is responsible for getting them to the recipients.

mod email;

pub use email::{EmailDispatcher, LogTransport, MailTransport, OutboundEmail};

use crate::crd::EmailNotificationConfig;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("no SMTP password configured and SMTP_PASSWORD is not set")]
    MissingPassword,
    #[error("no recipients configured")]
    NoRecipients,
    #[error("no SMTP server configured")]
    MissingServer,
    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Delivers a rendered zombie report
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(
        &self,
        subject: &str,
        body: &str,
        config: &EmailNotificationConfig,
    ) -> Result<(), NotificationError>;
}
