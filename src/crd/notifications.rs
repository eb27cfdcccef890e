//! # Notification Configuration
//!
//! Email settings used to report detected zombie Pods.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Email notification configuration
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailNotificationConfig {
    /// Send a report when zombie Pods are detected
    #[serde(default)]
    pub enabled: bool,
    /// Recipient addresses
    #[serde(default)]
    pub recipients: Vec<String>,
    /// SMTP server host
    #[serde(default)]
    pub smtp_server: String,
    /// SMTP port. Defaults to 587 with TLS, 25 without.
    #[serde(default)]
    pub smtp_port: u16,
    /// Sender address
    #[serde(default)]
    pub from: String,
    /// SMTP username. Defaults to `from` when empty.
    #[serde(default)]
    pub username: String,
    /// SMTP password. When empty, the controller's `SMTP_PASSWORD` is used.
    #[serde(default)]
    pub password: String,
    /// Use TLS for the SMTP connection
    #[serde(default, rename = "useTLS")]
    pub use_tls: bool,
    /// Subject template. `{count}` is replaced with the number of zombie Pods.
    #[serde(default)]
    pub subject: String,
}

impl fmt::Debug for EmailNotificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailNotificationConfig")
            .field("enabled", &self.enabled)
            .field("recipients", &self.recipients)
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("from", &self.from)
            .field("username", &self.username)
            .field(
                "password",
                &if self.password.is_empty() { "" } else { "<redacted>" },
            )
            .field("use_tls", &self.use_tls)
            .field("subject", &self.subject)
            .finish()
    }
}
