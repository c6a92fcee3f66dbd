// SPDX-License-Identifier: Apache-2.0
use std::fmt;
use std::time::Duration;

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, Tokio1Executor};
use tracing::{info, instrument};

use crate::error::ConfigError;

pub const SMTP_HOST_ENV: &str = "SMTP_HOST";
pub const SMTP_PORT_ENV: &str = "SMTP_PORT";
pub const SMTP_USER_ENV: &str = "SMTP_USER";
pub const SMTP_PASS_ENV: &str = "SMTP_PASS";
pub const TO_EMAIL_ENV: &str = "TO_EMAIL";

/// Port on which the relay expects TLS from the first byte
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// How the connection to the relay is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// TLS wrapper around the whole session (SMTPS)
    Implicit,
    /// STARTTLS when the server offers it, plaintext otherwise
    Opportunistic,
}

/// Settings for the office's outgoing SMTP relay
#[derive(Clone)]
pub struct SmtpConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub destination: Mailbox,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_pass", &"<redacted>")
            .field("destination", &self.destination.to_string())
            .finish()
    }
}

impl SmtpConfig {
    /// Load SMTP settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load SMTP settings through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        let smtp_host = var(SMTP_HOST_ENV)?;
        let raw_port = var(SMTP_PORT_ENV)?;
        let smtp_user = var(SMTP_USER_ENV)?;
        let smtp_pass = var(SMTP_PASS_ENV)?;
        let to_email = var(TO_EMAIL_ENV)?;

        let smtp_port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(raw_port.clone()))?;
        let destination = to_email
            .parse::<Mailbox>()
            .map_err(|e| ConfigError::InvalidAddress {
                address: to_email.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            smtp_host,
            smtp_port,
            smtp_user,
            smtp_pass,
            destination,
        })
    }

    pub fn tls_mode(&self) -> TlsMode {
        if self.smtp_port == IMPLICIT_TLS_PORT {
            TlsMode::Implicit
        } else {
            TlsMode::Opportunistic
        }
    }

    /// Build the pooled async transport used for every dispatch
    #[instrument(skip(self), fields(host = %self.smtp_host, port = %self.smtp_port))]
    pub fn build_transport(
        &self,
        timeout: Duration,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, ConfigError> {
        let creds = Credentials::new(self.smtp_user.clone(), self.smtp_pass.clone());

        let builder = match self.tls_mode() {
            TlsMode::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.smtp_host)
                .map_err(|e| ConfigError::Transport(e.to_string()))?,
            TlsMode::Opportunistic => {
                let params = TlsParameters::new(self.smtp_host.clone())
                    .map_err(|e| ConfigError::Transport(e.to_string()))?;
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.smtp_host)
                    .tls(Tls::Opportunistic(params))
            }
        };

        info!(tls = ?self.tls_mode(), "SMTP transport configured");

        Ok(builder
            .port(self.smtp_port)
            .credentials(creds)
            .timeout(Some(timeout))
            .build())
    }
}
