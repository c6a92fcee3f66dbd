// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;

use tracing::{info, warn};

use crate::email::SmtpConfig;
use crate::error::ConfigError;

pub const PORT_ENV: &str = "PORT";
pub const SMTP_TIMEOUT_ENV: &str = "SMTP_TIMEOUT_SECS";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;

/// Process-wide settings, read once at startup
#[derive(Debug)]
pub struct AppConfig {
    pub port: u16,
    pub dispatch_timeout: Duration,
    /// A missing or broken SMTP setup disables `/send` but not the server
    pub smtp: Result<SmtpConfig, ConfigError>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or_default(&lookup, PORT_ENV, DEFAULT_PORT);
        let timeout_secs = parse_or_default(&lookup, SMTP_TIMEOUT_ENV, DEFAULT_SMTP_TIMEOUT_SECS);
        let smtp = SmtpConfig::from_lookup(&lookup);

        match &smtp {
            Ok(config) => info!(
                host = %config.smtp_host,
                port = config.smtp_port,
                destination = %config.destination,
                "SMTP relay configured"
            ),
            Err(e) => warn!(error = %e, "SMTP relay not configured, /send will fail"),
        }

        Self {
            port,
            dispatch_timeout: Duration::from_secs(timeout_secs),
            smtp,
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {} value {:?}, using default {}", key, raw, default);
            default
        }),
    }
}
