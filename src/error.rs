// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use tracing::error;

use crate::submission::RelayResponse;

/// Problems found while loading SMTP settings at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("SMTP_PORT is not a valid port: {0}")]
    InvalidPort(String),

    #[error("invalid destination address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build SMTP transport: {0}")]
    Transport(String),
}

/// Failure between composing a message and the relay accepting it
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("submitter address {0:?} is not a valid mailbox")]
    Address(String),

    #[error("failed to compose message: {0}")]
    Compose(String),

    #[error("SMTP transport error: {0}")]
    Transport(String),

    #[error("SMTP dispatch timed out after {0:?}")]
    TimedOut(Duration),
}

/// Errors returned by the relay endpoint.
///
/// The `Display` text of each variant is exactly what the caller sees in the
/// `error` member of the JSON response.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid request body")]
    InvalidBody,

    #[error("Missing required fields")]
    MissingFields,

    #[error("Server not configured for email (missing env vars)")]
    NotConfigured,

    #[error("Failed to send email")]
    Dispatch(#[source] DispatchError),
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidBody | RelayError::MissingFields => StatusCode::BAD_REQUEST,
            RelayError::NotConfigured | RelayError::Dispatch(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let RelayError::Dispatch(cause) = self {
            error!(error = %cause, "Error sending email");
        }
        HttpResponse::build(self.status_code()).json(RelayResponse::failed(self.to_string()))
    }
}
