// SPDX-License-Identifier: Apache-2.0
//! Submitting side of the form: validate locally, then call the relay.
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::submission::{RelayResponse, RelayResult};
use crate::validation::{validate, FieldErrors, FormInput};

pub const API_URL_ENV: &str = "VITE_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The form did not pass validation; nothing was sent
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    /// The relay answered with an error
    #[error("{0}")]
    Rejected(String),

    #[error("request to relay failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct FormClient {
    base_url: String,
    http: Client,
}

impl FormClient {
    /// Fails only if the HTTP client cannot be set up (e.g. no TLS backend)
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self { base_url, http })
    }

    /// Relay base URL from `VITE_API_URL`, falling back to localhost
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate and submit the form, returning the relayed Message-ID
    #[instrument(skip(self, input), fields(base_url = %self.base_url))]
    pub async fn submit(&self, input: &FormInput) -> Result<String, ClientError> {
        let errors = validate(input);
        if !errors.is_empty() {
            debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Form failed validation");
            return Err(ClientError::Invalid(errors));
        }

        let res = self
            .http
            .post(format!("{}/send", self.base_url))
            .json(&input.to_request())
            .send()
            .await?;
        let status = res.status();
        let body: RelayResponse = res.json().await?;

        match RelayResult::from(body) {
            RelayResult::Sent { message_id } if status.is_success() => Ok(message_id),
            RelayResult::Sent { .. } => Err(ClientError::Rejected("Server error".to_string())),
            RelayResult::Failed { reason } => Err(ClientError::Rejected(reason)),
        }
    }
}
