// SPDX-License-Identifier: Apache-2.0
use std::fmt::Display;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse, Responder};
use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{debug, error, instrument};

use crate::config::AppConfig;
use crate::error::RelayError;
use crate::send_submission::send_submission;
use crate::submission::{FormSubmission, RelayResponse, RelayResult, SubmissionRequest};

pub const HEALTH_MESSAGE: &str = "Form server running";

/// Everything `/send` needs to deliver a message
pub struct Relay<T> {
    pub transport: T,
    pub destination: Mailbox,
    pub timeout: Duration,
}

/// Shared, read-only handler state
pub struct RelayState<T> {
    relay: Option<Relay<T>>,
}

impl<T> RelayState<T> {
    pub fn new(transport: T, destination: Mailbox, timeout: Duration) -> Self {
        Self {
            relay: Some(Relay {
                transport,
                destination,
                timeout,
            }),
        }
    }

    /// State for a server whose SMTP settings are missing
    pub fn unconfigured() -> Self {
        Self { relay: None }
    }

    pub fn is_configured(&self) -> bool {
        self.relay.is_some()
    }
}

impl RelayState<AsyncSmtpTransport<Tokio1Executor>> {
    /// Build the SMTP transport from startup configuration
    pub fn from_config(config: &AppConfig) -> Self {
        let Ok(smtp) = &config.smtp else {
            return Self::unconfigured();
        };

        match smtp.build_transport(config.dispatch_timeout) {
            Ok(transport) => Self::new(transport, smtp.destination.clone(), config.dispatch_timeout),
            Err(e) => {
                error!(error = %e, "Could not build SMTP transport, /send will fail");
                Self::unconfigured()
            }
        }
    }
}

/// Any origin may call the relay; the form is usually served elsewhere
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
}

/// Register the relay routes for transport `T`
pub fn configure<T>(cfg: &mut web::ServiceConfig)
where
    T: AsyncTransport + Send + Sync + 'static,
    T::Error: Display,
{
    cfg.route("/", web::get().to(health_check))
        .route("/send", web::post().to(send_form::<T>));
}

/// Liveness check
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(HEALTH_MESSAGE)
}

/// Relay a submitted form to the office inbox
#[instrument(name = "send_form", skip(body, state))]
pub async fn send_form<T>(
    body: web::Bytes,
    state: web::Data<RelayState<T>>,
) -> Result<HttpResponse, RelayError>
where
    T: AsyncTransport + Send + Sync + 'static,
    T::Error: Display,
{
    let submission = FormSubmission::try_from(parse_body(&body)?)?;
    let relay = state.relay.as_ref().ok_or(RelayError::NotConfigured)?;

    let message_id = send_submission(
        &relay.transport,
        &submission,
        &relay.destination,
        relay.timeout,
    )
    .await
    .map_err(RelayError::Dispatch)?;

    let result = RelayResult::Sent { message_id };
    Ok(HttpResponse::Ok().json(RelayResponse::from(result)))
}

// An absent or `null` body reads as `{}`.
fn parse_body(body: &[u8]) -> Result<SubmissionRequest, RelayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SubmissionRequest::default());
    }

    serde_json::from_slice::<Option<SubmissionRequest>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|e| {
            debug!(error = %e, "Rejected undecodable request body");
            RelayError::InvalidBody
        })
}
