// SPDX-License-Identifier: Apache-2.0
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use lettre::message::{Mailbox, Message, MultiPart};
use lettre::{Address, AsyncTransport};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::DispatchError;
use crate::submission::FormSubmission;

/// A message ready for the transport, with the id it was stamped with
#[derive(Debug)]
pub struct ComposedMessage {
    pub message: Message,
    pub message_id: String,
}

pub fn subject_for(submission: &FormSubmission) -> String {
    format!("Nowa wiadomość z formularza od {}", submission.full_name())
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

// `message` is rendered separately below this block
fn labelled_fields(s: &FormSubmission) -> [(&'static str, &str); 9] {
    [
        ("Imię", s.name.as_str()),
        ("Nazwisko", s.surname.as_str()),
        ("Nazwa firmy", opt(&s.company)),
        ("Ulica", opt(&s.street)),
        ("Nr domu/lokalu", opt(&s.house)),
        ("Kod pocztowy", opt(&s.postal)),
        ("Miejscowość", opt(&s.city)),
        ("Email", s.email.as_str()),
        ("Data", opt(&s.date)),
    ]
}

pub fn text_body(submission: &FormSubmission) -> String {
    let mut body = String::new();
    for (label, value) in labelled_fields(submission) {
        body.push_str(&format!("{label}: {value}\n"));
    }
    body.push_str(&format!("\nWiadomość:\n{}", submission.message));
    body
}

pub fn html_body(submission: &FormSubmission) -> String {
    let mut body = String::new();
    for (label, value) in labelled_fields(submission) {
        body.push_str(&format!(
            "<p><strong>{label}:</strong> {}</p>",
            escape_html(value)
        ));
    }
    body.push_str("<p><strong>Wiadomość:</strong></p>");
    body.push_str(&format!(
        "<p>{}</p>",
        escape_html(&submission.message).replace('\n', "<br/>")
    ));
    body
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build the email the office receives for one submission
#[instrument(skip(submission, destination), fields(submitter = %submission.email))]
pub fn compose_message(
    submission: &FormSubmission,
    destination: &Mailbox,
) -> Result<ComposedMessage, DispatchError> {
    let address = submission
        .email
        .parse::<Address>()
        .map_err(|_| DispatchError::Address(submission.email.clone()))?;
    let message_id = format!("<{}@{}>", Uuid::new_v4(), address.domain());
    let from = Mailbox::new(Some(submission.full_name()), address);

    let message = Message::builder()
        .from(from)
        .to(destination.clone())
        .subject(subject_for(submission))
        .message_id(Some(message_id.clone()))
        .multipart(MultiPart::alternative_plain_html(
            text_body(submission),
            html_body(submission),
        ))
        .map_err(|e| DispatchError::Compose(e.to_string()))?;

    Ok(ComposedMessage { message, message_id })
}

/// Hand a composed message to the transport, giving up after `timeout`
#[instrument(skip(transport, composed), fields(message_id = %composed.message_id))]
pub async fn dispatch<T>(
    transport: &T,
    composed: ComposedMessage,
    timeout: Duration,
) -> Result<String, DispatchError>
where
    T: AsyncTransport + Sync,
    T::Error: Display,
{
    let ComposedMessage { message, message_id } = composed;

    within(timeout, transport.send(message))
        .await?
        .map_err(|e| DispatchError::Transport(e.to_string()))?;

    info!("Submission relayed to office inbox");
    Ok(message_id)
}

/// Compose and dispatch in one step, returning the Message-ID on success
pub async fn send_submission<T>(
    transport: &T,
    submission: &FormSubmission,
    destination: &Mailbox,
    timeout: Duration,
) -> Result<String, DispatchError>
where
    T: AsyncTransport + Sync,
    T::Error: Display,
{
    let composed = compose_message(submission, destination)?;
    dispatch(transport, composed, timeout).await
}

async fn within<F: Future>(timeout: Duration, fut: F) -> Result<F::Output, DispatchError> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| DispatchError::TimedOut(timeout))
}
