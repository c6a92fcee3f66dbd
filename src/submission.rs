// SPDX-License-Identifier: Apache-2.0
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Body of `POST /send` as it arrives on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A submission that passed the relay's presence check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub name: String,
    pub surname: String,
    pub company: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
    pub postal: Option<String>,
    pub city: Option<String>,
    pub email: String,
    pub date: Option<String>,
    pub message: String,
}

impl FormSubmission {
    /// Display name used in the `From` header and subject line
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

fn required(value: Option<String>) -> Result<String, RelayError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(RelayError::MissingFields)
}

// Only presence is checked here; shape rules live in `validation`.
impl TryFrom<SubmissionRequest> for FormSubmission {
    type Error = RelayError;

    fn try_from(req: SubmissionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required(req.name)?,
            surname: required(req.surname)?,
            company: req.company,
            street: req.street,
            house: req.house,
            postal: req.postal,
            city: req.city,
            email: required(req.email)?,
            date: req.date,
            message: required(req.message)?,
        })
    }
}

/// Outcome of one relay request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayResult {
    Sent { message_id: String },
    Failed { reason: String },
}

/// JSON reply of the relay endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub ok: bool,
    #[serde(rename = "messageId", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    pub fn sent(message_id: impl Into<String>) -> Self {
        Self {
            ok: true,
            message_id: Some(message_id.into()),
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            message_id: None,
            error: Some(reason.into()),
        }
    }
}

impl From<RelayResult> for RelayResponse {
    fn from(result: RelayResult) -> Self {
        match result {
            RelayResult::Sent { message_id } => Self::sent(message_id),
            RelayResult::Failed { reason } => Self::failed(reason),
        }
    }
}

impl From<RelayResponse> for RelayResult {
    fn from(response: RelayResponse) -> Self {
        if response.ok {
            RelayResult::Sent {
                message_id: response.message_id.unwrap_or_default(),
            }
        } else {
            RelayResult::Failed {
                reason: response.error.unwrap_or_else(|| "Server error".to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> SubmissionRequest {
        SubmissionRequest {
            name: Some("Jan".into()),
            surname: Some("Kowalski".into()),
            email: Some("jan@example.com".into()),
            message: Some("Hello".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_required_fields_present() {
        let submission = FormSubmission::try_from(full_request()).unwrap();
        assert_eq!(submission.full_name(), "Jan Kowalski");
        assert_eq!(submission.company, None);
    }

    #[test]
    fn test_empty_required_field_rejected() {
        let req = SubmissionRequest {
            surname: Some(String::new()),
            ..full_request()
        };
        assert!(matches!(
            FormSubmission::try_from(req),
            Err(RelayError::MissingFields)
        ));
    }

    #[test]
    fn test_whitespace_only_passes_presence_check() {
        // The relay only checks for emptiness, not blankness.
        let req = SubmissionRequest {
            message: Some("   ".into()),
            ..full_request()
        };
        assert!(FormSubmission::try_from(req).is_ok());
    }

    #[test]
    fn test_response_omits_absent_members() {
        let json = serde_json::to_value(RelayResponse::sent("<id@example.com>")).unwrap();
        assert_eq!(json, serde_json::json!({"ok": true, "messageId": "<id@example.com>"}));

        let json = serde_json::to_value(RelayResponse::failed("Missing required fields")).unwrap();
        assert_eq!(json, serde_json::json!({"ok": false, "error": "Missing required fields"}));
    }

    #[test]
    fn test_failed_response_without_error_reads_as_server_error() {
        let response: RelayResponse = serde_json::from_str(r#"{"ok":false}"#).unwrap();
        assert_eq!(
            RelayResult::from(response),
            RelayResult::Failed { reason: "Server error".into() }
        );
    }
}
