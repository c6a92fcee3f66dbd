// SPDX-License-Identifier: Apache-2.0
//! Field rules for the records-request form.
//!
//! The relay endpoint only checks that the required fields are present; the
//! shape rules below run on the submitting side before anything is sent.
use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::submission::SubmissionRequest;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"));

// ASCII digits only, `\d` would also accept other scripts.
static POSTAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}-[0-9]{3}$").expect("postal pattern compiles"));

pub const NAME_REQUIRED: &str = "Imię jest wymagane";
pub const SURNAME_REQUIRED: &str = "Nazwisko jest wymagane";
pub const DATE_INVALID: &str = "Nieprawidłowa data";
pub const EMAIL_REQUIRED: &str = "Email jest wymagany";
pub const EMAIL_INVALID: &str = "Nieprawidłowy email";
pub const MESSAGE_REQUIRED: &str = "Wiadomość jest wymagana";
pub const CONSENT_REQUIRED: &str = "Musisz zaakceptować regulamin";
pub const POSTAL_INVALID: &str = "Kod pocztowy powinien mieć format 00-000";

/// Field name to error message; empty means the form is valid
pub type FieldErrors = BTreeMap<&'static str, String>;

/// State of the form as the citizen filled it in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    pub name: String,
    pub surname: String,
    pub company: String,
    pub street: String,
    pub house: String,
    pub postal: String,
    pub city: String,
    pub email: String,
    pub date: String,
    pub message: String,
    pub agree: bool,
}

impl FormInput {
    /// Request body carrying only the fields the relay accepts.
    ///
    /// Consent is checked locally and never leaves the client.
    pub fn to_request(&self) -> SubmissionRequest {
        SubmissionRequest {
            name: Some(self.name.clone()),
            surname: Some(self.surname.clone()),
            company: Some(self.company.clone()),
            street: Some(self.street.clone()),
            house: Some(self.house.clone()),
            postal: Some(self.postal.clone()),
            city: Some(self.city.clone()),
            email: Some(self.email.clone()),
            date: Some(self.date.clone()),
            message: Some(self.message.clone()),
        }
    }
}

/// Check every rule and collect one message per offending field
pub fn validate(input: &FormInput) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if is_blank(&input.name) {
        errors.insert("name", NAME_REQUIRED.to_string());
    }
    if is_blank(&input.surname) {
        errors.insert("surname", SURNAME_REQUIRED.to_string());
    }
    if !input.date.is_empty() && !is_valid_date(&input.date) {
        errors.insert("date", DATE_INVALID.to_string());
    }
    if is_blank(&input.email) {
        errors.insert("email", EMAIL_REQUIRED.to_string());
    } else if !is_valid_email(&input.email) {
        errors.insert("email", EMAIL_INVALID.to_string());
    }
    if is_blank(&input.message) {
        errors.insert("message", MESSAGE_REQUIRED.to_string());
    }
    if !input.agree {
        errors.insert("agree", CONSENT_REQUIRED.to_string());
    }
    if !input.postal.is_empty() && !is_valid_postal(&input.postal) {
        errors.insert("postal", POSTAL_INVALID.to_string());
    }

    errors
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Polish postal code, `00-000`
pub fn is_valid_postal(value: &str) -> bool {
    POSTAL_PATTERN.is_match(value)
}

/// Accepts what date and datetime-local inputs produce, plus RFC 3339
pub fn is_valid_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postal_format() {
        assert!(is_valid_postal("00-950"));
        assert!(!is_valid_postal("12345"));
        assert!(!is_valid_postal("12-3456"));
        assert!(!is_valid_postal(" 12-345"));
        assert!(!is_valid_postal("١٢-٣٤٥"));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("jan@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.pl"));
        assert!(!is_valid_email("bad-email"));
        assert!(!is_valid_email("jan@localhost"));
        assert!(!is_valid_email("jan kowalski@example.com"));
    }

    #[test]
    fn test_date_forms() {
        assert!(is_valid_date("2024-02-29"));
        assert!(is_valid_date("2024-05-01T10:30"));
        assert!(is_valid_date("2024-05-01T10:30:00Z"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("2024-13-01"));
        assert!(!is_valid_date("jutro"));
    }

    #[test]
    fn test_request_excludes_consent() {
        let input = FormInput {
            name: "Jan".into(),
            agree: true,
            ..Default::default()
        };
        let body = serde_json::to_value(input.to_request()).unwrap();
        assert!(body.get("agree").is_none());
        assert_eq!(body["name"], "Jan");
        assert_eq!(body["company"], "");
    }
}
