// SPDX-License-Identifier: Apache-2.0
use geoform_relay::validation::{
    validate, FormInput, CONSENT_REQUIRED, DATE_INVALID, EMAIL_INVALID, EMAIL_REQUIRED,
    MESSAGE_REQUIRED, NAME_REQUIRED, POSTAL_INVALID, SURNAME_REQUIRED,
};

fn valid_input() -> FormInput {
    FormInput {
        name: "Jan".into(),
        surname: "Kowalski".into(),
        email: "jan@example.com".into(),
        message: "Hello".into(),
        agree: true,
        ..Default::default()
    }
}

#[test]
fn test_valid_form_has_no_errors() {
    assert!(validate(&valid_input()).is_empty());

    let full = FormInput {
        company: "Biuro Geodezyjne".into(),
        street: "Długa".into(),
        house: "5/2".into(),
        postal: "00-950".into(),
        city: "Warszawa".into(),
        date: "2024-06-01".into(),
        ..valid_input()
    };
    assert!(validate(&full).is_empty());
}

#[test]
fn test_empty_form_reports_every_rule() {
    let errors = validate(&FormInput::default());

    assert_eq!(errors.len(), 5);
    assert_eq!(errors["name"], NAME_REQUIRED);
    assert_eq!(errors["surname"], SURNAME_REQUIRED);
    assert_eq!(errors["email"], EMAIL_REQUIRED);
    assert_eq!(errors["message"], MESSAGE_REQUIRED);
    assert_eq!(errors["agree"], CONSENT_REQUIRED);
}

#[test]
fn test_blank_values_count_as_missing() {
    let input = FormInput {
        name: "  ".into(),
        surname: "\t".into(),
        email: " ".into(),
        message: "\n".into(),
        ..valid_input()
    };
    let errors = validate(&input);

    assert_eq!(errors["name"], NAME_REQUIRED);
    assert_eq!(errors["surname"], SURNAME_REQUIRED);
    assert_eq!(errors["email"], EMAIL_REQUIRED);
    assert_eq!(errors["message"], MESSAGE_REQUIRED);
}

#[test]
fn test_bad_email_flagged() {
    let input = FormInput {
        email: "bad-email".into(),
        ..valid_input()
    };
    let errors = validate(&input);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["email"], EMAIL_INVALID);
}

#[test]
fn test_postal_code_format() {
    let input = FormInput {
        postal: "12345".into(),
        ..valid_input()
    };
    let errors = validate(&input);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["postal"], POSTAL_INVALID);
    assert_eq!(POSTAL_INVALID, "Kod pocztowy powinien mieć format 00-000");

    for bad in ["1-2345", "12-34", "ab-cde", "12 345", "12-345 "] {
        let input = FormInput {
            postal: bad.into(),
            ..valid_input()
        };
        assert!(validate(&input).contains_key("postal"), "{bad:?} accepted");
    }
}

#[test]
fn test_invalid_date_flagged() {
    let input = FormInput {
        date: "31.02.2024".into(),
        ..valid_input()
    };
    assert_eq!(validate(&input)["date"], DATE_INVALID);
}

#[test]
fn test_rules_are_independent() {
    let input = FormInput {
        email: "bad-email".into(),
        postal: "12345".into(),
        date: "not a date".into(),
        agree: false,
        ..valid_input()
    };
    let errors = validate(&input);
    let fields: Vec<_> = errors.keys().copied().collect();
    assert_eq!(fields, ["agree", "date", "email", "postal"]);
}

#[test]
fn test_validation_is_idempotent() {
    let input = FormInput {
        surname: String::new(),
        postal: "999".into(),
        ..valid_input()
    };
    assert_eq!(validate(&input), validate(&input));
}
