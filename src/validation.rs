//! Field checks for incoming JSON payloads.
//!
//! Every payload shape is described by an ordered table of `(field, check)`
//! pairs. Running a table yields one entry per field, holding the error
//! message for that field or `None`. The handler surfaces the first error in
//! table order.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::{dates, error::ApiError};

pub type FieldCheck = fn(Option<&Value>) -> Option<String>;

pub const ITEM_FIELDS: &[(&str, FieldCheck)] = &[
    ("name", validate_name),
    ("email", validate_email),
    ("item_name", validate_item_name),
    ("quantity", validate_quantity),
    ("expiry_date", validate_expiry_date),
];

pub const CLOCK_IN_FIELDS: &[(&str, FieldCheck)] = &[
    ("email", validate_email),
    ("location", validate_location),
];

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug)]
pub struct ValidationReport(Vec<(&'static str, Option<String>)>);

impl ValidationReport {
    /// Failing fields in declared order.
    pub fn errors(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0
            .iter()
            .filter_map(|(name, err)| err.as_deref().map(|e| (*name, e)))
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        let Some((field, msg)) = self.errors().next() else {
            return Ok(());
        };
        debug!(field, "payload rejected");
        Err(ApiError::Validation(msg.to_string()))
    }
}

/// Runs only the checks named in `fields`, in order.
pub fn validate(payload: &Value, fields: &[(&'static str, FieldCheck)]) -> ValidationReport {
    ValidationReport(
        fields
            .iter()
            .map(|(name, check)| (*name, check(field(payload, name))))
            .collect(),
    )
}

// JSON null is treated the same as an absent key.
fn field<'a>(payload: &'a Value, name: &str) -> Option<&'a Value> {
    payload.get(name).filter(|v| !v.is_null())
}

fn require_str<'a>(name: &str, raw: Option<&'a Value>) -> Result<&'a str, String> {
    match raw {
        None => Err(format!("{name} key is missing in the payload.")),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(format!("{name} should be a string.")),
    }
}

fn non_empty_text(name: &str, raw: Option<&Value>) -> Option<String> {
    match require_str(name, raw) {
        Err(msg) => Some(msg),
        Ok("") => Some(format!("{name} field cannot be empty.")),
        Ok(_) => None,
    }
}

fn date_text(name: &str, label: &str, raw: Option<&Value>) -> Option<String> {
    let text = match require_str(name, raw) {
        Ok(t) => t,
        Err(msg) => return Some(msg),
    };
    let mut err = text
        .is_empty()
        .then(|| format!("{name} field cannot be empty."));
    if dates::parse_date(text).is_err() {
        err = Some(date_format_error(label));
    }
    err
}

pub fn date_format_error(label: &str) -> String {
    format!("Please provide {label} date in yyyy-mm-dd format.")
}

pub fn validate_name(raw: Option<&Value>) -> Option<String> {
    non_empty_text("name", raw)
}

pub fn validate_item_name(raw: Option<&Value>) -> Option<String> {
    non_empty_text("item_name", raw)
}

pub fn validate_location(raw: Option<&Value>) -> Option<String> {
    non_empty_text("location", raw)
}

/// The regex check runs last and overwrites whatever the presence chain
/// reported, so a missing or empty email also ends up as "valid email".
pub fn validate_email(raw: Option<&Value>) -> Option<String> {
    let mut err = non_empty_text("email", raw);
    let candidate = raw.and_then(Value::as_str).unwrap_or_default();
    if !is_valid_email(candidate) {
        err = Some("please provide a valid email.".to_string());
    }
    err
}

pub fn validate_quantity(raw: Option<&Value>) -> Option<String> {
    let Some(raw) = raw else {
        return Some("quantity key is missing in the payload.".to_string());
    };
    match raw.as_i64() {
        None => Some("quantity should be an integer.".to_string()),
        Some(q) if q < 0 => Some("Please provide valid item quantity count.".to_string()),
        Some(_) => None,
    }
}

pub fn validate_expiry_date(raw: Option<&Value>) -> Option<String> {
    date_text("expiry_date", "expiry", raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn first_error(report: &ValidationReport) -> Option<&str> {
        report.errors().next().map(|(_, msg)| msg)
    }

    fn error_for<'a>(report: &'a ValidationReport, field: &str) -> Option<&'a str> {
        report.errors().find(|(name, _)| *name == field).map(|(_, msg)| msg)
    }

    fn item() -> Value {
        json!({
            "name": "Ada",
            "email": "ada@example.com",
            "item_name": "Milk",
            "quantity": 3,
            "expiry_date": "2030-01-31"
        })
    }

    #[test]
    fn valid_item_has_no_errors() {
        let report = validate(&item(), ITEM_FIELDS);
        assert_eq!(report.errors().count(), 0);
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn missing_fields_are_named() {
        for (name, _) in ITEM_FIELDS.iter().filter(|(n, _)| *n != "email") {
            let mut payload = item();
            payload.as_object_mut().unwrap().remove(*name);
            let report = validate(&payload, ITEM_FIELDS);
            let msg = first_error(&report).unwrap();
            assert_eq!(msg, format!("{name} key is missing in the payload."));
        }
    }

    #[test]
    fn null_counts_as_missing() {
        let mut payload = item();
        payload["item_name"] = Value::Null;
        let report = validate(&payload, ITEM_FIELDS);
        assert_eq!(
            error_for(&report, "item_name"),
            Some("item_name key is missing in the payload.")
        );
    }

    #[test]
    fn wrong_types_are_reported() {
        let mut payload = item();
        payload["name"] = json!(42);
        payload["quantity"] = json!("three");
        let report = validate(&payload, ITEM_FIELDS);
        assert_eq!(error_for(&report, "name"), Some("name should be a string."));
        assert_eq!(error_for(&report, "quantity"), Some("quantity should be an integer."));
        assert_eq!(first_error(&report), Some("name should be a string."));
    }

    #[test]
    fn fractional_quantity_is_not_an_integer() {
        assert_eq!(
            validate_quantity(Some(&json!(2.5))),
            Some("quantity should be an integer.".to_string())
        );
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let mut payload = item();
        payload["quantity"] = json!(-1);
        let report = validate(&payload, ITEM_FIELDS);
        let msg = first_error(&report).unwrap();
        assert!(msg.contains("valid item quantity count"));
        assert_eq!(validate_quantity(Some(&json!(0))), None);
    }

    #[test]
    fn empty_text_is_rejected() {
        let mut payload = item();
        payload["item_name"] = json!("");
        let report = validate(&payload, ITEM_FIELDS);
        assert_eq!(first_error(&report), Some("item_name field cannot be empty."));
    }

    #[test]
    fn bad_expiry_date_reports_format() {
        let mut payload = item();
        payload["expiry_date"] = json!("2024-13-40");
        let report = validate(&payload, ITEM_FIELDS);
        assert_eq!(
            first_error(&report),
            Some("Please provide expiry date in yyyy-mm-dd format.")
        );
    }

    #[test]
    fn empty_date_reports_format_not_emptiness() {
        assert_eq!(
            validate_expiry_date(Some(&json!(""))),
            Some("Please provide expiry date in yyyy-mm-dd format.".to_string())
        );
        assert_eq!(validate_expiry_date(Some(&json!("2030-01-31"))), None);
    }

    #[test]
    fn signed_years_are_not_dates() {
        for text in ["-2030-01-31", "+2030-01-31"] {
            assert_eq!(
                validate_expiry_date(Some(&json!(text))),
                Some("Please provide expiry date in yyyy-mm-dd format.".to_string()),
                "{text}"
            );
        }
    }

    #[test]
    fn email_regex_overrides_presence_message() {
        assert_eq!(
            validate_email(None),
            Some("please provide a valid email.".to_string())
        );
        assert_eq!(
            validate_email(Some(&json!(""))),
            Some("please provide a valid email.".to_string())
        );
        assert_eq!(
            validate_email(Some(&json!(7))),
            Some("please provide a valid email.".to_string())
        );
        assert_eq!(
            validate_email(Some(&json!("no-at-sign.example.com"))),
            Some("please provide a valid email.".to_string())
        );
        assert_eq!(validate_email(Some(&json!("a.b+c@mail.example.org"))), None);
    }

    #[test]
    fn first_error_follows_declared_order() {
        let payload = json!({ "location": "" });
        let report = validate(&payload, CLOCK_IN_FIELDS);
        assert_eq!(first_error(&report), Some("please provide a valid email."));
        assert_eq!(error_for(&report, "location"), Some("location field cannot be empty."));
    }

    #[test]
    fn only_requested_fields_are_checked() {
        let report = validate(&json!({}), &[("location", validate_location as FieldCheck)]);
        assert!(error_for(&report, "email").is_none());
        assert_eq!(
            first_error(&report),
            Some("location key is missing in the payload.")
        );
    }

    #[test]
    fn non_object_payload_reports_everything_missing() {
        let report = validate(&json!([1, 2]), CLOCK_IN_FIELDS);
        assert_eq!(
            error_for(&report, "location"),
            Some("location key is missing in the payload.")
        );
    }
}
