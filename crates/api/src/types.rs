//! Wire types of the HTTP API

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use contracts::{
    CheckIn, ContactKey, DispatchMode, PriorityClass, QueueSnapshot, SchedulerError,
    ServiceRecord,
};
use dispatcher::MetricsSnapshot;

use crate::error::ApiError;

/// Check-in payload
///
/// `name` and `contactKey` must be non-blank. `priorityClass` stays a raw
/// string so a missing or unknown class surfaces as an invalid class error
/// rather than a body parse failure. A client-sent `serviceNumber` is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[serde(default, alias = "phoneNumber")]
    #[validate(custom(function = "usable_contact_key"))]
    pub contact_key: String,

    #[serde(default, alias = "customerType")]
    pub priority_class: Option<String>,
}

fn blank() -> ValidationError {
    ValidationError::new("blank").with_message(Cow::from("must not be blank"))
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(blank());
    }
    Ok(())
}

fn usable_contact_key(value: &str) -> Result<(), ValidationError> {
    ContactKey::check(value).map(|_| ()).map_err(|_| blank())
}

/// JSON field name of a struct field
fn wire_name(field: &str) -> &str {
    match field {
        "contact_key" => "contactKey",
        "priority_class" => "priorityClass",
        other => other,
    }
}

/// One `field: reason` entry per failing field, named as clients send them
fn describe(errors: &ValidationErrors) -> String {
    let mut entries: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let reason = errs
                .iter()
                .find_map(|e| e.message.as_deref())
                .unwrap_or("is invalid");
            format!("{}: {reason}", wire_name(&field))
        })
        .collect();
    entries.sort();
    entries.join(", ")
}

impl CheckInRequest {
    /// Validate the payload and convert it into a core check-in
    pub fn into_check_in(self) -> Result<CheckIn, ApiError> {
        self.validate()
            .map_err(|e| ApiError::Validation(describe(&e)))?;

        let class = match self.priority_class.as_deref() {
            Some(value) => value.parse::<PriorityClass>()?,
            None => return Err(SchedulerError::invalid_class(None::<String>).into()),
        };

        Ok(CheckIn::new(self.name, self.contact_key, class))
    }
}

/// Check-in confirmation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInResponse {
    pub message: String,
    pub service_number: u64,
    pub record: ServiceRecord,
}

impl From<ServiceRecord> for CheckInResponse {
    fn from(record: ServiceRecord) -> Self {
        Self {
            message: format!(
                "Customer checked in with service number: {}",
                record.service_number
            ),
            service_number: record.service_number,
            record,
        }
    }
}

/// Dispatcher statistics
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub mode: DispatchMode,
    pub ratio_threshold: u32,
    pub queue: QueueSnapshot,
    pub counters: MetricsSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> CheckInRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_valid_request_converts() {
        let check_in = request(
            r#"{ "name": "Alice", "contactKey": "1234567890", "priorityClass": "HIGH" }"#,
        )
        .into_check_in()
        .unwrap();
        assert_eq!(check_in, CheckIn::high("Alice", "1234567890"));
    }

    #[test]
    fn test_legacy_field_names_accepted() {
        let check_in = request(
            r#"{ "name": "Charlie", "phoneNumber": "3456789012", "customerType": "REGULAR" }"#,
        )
        .into_check_in()
        .unwrap();
        assert_eq!(check_in.priority_class, PriorityClass::Normal);
        assert_eq!(check_in.contact_key, "3456789012");
    }

    #[test]
    fn test_client_service_number_ignored() {
        let req = request(
            r#"{ "name": "Dave", "contactKey": "4", "priorityClass": "NORMAL", "serviceNumber": 99 }"#,
        );
        assert!(req.into_check_in().is_ok());
    }

    #[test]
    fn test_missing_class_is_invalid_class() {
        let err = request(r#"{ "name": "John Doe", "contactKey": "5551234" }"#)
            .into_check_in()
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Scheduler(SchedulerError::InvalidClass { value: None })
        ));
    }

    #[test]
    fn test_unknown_class_is_invalid_class() {
        let err = request(r#"{ "name": "John", "contactKey": "1", "priorityClass": "GOLD" }"#)
            .into_check_in()
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Scheduler(SchedulerError::InvalidClass { value: Some(_) })
        ));
    }

    #[test]
    fn test_blank_fields_rejected() {
        let err = request(r#"{ "name": "  ", "priorityClass": "HIGH" }"#)
            .into_check_in()
            .unwrap_err();
        match err {
            ApiError::Validation(message) => {
                assert_eq!(
                    message,
                    "contactKey: must not be blank, name: must not be blank"
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_contact_key_rejected() {
        let err = request(r#"{ "name": "Eve", "contactKey": " \t ", "priorityClass": "NORMAL" }"#)
            .into_check_in()
            .unwrap_err();
        match err {
            ApiError::Validation(message) => {
                assert_eq!(message, "contactKey: must not be blank");
                assert!(!message.contains("contact_key"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_confirmation_message() {
        let response = CheckInResponse::from(CheckIn::normal("Dave", "4").into_record(12));
        assert_eq!(
            response.message,
            "Customer checked in with service number: 12"
        );
        assert_eq!(response.service_number, 12);
    }
}
