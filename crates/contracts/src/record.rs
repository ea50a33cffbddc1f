//! Service records - what the dispatcher queues and hands out
//!
//! A `CheckIn` is built by the transport layer; the dispatcher stamps it with
//! a service number and turns it into a `ServiceRecord`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ContactKey, SchedulerError};

/// Priority class of a waiting customer
///
/// Serialized as `"HIGH"` / `"NORMAL"`. The legacy names `"VIP"` and
/// `"REGULAR"` are accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriorityClass {
    /// Served preferentially, up to the ratio threshold in a row
    #[serde(alias = "VIP")]
    High,
    /// Served at least once after every run of HIGH dispatches
    #[serde(alias = "REGULAR")]
    Normal,
}

impl PriorityClass {
    /// Both classes, in dispatch preference order
    pub const ALL: [PriorityClass; 2] = [PriorityClass::High, PriorityClass::Normal];

    /// Wire name of the class
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Normal => "NORMAL",
        }
    }
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityClass {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HIGH" | "VIP" => Ok(Self::High),
            "NORMAL" | "REGULAR" => Ok(Self::Normal),
            _ => Err(SchedulerError::invalid_class(Some(s))),
        }
    }
}

/// An arriving customer that has not been numbered yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIn {
    pub name: String,
    pub contact_key: ContactKey,
    pub priority_class: PriorityClass,
}

impl CheckIn {
    pub fn new(
        name: impl Into<String>,
        contact_key: impl Into<ContactKey>,
        priority_class: PriorityClass,
    ) -> Self {
        Self {
            name: name.into(),
            contact_key: contact_key.into(),
            priority_class,
        }
    }

    /// Convenience constructor for a HIGH check-in
    pub fn high(name: impl Into<String>, contact_key: impl Into<ContactKey>) -> Self {
        Self::new(name, contact_key, PriorityClass::High)
    }

    /// Convenience constructor for a NORMAL check-in
    pub fn normal(name: impl Into<String>, contact_key: impl Into<ContactKey>) -> Self {
        Self::new(name, contact_key, PriorityClass::Normal)
    }

    /// Stamp the check-in with its service number
    pub fn into_record(self, service_number: u64) -> ServiceRecord {
        ServiceRecord {
            name: self.name,
            contact_key: self.contact_key,
            priority_class: self.priority_class,
            service_number,
        }
    }
}

/// A numbered customer, either waiting in a queue or just dispatched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub name: String,
    pub contact_key: ContactKey,
    pub priority_class: PriorityClass,
    /// Issued by the dispatcher at check-in, never changes afterwards
    pub service_number: u64,
}
