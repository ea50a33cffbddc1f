//! ContactKey - lookup key of a queued customer
//!
//! Owns the rule for what counts as a usable key. Check-in validation and
//! lookups both go through [`ContactKey::check`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use crate::SchedulerError;

/// Contact key (typically a phone number) used to look a customer up.
///
/// Records are copied out of the dispatcher on every lookup and dequeue, so the
/// key is an `Arc<str>` and copies only bump a reference count. Uniqueness is
/// not enforced: lookups return the first match in scan order.
///
/// # Examples
/// ```
/// use contracts::{ContactKey, SchedulerError};
///
/// let key = ContactKey::parse("1234567890").unwrap();
/// assert_eq!(key, "1234567890");
/// assert_eq!(ContactKey::parse("  "), Err(SchedulerError::InvalidKey));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ContactKey(Arc<str>);

impl ContactKey {
    /// Reject empty and whitespace-only keys, returning the key unchanged
    pub fn check(raw: &str) -> Result<&str, SchedulerError> {
        if raw.trim().is_empty() {
            return Err(SchedulerError::InvalidKey);
        }
        Ok(raw)
    }

    /// Validated key
    pub fn parse(raw: &str) -> Result<Self, SchedulerError> {
        Self::check(raw).map(Self::from)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Unchecked conversions; the transport validates keys before building check-ins.
impl From<&str> for ContactKey {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for ContactKey {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for ContactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ContactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContactKey({:?})", self.0)
    }
}

impl PartialEq<str> for ContactKey {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ContactKey {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Serialize for ContactKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ContactKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}
