//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the service scheduler:
//! records and priority classes, error taxonomy, configuration blueprint and
//! the `ServiceQueue` trait implemented by the dispatcher front-ends.
//! All business crates depend on this crate, reverse dependencies are prohibited.
//!
//! ## Numbering Model
//! - Service numbers are issued by the dispatcher only, starting at 1
//! - Numbers are strictly increasing across both priority classes and never reused

mod blueprint;
mod contact_key;
mod error;
mod queue;
mod record;

pub use blueprint::*;
pub use contact_key::ContactKey;
pub use error::*;
pub use queue::{LocalServiceQueue, QueueSnapshot, ServiceQueue};
pub use record::*;
