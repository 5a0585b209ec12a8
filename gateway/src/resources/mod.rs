//! Typed clients for the REST resources, one module per resource.
//!
//! Response schemas are declared here, at the gateway boundary, so a
//! missing or renamed field surfaces as a decode error in one place
//! instead of as a crash somewhere in page code.

pub mod classes;
pub mod enrollments;
pub mod grades;
pub mod users;

use serde::Deserialize;

/// Bare `{"msg": ...}` acknowledgment envelope.
#[derive(Debug, Default, Deserialize)]
pub struct Ack {
    #[serde(default, alias = "message")]
    pub msg: Option<String>,
}
