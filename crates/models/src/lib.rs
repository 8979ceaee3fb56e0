//! Domain records shared by the service and server crates.
//!
//! - `contact`: contact records, request-body parsing and id generation
//! - `user`: user accounts and their public projection
//! - `validation`: field-level checks reused by both

pub mod errors;
pub mod validation;
pub mod contact;
pub mod user;
