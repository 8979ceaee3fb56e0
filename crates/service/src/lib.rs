//! Service layer providing business-oriented operations on top of models.
//! - `storage`: file-backed JSON documents with serialized read-modify-write cycles.
//! - `contacts`: the contact store and the request-side contact service.
//! - `auth`: signup/login/logout and bearer-token verification.
//! - `avatars`: avatar upload validation and placement.

pub mod errors;
pub mod storage;
pub mod contacts;
pub mod auth;
pub mod avatars;
