//! Storage abstractions for service layer
//!
//! Contains the reusable file-backed list store shared by the contact store
//! and the user repository, plus its error type.

pub mod errors;
pub mod json_list_store;

pub use errors::StoreError;
pub use json_list_store::JsonListStore;
