//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Signup, login, logout and bearer-token verification over a `UserRepository`.

pub mod domain;
pub mod errors;
pub mod gravatar;
pub mod repository;
pub mod repo;
pub mod service;
pub mod token;

pub use service::AuthService;
