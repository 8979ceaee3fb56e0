//! Concrete `UserRepository` implementations.

pub mod file;

pub use file::FileUserRepository;
