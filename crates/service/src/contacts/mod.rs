//! Contacts: the file-backed contact store, the repository seam the HTTP layer
//! talks to, and the service that validates bodies and mints identifiers.

pub mod repository;
pub mod service;
pub mod store;

pub use repository::ContactRepository;
pub use service::ContactService;
pub use store::ContactStore;
