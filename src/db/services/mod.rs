//! The `services` module provides a high-level API over the database.
//!
//! `HaremService` and `ProspectService` own the ranked-list rules and hold
//! the connection they are built with; `user_service` is a set of plain
//! lookups used by authentication.

pub mod error;
pub mod harem_service;
pub mod prospect_service;
pub mod ranking;
pub mod user_service;

pub use error::ServiceError;
pub use harem_service::HaremService;
pub use prospect_service::ProspectService;
pub use user_service::*;
