//! Streaming accounts, scoped to their owner unless the caller is an admin.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::AccountChanges;
pub use repository::AccountRepository;
pub use service::AccountService;
