//! Streaming service catalog (Netflix, Disney+, ...).

pub mod repository;
pub mod service;

pub use repository::CatalogRepository;
pub use service::CatalogService;
