//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and token decoding live here, independent of the web framework.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;

pub use service::AuthService;
