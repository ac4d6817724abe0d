//! Screen subscriptions: least-loaded offering, claims and payment state.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{Assignment, ScreenChanges, ScreenPatch};
pub use repository::ScreenRepository;
pub use service::ScreenService;
