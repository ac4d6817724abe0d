//! Service layer for shared streaming accounts.
//! - Every operation takes an explicit [`caller::Caller`] and is checked
//!   against the [`policy`] table before it touches storage.
//! - Persistence sits behind repository traits with SeaORM and in-memory
//!   implementations in [`store`].
//! - Screen offering uses the least-loaded [`selector`]; claims are
//!   compare-and-set.

pub mod errors;
pub mod caller;
pub mod policy;
pub mod selector;
pub mod catalog;
pub mod accounts;
pub mod screens;
pub mod auth;
pub mod db;
pub mod store;
#[cfg(test)]
pub mod test_support;
