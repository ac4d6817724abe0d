//! SeaORM data access, one module per aggregate. `store::SeaOrmStore`
//! exposes these through the repository traits.

pub mod accounts;
pub mod catalog;
pub mod screens;
pub mod users;
