//! Repository implementations: Postgres through SeaORM, and an in-process
//! store for tests and database-free runs.

pub mod memory;
pub mod seaorm;

pub use memory::MemoryStore;
pub use seaorm::SeaOrmStore;
