//! Persistence models: the `drink` entity, its recipe payload and the
//! connection/schema helpers used at startup and in tests.

pub mod errors;
pub mod db;
pub mod drink;
