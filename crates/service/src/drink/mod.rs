//! Drink catalog: repository abstraction (SeaORM + in-memory) and the
//! application service the HTTP layer talks to.

pub mod repository;
pub mod service;

pub use repository::{DrinkRepository, SeaOrmDrinkRepository};
pub use service::DrinkService;
