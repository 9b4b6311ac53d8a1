//! Service layer providing the drink catalog operations and bearer-token
//! verification on top of `models`.
//! - Separates business logic from data access (`DrinkRepository`).
//! - Keeps token verification independent of the web framework.

pub mod errors;
pub mod auth;
pub mod db;
pub mod drink;
#[cfg(any(test, feature = "test-util"))]
pub mod test_support;
