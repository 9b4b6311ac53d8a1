use std::sync::Arc;

use service::{auth::TokenVerifier, drink::DrinkService};

/// Per-request context: the drink catalog and the token verifier.
#[derive(Clone)]
pub struct AppState {
    pub drinks: DrinkService,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(drinks: DrinkService, verifier: Arc<TokenVerifier>) -> Self {
        Self { drinks, verifier }
    }
}
