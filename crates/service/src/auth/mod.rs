//! Bearer-token verification against the identity provider's published keys.
//!
//! - `claims`: decoded token payload and scope checks
//! - `jwks`: key-set sources (remote JWKS with caching, static set for tests)
//! - `verifier`: header parsing, signature and claim validation

pub mod claims;
pub mod errors;
pub mod jwks;
pub mod verifier;

pub use claims::Claims;
pub use errors::AuthError;
pub use verifier::TokenVerifier;
