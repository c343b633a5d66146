//! Authentication and authorization
//!
//! - [`JwtService`] - token issuing and validation
//! - [`AuthContext`] - per-request caller identity, possibly empty
//! - [`ensure_owner`] - the single ownership predicate for sellers
//!
//! A missing or invalid bearer token never rejects a request up front.
//! It produces an empty [`AuthContext`], and the first operation that
//! actually needs an identity fails with `NotAuthenticated`.

pub mod context;
pub mod jwt;
pub mod ownership;

pub use context::AuthContext;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use ownership::{ensure_owner, is_owner};
