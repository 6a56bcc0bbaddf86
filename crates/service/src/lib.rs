//! Service layer: business rules on top of repository abstractions.
//! - `order` and `user` each expose a domain model, a repository trait with
//!   SeaORM and in-memory implementations, and a use-case service.
//! - `auth` holds the password hashing and token primitives used by `user`.
//! - `errors` is the error taxonomy shared by every transport.

pub mod errors;
pub mod auth;
pub mod order;
pub mod user;
#[cfg(test)]
pub mod test_support;

pub use errors::{ErrorKind, ServiceError};
