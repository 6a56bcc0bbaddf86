//! Credential primitives: password hashing and bearer-token signing.
//!
//! Both types are read-only after construction and shared across requests.

pub mod password;
pub mod token;

pub use password::{HashCost, PasswordHasher};
pub use token::{Claims, TokenKeys};
