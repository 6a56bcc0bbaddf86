//! SeaORM entities and connection-pool construction.
//!
//! Entities are plain table mappings; business rules live in the `service` crate.

pub mod errors;
pub mod db;
pub mod order;
pub mod user;

#[cfg(test)]
mod tests;
