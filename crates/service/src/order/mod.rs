//! Orders: domain model, repository abstraction and use-case service.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{NewOrder, Order, OrderPatch};
pub use repository::OrderRepository;
pub use service::OrderService;
