//! Users: registration, login and profile management.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{AuthSession, LoginInput, NewUser, RegisterInput, User, UserPatch};
pub use repository::UserRepository;
pub use service::UserService;
