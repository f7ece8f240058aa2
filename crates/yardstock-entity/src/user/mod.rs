//! User domain entities.

pub mod contact;
pub mod model;
pub mod role;

pub use contact::ContactType;
pub use model::{CreateUser, User};
pub use role::UserRole;
