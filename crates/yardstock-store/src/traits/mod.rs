//! Store traits implemented by persistence backends.

pub mod session;
pub mod user;

pub use session::SessionStore;
pub use user::UserStore;
