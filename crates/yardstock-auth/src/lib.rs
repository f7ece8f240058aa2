//! # yardstock-auth
//!
//! Identity, session, and permission resolution for the Yardstock
//! inventory platform.
//!
//! ## Modules
//!
//! - `password` — Argon2id hashing and password policy
//! - `jwt` — HS256 bearer token claims, encoding, and decoding
//! - `rbac` — the immutable role table and the permission resolver
//! - `tenant` — per-request tenant access resolution
//! - `session` — session creation, validation, refresh rotation, and cleanup
//! - `service` — the `AuthenticationService` façade used by the HTTP layer

pub mod error;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod service;
pub mod session;
pub mod tenant;

pub use error::{AuthError, AuthResult};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{CustomerScope, PermissionResolver, PermissionTable};
pub use service::{AuthenticationService, LoginRequest, LoginResponse, NewUser};
pub use session::{AuthContext, ClientInfo, IssuedSession, SessionCleanup, SessionManager};
pub use tenant::{AccessSource, ResolvedTenant, TenantAccessResolver};
