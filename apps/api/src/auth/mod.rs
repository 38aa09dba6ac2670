//! Request identity.
//!
//! - [`jwt`] -- HS256 access-token claims and validation.
//! - [`session`] -- `AuthUser` / `Session` extractors handed to handlers explicitly.

pub mod jwt;
pub mod session;

pub use session::{AuthUser, Session};
