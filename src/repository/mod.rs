//! Repository traits and data types for user accounts.
//!
//! Session storage lives in [`crate::session`]; this module covers the
//! credential side.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`UserRepository`] | user lookup and creation with uniqueness checks |
//! | [`User`] | a stored account |
//! | [`NewUser`] | account fields ready to persist |
//! | [`LoginIdentifier`] | email or nickname used to log in |
//!
//! Enable the `mocks` feature for [`MockUserRepository`].

mod user;

#[cfg(any(test, feature = "mocks"))]
mod user_mock;

pub use user::{LoginIdentifier, NewUser, User, UserRepository};
#[cfg(any(test, feature = "mocks"))]
pub use user_mock::MockUserRepository;
