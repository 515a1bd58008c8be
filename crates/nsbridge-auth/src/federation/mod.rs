//! External identity provider integration.
//!
//! The identity provider owns end-user credentials; this crate only asks it to
//! send password-reset emails for contacts found in NetSuite.

pub mod password_reset;

pub use password_reset::{ChangePasswordRequest, PasswordResetClient};
