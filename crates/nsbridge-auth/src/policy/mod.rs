//! Outcome policy.
//!
//! Turns a SuiteQL result into the caller-visible result of an invocation.
//!
//! ## Lookup
//!
//! | SuiteQL result | Outcome |
//! |----------------|---------|
//! | no rows | no profile |
//! | first row with id and email | `{user_id: id, email}` |
//! | first row missing id (or email with empty input) | no profile |
//!
//! ## Login
//!
//! Login never yields a session. A contact that does not exist is rejected
//! with a generic invalid-credentials message; a contact that exists gets a
//! password-reset email and is rejected with a reset-required message. The
//! lookup path has no such ambiguity requirement and reports "not found"
//! directly.

pub mod decision;
pub mod outcome;

pub use decision::{LoginDecision, login_decision, lookup_profile};
pub use outcome::{IdentityProfile, Outcome};
