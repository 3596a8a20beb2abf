//! Error code constants attached to repository errors.
//!
//! These codes give callers a machine-readable identifier next to the
//! human-readable message.

pub const CODE_USER_NOT_FOUND: &str = "USER_NOT_FOUND";
