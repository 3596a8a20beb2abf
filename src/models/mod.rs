//! Data models: the domain user and its persisted document.

pub mod document;
pub mod user;

pub use document::*;
pub use user::*;
