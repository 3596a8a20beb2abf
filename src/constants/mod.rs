//! Crate constants.
//!
//! Collection and field names, error messages and error codes live here so the
//! repository, the stores and the tests agree on the exact strings.

pub mod collections;
pub mod error_codes;
pub mod errors;
pub mod fields;

pub use collections::*;
pub use error_codes::*;
pub use errors::*;
pub use fields::*;
