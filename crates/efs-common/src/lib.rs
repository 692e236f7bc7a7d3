//! Common types and errors shared by the EFS gateway crates.

pub mod error;
pub mod types;

pub use error::{LookupError, LookupResult};
pub use types::*;
