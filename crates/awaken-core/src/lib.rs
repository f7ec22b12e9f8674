//! Awaken Core - data model, log buffer, and error handling

pub mod buffer;
pub mod error;
pub mod types;

pub use buffer::{LogBuffer, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use types::*;
