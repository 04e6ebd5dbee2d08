//! Domain types for Veil.
//!
//! This module contains the error hierarchy and the crate-wide [`Result`]
//! alias. Data models specific to anonymization live in
//! [`crate::anonymization::models`]; this layer only defines what every
//! other module needs to report failures.
//!
//! # Error Handling
//!
//! All fallible operations outside of the anonymization internals return
//! [`Result<T, VeilError>`]:
//!
//! ```rust
//! use veil::domain::{Result, VeilError};
//!
//! fn example() -> Result<()> {
//!     let config = veil::config::load_config("veil.toml")?;
//!     let _ = config;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{LlmError, VeilError};
pub use result::Result;
