//! # atelier-core
//!
//! Core types, traits, and abstractions for atelier.
//!
//! This crate provides the domain models, repository traits, and the error
//! taxonomy that the other atelier crates depend on.

pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
