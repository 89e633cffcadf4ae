//! Product catalog application library.
//!
//! Holds the application modules and the bootstrap shared by the server
//! binary, the CLI and the integration tests.

pub mod bootstrap;
pub mod modules;

/// Re-export commonly used types
pub use modules::*;
