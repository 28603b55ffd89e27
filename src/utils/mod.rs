//! Utility modules
//!
//! This module contains the pieces shared by the library, the CLI and the
//! WASM bindings:
//! - Error types and result types
//! - Conversion options

pub mod error;
pub mod options;

// Re-export commonly used items
pub use error::{ConversionError, ConversionResult};
pub use options::{PackageSpec, TexDownOptions};
