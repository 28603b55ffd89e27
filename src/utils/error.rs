//! Error handling for TexDown conversions
//!
//! The core has exactly one failure mode (removing a package that was never
//! included). The remaining variants belong to the CLI and configuration
//! layers that wrap the core.

use std::fmt;

/// Conversion error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// `[uninclude: …]` / `[remove: …]` named a package that is not in the set
    PackageNotIncluded { package: String },
    /// Options could not be loaded or are inconsistent
    InvalidOptions { message: String },
    /// IO error (for file operations)
    IoError { message: String },
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::PackageNotIncluded { package } => {
                write!(
                    f,
                    "Could not remove package '{}', because it is not included",
                    package
                )
            }
            ConversionError::InvalidOptions { message } => {
                write!(f, "Invalid options: {}", message)
            }
            ConversionError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConversionError {}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConversionError {
    fn from(err: serde_json::Error) -> Self {
        ConversionError::InvalidOptions {
            message: err.to_string(),
        }
    }
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

// Convenience constructors for errors
impl ConversionError {
    pub fn package_not_included(package: impl Into<String>) -> Self {
        ConversionError::PackageNotIncluded {
            package: package.into(),
        }
    }

    pub fn invalid_options(message: impl Into<String>) -> Self {
        ConversionError::InvalidOptions {
            message: message.into(),
        }
    }
}
