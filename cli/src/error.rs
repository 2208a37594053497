#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use cms_openapi_core::AppError;
use derive_more::{Display, From};

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Failure raised while generating the document.
    #[display("{}", _0)]
    Core(AppError),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// `General(String)` has no error source, so the trait is implemented by hand.
impl std::error::Error for CliError {}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Core(AppError::Json(err))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Core(AppError::Yaml(err))
    }
}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
