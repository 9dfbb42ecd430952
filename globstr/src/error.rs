//! Error types for global string construction.
//!
//! The C entry point reports failure as a null handle; these types are what
//! the Rust API returns instead.

use thiserror::Error;

use crate::escape::EscapeError;

/// Errors from building a global string constant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlobalStringError {
    /// The symbol name cannot be passed to LLVM as a C string.
    #[error("symbol name contains an interior NUL byte at offset {offset}")]
    InteriorNul {
        /// Byte offset of the first NUL in the name.
        offset: usize,
    },

    /// The initializer would not fit LLVM's 32-bit array length.
    #[error("string payload of {len} bytes exceeds the maximum of {max} bytes")]
    TooLong {
        /// Payload length in bytes, terminator excluded.
        len: usize,
        /// Largest accepted payload length.
        max: usize,
    },

    /// The builder is positioned in a block owned by another context.
    #[error("builder and module belong to different LLVM contexts")]
    ContextMismatch,

    /// A string literal could not be decoded.
    #[error("invalid string literal: {0}")]
    Escape(#[from] EscapeError),

    /// The attribute configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },
}
