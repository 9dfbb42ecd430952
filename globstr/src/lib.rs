//! # globstr
//!
//! Global string constants for LLVM modules, built into an explicit target
//! module.
//!
//! LLVM's C API only offers `LLVMBuildGlobalString`, which puts the string into
//! the module that owns the builder's current block. Front ends that emit
//! string tables before any function exists, or that juggle several modules
//! with one builder, need the `IRBuilder::CreateGlobalString` overload that
//! takes the module as an argument. This crate provides it twice:
//!
//! - as the C symbol `LLVMBuildGlobalStringWithModule` (see [`ffi`]), for
//!   front ends that link the `staticlib`/`cdylib` artifact;
//! - as the [`GlobalStringBuilder`] extension trait on inkwell's `Builder`.
//!
//! ## Quick Start
//!
//! ```rust
//! use globstr::GlobalStringBuilder;
//! use inkwell::context::Context;
//!
//! let context = Context::create();
//! let module = context.create_module("strings");
//! let builder = context.create_builder();
//!
//! let global = builder.build_global_string_in(&module, b"hello", "greeting").unwrap();
//! assert_eq!(globstr::inspect::initializer_bytes(global).unwrap(), b"hello\0");
//! ```
//!
//! ## Module Overview
//!
//! - [`global`] - Construction and the [`GlobalStringBuilder`] trait
//! - [`ffi`] - C ABI entry point
//! - [`config`] - Attributes of the generated globals
//! - [`escape`] - String literal escape decoding
//! - [`inspect`] - Reading global strings back out of a module
//! - [`error`] - Error types

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod escape;
pub mod ffi;
pub mod global;
mod handle;
pub mod inspect;

pub use config::{GlobalStringConfig, GlobalStringConfigBuilder};
pub use error::{ConfigError, GlobalStringError};
pub use escape::{unescape, EscapeError};
pub use global::GlobalStringBuilder;
pub use inspect::GlobalStringInfo;
