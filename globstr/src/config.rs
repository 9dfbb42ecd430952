//! Global String Configuration
//!
//! Attributes given to every global string constant. The defaults match
//! LLVM's `IRBuilder::CreateGlobalString`, and they are what the C entry
//! point always uses; Rust callers may pick other attributes through the
//! builder.
//!
//! # Environment Variables
//!
//! All environment variables use the `GLOBSTR_` prefix:
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GLOBSTR_LINKAGE` | private/internal/external/linkonce_odr/weak_odr | private |
//! | `GLOBSTR_UNNAMED_ADDR` | none/local/global | global |
//! | `GLOBSTR_ALIGNMENT` | Alignment in bytes (power of two) | 1 |
//! | `GLOBSTR_ADDRESS_SPACE` | Target address space | 0 |
//! | `GLOBSTR_NULL_TERMINATE` | Append a terminator byte ("true"/"false") | true |
//!
//! # Example
//!
//! ```rust
//! use globstr::config::GlobalStringConfig;
//! use inkwell::module::Linkage;
//!
//! let config = GlobalStringConfig::builder()
//!     .linkage(Linkage::Internal)
//!     .alignment(8)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.alignment, 8);
//! ```

use std::env;

use inkwell::module::Linkage;
use inkwell::values::UnnamedAddress;

use crate::error::ConfigError;

/// Attributes of a generated global string constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalStringConfig {
    /// Linkage of the global.
    pub linkage: Linkage,
    /// Whether the address of the global is significant.
    pub unnamed_address: UnnamedAddress,
    /// Alignment in bytes.
    pub alignment: u32,
    /// Address space the global lives in.
    pub address_space: u16,
    /// Append one NUL terminator to the payload.
    pub null_terminate: bool,
}

impl Default for GlobalStringConfig {
    fn default() -> Self {
        Self {
            linkage: Linkage::Private,
            unnamed_address: UnnamedAddress::Global,
            alignment: 1,
            address_space: 0,
            null_terminate: true,
        }
    }
}

impl GlobalStringConfig {
    /// Create a builder starting from the defaults.
    pub fn builder() -> GlobalStringConfigBuilder {
        GlobalStringConfigBuilder::new()
    }

    /// Load configuration from environment variables.
    ///
    /// Unset, unparsable or invalid values keep their defaults. Nothing in
    /// this crate calls this; a caller opts in by passing the result to
    /// [`GlobalStringBuilder::build_global_string_in_with`]. The C entry
    /// point always uses [`GlobalStringConfig::default`].
    ///
    /// [`GlobalStringBuilder::build_global_string_in_with`]: crate::GlobalStringBuilder::build_global_string_in_with
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(linkage) = env::var("GLOBSTR_LINKAGE").ok().and_then(|s| parse_linkage(&s)) {
            config.linkage = linkage;
        }

        if let Some(unnamed) = env::var("GLOBSTR_UNNAMED_ADDR")
            .ok()
            .and_then(|s| parse_unnamed_address(&s))
        {
            config.unnamed_address = unnamed;
        }

        if let Some(val) = parse_env_u32("GLOBSTR_ALIGNMENT") {
            if val.is_power_of_two() {
                config.alignment = val;
            }
        }

        if let Some(val) = env::var("GLOBSTR_ADDRESS_SPACE").ok().and_then(|s| s.parse().ok()) {
            config.address_space = val;
        }

        if let Some(val) = parse_env_bool("GLOBSTR_NULL_TERMINATE") {
            config.null_terminate = val;
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.alignment.is_power_of_two() {
            return Err(ConfigError::InvalidValue {
                field: "alignment".into(),
                message: format!("must be a non-zero power of two, got {}", self.alignment),
            });
        }

        Ok(())
    }
}

/// Builder for [`GlobalStringConfig`].
#[derive(Debug, Default)]
pub struct GlobalStringConfigBuilder {
    config: GlobalStringConfig,
}

impl GlobalStringConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the linkage.
    pub fn linkage(mut self, linkage: Linkage) -> Self {
        self.config.linkage = linkage;
        self
    }

    /// Set the `unnamed_addr` kind.
    pub fn unnamed_address(mut self, unnamed: UnnamedAddress) -> Self {
        self.config.unnamed_address = unnamed;
        self
    }

    /// Set the alignment in bytes.
    pub fn alignment(mut self, alignment: u32) -> Self {
        self.config.alignment = alignment;
        self
    }

    /// Set the address space.
    pub fn address_space(mut self, address_space: u16) -> Self {
        self.config.address_space = address_space;
        self
    }

    /// Append (or not) a NUL terminator to every payload.
    pub fn null_terminate(mut self, enabled: bool) -> Self {
        self.config.null_terminate = enabled;
        self
    }

    /// Build the configuration, validating it first.
    pub fn build(self) -> Result<GlobalStringConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Parse a linkage name as spelled in textual IR.
pub fn parse_linkage(s: &str) -> Option<Linkage> {
    match s.trim().to_lowercase().as_str() {
        "private" => Some(Linkage::Private),
        "internal" => Some(Linkage::Internal),
        "external" => Some(Linkage::External),
        "linkonce_odr" => Some(Linkage::LinkOnceODR),
        "weak_odr" => Some(Linkage::WeakODR),
        _ => None,
    }
}

/// Parse an `unnamed_addr` kind.
pub fn parse_unnamed_address(s: &str) -> Option<UnnamedAddress> {
    match s.trim().to_lowercase().as_str() {
        "none" | "off" => Some(UnnamedAddress::None),
        "local" | "local_unnamed_addr" => Some(UnnamedAddress::Local),
        "global" | "unnamed_addr" => Some(UnnamedAddress::Global),
        _ => None,
    }
}

fn parse_env_u32(name: &str) -> Option<u32> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn parse_env_bool(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|s| match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    })
}
