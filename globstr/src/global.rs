//! Construction of global string constants.
//!
//! LLVM's C API can only create a global string in the module that owns the
//! builder's current block (`LLVMBuildGlobalString`), so a builder that is
//! not positioned anywhere is useless for it. The functions here take the
//! target module explicitly, the way `IRBuilder::CreateGlobalString` does on
//! the C++ side.
//!
//! ```text
//! @name = private unnamed_addr constant [N+1 x i8] c"...\00", align 1
//! ```

use std::ffi::{c_uint, CStr, CString};

use inkwell::builder::Builder;
use inkwell::llvm_sys::core::{
    LLVMAddGlobalInAddressSpace, LLVMConstStringInContext, LLVMSetInitializer, LLVMTypeOf,
};
use inkwell::llvm_sys::prelude::LLVMBool;
use inkwell::module::Module;
use inkwell::values::{GlobalValue, PointerValue};
use tracing::debug;

use crate::config::GlobalStringConfig;
use crate::error::GlobalStringError;
use crate::escape;
use crate::handle::{self, RawBuilder, RawContext, RawModule};

/// Largest payload that still fits LLVM's 32-bit array length.
pub fn max_payload_len(config: &GlobalStringConfig) -> usize {
    c_uint::MAX as usize - usize::from(config.null_terminate)
}

/// Extension trait adding explicit-module global string construction to
/// inkwell's [`Builder`].
///
/// The builder does not need an insertion point, and its insertion point is
/// never moved.
pub trait GlobalStringBuilder<'ctx> {
    /// Create a global string constant in `module` with the default
    /// attributes and return the global.
    fn build_global_string_in(
        &self,
        module: &Module<'ctx>,
        bytes: &[u8],
        name: &str,
    ) -> Result<GlobalValue<'ctx>, GlobalStringError> {
        self.build_global_string_in_with(module, bytes, name, &GlobalStringConfig::default())
    }

    /// Create a global string constant in `module` with the given attributes.
    fn build_global_string_in_with(
        &self,
        module: &Module<'ctx>,
        bytes: &[u8],
        name: &str,
        config: &GlobalStringConfig,
    ) -> Result<GlobalValue<'ctx>, GlobalStringError>;

    /// Like [`build_global_string_in`](Self::build_global_string_in), but
    /// return the address of the global.
    fn build_global_string_ptr_in(
        &self,
        module: &Module<'ctx>,
        bytes: &[u8],
        name: &str,
    ) -> Result<PointerValue<'ctx>, GlobalStringError> {
        self.build_global_string_in(module, bytes, name)
            .map(|global| global.as_pointer_value())
    }

    /// Decode the escapes of a source-level string literal and store the
    /// result as a global string constant.
    fn build_global_string_literal_in(
        &self,
        module: &Module<'ctx>,
        literal: &str,
        name: &str,
    ) -> Result<GlobalValue<'ctx>, GlobalStringError> {
        let bytes = escape::unescape(literal)?;
        self.build_global_string_in(module, &bytes, name)
    }
}

impl<'ctx> GlobalStringBuilder<'ctx> for Builder<'ctx> {
    fn build_global_string_in_with(
        &self,
        module: &Module<'ctx>,
        bytes: &[u8],
        name: &str,
        config: &GlobalStringConfig,
    ) -> Result<GlobalValue<'ctx>, GlobalStringError> {
        config.validate()?;
        let name = symbol_name(name)?;
        let raw_module = RawModule::from(module);
        let context = handle::target_context(RawBuilder::from(self), raw_module)?;

        // SAFETY: `raw_module` comes from a live `Module<'ctx>` and `context`
        // is the context that owns it.
        unsafe { add_global_string(raw_module, context, bytes, &name, config) }
    }
}

/// Convert a symbol name into the C string LLVM expects.
pub(crate) fn symbol_name(name: &str) -> Result<CString, GlobalStringError> {
    CString::new(name).map_err(|err| GlobalStringError::InteriorNul {
        offset: err.nul_position(),
    })
}

/// Append a global string constant to `module`.
///
/// This is the single place that talks to LLVM; both the Rust API and the C
/// entry point end up here.
///
/// # Safety
///
/// `context` must be the context owning `module`, and the returned value must
/// not be used after that context is disposed of.
pub(crate) unsafe fn add_global_string<'ctx>(
    module: RawModule,
    context: RawContext,
    bytes: &[u8],
    name: &CStr,
    config: &GlobalStringConfig,
) -> Result<GlobalValue<'ctx>, GlobalStringError> {
    let max = max_payload_len(config);
    if bytes.len() > max {
        return Err(GlobalStringError::TooLong { len: bytes.len(), max });
    }

    let dont_null_terminate = LLVMBool::from(!config.null_terminate);
    let initializer = LLVMConstStringInContext(
        context.as_raw(),
        bytes.as_ptr().cast(),
        bytes.len() as c_uint,
        dont_null_terminate,
    );
    let raw = LLVMAddGlobalInAddressSpace(
        module.as_raw(),
        LLVMTypeOf(initializer),
        name.as_ptr(),
        c_uint::from(config.address_space),
    );
    LLVMSetInitializer(raw, initializer);

    let global = GlobalValue::new(raw);
    global.set_constant(true);
    global.set_linkage(config.linkage);
    global.set_unnamed_address(config.unnamed_address);
    global.set_alignment(config.alignment);

    let actual = global.get_name();
    if actual != name {
        debug!(
            requested = %name.to_string_lossy(),
            actual = %actual.to_string_lossy(),
            "global string name uniquified"
        );
    }
    debug!(
        name = %actual.to_string_lossy(),
        len = bytes.len(),
        address_space = config.address_space,
        "built global string"
    );

    Ok(global)
}
