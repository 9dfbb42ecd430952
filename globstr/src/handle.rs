//! Opaque handle boundary.
//!
//! LLVM's C API passes builders, modules and contexts around as untyped
//! pointers. Those pointers are turned into the newtypes below as soon as they
//! enter the crate and turned back only when a result leaves it; nothing past
//! this module touches a raw `LLVM*Ref`.

use std::ptr::NonNull;

use inkwell::builder::Builder;
use inkwell::llvm_sys::core::{
    LLVMBasicBlockAsValue, LLVMGetInsertBlock, LLVMGetModuleContext, LLVMGetTypeContext,
    LLVMTypeOf,
};
use inkwell::llvm_sys::prelude::{LLVMBuilderRef, LLVMContextRef, LLVMModuleRef};
use inkwell::llvm_sys::{LLVMBuilder, LLVMContext, LLVMModule};
use inkwell::module::Module;

use crate::error::GlobalStringError;

/// A live, non-null IR builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawBuilder(NonNull<LLVMBuilder>);

/// A live, non-null module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawModule(NonNull<LLVMModule>);

/// A live, non-null context. Equality is identity of the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawContext(NonNull<LLVMContext>);

impl RawBuilder {
    /// Unwrap a C API builder handle. Returns `None` for a null handle.
    ///
    /// # Safety
    ///
    /// A non-null `raw` must point to a builder that stays alive for as long
    /// as the returned value is used.
    pub(crate) unsafe fn from_raw(raw: LLVMBuilderRef) -> Option<Self> {
        NonNull::new(raw).map(Self)
    }

    pub(crate) fn as_raw(self) -> LLVMBuilderRef {
        self.0.as_ptr()
    }

    /// Context of the block the builder is positioned in.
    ///
    /// A builder that was never positioned carries no block and therefore no
    /// observable context.
    pub(crate) fn context(self) -> Option<RawContext> {
        unsafe {
            let block = LLVMGetInsertBlock(self.as_raw());
            if block.is_null() {
                return None;
            }
            let label_type = LLVMTypeOf(LLVMBasicBlockAsValue(block));
            RawContext::from_raw(LLVMGetTypeContext(label_type))
        }
    }
}

impl RawModule {
    /// Unwrap a C API module handle. Returns `None` for a null handle.
    ///
    /// # Safety
    ///
    /// A non-null `raw` must point to a module that stays alive for as long
    /// as the returned value is used.
    pub(crate) unsafe fn from_raw(raw: LLVMModuleRef) -> Option<Self> {
        NonNull::new(raw).map(Self)
    }

    pub(crate) fn as_raw(self) -> LLVMModuleRef {
        self.0.as_ptr()
    }

    /// The context that owns this module.
    pub(crate) fn context(self) -> Option<RawContext> {
        unsafe { RawContext::from_raw(LLVMGetModuleContext(self.as_raw())) }
    }
}

impl RawContext {
    /// # Safety
    ///
    /// A non-null `raw` must point to a live context.
    pub(crate) unsafe fn from_raw(raw: LLVMContextRef) -> Option<Self> {
        NonNull::new(raw).map(Self)
    }

    pub(crate) fn as_raw(self) -> LLVMContextRef {
        self.0.as_ptr()
    }
}

impl<'ctx> From<&Builder<'ctx>> for RawBuilder {
    fn from(builder: &Builder<'ctx>) -> Self {
        // SAFETY: inkwell only constructs a `Builder` around a non-null
        // pointer, and the borrow keeps it alive.
        Self(unsafe { NonNull::new_unchecked(builder.as_mut_ptr()) })
    }
}

impl<'ctx> From<&Module<'ctx>> for RawModule {
    fn from(module: &Module<'ctx>) -> Self {
        // SAFETY: as above, for `Module`.
        Self(unsafe { NonNull::new_unchecked(module.as_mut_ptr()) })
    }
}

/// Resolve the context a new global must be created in.
///
/// The module's context is authoritative. A builder positioned in a block of
/// another context cannot legally be mixed with this module and is rejected.
pub(crate) fn target_context(
    builder: RawBuilder,
    module: RawModule,
) -> Result<RawContext, GlobalStringError> {
    let module_context = module.context().ok_or(GlobalStringError::ContextMismatch)?;

    match builder.context() {
        Some(builder_context) if builder_context != module_context => {
            Err(GlobalStringError::ContextMismatch)
        }
        _ => Ok(module_context),
    }
}
