//! # FFI Exports
//!
//! C-compatible entry point for front ends that drive LLVM through its C API
//! and need a global string in a module other than the builder's current
//! one. The prototype is in `include/globstr.h`.
//!
//! Build as a staticlib or cdylib and link with `-lglobstr`.

use std::ffi::{c_char, CStr};
use std::ptr;

use inkwell::llvm_sys::prelude::{LLVMBuilderRef, LLVMModuleRef, LLVMValueRef};
use inkwell::values::AsValueRef;
use tracing::error;

use crate::config::GlobalStringConfig;
use crate::global;
use crate::handle::{self, RawBuilder, RawModule};

/// Create a private, constant, NUL-terminated global string in `module` and
/// return the global (a pointer-typed constant).
///
/// `builder` does not need an insertion point. A null `name` creates an
/// anonymous global. Returns null when `builder`, `module` or `str` is null,
/// or when `builder` is positioned in a block of another context.
///
/// # Safety
///
/// Non-null handles must be live objects from the LLVM C API. `str` and a
/// non-null `name` must point to NUL-terminated byte sequences. The caller
/// must not mutate `module` concurrently from another thread.
#[no_mangle]
pub unsafe extern "C" fn LLVMBuildGlobalStringWithModule(
    builder: LLVMBuilderRef,
    module: LLVMModuleRef,
    str: *const c_char,
    name: *const c_char,
) -> LLVMValueRef {
    let (Some(builder), Some(module)) = (RawBuilder::from_raw(builder), RawModule::from_raw(module))
    else {
        error!("LLVMBuildGlobalStringWithModule called with a null builder or module");
        return ptr::null_mut();
    };

    if str.is_null() {
        error!("LLVMBuildGlobalStringWithModule called with a null string");
        return ptr::null_mut();
    }

    let bytes = CStr::from_ptr(str).to_bytes();
    let name = if name.is_null() {
        <&CStr>::default()
    } else {
        CStr::from_ptr(name)
    };

    let result = handle::target_context(builder, module).and_then(|context| {
        // SAFETY: `module` is a live handle from the caller and `context` is
        // the context that owns it.
        unsafe {
            global::add_global_string(module, context, bytes, name, &GlobalStringConfig::default())
        }
    });

    match result {
        Ok(global) => global.as_value_ref(),
        Err(err) => {
            error!(%err, name = %name.to_string_lossy(), "global string rejected");
            ptr::null_mut()
        }
    }
}
