//! Read-back of global string constants.
//!
//! LLVM stores a byte string initializer either as a `ConstantDataArray` or,
//! when every byte is zero (the empty string, for one), folds it into a
//! `zeroinitializer`. Both come back as the same bytes here.

use std::slice;

use inkwell::llvm_sys::core::{
    LLVMGetAsString, LLVMIsAConstantAggregateZero, LLVMIsAConstantDataSequential,
};
use inkwell::module::{Linkage, Module};
use inkwell::types::BasicTypeEnum;
use inkwell::values::{AsValueRef, BasicValueEnum, GlobalValue, UnnamedAddress};

/// Summary of a global string constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalStringInfo {
    /// Symbol name, empty for an anonymous global.
    pub name: String,
    /// Initializer bytes, terminator included.
    pub bytes: Vec<u8>,
    /// Whether the global is marked `constant`.
    pub is_constant: bool,
    /// Linkage of the global.
    pub linkage: Linkage,
    /// `unnamed_addr` kind of the global.
    pub unnamed_address: UnnamedAddress,
    /// Alignment in bytes, 0 when unspecified.
    pub alignment: u32,
}

impl GlobalStringInfo {
    /// Describe `global`, or `None` if it does not hold a byte string.
    pub fn of(global: GlobalValue<'_>) -> Option<Self> {
        let bytes = initializer_bytes(global)?;
        Some(Self {
            name: global.get_name().to_string_lossy().into_owned(),
            bytes,
            is_constant: global.is_constant(),
            linkage: global.get_linkage(),
            unnamed_address: global.get_unnamed_address(),
            alignment: global.get_alignment(),
        })
    }

    /// The payload without its trailing terminator.
    pub fn payload(&self) -> &[u8] {
        self.bytes.strip_suffix(&[0]).unwrap_or(&self.bytes)
    }
}

/// The full initializer of a byte string global, terminator included.
///
/// Returns `None` when the global has no initializer or the initializer is
/// not an array of `i8`.
pub fn initializer_bytes(global: GlobalValue<'_>) -> Option<Vec<u8>> {
    let BasicValueEnum::ArrayValue(array) = global.get_initializer()? else {
        return None;
    };
    let array_type = array.get_type();
    match array_type.get_element_type() {
        BasicTypeEnum::IntType(int_type) if int_type.get_bit_width() == 8 => {}
        _ => return None,
    }

    let raw = array.as_value_ref();
    unsafe {
        if !LLVMIsAConstantAggregateZero(raw).is_null() {
            return Some(vec![0; array_type.len() as usize]);
        }
        if LLVMIsAConstantDataSequential(raw).is_null() {
            return None;
        }

        let mut len = 0usize;
        let data = LLVMGetAsString(raw, &mut len);
        if data.is_null() {
            return None;
        }
        Some(slice::from_raw_parts(data.cast::<u8>(), len).to_vec())
    }
}

/// The initializer of a byte string global with one trailing terminator
/// removed.
///
/// Assumes the global was built with a terminator; a payload built without
/// one that happens to end in `\0` loses that byte.
pub fn payload_bytes(global: GlobalValue<'_>) -> Option<Vec<u8>> {
    let mut bytes = initializer_bytes(global)?;
    if bytes.last() == Some(&0) {
        bytes.pop();
    }
    Some(bytes)
}

/// Look up a global string by symbol name.
pub fn find_global_string(module: &Module<'_>, name: &str) -> Option<GlobalStringInfo> {
    module.get_global(name).and_then(GlobalStringInfo::of)
}

/// Every byte string global in `module`, in definition order.
pub fn global_strings(module: &Module<'_>) -> Vec<GlobalStringInfo> {
    module.get_globals().filter_map(GlobalStringInfo::of).collect()
}
