//! Integration tests for global string construction.
//!
//! These exercise the Rust API and the C entry point against real LLVM
//! modules and read the results back through `inspect`.

use std::ptr;
use std::sync::Once;

use globstr::ffi::LLVMBuildGlobalStringWithModule;
use globstr::inspect::{self, find_global_string, global_strings};
use globstr::{GlobalStringBuilder, GlobalStringError};
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::types::BasicTypeEnum;
use inkwell::values::{AsValueRef, BasicValueEnum, FunctionValue};
use inkwell::AddressSpace;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Position `builder` at the end of a fresh `void f()` in `module`.
fn position_in_function<'ctx>(
    context: &'ctx Context,
    module: &Module<'ctx>,
    builder: &Builder<'ctx>,
) -> FunctionValue<'ctx> {
    let fn_type = context.void_type().fn_type(&[], false);
    let function = module.add_function("f", fn_type, None);
    let entry = context.append_basic_block(function, "entry");
    builder.position_at_end(entry);
    function
}

#[test]
fn test_hello_in_empty_module() {
    init_tracing();
    let context = Context::create();
    let module = context.create_module("m");
    let builder = context.create_builder();

    let global = builder.build_global_string_in(&module, b"hello", "g1").unwrap();

    assert_eq!(module.get_globals().count(), 1);
    assert_eq!(global.get_name().to_str().unwrap(), "g1");

    let Some(BasicValueEnum::ArrayValue(initializer)) = global.get_initializer() else {
        panic!("expected an array initializer");
    };
    assert_eq!(initializer.get_type().len(), 6);
    assert!(matches!(
        initializer.get_type().get_element_type(),
        BasicTypeEnum::IntType(t) if t.get_bit_width() == 8
    ));
    assert_eq!(
        global.as_pointer_value().get_type().get_address_space(),
        AddressSpace::default()
    );
    assert_eq!(inspect::initializer_bytes(global).unwrap(), b"hello\0");
}

#[test]
fn test_empty_string_is_a_single_terminator() {
    init_tracing();
    let context = Context::create();
    let module = context.create_module("m");
    let builder = context.create_builder();

    let global = builder.build_global_string_in(&module, b"", "g2").unwrap();

    assert_eq!(module.get_globals().count(), 1);
    assert_eq!(inspect::initializer_bytes(global).unwrap(), vec![0]);
    assert_eq!(inspect::payload_bytes(global).unwrap(), Vec::<u8>::new());
}

#[test]
fn test_repeated_call_creates_distinct_globals() {
    init_tracing();
    let context = Context::create();
    let module = context.create_module("m");
    let builder = context.create_builder();

    let first = builder.build_global_string_in(&module, b"dup", "g1").unwrap();
    let second = builder.build_global_string_in(&module, b"dup", "g1").unwrap();

    assert_ne!(first, second);
    assert_eq!(module.get_globals().count(), 2);

    let first_name = first.get_name().to_str().unwrap();
    let second_name = second.get_name().to_str().unwrap();
    assert_eq!(first_name, "g1");
    assert_ne!(second_name, "g1");
    assert!(second_name.starts_with("g1"));

    assert_eq!(inspect::initializer_bytes(first), inspect::initializer_bytes(second));
}

#[test]
fn test_payload_is_opaque_bytes() {
    let context = Context::create();
    let module = context.create_module("m");
    let builder = context.create_builder();
    let payload = [0xff, 0x00, 0x80, b'a', 0xc3];

    let global = builder.build_global_string_in(&module, &payload, "bin").unwrap();

    let mut expected = payload.to_vec();
    expected.push(0);
    assert_eq!(inspect::initializer_bytes(global).unwrap(), expected);
    assert_eq!(inspect::payload_bytes(global).unwrap(), payload);
}

#[test]
fn test_unpositioned_builder_and_untouched_insertion_point() {
    let context = Context::create();
    let module = context.create_module("m");
    let builder = context.create_builder();

    assert!(builder.get_insert_block().is_none());
    builder.build_global_string_in(&module, b"early", "early").unwrap();
    assert!(builder.get_insert_block().is_none());

    let function = position_in_function(&context, &module, &builder);
    let entry = function.get_first_basic_block();
    builder.build_global_string_in(&module, b"late", "late").unwrap();
    assert_eq!(builder.get_insert_block(), entry);
}

#[test]
fn test_pointer_is_usable_in_instructions() {
    let context = Context::create();
    let module = context.create_module("m");
    let builder = context.create_builder();

    let ptr_type = context.ptr_type(AddressSpace::default());
    let puts_type = context.i32_type().fn_type(&[ptr_type.into()], false);
    let puts = module.add_function("puts", puts_type, None);

    let main_type = context.i32_type().fn_type(&[], false);
    let main = module.add_function("main", main_type, None);

    // The string goes in before the builder has anywhere to insert.
    let message = builder.build_global_string_ptr_in(&module, b"hi", "msg").unwrap();

    let entry = context.append_basic_block(main, "entry");
    builder.position_at_end(entry);
    builder.build_call(puts, &[message.into()], "call").unwrap();
    builder
        .build_return(Some(&context.i32_type().const_zero()))
        .unwrap();

    assert!(module.verify().is_ok(), "{}", module.print_to_string().to_string());
    let ir = module.print_to_string().to_string();
    assert!(ir.contains("@msg = private unnamed_addr constant [3 x i8] c\"hi\\00\", align 1"));
}

#[test]
fn test_interior_nul_in_name_is_rejected() {
    let context = Context::create();
    let module = context.create_module("m");
    let builder = context.create_builder();

    let result = builder.build_global_string_in(&module, b"x", "a\0b");

    assert_eq!(result, Err(GlobalStringError::InteriorNul { offset: 1 }));
    assert_eq!(module.get_globals().count(), 0);
}

#[test]
fn test_context_mismatch_is_rejected_when_positioned() {
    init_tracing();
    let context_a = Context::create();
    let context_b = Context::create();
    let module_a = context_a.create_module("a");
    let module_b = context_b.create_module("b");
    let builder_b = context_b.create_builder();
    position_in_function(&context_b, &module_b, &builder_b);

    let result = builder_b.build_global_string_in(&module_a, b"x", "g");
    assert_eq!(result, Err(GlobalStringError::ContextMismatch));
    assert_eq!(module_a.get_globals().count(), 0);

    let value = unsafe {
        LLVMBuildGlobalStringWithModule(
            builder_b.as_mut_ptr(),
            module_a.as_mut_ptr(),
            c"x".as_ptr(),
            c"g".as_ptr(),
        )
    };
    assert!(value.is_null());
    assert_eq!(module_a.get_globals().count(), 0);
}

#[test]
fn test_unpositioned_foreign_builder_uses_module_context() {
    let context_a = Context::create();
    let context_b = Context::create();
    let module_a = context_a.create_module("a");
    let builder_b = context_b.create_builder();

    let global = builder_b.build_global_string_in(&module_a, b"ok", "g").unwrap();

    assert_eq!(module_a.get_global("g"), Some(global));
    assert!(module_a.verify().is_ok());
}

#[test]
fn test_c_entry_point_matches_rust_api() {
    init_tracing();
    let context = Context::create();
    let module = context.create_module("m");
    let builder = context.create_builder();

    let value = unsafe {
        LLVMBuildGlobalStringWithModule(
            builder.as_mut_ptr(),
            module.as_mut_ptr(),
            c"from c".as_ptr(),
            c"c_str".as_ptr(),
        )
    };
    builder.build_global_string_in(&module, b"from c", "rust_str").unwrap();

    let from_c = find_global_string(&module, "c_str").unwrap();
    let from_rust = find_global_string(&module, "rust_str").unwrap();
    assert_eq!(module.get_global("c_str").unwrap().as_value_ref(), value);
    assert_eq!(from_c.bytes, from_rust.bytes);
    assert_eq!(from_c.linkage, from_rust.linkage);
    assert_eq!(from_c.unnamed_address, from_rust.unnamed_address);
    assert_eq!(from_c.alignment, from_rust.alignment);
    assert_eq!(from_c.is_constant, from_rust.is_constant);
}

#[test]
fn test_c_entry_point_null_string() {
    let context = Context::create();
    let module = context.create_module("m");
    let builder = context.create_builder();

    let value = unsafe {
        LLVMBuildGlobalStringWithModule(
            builder.as_mut_ptr(),
            module.as_mut_ptr(),
            ptr::null(),
            c"g".as_ptr(),
        )
    };
    assert!(value.is_null());
    assert!(global_strings(&module).is_empty());
}

#[test]
fn test_literal_round_trip() {
    let context = Context::create();
    let module = context.create_module("m");
    let builder = context.create_builder();

    builder
        .build_global_string_literal_in(&module, r#"say \"hi\"\n\u{2764}"#, "lit")
        .unwrap();

    let info = find_global_string(&module, "lit").unwrap();
    assert_eq!(info.payload(), "say \"hi\"\n❤".as_bytes());
}
