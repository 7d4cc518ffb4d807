// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! A tour of the unittest toolkit: one unit per feature.
//!
//! Try `DEBUG=1 TRACE=1 showcase` for the gated diagnostics.

use std::{fmt, fs, path::Path, process::ExitCode};

use tlogger::{teprintln, tprintln};
use unittest::{
    Benchmark, TestContext, TestRunner, check, check_alloc, check_bounds, check_ptr,
    debug_print, def_test, expect_crash, log_var, random_int, repeat_test, run_test,
    stress_test, test_assert, test_assert_array_eq, test_assert_eq, test_assert_float_eq,
    test_assert_in_range, test_assert_none, test_assert_some, test_assert_str_eq,
    test_buffer_overflow, test_file_exists, test_skip, trace_function, warn_unless,
};

fn multiply(a: i32, b: i32) -> i32 {
    a * b
}

fn pi_approximation() -> f64 {
    3.14159
}

fn copy_array(dest: &mut [i32], src: &[i32]) {
    dest.copy_from_slice(src);
}

fn allocate_buffer(size: usize) -> Option<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(size).ok()?;
    Some(buffer)
}

fn divide(x: i32, y: i32) -> i32 {
    check!(y != 0, "Division by zero");
    x / y
}

fn read_through(ptr: *const u8) -> u8 {
    check_ptr!(ptr);
    // SAFETY: checked non-null above; callers pass a live byte.
    unsafe { *ptr }
}

fn fibonacci(n: u32) -> u64 {
    if n <= 1 {
        n as u64
    } else {
        fibonacci(n - 1) + fibonacci(n - 2)
    }
}

fn write_to_file(path: &Path) {
    if let Err(e) = fs::write(path, "Test content\n") {
        log::warn!("could not write {}: {e}", path.display());
    }
}

#[def_test]
fn test_basic_assertions() {
    trace_function!();
    test_assert!(5 > 3, "Five is greater than three");
    test_assert_eq!(multiply(4, 5), 20, "4 * 5 should equal 20");

    let greeting = String::from("Hello");
    test_assert_str_eq!(greeting, "Hello", "Greeting should be 'Hello'");

    let valid: Option<&str> = Some("test");
    let null: *const u8 = std::ptr::null();
    test_assert_some!(valid, "Valid pointer should not be null");
    test_assert_none!(null, "Null pointer should be null");
}

#[def_test]
fn test_array_operations() {
    trace_function!();
    let source = [1, 2, 3, 4, 5];
    let mut destination = [0; 5];
    let expected = [1, 2, 3, 4, 5];

    copy_array(&mut destination, &source);
    test_assert_array_eq!(destination, expected, 5, "Array copy should match expected values");
}

#[def_test]
fn test_floating_point() {
    trace_function!();
    let pi = pi_approximation();
    test_assert_float_eq!(pi, 3.14159, 0.00001, "Pi approximation should be close to 3.14159");
    test_assert_float_eq!(pi, 3.14, 0.01, "Pi approximation should be close to 3.14 (loose tolerance)");
}

#[def_test]
fn test_range_checks() {
    trace_function!();
    let value = 50;
    test_assert_in_range!(value, 1, 100, "Value should be between 1 and 100");

    let random_val = random_int(10, 20);
    log_var!(random_val);
    test_assert_in_range!(random_val, 10, 20, "Random value should be in specified range");
}

#[def_test]
fn test_crash_scenarios(ctx: &mut TestContext) {
    trace_function!();
    expect_crash!(
        ctx,
        {
            divide(10, std::hint::black_box(0));
        },
        "Division by zero should crash"
    );
    expect_crash!(
        ctx,
        {
            read_through(std::hint::black_box(std::ptr::null()));
        },
        "Null pointer access should crash"
    );
}

#[def_test]
fn test_memory_management(ctx: &mut TestContext) {
    trace_function!();
    let buffer1 = allocate_buffer(100);
    ctx.ledger_mut().track_alloc(&buffer1);
    let mut buffer1 = check_alloc!(buffer1, "Buffer allocation");

    let buffer2 = allocate_buffer(200);
    ctx.ledger_mut().track_alloc(&buffer2);
    let buffer2 = check_alloc!(buffer2, "Second buffer allocation");

    buffer1.extend_from_slice(b"Hello, World!");
    let content = String::from_utf8_lossy(&buffer1);
    test_assert_str_eq!(content, "Hello, World!", "Buffer content should match");

    ctx.ledger_mut().track_free(&Some(&buffer1));
    drop(buffer1);
    ctx.ledger_mut().track_free(&Some(&buffer2));
    drop(buffer2);

    ctx.check_memory_leaks();
}

#[def_test]
fn test_file_operations() {
    trace_function!();
    let test_file = std::env::temp_dir().join(format!("showcase_{}.txt", std::process::id()));
    write_to_file(&test_file);
    test_file_exists!(test_file, "Test file should exist after creation");
    if let Err(e) = fs::remove_file(&test_file) {
        log::warn!("could not remove {}: {e}", test_file.display());
    }
}

#[def_test]
fn test_performance() {
    trace_function!();
    let bench = Benchmark::start();
    let result = fibonacci(30);
    let _ = bench.end("Fibonacci calculation");

    log_var!(result);
    test_assert!(result > 0, "Fibonacci result should be positive");
}

#[def_test]
fn test_stress_scenarios() {
    trace_function!();
    stress_test!(
        1000,
        multiply(random_int(1, 100), random_int(1, 100)) > 0,
        "Multiplication of positive numbers should always be positive"
    );

    repeat_test!(5, {
        let a = random_int(1, 10);
        let b = random_int(1, 10);
        let product = multiply(a, b);
        if product != a * b {
            let _ = teprintln!("Multiplication failed: {a} * {b} != {product}");
        }
    });
}

#[def_test]
fn test_buffer_security() {
    trace_function!();
    let buffer = [0u8; 10];
    test_buffer_overflow!(buffer, 5, "Writing 5 bytes to 10-byte buffer should be safe");
    let heap = vec![0u8; 100];
    test_buffer_overflow!(heap, 50, "Writing 50 bytes to a 100-byte heap buffer should be safe");
}

#[def_test]
fn test_conditional_features() {
    trace_function!();
    test_skip!(
        unittest::config::skip_slow_tests(),
        "Skipping slow test due to environment variable"
    );

    let value = 5;
    warn_unless!(value > 10, "Value is quite small, might want to increase it");
    debug_print!("Debug info: value = {}", value);
}

#[def_test]
fn test_with_setup_teardown(ctx: &mut TestContext) {
    trace_function!();
    ctx.setup(|| {
        let _ = tprintln!("  Initializing test data...");
    });

    let random1 = random_int(1, 100);
    let random2 = random_int(1, 100);
    test_assert!((1..=100).contains(&random1), "First random number in valid range");
    test_assert!((1..=100).contains(&random2), "Second random number in valid range");

    ctx.teardown(|| {
        let _ = tprintln!("  Cleaning up test data...");
    });
}

#[def_test]
fn test_bounds_checking() {
    trace_function!();
    let array: [i32; 10] = std::array::from_fn(|i| i as i32);
    let index = 5;
    check_bounds!(index, array.len(), "Array access");
    test_assert_eq!(array[index], 5, "Array element should match index");
}

fn banner() -> fmt::Result {
    tprintln!("=== UNITTEST SHOWCASE ===\n")?;
    tprintln!("Environment variables you can set:")?;
    tprintln!("  DEBUG=1           - Enable debug output")?;
    tprintln!("  TRACE=1           - Enable function tracing")?;
    tprintln!("  SKIP_SLOW_TESTS=1 - Skip slow tests")?;
    tprintln!("  UNITTEST_LOG=info - Toolkit diagnostics on stderr\n")
}

fn main() -> ExitCode {
    unittest::init_logging();

    let _ = banner();

    let overall = Benchmark::start();

    let mut runner = TestRunner::new();
    run_test!(runner, test_basic_assertions);
    run_test!(runner, test_array_operations);
    run_test!(runner, test_floating_point);
    run_test!(runner, test_range_checks);
    run_test!(runner, test_crash_scenarios);
    run_test!(runner, test_memory_management);
    run_test!(runner, test_file_operations);
    run_test!(runner, test_performance);
    run_test!(runner, test_stress_scenarios);
    run_test!(runner, test_buffer_security);
    run_test!(runner, test_conditional_features);
    run_test!(runner, test_with_setup_teardown);
    run_test!(runner, test_bounds_checking);

    let _ = overall.end("All tests");
    let code = runner.finish();
    let _ = tprintln!("\n=== SHOWCASE COMPLETE ===");
    code
}
