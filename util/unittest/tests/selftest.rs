// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! The assertion and instrumentation surface, driven the way a test program
//! drives it: `#[def_test]` units handed to a [`TestRunner`].

use std::{fs, process::ExitCode};

use unittest::{
    AllocationLedger, Benchmark, OrDie, TestContext, TestResult, TestRunner, benchmark,
    check, check_alloc, check_bounds, def_test, error_check, random_float, random_int,
    repeat_test, run_test, static_assert, stress_test, test_assert, test_assert_array_eq,
    test_assert_eq, test_assert_float_eq, test_assert_in_range, test_assert_ne,
    test_assert_none, test_assert_some, test_assert_str_eq, test_buffer_overflow,
    test_file_exists, test_skip, warn_unless,
};

static_assert!(size_of::<u32>() == 4, "u32 is four bytes");

const UNSET_FLAG: &str = "UNITTEST_SELFTEST_NEVER_SET";

#[def_test]
fn basic_assertions() {
    test_assert!(true, "true is true");
    test_assert_eq!(5 * 4, 20, "5 * 4 equals 20");
    test_assert_ne!(5, 6, "5 is not 6");
    test_assert_str_eq!("hello", "hello", "same bytes");
    let boxed = Some(Box::new(7));
    test_assert_some!(boxed, "box is present");
    let nothing: Option<Box<i32>> = None;
    test_assert_none!(nothing, "nothing is absent");
    let raw: *const i32 = std::ptr::null();
    test_assert_none!(raw, "raw null pointer");
}

#[def_test]
fn collections_and_numbers() {
    let arr1 = [1, 2, 3, 4, 5];
    let arr2 = [1, 2, 3, 4, 5];
    test_assert_array_eq!(arr1, arr2, 5, "arrays match");
    test_assert_array_eq!(arr1, [1, 2, 9], 2, "prefix of length 2 matches");
    test_assert_float_eq!(3.14159_f32, 3.14160_f32, 0.001, "close enough");
    test_assert_in_range!(5, 1, 10, "5 in [1, 10]");
    test_assert_in_range!(1, 1, 1, "bounds are inclusive");
    let buffer = [0u8; 16];
    test_buffer_overflow!(buffer, 16, "exact fit is fine");
    let heap = vec![0u8; 100];
    test_buffer_overflow!(heap, 50, "half of a heap buffer");
    let window: &[u8] = &heap[..32];
    test_buffer_overflow!(window, 32, "a slice counts its elements");
    test_buffer_overflow!(heap, 10, 10, "declared size caps the buffer");
}

#[def_test]
fn failing_equality() {
    test_assert_eq!(2 + 2, 5, "two plus two");
}

#[def_test]
fn failing_string_equality() {
    test_assert_str_eq!("hello", "hellO", "case matters");
}

#[def_test]
fn failing_array() {
    test_assert_array_eq!([1, 2, 3], [1, 2, 4], 3, "last element differs");
}

#[def_test]
fn failing_float() {
    test_assert_float_eq!(f64::NAN, f64::NAN, 1.0, "NaN equals nothing");
}

#[def_test]
fn failing_overflow() {
    let buffer = [0u8; 8];
    test_buffer_overflow!(buffer, 9, "one byte too many");
}

#[def_test]
fn stops_at_first_failure(ctx: &mut TestContext) {
    test_assert!(false, "first failure");
    // Tracked only if the unit kept running after the failure.
    ctx.ledger_mut().track_alloc(&Some(()));
}

#[def_test]
fn file_checks() {
    let dir = tempfile::tempdir().or_die("temp dir");
    let path = dir.path().join("test_file.txt");
    fs::write(&path, "Hello, World!").or_die("write test file");
    test_file_exists!(path, "written file is readable");
    let content = fs::read_to_string(&path).or_die("read test file");
    test_assert_str_eq!(content, "Hello, World!", "content survives");
}

#[def_test]
fn missing_file() {
    let dir = tempfile::tempdir().or_die("temp dir");
    test_file_exists!(dir.path().join("nope.txt"), "missing file");
}

#[def_test]
fn memory_ledger(ctx: &mut TestContext) {
    let ptr1 = check_alloc!(Some(vec![0u8; 100]), "first buffer");
    let ptr2 = Some(vec![0u8; 200]);
    ctx.ledger_mut().track_alloc(&Some(&ptr1));
    ctx.ledger_mut().track_alloc(&ptr2);
    let null: Option<Vec<u8>> = None;
    ctx.ledger_mut().track_alloc(&null);
    test_assert_eq!(ctx.ledger().allocated(), 2, "null is not counted");

    ctx.ledger_mut().track_free(&Some(&ptr1));
    drop(ptr1);
    ctx.ledger_mut().track_free(&ptr2);
    drop(ptr2);
    test_assert!(ctx.check_memory_leaks(), "ledger balances");
}

#[def_test]
fn leak_is_advisory(ctx: &mut TestContext) {
    let leaked = Some(Box::new(1u64));
    ctx.ledger_mut().track_alloc(&leaked);
    test_assert!(!ctx.check_memory_leaks(), "one allocation outstanding");
}

#[def_test]
fn setup_and_teardown(ctx: &mut TestContext) {
    let data = ctx.setup(|| (0..10).map(|i| i * i).collect::<Vec<i32>>());
    test_assert_eq!(data.len(), 10, "setup built the data");
    test_assert_eq!(data[3], 9, "3 squared");
    ctx.teardown(|| drop(data));
}

#[def_test]
fn stress_and_repeat() {
    let mut runs = 0;
    repeat_test!(10, {
        runs += 1;
    });
    test_assert_eq!(runs, 10, "every repetition ran");
    stress_test!(100, random_int(1, 100) <= 100, "random value stays in bounds");
}

#[def_test]
fn stress_failure() {
    let mut i = 0;
    stress_test!(
        10,
        {
            i += 1;
            i % 2 == 0
        },
        "odd iterations fail"
    );
}

#[def_test]
fn random_helpers() {
    for _ in 0..100 {
        test_assert_in_range!(random_int(-5, 5), -5, 5, "int in range");
        test_assert_in_range!(random_float(), 0.0, 1.0, "float in unit interval");
    }
}

#[def_test]
fn timing() {
    let total = benchmark!("sum of squares", { (0u64..10_000).map(|x| x * x).sum::<u64>() });
    test_assert_eq!(total, 333_283_335_000u64, "benchmark yields the block value");
    let bench = Benchmark::start_wall();
    let elapsed = bench.end("empty wall span");
    test_assert!(elapsed.as_secs() < 60, "empty span is short");
}

#[def_test]
fn passing_preconditions() {
    check!(1 < 2, "ordering holds");
    check_bounds!(2usize, 3usize, "index inside");
    error_check!(i32::abs(-4), 4);
    warn_unless!(1 + 1 == 2, "silent when the condition holds");
    warn_unless!(false, "warnings never fail a unit");
    let value = Some(3).or_die("present");
    test_assert_eq!(value, 3, "or_die yields the value");
}

#[def_test]
fn conditional_skip() {
    test_skip!(true, "skipping on purpose");
    test_assert!(false, "never evaluated");
}

#[def_test(ignore)]
fn ignored_unit() {
    test_assert!(false, "ignored units never run");
}

#[def_test(skip_if_env = "PATH")]
fn skipped_when_path_is_set() {
    test_assert!(false, "PATH is set wherever tests run");
}

#[def_test(skip_if_env = "UNITTEST_SELFTEST_NEVER_SET")]
fn runs_when_flag_unset() {
    test_assert!(std::env::var_os(UNSET_FLAG).is_none(), "flag is unset");
}

#[def_test]
fn panicking_unit() {
    let items: Vec<i32> = Vec::new();
    test_assert_eq!(items[std::hint::black_box(3)], 0, "indexing past the end panics");
}

fn standalone_ledger() -> bool {
    let mut ledger = AllocationLedger::new();
    ledger.track_alloc(&Some(1));
    ledger.track_free(&Some(1));
    ledger.is_balanced() && ledger.allocated() == 1 && ledger.freed() == 1
}

fn main() -> ExitCode {
    unittest::init_logging();

    let mut runner = TestRunner::new();
    let observed = [
        ("basic_assertions", run_test!(runner, basic_assertions), TestResult::Ok),
        ("collections_and_numbers", run_test!(runner, collections_and_numbers), TestResult::Ok),
        ("failing_equality", run_test!(runner, failing_equality), TestResult::Failed),
        ("failing_string_equality", run_test!(runner, failing_string_equality), TestResult::Failed),
        ("failing_array", run_test!(runner, failing_array), TestResult::Failed),
        ("failing_float", run_test!(runner, failing_float), TestResult::Failed),
        ("failing_overflow", run_test!(runner, failing_overflow), TestResult::Failed),
        ("stops_at_first_failure", run_test!(runner, stops_at_first_failure), TestResult::Failed),
        ("file_checks", run_test!(runner, file_checks), TestResult::Ok),
        ("missing_file", run_test!(runner, missing_file), TestResult::Failed),
        ("memory_ledger", run_test!(runner, memory_ledger), TestResult::Ok),
        ("leak_is_advisory", run_test!(runner, leak_is_advisory), TestResult::Ok),
        ("setup_and_teardown", run_test!(runner, setup_and_teardown), TestResult::Ok),
        ("stress_and_repeat", run_test!(runner, stress_and_repeat), TestResult::Ok),
        ("stress_failure", run_test!(runner, stress_failure), TestResult::Failed),
        ("random_helpers", run_test!(runner, random_helpers), TestResult::Ok),
        ("timing", run_test!(runner, timing), TestResult::Ok),
        ("passing_preconditions", run_test!(runner, passing_preconditions), TestResult::Ok),
        ("conditional_skip", run_test!(runner, conditional_skip), TestResult::Skipped),
        ("ignored_unit", run_test!(runner, ignored_unit), TestResult::Skipped),
        ("skipped_when_path_is_set", run_test!(runner, skipped_when_path_is_set), TestResult::Skipped),
        ("runs_when_flag_unset", run_test!(runner, runs_when_flag_unset), TestResult::Ok),
        ("panicking_unit", run_test!(runner, panicking_unit), TestResult::Failed),
    ];
    let stats = *runner.stats();
    runner.print_summary();

    let mut mismatches = 0;
    for (name, got, want) in observed {
        if got != want {
            eprintln!("selftest: {name} ended {got:?}, expected {want:?}");
            mismatches += 1;
        }
    }
    // Skipped units count as passed.
    if stats.total != 23 || stats.passed != 14 || stats.failed != 9 || stats.skipped != 3 {
        eprintln!("selftest: unexpected counters {stats:?}");
        mismatches += 1;
    }
    if !standalone_ledger() {
        eprintln!("selftest: standalone ledger out of balance");
        mismatches += 1;
    }

    if mismatches == 0 {
        println!("selftest: all outcomes as expected");
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
