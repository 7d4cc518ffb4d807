// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Toolkit for ad-hoc test programs.
//!
//! A test unit is a function `fn(&mut TestContext) -> TestResult`, usually
//! written with [`def_test`]. Inside it the `test_assert*` macros print a
//! `PASS:` or `FAIL:` line and end the unit on the first failure,
//! [`expect_crash!`] runs a block in a separate process and passes only if
//! that process dies, and the `check*` macros end the whole process when a
//! precondition breaks. A [`TestRunner`] runs units in order and prints the
//! summary.
//!
//! # Example
//! ```rust,no_run
//! use std::process::ExitCode;
//!
//! use unittest::{TestContext, TestRunner, def_test, expect_crash, run_test, test_assert_eq};
//!
//! #[def_test]
//! fn test_multiply() {
//!     test_assert_eq!(4 * 5, 20, "4 * 5 should be 20");
//! }
//!
//! #[def_test]
//! fn test_abort(ctx: &mut TestContext) {
//!     expect_crash!(ctx, { std::process::abort() }, "abort should crash");
//! }
//!
//! fn main() -> ExitCode {
//!     let mut runner = TestRunner::new();
//!     run_test!(runner, test_multiply);
//!     run_test!(runner, test_abort);
//!     runner.finish()
//! }
//! ```

pub mod assert;
pub mod bench;
pub mod config;
pub mod context;
pub mod debug;
pub mod error;
pub mod fatal;
pub mod ledger;
pub mod random;
pub mod report;
pub mod sandbox;
pub mod stress;
pub mod test_framework;
pub mod test_framework_basic;

pub use macros::def_test;

pub use assert::{Nullable, Verdict};
pub use bench::{Benchmark, Clock};
pub use context::TestContext;
pub use error::{Failure, FatalError, FatalKind, SandboxError};
pub use fatal::OrDie;
pub use ledger::AllocationLedger;
pub use random::{random_float, random_int};
pub use sandbox::{CrashExpectation, CrashVerdict};
pub use test_framework::{TestRunner, TestStats, Testable};
pub use test_framework_basic::TestResult;

/// Installs the toolkit's log backend, honoring `UNITTEST_LOG`.
pub fn init_logging() {
    tlogger::init_from_env();
}
