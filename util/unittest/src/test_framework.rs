// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Test runner and run statistics.
//!
//! Units run one at a time in the order they are handed to [`TestRunner::run`],
//! with no retries. Each run bumps `total` and exactly one of `passed` or
//! `failed`.

use std::{
    fmt,
    panic::{self, AssertUnwindSafe},
    process::ExitCode,
};

use crate::{
    context::TestContext,
    report,
    sandbox::{self, Role},
    test_framework_basic::TestResult,
};

/// A test unit: gets a fresh context, returns its outcome.
pub trait Testable {
    fn run(self, ctx: &mut TestContext) -> TestResult;
}

impl<F> Testable for F
where
    F: FnOnce(&mut TestContext) -> TestResult,
{
    #[inline]
    fn run(self, ctx: &mut TestContext) -> TestResult {
        self(ctx)
    }
}

/// Counters of one run. Invariant: `total == passed + failed`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TestStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Units that skipped themselves; already counted in `passed`
    pub skipped: usize,
}

impl TestStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one finished unit.
    pub fn record(&mut self, result: TestResult) {
        self.total += 1;
        match result {
            TestResult::Ok => self.passed += 1,
            TestResult::Skipped => {
                self.passed += 1;
                self.skipped += 1;
            }
            TestResult::Failed => self.failed += 1,
        }
    }

    /// `passed / total * 100`, or `0.0` before any unit ran.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 * 100.0 / self.total as f64
        }
    }

    #[inline]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// The `=== TEST SUMMARY ===` block.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_summary(&mut out);
        out
    }

    fn write_summary(&self, out: &mut impl fmt::Write) -> fmt::Result {
        writeln!(out, "\n=== TEST SUMMARY ===")?;
        writeln!(out, "Total tests: {}", self.total)?;
        writeln!(out, "Passed: {}", self.passed)?;
        writeln!(out, "Failed: {}", self.failed)?;
        if self.skipped > 0 {
            writeln!(out, "Skipped: {} (counted as passed)", self.skipped)?;
        }
        writeln!(out, "Success rate: {:.1}%", self.success_rate())?;
        write!(out, "==================")
    }
}

/// The line printed after a unit: `✓ <name> passed` or `✗ <name> failed`.
pub fn outcome_marker(name: &str, result: TestResult) -> String {
    if result.is_pass() {
        format!("✓ {name} passed")
    } else {
        format!("✗ {name} failed")
    }
}

/// Runs test units and keeps the tally.
pub struct TestRunner {
    stats: TestStats,
    role: Role,
}

impl TestRunner {
    /// A runner for this process; it notices when it runs inside a crash sandbox child.
    pub fn new() -> Self {
        Self::with_role(Role::detect())
    }

    pub fn with_role(role: Role) -> Self {
        if let Role::Child(target) = &role {
            log::debug!("runner in sandbox child for {target}");
        }
        Self {
            stats: TestStats::new(),
            role,
        }
    }

    /// Runs one unit under `name`, prints its marker and counts it.
    ///
    /// A panicking unit counts as failed. In a sandbox child only the target
    /// unit runs, and the process ends inside it.
    pub fn run(&mut self, name: &str, test: impl Testable) -> TestResult {
        if let Role::Child(target) = &self.role {
            if target.unit != name {
                return TestResult::Skipped;
            }
            let mut ctx = TestContext::with_role(name, self.role.clone());
            // Returning here means the block never ran.
            let _ = panic::catch_unwind(AssertUnwindSafe(|| test.run(&mut ctx)));
            sandbox::unreached(target);
        }

        report::info(format_args!("Running {name}..."));
        let mut ctx = TestContext::with_role(name, Role::Parent);
        let result = match panic::catch_unwind(AssertUnwindSafe(|| test.run(&mut ctx))) {
            Ok(result) => result,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                report::fail(&format!("{name} panicked: {reason}"));
                TestResult::Failed
            }
        };

        report::info(format_args!("{}\n", outcome_marker(name, result)));
        self.stats.record(result);
        log::trace!("{name}: {result:?}, {:?}", self.stats);
        result
    }

    pub fn stats(&self) -> &TestStats {
        &self.stats
    }

    /// Prints the summary block.
    ///
    /// A sandbox child getting this far never found its target unit and
    /// exits instead.
    pub fn print_summary(&self) {
        if let Role::Child(target) = &self.role {
            sandbox::unreached(target);
        }
        report::info(format_args!("{}", self.stats.summary()));
    }

    /// 0 when no unit failed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.stats.all_passed() { 0 } else { 1 }
    }

    /// Prints the summary and yields the process exit code.
    pub fn finish(self) -> ExitCode {
        self.print_summary();
        if self.stats.all_passed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a unit under its own identifier: `run_test!(runner, test_fn)`.
#[macro_export]
macro_rules! run_test {
    ($runner:expr, $test:path $(,)?) => {
        $runner.run(::core::stringify!($test), $test)
    };
}
