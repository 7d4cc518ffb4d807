// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Per-unit state handed to every test unit.

use crate::{
    assert::Verdict,
    ledger::AllocationLedger,
    report,
    sandbox::{self, Role, SandboxTarget},
    stress,
};

/// Everything one test unit may touch: its name, its allocation ledger and
/// the bookkeeping the crash sandbox needs. Dropped when the unit returns.
#[derive(Debug)]
pub struct TestContext {
    unit: String,
    role: Role,
    sandbox_calls: usize,
    ledger: AllocationLedger,
}

impl TestContext {
    /// A context for `unit` in this process, sandbox child or not.
    pub fn new(unit: impl Into<String>) -> Self {
        Self::with_role(unit, Role::detect())
    }

    pub fn with_role(unit: impl Into<String>, role: Role) -> Self {
        Self {
            unit: unit.into(),
            role,
            sandbox_calls: 0,
            ledger: AllocationLedger::new(),
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn ledger(&self) -> &AllocationLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut AllocationLedger {
        &mut self.ledger
    }

    /// Expects `block` to end the process abnormally.
    ///
    /// In a normal run the block executes in a child process and only its
    /// exit status comes back; nothing it does is visible here. Inside the
    /// child the matching call runs the block and never returns, other calls
    /// pass quietly so the unit reaches the matching one.
    pub fn expect_crash<F: FnOnce()>(&mut self, message: &str, block: F) -> Verdict {
        let index = self.sandbox_calls;
        self.sandbox_calls += 1;
        match &self.role {
            Role::Parent => sandbox::expect_crash(&SandboxTarget::new(&*self.unit, index), message),
            Role::Child(target) if target.is(&self.unit, index) => sandbox::run_in_child(block),
            Role::Child(_) => Ok(()),
        }
    }

    /// Prints `Setting up test...` and runs `setup`.
    pub fn setup<R>(&mut self, setup: impl FnOnce() -> R) -> R {
        report::info(format_args!("Setting up test..."));
        setup()
    }

    /// Prints `Tearing down test...` and runs `teardown`.
    pub fn teardown<R>(&mut self, teardown: impl FnOnce() -> R) -> R {
        report::info(format_args!("Tearing down test..."));
        teardown()
    }

    /// See [`stress::repeat`].
    pub fn repeat(&mut self, times: usize, body: impl FnMut(usize)) {
        stress::repeat(times, body)
    }

    /// See [`stress::stress`].
    pub fn stress(
        &mut self,
        iterations: usize,
        message: &str,
        predicate: impl FnMut(usize) -> bool,
    ) -> Verdict {
        stress::stress(iterations, message, predicate)
    }

    /// Prints the advisory leak report of this unit's ledger.
    pub fn check_memory_leaks(&self) -> bool {
        self.ledger.check_leaks()
    }
}

/// Fails the test unit unless `block` crashes: `expect_crash!(ctx, { ... }, "msg")`.
#[macro_export]
macro_rules! expect_crash {
    ($ctx:expr, $block:block, $msg:expr $(,)?) => {
        $crate::__test_try!($ctx.expect_crash($crate::__msg!($msg), || $block))
    };
}
