// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Outcome of a single test unit.

/// What a test unit reports back to the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    /// Every assertion held
    Ok,
    /// An assertion failed and the unit stopped early
    Failed,
    /// The unit decided at its start not to run
    Skipped,
}

impl TestResult {
    /// Whether the runner counts this outcome as passed.
    ///
    /// Skipped units count as passed.
    #[inline]
    pub fn is_pass(self) -> bool {
        !matches!(self, TestResult::Failed)
    }
}

/// `true` is `Ok`, `false` is `Failed`, matching a unit that returns 1 or 0.
impl From<bool> for TestResult {
    fn from(passed: bool) -> Self {
        if passed {
            TestResult::Ok
        } else {
            TestResult::Failed
        }
    }
}

impl<E> From<Result<(), E>> for TestResult {
    fn from(result: Result<(), E>) -> Self {
        result.is_ok().into()
    }
}
