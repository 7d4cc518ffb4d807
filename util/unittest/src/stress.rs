// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Repeat and stress execution.

use tlogger::{teprintln, tprintln};

use crate::{assert::Verdict, error::Failure};

/// Runs `body` `times` times, unconditionally. The argument is the iteration.
pub fn repeat(times: usize, mut body: impl FnMut(usize)) {
    let _ = tprintln!("Running test {times} times...");
    for i in 0..times {
        body(i);
    }
}

/// Runs `predicate` for every iteration and counts the `false` results.
pub fn count_failures(iterations: usize, mut predicate: impl FnMut(usize) -> bool) -> usize {
    (0..iterations).filter(|&i| !predicate(i)).count()
}

/// Runs `predicate` `iterations` times; any `false` fails the assertion.
///
/// Every iteration runs even after a failure, so the report carries the
/// full failure count.
pub fn stress(iterations: usize, message: &str, predicate: impl FnMut(usize) -> bool) -> Verdict {
    let _ = tprintln!("STRESS TEST: {message} ({iterations} iterations)");
    let failures = count_failures(iterations, predicate);
    if failures > 0 {
        let _ = teprintln!("STRESS TEST FAIL: {failures}/{iterations} iterations failed");
        Err(Failure::with_detail(
            message,
            format!("{failures}/{iterations} iterations failed"),
        ))
    } else {
        let _ = tprintln!("STRESS TEST PASS: All {iterations} iterations passed");
        Ok(())
    }
}

/// `repeat_test!(n, { ... })`
#[macro_export]
macro_rules! repeat_test {
    ($times:expr, $body:block $(,)?) => {
        $crate::stress::repeat($times, |_| $body)
    };
}

/// `stress_test!(n, predicate_expr, "msg")`, fails the unit on any `false`.
#[macro_export]
macro_rules! stress_test {
    ($iterations:expr, $predicate:expr, $msg:expr $(,)?) => {
        $crate::__test_try!($crate::stress::stress(
            $iterations,
            $crate::__msg!($msg),
            |_| $predicate
        ))
    };
}
