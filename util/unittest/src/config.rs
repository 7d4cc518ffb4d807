// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Environment switches.
//!
//! Every lookup reads the process environment again, so changing a variable
//! mid-run affects the calls that follow.

use std::ffi::OsStr;

/// Enables `debug_print!` and `log_var!` output.
pub const DEBUG_ENV: &str = "DEBUG";
/// Enables `trace_function!` output.
pub const TRACE_ENV: &str = "TRACE";
/// Conventional switch for skipping slow test units.
pub const SKIP_SLOW_TESTS_ENV: &str = "SKIP_SLOW_TESTS";
/// Log level for the toolkit's own diagnostics.
pub const LOG_ENV: &str = tlogger::LOG_ENV;
/// Marks a crash sandbox child process; holds `<unit>#<n>`.
pub const SANDBOX_ENV: &str = "UNITTEST_SANDBOX";

/// Returns true when `name` is set to a non-empty value.
pub fn env_flag(name: impl AsRef<OsStr>) -> bool {
    std::env::var_os(name).is_some_and(|value| !value.is_empty())
}

#[inline]
pub fn debug_enabled() -> bool {
    env_flag(DEBUG_ENV)
}

#[inline]
pub fn trace_enabled() -> bool {
    env_flag(TRACE_ENV)
}

#[inline]
pub fn skip_slow_tests() -> bool {
    env_flag(SKIP_SLOW_TESTS_ENV)
}
