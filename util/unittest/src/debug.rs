// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Environment-gated diagnostics and non-fatal warnings.
//!
//! `DEBUG` and `TRACE` are read on every call.

use std::fmt;

use crate::{config, report};

#[doc(hidden)]
pub fn debug_line(file: &str, line: u32, args: fmt::Arguments) {
    if config::debug_enabled() {
        report::info_err(format_args!("DEBUG ({file}:{line}): {args}"));
    }
}

#[doc(hidden)]
pub fn trace_entry(function: &str, file: &str, line: u32) {
    if config::trace_enabled() {
        report::info_err(format_args!("TRACE: Entering {function} ({file}:{line})"));
    }
}

#[doc(hidden)]
pub fn log_var(name: &str, value: &dyn fmt::Debug, file: &str, line: u32) {
    if config::debug_enabled() {
        report::info_err(format_args!("DEBUG: {name} = {value:?} ({file}:{line})"));
    }
}

/// Prints `WARNING: <message> (file:line)` unless `condition` holds.
#[track_caller]
pub fn warn_unless(condition: bool, message: &str) {
    if !condition {
        let at = std::panic::Location::caller();
        report::warning(&format!("{message} ({}:{})", at.file(), at.line()));
    }
}

/// Last path segment of a `type_name`, skipping closure markers.
#[doc(hidden)]
pub fn short_fn_name(full: &str) -> &str {
    let full = full.strip_suffix("::__here").unwrap_or(full);
    full.rsplit("::")
        .find(|segment| *segment != "{{closure}}")
        .unwrap_or(full)
}

/// Name of the enclosing function.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        $crate::debug::short_fn_name(__type_name_of(__here))
    }};
}

/// `DEBUG (file:line): ...` on stderr while `DEBUG` is set.
#[macro_export]
macro_rules! debug_print {
    ($($arg:tt)*) => {
        $crate::debug::debug_line(::core::file!(), ::core::line!(), ::core::format_args!($($arg)*))
    };
}

/// `TRACE: Entering <fn> (file:line)` on stderr while `TRACE` is set.
#[macro_export]
macro_rules! trace_function {
    () => {
        $crate::debug::trace_entry($crate::function_name!(), ::core::file!(), ::core::line!())
    };
}

/// `DEBUG: <expr> = <value> (file:line)` on stderr while `DEBUG` is set.
#[macro_export]
macro_rules! log_var {
    ($var:expr) => {
        $crate::debug::log_var(
            ::core::stringify!($var),
            &$var,
            ::core::file!(),
            ::core::line!(),
        )
    };
}

#[macro_export]
macro_rules! warn_unless {
    ($cond:expr, $msg:expr $(,)?) => {
        $crate::debug::warn_unless($cond, $crate::__msg!($msg))
    };
}
