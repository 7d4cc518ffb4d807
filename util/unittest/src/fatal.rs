// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Fatal checks.
//!
//! Guards for preconditions that must hold no matter what a test intends.
//! A tripped guard prints `ERROR: ...` with the caller's file and line and
//! exits the process with [`FATAL_EXIT_CODE`]. None of these return on
//! failure, and no test unit observes the failure.
//!
//! Inside a crash sandbox a tripped guard is exactly the abnormal exit the
//! sandbox is waiting for.

use std::{fmt::Display, io};

pub use crate::error::FATAL_EXIT_CODE;
use crate::{
    assert::Nullable,
    error::{FatalError, FatalKind},
};

/// Terminates unless `condition` holds.
#[track_caller]
pub fn check(condition: bool, message: &str) {
    if !condition {
        FatalError::new(FatalKind::Check, message).terminate();
    }
}

/// Terminates when `ptr` is null; `what` names the pointer.
#[track_caller]
pub fn check_ptr<P: Nullable + ?Sized>(ptr: &P, what: &str) {
    if ptr.is_null_ptr() {
        FatalError::new(FatalKind::NullPointer, what).terminate();
    }
}

/// Terminates unless `0 <= index < size`.
#[track_caller]
pub fn check_bounds<I>(index: I, size: I, message: &str)
where
    I: PartialOrd + Default + Display + Copy,
{
    if index < I::default() || index >= size {
        FatalError::new(
            FatalKind::Bounds,
            format!("{message} - index {index} out of bounds [0, {size})"),
        )
        .terminate();
    }
}

/// Terminates when a system call reported `-1`, with the OS error text.
///
/// Passes the return value through otherwise.
#[track_caller]
pub fn check_errno<R>(ret: R, message: &str) -> R
where
    R: PartialEq + From<i8>,
{
    if ret == R::from(-1) {
        let os_error = io::Error::last_os_error();
        FatalError::new(FatalKind::Errno, format!("{message} failed: {os_error}")).terminate();
    }
    ret
}

/// Terminates when an allocation came back empty, else yields the value.
#[track_caller]
pub fn check_alloc<T>(allocation: Option<T>, message: &str) -> T {
    match allocation {
        Some(value) => value,
        None => FatalError::new(FatalKind::Alloc, message).terminate(),
    }
}

/// Terminates unless a call returned `expected`; `call` is its source text.
#[track_caller]
pub fn error_check<R>(ret: R, expected: R, call: &str)
where
    R: PartialEq + Display,
{
    if ret != expected {
        FatalError::new(
            FatalKind::ReturnCode,
            format!("call '{call}' returned {ret}, expected {expected}"),
        )
        .terminate();
    }
}

#[track_caller]
pub fn unreachable(message: &str) -> ! {
    FatalError::new(FatalKind::Unreachable, message).terminate()
}

/// Unwrap-or-terminate for values that must be present.
pub trait OrDie<T> {
    /// Yields the value, or prints `ERROR: <message> ...` and exits.
    fn or_die(self, message: &str) -> T;
}

impl<T> OrDie<T> for Option<T> {
    #[track_caller]
    fn or_die(self, message: &str) -> T {
        match self {
            Some(value) => value,
            None => FatalError::new(FatalKind::Check, message).terminate(),
        }
    }
}

impl<T, E: Display> OrDie<T> for Result<T, E> {
    #[track_caller]
    fn or_die(self, message: &str) -> T {
        match self {
            Ok(value) => value,
            Err(e) => FatalError::new(FatalKind::Check, format!("{message}: {e}")).terminate(),
        }
    }
}

#[macro_export]
macro_rules! check {
    ($cond:expr, $msg:expr $(,)?) => {
        $crate::fatal::check($cond, $crate::__msg!($msg))
    };
}

/// Names the pointer expression in the error.
#[macro_export]
macro_rules! check_ptr {
    ($ptr:expr $(,)?) => {
        $crate::fatal::check_ptr(&$ptr, ::core::stringify!($ptr))
    };
}

#[macro_export]
macro_rules! check_bounds {
    ($index:expr, $size:expr, $msg:expr $(,)?) => {
        $crate::fatal::check_bounds($index, $size, $crate::__msg!($msg))
    };
}

#[macro_export]
macro_rules! check_errno {
    ($call:expr, $msg:expr $(,)?) => {
        $crate::fatal::check_errno($call, $crate::__msg!($msg))
    };
}

#[macro_export]
macro_rules! check_alloc {
    ($alloc:expr, $msg:expr $(,)?) => {
        $crate::fatal::check_alloc($alloc, $crate::__msg!($msg))
    };
}

/// Names the call expression in the error.
#[macro_export]
macro_rules! error_check {
    ($call:expr, $expected:expr $(,)?) => {
        $crate::fatal::error_check($call, $expected, ::core::stringify!($call))
    };
}

#[macro_export]
macro_rules! assert_unreachable {
    ($msg:expr $(,)?) => {
        $crate::fatal::unreachable($crate::__msg!($msg))
    };
}

/// Compile-time assertion.
#[macro_export]
macro_rules! static_assert {
    ($cond:expr, $msg:literal $(,)?) => {
        const _: () = ::core::assert!($cond, $msg);
    };
}
