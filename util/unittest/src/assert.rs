// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Assertion engine.
//!
//! Each function evaluates its predicate once, prints a `PASS:` or `FAIL:`
//! line and hands back a [`Verdict`]. The `test_assert*` macros wrap these
//! functions and return `TestResult::Failed` from the enclosing test unit on
//! the first failure, so the rest of the unit does not run.

use std::{
    fmt::{Debug, Display},
    fs::File,
    path::Path,
    ptr::NonNull,
};

use crate::{
    error::Failure,
    report::{self, Line},
};

/// Outcome of one assertion.
pub type Verdict = Result<(), Failure>;

/// The `PASS:` or `FAIL:` line reported for `outcome`.
pub fn report_line(outcome: &Verdict, message: &str) -> String {
    match outcome {
        Ok(()) => Line::Pass.render(message),
        Err(failure) => Line::Fail.render(&failure.to_string()),
    }
}

/// Prints the line matching `outcome` and passes it through.
pub(crate) fn settle(outcome: Verdict, message: &str) -> Verdict {
    match &outcome {
        Ok(()) => report::pass(message),
        Err(failure) => report::fail(&failure.to_string()),
    }
    outcome
}

fn verdict(passed: bool, message: &str, detail: impl FnOnce() -> Option<String>) -> Verdict {
    let outcome = if passed {
        Ok(())
    } else {
        Err(Failure {
            message: message.into(),
            detail: detail(),
        })
    };
    settle(outcome, message)
}

/// Something that can be null: `Option`, raw pointers, `NonNull`.
pub trait Nullable {
    fn is_null_ptr(&self) -> bool;
}

impl<T> Nullable for Option<T> {
    #[inline]
    fn is_null_ptr(&self) -> bool {
        self.is_none()
    }
}

impl<T: ?Sized> Nullable for *const T {
    #[inline]
    fn is_null_ptr(&self) -> bool {
        <*const T>::is_null(*self)
    }
}

impl<T: ?Sized> Nullable for *mut T {
    #[inline]
    fn is_null_ptr(&self) -> bool {
        <*mut T>::is_null(*self)
    }
}

impl<T: ?Sized> Nullable for NonNull<T> {
    #[inline]
    fn is_null_ptr(&self) -> bool {
        false
    }
}

/// Plain boolean assertion.
pub fn that(condition: bool, message: &str) -> Verdict {
    verdict(condition, message, || None)
}

/// Equality, reporting both values on mismatch.
pub fn eq<T>(actual: &T, expected: &T, message: &str) -> Verdict
where
    T: PartialEq + Display + ?Sized,
{
    verdict(actual == expected, message, || {
        Some(format!("Expected: {expected}, Got: {actual}"))
    })
}

pub fn ne<T>(actual: &T, unexpected: &T, message: &str) -> Verdict
where
    T: PartialEq + Display + ?Sized,
{
    verdict(actual != unexpected, message, || {
        Some(format!("Expected anything but: {unexpected}, Got: {actual}"))
    })
}

/// Byte-wise string equality.
pub fn str_eq(actual: &str, expected: &str, message: &str) -> Verdict {
    verdict(actual.as_bytes() == expected.as_bytes(), message, || {
        Some(format!("Expected: \"{expected}\", Got: \"{actual}\""))
    })
}

pub fn some<P: Nullable + ?Sized>(ptr: &P, message: &str) -> Verdict {
    verdict(!ptr.is_null_ptr(), message, || Some("Pointer is NULL".into()))
}

pub fn none<P: Nullable + ?Sized>(ptr: &P, message: &str) -> Verdict {
    verdict(ptr.is_null_ptr(), message, || {
        Some("Expected NULL pointer".into())
    })
}

/// Index of the first of `len` elements where the slices differ.
///
/// `None` when the first `len` elements match. Stops at the first mismatch.
pub fn first_mismatch<T: PartialEq>(actual: &[T], expected: &[T], len: usize) -> Option<usize> {
    actual
        .iter()
        .zip(expected)
        .take(len)
        .position(|(a, e)| a != e)
}

/// Compares the first `len` elements of two slices.
///
/// A `len` past the end of either slice fails instead of reading out of bounds.
pub fn array_eq<T>(actual: &[T], expected: &[T], len: usize, message: &str) -> Verdict
where
    T: PartialEq + Debug,
{
    if len > actual.len() || len > expected.len() {
        return settle(
            Err(Failure::with_detail(
                message,
                format!(
                    "Length {len} exceeds arrays (actual {}, expected {})",
                    actual.len(),
                    expected.len()
                ),
            )),
            message,
        );
    }
    let mismatch = first_mismatch(actual, expected, len);
    verdict(mismatch.is_none(), message, || {
        mismatch.map(|i| {
            format!(
                "Arrays differ at index {i} (expected {:?}, got {:?})",
                expected[i], actual[i]
            )
        })
    })
}

/// Float equality within an absolute `epsilon`, inclusive.
///
/// NaN on either side never compares equal.
pub fn float_eq(actual: f64, expected: f64, epsilon: f64, message: &str) -> Verdict {
    let diff = (actual - expected).abs();
    verdict(diff <= epsilon, message, || {
        Some(format!(
            "Expected: {expected:.6}, Got: {actual:.6} (diff: {diff:.6})"
        ))
    })
}

/// `min <= value <= max`.
pub fn in_range<T>(value: T, min: T, max: T, message: &str) -> Verdict
where
    T: PartialOrd + Display,
{
    let inside = min <= value && value <= max;
    verdict(inside, message, || {
        Some(format!("Value {value} not in range [{min}, {max}]"))
    })
}

/// Size in bytes of the storage behind `buffer`: arrays, slices, `Vec`s.
pub fn byte_capacity<T, B>(buffer: &B) -> usize
where
    B: AsRef<[T]> + ?Sized,
{
    size_of_val(buffer.as_ref())
}

/// Static bounds comparison of a planned write; nothing is written.
pub fn no_overflow(capacity: usize, write_size: usize, message: &str) -> Verdict {
    verdict(write_size <= capacity, message, || {
        Some(format!(
            "Buffer overflow detected (writing {write_size} bytes to {capacity} byte buffer)"
        ))
    })
}

/// Opens `path` for reading and closes it again.
pub fn file_exists(path: impl AsRef<Path>, message: &str) -> Verdict {
    let path = path.as_ref();
    let opened = File::open(path).is_ok();
    verdict(opened, message, || {
        Some(format!("File '{}' does not exist", path.display()))
    })
}

#[doc(hidden)]
#[macro_export]
macro_rules! __test_try {
    ($verdict:expr) => {
        if ::core::result::Result::is_err(&$verdict) {
            return $crate::TestResult::Failed;
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __msg {
    ($msg:expr) => {
        ::core::convert::AsRef::<str>::as_ref(&$msg)
    };
}

/// Fails the test unit when `cond` is false.
#[macro_export]
macro_rules! test_assert {
    ($cond:expr, $msg:expr $(,)?) => {
        $crate::__test_try!($crate::assert::that($cond, $crate::__msg!($msg)))
    };
}

/// Fails the test unit when `actual != expected`, printing both.
#[macro_export]
macro_rules! test_assert_eq {
    ($actual:expr, $expected:expr, $msg:expr $(,)?) => {
        $crate::__test_try!($crate::assert::eq(
            &$actual,
            &$expected,
            $crate::__msg!($msg)
        ))
    };
}

#[macro_export]
macro_rules! test_assert_ne {
    ($actual:expr, $unexpected:expr, $msg:expr $(,)?) => {
        $crate::__test_try!($crate::assert::ne(
            &$actual,
            &$unexpected,
            $crate::__msg!($msg)
        ))
    };
}

#[macro_export]
macro_rules! test_assert_str_eq {
    ($actual:expr, $expected:expr, $msg:expr $(,)?) => {
        $crate::__test_try!($crate::assert::str_eq(
            ::core::convert::AsRef::<str>::as_ref(&$actual),
            ::core::convert::AsRef::<str>::as_ref(&$expected),
            $crate::__msg!($msg)
        ))
    };
}

/// Fails the test unit when the pointer or option is null.
#[macro_export]
macro_rules! test_assert_some {
    ($ptr:expr, $msg:expr $(,)?) => {
        $crate::__test_try!($crate::assert::some(&$ptr, $crate::__msg!($msg)))
    };
}

/// Fails the test unit unless the pointer or option is null.
#[macro_export]
macro_rules! test_assert_none {
    ($ptr:expr, $msg:expr $(,)?) => {
        $crate::__test_try!($crate::assert::none(&$ptr, $crate::__msg!($msg)))
    };
}

#[macro_export]
macro_rules! test_assert_array_eq {
    ($actual:expr, $expected:expr, $len:expr, $msg:expr $(,)?) => {
        $crate::__test_try!($crate::assert::array_eq(
            &$actual[..],
            &$expected[..],
            $len,
            $crate::__msg!($msg)
        ))
    };
}

#[macro_export]
macro_rules! test_assert_float_eq {
    ($actual:expr, $expected:expr, $epsilon:expr, $msg:expr $(,)?) => {
        $crate::__test_try!($crate::assert::float_eq(
            ($actual) as f64,
            ($expected) as f64,
            ($epsilon) as f64,
            $crate::__msg!($msg)
        ))
    };
}

/// Inclusive on both ends.
#[macro_export]
macro_rules! test_assert_in_range {
    ($value:expr, $min:expr, $max:expr, $msg:expr $(,)?) => {
        $crate::__test_try!($crate::assert::in_range(
            $value,
            $min,
            $max,
            $crate::__msg!($msg)
        ))
    };
}

/// Fails when `write_size` bytes would not fit into the buffer.
///
/// `test_buffer_overflow!(buffer, write_size, "msg")` measures the buffer's
/// storage; `test_buffer_overflow!(buffer, size, write_size, "msg")` takes the
/// capacity as given, for buffers only part of which is usable.
#[macro_export]
macro_rules! test_buffer_overflow {
    ($buffer:expr, $size:expr, $write_size:expr, $msg:expr $(,)?) => {{
        let _ = &$buffer;
        $crate::__test_try!($crate::assert::no_overflow(
            $size,
            $write_size,
            $crate::__msg!($msg)
        ))
    }};
    ($buffer:expr, $write_size:expr, $msg:expr $(,)?) => {
        $crate::__test_try!($crate::assert::no_overflow(
            $crate::assert::byte_capacity(&$buffer),
            $write_size,
            $crate::__msg!($msg)
        ))
    };
}

#[macro_export]
macro_rules! test_file_exists {
    ($path:expr, $msg:expr $(,)?) => {
        $crate::__test_try!($crate::assert::file_exists(&$path, $crate::__msg!($msg)))
    };
}

/// Prints `SKIP: <msg>` and ends the unit as skipped when `cond` holds.
#[macro_export]
macro_rules! test_skip {
    ($cond:expr, $msg:expr $(,)?) => {
        if $cond {
            $crate::report::skip($crate::__msg!($msg));
            return $crate::TestResult::Skipped;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn that_reports_message() {
        assert!(that(true, "holds").is_ok());
        let failure = that(false, "does not hold").unwrap_err();
        assert_eq!(failure.to_string(), "does not hold");
    }

    #[test]
    fn rendered_lines_carry_the_message() {
        let message = "five is greater than three";
        assert_eq!(
            report_line(&that(5 > 3, message), message),
            "PASS: five is greater than three"
        );
        assert_eq!(
            report_line(&that(5 < 3, message), message),
            "FAIL: five is greater than three"
        );
        let mismatch = eq(&(4 * 5), &21, "product");
        assert_eq!(
            report_line(&mismatch, "product"),
            "FAIL: product - Expected: 21, Got: 20"
        );
    }

    #[test]
    fn eq_carries_expected_and_actual() {
        assert!(eq(&(4 * 5), &20, "product").is_ok());
        let failure = eq(&(4 * 5), &21, "product").unwrap_err();
        let text = failure.to_string();
        assert!(text.contains("21"));
        assert!(text.contains("20"));
        assert_eq!(text, "product - Expected: 21, Got: 20");
    }

    #[test]
    fn ne_rejects_equal_values() {
        assert!(ne(&1, &2, "differ").is_ok());
        assert!(ne(&2, &2, "differ").is_err());
    }

    #[test]
    fn str_eq_is_bytewise() {
        assert!(str_eq("abc", "abc", "same").is_ok());
        assert!(str_eq("abc", "abC", "case").is_err());
        assert!(str_eq("e\u{301}", "\u{e9}", "no normalization").is_err());
        let failure = str_eq("got", "want", "quoted").unwrap_err();
        assert_eq!(failure.detail.as_deref(), Some("Expected: \"want\", Got: \"got\""));
    }

    #[test]
    fn nullability() {
        let value = 7;
        let raw: *const i32 = &value;
        let null: *mut u8 = std::ptr::null_mut();
        assert!(some(&Some(1), "option").is_ok());
        assert!(some(&raw, "raw").is_ok());
        assert!(some(&null, "null").is_err());
        assert!(none(&None::<u8>, "none").is_ok());
        assert!(none(&null, "null").is_ok());
        assert!(none(&NonNull::from(&value), "non-null").is_err());
    }

    #[test]
    fn array_mismatch_at_any_position_fails() {
        let expected = [1, 2, 3, 4, 5];
        assert!(array_eq(&[1, 2, 3, 4, 5], &expected, 5, "equal").is_ok());
        for i in 0..expected.len() {
            let mut actual = expected;
            actual[i] = 0;
            assert_eq!(first_mismatch(&actual, &expected, 5), Some(i));
            assert!(array_eq(&actual, &expected, 5, "differs").is_err());
        }
    }

    #[test]
    fn array_prefix_comparison_and_bad_length() {
        assert!(array_eq(&[1, 2, 9], &[1, 2, 3], 2, "prefix").is_ok());
        let failure = array_eq(&[1, 2], &[1, 2, 3], 3, "too long").unwrap_err();
        assert!(failure.detail.unwrap().contains("exceeds"));
    }

    #[test]
    fn float_eq_is_symmetric_and_inclusive() {
        assert!(float_eq(3.14159, 3.14160, 0.001, "pi").is_ok());
        assert!(float_eq(3.14160, 3.14159, 0.001, "pi swapped").is_ok());
        assert!(float_eq(3.14159, 3.2, 0.001, "far").is_err());
        assert!(float_eq(1.0, 1.5, 0.5, "on the edge").is_ok());
        assert!(float_eq(f64::NAN, f64::NAN, 1.0, "nan").is_err());
    }

    #[test]
    fn range_is_inclusive() {
        assert!(in_range(1, 1, 100, "low edge").is_ok());
        assert!(in_range(100, 1, 100, "high edge").is_ok());
        assert!(in_range(0, 1, 100, "below").is_err());
        assert!(in_range(101, 1, 100, "above").is_err());
        let failure = in_range(0, 1, 100, "below").unwrap_err();
        assert_eq!(failure.detail.as_deref(), Some("Value 0 not in range [1, 100]"));
    }

    #[test]
    fn overflow_is_static_comparison() {
        assert!(no_overflow(10, 10, "fits").is_ok());
        assert!(no_overflow(10, 11, "overflows").is_err());
    }

    #[test]
    fn file_probe() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(file_exists(file.path(), "present").is_ok());
        let missing = file.path().with_extension("missing");
        assert!(file_exists(&missing, "absent").is_err());
    }

    fn unit_with_macros(product: i32) -> crate::TestResult {
        test_assert!(product > 0, "positive");
        test_assert_eq!(product, 20, String::from("product is 20"));
        test_assert_in_range!(product, 1, 100, "in range");
        crate::TestResult::Ok
    }

    #[test]
    fn macros_return_failed_early() {
        assert_eq!(unit_with_macros(4 * 5), crate::TestResult::Ok);
        assert_eq!(unit_with_macros(21), crate::TestResult::Failed);
        assert_eq!(unit_with_macros(-1), crate::TestResult::Failed);
    }

    fn unit_with_skip(skip: bool) -> crate::TestResult {
        test_skip!(skip, "not today");
        test_assert!(false, "unreached when skipped");
        crate::TestResult::Ok
    }

    #[test]
    fn skip_short_circuits() {
        assert_eq!(unit_with_skip(true), crate::TestResult::Skipped);
        assert_eq!(unit_with_skip(false), crate::TestResult::Failed);
    }

    fn unit_with_buffer(write: usize) -> crate::TestResult {
        let buffer = [0u8; 16];
        test_buffer_overflow!(buffer, write, "write fits");
        crate::TestResult::Ok
    }

    fn unit_with_heap_buffers(write: usize) -> crate::TestResult {
        let heap = vec![0u8; 100];
        test_buffer_overflow!(heap, write, "write fits the vec");
        let slice: &[u8] = &heap[..];
        test_buffer_overflow!(slice, write, "write fits the slice");
        crate::TestResult::Ok
    }

    fn unit_with_declared_size(size: usize, write: usize) -> crate::TestResult {
        let buffer = [0u8; 64];
        test_buffer_overflow!(buffer, size, write, "write fits the declared size");
        crate::TestResult::Ok
    }

    #[test]
    fn buffer_macro_uses_buffer_size() {
        assert_eq!(unit_with_buffer(16), crate::TestResult::Ok);
        assert_eq!(unit_with_buffer(17), crate::TestResult::Failed);
    }

    #[test]
    fn heap_and_slice_buffers_measure_their_storage() {
        let heap = vec![0u8; 100];
        assert_eq!(byte_capacity(&heap), 100);
        assert_eq!(byte_capacity(&&heap[..10]), 10);
        assert_eq!(byte_capacity(&[0u32; 4]), 16);
        assert_eq!(unit_with_heap_buffers(50), crate::TestResult::Ok);
        assert_eq!(unit_with_heap_buffers(100), crate::TestResult::Ok);
        assert_eq!(unit_with_heap_buffers(101), crate::TestResult::Failed);
    }

    #[test]
    fn declared_size_overrides_storage() {
        assert_eq!(unit_with_declared_size(10, 10), crate::TestResult::Ok);
        assert_eq!(unit_with_declared_size(10, 15), crate::TestResult::Failed);
    }
}
