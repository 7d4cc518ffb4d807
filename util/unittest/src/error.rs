// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Error types of the toolkit.
//!
//! Three severities never mix:
//! - [`Failure`] is a recoverable assertion failure local to one test unit.
//! - [`FatalError`] ends the whole process once terminated.
//! - [`SandboxError`] reports that the crash sandbox could not run at all.

use std::{fmt, io, panic::Location};

/// A failed assertion: what was asserted and, when known, how it differed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub detail: Option<String>,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} - {}", self.message, detail),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for Failure {}

/// Which guard tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalKind {
    /// A plain `check!` condition was false
    Check,
    /// A pointer that must not be null was null
    NullPointer,
    /// An index fell outside `[0, size)`
    Bounds,
    /// A system call returned `-1`
    Errno,
    /// An allocation produced nothing
    Alloc,
    /// A call returned an unexpected code
    ReturnCode,
    /// Code marked unreachable was reached
    Unreachable,
}

/// A violated precondition. Nothing can recover from it; see [`FatalError::terminate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalError {
    pub kind: FatalKind,
    pub message: String,
    pub location: &'static Location<'static>,
}

/// Exit status of a process ended by a fatal check.
pub const FATAL_EXIT_CODE: i32 = 1;

impl FatalError {
    #[track_caller]
    pub fn new(kind: FatalKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: Location::caller(),
        }
    }

    /// Prints the error with its source location and exits the process.
    pub fn terminate(self) -> ! {
        log::error!("fatal {:?} check tripped", self.kind);
        crate::report::error(&self.to_string());
        log::logger().flush();
        std::process::exit(FATAL_EXIT_CODE)
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.location.file();
        let line = self.location.line();
        let message = &self.message;
        match self.kind {
            FatalKind::Check | FatalKind::Errno | FatalKind::ReturnCode => {
                write!(f, "{message} ({file}:{line})")
            }
            FatalKind::NullPointer => {
                write!(f, "NULL POINTER DETECTED: {message} AT {file}:{line}")
            }
            FatalKind::Bounds => {
                write!(f, "BOUNDS CHECK FAILED: {message} at {file}:{line}")
            }
            FatalKind::Alloc => {
                write!(f, "MEMORY ALLOCATION FAILED: {message} at {file}:{line}")
            }
            FatalKind::Unreachable => {
                write!(f, "UNREACHABLE CODE REACHED: {message} at {file}:{line}")
            }
        }
    }
}

impl std::error::Error for FatalError {}

/// The crash sandbox could not produce a child process to observe.
#[derive(Debug)]
pub enum SandboxError {
    /// The path of the running executable is unknown
    CurrentExe(io::Error),
    /// The child process could not be started
    Spawn(io::Error),
    /// Waiting for the child process failed
    Wait(io::Error),
}

impl fmt::Display for SandboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SandboxError::CurrentExe(e) => write!(f, "cannot locate current executable: {e}"),
            SandboxError::Spawn(e) => write!(f, "spawn failed: {e}"),
            SandboxError::Wait(e) => write!(f, "wait failed: {e}"),
        }
    }
}

impl std::error::Error for SandboxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SandboxError::CurrentExe(e) | SandboxError::Spawn(e) | SandboxError::Wait(e) => {
                Some(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_display_with_and_without_detail() {
        assert_eq!(Failure::new("flag set").to_string(), "flag set");
        assert_eq!(
            Failure::with_detail("product", "Expected: 21, Got: 20").to_string(),
            "product - Expected: 21, Got: 20"
        );
    }

    #[test]
    fn fatal_display_carries_location() {
        let err = FatalError::new(FatalKind::Check, "ring must be empty");
        let line = err.location.line();
        let text = err.to_string();
        assert!(text.starts_with("ring must be empty ("));
        assert!(text.ends_with(&format!(":{line})")));
        assert!(text.contains("error.rs"));
    }

    #[test]
    fn fatal_display_prefixes_per_kind() {
        let null = FatalError::new(FatalKind::NullPointer, "head");
        assert!(null.to_string().starts_with("NULL POINTER DETECTED: head AT "));
        let alloc = FatalError::new(FatalKind::Alloc, "frame buffer");
        assert!(alloc.to_string().starts_with("MEMORY ALLOCATION FAILED: frame buffer at "));
        let unreachable = FatalError::new(FatalKind::Unreachable, "bad state");
        assert!(unreachable.to_string().starts_with("UNREACHABLE CODE REACHED: bad state at "));
    }

    #[test]
    fn sandbox_error_exposes_source() {
        let err = SandboxError::Spawn(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.to_string(), "spawn failed: gone");
        assert!(std::error::Error::source(&err).is_some());
    }
}
