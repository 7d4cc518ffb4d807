// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Crash sandbox.
//!
//! A block that is expected to crash runs in a separate process. The parent
//! re-invokes its own executable with the same arguments and
//! `UNITTEST_SANDBOX=<unit>#<n>` set, then blocks until that child exits.
//! The child runs the program again; the runner skips every unit except
//! `<unit>`, and inside it the `n`-th sandbox call runs its block instead of
//! spawning. A block that returns ends the child with status 0.
//!
//! The parent classifies the child's exit:
//! - status 0: the crash did not happen, the assertion fails.
//! - non-zero status or a signal: the crash happened, the assertion passes.
//! - [`SANDBOX_UNREACHED`]: the child never got to the block, it fails.
//!
//! There is no timeout. A child that hangs blocks the parent.

use std::{
    env, fmt,
    io::{self, Write},
    panic::{self, AssertUnwindSafe},
    process::{self, Command, ExitStatus, Stdio},
};

use crate::{
    assert::{Verdict, settle},
    config::SANDBOX_ENV,
    error::{Failure, SandboxError},
};

/// Exit status of a child that never reached its block.
pub const SANDBOX_UNREACHED: i32 = 86;
/// Exit status of a child whose block panicked.
pub const PANIC_EXIT_CODE: i32 = 101;

/// Which sandbox call a child process has to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxTarget {
    pub unit: String,
    /// Zero-based position of the call within the unit
    pub index: usize,
}

impl SandboxTarget {
    pub fn new(unit: impl Into<String>, index: usize) -> Self {
        Self {
            unit: unit.into(),
            index,
        }
    }

    /// Parses `<unit>#<n>`. Unit names may themselves contain `#`.
    pub fn parse(text: &str) -> Option<Self> {
        let (unit, index) = text.rsplit_once('#')?;
        if unit.is_empty() {
            return None;
        }
        Some(Self::new(unit, index.parse().ok()?))
    }

    pub fn is(&self, unit: &str, index: usize) -> bool {
        self.unit == unit && self.index == index
    }
}

impl fmt::Display for SandboxTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.unit, self.index)
    }
}

/// Which side of a sandbox the current process is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// A normal run
    Parent,
    /// A re-invocation that must execute one sandboxed block
    Child(SandboxTarget),
}

impl Role {
    /// Reads `UNITTEST_SANDBOX`; a malformed value counts as a normal run.
    pub fn detect() -> Self {
        match env::var(SANDBOX_ENV) {
            Ok(value) => match SandboxTarget::parse(&value) {
                Some(target) => Role::Child(target),
                None => {
                    log::warn!("ignoring malformed {SANDBOX_ENV}={value:?}");
                    Role::Parent
                }
            },
            Err(_) => Role::Parent,
        }
    }
}

/// How the child ended, as seen by the parent. Consumed right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrashExpectation {
    /// Exit code, present when the child exited on its own
    pub code: Option<i32>,
    /// Terminating signal, present when the child was killed
    pub signal: Option<i32>,
}

/// Reading of a [`CrashExpectation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashVerdict {
    /// Abnormal termination, what the test wanted
    Crashed,
    /// Exited with status 0
    DidNotCrash,
    /// The child never got to the block
    NotReached,
}

impl CrashExpectation {
    pub fn from_status(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
            signal: exit_signal(&status),
        }
    }

    #[inline]
    pub fn exited_normally(&self) -> bool {
        self.code.is_some()
    }

    pub fn classify(&self) -> CrashVerdict {
        match self.code {
            Some(0) => CrashVerdict::DidNotCrash,
            Some(SANDBOX_UNREACHED) => CrashVerdict::NotReached,
            Some(_) | None => CrashVerdict::Crashed,
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        fn exit_signal(status: &ExitStatus) -> Option<i32> {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        }
    } else {
        fn exit_signal(_status: &ExitStatus) -> Option<i32> {
            None
        }
    }
}

/// Starts the child for `target` and waits for it.
pub fn spawn_child(target: &SandboxTarget) -> Result<CrashExpectation, SandboxError> {
    let exe = env::current_exe().map_err(SandboxError::CurrentExe)?;
    // Keep our own pending output ahead of the child's.
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();

    let mut child = Command::new(&exe)
        .args(env::args_os().skip(1))
        .env(SANDBOX_ENV, target.to_string())
        .stdin(Stdio::null())
        .spawn()
        .map_err(SandboxError::Spawn)?;
    log::debug!("sandbox {target}: child pid {}", child.id());

    let status = child.wait().map_err(SandboxError::Wait)?;
    let expectation = CrashExpectation::from_status(status);
    log::debug!(
        "sandbox {target}: code {:?}, signal {:?}",
        expectation.code,
        expectation.signal
    );
    Ok(expectation)
}

/// The assertion message reported for a classified child.
pub fn describe(verdict: CrashVerdict, message: &str) -> String {
    match verdict {
        CrashVerdict::Crashed => format!("{message} (crashed as expected)"),
        CrashVerdict::DidNotCrash => format!("{message} (expected crash but didn't crash)"),
        CrashVerdict::NotReached => format!("{message} (sandbox block was never reached)"),
    }
}

/// Turns a finished (or failed) sandbox run into a verdict and prints it.
pub fn judge(observed: Result<CrashExpectation, SandboxError>, message: &str) -> Verdict {
    match observed {
        Ok(expectation) => {
            let verdict = expectation.classify();
            let text = describe(verdict, message);
            if verdict == CrashVerdict::Crashed {
                settle(Ok(()), &text)
            } else {
                settle(Err(Failure::new(text)), message)
            }
        }
        Err(err) => {
            log::error!("crash sandbox unavailable: {err}");
            settle(
                Err(Failure::with_detail("fork failed for crash test", err.to_string())),
                message,
            )
        }
    }
}

/// Parent side: run `target` in a child and judge how it ended.
pub fn expect_crash(target: &SandboxTarget, message: &str) -> Verdict {
    judge(spawn_child(target), message)
}

/// Child side: runs the block and exits 0 if it returns.
///
/// A panic in the block exits with [`PANIC_EXIT_CODE`]; crashes and fatal
/// checks end the process on their own.
pub fn run_in_child<F: FnOnce()>(block: F) -> ! {
    let outcome = panic::catch_unwind(AssertUnwindSafe(block));
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
    match outcome {
        Ok(()) => process::exit(0),
        Err(_) => process::exit(PANIC_EXIT_CODE),
    }
}

/// Child side: the target was not found. Exits with [`SANDBOX_UNREACHED`].
pub fn unreached(target: &SandboxTarget) -> ! {
    log::warn!("sandbox {target}: block never reached");
    let _ = io::stdout().flush();
    process::exit(SANDBOX_UNREACHED)
}
