// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Benchmark timers.
//!
//! A [`Benchmark`] is a value, so several can run at once and nest freely.

use std::time::{Duration, Instant};

use tlogger::tprintln;

/// Which clock a [`Benchmark`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// CPU time consumed by the whole process
    Cpu,
    /// Monotonic wall-clock time
    Wall,
}

#[derive(Debug, Clone, Copy)]
enum Start {
    Cpu(Duration),
    Wall(Instant),
}

/// A started timer.
#[derive(Debug, Clone, Copy)]
#[must_use = "a benchmark measures nothing until it is ended"]
pub struct Benchmark {
    start: Start,
}

impl Benchmark {
    /// Starts a process CPU time measurement.
    pub fn start() -> Self {
        Self::with_clock(Clock::Cpu)
    }

    pub fn start_wall() -> Self {
        Self::with_clock(Clock::Wall)
    }

    pub fn with_clock(clock: Clock) -> Self {
        let start = match clock {
            Clock::Cpu => Start::Cpu(cpu_time()),
            Clock::Wall => Start::Wall(Instant::now()),
        };
        Self { start }
    }

    pub fn clock(&self) -> Clock {
        match self.start {
            Start::Cpu(_) => Clock::Cpu,
            Start::Wall(_) => Clock::Wall,
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self.start {
            Start::Cpu(start) => cpu_time().saturating_sub(start),
            Start::Wall(start) => start.elapsed(),
        }
    }

    /// Prints `BENCHMARK: <name> took <secs> seconds` and returns the time.
    pub fn end(self, name: &str) -> Duration {
        let elapsed = self.elapsed();
        let _ = tprintln!(
            "BENCHMARK: {name} took {:.6} seconds",
            elapsed.as_secs_f64()
        );
        elapsed
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        /// CPU time consumed by this process so far.
        pub fn cpu_time() -> Duration {
            // SAFETY: timespec is plain old data; all-zero is a valid value.
            let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
            // SAFETY: `ts` is a valid, writable timespec.
            let ret = unsafe { libc::clock_gettime(libc::CLOCK_PROCESS_CPUTIME_ID, &mut ts) };
            if ret != 0 {
                log::warn!(
                    "clock_gettime(CLOCK_PROCESS_CPUTIME_ID) failed: {}",
                    std::io::Error::last_os_error()
                );
                return Duration::ZERO;
            }
            Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32)
        }
    } else {
        /// Wall time since the first call; no portable CPU clock here.
        pub fn cpu_time() -> Duration {
            static EPOCH: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
            EPOCH.get_or_init(Instant::now).elapsed()
        }
    }
}

/// Times `body` on the CPU clock and prints the result: `benchmark!("name", { ... })`.
#[macro_export]
macro_rules! benchmark {
    ($name:expr, $body:block $(,)?) => {{
        let __bench = $crate::bench::Benchmark::start();
        let __value = $body;
        let _ = __bench.end($crate::__msg!($name));
        __value
    }};
}
