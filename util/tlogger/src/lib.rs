// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Console output and `log` backend for the unittest toolkit.
//!
//! Two separate channels live here:
//! - [`print_fmt`] / [`eprint_fmt`] (and the [`tprintln!`] / [`teprintln!`]
//!   macros) carry the human-readable test report lines.
//! - [`TestLogger`] is a `log::Log` backend for diagnostics about the toolkit
//!   itself. It is silent above `Warn` unless raised with [`set_log_level`] or
//!   the `UNITTEST_LOG` environment variable.

extern crate log;

use std::{
    fmt,
    io::{self, Write},
    str::FromStr,
};

use log::{Level, LevelFilter, Log, Metadata, Record};
pub use log::{debug, error, info, trace, warn};

/// Environment variable consulted by [`init_from_env`].
pub const LOG_ENV: &str = "UNITTEST_LOG";

#[macro_export]
macro_rules! tprint {
    ($($arg:tt)*) => {
        $crate::print_fmt(format_args!($($arg)*))
    }
}

#[macro_export]
macro_rules! tprintln {
    () => { $crate::tprint!("\n") };
    ($($arg:tt)*) => {
        $crate::print_fmt(format_args!("{}\n", format_args!($($arg)*)))
    }
}

#[macro_export]
macro_rules! teprintln {
    () => { $crate::eprint_fmt(format_args!("\n")) };
    ($($arg:tt)*) => {
        $crate::eprint_fmt(format_args!("{}\n", format_args!($($arg)*)))
    }
}

macro_rules! color_fmt {
    ($color_code:expr, $($arg:tt)*) => {
        format_args!("\u{1B}[{}m{}\u{1B}[m", $color_code as u8, format_args!($($arg)*))
    };
}

#[repr(u8)]
#[allow(dead_code)]
enum AnsiColor {
    Red         = 31,
    Green       = 32,
    Yellow      = 33,
    Cyan        = 36,
    White       = 37,
    BrightBlack = 90,
}

struct TestLogger;

impl Log for TestLogger {
    #[inline]
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = record.level();
        let line = record.line().unwrap_or(0);
        let path = record.target();
        let time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f");

        cfg_if::cfg_if! {
            if #[cfg(feature = "color")] {
                let color = match level {
                    Level::Error => AnsiColor::Red,
                    Level::Warn => AnsiColor::Yellow,
                    Level::Info => AnsiColor::Green,
                    Level::Debug => AnsiColor::Cyan,
                    Level::Trace => AnsiColor::BrightBlack,
                };
                let _ = eprint_fmt(color_fmt!(
                    AnsiColor::White,
                    "[{time} {path}:{line}] {args}\n",
                    time = time,
                    path = path,
                    line = line,
                    args = color_fmt!(color, "{}", record.args()),
                ));
            } else {
                let _ = eprint_fmt(format_args!(
                    "[{time} {level:<5} {path}:{line}] {args}\n",
                    time = time,
                    level = level,
                    path = path,
                    line = line,
                    args = record.args(),
                ));
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Writes to stdout.
///
/// Goes through `print!` so the libtest harness can capture it.
pub fn print_fmt(args: fmt::Arguments) -> fmt::Result {
    print!("{args}");
    Ok(())
}

/// Writes to stderr.
pub fn eprint_fmt(args: fmt::Arguments) -> fmt::Result {
    eprint!("{args}");
    Ok(())
}

/// Installs the logger with a `Warn` ceiling.
///
/// Installing twice is harmless: the second call keeps the first logger.
pub fn init_tlogger() {
    if log::set_logger(&TestLogger).is_ok() {
        log::set_max_level(LevelFilter::Warn);
    }
}

/// Installs the logger and applies `UNITTEST_LOG` when it is set.
pub fn init_from_env() {
    init_tlogger();
    if let Ok(level) = std::env::var(LOG_ENV) {
        set_log_level(&level);
    }
}

/// Sets the maximum level from a name such as `"debug"`.
///
/// Unknown names turn logging off.
pub fn set_log_level(level: &str) {
    log::set_max_level(parse_level(level));
}

fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level.trim())
        .ok()
        .unwrap_or(LevelFilter::Off)
}
