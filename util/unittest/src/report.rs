// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Console lines of the test report.
//!
//! Passing lines go to stdout, failures, errors and warnings to stderr.

use std::fmt;

use tlogger::{teprintln, tprintln};

/// Destination of a report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// The tagged kinds of report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Pass,
    Fail,
    Skip,
    Warning,
    Error,
}

impl Line {
    pub fn prefix(self) -> &'static str {
        match self {
            Line::Pass => "PASS",
            Line::Fail => "FAIL",
            Line::Skip => "SKIP",
            Line::Warning => "WARNING",
            Line::Error => "ERROR",
        }
    }

    pub fn stream(self) -> Stream {
        match self {
            Line::Pass | Line::Skip => Stream::Stdout,
            Line::Fail | Line::Warning | Line::Error => Stream::Stderr,
        }
    }

    /// `<PREFIX>: <message>`, without the newline.
    pub fn render(self, message: &str) -> String {
        format!("{}: {message}", self.prefix())
    }
}

fn emit(line: Line, message: &str) {
    let text = line.render(message);
    let _ = match line.stream() {
        Stream::Stdout => tprintln!("{text}"),
        Stream::Stderr => teprintln!("{text}"),
    };
}

pub fn pass(message: &str) {
    emit(Line::Pass, message);
}

pub fn fail(message: &str) {
    emit(Line::Fail, message);
}

/// Prints `SKIP: <message>`.
pub fn skip(message: &str) {
    emit(Line::Skip, message);
}

pub fn warning(message: &str) {
    emit(Line::Warning, message);
}

pub fn error(message: &str) {
    emit(Line::Error, message);
}

pub fn info(line: fmt::Arguments) {
    let _ = tprintln!("{line}");
}

pub fn info_err(line: fmt::Arguments) {
    let _ = teprintln!("{line}");
}
