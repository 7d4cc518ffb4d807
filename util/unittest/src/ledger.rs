// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Allocation ledger for advisory leak reports.

use tlogger::{teprintln, tprintln};

use crate::assert::Nullable;

/// Tracked allocations against tracked frees.
///
/// Both counters only ever grow. Null pointers are not counted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AllocationLedger {
    allocated: usize,
    freed: usize,
}

impl AllocationLedger {
    pub const fn new() -> Self {
        Self {
            allocated: 0,
            freed: 0,
        }
    }

    pub fn track_alloc<P: Nullable + ?Sized>(&mut self, ptr: &P) {
        if !ptr.is_null_ptr() {
            self.allocated += 1;
        }
    }

    pub fn track_free<P: Nullable + ?Sized>(&mut self, ptr: &P) {
        if !ptr.is_null_ptr() {
            self.freed += 1;
        }
    }

    #[inline]
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    #[inline]
    pub fn freed(&self) -> usize {
        self.freed
    }

    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.allocated == self.freed
    }

    /// Prints `MEMORY LEAK: ...` or `MEMORY: All allocations freed ...`.
    ///
    /// Advisory only: returns whether the counts matched and fails nothing.
    pub fn check_leaks(&self) -> bool {
        let (mallocs, frees) = (self.allocated, self.freed);
        if self.is_balanced() {
            let _ = tprintln!("MEMORY: All allocations freed ({mallocs} mallocs, {frees} frees)");
            true
        } else {
            let _ = teprintln!("MEMORY LEAK: {mallocs} mallocs, {frees} frees");
            false
        }
    }
}
