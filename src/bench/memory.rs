//! Process-wide allocation accounting
//!
//! [`CountingAllocator`] wraps the system allocator and keeps two running
//! totals: bytes ever allocated and number of allocations. The binary
//! installs it as the global allocator; [`AllocSnapshot::capture`] reads the
//! totals.
//!
//! The counters are process-wide. A delta between two snapshots includes
//! every allocation made by every thread in between, so measurements are
//! only meaningful while a single benchmark runs on a single thread.
//!
//! Deltas are comparable across resizers but not across codecs: the turbo
//! backend buffers the whole encoded input before decoding, which adds one
//! source-sized allocation to every call.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

static ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);
static ALLOCATIONS: AtomicU64 = AtomicU64::new(0);

/// System allocator wrapper that counts allocations.
///
/// ```rust,ignore
/// #[global_allocator]
/// static ALLOCATOR: resizebench::bench::CountingAllocator =
///     resizebench::bench::CountingAllocator::new();
/// ```
pub struct CountingAllocator {
    inner: System,
}

impl CountingAllocator {
    pub const fn new() -> Self {
        Self { inner: System }
    }

    #[inline]
    fn record(size: usize) {
        ALLOCATED_BYTES.fetch_add(size as u64, Ordering::Relaxed);
        ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for CountingAllocator {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc(layout);
        if !ptr.is_null() {
            Self::record(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = self.inner.alloc_zeroed(layout);
        if !ptr.is_null() {
            Self::record(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        self.inner.dealloc(ptr, layout)
    }

    // A grown block counts as a fresh allocation of the new size
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = self.inner.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            Self::record(new_size);
        }
        new_ptr
    }
}

/// Allocation totals at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllocSnapshot {
    /// Bytes ever allocated by the process
    pub allocated_bytes: u64,
    /// Allocations ever made by the process
    pub allocations: u64,
}

impl AllocSnapshot {
    /// Read the current totals
    pub fn capture() -> Self {
        Self {
            allocated_bytes: ALLOCATED_BYTES.load(Ordering::Relaxed),
            allocations: ALLOCATIONS.load(Ordering::Relaxed),
        }
    }

    /// Growth since `earlier`
    pub fn since(&self, earlier: &AllocSnapshot) -> AllocSnapshot {
        AllocSnapshot {
            allocated_bytes: self.allocated_bytes.saturating_sub(earlier.allocated_bytes),
            allocations: self.allocations.saturating_sub(earlier.allocations),
        }
    }
}

/// Whether [`CountingAllocator`] is the global allocator of this process.
///
/// Every Rust program allocates before `main`, so zero counters mean the
/// allocator was never installed and all deltas will read zero.
pub fn is_tracking() -> bool {
    ALLOCATIONS.load(Ordering::Relaxed) > 0
}
