//! Memory diagnostics for the embedding host.
//!
//! The host runs a garbage collected runtime and wants to reason about the native side's
//! footprint. There is no collector here: a reclamation pass only counts the request and
//! resets the reserved high-water mark, and the numbers come from [`TrackingAllocator`]
//! when the `alloc-stats` feature installs it as the global allocator.
//!
//! Nothing in this module is reachable from the verification path.
use cfg_if::cfg_if;
use std::{
    alloc::{GlobalAlloc, Layout, System},
    sync::atomic::{AtomicU64, AtomicUsize, Ordering},
};

/// Number of reclamation passes requested so far.
static RECLAIM_CYCLES: AtomicU64 = AtomicU64::new(0);

cfg_if! {
    if #[cfg(feature = "alloc-stats")] {
        #[global_allocator]
        static GLOBAL: TrackingAllocator<System> = TrackingAllocator::new(System);

        fn tracker() -> Option<&'static TrackingAllocator<System>> {
            Some(&GLOBAL)
        }
    } else {
        fn tracker() -> Option<&'static TrackingAllocator<System>> {
            None
        }
    }
}

/// Point-in-time memory statistics, all sizes in bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct MemoryStats {
    /// Bytes currently allocated.
    pub allocated: u64,
    /// Bytes allocated since start, never decreases.
    pub total_allocated: u64,
    /// Most bytes held at once since the last reclamation pass.
    pub reserved: u64,
    /// Reclamation passes requested so far.
    pub reclaim_cycles: u64,
}

/// Statistics taken around a reclamation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct MemoryReport {
    /// Before the pass.
    pub before: MemoryStats,
    /// After the pass.
    pub after: MemoryStats,
}

/// Allocator wrapper counting the bytes that flow through it.
///
/// Counters use relaxed atomics; they are diagnostics and order nothing.
#[derive(Debug)]
pub struct TrackingAllocator<A> {
    inner: A,
    allocated: AtomicUsize,
    total_allocated: AtomicU64,
    peak: AtomicUsize,
}

impl<A> TrackingAllocator<A> {
    /// Wraps `inner`.
    pub const fn new(inner: A) -> Self {
        Self {
            inner,
            allocated: AtomicUsize::new(0),
            total_allocated: AtomicU64::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Bytes currently allocated.
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }

    /// Bytes allocated since creation.
    pub fn total_allocated(&self) -> u64 {
        self.total_allocated.load(Ordering::Relaxed)
    }

    /// Highest value of [`Self::allocated`] since creation or the last [`Self::reset_peak`].
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }

    /// Lowers the high-water mark to the current allocation.
    pub fn reset_peak(&self) {
        self.peak.store(self.allocated(), Ordering::Relaxed);
    }

    fn record_alloc(&self, size: usize) {
        let current = self.allocated.fetch_add(size, Ordering::Relaxed) + size;
        self.total_allocated.fetch_add(size as u64, Ordering::Relaxed);
        self.peak.fetch_max(current, Ordering::Relaxed);
    }

    fn record_dealloc(&self, size: usize) {
        self.allocated.fetch_sub(size, Ordering::Relaxed);
    }
}

// Must not allocate or log: both would recurse into the allocator.
unsafe impl<A: GlobalAlloc> GlobalAlloc for TrackingAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc(layout) };
        if !ptr.is_null() {
            self.record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc_zeroed(layout) };
        if !ptr.is_null() {
            self.record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { self.inner.dealloc(ptr, layout) };
        self.record_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { self.inner.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            self.record_dealloc(layout.size());
            self.record_alloc(new_size);
        }
        new_ptr
    }
}

/// Returns the current statistics. Allocation figures are zero without `alloc-stats`.
pub fn memory_stats() -> MemoryStats {
    let reclaim_cycles = RECLAIM_CYCLES.load(Ordering::Relaxed);
    match tracker() {
        Some(tracker) => MemoryStats {
            allocated: tracker.allocated() as u64,
            total_allocated: tracker.total_allocated(),
            reserved: tracker.peak() as u64,
            reclaim_cycles,
        },
        None => MemoryStats {
            reclaim_cycles,
            ..Default::default()
        },
    }
}

/// Performs a reclamation pass.
pub fn reclaim() {
    let cycle = RECLAIM_CYCLES.fetch_add(1, Ordering::Relaxed) + 1;
    if let Some(tracker) = tracker() {
        tracker.reset_peak();
    }
    log::debug!("gc: reclamation pass {cycle}");
}

/// Performs a reclamation pass and returns statistics from before and after it.
pub fn report() -> MemoryReport {
    let before = memory_stats();
    reclaim();
    let after = memory_stats();

    log::info!(
        "ReportGC:\n\tBefore: Alloc = {} TotalAlloc = {} Sys = {} NumGC = {}\n\tAfter Alloc = {} TotalAlloc = {} Sys = {} NumGC = {}",
        before.allocated / 1024,
        before.total_allocated / 1024,
        before.reserved / 1024,
        before.reclaim_cycles,
        after.allocated / 1024,
        after.total_allocated / 1024,
        after.reserved / 1024,
        after.reclaim_cycles,
    );

    MemoryReport { before, after }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_allocator_counts_bytes() {
        let tracker = TrackingAllocator::new(System);
        let layout = Layout::from_size_align(64, 8).unwrap();

        unsafe {
            let a = tracker.alloc(layout);
            let b = tracker.alloc_zeroed(layout);
            assert!(!a.is_null() && !b.is_null());
            assert_eq!(tracker.allocated(), 128);
            assert_eq!(tracker.peak(), 128);

            tracker.dealloc(a, layout);
            assert_eq!(tracker.allocated(), 64);
            assert_eq!(tracker.total_allocated(), 128);
            assert_eq!(tracker.peak(), 128);

            let b = tracker.realloc(b, layout, 256);
            assert!(!b.is_null());
            assert_eq!(tracker.allocated(), 256);
            assert_eq!(tracker.total_allocated(), 384);
            assert_eq!(tracker.peak(), 256);

            tracker.dealloc(b, Layout::from_size_align(256, 8).unwrap());
        }

        assert_eq!(tracker.allocated(), 0);
        assert_eq!(tracker.peak(), 256);
        tracker.reset_peak();
        assert_eq!(tracker.peak(), 0);
    }

    #[test]
    fn test_report_counts_a_cycle() {
        let report = report();
        assert!(report.after.reclaim_cycles > report.before.reclaim_cycles);
        assert!(report.after.total_allocated >= report.before.total_allocated);
    }

    #[cfg(feature = "alloc-stats")]
    #[test]
    fn test_global_tracker_sees_allocations() {
        let before = memory_stats().total_allocated;
        let buffer = vec![0u8; 4096];
        let after = memory_stats().total_allocated;
        assert!(after >= before + buffer.len() as u64);
    }

    #[cfg(not(feature = "alloc-stats"))]
    #[test]
    fn test_report_without_tracker_has_only_cycles() {
        let report = report();
        assert!(report.after.reclaim_cycles > report.before.reclaim_cycles);
        for stats in [report.before, report.after] {
            assert_eq!(stats.allocated, 0);
            assert_eq!(stats.total_allocated, 0);
            assert_eq!(stats.reserved, 0);
        }
    }
}
