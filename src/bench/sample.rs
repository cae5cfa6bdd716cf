//! Per-resizer measurement accumulator

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::bench::memory::AllocSnapshot;
use crate::error::BenchError;

// Set while any sample window is open
static WINDOW_OPEN: AtomicBool = AtomicBool::new(false);

/// Why a repeated run stopped early
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleFailure {
    /// 1-based iteration that failed
    pub iteration: u64,
    pub message: String,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    memory: AllocSnapshot,
}

/// Cost of running one resizer.
///
/// [`start`](Self::start) and [`stop`](Self::stop) bracket a measurement
/// window; each stop adds the elapsed time and allocation growth of that
/// window to the totals. Averages are derived from the totals and the
/// number of completed iterations, and read zero when nothing completed.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkSample {
    pub resizer: String,
    pub library: String,
    /// Completed (successful) iterations
    pub iterations: u64,
    pub total_duration: Duration,
    pub total_bytes: u64,
    pub total_allocations: u64,
    /// Bytes of encoded output across completed iterations
    pub total_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<SampleFailure>,
    #[serde(skip)]
    window: Option<Window>,
}

impl BenchmarkSample {
    pub fn new(resizer: impl Into<String>, library: impl Into<String>) -> Self {
        Self {
            resizer: resizer.into(),
            library: library.into(),
            iterations: 0,
            total_duration: Duration::ZERO,
            total_bytes: 0,
            total_allocations: 0,
            total_size: 0,
            output_path: None,
            failure: None,
            window: None,
        }
    }

    /// Open a measurement window
    pub fn start(&mut self) {
        if WINDOW_OPEN.swap(true, Ordering::SeqCst) {
            warn!(
                "{}: another sample window is open, allocation counts include its activity",
                self.resizer
            );
        }

        self.window = Some(Window {
            memory: AllocSnapshot::capture(),
            started: Instant::now(),
        });
    }

    /// Close the window and add its deltas to the totals
    pub fn stop(&mut self) {
        let ended = Instant::now();
        let memory = AllocSnapshot::capture();

        let Some(window) = self.window.take() else {
            debug!("{}: stop() without start()", self.resizer);
            return;
        };
        WINDOW_OPEN.store(false, Ordering::SeqCst);

        let delta = memory.since(&window.memory);
        self.total_duration += ended.duration_since(window.started);
        self.total_bytes += delta.allocated_bytes;
        self.total_allocations += delta.allocations;
    }

    /// Close the window without adding anything to the totals
    pub fn discard(&mut self) {
        if self.window.take().is_some() {
            WINDOW_OPEN.store(false, Ordering::SeqCst);
        }
    }

    /// Count one successful iteration that produced `output_bytes`
    pub fn record_iteration(&mut self, output_bytes: u64) {
        self.iterations += 1;
        self.total_size += output_bytes;
    }

    /// Remember the error that ended the run at `iteration`
    pub fn record_failure(&mut self, iteration: u64, error: &BenchError) {
        self.failure = Some(SampleFailure {
            iteration,
            message: error.to_string(),
        });
    }

    pub fn is_running(&self) -> bool {
        self.window.is_some()
    }

    pub fn avg_duration(&self) -> Duration {
        match u32::try_from(self.iterations) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.total_duration / n,
            Err(_) => Duration::from_nanos(
                (self.total_duration.as_nanos() / u128::from(self.iterations)) as u64,
            ),
        }
    }

    pub fn avg_bytes(&self) -> u64 {
        self.per_iteration(self.total_bytes)
    }

    pub fn avg_allocations(&self) -> u64 {
        self.per_iteration(self.total_allocations)
    }

    pub fn avg_size(&self) -> u64 {
        self.per_iteration(self.total_size)
    }

    fn per_iteration(&self, total: u64) -> u64 {
        total.checked_div(self.iterations).unwrap_or(0)
    }
}
