//! ResizeBench - JPEG resize benchmark harness
//!
//! Compares resampling libraries on the same input: every resizer decodes
//! a JPEG with the active codec, shrinks it to fit a bounding box and
//! encodes it again, while the harness measures wall-clock time, bytes
//! allocated, allocation count and output size.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use resizebench::bench::{report, Benchmark, SourceImage};
//! use resizebench::config::TargetBounds;
//! use resizebench::processing::TurboJpeg;
//! use resizebench::ResizerRegistry;
//!
//! let registry = ResizerRegistry::builtin()?;
//! let selected = registry.resolve_subset(&["fir__bilinear", "image__lanczos3"])?;
//! let source = SourceImage::load("photo.jpg")?;
//!
//! let bench = Benchmark::new(&TurboJpeg, TargetBounds::new(800, 0)?);
//! let results = bench.run_repeated(&source, 100, &selected)?;
//! report::write_repeated(&mut std::io::stdout(), &results)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Allocation figures are only collected when the binary installs
//! [`bench::CountingAllocator`] as its global allocator.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bench;
pub mod config;
pub mod error;
pub mod processing;
pub mod registry;

// Re-export commonly used types
pub use bench::{Benchmark, BenchmarkSample, SourceImage};
pub use config::{Config, TargetBounds};
pub use error::{BenchError, Result};
pub use processing::{CodecKind, JpegCodec, ResizeStrategy};
pub use registry::{ResizerDescriptor, ResizerRegistry};

use serde::Serialize;
use tracing::debug;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the global `tracing` subscriber.
///
/// `level` is the default filter; `RUST_LOG` wins when set. Logs go to
/// stderr so report tables on stdout stay machine-readable. Calling this
/// more than once is harmless.
pub fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
    {
        debug!("ResizeBench v{} logging initialized", VERSION);
    }
}

/// Host details printed alongside benchmark results
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub os: Option<String>,
    pub os_version: Option<String>,
    pub cpu_brand: Option<String>,
    pub cpu_frequency_mhz: Option<u64>,
    pub logical_cpus: usize,
    pub physical_cores: Option<usize>,
    pub total_memory: u64,
    pub available_memory: u64,
}

/// Collect host details
pub fn system_info() -> SystemInfo {
    use sysinfo::{CpuExt, System, SystemExt};

    let mut system = System::new_all();
    system.refresh_all();

    let cpu = system.cpus().first();
    SystemInfo {
        os: system.name(),
        os_version: system.os_version(),
        cpu_brand: cpu.map(|c| c.brand().to_string()),
        cpu_frequency_mhz: cpu.map(|c| c.frequency()),
        logical_cpus: system.cpus().len(),
        physical_cores: system.physical_core_count(),
        total_memory: system.total_memory(),
        available_memory: system.available_memory(),
    }
}
