//! Benchmark engine
//!
//! Drives the selected resizers against one source image and collects a
//! [`BenchmarkSample`] per resizer. Two modes:
//!
//! - single-pass: every resizer runs once on the file, writing a real
//!   output image. The first failure aborts the run.
//! - repeated: every resizer runs N times on an in-memory copy, only
//!   counting output bytes. A codec failure ends that resizer's iterations
//!   and the run moves on to the next one; any other failure aborts.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::TargetBounds;
use crate::error::{BenchError, ErrorContext, Result};
use crate::processing::{ensure_jpeg, probe_dimensions, JpegCodec};
use crate::registry::ResizerDescriptor;

pub mod memory;
pub mod output;
pub mod report;
pub mod sample;

pub use memory::{AllocSnapshot, CountingAllocator};
pub use sample::{BenchmarkSample, SampleFailure};

/// Validated input image
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl SourceImage {
    /// Read a JPEG file, checking its signature and header
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_path(path)?;
        Self::from_bytes(path, bytes)
    }

    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Result<Self> {
        let path = path.into();
        ensure_jpeg(&bytes, &path)?;
        let (width, height) = probe_dimensions(&bytes)?;

        debug!("Loaded {}: {}x{}, {} bytes", path.display(), width, height, bytes.len());
        Ok(Self {
            path,
            bytes,
            width,
            height,
        })
    }

    /// Encoded size in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn summary(&self) -> SourceSummary {
        SourceSummary {
            name: self.path.display().to_string(),
            size: self.size(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Source image metadata shown in report headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub name: String,
    pub size: u64,
    pub width: u32,
    pub height: u32,
}

/// Result of a single-pass run
#[derive(Debug, Clone, Serialize)]
pub struct SinglePassReport {
    pub source: SourceSummary,
    pub codec: String,
    pub bounds: TargetBounds,
    pub samples: Vec<BenchmarkSample>,
}

/// Result of a repeated run
#[derive(Debug, Clone, Serialize)]
pub struct RepeatedReport {
    pub source: SourceSummary,
    pub codec: String,
    pub bounds: TargetBounds,
    /// Requested iterations per resizer
    pub iterations: u32,
    pub samples: Vec<BenchmarkSample>,
}

impl RepeatedReport {
    /// Samples that stopped before the requested iteration count
    pub fn failures(&self) -> impl Iterator<Item = (&BenchmarkSample, &SampleFailure)> {
        self.samples
            .iter()
            .filter_map(|s| s.failure.as_ref().map(|f| (s, f)))
    }
}

/// Writer that drops everything and counts the bytes
#[derive(Debug, Default)]
pub struct CountingSink {
    written: u64,
}

impl CountingSink {
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl Write for CountingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs resizers with one codec and one target bounding box
pub struct Benchmark<'a> {
    codec: &'a dyn JpegCodec,
    bounds: TargetBounds,
    progress: ProgressBar,
}

impl<'a> Benchmark<'a> {
    pub fn new(codec: &'a dyn JpegCodec, bounds: TargetBounds) -> Self {
        Self {
            codec,
            bounds,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report progress on `progress`; its length is set by each run
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn bounds(&self) -> TargetBounds {
        self.bounds
    }

    /// Run every resizer once, writing output files into `out_dir`.
    ///
    /// Stops at the first failing resizer; files written by earlier
    /// resizers stay on disk.
    pub fn run_single_pass(
        &self,
        source: &SourceImage,
        out_dir: &Path,
        resizers: &[&ResizerDescriptor],
    ) -> Result<SinglePassReport> {
        std::fs::create_dir_all(out_dir).with_path(out_dir)?;

        let mut input = BufReader::new(File::open(&source.path).with_path(&source.path)?);
        let (width, height) = (self.bounds.width(), self.bounds.height());

        info!(
            "Single pass over {} resizers, target {}",
            resizers.len(),
            self.bounds
        );
        self.progress.set_length(resizers.len() as u64);

        let mut samples = Vec::with_capacity(resizers.len());
        for resizer in resizers {
            self.progress.set_message(resizer.name().to_string());
            input.seek(SeekFrom::Start(0)).with_path(&source.path)?;

            let path = output::output_path(out_dir, &source.path, resizer.name(), self.bounds);
            let mut writer = BufWriter::new(File::create(&path).with_path(&path)?);

            let mut sample = BenchmarkSample::new(resizer.name(), resizer.library());
            sample.start();
            let result = resizer
                .strategy()
                .resize(self.codec, &mut input, &mut writer, width, height);
            if let Err(e) = result {
                sample.discard();
                self.progress.abandon();
                return Err(BenchError::strategy_failed(
                    resizer.name(),
                    source.path.clone(),
                    e,
                ));
            }
            sample.stop();

            writer.flush().with_path(&path)?;
            let size = writer.get_ref().metadata().with_path(&path)?.len();
            sample.record_iteration(size);
            sample.output_path = Some(path);

            debug!("{}: {:?}, {} bytes", resizer.name(), sample.total_duration, size);
            samples.push(sample);
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        Ok(SinglePassReport {
            source: source.summary(),
            codec: self.codec.name().to_string(),
            bounds: self.bounds,
            samples,
        })
    }

    /// Run every resizer `iterations` times against the in-memory source.
    ///
    /// A resizer failing with a recoverable error keeps the totals of the
    /// iterations that completed before the failure. Any other error aborts
    /// the whole run.
    pub fn run_repeated(
        &self,
        source: &SourceImage,
        iterations: u32,
        resizers: &[&ResizerDescriptor],
    ) -> Result<RepeatedReport> {
        let (width, height) = (self.bounds.width(), self.bounds.height());
        let per_resizer = u64::from(iterations);

        info!(
            "{} iterations over {} resizers, target {}",
            iterations,
            resizers.len(),
            self.bounds
        );
        self.progress.set_length(per_resizer * resizers.len() as u64);

        let mut samples = Vec::with_capacity(resizers.len());
        for resizer in resizers {
            self.progress.set_message(resizer.name().to_string());
            let mut sample = BenchmarkSample::new(resizer.name(), resizer.library());

            for iteration in 1..=per_resizer {
                let mut input = Cursor::new(source.bytes.as_slice());
                let mut sink = CountingSink::default();

                sample.start();
                let result = resizer
                    .strategy()
                    .resize(self.codec, &mut input, &mut sink, width, height);
                match result {
                    Ok(()) => {
                        sample.stop();
                        sample.record_iteration(sink.written());
                        self.progress.inc(1);
                    }
                    Err(e) if !e.is_recoverable() => {
                        sample.discard();
                        self.progress.abandon();
                        return Err(BenchError::strategy_failed(
                            resizer.name(),
                            source.path.clone(),
                            e,
                        ));
                    }
                    Err(e) => {
                        sample.discard();
                        warn!(
                            "{}: Failed to resize '{}' on iteration {}: {}",
                            resizer.name(),
                            source.path.display(),
                            iteration,
                            e
                        );
                        sample.record_failure(iteration, &e);
                        self.progress.inc(per_resizer - iteration + 1);
                        break;
                    }
                }
            }

            debug!(
                "{}: {} iterations, avg {:?}",
                resizer.name(),
                sample.iterations,
                sample.avg_duration()
            );
            samples.push(sample);
        }
        self.progress.finish_and_clear();

        Ok(RepeatedReport {
            source: source.summary(),
            codec: self.codec.name().to_string(),
            bounds: self.bounds,
            iterations,
            samples,
        })
    }
}
