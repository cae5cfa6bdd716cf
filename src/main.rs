//! ResizeBench CLI - side-by-side benchmark of image resizing libraries

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::bail;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use resizebench::bench::{memory, output, report, CountingAllocator};
use resizebench::config::{DEFAULT_ITERATIONS, DEFAULT_OUTPUT_DIR};
use resizebench::{
    init_logging, system_info, Benchmark, CodecKind, Config, ResizerDescriptor, ResizerRegistry,
    SourceImage, TargetBounds, VERSION,
};

#[global_allocator]
static ALLOCATOR: CountingAllocator = CountingAllocator::new();

/// ResizeBench - compare image resizing libraries
#[derive(Parser)]
#[command(
    name = "resizebench",
    version,
    about = "Benchmark JPEG resizing across Rust imaging libraries",
    long_about = "ResizeBench decodes a JPEG, shrinks it with every selected resizer and \
                  re-encodes it, measuring wall-clock time, allocated bytes, allocation \
                  count and output size for each one."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Resizer selection file; an empty value selects every resizer
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    config_file: Option<String>,

    /// Output directory for single-pass images
    #[arg(short, long, global = true, default_value = DEFAULT_OUTPUT_DIR, value_name = "DIR")]
    out: PathBuf,

    /// Target width in pixels (0 = derive from height)
    #[arg(
        short = 'W',
        long,
        global = true,
        default_value_t = 0,
        allow_negative_numbers = true,
        value_name = "PIXELS"
    )]
    width: i64,

    /// Target height in pixels (0 = derive from width)
    #[arg(
        short = 'H',
        long,
        global = true,
        default_value_t = 0,
        allow_negative_numbers = true,
        value_name = "PIXELS"
    )]
    height: i64,

    /// Use the pure-software JPEG codec
    #[arg(long, global = true)]
    native: bool,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available resizers
    List,
    /// Resize once with every resizer, writing the results to the output directory
    Run {
        /// Source JPEG (only the first one is used)
        #[arg(value_name = "IMAGE")]
        images: Vec<PathBuf>,
    },
    /// Resize repeatedly in memory and report averages
    Bench {
        /// Source JPEG (only the first one is used)
        #[arg(value_name = "IMAGE")]
        images: Vec<PathBuf>,

        /// Iterations per resizer
        #[arg(short = 'n', long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: u32,
    },
    /// Remove the output directory
    Clean,
    /// Show system information and capabilities
    Info,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    init_logging(log_level);

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", style("Error").red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let registry = ResizerRegistry::builtin()?;

    match &cli.command {
        Commands::List => list(cli, &registry),
        Commands::Run { images } => single_pass(cli, &registry, images),
        Commands::Bench { images, iterations } => repeated(cli, &registry, images, *iterations),
        Commands::Clean => clean(cli),
        Commands::Info => show_info(cli, &registry),
    }
}

/// Shared validation of `run` and `bench`, in reporting order
fn prepare<'r>(
    cli: &Cli,
    registry: &'r ResizerRegistry,
    images: &'r [PathBuf],
) -> anyhow::Result<(Vec<&'r ResizerDescriptor>, TargetBounds, &'r Path)> {
    let config = Config::discover(cli.config_file.as_deref().map(Path::new))?;
    let selected = config.select(registry)?;
    let bounds = TargetBounds::new(cli.width, cli.height)?;

    let Some(first) = images.first() else {
        bail!("No images provided");
    };
    if images.len() > 1 {
        warn!(
            "Taking only the first argument '{}', others are ignored",
            first.display()
        );
    }

    Ok((selected, bounds, first.as_path()))
}

fn progress_bar(cli: &Cli) -> anyhow::Result<ProgressBar> {
    if cli.quiet || cli.json {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn single_pass(cli: &Cli, registry: &ResizerRegistry, images: &[PathBuf]) -> anyhow::Result<()> {
    let (selected, bounds, path) = prepare(cli, registry, images)?;
    let codec = CodecKind::from_native_flag(cli.native).codec();
    let source = SourceImage::load(path)?;

    let bench = Benchmark::new(codec.as_ref(), bounds).with_progress(progress_bar(cli)?);
    let results = bench.run_single_pass(&source, &cli.out, &selected)?;

    let mut stdout = io::stdout().lock();
    if cli.json {
        report::write_json(&mut stdout, &results)?;
    } else {
        report::write_single_pass(&mut stdout, &results)?;
    }
    Ok(())
}

fn repeated(
    cli: &Cli,
    registry: &ResizerRegistry,
    images: &[PathBuf],
    iterations: u32,
) -> anyhow::Result<()> {
    let (selected, bounds, path) = prepare(cli, registry, images)?;
    let codec = CodecKind::from_native_flag(cli.native).codec();
    let source = SourceImage::load(path)?;

    let bench = Benchmark::new(codec.as_ref(), bounds).with_progress(progress_bar(cli)?);
    let results = bench.run_repeated(&source, iterations, &selected)?;

    let mut stdout = io::stdout().lock();
    if cli.json {
        report::write_json(&mut stdout, &results)?;
    } else {
        report::write_repeated(&mut stdout, &results)?;
    }
    Ok(())
}

fn list(cli: &Cli, registry: &ResizerRegistry) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();

    if cli.json {
        let entries: Vec<_> = registry
            .list_all()
            .iter()
            .map(|r| {
                serde_json::json!({
                    "name": r.name(),
                    "library": r.library(),
                    "url": r.url(),
                    "filter": r.filter(),
                })
            })
            .collect();
        report::write_json(&mut stdout, &entries)?;
    } else {
        report::write_resizer_list(&mut stdout, registry)?;
    }
    Ok(())
}

fn clean(cli: &Cli) -> anyhow::Result<()> {
    let removed = output::clean(&cli.out)?;

    if !cli.quiet {
        println!(
            "{}: removed {} files from {}",
            style("Clean").green().bold(),
            removed,
            cli.out.display()
        );
    }
    Ok(())
}

fn show_info(cli: &Cli, registry: &ResizerRegistry) -> anyhow::Result<()> {
    let system = system_info();

    if cli.json {
        let value = serde_json::json!({
            "version": VERSION,
            "allocation_tracking": memory::is_tracking(),
            "codecs": ["native", "turbo"],
            "default_codec": CodecKind::from_native_flag(false),
            "resizers": registry.len(),
            "system": system,
        });
        report::write_json(&mut io::stdout().lock(), &value)?;
        return Ok(());
    }

    let mut out = io::stdout().lock();
    writeln!(out, "{}", style("ResizeBench System Information").bold())?;
    writeln!(out)?;
    writeln!(out, "{}: {}", style("Version").bold(), VERSION)?;
    writeln!(
        out,
        "{}: {}",
        style("Allocation tracking").bold(),
        if memory::is_tracking() { "enabled" } else { "disabled" }
    )?;
    writeln!(out, "{}: native (image), turbo (zune-jpeg + jpeg-encoder, default)", style("Codecs").bold())?;
    writeln!(out, "{}: {}", style("Resizers").bold(), registry.len())?;
    writeln!(out)?;

    writeln!(out, "{}", style("System:").bold())?;
    if let Some(name) = &system.os {
        writeln!(out, "  OS: {}", name)?;
    }
    if let Some(version) = &system.os_version {
        writeln!(out, "  Version: {}", version)?;
    }
    writeln!(out, "  CPUs: {}", system.logical_cpus)?;
    if let Some(brand) = &system.cpu_brand {
        let ghz = system.cpu_frequency_mhz.unwrap_or(0) as f64 / 1000.0;
        writeln!(out, "  CPU: {} ({:.2} GHz)", brand, ghz)?;
    }
    writeln!(
        out,
        "  Memory: {:.2} GB total, {:.2} GB available",
        system.total_memory as f64 / 1024.0 / 1024.0 / 1024.0,
        system.available_memory as f64 / 1024.0 / 1024.0 / 1024.0
    )?;

    info!("{} resizers registered", registry.len());
    Ok(())
}
