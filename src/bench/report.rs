//! Plain-text and JSON rendering of benchmark results

use std::io::{self, Write};

use serde::Serialize;

use crate::bench::{RepeatedReport, SinglePassReport, SourceSummary};
use crate::error::Result;
use crate::registry::ResizerRegistry;

const KB: u64 = 1024;
// Not 1024: keeps the MB/GB columns comparable with published results
const MB: u64 = 1014 * KB;
const GB: u64 = 1014 * MB;

/// Human-readable byte count.
///
/// Thresholds are strict, so exactly 1024 bytes still prints as `1024B`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes > GB {
        format!("{:.2}GB", bytes as f32 / GB as f32)
    } else if bytes > MB {
        format!("{:.2}MB", bytes as f32 / MB as f32)
    } else if bytes > KB {
        format!("{:.2}KB", bytes as f32 / KB as f32)
    } else {
        format!("{}B", bytes)
    }
}

/// `part` as a percentage of `total`, two decimals
pub fn percent(part: u64, total: u64) -> String {
    if total == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", 100.0 * part as f64 / total as f64)
}

fn header_line(w: &mut dyn Write, columns: [&str; 5]) -> io::Result<()> {
    writeln!(
        w,
        "|{:<32}|{:<18}|{:<18}|{:<18}|{:<18}|",
        columns[0], columns[1], columns[2], columns[3], columns[4]
    )
}

fn separator_line(w: &mut dyn Write) -> io::Result<()> {
    let right = format!("{}:", "-".repeat(17));
    header_line(w, ["-".repeat(32).as_str(), &right, &right, &right, &right])
}

fn row(w: &mut dyn Write, name: &str, time: &str, size: &str, bytes: &str, allocs: u64) -> io::Result<()> {
    writeln!(
        w,
        "| {:<30} | {:<16} | {:<16} | {:<16} | {:<16} |",
        name, time, size, bytes, allocs
    )
}

fn source_line(w: &mut dyn Write, source: &SourceSummary) -> io::Result<()> {
    write!(
        w,
        "Original image: name={}, size={}, dimensions={}x{}\n\n",
        source.name,
        format_bytes(source.size),
        source.width,
        source.height
    )
}

/// Table of a single-pass run: totals and output size relative to the source
pub fn write_single_pass(w: &mut dyn Write, report: &SinglePassReport) -> io::Result<()> {
    source_line(w, &report.source)?;
    header_line(w, [" Name", " Time", " Size", " Bytes", "Mallocs"])?;
    separator_line(w)?;

    for sample in &report.samples {
        let size = format!(
            "{} ({})",
            format_bytes(sample.total_size),
            percent(sample.total_size, report.source.size)
        );
        row(
            w,
            &sample.resizer,
            &format!("{:?}", sample.total_duration),
            &size,
            &format_bytes(sample.total_bytes),
            sample.total_allocations,
        )?;
    }

    writeln!(w)
}

/// Table of a repeated run: per-iteration averages, then any failures
pub fn write_repeated(w: &mut dyn Write, report: &RepeatedReport) -> io::Result<()> {
    source_line(w, &report.source)?;
    writeln!(w, "#iterations: {}", report.iterations)?;
    header_line(w, [" Name", " Avg Time", " Size", " Avg Bytes", " Avg Mallocs"])?;
    separator_line(w)?;

    for sample in &report.samples {
        row(
            w,
            &sample.resizer,
            &format!("{:?}", sample.avg_duration()),
            &format_bytes(sample.avg_size()),
            &format_bytes(sample.avg_bytes()),
            sample.avg_allocations(),
        )?;
    }
    writeln!(w)?;

    let mut failures = report.failures().peekable();
    if failures.peek().is_some() {
        writeln!(w, "Failures:")?;
        for (sample, failure) in failures {
            writeln!(
                w,
                " - {}: iteration {}/{}: {}",
                sample.resizer, failure.iteration, report.iterations, failure.message
            )?;
        }
        writeln!(w)?;
    }

    Ok(())
}

/// Registered resizers grouped by library
pub fn write_resizer_list(w: &mut dyn Write, registry: &ResizerRegistry) -> io::Result<()> {
    writeln!(w, "resizers:")?;
    for (i, group) in registry.groups().iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        writeln!(w, " # {} ({})", group.library, group.url)?;
        for resizer in &group.resizers {
            writeln!(w, " - {}", resizer.name())?;
        }
    }
    Ok(())
}

/// Pretty-printed JSON document followed by a newline
pub fn write_json<T: Serialize>(w: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, value)?;
    writeln!(w)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::BenchmarkSample;
    use crate::config::TargetBounds;
    use std::time::Duration;

    fn source() -> SourceSummary {
        SourceSummary {
            name: "photo.jpg".to_string(),
            size: 4096,
            width: 640,
            height: 480,
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0B");
        assert_eq!(format_bytes(1024), "1024B");
        assert_eq!(format_bytes(1025), "1.00KB");
        assert_eq!(format_bytes(2048), "2.00KB");
    }

    #[test]
    fn test_format_bytes_uses_1014_multiplier() {
        assert_eq!(format_bytes(1014 * 1024), "1014.00KB");
        assert_eq!(format_bytes(1014 * 1024 + 1), "1.00MB");
        assert_eq!(format_bytes(2 * 1014 * 1024), "2.00MB");
        assert_eq!(format_bytes(1014 * 1014 * 1024 + 1), "1.00GB");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), "25.00%");
        assert_eq!(percent(1, 3), "33.33%");
        assert_eq!(percent(5, 0), "0.00%");
    }

    #[test]
    fn test_single_pass_table() {
        let mut sample = BenchmarkSample::new("fir__bilinear", "fast_image_resize");
        sample.record_iteration(2048);
        sample.total_duration = Duration::from_millis(3);
        sample.total_bytes = 3000;
        sample.total_allocations = 12;

        let report = SinglePassReport {
            source: source(),
            codec: "turbo".to_string(),
            bounds: TargetBounds::new(320, 0).unwrap(),
            samples: vec![sample],
        };
        let text = render(|w| write_single_pass(w, &report));
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Original image: name=photo.jpg, size=4.00KB, dimensions=640x480");
        assert_eq!(lines[1], "");
        assert_eq!(
            lines[2],
            "| Name                           | Time             | Size             | Bytes            |Mallocs           |"
        );
        assert_eq!(
            lines[3],
            "|--------------------------------|-----------------:|-----------------:|-----------------:|-----------------:|"
        );
        assert_eq!(
            lines[4],
            "| fir__bilinear                  | 3ms              | 2.00KB (50.00%)  | 2.93KB           | 12               |"
        );
    }

    #[test]
    fn test_repeated_table_lists_failures() {
        let mut ok = BenchmarkSample::new("image__bilinear", "image");
        ok.record_iteration(100);
        ok.record_iteration(100);
        ok.total_duration = Duration::from_micros(20);

        let mut flaky = BenchmarkSample::new("resize__lanczos2", "resize");
        flaky.record_failure(1, &crate::error::BenchError::decode("bad marker"));

        let report = RepeatedReport {
            source: source(),
            codec: "native".to_string(),
            bounds: TargetBounds::new(0, 100).unwrap(),
            iterations: 2,
            samples: vec![ok, flaky],
        };
        let text = render(|w| write_repeated(w, &report));

        assert!(text.contains("#iterations: 2\n"));
        assert!(text.contains("| Avg Time"));
        assert!(text.contains("| image__bilinear                | 10µs             | 100B "));
        assert!(text.contains("| resize__lanczos2               | 0ns              | 0B "));
        assert!(text.contains(
            "Failures:\n - resize__lanczos2: iteration 1/2: Failed to decode image: bad marker\n"
        ));
    }

    #[test]
    fn test_repeated_table_without_failures() {
        let report = RepeatedReport {
            source: source(),
            codec: "native".to_string(),
            bounds: TargetBounds::new(10, 10).unwrap(),
            iterations: 100,
            samples: Vec::new(),
        };
        let text = render(|w| write_repeated(w, &report));
        assert!(!text.contains("Failures"));
    }

    #[test]
    fn test_resizer_list_groups() {
        let registry = ResizerRegistry::builtin().unwrap();
        let text = render(|w| write_resizer_list(w, &registry));

        assert!(text.starts_with("resizers:\n # image (github.com/image-rs/image)\n - image__bilinear\n"));
        assert!(text.contains("\n\n # resize (github.com/PistonDevelopers/resize)\n"));
        assert!(text.contains(" - fir__lanczos3\n"));
    }

    #[test]
    fn test_json_report() {
        let report = RepeatedReport {
            source: source(),
            codec: "turbo".to_string(),
            bounds: TargetBounds::new(10, 0).unwrap(),
            iterations: 5,
            samples: vec![BenchmarkSample::new("fir__hamming", "fast_image_resize")],
        };
        let mut out = Vec::new();
        write_json(&mut out, &report).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["iterations"], 5);
        assert_eq!(value["samples"][0]["resizer"], "fir__hamming");
        assert_eq!(value["bounds"]["width"], 10);
        assert!(value["samples"][0].get("failure").is_none());
    }
}
