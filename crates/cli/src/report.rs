use serde::Serialize;
use std::fmt::Write;

use mediabatch_core::{BatchSummary, ConversionOutcome};

/// Machine-readable result of a batch.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub summary: &'a BatchSummary,
    pub outcomes: &'a [ConversionOutcome],
}

/// Human-readable summary printed after a batch.
pub fn render_summary(summary: &BatchSummary) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Converted {} of {} file(s), {} failed",
        summary.succeeded,
        summary.total(),
        summary.failed
    );

    if summary.video_sources > 0 {
        let _ = writeln!(out, "Video sources processed: {}", summary.video_sources);
    }

    if !summary.outputs.is_empty() {
        let _ = writeln!(out, "\nOutputs:");
        for path in &summary.outputs {
            let _ = writeln!(out, "  {}", path.display());
        }
    }

    if !summary.failures.is_empty() {
        let _ = writeln!(out, "\nFailures:");
        for failure in &summary.failures {
            let _ = writeln!(out, "  {}", failure.input_path.display());
            for line in failure.error_description.lines() {
                let _ = writeln!(out, "    {}", line);
            }
        }
    }

    out
}
