//! Output formatting for CLI results

use anyhow::Result;
use colorful::Colorful;
use serde::Serialize;

use crate::detection::{AnalysisResult, Verdict, VerdictSummary};

const FILE_WIDTH: usize = 40;

/// Column header matching `format_row`
pub fn format_header() -> String {
    format!(
        "{:<FILE_WIDTH$}  {:<16}  {:>7}  {:<20}  {:>8}  {}",
        "FILE", "SPECS", "BITRATE", "ENCODER", "CUTOFF", "VERDICT"
    )
}

/// One table row for a completed result
pub fn format_row(result: &AnalysisResult, verbose: bool) -> String {
    let name = truncate(&result.audio_ref.file_name(), FILE_WIDTH);
    let (specs, bitrate) = match &result.specs {
        Some(specs) => (specs.summary(), specs.bitrate.to_string()),
        None => ("-".to_string(), "-".to_string()),
    };
    let cutoff = if result.is_failed() {
        "-".to_string()
    } else {
        result.cutoff.display_khz()
    };

    let mut row = format!(
        "{:<FILE_WIDTH$}  {:<16}  {:>7}  {:<20}  {:>8}  {}",
        name,
        specs,
        bitrate,
        result.encoder.label(),
        cutoff,
        colorize(result.verdict)
    );

    if verbose {
        if let Some(failure) = &result.failure {
            row.push_str(&format!("\n    {}", failure.to_string().as_str().dim()));
        } else if let Some(spec) = &result.spectrogram {
            let detail = format!(
                "mel spectrogram: {} bands x {} frames ({:.1}s)",
                spec.n_bands(),
                spec.n_frames(),
                spec.duration_secs()
            );
            row.push_str(&format!("\n    {}", detail.as_str().dim()));
        }
    }

    row
}

/// Verdict label in its display colour
pub fn colorize(verdict: Verdict) -> String {
    let (r, g, b) = hex_to_rgb(verdict.color()).unwrap_or((255, 255, 255));
    verdict.label().rgb(r, g, b).bold().to_string()
}

/// Format a summary for multiple files
pub fn format_summary(summary: &VerdictSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{}\n", "Summary:".bold()));
    output.push_str(&format!("  {} files analyzed\n", summary.analyzed()));

    if summary.pro_lossless > 0 {
        output.push_str(&format!(
            "  {} {}\n",
            summary.pro_lossless,
            colorize(Verdict::ProLossless)
        ));
    }
    if summary.mastering_limit > 0 {
        output.push_str(&format!(
            "  {} {}\n",
            summary.mastering_limit,
            colorize(Verdict::MasteringLimit)
        ));
    }
    if summary.fake_or_upscaled > 0 {
        output.push_str(&format!(
            "  {} {} ({:.0}%)\n",
            summary.fake_or_upscaled,
            colorize(Verdict::FakeOrUpscaled),
            summary.fake_ratio()
        ));
    }
    if summary.failed > 0 {
        output.push_str(&format!(
            "  {} {}\n",
            summary.failed,
            "could not be analyzed".dim()
        ));
    }

    output
}

#[derive(Serialize)]
struct JsonReport<'a> {
    results: &'a [AnalysisResult],
    summary: &'a VerdictSummary,
}

/// Format all results and the summary as JSON
pub fn format_json(results: &[AnalysisResult], summary: &VerdictSummary) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonReport { results, summary })?)
}

fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let head: String = s.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", head)
}
