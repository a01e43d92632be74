// src/cli/mod.rs
//
// Command-line driver: collects files, feeds the orchestrator and reports.

mod args;
mod organize;
mod output;

use std::path::{Path, PathBuf};

use anyhow::Result;
use colorful::Colorful;
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::core::session::{is_supported_extension, Orchestrator};
use crate::core::Rejected;

pub use args::Args;
pub use organize::{organize_suspects, SUSPECT_DIR_NAME};
pub use output::{colorize, format_header, format_json, format_row, format_summary};

/// Run the CLI
pub fn run(args: &Args) -> Result<()> {
    let config = args.analysis_config()?;
    let files = collect_audio_files(&args.inputs);

    if files.is_empty() {
        eprintln!("{}", "No audio files found!".red());
        return Ok(());
    }
    if !args.json {
        eprintln!("Found {} audio file(s)\n", files.len());
    }

    let orchestrator = Orchestrator::new(&config)?;
    let mut accepted = 0u64;
    for file in &files {
        match orchestrator.submit(file) {
            Ok(_) => accepted += 1,
            Err(Rejected::DuplicateIdentifier(id)) => log::debug!("Skipping duplicate {}", id),
        }
    }

    let pb = if args.json || args.no_progress {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(accepted);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("#>-"),
        );
        pb
    };

    if !args.json {
        println!("{}", format_header().as_str().bold());
    }

    let verbose = args.verbose > 0;
    let mut results = Vec::with_capacity(files.len());
    for completion in orchestrator.completions() {
        let result = completion.into_result();
        if !args.json {
            let row = format_row(&result, verbose);
            pb.suspend(|| println!("{}", row));
        }
        pb.inc(1);
        results.push(result);
    }
    pb.finish_and_clear();

    results.sort_by(|a, b| a.audio_ref.id().cmp(b.audio_ref.id()));
    let summary = orchestrator.summary();

    if args.json {
        println!("{}", format_json(&results, &summary)?);
    } else {
        print!("{}", format_summary(&summary));
    }

    if let Some(dest) = &args.organize {
        let copied = organize_suspects(&results, dest)?;
        if !args.json {
            println!(
                "\nCopied {} suspect file(s) to {}",
                copied.len(),
                dest.join(SUSPECT_DIR_NAME).display()
            );
        }
    }

    Ok(())
}

/// Expand inputs into supported audio files, walking directories recursively
pub fn collect_audio_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            if is_supported_extension(input) {
                files.push(input.clone());
            } else {
                log::warn!("Skipping unsupported file {}", input.display());
            }
        } else if input.is_dir() {
            files.extend(walk_dir(input));
        } else {
            log::warn!("Input not found: {}", input.display());
        }
    }

    files
}

fn walk_dir(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_supported_extension(e.path()))
        .map(|e| e.into_path())
}
