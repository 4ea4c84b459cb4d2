//! Conversion commands (upgrade, downgrade, convert).
//!
//! Each notebook is independent, so several inputs are converted in parallel.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use nbshift::{ConvertOptions, Converter, default_output_path};
use rayon::prelude::*;

use crate::colors;

/// What to convert to, and where.
pub struct Job {
    /// Target major version
    pub to_major: u32,

    /// Explicit output path (single input only)
    pub output: Option<PathBuf>,

    /// Conversion options shared by every input
    pub options: ConvertOptions,
}

/// A successfully converted notebook.
struct Converted {
    output: PathBuf,
    version: (u32, u32),
    elapsed: Duration,
}

/// Execute a conversion command over one or more notebooks.
pub fn execute(notebooks: &[PathBuf], job: &Job) -> anyhow::Result<()> {
    if job.output.is_some() && notebooks.len() > 1 {
        anyhow::bail!("--output can only be used with a single notebook");
    }

    println!(
        "\n{}nbshift{} - Converting to nbformat v{}",
        colors::BOLD,
        colors::RESET,
        job.to_major
    );
    println!("{}", "─".repeat(50));

    let results: Vec<_> = notebooks
        .par_iter()
        .map(|path| (path, convert_one(path, job)))
        .collect();

    let mut failed = 0;
    for (path, result) in results {
        match result {
            Ok(converted) => println!(
                "  {} → {} {}✓{} {}(v{}.{}, {:.2}ms){}",
                file_name(path),
                file_name(&converted.output),
                colors::GREEN,
                colors::RESET,
                colors::DIM,
                converted.version.0,
                converted.version.1,
                converted.elapsed.as_secs_f64() * 1000.0,
                colors::RESET
            ),
            Err(e) => {
                failed += 1;
                eprintln!(
                    "  {} {}✗{} {:#}",
                    file_name(path),
                    colors::RED,
                    colors::RESET,
                    e
                );
            }
        }
    }

    if failed > 0 {
        anyhow::bail!(
            "{} of {} notebook(s) failed to convert",
            failed,
            notebooks.len()
        );
    }

    Ok(())
}

/// Convert a single notebook.
fn convert_one(path: &Path, job: &Job) -> anyhow::Result<Converted> {
    if !path.exists() {
        anyhow::bail!("Notebook not found: {}", path.display());
    }

    let start = Instant::now();
    let output = job
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(path, job.to_major));

    let mut converter = Converter::new(job.options.clone());
    let converted = nbshift::convert_file(path, &output, &mut converter, job.to_major)
        .with_context(|| format!("Failed to convert {}", path.display()))?;

    Ok(Converted {
        output,
        version: converted.version(),
        elapsed: start.elapsed(),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}
