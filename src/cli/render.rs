//! Render command implementation.
//!
//! Turns a batch of hashes into documents on disk, or on stdout with
//! `--stdout`. Batches run on the rayon pool unless `render.parallel` is off.

use std::collections::HashSet;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;

use crate::cli::args::RenderArgs;
use crate::config::AppConfig;
use crate::identicon::IdenticonGenerator;
use crate::logger::ProgressLine;
use crate::utils::hash::digest_text;
use crate::{debug, log};

/// One input and the hash it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RenderJob {
    input: String,
    hash: String,
}

/// Render every requested hash.
///
/// All failures are reported before the command fails, so one bad input
/// does not hide the others.
pub fn render_hashes(args: &RenderArgs, config: &AppConfig) -> Result<()> {
    let inputs = expand_inputs(&args.hashes, io::stdin().lock())?;

    let jobs = plan_jobs(inputs, args.text);
    if jobs.is_empty() {
        log!("render"; "nothing to render");
        return Ok(());
    }

    let generator = IdenticonGenerator::new(config.identicon.clone());

    if args.stdout {
        return print_documents(&generator, &jobs);
    }

    let output = &config.render.output;
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory '{}'", output.display()))?;

    let failures = write_documents(&generator, &jobs, output, config.render.parallel);
    report(jobs.len(), &failures, output)
}

/// Replace `-` with the lines of `stdin`, wherever it appears.
///
/// Stdin is read at the first `-`. Later ones add nothing.
fn expand_inputs(args: &[String], stdin: impl BufRead) -> Result<Vec<String>> {
    let mut stdin = Some(stdin);
    let mut inputs = Vec::with_capacity(args.len());
    for arg in args {
        if arg != "-" {
            inputs.push(arg.clone());
        } else if let Some(reader) = stdin.take() {
            inputs.extend(read_inputs(reader)?);
        }
    }
    Ok(inputs)
}

/// Read one input per line, skipping blank lines.
fn read_inputs(reader: impl BufRead) -> Result<Vec<String>> {
    let mut inputs = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read input")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            inputs.push(trimmed.to_string());
        }
    }
    Ok(inputs)
}

/// Resolve inputs to hashes, dropping repeats of the same hash.
fn plan_jobs(inputs: Vec<String>, text: bool) -> Vec<RenderJob> {
    let mut seen = HashSet::new();
    inputs
        .into_iter()
        .map(|input| {
            let hash = if text {
                digest_text(&input)
            } else {
                input.to_ascii_lowercase()
            };
            RenderJob { input, hash }
        })
        .filter(|job| seen.insert(job.hash.clone()))
        .collect()
}

fn print_documents(generator: &IdenticonGenerator, jobs: &[RenderJob]) -> Result<()> {
    let mut out = io::stdout().lock();
    for job in jobs {
        let document = generator
            .render(&job.hash)
            .with_context(|| format!("Failed to render `{}`", job.input))?;
        writeln!(out, "{document}")?;
    }
    out.flush()?;
    Ok(())
}

/// Write each document, returning the failed inputs with their errors.
fn write_documents(
    generator: &IdenticonGenerator,
    jobs: &[RenderJob],
    output: &Path,
    parallel: bool,
) -> Vec<(String, anyhow::Error)> {
    let progress = ProgressLine::new(&[("svg", jobs.len())]);

    let run = |job: &RenderJob| {
        let result = write_document(generator, job, output);
        progress.inc("svg");
        result.err().map(|e| (job.input.clone(), e))
    };

    let failures: Vec<_> = if parallel {
        jobs.par_iter().filter_map(run).collect()
    } else {
        jobs.iter().filter_map(run).collect()
    };

    progress.finish();
    failures
}

fn write_document(generator: &IdenticonGenerator, job: &RenderJob, output: &Path) -> Result<()> {
    let path = output_path(generator, &job.hash, output)?;
    let document = generator.render(&job.hash)?;
    fs::write(&path, document)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    debug!("render"; "{} -> {}", job.input, path.display());
    Ok(())
}

/// `<output>/<hash>.<ext>`. The whole hash must be hex so that it is a safe
/// file name.
fn output_path(generator: &IdenticonGenerator, hash: &str, output: &Path) -> Result<PathBuf> {
    if let Some(ch) = hash.chars().find(|c| !c.is_ascii_hexdigit()) {
        bail!("`{hash}` is not a hex string (found {ch:?})");
    }
    let extension = generator.config().format.extension();
    Ok(output.join(format!("{hash}.{extension}")))
}

fn report(total: usize, failures: &[(String, anyhow::Error)], output: &Path) -> Result<()> {
    for (input, error) in failures {
        log!("error"; "{}: {:#}", input, error);
    }

    let written = total - failures.len();
    if written > 0 {
        log!("render"; "wrote {} of {} to {}", written, total, output.display());
    }

    if !failures.is_empty() {
        bail!("{} of {} identicons failed to render", failures.len(), total);
    }
    Ok(())
}
