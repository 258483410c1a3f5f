// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use anyhow::Context;
use clap::Parser;
use map_reduce_core::map_reduce;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SMALL_SUFFIX: &str = "_small";

/// Counts words across text files with the map-reduce engine.
#[derive(Parser)]
struct Cli {
    /// Input files; without --full the `<stem>_small.<ext>` sample
    /// variant of each file is read instead
    files: Vec<PathBuf>,

    /// Read the full dataset instead of the small sample
    #[arg(long)]
    full: bool,

    /// Number of concurrent workers per phase
    #[arg(long, default_value_t = 8)]
    workers: usize,

    /// Maximum number of lines per chunk
    #[arg(long, default_value_t = 16)]
    chunksize: usize,

    /// Emit engine progress diagnostics
    #[arg(long)]
    debug: bool,

    /// Sort output by word (deterministic mode)
    #[arg(long)]
    sorted: bool,
}

/// Resolves the sample-vs-full variant of an input file.
fn dataset_path(path: &Path, full: bool) -> PathBuf {
    if full {
        return path.to_path_buf();
    }
    let Some(stem) = path.file_stem() else {
        return path.to_path_buf();
    };
    let mut name = format!("{}{SMALL_SUFFIX}", stem.to_string_lossy());
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}

/// File-reading collaborator: one `(filename, line)` record per line.
fn read_lines(paths: &[PathBuf]) -> anyhow::Result<Vec<(String, String)>> {
    let mut records = Vec::new();
    for path in paths {
        let file =
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        let filename = path.display().to_string();
        for line in BufReader::new(file).lines() {
            let line = line.with_context(|| format!("cannot read {}", path.display()))?;
            records.push((filename.clone(), line));
        }
    }
    Ok(records)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if cli.debug { "debug" } else { "info" })
        }))
        .init();

    let paths: Vec<PathBuf> = cli
        .files
        .iter()
        .map(|f| dataset_path(f, cli.full))
        .collect();
    let inputs = read_lines(&paths)?;
    tracing::info!(files = paths.len(), lines = inputs.len(), "input loaded");

    let engine = map_reduce(
        |(_filename, line): (String, String)| {
            Ok(line
                .split_whitespace()
                .map(|word| (word.to_lowercase(), 1u64))
                .collect())
        },
        |word: &String, counts: Vec<u64>| Ok((word.clone(), counts.into_iter().sum::<u64>())),
        cli.workers,
    )?;

    let results = if cli.sorted {
        engine.run_sorted(inputs, cli.chunksize, cli.debug).await?
    } else {
        engine.run(inputs, cli.chunksize, cli.debug).await?
    };

    for (word, count) in &results {
        println!("{word}\t{count}");
    }

    Ok(())
}
