//! `embed-packed`: writes a Rust source file embedding the given files.

use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use embed_packed_build::{Codec, Config, DEFAULT_ZSTD_LEVEL, inputs, pipeline};
use tracing::{info, warn};

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "embed-packed")]
#[command(about = "Embed files as compressed literals in a generated Rust source file")]
#[command(version)]
struct Cli {
    /// File or directory to embed
    #[arg(value_name = "PATH")]
    paths: Vec<String>,

    /// Text file listing files to embed, one per line
    #[arg(short, long, value_name = "FILE")]
    list: Option<PathBuf>,

    /// Output file name
    #[arg(short, long, value_name = "FILE", default_value = "embedded.rs")]
    output: PathBuf,

    /// Include save_data and save_all_data in the output
    #[arg(short, long)]
    save: bool,

    /// Compression codec: gzip or zstd
    #[arg(
        short,
        long,
        value_name = "CODEC",
        default_value_t = Codec::Gzip,
        value_parser = str::parse::<Codec>
    )]
    codec: Codec,

    /// zstd compression level (1-21)
    #[arg(long, default_value_t = DEFAULT_ZSTD_LEVEL)]
    level: i32,

    /// Read inputs relative to DIR; lookup keys stay as given
    #[arg(short = 'C', long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Path generated code uses for the runtime crate
    #[arg(long, value_name = "PATH", default_value = "embed_packed")]
    runtime_crate: String,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    if cli.paths.is_empty() && cli.list.is_none() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let mut config = Config::new(cli.paths.iter().cloned())
        .codec(cli.codec)
        .level(cli.level)
        .save_helpers(cli.save)
        .runtime_crate(&cli.runtime_crate);
    if let Some(list) = &cli.list {
        config = config.list(list);
    }
    if let Some(dir) = &cli.directory {
        config = config.base_dir(dir);
    }

    let files = config.inputs().context("failed to collect input files")?;
    if files.is_empty() {
        warn!("no files to embed");
        return Ok(());
    }

    let options = config.options()?;
    let source = pipeline::run(&files, &options).context("failed to generate embedded source")?;
    inputs::write_output(&source, &cli.output)?;
    info!(output = %cli.output.display(), files = files.len(), "done");
    Ok(())
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
