//! nbshift CLI - Convert Jupyter notebooks between format versions.

mod colors;
mod convert;
mod info;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nbshift::{CellIdStrategy, ConvertOptions};

#[derive(Parser)]
#[command(name = "nbshift")]
#[command(about = "Convert Jupyter notebooks between nbformat v3 and v4")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Upgrade notebooks to the latest v4 format
    Upgrade {
        /// Notebooks to convert (.ipynb files)
        #[arg(required = true)]
        notebooks: Vec<PathBuf>,

        /// Output path (single notebook only; default: <name>.v4.ipynb)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number new cell ids sequentially instead of randomly
        #[arg(long)]
        reproducible_ids: bool,
    },

    /// Downgrade v4 notebooks to v3
    Downgrade {
        /// Notebooks to convert (.ipynb files)
        #[arg(required = true)]
        notebooks: Vec<PathBuf>,

        /// Output path (single notebook only; default: <name>.v3.ipynb)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Code cell language when the notebook metadata names none
        #[arg(long, default_value = "python")]
        language: String,
    },

    /// Convert notebooks to the given major version
    Convert {
        /// Notebooks to convert (.ipynb files)
        #[arg(required = true)]
        notebooks: Vec<PathBuf>,

        /// Target major version
        #[arg(long, value_parser = clap::value_parser!(u32).range(3..=4))]
        to: u32,

        /// Output path (single notebook only; default: <name>.v<N>.ipynb)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number new cell ids sequentially instead of randomly
        #[arg(long)]
        reproducible_ids: bool,

        /// Code cell language when the notebook metadata names none
        #[arg(long, default_value = "python")]
        language: String,
    },

    /// Show a notebook's format version and contents
    Info {
        /// Path to the notebook (.ipynb file)
        notebook: PathBuf,
    },
}

fn conversion_options(reproducible_ids: bool, language: Option<String>) -> ConvertOptions {
    let mut options = ConvertOptions::default();
    if reproducible_ids {
        options.cell_ids = CellIdStrategy::Sequential;
    }
    if let Some(language) = language {
        options.default_language = language;
    }
    options
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Upgrade {
            notebooks,
            output,
            reproducible_ids,
        } => {
            let job = convert::Job {
                to_major: nbshift::v4::NBFORMAT,
                output,
                options: conversion_options(reproducible_ids, None),
            };
            convert::execute(&notebooks, &job)?;
        }

        Commands::Downgrade {
            notebooks,
            output,
            language,
        } => {
            let job = convert::Job {
                to_major: nbshift::v3::NBFORMAT,
                output,
                options: conversion_options(false, Some(language)),
            };
            convert::execute(&notebooks, &job)?;
        }

        Commands::Convert {
            notebooks,
            to,
            output,
            reproducible_ids,
            language,
        } => {
            let job = convert::Job {
                to_major: to,
                output,
                options: conversion_options(reproducible_ids, Some(language)),
            };
            convert::execute(&notebooks, &job)?;
        }

        Commands::Info { notebook } => info::execute(&notebook)?,
    }

    Ok(())
}
