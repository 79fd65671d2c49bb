// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyfold CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polyfold::cli::Reporter;
use polyfold::{analyze, io, AnalysisConfig, RootPlacement, Unfolder};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "polyfold")]
#[command(about = "Polyfold - polyhedron face analysis and net unfolding", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge faces, build the hinge forest and print statistics
    Analyze {
        /// Mesh file (.stl, .json) or builtin:<name>
        input: String,

        /// Config file (defaults to polyfold.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        /// Print statistics as an uncolored table
        #[arg(long, conflicts_with = "json")]
        plain: bool,
    },

    /// Solve one unfold frame and export it
    Unfold {
        /// Mesh file (.stl, .json) or builtin:<name>
        input: String,

        /// Unfold progress, 0 = folded, 1 = flat net
        #[arg(short, long, default_value_t = 1.0)]
        progress: f64,

        /// Output file (.stl, .gltf, .glb, .json)
        #[arg(short, long)]
        output: PathBuf,

        /// Root placement (identity, ground, spread)
        #[arg(long, value_parser = parse_placement)]
        placement: Option<RootPlacement>,

        /// Config file (defaults to polyfold.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn parse_placement(s: &str) -> std::result::Result<RootPlacement, String> {
    RootPlacement::from_str(s)
        .ok_or_else(|| format!("unknown placement '{}', expected identity, ground or spread", s))
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Analyze {
            input,
            config,
            json,
            plain,
        } => analyze_command(input, config.as_deref(), *json, *plain),
        Commands::Unfold {
            input,
            progress,
            output,
            placement,
            config,
        } => unfold_command(input, *progress, output, *placement, config.as_deref()),
        Commands::Version => {
            println!("Polyfold v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(error) = result {
        Reporter::report_error(&format!("{:#}", error));
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_file(path),
        None => AnalysisConfig::load(),
    }
}

fn analyze_command(input: &str, config: Option<&Path>, json: bool, plain: bool) -> Result<()> {
    let config = load_config(config)?;
    let mesh = io::load_input(input)?;

    let start = Instant::now();
    let analysis = analyze(&mesh, &config)
        .with_context(|| format!("Failed to analyze {}", input))?;
    let duration = start.elapsed();
    let stats = analysis.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else if plain {
        stats.print();
    } else {
        Reporter::report_analysis(input, &stats, duration);
    }

    Ok(())
}

fn unfold_command(
    input: &str,
    progress: f64,
    output: &Path,
    placement: Option<RootPlacement>,
    config: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(placement) = placement {
        config.unfold.root_placement = placement;
    }
    let mesh = io::load_input(input)?;

    let start = Instant::now();
    let mut unfolder = Unfolder::with_config(config)?;
    unfolder
        .set_mesh(&mesh)
        .with_context(|| format!("Failed to analyze {}", input))?;
    let frame = unfolder.frame(progress);
    let duration = start.elapsed();

    let analysis = unfolder
        .analysis()
        .context("No analysis available after loading the mesh")?;
    if progress.is_nan() || !(0.0..=1.0).contains(&progress) {
        Reporter::report_warning(&format!(
            "progress {} clamped to {}",
            progress,
            frame.progress()
        ));
    }

    io::export_frame(&analysis, &frame, output)
        .with_context(|| format!("Failed to export {:?}", output))?;

    Reporter::report_unfold(
        input,
        &output.display().to_string(),
        frame.progress(),
        frame.len(),
        analysis.faces().len() - frame.len(),
        duration,
    );

    Ok(())
}
