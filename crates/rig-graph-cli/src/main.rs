//! rigdot - export a rig's bone connection graph as Graphviz DOT.
//!
//! Reads a rig description (bones, IK chains, append relations, physics
//! bodies) from JSON and writes a DOT file ready for `dot -Tsvg` and
//! friends.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, Level};

use rig_graph_core::RigModel;
use rig_graph_export::export_dot;

/// Export a rig description as a Graphviz bone graph.
#[derive(Parser, Debug)]
#[command(
    name = "rigdot",
    author,
    version,
    about = "Export a rig's bone connections as Graphviz DOT",
    long_about = None
)]
struct Cli {
    /// Rig description file (JSON).
    input: PathBuf,

    /// Destination DOT file.
    #[arg(short, long)]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let rig = load_rig(&cli.input)?;
    debug!(
        bones = rig.bone_count(),
        bodies = rig.body_count(),
        "rig loaded"
    );

    let file = File::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    let mut writer = BufWriter::new(file);
    export_dot(&rig, &mut writer)
        .with_context(|| format!("failed to export to {}", cli.output.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to flush {}", cli.output.display()))?;

    if !cli.quiet {
        println!(
            "✅ Exported {} bones, {} bodies to {}",
            rig.bone_count(),
            rig.body_count(),
            cli.output.display()
        );
    }
    Ok(())
}

fn load_rig(path: &Path) -> Result<RigModel> {
    let file =
        File::open(path).with_context(|| format!("failed to open rig file {}", path.display()))?;
    let rig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse rig file {}", path.display()))?;
    Ok(rig)
}
