//! # dungeon-navgen
//!
//! Stamps a dungeon description and prints its navigation polygons as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use dungeon_core::logging::{init_tracing, LogLevel, TracingConfig};
use dungeon_core::{DungeonFile, NavigationBuilder, NavigationPolygonData, NavigationReport, StampReport};

#[derive(Parser)]
#[command(name = "dungeon-navgen")]
#[command(about = "Stamp a dungeon file and trace its navigation polygons")]
struct Cli {
    /// Dungeon description (RON)
    #[arg(default_value = "demos/crossing.ron")]
    input: PathBuf,

    /// Print the walkable layer as ASCII to stderr
    #[arg(long)]
    map: bool,

    /// Compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Log level for the crate modules
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct Output<'a> {
    fingerprint: String,
    stamp: &'a StampReport,
    navigation: &'a NavigationReport,
    polygons: &'a [NavigationPolygonData],
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&TracingConfig::verbose(LogLevel::parse(&cli.log_level)));

    let file = DungeonFile::load(&cli.input)
        .with_context(|| format!("loading {}", cli.input.display()))?;
    let (grid, stamp) = file.stamp().context("stamping dungeon")?;
    let (polygons, navigation) = NavigationBuilder::new()
        .build(&grid)
        .context("tracing navigation polygons")?;

    info!(
        rooms = stamp.rooms,
        polygons = polygons.len(),
        "Dungeon processed"
    );
    if cli.map {
        eprintln!("{}", grid.render_walkable());
    }

    let output = Output {
        fingerprint: hex(&grid.fingerprint()),
        stamp: &stamp,
        navigation: &navigation,
        polygons: &polygons,
    };
    let json = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{json}");
    Ok(())
}
