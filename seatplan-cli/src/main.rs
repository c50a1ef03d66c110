use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use seatplan_core::types::FloorPlanSnapshot;
use seatplan_render::{
    ExportOrchestrator, ExportOutcome, ExportStage, FloorPlanRenderer, RenderOptions,
};

#[derive(Parser)]
#[command(name = "seatplan", version, about = "Venue floor-plan rendering and PDF export")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a floor-plan snapshot to an SVG scene
    Render {
        /// Snapshot JSON file
        input: PathBuf,
        /// Output SVG path
        #[arg(short, long, default_value = "floor-plan.svg")]
        output: PathBuf,
        /// Output canvas width in pixels
        #[arg(long, default_value_t = 1240.0)]
        width: f64,
    },
    /// Export a snapshot to a paginated PDF document
    Export {
        /// Snapshot JSON file
        input: PathBuf,
        /// Output directory; the filename derives from the event slug
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
}

fn load_snapshot(path: &PathBuf) -> Result<FloorPlanSnapshot> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let snapshot: FloorPlanSnapshot = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parse snapshot {}", path.display()))?;
    snapshot.validate().context("invalid snapshot")?;
    if snapshot.is_empty() {
        log::warn!("snapshot {} has no tables or elements", path.display());
    }
    Ok(snapshot)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Render { input, output, width } => {
            let snapshot = load_snapshot(&input)?;
            let renderer = FloorPlanRenderer::new(RenderOptions {
                target_width: width,
                ..Default::default()
            });
            renderer
                .write_to_file(&output, &snapshot)
                .with_context(|| format!("write {}", output.display()))?;
            log::info!(
                "rendered {} tables and {} elements",
                snapshot.tables.len(),
                snapshot.elements.len()
            );
            println!("wrote {}", output.display());
        }
        Command::Export { input, out_dir } => {
            let snapshot = load_snapshot(&input)?;
            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
                    .expect("static template"),
            );
            let orchestrator = ExportOrchestrator::default();
            let mut on_progress = |stage: ExportStage, pct: u8| {
                bar.set_position(pct as u64);
                bar.set_message(format!("{:?}", stage));
            };
            let outcome = orchestrator
                .export(&snapshot, &out_dir, Some(&mut on_progress))
                .context("export failed")?;
            bar.finish_and_clear();
            match outcome {
                ExportOutcome::Completed(report) => {
                    println!("wrote {} ({} pages)", report.path.display(), report.pages);
                }
                ExportOutcome::AlreadyRunning => bail!("an export is already running"),
            }
        }
    }
    Ok(())
}
