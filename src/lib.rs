//! resplan-export: turn residential floorplan datasets into an interchange
//! bundle.
//!
//! Each plan in a dataset stores its rooms, walls and openings as loosely
//! typed geometry values. The exporter flattens them into atomic geometries,
//! encodes them as WKT, derives a room adjacency graph, and emits one record
//! per plan with the plan's bounding box. Reference images can be drawn
//! alongside.
//!
//! # Modules
//!
//! - [`geometry`]: geometry model, flattening, WKT codec and bounds
//! - [`plan`]: dataset plans, categories and key normalization
//! - [`graph`]: adjacency graph derivation and canonical serialization
//! - [`render`]: viewport composition and SVG reference images
//! - [`export`]: per-plan record assembly
//! - [`batch`]: plan selection and batch runs
//! - [`dataset`]: dataset and bundle I/O
//! - [`error`]: error types

pub mod batch;
pub mod dataset;
pub mod error;
pub mod export;
pub mod geometry;
pub mod graph;
pub mod plan;
pub mod render;

use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::error::ErrorKind;
use clap::Parser;
use log::{info, LevelFilter};

use batch::Selection;
use export::{Assembler, DEFAULT_IMAGE_DIR};
use graph::GraphKind;
use plan::NoopKeys;
use render::{RenderMode, SvgRenderer};

pub use error::ExportError;

/// The resplan-export CLI application.
#[derive(Debug, Parser)]
#[command(name = "resplan-export")]
#[command(version, author, about)]
struct Cli {
    /// Dataset file: a JSON array of plans.
    #[arg(env = "RESPLAN_DATASET")]
    dataset: PathBuf,

    /// Export only the first LIMIT plans.
    #[arg(conflicts_with_all = ["indices", "sample"])]
    limit: Option<usize>,

    /// Export exactly these plans (comma-separated indices).
    #[arg(long, value_delimiter = ',', conflicts_with = "sample")]
    indices: Option<Vec<usize>>,

    /// Export N plans chosen at random.
    #[arg(long, value_name = "N")]
    sample: Option<usize>,

    /// Random seed for --sample.
    #[arg(long, requires = "sample")]
    seed: Option<u64>,

    /// Write the JSON document here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Indent the JSON document.
    #[arg(long)]
    pretty: bool,

    /// Draw a reference image per exported plan.
    #[arg(long, value_enum, default_value_t = RenderMode::None)]
    render: RenderMode,

    /// Directory for reference images.
    #[arg(long, default_value = DEFAULT_IMAGE_DIR)]
    image_dir: PathBuf,

    /// How each plan's adjacency graph is obtained.
    #[arg(long, value_enum, default_value_t = GraphKind::Contact)]
    graph: GraphKind,

    /// Use dataset keys exactly as written.
    #[arg(long)]
    no_normalize: bool,

    /// Export the remaining plans when one fails, then exit non-zero.
    #[arg(long)]
    keep_going: bool,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, env = "RESPLAN_LOG", default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn selection(&self) -> Selection {
        if let Some(indices) = &self.indices {
            Selection::Indices(indices.clone())
        } else if let Some(n) = self.sample {
            Selection::Sample { n, seed: self.seed }
        } else {
            Selection::Sequential { limit: self.limit }
        }
    }

    fn assembler(&self) -> Assembler {
        let mut assembler = Assembler::new()
            .with_boxed_deriver(self.graph.deriver())
            .with_image_dir(&self.image_dir);
        if self.no_normalize {
            assembler = assembler.with_normalizer(NoopKeys);
        }
        if self.render != RenderMode::None {
            assembler = assembler.with_renderer(SvgRenderer::default(), self.render);
        }
        assembler
    }
}

fn init_logging(level: &str) {
    let filter = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });
    // A logger may already be installed when embedded.
    let _ = env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .try_init();
}

/// Run the resplan-export CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), ExportError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(());
        }
        Err(e) => {
            let rendered = e.render().to_string();
            let message = rendered.strip_prefix("error: ").unwrap_or(&rendered);
            return Err(ExportError::Usage(message.to_string()));
        }
    };

    init_logging(&cli.log_level);
    info!(dataset:? = cli.dataset; "Starting export");

    let outcome = batch::run(
        &cli.dataset,
        &cli.selection(),
        &cli.assembler(),
        cli.keep_going,
    )?;

    match &cli.output {
        Some(path) => dataset::write_export(path, &outcome.records, cli.pretty)?,
        None => {
            let json = dataset::to_json_string(&outcome.records, cli.pretty).map_err(|source| {
                ExportError::OutputWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
            stdout.flush()?;
        }
    }

    if outcome.report.is_ok() {
        Ok(())
    } else {
        eprint!("{}", outcome.report);
        Err(ExportError::PlansFailed {
            report: outcome.report,
        })
    }
}
