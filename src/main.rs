// model-catalog/src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use model_catalog::{run_bundle, validate_catalog, CatalogShape, CatalogValidator, Config, ShapeKind};

#[derive(Parser)]
#[command(name = "model-catalog", version, about = "Validate and bundle the model catalog")]
struct Cli {
    /// Catalog root; relative paths resolve against it
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Config file (default: <root>/catalog.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Compile the per-model files into the UI bundle
    Bundle {
        #[arg(long)]
        models_dir: Option<PathBuf>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Glob for model file names, e.g. "*.json"
        #[arg(long)]
        pattern: Option<String>,
    },
    /// Check the catalog against the JSON Schema
    Validate {
        #[arg(long)]
        schema: Option<PathBuf>,
        #[arg(long, value_enum)]
        shape: Option<Shape>,
        /// Models directory or combined catalog document
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Exit non-zero if any entry fails
        #[arg(long)]
        fail_on_invalid: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Shape { Directory, FlatFile, NestedByProvider }

impl From<Shape> for ShapeKind {
    fn from(s: Shape) -> Self {
        match s {
            Shape::Directory => Self::Directory,
            Shape::FlatFile => Self::FlatFile,
            Shape::NestedByProvider => Self::NestedByProvider,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(&cli.root)?,
    };

    match cli.cmd {
        Cmd::Bundle { models_dir, out_dir, pattern } => {
            if let Some(d) = models_dir { cfg.bundle.models_dir = d; }
            if let Some(d) = out_dir { cfg.bundle.out_dir = d; }
            if let Some(p) = pattern { cfg.bundle.pattern = p; }
            let summary = run_bundle(&cfg, chrono::Utc::now()).context("bundle models")?;
            for skipped in &summary.skipped {
                println!("{skipped}");
            }
            println!("[ok] Wrote {} with {} models", summary.path.display(), summary.models);
        }
        Cmd::Validate { schema, shape, catalog, fail_on_invalid } => {
            if let Some(s) = schema { cfg.validate.schema = s; }
            if let Some(s) = shape { cfg.validate.shape = s.into(); }
            if catalog.is_some() { cfg.validate.catalog = catalog; }
            let schema_path = cfg.schema_path();
            info!(schema = %schema_path.display(), shape = ?cfg.validate.shape, "validating");
            let validator = CatalogValidator::from_file(&schema_path)
                .with_context(|| format!("load schema {}", schema_path.display()))?;
            let report = validate_catalog(&validator, &CatalogShape::from_config(&cfg))?;
            println!("{report}");
            if fail_on_invalid && !report.all_passed() {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
