// model-catalog/src/bundle.rs

use chrono::{DateTime, SecondsFormat, Utc};
use std::{fmt, fs, path::{Path, PathBuf}};
use tracing::{debug, info, warn};

use crate::{
    catalog::{file_name, list_files},
    config::Config,
    error::{CatalogError, Result},
    model::{Bundle, BundledModel, ModelRecord},
};

/// A file left out of the bundle, with the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedFile {
    pub file_name: String,
    pub error: String,
}

impl fmt::Display for SkippedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[warn] Skipping {}: {}", self.file_name, self.error)
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadedModels {
    pub models: Vec<BundledModel>,
    pub skipped: Vec<SkippedFile>,
}

/// Loads every matching file in `dir` (sorted by name). Files that cannot be
/// read or parsed into a model record are skipped with a warning.
pub fn load_models(dir: &Path, pattern: &str) -> Result<LoadedModels> {
    let mut out = LoadedModels::default();
    for path in list_files(dir, pattern)? {
        let name = file_name(&path);
        match load_one(&path) {
            Ok(record) => {
                let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| name.clone());
                let model = BundledModel::new(record, &name, &stem);
                debug!(file = %name, id = %model.id, "loaded");
                out.models.push(model);
            }
            Err(error) => {
                warn!("Skipping {name}: {error}");
                out.skipped.push(SkippedFile { file_name: name, error });
            }
        }
    }
    Ok(out)
}

fn load_one(path: &Path) -> std::result::Result<ModelRecord, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

/// Writes `{generated_at, models}` as indented JSON to `out_dir/file_name`,
/// replacing any previous bundle.
pub fn write_bundle(out_dir: &Path, file_name: &str, models: Vec<BundledModel>, generated_at: DateTime<Utc>) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).map_err(|e| CatalogError::io(out_dir, e))?;
    let path = out_dir.join(file_name);
    let bundle = Bundle { generated_at: timestamp(generated_at), models };
    let text = serde_json::to_string_pretty(&bundle)?;
    fs::write(&path, text).map_err(|e| CatalogError::io(&path, e))?;
    Ok(path)
}

/// ISO-8601 with microseconds and an explicit `+00:00` offset.
pub fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, false)
}

#[derive(Clone, Debug)]
pub struct BundleSummary {
    pub path: PathBuf,
    pub models: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Loads `models_dir` and writes the bundle configured in `cfg`.
pub fn run_bundle(cfg: &Config, now: DateTime<Utc>) -> Result<BundleSummary> {
    let LoadedModels { models, skipped } = load_models(&cfg.models_dir(), &cfg.bundle.pattern)?;
    let count = models.len();
    let path = write_bundle(&cfg.bundle_out_dir(), &cfg.bundle.file_name, models, now)?;
    info!(path = %path.display(), models = count, skipped = skipped.len(), "bundle written");
    Ok(BundleSummary { path, models: count, skipped })
}
