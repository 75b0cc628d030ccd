// model-catalog/src/config.rs

use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::error::{CatalogError, Result};

pub const CONFIG_FILE: &str = "catalog.toml";

/// Runtime settings. Loaded from `catalog.toml` (all keys optional), then
/// overridden by CLI flags. Relative paths are resolved against `root`.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub root: PathBuf,
    pub bundle: BundleConfig,
    pub validate: ValidateConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    pub models_dir: PathBuf,
    pub out_dir: PathBuf,
    pub file_name: String,
    /// Glob matched against file names in `models_dir`.
    pub pattern: String,
}
impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            models_dir: "models".into(),
            out_dir: "ui".into(),
            file_name: "models.bundle.json".into(),
            pattern: "*.json".into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// One JSON file per model.
    #[default]
    Directory,
    /// Single document keyed by model name, with an index array.
    FlatFile,
    /// Single document: model name -> provider -> entry.
    NestedByProvider,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    pub schema: PathBuf,
    pub shape: ShapeKind,
    pub catalog: Option<PathBuf>,  // directory shape falls back to bundle.models_dir
    pub index_key: String,
    /// `patternProperties` key holding the per-model sub-schema (flat file shape).
    pub entry_pattern: String,
}
impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            schema: "model_schema_v0.json".into(),
            shape: ShapeKind::Directory,
            catalog: None,
            index_key: "all_models".into(),
            entry_pattern: "^(?!all_models$)[a-zA-Z0-9._-]+$".into(),
        }
    }
}

impl Config {
    /// Reads `path`; relative paths inside it resolve against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let mut cfg: Config = toml::from_str(&text)
            .map_err(|source| CatalogError::Config { path: path.to_path_buf(), source })?;
        cfg.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(cfg)
    }

    /// Loads `root/catalog.toml` when present, defaults otherwise.
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            return Self::load(&path);
        }
        Ok(Self { root: root.to_path_buf(), ..Self::default() })
    }

    pub fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() { p.to_path_buf() } else { self.root.join(p) }
    }

    pub fn models_dir(&self) -> PathBuf { self.resolve(&self.bundle.models_dir) }
    pub fn bundle_out_dir(&self) -> PathBuf { self.resolve(&self.bundle.out_dir) }
    pub fn schema_path(&self) -> PathBuf { self.resolve(&self.validate.schema) }

    pub fn catalog_path(&self) -> PathBuf {
        match &self.validate.catalog {
            Some(p) => self.resolve(p),
            None => match self.validate.shape {
                ShapeKind::Directory => self.models_dir(),
                ShapeKind::FlatFile => self.resolve(Path::new("programming_models_v1.json")),
                ShapeKind::NestedByProvider => self.resolve(Path::new("programming_models.json")),
            },
        }
    }
}
