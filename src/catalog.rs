// model-catalog/src/catalog.rs

use globset::{Glob, GlobMatcher};
use serde_json::Value;
use std::{fmt, fs, path::{Path, PathBuf}};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    config::{Config, ShapeKind},
    error::{strip_position, CatalogError, Result},
    validator::{CatalogValidator, Violation},
};

/// Where the catalog lives and how it is laid out on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogShape {
    /// One model per file; each file is checked against the whole schema.
    DirectoryOfFiles { dir: PathBuf, pattern: String },
    /// `{ "all_models": [..names], "<name>": {..entry}, .. }`; the document is
    /// checked whole, then each indexed entry against the per-model sub-schema.
    FlatFile { path: PathBuf, index_key: String, entry_pattern: String },
    /// `{ "<model>": { "<provider>": {..entry} } }`; each entry against the whole schema.
    NestedByProvider { path: PathBuf },
}

impl CatalogShape {
    pub fn from_config(cfg: &Config) -> Self {
        let path = cfg.catalog_path();
        match cfg.validate.shape {
            ShapeKind::Directory => Self::DirectoryOfFiles { dir: path, pattern: cfg.bundle.pattern.clone() },
            ShapeKind::FlatFile => Self::FlatFile {
                path,
                index_key: cfg.validate.index_key.clone(),
                entry_pattern: cfg.validate.entry_pattern.clone(),
            },
            ShapeKind::NestedByProvider => Self::NestedByProvider { path },
        }
    }

    /// Separator used when printing violation paths.
    pub fn path_separator(&self) -> &'static str {
        match self {
            Self::DirectoryOfFiles { .. } => "/",
            Self::FlatFile { .. } | Self::NestedByProvider { .. } => ".",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid(Vec<Violation>),
    Malformed { message: String, line: usize, column: usize },
    Unreadable(String),
    /// Named in the flat-file index but absent from the document.
    NotFound,
}

impl Outcome {
    fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() { Self::Valid } else { Self::Invalid(violations) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryReport {
    pub label: String,
    pub outcome: Outcome,
}

impl EntryReport {
    fn new(label: impl Into<String>, outcome: Outcome) -> Self { Self { label: label.into(), outcome } }

    fn checked(label: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self::new(label, Outcome::from_violations(violations))
    }

    pub fn passed(&self) -> bool { matches!(self.outcome, Outcome::Valid) }

    fn render(&self, f: &mut fmt::Formatter<'_>, sep: &str) -> fmt::Result {
        let label = &self.label;
        match &self.outcome {
            Outcome::Valid => writeln!(f, "✅ {label} is valid"),
            Outcome::Invalid(violations) => {
                writeln!(f, "❌ Validation failed for {label}:")?;
                for v in violations {
                    writeln!(f, "   - {}: {}", v.joined_path(sep), v.message)?;
                }
                Ok(())
            }
            Outcome::Malformed { message, line, column } =>
                writeln!(f, "❌ {label}: invalid JSON - {message} at line {line} column {column}"),
            Outcome::Unreadable(e) => writeln!(f, "❌ {label}: unreadable - {e}"),
            Outcome::NotFound => writeln!(f, "⚠️ {label} not found as a top-level key"),
        }
    }
}

/// Per-entry verdicts, in catalog order. `Display` renders the console report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub entries: Vec<EntryReport>,
    path_sep: &'static str,
}

impl ValidationReport {
    pub fn passed(&self) -> usize { self.entries.iter().filter(|e| e.passed()).count() }
    pub fn failed(&self) -> usize { self.entries.len() - self.passed() }
    pub fn all_passed(&self) -> bool { self.failed() == 0 }

    pub fn get(&self, label: &str) -> Option<&EntryReport> {
        self.entries.iter().find(|e| e.label == label)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.entries { e.render(f, self.path_sep)?; }
        write!(f, "{} valid, {} failed", self.passed(), self.failed())
    }
}

/// Checks every logical entry of the catalog. Only a missing directory, an
/// unreadable or malformed single-document catalog, or an unusable sub-schema
/// abort; everything else is reported per entry.
pub fn validate_catalog(validator: &CatalogValidator, shape: &CatalogShape) -> Result<ValidationReport> {
    let entries = match shape {
        CatalogShape::DirectoryOfFiles { dir, pattern } => validate_directory(validator, dir, pattern)?,
        CatalogShape::FlatFile { path, index_key, entry_pattern } =>
            validate_flat(validator, path, index_key, entry_pattern)?,
        CatalogShape::NestedByProvider { path } => validate_nested(validator, path)?,
    };
    let report = ValidationReport { entries, path_sep: shape.path_separator() };
    info!(passed = report.passed(), failed = report.failed(), "validation finished");
    Ok(report)
}

fn validate_directory(validator: &CatalogValidator, dir: &Path, pattern: &str) -> Result<Vec<EntryReport>> {
    let mut out = vec![];
    for path in list_files(dir, pattern)? {
        let label = file_name(&path);
        debug!(file = %label, "checking");
        let outcome = match fs::read_to_string(&path) {
            Err(e) => Outcome::Unreadable(e.to_string()),
            Ok(text) => match serde_json::from_str::<Value>(&text) {
                Err(e) => Outcome::Malformed { message: strip_position(&e), line: e.line(), column: e.column() },
                Ok(data) => Outcome::from_violations(validator.check(&data)),
            },
        };
        out.push(EntryReport::new(label, outcome));
    }
    Ok(out)
}

fn validate_flat(validator: &CatalogValidator, path: &Path, index_key: &str, entry_pattern: &str) -> Result<Vec<EntryReport>> {
    let data = read_json(path)?;
    let mut out = vec![EntryReport::checked(file_name(path), validator.check(&data))];

    let Some(index) = data.get(index_key).and_then(Value::as_array) else {
        warn!(file = %path.display(), index_key, "no model index; skipping per-model checks");
        return Ok(out);
    };
    let entry_validator = validator.entry_validator(entry_pattern)?;
    for name in index {
        let name = name.as_str().map(str::to_owned).unwrap_or_else(|| name.to_string());
        match data.get(&name) {
            Some(entry) => out.push(EntryReport::checked(name, entry_validator.check(entry))),
            None => {
                warn!(model = %name, "indexed model missing from document");
                out.push(EntryReport::new(name, Outcome::NotFound));
            }
        }
    }
    Ok(out)
}

fn validate_nested(validator: &CatalogValidator, path: &Path) -> Result<Vec<EntryReport>> {
    let data = read_json(path)?;
    let Some(models) = data.as_object() else {
        let v = Violation { path: vec![], message: "expected an object keyed by model name".into() };
        return Ok(vec![EntryReport::new(file_name(path), Outcome::Invalid(vec![v]))]);
    };
    let mut out = vec![];
    for (model, providers) in models {
        let Some(providers) = providers.as_object() else {
            let v = Violation { path: vec![], message: "expected an object keyed by provider".into() };
            out.push(EntryReport::new(model.clone(), Outcome::Invalid(vec![v])));
            continue;
        };
        for (provider, entry) in providers {
            out.push(EntryReport::checked(format!("{model} ({provider})"), validator.check(entry)));
        }
    }
    Ok(out)
}

/// Reads and parses one JSON document; both failures are fatal to the caller.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| CatalogError::json(path, &e))
}

/// Top-level files of `dir` whose name matches `pattern`, sorted by name.
pub fn list_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CatalogError::MissingDirectory(dir.to_path_buf()));
    }
    let matcher = file_matcher(pattern)?;
    let mut out = vec![];
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => { warn!(error = %e, "skipping directory entry"); continue; }
        };
        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            out.push(entry.into_path());
        }
    }
    Ok(out)
}

fn file_matcher(pattern: &str) -> Result<GlobMatcher> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|source| CatalogError::Pattern { pattern: pattern.to_owned(), source })
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| path.display().to_string())
}
