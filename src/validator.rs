// model-catalog/src/validator.rs

use jsonschema::{error::ValidationErrorKind, Validator};
use serde_json::Value;
use std::{fmt, path::{Path, PathBuf}};

use crate::{catalog, error::{CatalogError, Result}};

/// One step into a JSON instance. Indices order numerically and before keys.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    /// Decimal segments without leading zeros are array indices (RFC 6901).
    fn parse(raw: &str) -> Self {
        let canonical = raw == "0" || !raw.starts_with('0');
        match raw.parse::<usize>() {
            Ok(i) if canonical => Self::Index(i),
            _ => Self::Key(raw.to_owned()),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self { Self::Key(key.to_owned()) }
}

impl PartialEq<&str> for PathSegment {
    fn eq(&self, other: &&str) -> bool {
        match self {
            Self::Key(k) => k == other,
            Self::Index(i) => i.to_string() == *other,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => f.write_str(k),
        }
    }
}

/// One violated constraint. `path` is the location in the instance.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Violation {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl Violation {
    /// Joins the path with `sep`; the document root renders as `<root>`.
    pub fn joined_path(&self, sep: &str) -> String {
        if self.path.is_empty() { return "<root>".into(); }
        self.path.iter().map(ToString::to_string).collect::<Vec<_>>().join(sep)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.joined_path("."), self.message)
    }
}

/// Compiled draft 2020-12 schema.
pub struct CatalogValidator {
    schema: Value,
    compiled: Validator,
}

impl fmt::Debug for CatalogValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogValidator").finish_non_exhaustive()
    }
}

impl CatalogValidator {
    pub fn new(schema: Value) -> Result<Self> {
        Self::compile(schema, Path::new("<inline>"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let schema = catalog::read_json(path)?;
        Self::compile(schema, path)
    }

    fn compile(schema: Value, origin: &Path) -> Result<Self> {
        let compiled = jsonschema::draft202012::new(&schema)
            .map_err(|e| CatalogError::Schema { path: origin.to_path_buf(), reason: e.to_string() })?;
        Ok(Self { schema, compiled })
    }

    pub fn schema(&self) -> &Value { &self.schema }

    /// All violations for `instance`, sorted by path. Empty means valid.
    pub fn check(&self, instance: &Value) -> Vec<Violation> {
        let mut out: Vec<Violation> = self.compiled.iter_errors(instance)
            .map(|e| {
                let mut path = pointer_segments(&e.instance_path.to_string());
                // point at the missing key itself, not its parent object
                if let ValidationErrorKind::Required { property } = &e.kind {
                    let name = property.as_str().map(str::to_owned).unwrap_or_else(|| property.to_string());
                    path.push(PathSegment::Key(name));
                }
                Violation { path, message: e.to_string() }
            })
            .collect();
        out.sort();
        out
    }

    /// Builds a validator for one entry of a combined catalog document: the
    /// `patternProperties[entry_pattern]` sub-schema, with the root's
    /// `$schema` and `$defs` carried over so `$ref`s still resolve.
    pub fn entry_validator(&self, entry_pattern: &str) -> Result<Self> {
        let origin = PathBuf::from(format!("patternProperties[{entry_pattern}]"));
        let props = self.schema.get("patternProperties").and_then(Value::as_object);
        let template = props
            .and_then(|p| p.get(entry_pattern).or_else(|| if p.len() == 1 { p.values().next() } else { None }))
            .and_then(Value::as_object)
            .ok_or_else(|| CatalogError::Schema { path: origin.clone(), reason: "no per-model sub-schema found".into() })?;

        let mut sub = serde_json::Map::new();
        if let Some(s) = self.schema.get("$schema") { sub.insert("$schema".into(), s.clone()); }
        for (k, v) in template { sub.insert(k.clone(), v.clone()); }
        if let Some(d) = self.schema.get("$defs") { sub.insert("$defs".into(), d.clone()); }
        Self::compile(Value::Object(sub), &origin)
    }
}

/// Splits an RFC 6901 pointer ("/a/0/b~1c") into unescaped segments.
fn pointer_segments(ptr: &str) -> Vec<PathSegment> {
    if ptr.is_empty() { return vec![]; }
    ptr.trim_start_matches('/')
        .split('/')
        .map(|s| PathSegment::parse(&s.replace("~1", "/").replace("~0", "~")))
        .collect()
}
