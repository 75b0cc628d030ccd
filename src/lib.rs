// model-catalog/src/lib.rs

pub mod config;
pub mod error;
pub mod model;
pub mod validator;
pub mod catalog;
pub mod bundle;

pub use config::{Config, BundleConfig, ValidateConfig, ShapeKind};
pub use error::{CatalogError, Result};
pub use model::{ModelRecord, BundledModel, Bundle};
pub use validator::{CatalogValidator, PathSegment, Violation};
pub use catalog::{CatalogShape, EntryReport, Outcome, ValidationReport, validate_catalog};
pub use bundle::{load_models, write_bundle, run_bundle, LoadedModels, SkippedFile, BundleSummary};
