//! Mission validation core for the GFRED mission editor.
//!
//! This crate runs a bounded, phased validation pass over a mission and keeps
//! the artifacts the editor's panels read afterwards:
//!
//! - **Object validation**: entity rules, duplicate ids, wing membership
//! - **Asset validation**: ship-class existence through an [`AssetChecker`]
//! - **Expression validation**: SEXP syntax through an [`ExpressionValidator`]
//! - **Performance validation**: entity counts against soft and hard limits
//!
//! Every pass rebuilds the [`DependencyGraph`] from scratch and memoizes
//! per-entity results in a time-expiring [`ValidationCache`]. Problems found
//! in the mission are never returned as `Err`; they are messages in the
//! [`MissionValidationReport`].
//!
//! # Example
//!
//! ```ignore
//! use gfred_validate::{AssetCatalog, SexpSyntaxValidator, ValidationConfig, ValidationEngine};
//!
//! let mut engine = ValidationEngine::new(ValidationConfig::default())
//!     .with_asset_checker(AssetCatalog::from_names(["GTF Ulysses"]))
//!     .with_expression_validator(SexpSyntaxValidator::new());
//!
//! let report = engine.validate(&mission);
//! println!("{} errors, {} warnings", report.total_errors(), report.total_warnings());
//!
//! for dependency in engine.get_dependencies("object:alpha-1") {
//!     println!("{} -> {}", dependency.object_id, dependency.dependency_path);
//! }
//! ```

mod cache;
mod clock;
mod collaborators;
mod config;
mod engine;
mod error;
mod graph;
mod phase;
mod phases;
mod report;
mod scheduler;
pub mod sexp;

pub use cache::{CacheStats, ValidationCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use collaborators::{AssetCatalog, AssetChecker, DirectoryAssetChecker, ExpressionValidator};
pub use config::{PerformanceLimits, ValidationConfig};
pub use engine::{EngineState, ValidationEngine};
pub use error::{Result, ValidateError};
pub use graph::{DependencyGraph, DependencyInfo, DependencyType, GraphSnapshot};
pub use phase::{Phase, ValidationProgress};
pub use report::MissionValidationReport;
pub use scheduler::{SchedulerConfig, ValidationScheduler};
pub use sexp::{Sexp, SexpError, SexpSyntaxValidator};
