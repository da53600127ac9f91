//! `concord-recon` — Reviewer table concordance engine.
//!
//! Pure engine crate: receives two loaded tables, returns scored rows, a
//! summary and the report text. No CLI or IO dependencies.

pub mod aggregate;
pub mod align;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod report;
pub mod schema;
pub mod score;

pub use config::{CompareConfig, CompareOptions};
pub use engine::{compare, Comparison, ComparisonMeta};
pub use error::ConcordError;
pub use model::{Cell, ComparePlan, OutputTable, Table};
pub use report::render_report;
pub use schema::FormSchema;
