//! Compare a reference and a test DICOM study field by field
//!
//! Both inputs are indexed into a patient → study → series → instance
//! hierarchy. Reference series and instances are paired with their test
//! counterparts, run through the same tag filters and rendered as HTML
//! difference reports.

pub mod cli;
pub mod compare;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod hierarchy;
pub mod loader;
pub mod matcher;
pub mod progress;
pub mod report;
pub mod select;
pub mod tagspec;

pub use cli::report::SummaryReport;
pub use compare::{Comparison, ComparisonSummary, DiffOptions};
pub use dataset::{Dataset, Field, FieldValue, InstanceKey, InstanceRecord};
pub use error::{DcmdiffError, Result};
pub use filter::{FilterSpec, FilterStage};
pub use hierarchy::{Hierarchy, Indexer, PatientNode, SeriesNode, Simplifier, StudyNode};
pub use report::DiffMode;
pub use select::{Menu, Resolver, ScriptedResolver, TerminalResolver};
