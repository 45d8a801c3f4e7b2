//! Application layer
//!
//! Orchestrates one comparison run over the domain and infrastructure layers and
//! shapes its result for display.

pub mod comparison_service;
pub mod error;
pub mod page_title;
pub mod presentation;

pub use comparison_service::{ComparisonReport, ComparisonService, RunContext, SourceList};
pub use error::ComparisonError;
pub use page_title::{describe_source, SourceKind, SourceTitle};
pub use presentation::{render_text, CardView, ComparisonView, GroupView};
