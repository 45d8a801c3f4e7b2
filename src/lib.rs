//! Listing Diff - side-by-side comparison of e-commerce product listings
//!
//! Fetches two to six listing pages, extracts product records from each (JSON
//! search endpoint or rendered HTML tiles), and reports which products are common
//! to every listing and which are unique to each.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{render_text, ComparisonError, ComparisonReport, ComparisonService, ComparisonView};
pub use domain::{compare, compare_with_policy, ComparisonPolicy, ComparisonResult, PageFetcher, ProductRecord};
pub use infrastructure::{AppConfig, ConfigManager, HttpClient};
