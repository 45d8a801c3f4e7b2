//! Domain module - listing records and the comparison core
//!
//! Each module is its own file in the domain/ directory; the commonly used
//! items are re-exported here.

pub mod comparison;
pub mod identity;
pub mod product;
pub mod services;

pub use comparison::{
    compare, compare_with_policy, CompareInputError, ComparisonPolicy, ComparisonResult,
};
pub use identity::IdentityResolver;
pub use product::{PayloadShape, ProductRecord, RawPayload, Source};
pub use services::{FetchError, PageFetcher};
