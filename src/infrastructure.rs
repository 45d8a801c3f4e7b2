//! Infrastructure layer: fetching, payload extraction, configuration and logging
//!
//! Everything here talks to the outside world or to files; the comparison core
//! in `domain` stays free of I/O.

pub mod config;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;

// Re-export commonly used items
pub use config::{AppConfig, ComparisonConfig, ConfigManager, FetchConfig, LoggingConfig};
pub use http_client::HttpClient;
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing::{decode_payload, ExtractionReport, ParsingConfig, RecordExtractor};
pub use parsing_error::{ExtractionError, ExtractionResult};
