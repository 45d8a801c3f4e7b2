//! Comparison pipeline
//!
//! fetch → decode → extract runs for each source strictly in input order, then the
//! comparator runs once over the materialized sequences. All per-run state lives in
//! a `RunContext` created by `run` and dropped when it returns.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::ComparisonError;
use crate::domain::comparison::MIN_SOURCES;
use crate::domain::{compare_with_policy, ComparisonPolicy, ComparisonResult, PageFetcher, Source};
use crate::infrastructure::config::defaults::MAX_SOURCES;
use crate::infrastructure::config::utils::build_fetch_url;
use crate::infrastructure::config::{AppConfig, ComparisonConfig};
use crate::infrastructure::parsing::{decode_payload, ExtractionReport, RecordExtractor};
use crate::infrastructure::parsing_error::ExtractionResult;

/// Validated, ordered listing URLs for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceList {
    sources: Vec<Source>,
}

impl SourceList {
    /// Trim inputs, drop blank entries, then enforce the source count bounds.
    ///
    /// Positions are assigned after blanks are dropped, so the first non-blank URL
    /// is always the reference source. The bounds are clamped to 2..=6 whatever
    /// the caller passes.
    pub fn from_inputs<S: AsRef<str>>(
        inputs: &[S],
        min: usize,
        max: usize,
    ) -> Result<Self, ComparisonError> {
        let (min, max) = source_bounds(min, max);
        let sources: Vec<Source> = inputs
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .enumerate()
            .map(|(index, url)| Source::new(index, url))
            .collect();

        if sources.len() < min || sources.len() > max {
            return Err(ComparisonError::InvalidInput {
                count: sources.len(),
                min,
                max,
            });
        }

        Ok(Self { sources })
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Clamp configured source count bounds to 2..=6, keeping `min <= max`
pub fn source_bounds(min: usize, max: usize) -> (usize, usize) {
    let min = min.clamp(MIN_SOURCES, MAX_SOURCES);
    let max = max.clamp(min, MAX_SOURCES);
    (min, max)
}

/// State owned by a single comparison run
#[derive(Debug)]
pub struct RunContext {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub sources: Vec<Source>,
    reports: Vec<ExtractionReport>,
    clock: Instant,
}

impl RunContext {
    pub fn new(sources: SourceList) -> Self {
        let sources = sources.sources;
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            reports: Vec::with_capacity(sources.len()),
            sources,
            clock: Instant::now(),
        }
    }

    fn record(&mut self, report: ExtractionReport) {
        self.reports.push(report);
    }

    pub fn completed_sources(&self) -> usize {
        self.reports.len()
    }

    /// Finish the run: compare the collected sequences and build the report
    fn finish(
        self,
        policy: ComparisonPolicy,
        bounds: (usize, usize),
    ) -> Result<ComparisonReport, ComparisonError> {
        let skipped_per_source = self.reports.iter().map(|r| r.skipped).collect();
        let sequences: Vec<_> = self.reports.into_iter().map(|r| r.records).collect();

        let result = compare_with_policy(&sequences, policy).map_err(|e| {
            let (min, max) = bounds;
            ComparisonError::InvalidInput {
                count: e.count,
                min,
                max,
            }
        })?;

        Ok(ComparisonReport {
            run_id: self.run_id,
            started_at: self.started_at,
            sources: self.sources,
            result,
            skipped_per_source,
            elapsed_ms: u64::try_from(self.clock.elapsed().as_millis()).unwrap_or(u64::MAX),
        })
    }
}

/// Everything a run produces, consumed read-only by presentation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub sources: Vec<Source>,
    pub result: ComparisonResult,
    pub skipped_per_source: Vec<usize>,
    pub elapsed_ms: u64,
}

/// Sequential fetch → extract → compare pipeline
pub struct ComparisonService {
    fetcher: Arc<dyn PageFetcher>,
    extractor: RecordExtractor,
    config: ComparisonConfig,
}

impl ComparisonService {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractor: RecordExtractor,
        config: ComparisonConfig,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            config,
        }
    }

    /// Build the service from application configuration
    pub fn from_config(fetcher: Arc<dyn PageFetcher>, config: &AppConfig) -> ExtractionResult<Self> {
        let extractor = RecordExtractor::with_config(&config.extraction)?;
        Ok(Self::new(fetcher, extractor, config.comparison.clone()))
    }

    pub fn policy(&self) -> ComparisonPolicy {
        self.config.policy
    }

    /// URL actually requested for a user-entered listing URL.
    ///
    /// The bulk-page suffix is added for both payload shapes; a rendering fetcher
    /// loads the same suffixed URL.
    pub fn fetch_url(&self, url: &str) -> String {
        build_fetch_url(url)
    }

    /// Run one comparison over user-entered URLs
    pub async fn run<S: AsRef<str>>(&self, inputs: &[S]) -> Result<ComparisonReport, ComparisonError> {
        let sources =
            SourceList::from_inputs(inputs, self.config.min_sources, self.config.max_sources)?;
        self.run_sources(sources).await
    }

    /// Run one comparison over an already validated source list
    pub async fn run_sources(&self, sources: SourceList) -> Result<ComparisonReport, ComparisonError> {
        let mut context = RunContext::new(sources);
        info!(
            "Starting comparison run {} over {} sources ({:?} policy)",
            context.run_id,
            context.sources.len(),
            self.config.policy
        );

        for source in context.sources.clone() {
            let report = self.collect_source(&source).await.inspect_err(|e| {
                warn!("Run {} aborted at source {}: {}", context.run_id, source.index, e);
            })?;
            context.record(report);
            debug!(
                "Run {}: {}/{} sources collected",
                context.run_id,
                context.completed_sources(),
                context.sources.len()
            );
        }

        let run_id = context.run_id;
        let bounds = source_bounds(self.config.min_sources, self.config.max_sources);
        let report = context.finish(self.config.policy, bounds)?;
        let (common, unique) = report.result.counts();
        info!(
            "Run {} finished in {} ms: {} common, unique per source {:?}",
            run_id, report.elapsed_ms, common, unique
        );
        Ok(report)
    }

    async fn collect_source(&self, source: &Source) -> Result<ExtractionReport, ComparisonError> {
        let fetch_url = self.fetch_url(&source.url);
        debug!("Source {}: requesting {}", source.index, fetch_url);

        let body = self
            .fetcher
            .fetch(&fetch_url)
            .await
            .map_err(|e| ComparisonError::Fetch {
                source_index: source.index,
                url: source.url.clone(),
                source: e,
            })?;

        let extraction_error = |e| ComparisonError::Extraction {
            source_index: source.index,
            source: e,
        };
        let payload =
            decode_payload(body, self.extractor.shape(), source.index).map_err(extraction_error)?;
        self.extractor
            .extract_report(&payload, source.index)
            .map_err(extraction_error)
    }
}
