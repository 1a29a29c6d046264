// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Pipeline orchestration.
//!
//! detect → correlate → analyze → classify → score → report. Each stage
//! consumes the previous stage's records and produces new ones.

mod cache;
mod context;

pub use cache::{CacheKey, CachedAnalysis, ResultCache};
pub use context::{CancellationToken, PipelineContext};

use crate::analysis::{ChangeDetector, ContextCorrelator, Stage};
use crate::config::LensConfig;
use crate::error::Result;
use crate::git::VcsReader;
use crate::report::{Report, ReportOptions, Reporter};
use crate::rules::{RuleSet, RulesEngine};
use crate::scoring::ScoringSystem;
use crate::semantic::SemanticAnalyzer;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs the full analysis for a revision pair.
pub struct Pipeline {
    config: LensConfig,
    reader: Arc<dyn VcsReader>,
    cancel: CancellationToken,
    analyzer: SemanticAnalyzer,
}

impl Pipeline {
    /// Create a pipeline over a repository reader.
    pub fn new(config: LensConfig, reader: Arc<dyn VcsReader>) -> Self {
        Self {
            config,
            reader,
            cancel: CancellationToken::new(),
            analyzer: SemanticAnalyzer::new(),
        }
    }

    /// Use a configured analyzer for the analyze stage.
    pub fn with_analyzer(mut self, analyzer: SemanticAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Observe an external cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels this pipeline's runs.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Analyze `base..head`. An empty revision denotes the working tree for
    /// `head` and the empty tree for `base`.
    ///
    /// Fails only on revision, repository or rule configuration errors.
    /// Per-file problems are reported as warnings on the report.
    pub fn run(&self, base: &str, head: &str) -> Result<Report> {
        let started = Instant::now();
        let rules = RuleSet::from_config(&self.config.rules)?;
        debug!("Compiled {} rules", rules.len());

        let mut ctx = PipelineContext::new(
            self.config.clone(),
            rules,
            Arc::clone(&self.reader),
            base,
            head,
        )?
        .with_cancellation(self.cancel.clone());

        if let Some(cache) = self.open_cache(base, head) {
            ctx = ctx.with_cache(cache);
        }

        let mut completed = Vec::new();
        macro_rules! stage {
            ($stage:expr, $body:expr) => {{
                if ctx.is_cancelled() {
                    info!("Run cancelled after {} stages", completed.len());
                    return Ok(Report::partial(base, head, completed));
                }
                let out = $body;
                debug!("Stage {} done", $stage);
                completed.push($stage);
                out
            }};
        }

        let changes = stage!(Stage::Detect, ChangeDetector::new(ctx.reader.as_ref()).detect(base, head)?);
        let contextualized = stage!(Stage::Correlate, ContextCorrelator::new().correlate(changes, &ctx));
        let semantic = stage!(Stage::Analyze, self.analyzer.analyze(contextualized, &ctx));
        let classified = stage!(Stage::Classify, RulesEngine::new().apply_rules(semantic, &ctx));
        let scored = stage!(Stage::Score, ScoringSystem::new().score(classified, &ctx));

        let options = ReportOptions {
            base: base.to_string(),
            head: head.to_string(),
            max_body_items: self.config.output.max_body_items,
        };
        let report = stage!(Stage::Report, Reporter::new().generate_report(scored, &options));

        if let Some(cache) = &ctx.cache {
            if let Err(e) = cache.persist() {
                warn!("Failed to save analysis cache: {}", e);
            }
        }

        info!(
            "Run complete: {} files, {} warnings in {:?}",
            report.files_analyzed.len(),
            report.warnings.len(),
            started.elapsed()
        );
        Ok(report)
    }

    fn open_cache(&self, base: &str, head: &str) -> Option<Arc<ResultCache>> {
        let advanced = &self.config.advanced;
        if !advanced.cache_results {
            return None;
        }

        let cache = match advanced.cache_dir.clone().or_else(ResultCache::default_dir) {
            Some(dir) => ResultCache::open(&dir, base, head),
            None => {
                debug!("No cache directory available, caching for this run only");
                ResultCache::in_memory()
            }
        };
        Some(Arc::new(cache))
    }
}
