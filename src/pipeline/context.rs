// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Per-run state shared by every stage.

use crate::config::LensConfig;
use crate::error::{ConfigError, LensError, Result};
use crate::git::VcsReader;
use crate::rules::RuleSet;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::cache::ResultCache;

/// Cooperative cancellation flag, checked between stages.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Everything a stage needs for one run: configuration, compiled rules,
/// the repository reader, the optional result cache and the cancellation
/// token. Stages only read from it.
pub struct PipelineContext {
    pub config: LensConfig,
    pub rules: RuleSet,
    pub reader: Arc<dyn VcsReader>,
    pub cache: Option<Arc<ResultCache>>,
    pub cancel: CancellationToken,
    /// Base revision as given by the caller.
    pub base: String,
    /// Head revision as given by the caller.
    pub head: String,
    pool: Option<ThreadPool>,
}

impl PipelineContext {
    /// Create a context; builds the worker pool when parallel analysis is on.
    pub fn new(
        config: LensConfig,
        rules: RuleSet,
        reader: Arc<dyn VcsReader>,
        base: &str,
        head: &str,
    ) -> Result<Self> {
        let pool = if config.advanced.parallel_analysis {
            let threads = config.advanced.max_parallel_processes.max(1);
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| {
                    LensError::Config(ConfigError::InvalidValue {
                        key: "advanced.max_parallel_processes".to_string(),
                        message: e.to_string(),
                    })
                })?;
            tracing::debug!("Using {} worker threads", threads);
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            config,
            rules,
            reader,
            cache: None,
            cancel: CancellationToken::new(),
            base: base.to_string(),
            head: head.to_string(),
            pool,
        })
    }

    /// Attach a result cache.
    pub fn with_cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Whether the run was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Map `f` over `items`, on the worker pool when one exists.
    ///
    /// The output is in input order either way. `f` also receives the
    /// item's index in the change set.
    pub fn map_files<T, U, F>(&self, items: Vec<T>, f: F) -> Vec<U>
    where
        T: Send,
        U: Send,
        F: Fn(usize, T) -> U + Sync + Send,
    {
        match self.pool {
            Some(ref pool) => pool.install(|| {
                items
                    .into_par_iter()
                    .enumerate()
                    .map(|(index, item)| f(index, item))
                    .collect()
            }),
            None => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| f(index, item))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::InMemoryRepository;

    fn context(parallel: bool) -> PipelineContext {
        let mut config = LensConfig::default();
        config.advanced.parallel_analysis = parallel;
        config.advanced.max_parallel_processes = 4;
        let rules = RuleSet::from_config(&config.rules).unwrap();
        PipelineContext::new(config, rules, Arc::new(InMemoryRepository::new()), "", "").unwrap()
    }

    #[test]
    fn test_cancellation_is_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_map_files_preserves_order() {
        let items: Vec<usize> = (0..100).collect();
        for parallel in [true, false] {
            let ctx = context(parallel);
            let out = ctx.map_files(items.clone(), |index, item| {
                assert_eq!(index, item);
                item * 2
            });
            assert_eq!(out, items.iter().map(|i| i * 2).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_with_cancellation() {
        let token = CancellationToken::new();
        let ctx = context(false).with_cancellation(token.clone());
        token.cancel();
        assert!(ctx.is_cancelled());
    }
}
