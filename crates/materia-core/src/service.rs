//! Similarity lookups against a cached formula pool
//!
//! The service owns its caches (no globals): one for the fetched pool and
//! one for computed rankings keyed by `(formula id, min similarity, max
//! results)`.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::{Clock, SweeperHandle, SystemClock, TtlCache};
use crate::config::{CacheConfig, SimilarityConfig};
use crate::content::FormulaSource;
use crate::error::{MateriaError, Result};
use crate::formula::{find_formula, Formula};
use crate::similarity::{find_similar, RankOptions, SimilarityResult};
use crate::{log_cache_stats, trace_time};

/// Cache key for the whole candidate pool
const POOL_KEY: &str = "formulas:all";

/// Query parameters of a lookup; `None` falls back to configured defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimilarQuery {
    pub min_similarity: Option<u32>,
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RankingKey {
    formula_id: String,
    min_similarity: u32,
    max_results: usize,
}

/// Outcome of a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    /// Candidates were ranked
    Ranked,
    /// The source formula lists no ingredients; nothing was ranked
    NoIngredients,
}

/// Ranked similar formulas for one source formula
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarFormulas {
    pub formula_id: String,
    pub title: String,
    pub status: LookupStatus,
    /// Ingredient count of the source formula
    pub source_ingredient_count: usize,
    /// Pool size minus the source itself
    pub total_compared: usize,
    pub min_similarity: u32,
    pub max_results: usize,
    /// When the ranking was computed (older than now on a cache hit)
    pub computed_at: DateTime<Utc>,
    pub results: Arc<Vec<SimilarityResult>>,
}

/// Similarity lookups over a content source
pub struct SimilarityService {
    source: Box<dyn FormulaSource>,
    defaults: SimilarityConfig,
    cache_config: CacheConfig,
    pool_cache: Arc<TtlCache<&'static str, Arc<Vec<Formula>>>>,
    ranking_cache: Arc<TtlCache<RankingKey, SimilarFormulas>>,
    sweepers: Vec<SweeperHandle>,
}

impl SimilarityService {
    pub fn new(
        source: Box<dyn FormulaSource>,
        defaults: SimilarityConfig,
        cache_config: CacheConfig,
    ) -> Self {
        Self::with_clock(source, defaults, cache_config, Arc::new(SystemClock))
    }

    /// Build a service whose caches read time from `clock`
    pub fn with_clock(
        source: Box<dyn FormulaSource>,
        defaults: SimilarityConfig,
        cache_config: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            source,
            defaults,
            cache_config,
            pool_cache: Arc::new(TtlCache::with_clock(Arc::clone(&clock))),
            ranking_cache: Arc::new(TtlCache::with_clock(clock)),
            sweepers: Vec::new(),
        }
    }

    /// Start background sweepers for both caches if configured
    pub fn start_sweepers(&mut self) {
        if let Some(interval) = self.cache_config.sweep_interval() {
            self.sweepers.push(self.pool_cache.spawn_sweeper(interval));
            self.sweepers.push(self.ranking_cache.spawn_sweeper(interval));
        }
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// The full formula pool, served from cache while fresh
    pub fn formulas(&self) -> Result<Arc<Vec<Formula>>> {
        self.pool_cache
            .cached_fetch(POOL_KEY, self.cache_config.pool_ttl(), || {
                let start = Instant::now();
                let formulas = self.source.fetch_formulas()?;
                tracing::debug!(
                    source = %self.source.describe(),
                    count = formulas.len(),
                    "fetched formula pool"
                );
                trace_time!(start, "fetch_formulas");
                Ok(Arc::new(formulas))
            })
    }

    /// Look up one formula of the pool
    pub fn formula(&self, formula_id: &str) -> Result<Formula> {
        let pool = self.formulas()?;
        find_formula(&pool, formula_id)
            .cloned()
            .ok_or_else(|| MateriaError::formula_not_found(formula_id))
    }

    /// Rank formulas similar to `formula_id`.
    ///
    /// Fails with `FormulaNotFound` when the id is not in the pool. A source
    /// without ingredients yields an empty `NoIngredients` outcome.
    pub fn similar_formulas(&self, formula_id: &str, query: SimilarQuery) -> Result<SimilarFormulas> {
        let key = RankingKey {
            formula_id: formula_id.to_string(),
            min_similarity: query.min_similarity.unwrap_or(self.defaults.min_similarity),
            max_results: query.max_results.unwrap_or(self.defaults.max_results),
        };

        let ttl = self.cache_config.ranking_ttl();
        let outcome = self
            .ranking_cache
            .cached_fetch(key.clone(), ttl, || self.compute(&key))?;

        log_cache_stats!(self.pool_cache.stats(), "pool");
        log_cache_stats!(self.ranking_cache.stats(), "ranking");
        Ok(outcome)
    }

    fn compute(&self, key: &RankingKey) -> Result<SimilarFormulas> {
        let pool = self.formulas()?;
        let source = find_formula(&pool, &key.formula_id)
            .ok_or_else(|| MateriaError::formula_not_found(&key.formula_id))?;

        let total_compared = pool.len().saturating_sub(1);
        let (status, results) = if source.has_ingredients() {
            let options = RankOptions::new(key.min_similarity as f64, key.max_results);
            (LookupStatus::Ranked, find_similar(source, &pool, &options))
        } else {
            tracing::debug!(formula_id = %source.id, "formula has no ingredients, skipping ranking");
            (LookupStatus::NoIngredients, Vec::new())
        };

        Ok(SimilarFormulas {
            formula_id: source.id.clone(),
            title: source.title.clone(),
            status,
            source_ingredient_count: source.ingredient_count(),
            total_compared,
            min_similarity: key.min_similarity,
            max_results: key.max_results,
            computed_at: Utc::now(),
            results: Arc::new(results),
        })
    }

    /// Drop every cached pool and ranking
    pub fn invalidate(&self) {
        self.pool_cache.clear();
        self.ranking_cache.clear();
    }
}
