//! Engine composition: model-or-fallback scoring, memoization, ranking.
//!
//! The engine is the single owner of the score cache, so cache access is
//! serialized without locks. Strategy changes clear the cache before the
//! new value becomes observable to subscribers: observers see either the
//! old strategy with the old cache or the new strategy with an empty one.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cache::ScoreCache;
use crate::fallback::FallbackScorer;
use crate::model::{ModelScorer, ScoreOutcome};
use crate::ranker;
use crate::settings::StrategyStore;
use crate::strategy::Strategy;
use crate::task::{Priority, Task};

pub struct PriorityEngine {
    model: ModelScorer,
    fallback: FallbackScorer,
    cache: ScoreCache,
    store: StrategyStore,
}

impl PriorityEngine {
    pub fn new(model: ModelScorer, store: StrategyStore) -> Self {
        Self {
            model,
            fallback: FallbackScorer::new(),
            cache: ScoreCache::new(),
            store,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.store.strategy()
    }

    pub fn auto_sort_enabled(&self) -> bool {
        self.store.auto_sort_enabled()
    }

    pub fn model_available(&self) -> bool {
        self.model.is_available()
    }

    pub fn cache(&self) -> &ScoreCache {
        &self.cache
    }

    /// Change the active strategy: drop stale scores, persist, notify.
    ///
    /// The cache clears first so no observer can pair a stale score with
    /// the new strategy. If the persist fails the cache stays empty, which
    /// only costs a recompute.
    pub fn set_strategy(&mut self, strategy: Strategy) -> Result<()> {
        self.cache.clear();
        self.store.set_strategy(strategy)
    }

    pub fn set_auto_sort(&mut self, enabled: bool) -> Result<()> {
        self.store.set_auto_sort(enabled)
    }

    /// Register a strategy-change callback.
    pub fn subscribe(&mut self, listener: impl Fn(Strategy) + Send + 'static) {
        self.store.subscribe(listener);
    }

    /// Explicit wholesale invalidation (e.g. on a settings save).
    pub fn invalidate_scores(&mut self) {
        self.cache.clear();
    }

    /// Score one task: model first, deterministic fallback second.
    /// Always produces a value.
    pub fn calculate_score(&self, task: &Task, now: DateTime<Utc>) -> f64 {
        match self.model.score(task, now, self.store.strategy()) {
            ScoreOutcome::Score(score) => score,
            ScoreOutcome::Unavailable => self.fallback.score(task, now),
        }
    }

    /// Cached score for the task, computing and memoizing on a miss.
    pub fn get_or_compute(&mut self, task: &Task, now: DateTime<Utc>) -> f64 {
        if let Some(score) = self.cache.get(&task.id) {
            return score;
        }
        let score = self.calculate_score(task, now);
        self.cache.insert(task.id.clone(), score);
        score
    }

    /// Eagerly recompute every task's score and replace the cache with
    /// exactly this set.
    pub fn compute_and_cache_all(
        &mut self,
        tasks: &[Task],
        now: DateTime<Utc>,
    ) -> HashMap<String, f64> {
        let scores: HashMap<String, f64> = tasks
            .iter()
            .map(|t| (t.id.clone(), self.calculate_score(t, now)))
            .collect();
        debug!(count = scores.len(), strategy = %self.store.strategy(), "scores recomputed");
        self.cache.replace_all(scores.clone());
        scores
    }

    /// Rank tasks by the three-key total order (completion, score, title).
    ///
    /// With `use_cache` set, cached scores are reused and misses are
    /// memoized; otherwise every score is computed fresh and the cache is
    /// left untouched.
    pub fn rank(&mut self, tasks: &[Task], now: DateTime<Utc>, use_cache: bool) -> Vec<Task> {
        if use_cache {
            let scores: HashMap<String, f64> = tasks
                .iter()
                .map(|t| (t.id.clone(), self.get_or_compute(t, now)))
                .collect();
            ranker::rank_by(tasks, |t| scores[&t.id])
        } else {
            ranker::rank_by(tasks, |t| self.calculate_score(t, now))
        }
    }

    /// The "prioritize now" action: bulk recompute, then rank.
    pub fn prioritize(&mut self, tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
        let scores = self.compute_and_cache_all(tasks, now);
        ranker::rank_by(tasks, |t| scores[&t.id])
    }

    /// The non-scored ordering used when auto-sort is off.
    pub fn rank_manual(&self, tasks: &[Task]) -> Vec<Task> {
        ranker::rank_manual(tasks)
    }

    pub fn suggest_strategy(&self, history: &[Task]) -> Strategy {
        ranker::suggest_strategy(history)
    }

    pub fn suggest_priority(&self, title: &str, note: Option<&str>) -> Priority {
        ranker::suggest_priority(title, note)
    }

    /// Score the list under every strategy without touching the persisted
    /// choice or the cache. Each inner list is (task id, score), descending.
    ///
    /// Scales are whatever scorer answered (model [0,120], fallback
    /// [0,100]); comparisons only ever happen within one inner list.
    pub fn compare_strategies(
        &self,
        tasks: &[Task],
        now: DateTime<Utc>,
    ) -> Vec<(Strategy, Vec<(String, f64)>)> {
        Strategy::ALL
            .iter()
            .map(|&strategy| {
                let mut scored: Vec<(String, f64)> = tasks
                    .iter()
                    .map(|t| {
                        let score = match self.model.score(t, now, strategy) {
                            ScoreOutcome::Score(s) => s,
                            ScoreOutcome::Unavailable => self.fallback.score(t, now),
                        };
                        (t.id.clone(), score)
                    })
                    .collect();
                scored.sort_by(|(_, a), (_, b)| b.total_cmp(a));
                (strategy, scored)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_NAMES;
    use crate::model::{ModelArtifact, PRIORITY_SCORE_OUTPUT, Stump};
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn fallback_engine() -> PriorityEngine {
        PriorityEngine::new(ModelScorer::disabled(), StrategyStore::in_memory())
    }

    fn model_engine() -> PriorityEngine {
        let artifact = ModelArtifact {
            inputs: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            output: PRIORITY_SCORE_OUTPUT.to_string(),
            base_score: 60.0,
            stumps: vec![Stump {
                feature: "strategy_preference".into(),
                threshold: 0.5,
                left: 30.0,
                right: -20.0,
            }],
            score_min: 0.0,
            score_max: 120.0,
        };
        PriorityEngine::new(
            ModelScorer::from_artifact(artifact).unwrap(),
            StrategyStore::in_memory(),
        )
    }

    #[test]
    fn test_fallback_fills_in_when_model_unavailable() {
        let engine = fallback_engine();
        let score = engine.calculate_score(&Task::new("t1", "x"), noon());
        assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn test_model_preferred_when_available() {
        let engine = model_engine();
        // Balanced preference (1.0) > 0.5 threshold: 60 - 20 = 40.
        assert_eq!(engine.calculate_score(&Task::new("t1", "x"), noon()), 40.0);
    }

    #[test]
    fn test_get_or_compute_memoizes() {
        let mut engine = fallback_engine();
        let t = Task::new("t1", "x");
        let first = engine.get_or_compute(&t, noon());
        assert_eq!(engine.cache().len(), 1);

        // A later call with a changed task still returns the cached value.
        let moved = t.clone().with_minutes(240);
        assert_eq!(engine.get_or_compute(&moved, noon()), first);
    }

    #[test]
    fn test_compute_and_cache_all_replaces_cache() {
        let mut engine = fallback_engine();
        engine.get_or_compute(&Task::new("stale", "x"), noon());

        let tasks = vec![Task::new("t1", "a"), Task::new("t2", "b")];
        let scores = engine.compute_and_cache_all(&tasks, noon());

        assert_eq!(scores.len(), 2);
        assert_eq!(engine.cache().len(), 2);
        assert!(engine.cache().get("stale").is_none());
        for t in &tasks {
            assert_eq!(engine.get_or_compute(t, noon()), scores[&t.id]);
        }
    }

    #[test]
    fn test_strategy_change_clears_cache() {
        let mut engine = model_engine();
        engine.get_or_compute(&Task::new("t1", "x"), noon());
        assert_eq!(engine.cache().len(), 1);

        engine.set_strategy(Strategy::QuickWins).unwrap();
        assert!(engine.cache().is_empty());

        // Next read recomputes under the new strategy: 60 + 30 = 90.
        assert_eq!(engine.get_or_compute(&Task::new("t1", "x"), noon()), 90.0);
    }

    #[test]
    fn test_fresh_rank_leaves_cache_alone() {
        let mut engine = fallback_engine();
        let tasks = vec![Task::new("t1", "a"), Task::new("t2", "b")];
        let _ = engine.rank(&tasks, noon(), false);
        assert!(engine.cache().is_empty());

        let _ = engine.rank(&tasks, noon(), true);
        assert_eq!(engine.cache().len(), 2);
    }

    #[test]
    fn test_compare_strategies_preserves_state() {
        let engine = model_engine();
        let tasks = vec![Task::new("t1", "a"), Task::new("t2", "b")];
        let comparison = engine.compare_strategies(&tasks, noon());

        assert_eq!(comparison.len(), 3);
        for (_, scored) in &comparison {
            assert_eq!(scored.len(), 2);
        }
        // QuickWins ordering differs in value from EatTheFrog.
        assert_eq!(comparison[0].1[0].1, 90.0);
        assert_eq!(comparison[2].1[0].1, 40.0);
        // Active strategy untouched.
        assert_eq!(engine.strategy(), Strategy::Balanced);
    }

    #[test]
    fn test_subscriber_sees_change_after_cache_clear() {
        let mut engine = fallback_engine();
        engine.get_or_compute(&Task::new("t1", "x"), noon());
        engine.subscribe(|strategy| {
            assert_eq!(strategy, Strategy::EatTheFrog);
        });
        engine.set_strategy(Strategy::EatTheFrog).unwrap();
        assert!(engine.cache().is_empty());
    }
}
