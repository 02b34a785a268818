//! Per-task score memoization.
//!
//! Scores depend on the active strategy, so the cache only ever clears
//! wholesale; there is no per-task invalidation rule. Access is serialized
//! by ownership: the engine is the single logical owner.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ScoreCache {
    scores: HashMap<String, f64>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, task_id: &str) -> Option<f64> {
        self.scores.get(task_id).copied()
    }

    pub fn insert(&mut self, task_id: impl Into<String>, score: f64) {
        self.scores.insert(task_id.into(), score);
    }

    /// Swap the cache contents for exactly this set (bulk recompute).
    pub fn replace_all(&mut self, scores: HashMap<String, f64>) {
        self.scores = scores;
    }

    /// Drop every entry. Called on any strategy change.
    pub fn clear(&mut self) {
        self.scores.clear();
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn scores(&self) -> &HashMap<String, f64> {
        &self.scores
    }
}
