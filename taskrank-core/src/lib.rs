//! taskrank-core: task priority scoring and ranking engine.
//!
//! Given a task's deadline, estimated duration, effort, user priority and
//! the active strategy preference, produce an urgency/importance score and
//! a stable total ordering over a task list. Scoring tries a pre-trained
//! regression model first and falls back to a closed-form scorer when the
//! model is unavailable. Persistence, notifications and UI live outside
//! this crate.

pub mod cache;
pub mod engine;
pub mod fallback;
pub mod features;
pub mod model;
pub mod ranker;
pub mod settings;
pub mod strategy;
pub mod task;

pub use cache::ScoreCache;
pub use engine::PriorityEngine;
pub use fallback::FallbackScorer;
pub use features::{FEATURE_NAMES, FeatureVector, extract};
pub use model::{ModelArtifact, ModelScorer, PRIORITY_SCORE_OUTPUT, ScoreOutcome, Stump};
pub use ranker::{
    completion_rate, compare_ranked, rank_by, rank_manual, suggest_priority, suggest_strategy,
};
pub use settings::{
    FileSettingsStore, MemorySettingsStore, SettingsStore, StrategySettings, StrategyStore,
};
pub use strategy::Strategy;
pub use task::{Effort, Priority, Task};
