//! Feature extraction: task + clock + strategy -> the model's input vector.

use chrono::{DateTime, Utc};

use crate::strategy::Strategy;
use crate::task::Task;

/// Named inputs the regression model was trained on, in training order.
pub const FEATURE_NAMES: [&str; 5] = [
    "days_to_due",
    "estimated_minutes",
    "effort_level",
    "user_priority",
    "strategy_preference",
];

/// Sentinel for a task without a due date: "far away, low urgency".
pub const DAYS_TO_DUE_SENTINEL: f64 = 30.0;

/// Sentinel for a task without a duration estimate.
pub const ESTIMATED_MINUTES_SENTINEL: f64 = 30.0;

/// Ephemeral model input. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub days_to_due: f64,
    pub estimated_minutes: f64,
    pub effort_level: f64,
    pub user_priority: f64,
    pub strategy_preference: f64,
}

impl FeatureVector {
    /// Look up a feature by its trained name.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "days_to_due" => Some(self.days_to_due),
            "estimated_minutes" => Some(self.estimated_minutes),
            "effort_level" => Some(self.effort_level),
            "user_priority" => Some(self.user_priority),
            "strategy_preference" => Some(self.strategy_preference),
            _ => None,
        }
    }
}

/// Derive the model input for one task. Pure, total.
pub fn extract(task: &Task, now: DateTime<Utc>, strategy: Strategy) -> FeatureVector {
    FeatureVector {
        days_to_due: days_to_due(task, now),
        estimated_minutes: task
            .estimated_minutes
            .map(f64::from)
            .unwrap_or(ESTIMATED_MINUTES_SENTINEL),
        effort_level: task.effort.level(),
        user_priority: task.priority.ordinal(),
        strategy_preference: strategy.preference_value(),
    }
}

/// Signed whole-day count from `now` to the task's due date.
///
/// Calendar-day difference, not elapsed 24h periods: a task due tomorrow
/// morning counts as 1 even at 23:59 tonight. Overdue tasks go negative.
pub fn days_to_due(task: &Task, now: DateTime<Utc>) -> f64 {
    match task.due_date {
        Some(due) => (due.date_naive() - now.date_naive()).num_days() as f64,
        None => DAYS_TO_DUE_SENTINEL,
    }
}
