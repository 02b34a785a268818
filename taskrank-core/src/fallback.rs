//! Closed-form fallback scorer: always available, no model required.
//!
//! A logistic-regression-style weighted sum over normalized features.
//! Deliberately strategy-agnostic; the learned model is the only place
//! the strategy preference matters. Output is on a [0, 100] scale, which
//! is distinct from the model's [0, 120] scale; scores are only ever
//! compared against scores from the same scorer within one ranking pass.

use chrono::{DateTime, Utc};

use crate::features::days_to_due;
use crate::task::{Effort, Task};

const W_BIAS: f64 = 0.10;
const W_URGENCY: f64 = 0.45;
const W_SHORTNESS: f64 = 0.25;
const W_EFFORT: f64 = 0.15;
const W_USER_PRIORITY: f64 = 0.35;

/// Neutral urgency assumed when a task carries no due date.
pub const NO_DUE_DATE_URGENCY: f64 = 0.2;

/// Neutral shortness assumed when the duration is unknown.
pub const UNKNOWN_MINUTES_SHORTNESS: f64 = 0.5;

/// Days out at which urgency bottoms out.
const URGENCY_HORIZON_DAYS: f64 = 30.0;

/// A task this short (or shorter) gets full shortness credit.
const SHORTEST_TASK_MINUTES: f64 = 15.0;

/// Shortness falls to zero over this many minutes past the shortest.
const SHORTNESS_RANGE_MINUTES: f64 = 45.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackScorer;

impl FallbackScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score a task on [0, 100]. Total function; never fails.
    pub fn score(&self, task: &Task, now: DateTime<Utc>) -> f64 {
        let urgency = self.urgency(task, now);
        let shortness = self.shortness(task.estimated_minutes);
        let effort_low = self.effort_low(task.effort);
        let user_priority = task.priority.ordinal() / 3.0;

        let linear = W_BIAS
            + W_URGENCY * urgency
            + W_SHORTNESS * shortness
            + W_EFFORT * effort_low
            + W_USER_PRIORITY * user_priority;

        sigmoid(linear) * 100.0
    }

    /// 1.0 at/past due, falling linearly to 0.0 at the 30-day horizon.
    /// Overdue tasks clamp at 1.0.
    fn urgency(&self, task: &Task, now: DateTime<Utc>) -> f64 {
        if task.due_date.is_none() {
            return NO_DUE_DATE_URGENCY;
        }
        let days = days_to_due(task, now);
        (1.0 - days / URGENCY_HORIZON_DAYS).clamp(0.0, 1.0)
    }

    /// 1.0 for a 15-minute task, 0.0 at 60 minutes and beyond.
    fn shortness(&self, minutes: Option<u32>) -> f64 {
        match minutes {
            Some(m) => {
                (1.0 - (f64::from(m) - SHORTEST_TASK_MINUTES) / SHORTNESS_RANGE_MINUTES)
                    .clamp(0.0, 1.0)
            }
            None => UNKNOWN_MINUTES_SHORTNESS,
        }
    }

    fn effort_low(&self, effort: Effort) -> f64 {
        match effort {
            Effort::Low => 1.0,
            Effort::Medium => 0.5,
            Effort::High => 0.0,
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use chrono::{Duration, TimeZone};

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn expected(urgency: f64, shortness: f64, effort_low: f64, priority_ordinal: f64) -> f64 {
        let linear = 0.10 + 0.45 * urgency + 0.25 * shortness + 0.15 * effort_low
            + 0.35 * (priority_ordinal / 3.0);
        (1.0 / (1.0 + (-linear).exp())) * 100.0
    }

    #[test]
    fn test_sentinel_defaults_exact() {
        // No due date and no estimate: urgency 0.2, shortness 0.5 exactly.
        let t = Task::new("t1", "bare");
        let got = FallbackScorer::new().score(&t, noon());
        assert_eq!(got, expected(0.2, 0.5, 0.5, 1.0));
    }

    #[test]
    fn test_range_over_extremes() {
        let scorer = FallbackScorer::new();
        let now = noon();

        let best = Task::new("t1", "best")
            .with_due_date(now - Duration::days(10))
            .with_minutes(10)
            .with_effort(Effort::Low)
            .with_priority(Priority::Urgent);
        let worst = Task::new("t2", "worst")
            .with_due_date(now + Duration::days(365))
            .with_minutes(600)
            .with_effort(Effort::High)
            .with_priority(Priority::Low);

        for t in [&best, &worst] {
            let s = scorer.score(t, now);
            assert!((0.0..=100.0).contains(&s), "score {s} out of range");
        }
        assert!(scorer.score(&best, now) > scorer.score(&worst, now));
    }

    #[test]
    fn test_overdue_clamps_to_full_urgency() {
        let scorer = FallbackScorer::new();
        let now = noon();
        let due_now = Task::new("t1", "a").with_due_date(now);
        let long_overdue = Task::new("t2", "a").with_due_date(now - Duration::days(90));
        assert_eq!(scorer.score(&due_now, now), scorer.score(&long_overdue, now));
    }

    #[test]
    fn test_shortness_boundaries() {
        let scorer = FallbackScorer::new();
        assert_eq!(scorer.shortness(Some(15)), 1.0);
        assert_eq!(scorer.shortness(Some(60)), 0.0);
        assert_eq!(scorer.shortness(Some(5)), 1.0);
        assert_eq!(scorer.shortness(Some(240)), 0.0);
        assert_eq!(scorer.shortness(None), UNKNOWN_MINUTES_SHORTNESS);
    }

    #[test]
    fn test_monotonic_in_due_distance() {
        let scorer = FallbackScorer::new();
        let now = noon();
        let mut prev = f64::MAX;
        for days in [-5i64, 0, 3, 10, 20, 29, 45] {
            let t = Task::new("t", "x").with_due_date(now + Duration::days(days));
            let s = scorer.score(&t, now);
            assert!(s <= prev, "score increased as due date moved out ({days}d)");
            prev = s;
        }
    }

    #[test]
    fn test_monotonic_in_minutes() {
        let scorer = FallbackScorer::new();
        let now = noon();
        let mut prev = f64::MAX;
        for minutes in [15u32, 20, 30, 45, 60, 120] {
            let s = scorer.score(&Task::new("t", "x").with_minutes(minutes), now);
            assert!(s <= prev, "score increased with longer estimate ({minutes}m)");
            prev = s;
        }
    }

    #[test]
    fn test_monotonic_in_priority() {
        let scorer = FallbackScorer::new();
        let now = noon();
        let mut prev = f64::MIN;
        for p in [Priority::Low, Priority::Normal, Priority::High, Priority::Urgent] {
            let s = scorer.score(&Task::new("t", "x").with_priority(p), now);
            assert!(s >= prev, "score decreased with higher priority ({p:?})");
            prev = s;
        }
    }
}
