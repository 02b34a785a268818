//! Ordering and suggestion heuristics over scored tasks.

use std::cmp::Ordering;

use crate::strategy::Strategy;
use crate::task::{Effort, Priority, Task};

/// Strategy suggestions need at least this many completed tasks.
pub const MIN_HISTORY_FOR_SUGGESTION: usize = 10;

// Fixed suggestion thresholds; deliberately not tunable.
const EASY_RATIO_THRESHOLD: f64 = 0.6;
const HARD_RATIO_THRESHOLD: f64 = 0.4;

// Substring matches, urgent checked first.
const URGENT_KEYWORDS: [&str; 5] = ["today", "urgent", "deadline", "immediately", "now"];
const HIGH_KEYWORDS: [&str; 4] = ["important", "finance", "health", "critical"];

/// The three-key total order: incomplete before completed, score
/// descending, then title ascending. `total_cmp` keeps the score key a
/// genuine total order even for pathological floats.
pub fn compare_ranked(a: &Task, b: &Task, score_a: f64, score_b: f64) -> Ordering {
    a.is_completed
        .cmp(&b.is_completed)
        .then_with(|| score_b.total_cmp(&score_a))
        .then_with(|| compare_titles(&a.title, &b.title))
}

/// Case-insensitive ascending, with a raw comparison after so equal-but-
/// differently-cased titles still order deterministically.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Rank tasks by a caller-supplied score lookup.
///
/// Scores are computed once per task before sorting, so every comparison
/// within the pass sees the same value for a given task.
pub fn rank_by<F>(tasks: &[Task], mut score_of: F) -> Vec<Task>
where
    F: FnMut(&Task) -> f64,
{
    let mut scored: Vec<(Task, f64)> = tasks
        .iter()
        .map(|t| (t.clone(), score_of(t)))
        .collect();
    scored.sort_by(|(a, sa), (b, sb)| compare_ranked(a, b, *sa, *sb));
    scored.into_iter().map(|(t, _)| t).collect()
}

/// The non-scored ordering used when auto-sort is off: incomplete first,
/// user priority descending, title ascending.
pub fn rank_manual(tasks: &[Task]) -> Vec<Task> {
    let mut out = tasks.to_vec();
    out.sort_by(|a, b| {
        a.is_completed
            .cmp(&b.is_completed)
            .then_with(|| b.priority.cmp(&a.priority))
            .then_with(|| compare_titles(&a.title, &b.title))
    });
    out
}

/// Share of completed tasks, 0.0 for an empty list.
pub fn completion_rate(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|t| t.is_completed).count();
    completed as f64 / tasks.len() as f64
}

/// Suggest a strategy from completion history.
///
/// Below the history minimum the answer is always `Balanced`.
pub fn suggest_strategy(history: &[Task]) -> Strategy {
    let completed: Vec<&Task> = history.iter().filter(|t| t.is_completed).collect();
    if completed.len() < MIN_HISTORY_FOR_SUGGESTION {
        return Strategy::Balanced;
    }

    let total = completed.len() as f64;
    let easy = completed.iter().filter(|t| t.effort == Effort::Low).count() as f64;
    let hard = completed.iter().filter(|t| t.effort == Effort::High).count() as f64;

    if easy / total > EASY_RATIO_THRESHOLD {
        Strategy::QuickWins
    } else if hard / total > HARD_RATIO_THRESHOLD {
        Strategy::EatTheFrog
    } else {
        Strategy::Balanced
    }
}

/// Keyword-based priority suggestion for a new task. Urgent keywords win
/// over high keywords when both appear.
pub fn suggest_priority(title: &str, note: Option<&str>) -> Priority {
    let text = format!("{} {}", title, note.unwrap_or("")).to_lowercase();

    if URGENT_KEYWORDS.iter().any(|k| text.contains(k)) {
        return Priority::Urgent;
    }
    if HIGH_KEYWORDS.iter().any(|k| text.contains(k)) {
        return Priority::High;
    }
    Priority::Normal
}
