//! Task record consumed by the scoring engine.
//!
//! The engine only ever reads tasks. Creating, storing and mutating them
//! belongs to the surrounding application (persistence, UI, sync).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subjective difficulty, ordinal low < medium < high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Effort {
    Low = 0,
    #[default]
    Medium = 1,
    High = 2,
}

impl Effort {
    /// Ordinal encoding fed to the model as `effort_level`.
    pub fn level(self) -> f64 {
        self as i32 as f64
    }
}

/// User-declared importance, ordinal 0..3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Priority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
    Urgent = 3,
}

impl Priority {
    /// Ordinal encoding fed to the model as `user_priority`.
    pub fn ordinal(self) -> f64 {
        self as i32 as f64
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }
}

/// Core task type.
///
/// `id` is opaque and stable; score caching keys on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,

    /// Free text, consumed only by the priority-suggestion heuristic.
    pub note: Option<String>,

    /// Absent means "no deadline pressure".
    pub due_date: Option<DateTime<Utc>>,

    /// Minutes. Absent means "unknown duration".
    pub estimated_minutes: Option<u32>,

    pub effort: Effort,
    pub priority: Priority,
    pub is_completed: bool,

    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            note: None,
            due_date: None,
            estimated_minutes: None,
            effort: Effort::default(),
            priority: Priority::default(),
            is_completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_minutes(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    pub fn with_effort(mut self, effort: Effort) -> Self {
        self.effort = effort;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn completed(mut self) -> Self {
        self.is_completed = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_encodings() {
        assert_eq!(Effort::Low.level(), 0.0);
        assert_eq!(Effort::Medium.level(), 1.0);
        assert_eq!(Effort::High.level(), 2.0);

        assert_eq!(Priority::Low.ordinal(), 0.0);
        assert_eq!(Priority::Urgent.ordinal(), 3.0);
    }

    #[test]
    fn test_defaults() {
        let t = Task::new("t1", "write report");
        assert_eq!(t.effort, Effort::Medium);
        assert_eq!(t.priority, Priority::Normal);
        assert!(t.due_date.is_none());
        assert!(t.estimated_minutes.is_none());
        assert!(!t.is_completed);
    }

    #[test]
    fn test_serde_round_trip() {
        let t = Task::new("t1", "file taxes")
            .with_minutes(45)
            .with_effort(Effort::High)
            .with_priority(Priority::Urgent);
        let json = serde_json::to_string(&t).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
