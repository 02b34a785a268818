//! Strategy preference: biases how the learned model weighs easy vs hard tasks.
//!
//! The active strategy is fed to the model as a raw ordinal feature
//! (`strategy_preference`). The fallback scorer ignores it on purpose.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Strategy {
    QuickWins,
    #[default]
    Balanced,
    EatTheFrog,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::QuickWins, Strategy::Balanced, Strategy::EatTheFrog];

    /// Ordinal feature value fed to the model as `strategy_preference`.
    pub fn preference_value(self) -> f64 {
        match self {
            Strategy::QuickWins => 0.0,
            Strategy::Balanced => 1.0,
            Strategy::EatTheFrog => 2.0,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Strategy::QuickWins => "Quick Wins",
            Strategy::Balanced => "Balanced",
            Strategy::EatTheFrog => "Eat the Frog",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Strategy::QuickWins => {
                "Start your day with easy and short tasks. Gain momentum and boost motivation."
            }
            Strategy::Balanced => {
                "A balanced approach between urgency, importance, and difficulty. Suitable for most users."
            }
            Strategy::EatTheFrog => {
                "Start your morning with the hardest and most important task. Increase productivity throughout the day."
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quick-wins" | "quickwins" => Ok(Strategy::QuickWins),
            "balanced" => Ok(Strategy::Balanced),
            "eat-the-frog" | "eatthefrog" => Ok(Strategy::EatTheFrog),
            other => Err(anyhow::anyhow!(
                "unknown strategy '{other}' (expected quick-wins, balanced, or eat-the-frog)"
            )),
        }
    }
}
