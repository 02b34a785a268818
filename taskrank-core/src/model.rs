//! Learned priority scorer: wraps an optional pre-trained regression artifact.
//!
//! The artifact is a gradient-boosted-stump dump (JSON) trained offline on
//! the five named features in [`crate::features::FEATURE_NAMES`]. Loading is
//! attempted exactly once at construction; any failure leaves the scorer
//! permanently unavailable and callers fall through to the fallback scorer.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::features::{FEATURE_NAMES, FeatureVector, extract};
use crate::strategy::Strategy;
use crate::task::Task;

/// The single named output the engine requests from the model.
pub const PRIORITY_SCORE_OUTPUT: &str = "priority_score";

fn default_score_min() -> f64 {
    0.0
}

fn default_score_max() -> f64 {
    120.0
}

/// One decision stump: contributes `left` when `feature <= threshold`,
/// `right` otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct Stump {
    pub feature: String,
    pub threshold: f64,
    pub left: f64,
    pub right: f64,
}

/// Serialized regression model: named inputs, one named output.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub inputs: Vec<String>,
    pub output: String,
    pub base_score: f64,
    pub stumps: Vec<Stump>,
    #[serde(default = "default_score_min")]
    pub score_min: f64,
    #[serde(default = "default_score_max")]
    pub score_max: f64,
}

impl ModelArtifact {
    /// Reject artifacts the runtime cannot evaluate faithfully.
    fn validate(&self) -> Result<()> {
        for name in &self.inputs {
            if !FEATURE_NAMES.contains(&name.as_str()) {
                bail!("artifact declares unknown input feature '{name}'");
            }
        }
        for stump in &self.stumps {
            if !self.inputs.iter().any(|i| i == &stump.feature) {
                bail!("stump references undeclared feature '{}'", stump.feature);
            }
            if !stump.threshold.is_finite() || !stump.left.is_finite() || !stump.right.is_finite() {
                bail!("stump on '{}' has non-finite parameters", stump.feature);
            }
        }
        if !self.base_score.is_finite() || self.score_min > self.score_max {
            bail!("artifact score range is malformed");
        }
        Ok(())
    }

    /// Evaluate the ensemble, requesting one named output.
    ///
    /// `None` mirrors a failed inference call: wrong output name or an
    /// unresolvable feature, never a panic.
    pub fn predict(&self, features: &FeatureVector, output: &str) -> Option<f64> {
        if self.output != output {
            return None;
        }
        let mut y = self.base_score;
        for stump in &self.stumps {
            let x = features.get(&stump.feature)?;
            y += if x <= stump.threshold { stump.left } else { stump.right };
        }
        Some(y.clamp(self.score_min, self.score_max))
    }
}

/// Outcome of a model scoring call. `Unavailable` is a recovered
/// condition, not an error: callers fall through to the fallback scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreOutcome {
    Score(f64),
    Unavailable,
}

/// Model-backed scorer. Either loaded or permanently unavailable;
/// the state is decided once at startup and never retried.
#[derive(Debug, Clone)]
pub struct ModelScorer {
    model: Option<ModelArtifact>,
}

impl ModelScorer {
    /// Try to load the artifact. Failure is downgraded to "unavailable".
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(artifact) => {
                info!(path = %path.display(), stumps = artifact.stumps.len(), "priority model loaded");
                Self { model: Some(artifact) }
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "priority model unavailable, fallback scoring in force");
                Self { model: None }
            }
        }
    }

    fn try_load(path: &Path) -> Result<ModelArtifact> {
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let artifact: ModelArtifact =
            serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// A scorer with no model at all. Every call returns `Unavailable`.
    pub fn disabled() -> Self {
        Self { model: None }
    }

    /// Wrap an already-deserialized artifact (embedding, tests).
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate()?;
        Ok(Self { model: Some(artifact) })
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    /// Score one task, or report the model unusable for this call.
    pub fn score(&self, task: &Task, now: DateTime<Utc>, strategy: Strategy) -> ScoreOutcome {
        let Some(model) = &self.model else {
            return ScoreOutcome::Unavailable;
        };

        let features = extract(task, now, strategy);
        match model.predict(&features, PRIORITY_SCORE_OUTPUT) {
            Some(score) => {
                debug!(task = %task.id, score, "model score");
                ScoreOutcome::Score(score)
            }
            None => {
                warn!(task = %task.id, "model prediction failed, falling back");
                ScoreOutcome::Unavailable
            }
        }
    }
}
