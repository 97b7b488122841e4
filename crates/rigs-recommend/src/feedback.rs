//! Adaptive feedback from accepted and rejected builds.
//!
//! [`RecommenderState`] is owned by the caller (a session, a request scope)
//! and passed into every recommendation. Updates take `&mut self`, so one
//! writer applies one decision at a time; hosts sharing a state across
//! threads wrap it in a `Mutex`.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use rigs_spec::score::MAX_SCORE;
use rigs_spec::score_component;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::build::CandidateBuild;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Base learning rate, decayed as `BASE_LEARNING_RATE / (1 + interactions)`.
pub const BASE_LEARNING_RATE: f64 = 0.1;

/// Running preference score of one component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreferenceScore {
    pub score: f64,
    pub interactions: u32,
}

impl PreferenceScore {
    pub fn learning_rate(&self) -> f64 {
        BASE_LEARNING_RATE / (1.0 + f64::from(self.interactions))
    }

    fn observe(&mut self, accepted: bool) {
        let target = if accepted { MAX_SCORE } else { 0.0 };
        self.score = (self.score + self.learning_rate() * (target - self.score)).clamp(0.0, MAX_SCORE);
        self.interactions = self.interactions.saturating_add(1);
    }
}

/// One recorded accept/reject decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDecision {
    pub template: String,
    pub components: Vec<String>,
    pub total_price: Decimal,
    pub accepted: bool,
    pub recorded_at: DateTime<Utc>,
}

/// Engine-owned mutable state: learned preferences and a bounded decision history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommenderState {
    #[serde(default)]
    preferences: HashMap<String, PreferenceScore>,
    #[serde(default)]
    history: VecDeque<BuildDecision>,
    #[serde(default = "default_history_capacity")]
    history_capacity: usize,
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Default for RecommenderState {
    fn default() -> Self {
        Self::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl RecommenderState {
    pub fn with_history_capacity(history_capacity: usize) -> Self {
        Self {
            preferences: HashMap::new(),
            history: VecDeque::with_capacity(history_capacity.min(DEFAULT_HISTORY_CAPACITY)),
            history_capacity,
        }
    }

    /// Learn from a decision about `build`.
    ///
    /// Each part's running score starts at its raw score and moves toward 100
    /// on accept or 0 on reject, by a rate that shrinks with every observation.
    pub fn record_feedback(&mut self, build: &CandidateBuild<'_>, accepted: bool) {
        for part in build.parts.values() {
            let entry = self
                .preferences
                .entry(part.id.to_string())
                .or_insert_with(|| PreferenceScore {
                    score: score_component(part.component),
                    interactions: 0,
                });
            entry.observe(accepted);
            log::debug!(
                "Preference for {} now {:.2} after {} interactions",
                part.id,
                entry.score,
                entry.interactions
            );
        }

        if self.history_capacity == 0 {
            return;
        }
        while self.history.len() >= self.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(BuildDecision {
            template: build.template.clone(),
            components: build.parts.values().map(|p| p.id.to_string()).collect(),
            total_price: build.total_price,
            accepted,
            recorded_at: Utc::now(),
        });
    }

    /// Learned preference for `id` if there is one, `raw` otherwise.
    pub fn effective_score(&self, id: &str, raw: f64) -> f64 {
        self.preferences.get(id).map_or(raw, |p| p.score)
    }

    pub fn preference(&self, id: &str) -> Option<&PreferenceScore> {
        self.preferences.get(id)
    }

    /// Decisions oldest first.
    pub fn history(&self) -> impl Iterator<Item = &BuildDecision> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }
}
