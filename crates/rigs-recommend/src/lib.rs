//! Build recommendation over a component catalog.
//!
//! A [`Recommender`] prices the catalog once, then answers any number of
//! template/budget requests:
//!
//! 1. scale the template to the budget,
//! 2. filter each category's pool by scaled minimum score and budget share,
//! 3. expand combinations category by category under a fixed ceiling,
//! 4. drop combinations that fail the compatibility rules,
//! 5. rank what is left.
//!
//! Learned preferences live in a caller-owned [`RecommenderState`].

pub mod build;
pub mod config;
pub mod feedback;
pub mod generate;
pub mod pool;
pub mod rank;
pub mod template;

use std::path::PathBuf;

use rigs_spec::Component;
use rigs_spec::compat::CompatibilityRules;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::pool::CandidatePool;

pub use build::{BuildPart, CandidateBuild};
pub use config::{EngineConfig, RigsToml};
pub use feedback::RecommenderState;
pub use generate::ExpansionStrategy;
pub use pool::PricedComponent;
pub use rank::{Preferences, rank_builds};
pub use template::{BuildTemplate, CategoryTarget, builtin_templates};

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Invalid template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },

    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid engine setting: {0}")]
    Invalid(String),

    #[error(transparent)]
    Template(#[from] RecommendError),
}

/// Recommendation engine over one catalog snapshot.
pub struct Recommender<'c> {
    pool: CandidatePool<'c>,
    engine: EngineConfig,
    rules: CompatibilityRules,
}

impl<'c> Recommender<'c> {
    pub fn new(catalog: &'c [Component], engine: EngineConfig) -> Self {
        let rules = engine.rules();
        Self {
            pool: CandidatePool::from_catalog(catalog),
            engine,
            rules,
        }
    }

    /// Best build for `template` at `budget`, or `None` when nothing feasible exists.
    pub fn recommend_build(
        &self,
        state: &RecommenderState,
        template: &BuildTemplate,
        budget: Decimal,
        preferences: &Preferences,
    ) -> Result<Option<CandidateBuild<'c>>, RecommendError> {
        Ok(self
            .recommend_builds(state, template, budget, preferences, 1)?
            .into_iter()
            .next())
    }

    /// Up to `top_n` compatible builds, best first.
    ///
    /// Only an invalid template is an error; an empty category pool or a
    /// fully incompatible search space yields an empty list.
    pub fn recommend_builds(
        &self,
        state: &RecommenderState,
        template: &BuildTemplate,
        budget: Decimal,
        preferences: &Preferences,
        top_n: usize,
    ) -> Result<Vec<CandidateBuild<'c>>, RecommendError> {
        template.validate()?;

        let mut pools = Vec::with_capacity(template.categories.len());
        for target in template.scale(budget) {
            let survivors: Vec<&PricedComponent<'c>> = self
                .pool
                .category(target.category)
                .iter()
                .filter(|p| target.admits(p.price, p.score))
                .collect();
            log::debug!(
                "{}: {} of {} candidates within {} and score >= {:.1}",
                target.category,
                survivors.len(),
                self.pool.category(target.category).len(),
                target.budget,
                target.min_score
            );
            if survivors.is_empty() {
                log::info!(
                    "No {} fits template '{}' at budget {budget}",
                    target.category,
                    template.name
                );
                return Ok(Vec::new());
            }
            pools.push(survivors);
        }

        let expansion = generate::expand(
            &pools,
            self.engine.combination_limit,
            self.engine.expansion,
            |p| {
                rank::preference_weight(preferences, p.component.category)
                    * state.effective_score(&p.component.id, p.score)
            },
        );
        if expansion.truncated {
            log::debug!(
                "Combination limit {} reached ({} strategy)",
                self.engine.combination_limit,
                self.engine.expansion
            );
        }

        let generated = expansion.combinations.len();
        let builds: Vec<CandidateBuild<'c>> = expansion
            .combinations
            .iter()
            .map(|selection| CandidateBuild::assemble(&template.name, selection, state, &self.rules))
            .filter(|build| {
                if !build.compatibility.compatible {
                    log::debug!("Dropping build: {}", build.compatibility.reason);
                }
                build.compatibility.compatible
            })
            .collect();
        log::info!(
            "Template '{}': {} of {generated} generated builds are compatible",
            template.name,
            builds.len()
        );

        let mut ranked = rank_builds(builds, budget, preferences);
        ranked.truncate(top_n);
        Ok(ranked)
    }
}
