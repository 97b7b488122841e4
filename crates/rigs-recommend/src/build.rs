use std::collections::BTreeMap;

use rigs_spec::compat::CompatibilityRules;
use rigs_spec::score::balance_score;
use rigs_spec::{Category, CompatibilityVerdict, Component, ProfileScores};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::feedback::RecommenderState;
use crate::pool::PricedComponent;

/// One selected component of a build.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPart<'c> {
    #[serde(skip)]
    pub component: &'c Component,
    pub id: &'c str,
    pub name: &'c str,
    pub price: Decimal,
    /// Score used for ranking: the learned preference when there is one, else the raw score
    pub score: f64,
}

/// A complete assignment of components to a template's categories.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateBuild<'c> {
    pub template: String,
    pub parts: BTreeMap<Category, BuildPart<'c>>,
    pub total_price: Decimal,
    /// Preference-weighted mean part score; set by ranking
    pub performance_score: f64,
    pub profile: ProfileScores,
    pub balance: f64,
    /// Ranking objective; set by ranking
    pub objective: f64,
    pub compatibility: CompatibilityVerdict,
}

impl<'c> CandidateBuild<'c> {
    /// Assemble a build from one generated combination and run the compatibility rules on it.
    pub fn assemble(
        template: &str,
        selection: &[&PricedComponent<'c>],
        state: &RecommenderState,
        rules: &CompatibilityRules,
    ) -> Self {
        let parts: BTreeMap<Category, BuildPart<'c>> = selection
            .iter()
            .map(|p| {
                let component: &'c Component = p.component;
                let part = BuildPart {
                    component,
                    id: &component.id,
                    name: &component.name,
                    price: p.price,
                    score: state.effective_score(&component.id, p.score),
                };
                (component.category, part)
            })
            .collect();

        let components = selection.iter().map(|p| p.component).collect::<Vec<_>>();
        let scores = parts.values().map(|p| p.score).collect::<Vec<_>>();

        Self {
            template: template.to_string(),
            total_price: parts.values().map(|p| p.price).sum(),
            performance_score: 0.0,
            profile: ProfileScores::for_build(&components),
            balance: balance_score(&scores),
            objective: 0.0,
            compatibility: rules.check(&components),
            parts,
        }
    }

    pub fn components(&self) -> impl Iterator<Item = &'c Component> + '_ {
        self.parts.values().map(|p| p.component)
    }

    pub fn part(&self, category: Category) -> Option<&BuildPart<'c>> {
        self.parts.get(&category)
    }
}
