//! Weighted ranking objective.

use std::collections::BTreeMap;

use rigs_spec::Category;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::build::CandidateBuild;

/// Per-category weights for the performance term. Missing categories weigh 1.
pub type Preferences = BTreeMap<Category, f64>;

pub const PERFORMANCE_WEIGHT: f64 = 0.5;
pub const PRICE_FIT_WEIGHT: f64 = 0.3;
pub const BALANCE_WEIGHT: f64 = 0.2;

pub fn preference_weight(preferences: &Preferences, category: Category) -> f64 {
    match preferences.get(&category) {
        Some(w) if w.is_finite() => w.max(0.0),
        Some(_) => 0.0,
        None => 1.0,
    }
}

/// Preference-weighted mean of the part scores; 0 when every weight is 0.
pub fn weighted_score(build: &CandidateBuild<'_>, preferences: &Preferences) -> f64 {
    let (sum, weights) = build
        .parts
        .iter()
        .fold((0.0, 0.0), |(sum, weights), (category, part)| {
            let w = preference_weight(preferences, *category);
            (sum + w * part.score, weights + w)
        });
    if weights > 0.0 { sum / weights } else { 0.0 }
}

/// `100 · (1 − |total − budget| / budget)`, clamped to `[0, 100]`.
pub fn price_fit(total: Decimal, budget: Decimal) -> f64 {
    if budget <= Decimal::ZERO {
        return 0.0;
    }
    let deviation = ((total - budget).abs() / budget).to_f64().unwrap_or(1.0);
    (100.0 * (1.0 - deviation)).clamp(0.0, 100.0)
}

pub fn objective(build: &CandidateBuild<'_>, budget: Decimal, preferences: &Preferences) -> f64 {
    PERFORMANCE_WEIGHT * weighted_score(build, preferences)
        + PRICE_FIT_WEIGHT * price_fit(build.total_price, budget)
        + BALANCE_WEIGHT * build.balance
}

/// Score every build and sort by objective, best first; ties go to the cheaper build.
pub fn rank_builds<'c>(
    mut builds: Vec<CandidateBuild<'c>>,
    budget: Decimal,
    preferences: &Preferences,
) -> Vec<CandidateBuild<'c>> {
    for build in &mut builds {
        build.performance_score = weighted_score(build, preferences);
        build.objective = objective(build, budget, preferences);
    }
    builds.sort_by(|a, b| {
        b.objective
            .total_cmp(&a.objective)
            .then_with(|| a.total_price.cmp(&b.total_price))
    });
    builds
}
