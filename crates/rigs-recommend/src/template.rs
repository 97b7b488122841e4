//! Budget templates and their scaling to an absolute budget.

use std::collections::BTreeSet;

use rigs_spec::Category;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::RecommendError;

/// Per-category allocation inside a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CategoryTarget {
    pub category: Category,
    /// Fraction of the budget, in `[0, 1]`
    pub budget_share: Decimal,
    /// Minimum component score at the template's target price
    #[serde(default)]
    pub min_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
}

impl CategoryTarget {
    pub fn new(category: Category, budget_share: Decimal, min_score: f64) -> Self {
        Self {
            category,
            budget_share,
            min_score,
            min_price: None,
            max_price: None,
        }
    }
}

/// A named budget template. Categories are assembled in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildTemplate {
    pub name: String,
    pub target_price: Decimal,
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryTarget>,
}

/// A category target resolved against an absolute budget.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledTarget {
    pub category: Category,
    /// Absolute spend allowed for this category
    pub budget: Decimal,
    pub min_score: f64,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl ScaledTarget {
    /// Whether a component with this price and raw score survives filtering.
    pub fn admits(&self, price: Decimal, score: f64) -> bool {
        score >= self.min_score
            && price <= self.budget
            && self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
    }
}

impl BuildTemplate {
    pub fn new(name: impl Into<String>, target_price: Decimal) -> Self {
        Self {
            name: name.into(),
            target_price,
            categories: Vec::new(),
        }
    }

    pub fn with_category(mut self, target: CategoryTarget) -> Self {
        self.categories.push(target);
        self
    }

    pub fn validate(&self) -> Result<(), RecommendError> {
        let invalid = |reason: String| RecommendError::InvalidTemplate {
            name: self.name.clone(),
            reason,
        };

        if self.target_price <= Decimal::ZERO {
            return Err(invalid(format!(
                "target price must be positive, got {}",
                self.target_price
            )));
        }
        if self.categories.is_empty() {
            return Err(invalid("no categories".to_string()));
        }

        let mut seen = BTreeSet::new();
        for target in &self.categories {
            if !seen.insert(target.category) {
                return Err(invalid(format!("duplicate category {}", target.category)));
            }
            if target.budget_share < Decimal::ZERO || target.budget_share > Decimal::ONE {
                return Err(invalid(format!(
                    "budget share for {} must be within [0, 1], got {}",
                    target.category, target.budget_share
                )));
            }
            if !target.min_score.is_finite() || target.min_score < 0.0 {
                return Err(invalid(format!(
                    "minimum score for {} must be non-negative, got {}",
                    target.category, target.min_score
                )));
            }
            if let (Some(min), Some(max)) = (target.min_price, target.max_price) {
                if min > max {
                    return Err(invalid(format!(
                        "price bounds for {} are inverted ({min} > {max})",
                        target.category
                    )));
                }
            }
        }
        Ok(())
    }

    /// `max(0, budget / target price)`.
    pub fn scale_factor(&self, budget: Decimal) -> f64 {
        if self.target_price <= Decimal::ZERO {
            return 0.0;
        }
        (budget / self.target_price)
            .to_f64()
            .unwrap_or(0.0)
            .max(0.0)
    }

    /// Resolve every category against `budget`; negative budgets behave like zero.
    pub fn scale(&self, budget: Decimal) -> Vec<ScaledTarget> {
        let factor = self.scale_factor(budget);
        let budget = budget.max(Decimal::ZERO);
        self.categories
            .iter()
            .map(|t| ScaledTarget {
                category: t.category,
                budget: budget * t.budget_share,
                min_score: (t.min_score * factor).min(rigs_spec::score::MAX_SCORE),
                min_price: t.min_price,
                max_price: t.max_price,
            })
            .collect()
    }
}

fn template(name: &str, target_price: Decimal, rows: &[(Category, Decimal, f64)]) -> BuildTemplate {
    rows.iter().fold(
        BuildTemplate::new(name, target_price),
        |template, &(category, share, min_score)| {
            template.with_category(CategoryTarget::new(category, share, min_score))
        },
    )
}

/// Templates shipped with the engine.
pub fn builtin_templates() -> Vec<BuildTemplate> {
    use Category::*;
    vec![
        template(
            "budget",
            dec!(30000),
            &[
                (Cpu, dec!(0.22), 30.0),
                (Motherboard, dec!(0.15), 0.0),
                (Ram, dec!(0.10), 20.0),
                (Storage, dec!(0.10), 0.0),
                (Gpu, dec!(0.25), 20.0),
                (Psu, dec!(0.09), 0.0),
                (Case, dec!(0.09), 0.0),
            ],
        ),
        template(
            "mainstream",
            dec!(60000),
            &[
                (Cpu, dec!(0.20), 40.0),
                (Motherboard, dec!(0.13), 0.0),
                (Ram, dec!(0.08), 30.0),
                (Storage, dec!(0.08), 0.0),
                (Gpu, dec!(0.35), 30.0),
                (Psu, dec!(0.08), 0.0),
                (Case, dec!(0.08), 0.0),
            ],
        ),
        template(
            "enthusiast",
            dec!(120000),
            &[
                (Cpu, dec!(0.20), 50.0),
                (Motherboard, dec!(0.12), 0.0),
                (Ram, dec!(0.08), 40.0),
                (Storage, dec!(0.08), 0.0),
                (Gpu, dec!(0.40), 40.0),
                (Psu, dec!(0.07), 0.0),
                (Case, dec!(0.05), 0.0),
            ],
        ),
    ]
}
