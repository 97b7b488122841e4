//! Bounded, category-by-category combination generation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ceiling on partial combinations kept after any expansion step.
pub const DEFAULT_COMBINATION_LIMIT: usize = 1000;

/// What to keep once an expansion step reaches the combination limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpansionStrategy {
    /// The first partials in catalog order; later ones are discarded.
    #[default]
    FirstN,
    /// The best partials by summed weight.
    TopK,
}

impl fmt::Display for ExpansionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExpansionStrategy::FirstN => "first-n",
            ExpansionStrategy::TopK => "top-k",
        })
    }
}

impl FromStr for ExpansionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first-n" | "firstn" | "first" => Ok(ExpansionStrategy::FirstN),
            "top-k" | "topk" | "top" => Ok(ExpansionStrategy::TopK),
            _ => Err(format!("unknown expansion strategy '{s}' (expected first-n or top-k)")),
        }
    }
}

/// Result of expanding every pool.
#[derive(Debug, Clone)]
pub struct Expansion<T> {
    pub combinations: Vec<Vec<T>>,
    /// Partial combinations kept after each step
    pub step_sizes: Vec<usize>,
    /// Whether any step hit the limit
    pub truncated: bool,
}

/// Extend partial combinations one pool at a time, never holding more than
/// `limit` partials after a step.
pub fn expand<T, F>(pools: &[Vec<T>], limit: usize, strategy: ExpansionStrategy, weight: F) -> Expansion<T>
where
    T: Copy,
    F: Fn(&T) -> f64,
{
    let limit = limit.max(1);
    let mut partials: Vec<Vec<T>> = vec![Vec::new()];
    let mut step_sizes = Vec::with_capacity(pools.len());
    let mut truncated = false;

    for (step, pool) in pools.iter().enumerate() {
        let next = match strategy {
            ExpansionStrategy::FirstN => {
                let mut next = Vec::with_capacity(limit.min(partials.len() * pool.len()));
                'fill: for partial in &partials {
                    for item in pool {
                        if next.len() >= limit {
                            truncated = true;
                            break 'fill;
                        }
                        let mut extended = Vec::with_capacity(partial.len() + 1);
                        extended.extend_from_slice(partial);
                        extended.push(*item);
                        next.push(extended);
                    }
                }
                next
            }
            ExpansionStrategy::TopK => {
                let weight = &weight;
                let mut scored: Vec<(f64, Vec<T>)> = partials
                    .iter()
                    .flat_map(|partial| {
                        let base: f64 = partial.iter().map(weight).sum();
                        pool.iter().map(move |item| {
                            let mut extended = partial.clone();
                            extended.push(*item);
                            (base + weight(item), extended)
                        })
                    })
                    .collect();
                if scored.len() > limit {
                    truncated = true;
                }
                // Stable: ties keep catalog order
                scored.sort_by(|a, b| b.0.total_cmp(&a.0));
                scored.truncate(limit);
                scored.into_iter().map(|(_, p)| p).collect()
            }
        };

        log::debug!("Expansion step {}: {} partial combinations", step + 1, next.len());
        step_sizes.push(next.len());
        partials = next;
    }

    Expansion {
        combinations: partials,
        step_sizes,
        truncated,
    }
}
