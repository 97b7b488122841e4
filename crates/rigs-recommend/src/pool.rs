//! The priced, in-stock candidate pool.

use std::collections::BTreeMap;

use rigs_spec::{Category, Component, score_component};
use rust_decimal::Decimal;

/// An eligible component with its resolved price and raw score.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedComponent<'c> {
    pub component: &'c Component,
    pub price: Decimal,
    pub score: f64,
}

impl<'c> PricedComponent<'c> {
    /// `None` unless the component has stock and a valid price.
    pub fn resolve(component: &'c Component) -> Option<Self> {
        let availability = component.availability();
        if availability.quantity == 0 {
            return None;
        }
        let price = availability.best_price?;
        Some(Self {
            component,
            price,
            score: score_component(component),
        })
    }
}

/// Eligible components grouped by category, in catalog order.
#[derive(Debug, Default)]
pub struct CandidatePool<'c> {
    by_category: BTreeMap<Category, Vec<PricedComponent<'c>>>,
}

impl<'c> CandidatePool<'c> {
    pub fn from_catalog(catalog: &'c [Component]) -> Self {
        let mut by_category: BTreeMap<Category, Vec<PricedComponent<'c>>> = BTreeMap::new();
        let mut skipped = 0usize;
        for component in catalog {
            match PricedComponent::resolve(component) {
                Some(priced) => by_category
                    .entry(component.category)
                    .or_default()
                    .push(priced),
                None => skipped += 1,
            }
        }
        log::debug!(
            "Candidate pool: {} eligible, {skipped} without stock or price",
            catalog.len() - skipped
        );
        Self { by_category }
    }

    pub fn category(&self, category: Category) -> &[PricedComponent<'c>] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigs_spec::Batch;
    use rust_decimal_macros::dec;

    fn stocked(id: &str, category: Category, remaining: u32, price: Decimal) -> Component {
        Component::new(id, id, category).with_batch(Batch {
            batch_id: format!("{id}-1"),
            quantity: remaining.max(1),
            remaining,
            buy_price: Decimal::ZERO,
            sell_price: price,
            date_added: None,
        })
    }

    #[test]
    fn test_pool_keeps_only_eligible_components() {
        let catalog = vec![
            stocked("gpu-a", Category::Gpu, 2, dec!(15000)),
            stocked("gpu-b", Category::Gpu, 0, dec!(9000)),
            Component::new("gpu-c", "No batches", Category::Gpu),
            stocked("cpu-a", Category::Cpu, 1, dec!(8000)),
        ];
        let pool = CandidatePool::from_catalog(&catalog);

        assert_eq!(pool.category(Category::Cpu).len(), 1);
        let gpus = pool.category(Category::Gpu);
        assert_eq!(gpus.len(), 1);
        assert_eq!(gpus[0].component.id, "gpu-a");
        assert_eq!(gpus[0].price, dec!(15000));
        assert!(pool.category(Category::Psu).is_empty());
    }
}
