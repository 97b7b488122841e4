//! Stock and pricing resolution from a component's batch list.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{Batch, Component};

/// Remaining quantity at or below which a component counts as low on stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

/// Stock tier for reorder visibility. Never affects eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
}

impl StockLevel {
    pub fn for_quantity(quantity: u32, low_threshold: u32) -> Self {
        if quantity == 0 {
            StockLevel::OutOfStock
        } else if quantity <= low_threshold {
            StockLevel::Low
        } else {
            StockLevel::InStock
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockLevel::OutOfStock => "Out of stock",
            StockLevel::Low => "Low",
            StockLevel::InStock => "In stock",
        }
    }
}

impl Batch {
    /// Units left in this batch, clamped to the initial quantity.
    pub fn effective_remaining(&self) -> u32 {
        if self.remaining > self.quantity {
            log::warn!(
                "Batch {} reports {} remaining of {}; clamping",
                self.batch_id,
                self.remaining,
                self.quantity
            );
            self.quantity
        } else {
            self.remaining
        }
    }

    /// Whether this batch can price a sale: units left and a non-negative price.
    pub fn is_sellable(&self) -> bool {
        if self.sell_price.is_sign_negative() && !self.sell_price.is_zero() {
            log::warn!(
                "Batch {} has negative sell price {}; ignoring",
                self.batch_id,
                self.sell_price
            );
            return false;
        }
        self.effective_remaining() > 0
    }
}

/// Total units across all batches.
pub fn available_quantity(component: &Component) -> u32 {
    component
        .batches
        .iter()
        .fold(0u32, |acc, b| acc.saturating_add(b.effective_remaining()))
}

/// Cheapest sell price among batches with units left; `None` means unavailable.
pub fn best_price(component: &Component) -> Option<Decimal> {
    cheapest_batch(component).map(|b| b.sell_price)
}

/// Lowest price first; among equal prices the oldest batch, undated batches last.
fn batch_cmp(a: &Batch, b: &Batch) -> Ordering {
    a.sell_price
        .cmp(&b.sell_price)
        .then_with(|| match (a.date_added, b.date_added) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

fn cheapest_batch(component: &Component) -> Option<&Batch> {
    component
        .batches
        .iter()
        .filter(|b| b.is_sellable())
        .min_by(|a, b| batch_cmp(a, b))
}

/// Resolved availability of one component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub quantity: u32,
    pub best_price: Option<Decimal>,
    /// Batch the best price comes from
    pub price_batch: Option<String>,
}

impl Availability {
    pub fn level(&self, low_threshold: u32) -> StockLevel {
        StockLevel::for_quantity(self.quantity, low_threshold)
    }
}

impl Component {
    pub fn availability(&self) -> Availability {
        let cheapest = cheapest_batch(self);
        Availability {
            quantity: available_quantity(self),
            best_price: cheapest.map(|b| b.sell_price),
            price_batch: cheapest.map(|b| b.batch_id.clone()),
        }
    }

    /// Eligible for build generation: units on hand and a valid price.
    pub fn is_eligible(&self) -> bool {
        available_quantity(self) > 0 && best_price(self).is_some()
    }
}

/// Components that may take part in build generation.
pub fn available_components(catalog: &[Component]) -> Vec<&Component> {
    catalog.iter().filter(|c| c.is_eligible()).collect()
}
