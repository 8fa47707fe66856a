//! Cart
//!
//! The item container behind the cart store: line lookup by (name, rim)
//! identity, quantity edits with the floor-at-1 rule, and rim re-keying
//! with its fixed surcharge.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::items::{CartItem, ItemSelection, RIM_NONE, RIM_SURCHARGE_MINOR, normalize_rim, rim_key};

/// Errors related to cart mutation.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A selection's currency differs from the cart currency.
    #[error("selection has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Cart
#[derive(Debug)]
pub struct Cart {
    items: Vec<CartItem>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
        }
    }

    /// Add a selection: bump the matching (name, rim) line, or insert it
    /// with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the selection is priced in
    /// a different currency than the cart.
    pub fn add(&mut self, selection: ItemSelection) -> Result<(), CartError> {
        let currency = selection.price.currency();

        if currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        match self.position(&selection.name, selection.stuffed_rim.as_deref()) {
            Some(idx) => {
                if let Some(item) = self.items.get_mut(idx) {
                    item.bump();
                }
            }
            None => self.items.push(CartItem::new(selection)),
        }

        Ok(())
    }

    /// Remove the line matching (name, rim); no-op when absent.
    pub fn remove(&mut self, name: &str, rim: Option<&str>) {
        self.items.retain(|item| !item.matches(name, rim));
    }

    /// Add `delta` to the matching line's quantity.
    ///
    /// A resulting quantity of zero or less leaves the line unchanged, so
    /// the quantity never reaches zero through this path; removal happens
    /// only through [`Cart::remove`]. Absent lines are a no-op.
    pub fn update_quantity(&mut self, name: &str, delta: i64, rim: Option<&str>) {
        let Some(idx) = self.position(name, rim) else {
            return;
        };
        let Some(item) = self.items.get_mut(idx) else {
            return;
        };

        let next = i64::from(item.quantity()) + delta;

        if let Ok(quantity) = u32::try_from(next)
            && quantity > 0
        {
            item.set_quantity(quantity);
        }
    }

    /// Re-key the line matching (name, `old_rim`) to `new_rim`, adjusting
    /// the unit price by the fixed surcharge.
    ///
    /// Losing a rim recovers the base price, gaining one adds the surcharge;
    /// swapping between two rims leaves the price unchanged. The `"none"`
    /// sentinel clears the stored rim. Absent lines are a no-op.
    pub fn update_rim(&mut self, name: &str, old_rim: Option<&str>, new_rim: &str) {
        let Some(idx) = self.position(name, old_rim) else {
            return;
        };
        let Some(item) = self.items.get_mut(idx) else {
            return;
        };

        let minor = item.price().to_minor_units();
        let base_minor = if rim_key(old_rim) == RIM_NONE {
            minor
        } else {
            minor - RIM_SURCHARGE_MINOR
        };
        let new_minor = if new_rim == RIM_NONE {
            base_minor
        } else {
            base_minor + RIM_SURCHARGE_MINOR
        };

        item.set_rim(
            normalize_rim(Some(new_rim)),
            Money::from_minor(new_minor, self.currency),
        );
    }

    /// Push a persisted line back verbatim, without deduplication.
    pub(crate) fn restore(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Calculate the subtotal of the cart.
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        let minor = self
            .items
            .iter()
            .map(|item| item.line_total().to_minor_units())
            .sum();

        Money::from_minor(minor, self.currency)
    }

    /// Total unit count across all lines.
    #[must_use]
    pub fn items_count(&self) -> u32 {
        self.items.iter().map(CartItem::quantity).sum()
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over the cart lines.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn position(&self, name: &str, rim: Option<&str>) -> Option<usize> {
        self.items.iter().position(|item| item.matches(name, rim))
    }
}
