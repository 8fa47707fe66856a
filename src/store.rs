//! Cart store
//!
//! The single state container behind the storefront: cart lines, the active
//! coupon and its discount, the toast notification and durable persistence.
//! Consumers receive the store by reference instead of reaching into an
//! ambient context, so ownership stays explicit.
//!
//! Every mutation recomputes the discount from the active coupon against
//! the new subtotal and flushes the item list to storage. Derived totals
//! are recomputed on every read; nothing is cached.

use std::time::Instant;

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use tracing::{debug, error, warn};

use crate::{
    cart::{Cart, CartError},
    checkout::{CheckoutError, CheckoutRequest, OrderDetails, order_message, whatsapp_url},
    coupons::Coupon,
    items::{CartItem, ItemSelection},
    storage::{CartStorage, StoredCartItem},
    toast::Toast,
};

/// Toast text shown after an item lands in the cart.
fn added_message(name: &str) -> String {
    format!("{name} adicionado ao carrinho!")
}

/// Cart store
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    applied_coupon: Option<Coupon>,
    discount_minor: i64,
    toast: Toast,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Open a store priced in BRL, loading any persisted cart fail-soft.
    pub fn open(storage: S) -> Self {
        Self::open_with_currency(storage, iso::BRL)
    }

    /// Open a store with an explicit currency.
    ///
    /// A missing entry starts the cart empty. A corrupt entry, or a line
    /// that cannot be rehydrated, is logged and discarded instead of
    /// failing the caller; the page must never crash over stale storage.
    pub fn open_with_currency(storage: S, currency: &'static Currency) -> Self {
        let mut cart = Cart::new(currency);

        match storage.load() {
            Ok(records) => {
                for record in records {
                    match record.into_item(currency) {
                        Ok(item) => cart.restore(item),
                        Err(err) => error!(%err, "discarding unreadable cart line"),
                    }
                }
            }
            Err(err) => error!(%err, "failed to load saved cart, starting empty"),
        }

        Self {
            cart,
            applied_coupon: None,
            discount_minor: 0,
            toast: Toast::new(),
            storage,
        }
    }

    /// Add a selection: bump the quantity of its (name, rim) line, or
    /// insert it with quantity 1.
    ///
    /// Shows the "added to cart" toast with a fresh three-second deadline;
    /// the newest deadline supersedes any pending hide.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the selection is priced
    /// in a different currency than the cart.
    pub fn add_to_cart(&mut self, selection: ItemSelection) -> Result<(), CartError> {
        let name = selection.name.clone();

        self.cart.add(selection)?;
        self.toast.show(added_message(&name), Instant::now());

        debug!(item = %name, count = self.items_count(), "added item to cart");

        self.after_mutation();

        Ok(())
    }

    /// Remove the line matching (name, rim); no-op when absent.
    pub fn remove_from_cart(&mut self, name: &str, rim: Option<&str>) {
        self.cart.remove(name, rim);

        debug!(item = %name, "removed item from cart");

        self.after_mutation();
    }

    /// Add `delta` to the matching line's quantity.
    ///
    /// A resulting quantity of zero or less leaves the line unchanged;
    /// removal only ever happens through [`Self::remove_from_cart`].
    pub fn update_quantity(&mut self, name: &str, delta: i64, rim: Option<&str>) {
        self.cart.update_quantity(name, delta, rim);
        self.after_mutation();
    }

    /// Re-key the matching line to a new rim, adjusting the unit price by
    /// the fixed surcharge.
    pub fn update_item_rim(&mut self, name: &str, old_rim: Option<&str>, new_rim: &str) {
        self.cart.update_rim(name, old_rim, new_rim);
        self.after_mutation();
    }

    /// Apply a coupon code, matched case-insensitively.
    ///
    /// On a match the coupon becomes active and the discount is computed
    /// from the current subtotal. On a miss the discount resets to zero and
    /// a previously active coupon is left in place, exactly as the
    /// storefront behaves; it resurfaces on the next recompute.
    pub fn apply_coupon(&mut self, code: &str) -> bool {
        match Coupon::from_code(code) {
            Some(coupon) => {
                self.applied_coupon = Some(coupon);
                self.discount_minor = coupon.discount_minor(self.subtotal_minor());

                debug!(
                    coupon = coupon.code(),
                    discount_minor = self.discount_minor,
                    "applied coupon"
                );

                true
            }
            None => {
                self.discount_minor = 0;

                debug!(code, "rejected unknown coupon code");

                false
            }
        }
    }

    /// Clear the active coupon and discount unconditionally.
    pub fn remove_coupon(&mut self) {
        self.applied_coupon = None;
        self.discount_minor = 0;
    }

    /// Calculate the subtotal of the cart.
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.cart.subtotal()
    }

    /// The discount of the active coupon against the current subtotal.
    #[must_use]
    pub fn discount_amount(&self) -> Money<'static, Currency> {
        Money::from_minor(self.discount_minor, self.currency())
    }

    /// Subtotal minus discount, clamped at zero.
    #[must_use]
    pub fn cart_total(&self) -> Money<'static, Currency> {
        let minor = (self.subtotal_minor() - self.discount_minor).max(0);

        Money::from_minor(minor, self.currency())
    }

    /// Total unit count across all lines.
    #[must_use]
    pub fn items_count(&self) -> u32 {
        self.cart.items_count()
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// The active coupon, if any.
    #[must_use]
    pub fn applied_coupon(&self) -> Option<Coupon> {
        self.applied_coupon
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.cart.currency()
    }

    /// The toast notification state.
    #[must_use]
    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    /// Dismiss the toast explicitly.
    pub fn hide_toast(&mut self) {
        self.toast.hide();
    }

    /// Resolve the toast auto-hide deadline against `now`.
    pub fn poll_toast(&mut self, now: Instant) {
        self.toast.poll(now);
    }

    /// Build the order summary and deep link for the current cart.
    ///
    /// Purely observational: the cart is left intact, matching the
    /// storefront, where the customer may still abandon the external app.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingAddress`] when delivery is selected
    /// without a non-blank address.
    pub fn checkout(&self, details: &OrderDetails) -> Result<CheckoutRequest, CheckoutError> {
        details.validate()?;

        let coupon = self
            .applied_coupon
            .map(|coupon| (coupon, self.discount_amount()));

        let message = order_message(self.items(), self.subtotal(), coupon, self.cart_total(), details);
        let url = whatsapp_url(&message);

        debug!(lines = self.cart.len(), total = %self.cart_total(), "built checkout request");

        Ok(CheckoutRequest { message, url })
    }

    fn subtotal_minor(&self) -> i64 {
        self.cart.subtotal().to_minor_units()
    }

    /// Recompute the discount against the new subtotal, then flush.
    fn after_mutation(&mut self) {
        if let Some(coupon) = self.applied_coupon {
            self.discount_minor = coupon.discount_minor(self.subtotal_minor());
        }

        self.persist();
    }

    /// Flush the item list at the end of a state transition. Failures are
    /// logged and swallowed; persistence never blocks the UI.
    fn persist(&self) {
        let records: Vec<StoredCartItem> = self
            .cart
            .iter()
            .map(StoredCartItem::from_item)
            .collect();

        if let Err(err) = self.storage.save(&records) {
            warn!(%err, "failed to persist cart");
        }
    }
}
