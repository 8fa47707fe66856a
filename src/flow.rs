//! Checkout flow
//!
//! The two-step flow behind the cart sidebar: review the order, then
//! capture fulfilment and payment before handing off to WhatsApp. All of
//! this is pure UI state, never persisted, and moving between the steps
//! loses nothing captured by the other one.

use std::io;

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    checkout::{CheckoutError, CheckoutRequest, DeliveryMethod, OrderDetails, PaymentMethod},
    items::RIM_NONE,
    prices::format_price,
    storage::CartStorage,
    store::CartStore,
};

/// Stuffed-rim choices offered per pizza line.
pub const RIM_OPTIONS: [&str; 3] = [RIM_NONE, "Catupiry", "Chocolate"];

/// The two linear checkout steps.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CheckoutStep {
    /// Step 1: review items, adjust quantity, rim and removal.
    #[default]
    Review,

    /// Step 2: coupon entry, delivery, address and payment capture.
    Fulfilment,
}

/// Errors writing the review rendering.
#[derive(Debug, Error)]
pub enum FlowRenderError {
    /// The output sink rejected a write.
    #[error("failed to write order review: {0}")]
    Io(#[from] io::Error),
}

/// Two-step checkout flow state, consumed by a storefront view.
#[derive(Debug)]
pub struct CheckoutFlow {
    open: bool,
    step: CheckoutStep,
    delivery_method: DeliveryMethod,
    payment_method: PaymentMethod,
    address: String,
    address_error: bool,
    change_for: String,
    coupon_input: String,
    coupon_error: bool,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    /// A fresh flow at the review step, with the storefront defaults:
    /// delivery, paying with PIX.
    #[must_use]
    pub fn new() -> Self {
        Self {
            open: false,
            step: CheckoutStep::Review,
            delivery_method: DeliveryMethod::Delivery,
            payment_method: PaymentMethod::Pix,
            address: String::new(),
            address_error: false,
            change_for: String::new(),
            coupon_input: String::new(),
            coupon_error: false,
        }
    }

    /// Whether the cart view is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Toggle the cart view; closing it resets the transient entry state,
    /// as the sidebar does.
    pub fn toggle_cart(&mut self) {
        self.open = !self.open;

        if !self.open {
            self.reset();
        }
    }

    /// The current step.
    #[must_use]
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Advance to the fulfilment step.
    pub fn next_step(&mut self) {
        self.step = CheckoutStep::Fulfilment;
    }

    /// Return to the review step.
    pub fn prev_step(&mut self) {
        self.step = CheckoutStep::Review;
    }

    /// The selected delivery method.
    #[must_use]
    pub fn delivery_method(&self) -> DeliveryMethod {
        self.delivery_method
    }

    /// Select the delivery method.
    pub fn select_delivery(&mut self, method: DeliveryMethod) {
        self.delivery_method = method;
    }

    /// The selected payment method.
    #[must_use]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Select the payment method.
    pub fn select_payment(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// The captured delivery address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Capture the delivery address; any input clears the field error.
    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();

        if !self.address.is_empty() {
            self.address_error = false;
        }
    }

    /// Whether the missing-address error is showing.
    #[must_use]
    pub fn address_error(&self) -> bool {
        self.address_error
    }

    /// The captured change-for amount.
    #[must_use]
    pub fn change_for(&self) -> &str {
        &self.change_for
    }

    /// Capture the cash amount the customer will pay with.
    pub fn set_change_for(&mut self, change_for: impl Into<String>) {
        self.change_for = change_for.into();
    }

    /// The coupon code currently typed into the entry field.
    #[must_use]
    pub fn coupon_input(&self) -> &str {
        &self.coupon_input
    }

    /// Type into the coupon entry field.
    pub fn set_coupon_input(&mut self, code: impl Into<String>) {
        self.coupon_input = code.into();
    }

    /// Whether the invalid-coupon error is showing.
    #[must_use]
    pub fn coupon_error(&self) -> bool {
        self.coupon_error
    }

    /// Dismiss the transient invalid-coupon error.
    pub fn clear_coupon_error(&mut self) {
        self.coupon_error = false;
    }

    /// Apply the typed coupon code against the store.
    ///
    /// A blank input is ignored. An unknown code raises the transient
    /// inline error and leaves the input for correction; success clears
    /// both.
    pub fn apply_coupon<S: CartStorage>(&mut self, store: &mut CartStore<S>) -> bool {
        if self.coupon_input.trim().is_empty() {
            return false;
        }

        if store.apply_coupon(&self.coupon_input) {
            self.coupon_input.clear();
            self.coupon_error = false;

            true
        } else {
            self.coupon_error = true;

            false
        }
    }

    /// Snapshot the captured fulfilment data.
    #[must_use]
    pub fn order_details(&self) -> OrderDetails {
        OrderDetails {
            delivery_method: self.delivery_method,
            payment_method: self.payment_method,
            address: (!self.address.trim().is_empty()).then(|| self.address.clone()),
            change_for: (!self.change_for.trim().is_empty()).then(|| self.change_for.clone()),
        }
    }

    /// Fire the terminal checkout action.
    ///
    /// Delivery without an address raises the field-level error and yields
    /// nothing; cart state is never touched on the failure path.
    pub fn submit<S: CartStorage>(&mut self, store: &CartStore<S>) -> Option<CheckoutRequest> {
        match store.checkout(&self.order_details()) {
            Ok(request) => {
                self.address_error = false;

                Some(request)
            }
            Err(CheckoutError::MissingAddress) => {
                self.address_error = true;

                None
            }
        }
    }

    /// Reset to the review step and clear transient entry state, as the
    /// sidebar does when it closes or the cart empties.
    pub fn reset(&mut self) {
        self.step = CheckoutStep::Review;
        self.coupon_input.clear();
        self.coupon_error = false;
        self.address_error = false;
    }

    /// Write the step-1 review as a console table: one row per line with
    /// quantity, rim and line total, followed by the summary amounts.
    ///
    /// # Errors
    ///
    /// Returns a [`FlowRenderError`] if the sink rejects a write.
    pub fn render_review<S: CartStorage>(
        &self,
        out: &mut impl io::Write,
        store: &CartStore<S>,
    ) -> Result<(), FlowRenderError> {
        let mut builder = Builder::default();

        builder.push_record(["Qtd", "Item", "Borda", "Valor"]);

        for item in store.items() {
            builder.push_record([
                format!("{}x", item.quantity()),
                item.name().to_string(),
                item.stuffed_rim().unwrap_or("-").to_string(),
                format_price(&item.line_total()),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::last(), Alignment::right());

        writeln!(out, "{table}")?;

        writeln!(out, " Subtotal: {}", format_price(&store.subtotal()))?;

        if let Some(coupon) = store.applied_coupon() {
            writeln!(
                out,
                " Cupom {}: -{}",
                coupon.code(),
                format_price(&store.discount_amount())
            )?;
        }

        writeln!(out, " Total: {}", format_price(&store.cart_total()))?;

        Ok(())
    }
}
