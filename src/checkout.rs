//! Checkout
//!
//! Order message construction and the WhatsApp deep link. Checkout is the
//! terminal action of the storefront: it serializes the cart into a
//! human-readable order summary and encodes it into a URL for the shop's
//! WhatsApp number. Nothing is awaited or parsed in return, and the cart
//! is left intact so the customer can still abandon the external app.

use std::fmt::Write;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{coupons::Coupon, items::CartItem, prices::format_price};

/// Destination WhatsApp number for orders.
pub const ORDER_PHONE: &str = "5512988443740";

/// WhatsApp send endpoint.
const WHATSAPP_ENDPOINT: &str = "https://api.whatsapp.com/send";

/// Escape set equivalent to JavaScript's `encodeURIComponent`: everything
/// but alphanumerics and `-_.!~*'()`.
const COMPONENT: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// How the order reaches the customer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeliveryMethod {
    /// Courier delivery to a customer address.
    Delivery,

    /// Pickup at the counter.
    Pickup,
}

/// Payment options offered at checkout.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PaymentMethod {
    /// Instant bank transfer.
    Pix,

    /// Credit or debit card.
    Card,

    /// Cash on handover, with optional change.
    Cash,
}

impl PaymentMethod {
    /// Customer-facing label, as echoed in the order message.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Card => "Cartão",
            PaymentMethod::Cash => "Dinheiro",
        }
    }
}

/// Everything the fulfilment step captured.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderDetails {
    /// Delivery or pickup.
    pub delivery_method: DeliveryMethod,

    /// Selected payment option.
    pub payment_method: PaymentMethod,

    /// Delivery address; required when delivering.
    pub address: Option<String>,

    /// Cash amount the customer will pay with, for the change note.
    pub change_for: Option<String>,
}

impl OrderDetails {
    /// Details for a counter pickup.
    #[must_use]
    pub fn pickup(payment_method: PaymentMethod) -> Self {
        Self {
            delivery_method: DeliveryMethod::Pickup,
            payment_method,
            address: None,
            change_for: None,
        }
    }

    /// Details for a delivery to the given address.
    #[must_use]
    pub fn delivery(address: impl Into<String>, payment_method: PaymentMethod) -> Self {
        Self {
            delivery_method: DeliveryMethod::Delivery,
            payment_method,
            address: Some(address.into()),
            change_for: None,
        }
    }

    /// Attach the cash amount the customer will pay with.
    #[must_use]
    pub fn with_change_for(mut self, change_for: impl Into<String>) -> Self {
        self.change_for = Some(change_for.into());
        self
    }

    /// Check that the captured details can produce an order.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingAddress`] when delivery is selected
    /// without a non-blank address.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.delivery_method == DeliveryMethod::Delivery
            && self.address.as_deref().is_none_or(|address| address.trim().is_empty())
        {
            return Err(CheckoutError::MissingAddress);
        }

        Ok(())
    }
}

/// Errors that block the checkout action.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Delivery was selected without an address.
    #[error("delivery orders require a delivery address")]
    MissingAddress,
}

/// The terminal checkout artifact: the order summary and its deep link.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckoutRequest {
    /// Human-readable order summary.
    pub message: String,

    /// WhatsApp URL carrying the encoded summary.
    pub url: String,
}

/// Compose the order summary for the given cart lines and totals.
#[must_use]
pub fn order_message(
    items: &[CartItem],
    subtotal: Money<'_, Currency>,
    coupon: Option<(Coupon, Money<'_, Currency>)>,
    total: Money<'_, Currency>,
    details: &OrderDetails,
) -> String {
    let mut message = String::from("Olá! Gostaria de fazer o seguinte pedido:\n\n");

    let lines: SmallVec<[String; 8]> = items
        .iter()
        .map(|item| {
            let rim_text = item
                .stuffed_rim()
                .map(|rim| format!(" (Borda: {rim})"))
                .unwrap_or_default();

            format!(
                "{}x {}{} - {}",
                item.quantity(),
                item.name(),
                rim_text,
                format_price(&item.line_total())
            )
        })
        .collect();

    for line in &lines {
        message.push_str(line);
        message.push('\n');
    }

    _ = write!(message, "\n*Subtotal: {}*", format_price(&subtotal));

    if let Some((coupon, discount)) = coupon {
        _ = write!(
            message,
            "\n*Cupom:* {} (-{})",
            coupon.code(),
            format_price(&discount)
        );
    }

    _ = write!(message, "\n*Total: {}*", format_price(&total));
    message.push_str("\n--------------------------------");

    match details.delivery_method {
        DeliveryMethod::Delivery => {
            message.push_str("\n🛵 *FORMA DE ENTREGA: DELIVERY*");
            _ = write!(
                message,
                "\n📍 *Endereço:* {}",
                details.address.as_deref().unwrap_or_default()
            );
        }
        DeliveryMethod::Pickup => {
            message.push_str("\n🥡 *FORMA DE ENTREGA: RETIRADA NO BALCÃO*");
        }
    }

    _ = write!(
        message,
        "\n💰 *Forma de Pagamento:* {}",
        details.payment_method.label()
    );

    if details.payment_method == PaymentMethod::Cash
        && let Some(change_for) = details.change_for.as_deref().filter(|c| !c.is_empty())
    {
        _ = write!(message, "\n💵 *Troco para:* {change_for}");
    }

    message.push_str("\n\nAguardo confirmação!");

    message
}

/// Build the deep link carrying an encoded order message.
#[must_use]
pub fn whatsapp_url(message: &str) -> String {
    format!(
        "{WHATSAPP_ENDPOINT}?phone={ORDER_PHONE}&text={}",
        utf8_percent_encode(message, &COMPONENT)
    )
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::BRL;
    use testresult::TestResult;

    use super::*;

    fn item(name: &str, minor: i64, quantity: u32, rim: Option<&str>) -> CartItem {
        CartItem::from_parts(
            name.to_string(),
            Money::from_minor(minor, BRL),
            crate::prices::format_minor(minor),
            "pizza.jpg".to_string(),
            quantity,
            rim.map(str::to_string),
        )
    }

    fn brl(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, BRL)
    }

    #[test]
    fn message_lists_each_line_with_its_total() {
        let items = [
            item("Calabresa", 5890, 2, None),
            item("Coca-Cola Lata", 650, 1, None),
        ];

        let message = order_message(
            &items,
            brl(12_430),
            None,
            brl(12_430),
            &OrderDetails::pickup(PaymentMethod::Pix),
        );

        assert!(message.starts_with("Olá! Gostaria de fazer o seguinte pedido:\n\n"));
        assert!(message.contains("2x Calabresa - R$ 117,80"));
        assert!(message.contains("1x Coca-Cola Lata - R$ 6,50"));
        assert!(message.contains("*Subtotal: R$ 124,30*"));
        assert!(message.contains("*Total: R$ 124,30*"));
        assert!(message.ends_with("Aguardo confirmação!"));
    }

    #[test]
    fn message_annotates_stuffed_rims() {
        let items = [item("Calabresa", 6890, 1, Some("Catupiry"))];

        let message = order_message(
            &items,
            brl(6890),
            None,
            brl(6890),
            &OrderDetails::pickup(PaymentMethod::Pix),
        );

        assert!(message.contains("1x Calabresa (Borda: Catupiry) - R$ 68,90"));
    }

    #[test]
    fn coupon_line_appears_only_when_active() {
        let items = [item("Calabresa", 5890, 1, None)];

        let without = order_message(
            &items,
            brl(5890),
            None,
            brl(5890),
            &OrderDetails::pickup(PaymentMethod::Pix),
        );

        assert!(!without.contains("*Cupom:*"));

        let with = order_message(
            &items,
            brl(5890),
            Some((Coupon::Vila10, brl(589))),
            brl(5301),
            &OrderDetails::pickup(PaymentMethod::Pix),
        );

        assert!(with.contains("*Cupom:* VILA10 (-R$ 5,89)"));
        assert!(with.contains("*Total: R$ 53,01*"));
    }

    #[test]
    fn delivery_block_carries_the_address() {
        let items = [item("Calabresa", 5890, 1, None)];

        let message = order_message(
            &items,
            brl(5890),
            None,
            brl(5890),
            &OrderDetails::delivery("Rua das Flores, 100, Centro", PaymentMethod::Card),
        );

        assert!(message.contains("🛵 *FORMA DE ENTREGA: DELIVERY*"));
        assert!(message.contains("📍 *Endereço:* Rua das Flores, 100, Centro"));
        assert!(message.contains("💰 *Forma de Pagamento:* Cartão"));
        assert!(!message.contains("RETIRADA NO BALCÃO"));
    }

    #[test]
    fn pickup_block_has_no_address() {
        let items = [item("Calabresa", 5890, 1, None)];

        let message = order_message(
            &items,
            brl(5890),
            None,
            brl(5890),
            &OrderDetails::pickup(PaymentMethod::Pix),
        );

        assert!(message.contains("🥡 *FORMA DE ENTREGA: RETIRADA NO BALCÃO*"));
        assert!(!message.contains("Endereço"));
    }

    #[test]
    fn change_note_appears_only_for_cash_with_an_amount() {
        let items = [item("Calabresa", 5890, 1, None)];

        let cash = order_message(
            &items,
            brl(5890),
            None,
            brl(5890),
            &OrderDetails::pickup(PaymentMethod::Cash).with_change_for("R$ 100,00"),
        );

        assert!(cash.contains("💰 *Forma de Pagamento:* Dinheiro"));
        assert!(cash.contains("💵 *Troco para:* R$ 100,00"));

        let cash_without_amount =
            order_message(&items, brl(5890), None, brl(5890), &OrderDetails::pickup(PaymentMethod::Cash));

        assert!(!cash_without_amount.contains("Troco"));

        let card = order_message(
            &items,
            brl(5890),
            None,
            brl(5890),
            &OrderDetails::pickup(PaymentMethod::Card).with_change_for("R$ 100,00"),
        );

        assert!(!card.contains("Troco"));
    }

    #[test]
    fn validate_requires_an_address_for_delivery() {
        let blank = OrderDetails {
            delivery_method: DeliveryMethod::Delivery,
            payment_method: PaymentMethod::Pix,
            address: Some("   ".to_string()),
            change_for: None,
        };

        assert_eq!(blank.validate(), Err(CheckoutError::MissingAddress));

        let missing = OrderDetails {
            address: None,
            ..blank.clone()
        };

        assert_eq!(missing.validate(), Err(CheckoutError::MissingAddress));
    }

    #[test]
    fn validate_accepts_pickup_without_an_address() -> TestResult {
        OrderDetails::pickup(PaymentMethod::Pix).validate()?;
        OrderDetails::delivery("Rua A, 1", PaymentMethod::Pix).validate()?;

        Ok(())
    }

    #[test]
    fn url_targets_the_fixed_number() {
        let url = whatsapp_url("pedido");

        assert_eq!(
            url,
            "https://api.whatsapp.com/send?phone=5512988443740&text=pedido"
        );
    }

    #[test]
    fn url_encoding_matches_encode_uri_component() {
        // Space and newline are escaped; the JS unreserved set is not.
        let url = whatsapp_url("a b\nc!(*)'-_.~");

        assert!(url.ends_with("&text=a%20b%0Ac!(*)'-_.~"));
    }

    #[test]
    fn url_encodes_multibyte_text() {
        let url = whatsapp_url("Olá");

        assert!(url.ends_with("&text=Ol%C3%A1"));
    }
}
