//! Items
//!
//! Cart line items. A line is identified by its (name, rim) pair: the same
//! pizza with and without a stuffed rim is two distinct lines.

use rusty_money::{Money, iso::Currency};

/// Sentinel the storefront uses for "no stuffed rim".
pub const RIM_NONE: &str = "none";

/// Fixed stuffed-rim surcharge in minor units (R$ 10,00).
pub const RIM_SURCHARGE_MINOR: i64 = 1_000;

/// A menu entry resolved to concrete cart-line fields, quantity-free.
///
/// This is the input to `add_to_cart`; the quantity always starts at 1.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemSelection {
    /// Item name as printed on the menu.
    pub name: String,

    /// Unit price.
    pub price: Money<'static, Currency>,

    /// Display price string as printed on the menu.
    pub formatted_price: String,

    /// Image reference.
    pub image: String,

    /// Stuffed-rim variant label, when one was picked up front.
    pub stuffed_rim: Option<String>,
}

/// A cart line: a selection plus its quantity.
#[derive(Clone, Debug, PartialEq)]
pub struct CartItem {
    name: String,
    price: Money<'static, Currency>,
    formatted_price: String,
    image: String,
    quantity: u32,
    stuffed_rim: Option<String>,
}

impl CartItem {
    /// Create a line with quantity 1 from a selection.
    #[must_use]
    pub fn new(selection: ItemSelection) -> Self {
        Self {
            name: selection.name,
            price: selection.price,
            formatted_price: selection.formatted_price,
            image: selection.image,
            quantity: 1,
            stuffed_rim: normalize_rim(selection.stuffed_rim.as_deref()),
        }
    }

    /// Rebuild a line from its persisted parts.
    #[must_use]
    pub fn from_parts(
        name: String,
        price: Money<'static, Currency>,
        formatted_price: String,
        image: String,
        quantity: u32,
        stuffed_rim: Option<String>,
    ) -> Self {
        Self {
            name,
            price,
            formatted_price,
            image,
            quantity,
            stuffed_rim: normalize_rim(stuffed_rim.as_deref()),
        }
    }

    /// Item name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price.
    #[must_use]
    pub fn price(&self) -> Money<'static, Currency> {
        self.price
    }

    /// Display price string, left untouched by rim changes.
    #[must_use]
    pub fn formatted_price(&self) -> &str {
        &self.formatted_price
    }

    /// Image reference.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Quantity; at least 1 while the line exists.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Stuffed-rim label, if any.
    #[must_use]
    pub fn stuffed_rim(&self) -> Option<&str> {
        self.stuffed_rim.as_deref()
    }

    /// Whether this line has the given (name, rim) identity.
    #[must_use]
    pub fn matches(&self, name: &str, rim: Option<&str>) -> bool {
        self.name == name && rim_key(self.stuffed_rim.as_deref()) == rim_key(rim)
    }

    /// Line total (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Money<'static, Currency> {
        Money::from_minor(
            self.price.to_minor_units() * i64::from(self.quantity),
            self.price.currency(),
        )
    }

    pub(crate) fn bump(&mut self) {
        self.quantity += 1;
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn set_rim(&mut self, rim: Option<String>, price: Money<'static, Currency>) {
        self.stuffed_rim = normalize_rim(rim.as_deref());
        self.price = price;
    }
}

/// Collapse an optional rim label onto the identity key space.
///
/// Both an absent rim and the `"none"` sentinel mean "no rim".
#[must_use]
pub fn rim_key(rim: Option<&str>) -> &str {
    match rim {
        Some(rim) if rim != RIM_NONE => rim,
        _ => RIM_NONE,
    }
}

/// Normalize an optional rim label, mapping the `"none"` sentinel to absent.
#[must_use]
pub fn normalize_rim(rim: Option<&str>) -> Option<String> {
    rim.filter(|rim| *rim != RIM_NONE).map(str::to_string)
}
