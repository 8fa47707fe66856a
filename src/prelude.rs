//! Vila prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError, Category, MenuEntry, MenuKey, ORDERING_PLATFORM_URL},
    checkout::{
        CheckoutError, CheckoutRequest, DeliveryMethod, ORDER_PHONE, OrderDetails, PaymentMethod,
        order_message, whatsapp_url,
    },
    coupons::Coupon,
    flow::{CheckoutFlow, CheckoutStep, FlowRenderError, RIM_OPTIONS},
    items::{CartItem, ItemSelection, RIM_NONE, RIM_SURCHARGE_MINOR, normalize_rim, rim_key},
    prices::{PriceError, format_minor, format_price, parse_display_money, parse_display_price},
    storage::{
        CartStorage, DEFAULT_STORE_FILE, JsonFileStorage, MemoryStorage, StorageError,
        StoredCartItem,
    },
    store::CartStore,
    toast::{TOAST_DURATION, Toast},
};
