//! Storage
//!
//! Durable cart persistence: the JSON analog of the storefront's local
//! storage entry, read once when a store opens and rewritten after every
//! mutation. The record shape is exactly what the web storefront persists,
//! field names included, so saved carts are interchangeable with it.

use std::{
    cell::RefCell,
    fs, io,
    path::{Path, PathBuf},
};

use rust_decimal::{
    Decimal,
    prelude::ToPrimitive,
};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::items::CartItem;

/// Default cart file name, matching the storefront's storage key.
pub const DEFAULT_STORE_FILE: &str = "pizzaria-cart.json";

/// Errors raised by cart storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error reading or writing the cart entry.
    #[error("failed to access cart entry: {0}")]
    Io(#[from] io::Error),

    /// The persisted payload could not be parsed.
    #[error("failed to parse persisted cart: {0}")]
    Parse(#[from] serde_json::Error),

    /// A persisted price does not fit in minor units.
    #[error("persisted price out of range: {0}")]
    PriceOutOfRange(Decimal),
}

/// One persisted cart line, with the exact field names the storefront persists.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct StoredCartItem {
    /// Item name.
    pub name: String,

    /// Unit price in decimal currency units.
    pub price: Decimal,

    /// Display price string.
    #[serde(rename = "formattedPrice")]
    pub formatted_price: String,

    /// Image reference.
    pub image: String,

    /// Quantity.
    pub quantity: u32,

    /// Stuffed-rim label; absent when the line has none.
    #[serde(rename = "stuffedRim", default, skip_serializing_if = "Option::is_none")]
    pub stuffed_rim: Option<String>,
}

impl StoredCartItem {
    /// Build a record from a live cart line.
    #[must_use]
    pub fn from_item(item: &CartItem) -> Self {
        Self {
            name: item.name().to_string(),
            price: Decimal::new(item.price().to_minor_units(), 2),
            formatted_price: item.formatted_price().to_string(),
            image: item.image().to_string(),
            quantity: item.quantity(),
            stuffed_rim: item.stuffed_rim().map(str::to_string),
        }
    }

    /// Rehydrate a cart line in the given currency.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::PriceOutOfRange`] when the decimal price does
    /// not fit in minor units.
    pub fn into_item(self, currency: &'static Currency) -> Result<CartItem, StorageError> {
        let minor = self
            .price
            .checked_mul(Decimal::new(100, 0))
            .and_then(|value| value.round_dp(0).to_i64())
            .ok_or(StorageError::PriceOutOfRange(self.price))?;

        Ok(CartItem::from_parts(
            self.name,
            Money::from_minor(minor, currency),
            self.formatted_price,
            self.image,
            self.quantity,
            self.stuffed_rim,
        ))
    }
}

/// Storage backend seam for the cart store.
///
/// Implementations are free to fail; the store treats a load failure as an
/// empty cart and swallows save failures, so backends never need their own
/// fallback behavior.
pub trait CartStorage {
    /// Load the persisted item records. An absent entry is an empty list,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the entry exists but cannot be read
    /// or parsed.
    fn load(&self) -> Result<Vec<StoredCartItem>, StorageError>;

    /// Overwrite the persisted item records.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the entry cannot be written.
    fn save(&self, items: &[StoredCartItem]) -> Result<(), StorageError>;
}

impl<S: CartStorage + ?Sized> CartStorage for &S {
    fn load(&self) -> Result<Vec<StoredCartItem>, StorageError> {
        (**self).load()
    }

    fn save(&self, items: &[StoredCartItem]) -> Result<(), StorageError> {
        (**self).save(items)
    }
}

/// File-backed JSON storage.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<StoredCartItem>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)?;

        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, items: &[StoredCartItem]) -> Result<(), StorageError> {
        let payload = serde_json::to_string(items)?;

        fs::write(&self.path, payload)?;

        Ok(())
    }
}

/// In-memory storage, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<Vec<StoredCartItem>>,
}

impl MemoryStorage {
    /// An empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the currently persisted records.
    #[must_use]
    pub fn records(&self) -> Vec<StoredCartItem> {
        self.items.borrow().clone()
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<StoredCartItem>, StorageError> {
        Ok(self.items.borrow().clone())
    }

    fn save(&self, items: &[StoredCartItem]) -> Result<(), StorageError> {
        *self.items.borrow_mut() = items.to_vec();

        Ok(())
    }
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

    #[test]
    fn record_uses_storefront_field_names() -> TestResult {
        let record = StoredCartItem::from_item(&item("Calabresa", 6890, 1, Some("Catupiry")));

        let json = serde_json::to_string(&record)?;

        assert!(json.contains("\"formattedPrice\""));
        assert!(json.contains("\"stuffedRim\":\"Catupiry\""));
        assert!(json.contains("\"price\":68.9"));

        Ok(())
    }

    #[test]
    fn record_omits_absent_rim() -> TestResult {
        let record = StoredCartItem::from_item(&item("Calabresa", 5890, 1, None));

        let json = serde_json::to_string(&record)?;

        assert!(!json.contains("stuffedRim"));

        Ok(())
    }

    #[test]
    fn record_round_trips_through_a_cart_item() -> TestResult {
        let original = item("Calabresa", 6890, 1, Some("Catupiry"));

        let restored = StoredCartItem::from_item(&original).into_item(BRL)?;

        assert_eq!(restored, original);

        Ok(())
    }

    #[test]
    fn json_file_storage_round_trips() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::new(dir.path().join(DEFAULT_STORE_FILE));

        let records = vec![StoredCartItem::from_item(&item("Calabresa", 5890, 1, None))];

        storage.save(&records)?;

        assert_eq!(storage.load()?, records);

        Ok(())
    }

    #[test]
    fn missing_file_loads_empty() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::new(dir.path().join(DEFAULT_STORE_FILE));

        assert!(storage.load()?.is_empty());

        Ok(())
    }

    #[test]
    fn corrupt_file_surfaces_a_parse_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(DEFAULT_STORE_FILE);

        fs::write(&path, "{ not json")?;

        let storage = JsonFileStorage::new(path);

        assert!(matches!(storage.load(), Err(StorageError::Parse(_))));

        Ok(())
    }

    #[test]
    fn memory_storage_round_trips() -> TestResult {
        let storage = MemoryStorage::new();
        let records = vec![StoredCartItem::from_item(&item("Calabresa", 5890, 1, None))];

        storage.save(&records)?;

        assert_eq!(storage.load()?, records);
        assert_eq!(storage.records(), records);

        Ok(())
    }

    #[test]
    fn parses_the_storefront_entry_shape() -> TestResult {
        let json = r#"[{
            "name": "Moda da Vila",
            "price": 99.9,
            "formattedPrice": "R$ 89,90",
            "image": "pizza.jpg",
            "quantity": 2,
            "stuffedRim": "Catupiry"
        }]"#;

        let records: Vec<StoredCartItem> = serde_json::from_str(json)?;

        let record = records.first().ok_or("expected one record")?.clone();
        let restored = record.into_item(BRL)?;

        assert_eq!(restored.price(), Money::from_minor(9990, BRL));
        assert_eq!(restored.quantity(), 2);
        assert_eq!(restored.stuffed_rim(), Some("Catupiry"));
        assert_eq!(restored.formatted_price(), "R$ 89,90");

        Ok(())
    }
}
