//! Catalog
//!
//! The static storefront menu: six categories of entries with display
//! prices, loaded from an embedded YAML fixture. The catalog is the only
//! pricing authority; a cart line starts life as a [`selection`] of one of
//! these entries.
//!
//! [`selection`]: Catalog::selection

use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::{
    items::ItemSelection,
    prices::{PriceError, parse_display_price},
};

/// Static third-party ordering platform link (outbound navigation only).
pub const ORDERING_PLATFORM_URL: &str = "https://www.byappfood.com/ordering/restaurant/menu?company_uid=a64182f8-bfd2-4ac6-b594-6d7c1a1e0bb8&restaurant_uid=04c495b9-ad76-46ec-b70a-7787369feb50&facebook=true";

/// The storefront menu, embedded at build time.
const BUILTIN_MENU: &str = include_str!("../fixtures/menu.yml");

new_key_type! {
    /// Menu entry key
    pub struct MenuKey;
}

/// Menu categories.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Category {
    /// Savory pizzas.
    Salgadas,

    /// Sweet pizzas.
    Doces,

    /// Shared portions.
    Porcoes,

    /// Drinks.
    Bebidas,

    /// Desserts.
    Sobremesas,

    /// Açaí bowls.
    Acai,
}

impl Category {
    /// All categories, in storefront tab order.
    pub const ALL: [Category; 6] = [
        Category::Salgadas,
        Category::Doces,
        Category::Porcoes,
        Category::Bebidas,
        Category::Sobremesas,
        Category::Acai,
    ];

    /// Customer-facing tab label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Salgadas => "Pizzas Salgadas",
            Category::Doces => "Pizzas Doces",
            Category::Porcoes => "Porções",
            Category::Bebidas => "Bebidas",
            Category::Sobremesas => "Sobremesas",
            Category::Acai => "Açaí",
        }
    }

    /// Fixture and CLI key for the category.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Category::Salgadas => "salgadas",
            Category::Doces => "doces",
            Category::Porcoes => "porcoes",
            Category::Bebidas => "bebidas",
            Category::Sobremesas => "sobremesas",
            Category::Acai => "acai",
        }
    }

    /// Parse a fixture or CLI key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Category::ALL.into_iter().find(|category| category.key() == key)
    }
}

/// Errors raised while loading a menu fixture.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// YAML parsing error.
    #[error("failed to parse menu fixture: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A menu entry carries an unparseable display price.
    #[error("menu entry {name} has an invalid price")]
    EntryPrice {
        /// Entry name.
        name: String,

        /// Underlying parse failure.
        #[source]
        source: PriceError,
    },
}

/// One menu entry as displayed on the storefront.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuEntry {
    /// Entry name.
    pub name: String,

    /// Short description.
    pub description: String,

    /// Image URL.
    pub image: String,

    /// Display price string, e.g. `"R$ 54,90"`.
    pub display_price: String,

    /// Parsed unit price.
    pub price: Money<'static, Currency>,

    /// Whether the storefront highlights this entry.
    pub highlight: bool,
}

/// One menu entry as written in the YAML fixture.
#[derive(Debug, Deserialize)]
struct EntryFixture {
    name: String,
    description: String,
    image: String,
    price: String,
    #[serde(default)]
    highlight: bool,
}

impl EntryFixture {
    fn into_entry(self, currency: &'static Currency) -> Result<MenuEntry, CatalogError> {
        let minor = parse_display_price(&self.price).map_err(|source| CatalogError::EntryPrice {
            name: self.name.clone(),
            source,
        })?;

        Ok(MenuEntry {
            name: self.name,
            description: self.description,
            image: self.image,
            display_price: self.price,
            price: Money::from_minor(minor, currency),
            highlight: self.highlight,
        })
    }
}

/// The whole menu as written in the YAML fixture.
#[derive(Debug, Deserialize)]
struct MenuFixture {
    salgadas: Vec<EntryFixture>,
    doces: Vec<EntryFixture>,
    sobremesas: Vec<EntryFixture>,
    acai: Vec<EntryFixture>,
    porcoes: Vec<EntryFixture>,
    bebidas: Vec<EntryFixture>,
}

impl MenuFixture {
    fn into_categories(self) -> [(Category, Vec<EntryFixture>); 6] {
        [
            (Category::Salgadas, self.salgadas),
            (Category::Doces, self.doces),
            (Category::Porcoes, self.porcoes),
            (Category::Bebidas, self.bebidas),
            (Category::Sobremesas, self.sobremesas),
            (Category::Acai, self.acai),
        ]
    }
}

/// The static menu: entries keyed by category, ordered as displayed.
#[derive(Debug)]
pub struct Catalog {
    entries: SlotMap<MenuKey, MenuEntry>,
    categories: Vec<(Category, Vec<MenuKey>)>,
    by_name: FxHashMap<String, MenuKey>,
    currency: &'static Currency,
}

impl Catalog {
    /// Load the built-in storefront menu, priced in BRL.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the embedded fixture is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN_MENU, iso::BRL)
    }

    /// Load a menu from a YAML fixture.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML cannot be parsed or an entry
    /// carries an invalid display price.
    pub fn from_yaml(yaml: &str, currency: &'static Currency) -> Result<Self, CatalogError> {
        let fixture: MenuFixture = serde_norway::from_str(yaml)?;

        let mut entries = SlotMap::with_key();
        let mut by_name = FxHashMap::default();
        let mut categories = Vec::with_capacity(Category::ALL.len());

        for (category, fixture_entries) in fixture.into_categories() {
            let mut keys = Vec::with_capacity(fixture_entries.len());

            for fixture_entry in fixture_entries {
                let entry = fixture_entry.into_entry(currency)?;
                let name = entry.name.clone();
                let key = entries.insert(entry);

                by_name.insert(name, key);
                keys.push(key);
            }

            categories.push((category, keys));
        }

        Ok(Catalog {
            entries,
            categories,
            by_name,
            currency,
        })
    }

    /// The entries of a category, in display order.
    pub fn entries(&self, category: Category) -> impl Iterator<Item = (MenuKey, &MenuEntry)> {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .into_iter()
            .flat_map(|(_, keys)| keys.iter())
            .filter_map(|key| self.entries.get(*key).map(|entry| (*key, entry)))
    }

    /// Look up an entry by key.
    #[must_use]
    pub fn entry(&self, key: MenuKey) -> Option<&MenuEntry> {
        self.entries.get(key)
    }

    /// Look up an entry key by its exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<MenuKey> {
        self.by_name.get(name).copied()
    }

    /// Resolve an entry into the cart-line selection the add button produces.
    #[must_use]
    pub fn selection(&self, key: MenuKey) -> Option<ItemSelection> {
        self.entries.get(key).map(|entry| ItemSelection {
            name: entry.name.clone(),
            price: entry.price,
            formatted_price: entry.display_price.clone(),
            image: entry.image.clone(),
            stuffed_rim: None,
        })
    }

    /// Total number of entries across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the currency all entries are priced in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::BRL;
    use testresult::TestResult;

    use crate::prices::format_price;

    use super::*;

    #[test]
    fn builtin_menu_loads_every_category() -> TestResult {
        let catalog = Catalog::builtin()?;

        assert_eq!(catalog.entries(Category::Salgadas).count(), 14);
        assert_eq!(catalog.entries(Category::Doces).count(), 5);
        assert_eq!(catalog.entries(Category::Porcoes).count(), 3);
        assert_eq!(catalog.entries(Category::Bebidas).count(), 6);
        assert_eq!(catalog.entries(Category::Sobremesas).count(), 3);
        assert_eq!(catalog.entries(Category::Acai).count(), 3);
        assert_eq!(catalog.len(), 34);
        assert_eq!(catalog.currency(), BRL);

        Ok(())
    }

    #[test]
    fn builtin_prices_parse_and_round_trip() -> TestResult {
        let catalog = Catalog::builtin()?;

        for category in Category::ALL {
            for (_, entry) in catalog.entries(category) {
                assert_eq!(
                    format_price(&entry.price),
                    entry.display_price,
                    "entry {} should round-trip its display price",
                    entry.name
                );
            }
        }

        Ok(())
    }

    #[test]
    fn find_resolves_names_to_entries() -> TestResult {
        let catalog = Catalog::builtin()?;

        let key = catalog.find("Moda da Vila").ok_or("expected menu entry")?;
        let entry = catalog.entry(key).ok_or("expected menu entry")?;

        assert_eq!(entry.price, Money::from_minor(8990, BRL));
        assert!(entry.highlight);

        assert!(catalog.find("Quatro Estações").is_none());

        Ok(())
    }

    #[test]
    fn selection_copies_entry_fields_without_a_rim() -> TestResult {
        let catalog = Catalog::builtin()?;

        let key = catalog.find("Coca-Cola Lata").ok_or("expected menu entry")?;
        let selection = catalog.selection(key).ok_or("expected selection")?;

        assert_eq!(selection.name, "Coca-Cola Lata");
        assert_eq!(selection.price, Money::from_minor(650, BRL));
        assert_eq!(selection.formatted_price, "R$ 6,50");
        assert_eq!(selection.stuffed_rim, None);

        Ok(())
    }

    #[test]
    fn category_keys_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_key(category.key()), Some(category));
        }

        assert_eq!(Category::from_key("massas"), None);
    }

    #[test]
    fn category_ordering_matches_the_storefront_tabs() {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();

        assert_eq!(
            labels,
            [
                "Pizzas Salgadas",
                "Pizzas Doces",
                "Porções",
                "Bebidas",
                "Sobremesas",
                "Açaí"
            ]
        );
    }

    #[test]
    fn invalid_entry_price_is_reported_with_the_entry_name() {
        let yaml = r#"
salgadas:
  - name: "Quebrada"
    description: "Pizza sem preço."
    image: "x.jpg"
    price: "gratis"
doces: []
sobremesas: []
acai: []
porcoes: []
bebidas: []
"#;

        let result = Catalog::from_yaml(yaml, BRL);

        assert!(matches!(
            result,
            Err(CatalogError::EntryPrice { name, .. }) if name == "Quebrada"
        ));
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let result = Catalog::from_yaml("salgadas: 12", BRL);

        assert!(matches!(result, Err(CatalogError::Yaml(_))));
    }
}
