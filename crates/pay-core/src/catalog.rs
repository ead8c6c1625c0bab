//! # Catalog
//!
//! Static table of purchasable items keyed by category and numeric id.
//! Prices always come from here, never from the client.

use crate::error::{PaymentError, PaymentResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Settlement currency. The storefront sells in USD only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
}

impl Currency {
    /// Lowercase ISO 4217 code, as the card provider expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
        }
    }

    /// Uppercase ISO 4217 code, as the wallet provider expects it
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
        }
    }

    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::USD => 2,
        }
    }

    /// Convert a decimal amount to the smallest currency unit.
    ///
    /// Multiplies first, then rounds half away from zero.
    pub fn to_smallest_unit(&self, amount: Decimal) -> Option<i64> {
        let multiplier = Decimal::from(10_i64.pow(self.decimal_places()));
        (amount * multiplier)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }

    /// Format an amount with the currency's decimal places (e.g. "15.00")
    pub fn format_amount(&self, amount: Decimal) -> String {
        let rounded =
            amount.round_dp_with_strategy(self.decimal_places(), RoundingStrategy::MidpointAwayFromZero);
        format!("{:.*}", self.decimal_places() as usize, rounded)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Catalog category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Albums,
    Products,
    Merch,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Albums => "albums",
            Category::Products => "products",
            Category::Merch => "merch",
        }
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "albums" => Ok(Category::Albums),
            "products" => Ok(Category::Products),
            "merch" => Ok(Category::Merch),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchasable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub category: Category,
    pub product_id: u32,
    /// Display name sent to both providers
    pub name: String,
    /// Price in major currency units
    pub price: Decimal,
}

impl CatalogEntry {
    pub fn new(category: Category, product_id: u32, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            category,
            product_id,
            name: name.into(),
            price,
        }
    }

    /// Price in minor units (cents for USD)
    pub fn unit_amount(&self, currency: Currency) -> PaymentResult<i64> {
        currency.to_smallest_unit(self.price).ok_or_else(|| {
            PaymentError::Configuration(format!(
                "price of {}/{} does not fit in minor units",
                self.category, self.product_id
            ))
        })
    }
}

/// Read-only product table, built once at startup
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog, rejecting non-positive prices and duplicate keys
    pub fn from_entries(entries: Vec<CatalogEntry>) -> PaymentResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.price <= Decimal::ZERO {
                return Err(PaymentError::Configuration(format!(
                    "price of {}/{} must be positive",
                    entry.category, entry.product_id
                )));
            }
            entry.unit_amount(Currency::default())?;
            if !seen.insert((entry.category, entry.product_id)) {
                return Err(PaymentError::Configuration(format!(
                    "duplicate catalog entry {}/{}",
                    entry.category, entry.product_id
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> PaymentResult<Self> {
        let file: CatalogFile = toml::from_str(toml_str)
            .map_err(|e| PaymentError::Configuration(format!("invalid catalog: {}", e)))?;
        Self::from_entries(file.entries)
    }

    /// Find an entry by typed key
    pub fn lookup(&self, category: Category, product_id: u32) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| e.category == category && e.product_id == product_id)
    }

    /// Resolve raw client input. Anything that does not name an entry is `InvalidProduct`.
    ///
    /// Ids match on their canonical decimal form only: `"01"`, `"+1"` and
    /// `" 1 "` name nothing.
    pub fn resolve(&self, category: &str, product_id: &str) -> PaymentResult<&CatalogEntry> {
        let id = product_id
            .parse::<u32>()
            .ok()
            .filter(|id| id.to_string() == product_id);
        let key = category.parse::<Category>().ok().zip(id);

        key.and_then(|(c, id)| self.lookup(c, id))
            .ok_or_else(|| PaymentError::invalid_product(category, product_id))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    /// The storefront's built-in table
    fn default() -> Self {
        use Category::*;

        Self {
            entries: vec![
                CatalogEntry::new(Albums, 1, "Album A", dec!(15.00)),
                CatalogEntry::new(Albums, 2, "Album B", dec!(20.00)),
                CatalogEntry::new(Albums, 3, "Album B", dec!(20.00)),
                CatalogEntry::new(Albums, 4, "Album B", dec!(20.00)),
                CatalogEntry::new(Products, 1, "Producto X", dec!(10.00)),
                CatalogEntry::new(Products, 2, "Producto Y", dec!(12.00)),
                CatalogEntry::new(Merch, 1, "Camiseta", dec!(25.00)),
                CatalogEntry::new(Merch, 2, "Gorra", dec!(15.00)),
            ],
        }
    }
}
