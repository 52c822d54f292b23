// rocketcart/src/core/entry.rs

//! The cart data model: product ids, catalog records, entries and the ordered cart.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a purchasable product, as used by the stock and catalog services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<u64> for ProductId {
  fn from(id: u64) -> Self {
    ProductId(id)
  }
}

/// Display attributes of a product as returned by the catalog.
///
/// The cart copies this record into a new entry once and never inspects it further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
  pub id: ProductId,
  pub title: String,
  pub image: String,
  pub price: f64,
}

/// One distinct product held in the cart.
///
/// Serialized flat, i.e. the catalog record with an injected `amount` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
  #[serde(flatten)]
  pub product: CatalogProduct,
  pub amount: u32,
}

impl CartEntry {
  pub fn new(product: CatalogProduct) -> Self {
    Self { product, amount: 1 }
  }

  pub fn product_id(&self) -> ProductId {
    self.product.id
  }
}

/// Ordered collection of entries, unique by product id.
///
/// Serializes as a plain JSON array of entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
  entries: Vec<CartEntry>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds a cart from a list of entries, keeping the first entry for any repeated id.
  pub fn from_entries(entries: impl IntoIterator<Item = CartEntry>) -> Self {
    let mut cart = Cart::new();
    for entry in entries {
      if cart.position(entry.product_id()).is_none() {
        cart.entries.push(entry);
      }
    }
    cart
  }

  pub fn entries(&self) -> &[CartEntry] {
    &self.entries
  }

  pub fn iter(&self) -> std::slice::Iter<'_, CartEntry> {
    self.entries.iter()
  }

  /// Number of distinct products.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
    self.entries.iter().find(|e| e.product_id() == product_id)
  }

  pub fn contains(&self, product_id: ProductId) -> bool {
    self.get(product_id).is_some()
  }

  /// Amount held for `product_id`, 0 when the product is not in the cart.
  pub fn amount_of(&self, product_id: ProductId) -> u32 {
    self.get(product_id).map_or(0, |e| e.amount)
  }

  /// Per-product amounts, e.g. for a product listing showing how many of each are in the cart.
  pub fn amounts(&self) -> HashMap<ProductId, u32> {
    self.entries.iter().map(|e| (e.product_id(), e.amount)).collect()
  }

  fn position(&self, product_id: ProductId) -> Option<usize> {
    self.entries.iter().position(|e| e.product_id() == product_id)
  }

  /// Sets the amount of an existing entry. Returns false if the product is absent.
  pub(crate) fn set_amount(&mut self, product_id: ProductId, amount: u32) -> bool {
    match self.entries.iter_mut().find(|e| e.product_id() == product_id) {
      Some(entry) => {
        entry.amount = amount;
        true
      }
      None => false,
    }
  }

  /// Appends a new entry. Returns false (and leaves the cart alone) if the id is already present.
  pub(crate) fn push(&mut self, entry: CartEntry) -> bool {
    if self.contains(entry.product_id()) {
      return false;
    }
    self.entries.push(entry);
    true
  }

  /// Removes the entry for `product_id`, preserving the order of the rest.
  pub(crate) fn remove(&mut self, product_id: ProductId) -> Option<CartEntry> {
    self.position(product_id).map(|idx| self.entries.remove(idx))
  }
}

impl<'de> Deserialize<'de> for Cart {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    Vec::<CartEntry>::deserialize(deserializer).map(Cart::from_entries)
  }
}

impl<'a> IntoIterator for &'a Cart {
  type Item = &'a CartEntry;
  type IntoIter = std::slice::Iter<'a, CartEntry>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.iter()
  }
}
