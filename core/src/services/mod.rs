// rocketcart/src/services/mod.rs

//! Remote collaborators the cart depends on: the stock oracle and the catalog lookup.

#[cfg(feature = "http")]
pub mod http;
pub mod memory;

use crate::core::entry::{CatalogProduct, ProductId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Stock record as served by the stock endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<ProductId>,
  /// Units available. Zero or negative means nothing can be added.
  pub amount: i64,
}

/// The external authority on how many units of a product are available.
///
/// Any error (transport, non-success response, undecodable body) fails the
/// cart operation that issued the query.
#[async_trait]
pub trait StockOracle: Send + Sync + 'static {
  async fn stock(&self, product_id: ProductId) -> anyhow::Result<Stock>;
}

/// Source of a product's display attributes, queried once when an entry is created.
#[async_trait]
pub trait CatalogLookup: Send + Sync + 'static {
  async fn product(&self, product_id: ProductId) -> anyhow::Result<CatalogProduct>;
}

#[cfg(feature = "http")]
pub use http::HttpApi;
pub use memory::InMemoryInventory;
