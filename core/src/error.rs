// rocketcart/src/error.rs
use crate::core::entry::ProductId;
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
  #[error("Requested amount {requested} of product {product_id} exceeds available stock ({available})")]
  OutOfStock {
    product_id: ProductId,
    requested: u64,
    available: i64,
  },

  #[error("Product {product_id} is not in the cart")]
  NotInCart { product_id: ProductId },

  #[error("Stock query failed for product {product_id}. Source: {source}")]
  StockQuery {
    product_id: ProductId,
    #[source]
    source: AnyhowError,
  },

  #[error("Catalog lookup failed for product {product_id}. Source: {source}")]
  CatalogQuery {
    product_id: ProductId,
    #[source]
    source: AnyhowError,
  },

  #[error("Durable storage error. Source: {0}")]
  Storage(#[source] AnyhowError),

  #[error("Cart serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Handler missing for protocol step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Internal cart error: {0}")]
  Internal(String),
}

impl CartError {
  /// True for the one recoverable, user-correctable rejection.
  pub fn is_out_of_stock(&self) -> bool {
    matches!(self, CartError::OutOfStock { .. })
  }
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;
