// rocketcart/src/services/memory.rs

//! An in-process stock oracle and catalog, for demos, tests and offline embedding.

use crate::core::entry::{CatalogProduct, ProductId};
use crate::services::{CatalogLookup, Stock, StockOracle};
use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
pub struct InMemoryInventory {
  products: Mutex<HashMap<ProductId, CatalogProduct>>,
  stock: Mutex<HashMap<ProductId, i64>>,
  fail_stock: AtomicBool,
  fail_catalog: AtomicBool,
  stock_queries: AtomicUsize,
  catalog_queries: AtomicUsize,
}

impl InMemoryInventory {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder form of [`InMemoryInventory::insert_product`].
  pub fn with_product(self, product: CatalogProduct, stock: impl Into<i64>) -> Self {
    self.insert_product(product, stock);
    self
  }

  pub fn insert_product(&self, product: CatalogProduct, stock: impl Into<i64>) {
    let id = product.id;
    self.products.lock().insert(id, product);
    self.stock.lock().insert(id, stock.into());
  }

  /// Sets the stock of a product, which need not have a catalog record.
  pub fn set_stock(&self, product_id: ProductId, amount: impl Into<i64>) {
    self.stock.lock().insert(product_id, amount.into());
  }

  pub fn fail_stock_queries(&self, fail: bool) {
    self.fail_stock.store(fail, Ordering::SeqCst);
  }

  pub fn fail_catalog_queries(&self, fail: bool) {
    self.fail_catalog.store(fail, Ordering::SeqCst);
  }

  pub fn stock_queries(&self) -> usize {
    self.stock_queries.load(Ordering::SeqCst)
  }

  pub fn catalog_queries(&self) -> usize {
    self.catalog_queries.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl StockOracle for InMemoryInventory {
  async fn stock(&self, product_id: ProductId) -> anyhow::Result<Stock> {
    self.stock_queries.fetch_add(1, Ordering::SeqCst);
    if self.fail_stock.load(Ordering::SeqCst) {
      return Err(anyhow!("stock service unavailable"));
    }
    let amount = self
      .stock
      .lock()
      .get(&product_id)
      .copied()
      .ok_or_else(|| anyhow!("no stock record for product {}", product_id))?;
    Ok(Stock {
      id: Some(product_id),
      amount,
    })
  }
}

#[async_trait]
impl CatalogLookup for InMemoryInventory {
  async fn product(&self, product_id: ProductId) -> anyhow::Result<CatalogProduct> {
    self.catalog_queries.fetch_add(1, Ordering::SeqCst);
    if self.fail_catalog.load(Ordering::SeqCst) {
      return Err(anyhow!("catalog service unavailable"));
    }
    self
      .products
      .lock()
      .get(&product_id)
      .cloned()
      .ok_or_else(|| anyhow!("product {} not found in catalog", product_id))
  }
}
