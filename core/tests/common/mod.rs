// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use rocketcart::{
  CartManager, CatalogLookup, CatalogProduct, CollectingNotices, InMemoryInventory, MemoryStorage, ProductId, Stock,
  StockOracle,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

pub const KEY: &str = "@RocketShoes:cart";

// --- Helper for Tracing Setup ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Fixtures ---
pub fn shoe(id: u64) -> CatalogProduct {
  CatalogProduct {
    id: ProductId(id),
    title: format!("Tenis de Caminhada {}", id),
    image: format!("https://rocketseat-cdn.example/sneaker-{}.jpg", id),
    price: 139.9 + id as f64,
  }
}

/// Inventory stocking each `(id, stock)` pair with a catalog record.
pub fn inventory(stock: &[(u64, u32)]) -> Arc<InMemoryInventory> {
  let inventory = InMemoryInventory::new();
  for &(id, amount) in stock {
    inventory.insert_product(shoe(id), amount);
  }
  Arc::new(inventory)
}

pub struct Fixture {
  pub manager: CartManager,
  pub inventory: Arc<InMemoryInventory>,
  pub storage: Arc<MemoryStorage>,
  pub notices: Arc<CollectingNotices>,
}

impl Fixture {
  pub fn new(stock: &[(u64, u32)]) -> Self {
    Self::with_storage(stock, Arc::new(MemoryStorage::new()))
  }

  pub fn with_storage(stock: &[(u64, u32)], storage: Arc<MemoryStorage>) -> Self {
    setup_tracing();
    let inventory = inventory(stock);
    let notices = Arc::new(CollectingNotices::new());
    let manager = CartManager::builder()
      .storage_key(KEY)
      .inventory(inventory.clone())
      .storage(storage.clone())
      .notices(notices.clone())
      .build()
      .expect("manager builds");
    Self {
      manager,
      inventory,
      storage,
      notices,
    }
  }

  /// Product ids in cart order.
  pub fn ids(&self) -> Vec<u64> {
    self.manager.cart().iter().map(|e| e.product.id.0).collect()
  }

  pub fn amount_of(&self, id: u64) -> u32 {
    self.manager.cart().amount_of(ProductId(id))
  }
}

/// Delays every stock and catalog answer so concurrent operations interleave.
pub struct SlowInventory {
  pub inner: Arc<InMemoryInventory>,
  pub delay: Duration,
}

#[async_trait]
impl StockOracle for SlowInventory {
  async fn stock(&self, product_id: ProductId) -> anyhow::Result<Stock> {
    tokio::time::sleep(self.delay).await;
    self.inner.stock(product_id).await
  }
}

#[async_trait]
impl CatalogLookup for SlowInventory {
  async fn product(&self, product_id: ProductId) -> anyhow::Result<CatalogProduct> {
    tokio::time::sleep(self.delay).await;
    self.inner.product(product_id).await
  }
}
