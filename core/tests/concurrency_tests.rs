// tests/concurrency_tests.rs
mod common;

use common::*;
use rocketcart::{
  Cart, CartFailure, CartManager, CollectingNotices, DurableStorage, MemoryStorage, ProductId, UpdateProductAmount,
};
use std::sync::Arc;
use std::time::Duration;

/// Memory storage that yields the thread inside `save`, widening the window between
/// a commit and its write.
#[derive(Default)]
struct YieldingStorage {
  inner: MemoryStorage,
}

impl DurableStorage for YieldingStorage {
  fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
    self.inner.load(key)
  }

  fn save(&self, key: &str, blob: &str) -> anyhow::Result<()> {
    std::thread::yield_now();
    self.inner.save(key, blob)
  }
}

fn slow_manager(stock: &[(u64, u32)]) -> (Arc<CartManager>, Arc<MemoryStorage>) {
  setup_tracing();
  let storage = Arc::new(MemoryStorage::new());
  let slow = Arc::new(SlowInventory {
    inner: inventory(stock),
    delay: Duration::from_millis(20),
  });
  let manager = CartManager::builder()
    .storage_key(KEY)
    .inventory(slow)
    .storage(storage.clone())
    .notices(Arc::new(CollectingNotices::new()))
    .build()
    .unwrap();
  (Arc::new(manager), storage)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_of_one_product_respect_stock() {
  let (manager, _storage) = slow_manager(&[(42, 1)]);

  let a = tokio::spawn({
    let manager = manager.clone();
    async move { manager.add_product(ProductId(42)).await }
  });
  let b = tokio::spawn({
    let manager = manager.clone();
    async move { manager.add_product(ProductId(42)).await }
  });
  let outcomes = [a.await.unwrap(), b.await.unwrap()];

  assert_eq!(outcomes.iter().filter(|o| o.is_applied()).count(), 1);
  assert_eq!(
    outcomes.iter().filter(|o| o.failure() == Some(CartFailure::OutOfStock)).count(),
    1
  );
  assert_eq!(manager.cart().len(), 1);
  assert_eq!(manager.cart().amount_of(ProductId(42)), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_of_one_product_accumulate() {
  let (manager, _storage) = slow_manager(&[(7, 10)]);

  let handles: Vec<_> = (0..5)
    .map(|_| {
      let manager = manager.clone();
      tokio::spawn(async move { manager.add_product(ProductId(7)).await })
    })
    .collect();
  for handle in handles {
    assert!(handle.await.unwrap().is_applied());
  }

  assert_eq!(manager.cart().len(), 1);
  assert_eq!(manager.cart().amount_of(ProductId(7)), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_of_different_products_both_land() {
  let (manager, storage) = slow_manager(&[(1, 5), (2, 5)]);

  let (a, b) = tokio::join!(manager.add_product(ProductId(1)), manager.add_product(ProductId(2)));

  assert!(a.is_applied() && b.is_applied());
  let cart = manager.cart();
  assert_eq!(cart.len(), 2);
  let stored: Cart = serde_json::from_str(&storage.get(KEY).unwrap()).unwrap();
  assert_eq!(stored, *cart);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn remove_waits_for_in_flight_add_of_same_product() {
  let (manager, _storage) = slow_manager(&[(1, 5)]);
  manager.add_product(ProductId(1)).await;

  let (add, remove) = tokio::join!(manager.add_product(ProductId(1)), manager.remove_product(ProductId(1)));

  // The add was first in line; the remove then drops the whole entry.
  assert!(add.is_applied());
  assert!(remove.is_applied());
  assert!(manager.cart().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn update_and_add_on_same_product_serialize() {
  let (manager, _storage) = slow_manager(&[(1, 3)]);
  manager.add_product(ProductId(1)).await;

  let (update, add) = tokio::join!(
    manager.update_product_amount(UpdateProductAmount {
      product_id: ProductId(1),
      amount: 3,
    }),
    manager.add_product(ProductId(1))
  );

  // Whichever ran second saw the first one's result, so stock is never exceeded.
  assert!(update.is_applied());
  assert_eq!(add.failure(), Some(CartFailure::OutOfStock));
  assert_eq!(manager.cart().amount_of(ProductId(1)), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn stored_cart_matches_memory_after_concurrent_commits() {
  setup_tracing();
  const PRODUCTS: u64 = 16;
  let stock: Vec<(u64, u32)> = (1..=PRODUCTS).map(|id| (id, 5)).collect();

  for round in 0..50 {
    let storage = Arc::new(YieldingStorage::default());
    let manager = Arc::new(
      CartManager::builder()
        .storage_key(KEY)
        .inventory(inventory(&stock))
        .storage(storage.clone())
        .notices(Arc::new(CollectingNotices::new()))
        .build()
        .unwrap(),
    );

    let handles: Vec<_> = (1..=PRODUCTS)
      .map(|id| {
        let manager = manager.clone();
        tokio::spawn(async move { manager.add_product(ProductId(id)).await })
      })
      .collect();
    for handle in handles {
      assert!(handle.await.unwrap().is_applied());
    }

    let in_memory = manager.cart();
    let stored: Cart = serde_json::from_str(&storage.inner.get(KEY).unwrap()).unwrap();
    assert_eq!(in_memory.len(), PRODUCTS as usize, "round {}", round);
    assert_eq!(stored, *in_memory, "round {}: stored cart is stale", round);
  }
}
