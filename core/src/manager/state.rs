// rocketcart/src/manager/state.rs

//! The cart cell (current snapshot plus its watch channel) and per-product mutation locks.

use crate::core::entry::{Cart, ProductId};
use crate::error::CartResult;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, OwnedMutexGuard};

/// Holds the current cart. Every committed change replaces the `Arc`, so a
/// pointer comparison tells whether two snapshots are the same logical state.
pub(crate) struct CartCell {
  current: RwLock<Arc<Cart>>,
  tx: watch::Sender<Arc<Cart>>,
}

impl CartCell {
  pub(crate) fn new(cart: Arc<Cart>) -> Self {
    let (tx, _rx) = watch::channel(cart.clone());
    Self {
      current: RwLock::new(cart),
      tx,
    }
  }

  pub(crate) fn snapshot(&self) -> Arc<Cart> {
    self.current.read().clone()
  }

  pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
    self.tx.subscribe()
  }

  /// Applies `f` to a copy of the cart current at this moment and publishes the
  /// result. If `f` fails the cart is left untouched.
  pub(crate) fn commit<F>(&self, f: F) -> CartResult<Arc<Cart>>
  where
    F: FnOnce(&mut Cart) -> CartResult<()>,
  {
    let mut guard = self.current.write();
    let mut next = (**guard).clone();
    f(&mut next)?;
    let next = Arc::new(next);
    *guard = next.clone();
    self.tx.send_replace(next.clone());
    Ok(next)
  }
}

/// Async locks keyed by product, so two mutations of one product never interleave
/// across a network await. Idle entries are removed when their last guard drops.
#[derive(Default)]
pub(crate) struct ProductLocks {
  table: Mutex<HashMap<ProductId, Arc<tokio::sync::Mutex<()>>>>,
}

pub(crate) struct ProductLockGuard<'a> {
  locks: &'a ProductLocks,
  product_id: ProductId,
  guard: Option<OwnedMutexGuard<()>>,
}

impl ProductLocks {
  pub(crate) async fn acquire(&self, product_id: ProductId) -> ProductLockGuard<'_> {
    let mutex = self.table.lock().entry(product_id).or_default().clone();
    let guard = mutex.lock_owned().await;
    ProductLockGuard {
      locks: self,
      product_id,
      guard: Some(guard),
    }
  }

  #[cfg(test)]
  pub(crate) fn tracked(&self) -> usize {
    self.table.lock().len()
  }
}

impl Drop for ProductLockGuard<'_> {
  fn drop(&mut self) {
    self.guard.take();
    let mut table = self.locks.table.lock();
    // Waiters clone the Arc under the table lock, so a count of 1 means nobody else wants it.
    if table.get(&self.product_id).is_some_and(|m| Arc::strong_count(m) == 1) {
      table.remove(&self.product_id);
    }
  }
}
