// rocketcart/src/manager/mod.rs

//! Defines `CartManager`, the owner of the cart, and its builder.
//!
//! The manager exposes a read-only snapshot of the cart and three mutation
//! operations. Each operation runs its protocol under a per-product lock, then
//! either commits and syncs the cart to durable storage, or leaves it untouched.
//! Outcomes are reported through the `NoticeSink`; no operation returns an
//! error the caller has to handle.

pub mod outcome;
mod protocols;
mod state;

use crate::config::CartConfig;
use crate::core::context_data::ContextData;
use crate::core::control::ProtocolResult;
use crate::core::entry::{Cart, CartEntry, ProductId};
use crate::error::{CartError, CartResult};
use crate::notice::{Notice, NoticeKind, NoticeSink, TracingNotices};
use crate::protocol::Protocol;
use crate::services::{CatalogLookup, StockOracle};
use crate::storage::{DurableStorage, FileStorage};
use outcome::{CartFailure, CartOutcome, UpdateProductAmount};
use parking_lot::Mutex;
use protocols::{AddProductCtxData, RemoveProductCtxData, UpdateAmountCtxData};
use state::{CartCell, ProductLocks};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, event, instrument, warn, Level};

pub struct CartManager {
  storage_key: String,
  cell: Arc<CartCell>,
  /// The snapshot last written to (or loaded from) storage.
  persisted: Mutex<Arc<Cart>>,
  stock: Arc<dyn StockOracle>,
  catalog: Arc<dyn CatalogLookup>,
  storage: Arc<dyn DurableStorage>,
  notices: Arc<dyn NoticeSink>,
  product_locks: ProductLocks,
  add_protocol: Protocol<AddProductCtxData>,
  update_protocol: Protocol<UpdateAmountCtxData>,
  remove_protocol: Protocol<RemoveProductCtxData>,
}

impl CartManager {
  pub fn builder() -> CartManagerBuilder {
    CartManagerBuilder::new(CartConfig::default())
  }

  /// A manager wired to the HTTP API, file storage and the tracing notice sink
  /// described by `config`.
  #[cfg(feature = "http")]
  pub fn from_config(config: CartConfig) -> CartResult<Self> {
    let api = Arc::new(crate::services::HttpApi::from_config(&config)?);
    let storage = Arc::new(FileStorage::new(config.storage_dir.clone()));
    CartManagerBuilder::new(config).inventory(api).storage(storage).build()
  }

  /// Current cart. Reading never triggers a sync.
  pub fn cart(&self) -> Arc<Cart> {
    self.cell.snapshot()
  }

  /// A receiver that is notified of every committed change to the cart.
  pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
    self.cell.subscribe()
  }

  pub fn storage_key(&self) -> &str {
    &self.storage_key
  }

  /// Adds one unit of `product_id`, creating its entry on first add.
  #[instrument(name = "CartManager::add_product", skip(self), fields(product_id = %product_id))]
  pub async fn add_product(&self, product_id: ProductId) -> CartOutcome {
    let _lock = self.product_locks.acquire(product_id).await;
    let ctx_data = ContextData::new(AddProductCtxData::new(
      product_id,
      self.cell.clone(),
      self.stock.clone(),
      self.catalog.clone(),
    ));
    let result = self.add_protocol.run(ctx_data).await;
    self.finish(product_id, result, CartFailure::AddFailed, Some(NoticeKind::Added))
  }

  /// Removes the entry for `product_id`.
  #[instrument(name = "CartManager::remove_product", skip(self), fields(product_id = %product_id))]
  pub async fn remove_product(&self, product_id: ProductId) -> CartOutcome {
    let _lock = self.product_locks.acquire(product_id).await;
    let ctx_data = ContextData::new(RemoveProductCtxData {
      product_id,
      cell: self.cell.clone(),
    });
    let result = self.remove_protocol.run(ctx_data).await;
    self.finish(product_id, result, CartFailure::RemoveFailed, None)
  }

  /// Sets the amount of a product already in the cart. Non-positive amounts are ignored.
  #[instrument(
    name = "CartManager::update_product_amount",
    skip(self, request),
    fields(product_id = %request.product_id, amount = request.amount)
  )]
  pub async fn update_product_amount(&self, request: UpdateProductAmount) -> CartOutcome {
    let UpdateProductAmount { product_id, amount } = request;
    let _lock = self.product_locks.acquire(product_id).await;
    let ctx_data = ContextData::new(UpdateAmountCtxData {
      product_id,
      amount,
      cell: self.cell.clone(),
      stock: self.stock.clone(),
    });
    let result = self.update_protocol.run(ctx_data).await;
    self.finish(product_id, result, CartFailure::UpdateFailed, None)
  }

  /// Turns a protocol result into an outcome: sync and notify on success,
  /// notify on failure.
  fn finish(
    &self,
    product_id: ProductId,
    result: CartResult<ProtocolResult>,
    on_error: CartFailure,
    success_notice: Option<NoticeKind>,
  ) -> CartOutcome {
    match result {
      Ok(ProtocolResult::Completed) => {
        self.sync();
        if let Some(kind) = success_notice {
          self.notices.notify(Notice::new(kind, product_id));
        }
        CartOutcome::Applied
      }
      Ok(ProtocolResult::Stopped) => CartOutcome::Ignored,
      Err(e) => {
        let failure = CartFailure::classify(&e, on_error);
        event!(Level::WARN, error = %e, ?failure, "Cart operation rejected.");
        self.notices.notify(Notice::new(failure.notice_kind(), product_id));
        CartOutcome::Rejected(failure)
      }
    }
  }

  /// Writes the cart to storage unless it is the snapshot already persisted.
  /// Failures are logged, and the next change retries the write.
  /// The snapshot is taken under the persisted lock, so writes land in commit order.
  fn sync(&self) {
    let mut persisted = self.persisted.lock();
    let current = self.cell.snapshot();
    if Arc::ptr_eq(&current, &persisted) {
      debug!("Cart unchanged since last sync; skipping write.");
      return;
    }

    let blob = match serde_json::to_string(&*current) {
      Ok(blob) => blob,
      Err(e) => {
        warn!(error = %e, "Failed to serialize cart; not persisted.");
        return;
      }
    };
    match self.storage.save(&self.storage_key, &blob) {
      Ok(()) => {
        debug!(entries = current.len(), key = %self.storage_key, "Cart persisted.");
        *persisted = current;
      }
      Err(e) => warn!(error = %e, key = %self.storage_key, "Failed to persist cart."),
    }
  }
}

pub struct CartManagerBuilder {
  config: CartConfig,
  stock: Option<Arc<dyn StockOracle>>,
  catalog: Option<Arc<dyn CatalogLookup>>,
  storage: Option<Arc<dyn DurableStorage>>,
  notices: Arc<dyn NoticeSink>,
}

impl CartManagerBuilder {
  pub fn new(config: CartConfig) -> Self {
    Self {
      config,
      stock: None,
      catalog: None,
      storage: None,
      notices: Arc::new(TracingNotices),
    }
  }

  pub fn storage_key(mut self, key: impl Into<String>) -> Self {
    self.config.storage_key = key.into();
    self
  }

  pub fn stock_oracle<S: StockOracle>(mut self, stock: Arc<S>) -> Self {
    self.stock = Some(stock);
    self
  }

  pub fn catalog<C: CatalogLookup>(mut self, catalog: Arc<C>) -> Self {
    self.catalog = Some(catalog);
    self
  }

  /// Uses one service as both stock oracle and catalog.
  pub fn inventory<I: StockOracle + CatalogLookup>(mut self, inventory: Arc<I>) -> Self {
    self.stock = Some(inventory.clone());
    self.catalog = Some(inventory);
    self
  }

  /// Defaults to a `FileStorage` in the configured storage directory.
  pub fn storage<D: DurableStorage>(mut self, storage: Arc<D>) -> Self {
    self.storage = Some(storage);
    self
  }

  /// Defaults to `TracingNotices`.
  pub fn notices<N: NoticeSink>(mut self, notices: Arc<N>) -> Self {
    self.notices = notices;
    self
  }

  /// Loads the persisted cart and builds the manager.
  ///
  /// A storage read error fails the build. A blob that cannot be decoded is
  /// logged and replaced by an empty cart.
  pub fn build(self) -> CartResult<CartManager> {
    let stock = self
      .stock
      .ok_or_else(|| CartError::Config("no stock oracle configured".to_string()))?;
    let catalog = self
      .catalog
      .ok_or_else(|| CartError::Config("no catalog lookup configured".to_string()))?;
    let storage = self
      .storage
      .unwrap_or_else(|| Arc::new(FileStorage::new(self.config.storage_dir.clone())));
    let storage_key = self.config.storage_key;

    let cart = Arc::new(load_cart(storage.as_ref(), &storage_key)?);
    event!(Level::INFO, entries = cart.len(), key = %storage_key, "Cart loaded.");

    Ok(CartManager {
      storage_key,
      cell: Arc::new(CartCell::new(cart.clone())),
      persisted: Mutex::new(cart),
      stock,
      catalog,
      storage,
      notices: self.notices,
      product_locks: ProductLocks::default(),
      add_protocol: protocols::add_product_protocol(),
      update_protocol: protocols::update_amount_protocol(),
      remove_protocol: protocols::remove_product_protocol(),
    })
  }
}

fn load_cart(storage: &dyn DurableStorage, key: &str) -> CartResult<Cart> {
  let Some(blob) = storage.load(key).map_err(CartError::Storage)? else {
    return Ok(Cart::new());
  };
  match serde_json::from_str::<Vec<CartEntry>>(&blob) {
    Ok(entries) => {
      let total = entries.len();
      let cart = Cart::from_entries(entries.into_iter().filter(|e| e.amount > 0));
      if cart.len() != total {
        warn!(dropped = total - cart.len(), "Dropped duplicate or empty entries from stored cart.");
      }
      Ok(cart)
    }
    Err(e) => {
      warn!(error = %e, key, "Stored cart is unreadable; starting with an empty cart.");
      Ok(Cart::new())
    }
  }
}
