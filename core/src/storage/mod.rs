// rocketcart/src/storage/mod.rs

//! Durable key-value blob storage the cart is persisted to.

pub mod file;
pub mod memory;

/// A key-value store of string blobs.
///
/// `load` is called once when a `CartManager` is built; `save` after every
/// logical change to the cart, replacing the prior value.
pub trait DurableStorage: Send + Sync + 'static {
  fn load(&self, key: &str) -> anyhow::Result<Option<String>>;

  fn save(&self, key: &str, blob: &str) -> anyhow::Result<()>;
}

pub use file::FileStorage;
pub use memory::MemoryStorage;
