// rocketcart/src/storage/memory.rs
use crate::storage::DurableStorage;
use anyhow::anyhow;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-process storage. Counts writes so callers can observe sync behaviour.
#[derive(Debug, Default)]
pub struct MemoryStorage {
  blobs: Mutex<HashMap<String, String>>,
  writes: AtomicUsize,
  fail_saves: AtomicBool,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  /// Storage pre-seeded with one blob, as if persisted by an earlier session.
  pub fn with_blob(key: &str, blob: impl Into<String>) -> Self {
    let storage = Self::new();
    storage.blobs.lock().insert(key.to_string(), blob.into());
    storage
  }

  pub fn get(&self, key: &str) -> Option<String> {
    self.blobs.lock().get(key).cloned()
  }

  /// Number of successful `save` calls.
  pub fn writes(&self) -> usize {
    self.writes.load(Ordering::SeqCst)
  }

  pub fn fail_saves(&self, fail: bool) {
    self.fail_saves.store(fail, Ordering::SeqCst);
  }
}

impl DurableStorage for MemoryStorage {
  fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
    Ok(self.get(key))
  }

  fn save(&self, key: &str, blob: &str) -> anyhow::Result<()> {
    if self.fail_saves.load(Ordering::SeqCst) {
      return Err(anyhow!("storage is read-only"));
    }
    self.blobs.lock().insert(key.to_string(), blob.to_string());
    self.writes.fetch_add(1, Ordering::SeqCst);
    Ok(())
  }
}
