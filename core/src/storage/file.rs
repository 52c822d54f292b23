// rocketcart/src/storage/file.rs

//! `FileStorage`: one file per key under a directory.

use crate::storage::DurableStorage;
use anyhow::Context as AnyhowContext;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Stores each key as a JSON file under `dir`.
///
/// Reads and writes use blocking `std::fs` calls. `CartManager` saves after every
/// applied change from inside its async operations, so each save briefly blocks
/// the runtime worker it runs on.
#[derive(Debug, Clone)]
pub struct FileStorage {
  dir: PathBuf,
}

impl FileStorage {
  /// The directory is created on the first save if it does not exist.
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// Maps a key to its file; characters outside `[A-Za-z0-9._-]` become `_`.
  pub fn path_for(&self, key: &str) -> PathBuf {
    let file_name: String = key
      .chars()
      .map(|c| match c {
        'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => c,
        _ => '_',
      })
      .collect();
    self.dir.join(format!("{}.json", file_name))
  }
}

impl DurableStorage for FileStorage {
  fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
    let path = self.path_for(key);
    match fs::read_to_string(&path) {
      Ok(blob) => Ok(Some(blob)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
  }

  fn save(&self, key: &str, blob: &str) -> anyhow::Result<()> {
    fs::create_dir_all(&self.dir).with_context(|| format!("failed to create {}", self.dir.display()))?;
    let path = self.path_for(key);
    // Atomic replace: write a sibling file, then rename over the target.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, blob).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, &path).with_context(|| format!("failed to replace {}", path.display()))?;
    trace!(path = %path.display(), bytes = blob.len(), "Blob saved.");
    Ok(())
  }
}
