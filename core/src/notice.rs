// rocketcart/src/notice.rs

//! User-facing notices: the side channel through which cart operations report outcomes.

use crate::core::entry::ProductId;
use parking_lot::Mutex;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
  Success,
  Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
  Added,
  OutOfStock,
  AddFailed,
  RemoveFailed,
  UpdateFailed,
}

impl NoticeKind {
  pub fn level(self) -> NoticeLevel {
    match self {
      NoticeKind::Added => NoticeLevel::Success,
      _ => NoticeLevel::Error,
    }
  }

  pub fn message(self) -> &'static str {
    match self {
      NoticeKind::Added => "Product added to cart",
      NoticeKind::OutOfStock => "Requested quantity is out of stock",
      NoticeKind::AddFailed => "Failed to add product",
      NoticeKind::RemoveFailed => "Failed to remove product",
      NoticeKind::UpdateFailed => "Failed to update product quantity",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub level: NoticeLevel,
  pub kind: NoticeKind,
  pub product_id: ProductId,
  pub message: &'static str,
}

impl Notice {
  pub fn new(kind: NoticeKind, product_id: ProductId) -> Self {
    Self {
      level: kind.level(),
      kind,
      product_id,
      message: kind.message(),
    }
  }
}

impl fmt::Display for Notice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.message)
  }
}

/// Receives notices; typically backed by the UI's toast/snackbar mechanism.
pub trait NoticeSink: Send + Sync + 'static {
  fn notify(&self, notice: Notice);
}

/// Default sink: writes notices to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotices;

impl NoticeSink for TracingNotices {
  fn notify(&self, notice: Notice) {
    match notice.level {
      NoticeLevel::Success => info!(product_id = %notice.product_id, kind = ?notice.kind, "{}", notice.message),
      NoticeLevel::Error => warn!(product_id = %notice.product_id, kind = ?notice.kind, "{}", notice.message),
    }
  }
}

/// Records every notice in order.
#[derive(Debug, Default)]
pub struct CollectingNotices {
  notices: Mutex<Vec<Notice>>,
}

impl CollectingNotices {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn notices(&self) -> Vec<Notice> {
    self.notices.lock().clone()
  }

  pub fn kinds(&self) -> Vec<NoticeKind> {
    self.notices.lock().iter().map(|n| n.kind).collect()
  }

  pub fn last(&self) -> Option<Notice> {
    self.notices.lock().last().cloned()
  }

  /// Returns and clears the recorded notices.
  pub fn drain(&self) -> Vec<Notice> {
    std::mem::take(&mut *self.notices.lock())
  }
}

impl NoticeSink for CollectingNotices {
  fn notify(&self, notice: Notice) {
    self.notices.lock().push(notice);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_added_is_a_success() {
    assert_eq!(NoticeKind::Added.level(), NoticeLevel::Success);
    for kind in [
      NoticeKind::OutOfStock,
      NoticeKind::AddFailed,
      NoticeKind::RemoveFailed,
      NoticeKind::UpdateFailed,
    ] {
      assert_eq!(kind.level(), NoticeLevel::Error);
    }
  }

  #[test]
  fn collecting_sink_records_in_order_and_drains() {
    let sink = CollectingNotices::new();
    sink.notify(Notice::new(NoticeKind::Added, ProductId(1)));
    sink.notify(Notice::new(NoticeKind::OutOfStock, ProductId(1)));
    assert_eq!(sink.kinds(), vec![NoticeKind::Added, NoticeKind::OutOfStock]);
    assert_eq!(sink.last().map(|n| n.to_string()).as_deref(), Some("Requested quantity is out of stock"));
    assert_eq!(sink.drain().len(), 2);
    assert!(sink.notices().is_empty());
  }
}
