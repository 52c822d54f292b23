// rocketcart/src/manager/outcome.rs

use crate::core::entry::ProductId;
use crate::error::CartError;
use crate::notice::NoticeKind;

/// Arguments of `CartManager::update_product_amount`.
///
/// `amount` is whatever the caller supplied; zero and negative values are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
  pub product_id: ProductId,
  pub amount: i64,
}

/// Why an operation was rejected. Each maps to one error notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartFailure {
  OutOfStock,
  AddFailed,
  RemoveFailed,
  UpdateFailed,
}

impl CartFailure {
  /// `OutOfStock` errors keep their identity; everything else becomes `fallback`.
  pub(crate) fn classify(error: &CartError, fallback: CartFailure) -> CartFailure {
    if error.is_out_of_stock() {
      CartFailure::OutOfStock
    } else {
      fallback
    }
  }

  pub fn notice_kind(self) -> NoticeKind {
    match self {
      CartFailure::OutOfStock => NoticeKind::OutOfStock,
      CartFailure::AddFailed => NoticeKind::AddFailed,
      CartFailure::RemoveFailed => NoticeKind::RemoveFailed,
      CartFailure::UpdateFailed => NoticeKind::UpdateFailed,
    }
  }
}

/// What a cart operation did. Callers are free to ignore it; the notice channel
/// and the cart snapshot carry the same information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOutcome {
  /// The cart changed and was synced.
  Applied,
  /// The request was a no-op (e.g. a non-positive amount).
  Ignored,
  Rejected(CartFailure),
}

impl CartOutcome {
  pub fn is_applied(&self) -> bool {
    matches!(self, CartOutcome::Applied)
  }

  pub fn failure(&self) -> Option<CartFailure> {
    match self {
      CartOutcome::Rejected(failure) => Some(*failure),
      _ => None,
    }
  }
}
