// rocketcart/src/manager/protocols.rs

//! The three mutation protocols, each an ordered `Protocol` over its own context data.
//!
//! Every protocol reads what it needs, awaits its queries with no lock held, and
//! finishes with a `commit` step that applies the change to the cart current at
//! commit time. Nothing touches the cart before that step.

use crate::core::context_data::ContextData;
use crate::core::control::StepControl;
use crate::core::entry::{CartEntry, ProductId};
use crate::core::step::SkipCondition;
use crate::error::CartError;
use crate::manager::state::CartCell;
use crate::protocol::Protocol;
use crate::services::{CatalogLookup, StockOracle};
use std::sync::Arc;
use tracing::{debug, info, warn};

// --- addProduct ---

pub(crate) struct AddProductCtxData {
  pub product_id: ProductId,
  pub cell: Arc<CartCell>,
  pub stock: Arc<dyn StockOracle>,
  pub catalog: Arc<dyn CatalogLookup>,
  pub current_amount: u32,
  pub in_cart: bool,
  pub new_entry: Option<CartEntry>,
}

impl AddProductCtxData {
  pub fn new(
    product_id: ProductId,
    cell: Arc<CartCell>,
    stock: Arc<dyn StockOracle>,
    catalog: Arc<dyn CatalogLookup>,
  ) -> Self {
    Self {
      product_id,
      cell,
      stock,
      catalog,
      current_amount: 0,
      in_cart: false,
      new_entry: None,
    }
  }
}

pub(crate) fn add_product_protocol() -> Protocol<AddProductCtxData> {
  let already_in_cart: SkipCondition<AddProductCtxData> =
    Arc::new(|ctx: &ContextData<AddProductCtxData>| ctx.read().in_cart);
  let mut p = Protocol::<AddProductCtxData>::new(
    "add_product",
    &[
      ("read_current_amount", None),
      ("check_stock", None),
      ("fetch_catalog_entry", Some(already_in_cart)),
      ("commit", None),
    ],
  );

  p.on("read_current_amount", |ctx_data: ContextData<AddProductCtxData>| async move {
    let mut guard = ctx_data.write();
    let snapshot = guard.cell.snapshot();
    guard.current_amount = snapshot.amount_of(guard.product_id);
    guard.in_cart = snapshot.contains(guard.product_id);
    debug!(current_amount = guard.current_amount, in_cart = guard.in_cart, "Current amount read.");
    Ok(StepControl::Continue)
  });

  p.on("check_stock", |ctx_data: ContextData<AddProductCtxData>| async move {
    let (product_id, current_amount, stock) = {
      let guard = ctx_data.read();
      (guard.product_id, guard.current_amount, guard.stock.clone())
    };

    let available = stock
      .stock(product_id)
      .await
      .map_err(|source| CartError::StockQuery { product_id, source })?
      .amount;
    let requested = u64::from(current_amount) + 1;

    if i128::from(requested) > i128::from(available) {
      warn!(requested, available, "Insufficient stock to add product.");
      return Err(CartError::OutOfStock {
        product_id,
        requested,
        available,
      });
    }
    debug!(requested, available, "Stock sufficient.");
    Ok(StepControl::Continue)
  });

  p.on("fetch_catalog_entry", |ctx_data: ContextData<AddProductCtxData>| async move {
    let (product_id, catalog) = {
      let guard = ctx_data.read();
      (guard.product_id, guard.catalog.clone())
    };

    let product = catalog
      .product(product_id)
      .await
      .map_err(|source| CartError::CatalogQuery { product_id, source })?;
    if product.id != product_id {
      return Err(CartError::CatalogQuery {
        product_id,
        source: anyhow::anyhow!("catalog answered with product {}", product.id),
      });
    }
    ctx_data.write().new_entry = Some(CartEntry::new(product));
    Ok(StepControl::Continue)
  });

  p.on("commit", |ctx_data: ContextData<AddProductCtxData>| async move {
    let mut guard = ctx_data.write();
    let product_id = guard.product_id;
    let amount = guard
      .current_amount
      .checked_add(1)
      .ok_or_else(|| CartError::Internal(format!("amount of product {} overflows", product_id)))?;
    let new_entry = guard.new_entry.take();
    guard.cell.commit(|cart| {
      let applied = match new_entry {
        Some(entry) => cart.push(entry),
        None => cart.set_amount(product_id, amount),
      };
      if applied {
        Ok(())
      } else {
        Err(CartError::Internal(format!(
          "cart changed under product {} while it was locked",
          product_id
        )))
      }
    })?;
    info!(amount, "Product added to cart.");
    Ok(StepControl::Continue)
  });

  p
}

// --- updateProductAmount ---

pub(crate) struct UpdateAmountCtxData {
  pub product_id: ProductId,
  pub amount: i64,
  pub cell: Arc<CartCell>,
  pub stock: Arc<dyn StockOracle>,
}

pub(crate) fn update_amount_protocol() -> Protocol<UpdateAmountCtxData> {
  let mut p = Protocol::<UpdateAmountCtxData>::new(
    "update_product_amount",
    &[("validate_amount", None), ("check_stock", None), ("commit", None)],
  );

  p.on("validate_amount", |ctx_data: ContextData<UpdateAmountCtxData>| async move {
    let amount = ctx_data.read().amount;
    if amount <= 0 {
      debug!(amount, "Non-positive amount ignored.");
      return Ok(StepControl::Stop);
    }
    Ok(StepControl::Continue)
  });

  p.on("check_stock", |ctx_data: ContextData<UpdateAmountCtxData>| async move {
    let (product_id, amount, stock) = {
      let guard = ctx_data.read();
      (guard.product_id, guard.amount, guard.stock.clone())
    };

    let available = stock
      .stock(product_id)
      .await
      .map_err(|source| CartError::StockQuery { product_id, source })?
      .amount;
    // validate_amount guarantees amount > 0.
    let requested = amount.unsigned_abs();

    if i128::from(requested) > i128::from(available) {
      warn!(requested, available, "Insufficient stock for requested amount.");
      return Err(CartError::OutOfStock {
        product_id,
        requested,
        available,
      });
    }
    Ok(StepControl::Continue)
  });

  p.on("commit", |ctx_data: ContextData<UpdateAmountCtxData>| async move {
    let guard = ctx_data.read();
    let product_id = guard.product_id;
    // Entry amounts are u32; a larger stock does not make a larger amount representable.
    let amount = u32::try_from(guard.amount).map_err(|e| CartError::Internal(e.to_string()))?;
    guard.cell.commit(|cart| {
      if cart.set_amount(product_id, amount) {
        Ok(())
      } else {
        Err(CartError::NotInCart { product_id })
      }
    })?;
    info!(amount, "Product amount updated.");
    Ok(StepControl::Continue)
  });

  p
}

// --- removeProduct ---

pub(crate) struct RemoveProductCtxData {
  pub product_id: ProductId,
  pub cell: Arc<CartCell>,
}

pub(crate) fn remove_product_protocol() -> Protocol<RemoveProductCtxData> {
  let mut p = Protocol::<RemoveProductCtxData>::new("remove_product", &[("commit", None)]);

  p.on("commit", |ctx_data: ContextData<RemoveProductCtxData>| async move {
    let guard = ctx_data.read();
    let product_id = guard.product_id;
    guard.cell.commit(|cart| {
      cart
        .remove(product_id)
        .map(|_| ())
        .ok_or(CartError::NotInCart { product_id })
    })?;
    info!("Product removed from cart.");
    Ok(StepControl::Continue)
  });

  p
}
