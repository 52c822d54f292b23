// rocketcart/examples/cart_session.rs

use rocketcart::{
  CartManager, CartOutcome, CatalogProduct, CollectingNotices, InMemoryInventory, MemoryStorage, ProductId,
  UpdateProductAmount,
};
use std::sync::Arc;
use tracing::info;

fn sneaker(id: u64, title: &str, price: f64) -> CatalogProduct {
  CatalogProduct {
    id: ProductId(id),
    title: title.to_string(),
    image: format!("https://rocketseat-cdn.example/sneaker-{}.jpg", id),
    price,
  }
}

fn report(step: &str, outcome: CartOutcome, notices: &CollectingNotices) {
  let messages: Vec<String> = notices.drain().iter().map(ToString::to_string).collect();
  info!(?outcome, ?messages, "{}", step);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Cart Session Example ---");

  // 1. An offline inventory standing in for the stock and catalog API.
  let inventory = Arc::new(
    InMemoryInventory::new()
      .with_product(sneaker(1, "Tenis de Caminhada Leve Confortavel", 179.9), 3)
      .with_product(sneaker(2, "Tenis VR Caminhada Confortavel Detalhes Couro", 139.9), 1),
  );
  let storage = Arc::new(MemoryStorage::new());
  let notices = Arc::new(CollectingNotices::new());

  // 2. Build the manager. It loads whatever the storage already holds.
  let manager = CartManager::builder()
    .inventory(inventory)
    .storage(storage.clone())
    .notices(notices.clone())
    .build()?;

  // 3. Drive the three operations.
  report("add 1", manager.add_product(ProductId(1)).await, &notices);
  report("add 2", manager.add_product(ProductId(2)).await, &notices);
  report("add 2 again", manager.add_product(ProductId(2)).await, &notices);
  report(
    "set 1 to 3",
    manager
      .update_product_amount(UpdateProductAmount {
        product_id: ProductId(1),
        amount: 3,
      })
      .await,
    &notices,
  );
  report(
    "set 1 to 0",
    manager
      .update_product_amount(UpdateProductAmount {
        product_id: ProductId(1),
        amount: 0,
      })
      .await,
    &notices,
  );
  report("remove 2", manager.remove_product(ProductId(2)).await, &notices);

  // 4. Inspect the result.
  for entry in manager.cart().iter() {
    info!(id = %entry.product.id, title = %entry.product.title, amount = entry.amount, "Cart entry");
  }
  let stored = storage.get(manager.storage_key()).unwrap_or_default();
  info!(writes = storage.writes(), %stored, "Persisted cart");

  Ok(())
}
