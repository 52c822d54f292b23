use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rocketcart::core::step::SkipCondition;
use rocketcart::{
  CartManager, CatalogProduct, ContextData, InMemoryInventory, MemoryStorage, ProductId, Protocol, ProtocolResult,
  StepControl, UpdateProductAmount,
};
use std::sync::Arc;
use tokio::runtime::Runtime; // To run async code within Criterion

// --- Common Benchmark Fixtures ---
#[derive(Clone, Debug, Default)]
struct BenchContext {
  counter: u64,
}

fn product(id: u64) -> CatalogProduct {
  CatalogProduct {
    id: ProductId(id),
    title: format!("Bench Sneaker {}", id),
    image: format!("https://img.example/{}.jpg", id),
    price: 99.9,
  }
}

/// A manager over `num_products` products, each with effectively unlimited stock.
fn manager(num_products: u64) -> Arc<CartManager> {
  let inventory = InMemoryInventory::new();
  for id in 1..=num_products {
    inventory.insert_product(product(id), u32::MAX);
  }
  let manager = CartManager::builder()
    .inventory(Arc::new(inventory))
    .storage(Arc::new(MemoryStorage::new()))
    .build()
    .unwrap();
  Arc::new(manager)
}

// --- Benchmark Functions ---

fn bench_protocol_overhead(c: &mut Criterion) {
  let mut group = c.benchmark_group("ProtocolOverhead");
  let rt = Runtime::new().unwrap();

  for num_steps in [1usize, 4, 16] {
    let step_names: Vec<&'static str> = (0..num_steps)
      .map(|i| Box::leak(format!("step_{}", i).into_boxed_str()) as &'static str)
      .collect();
    let step_defs: Vec<(&str, Option<SkipCondition<BenchContext>>)> = step_names.iter().map(|name| (*name, None)).collect();

    let mut protocol = Protocol::<BenchContext>::new("bench", &step_defs);
    for name in &step_names {
      protocol.on(name, |ctx: ContextData<BenchContext>| async move {
        ctx.write().counter += 1;
        Ok(StepControl::Continue)
      });
    }
    let protocol = Arc::new(protocol);

    group.throughput(Throughput::Elements(num_steps as u64));
    group.bench_with_input(BenchmarkId::new("steps", num_steps), &num_steps, |b, _| {
      b.to_async(&rt).iter_batched(
        || ContextData::new(BenchContext::default()),
        |ctx| {
          let p = protocol.clone();
          async move {
            let result = p.run(ctx).await.unwrap();
            assert_eq!(result, ProtocolResult::Completed);
          }
        },
        criterion::BatchSize::SmallInput,
      );
    });
  }
  group.finish();
}

fn bench_cart_operations(c: &mut Criterion) {
  let mut group = c.benchmark_group("CartOperations");
  let rt = Runtime::new().unwrap();

  for cart_size in [1u64, 10, 100] {
    let m = manager(cart_size);
    rt.block_on(async {
      for id in 1..=cart_size {
        m.add_product(ProductId(id)).await;
      }
    });

    // Increments the last entry, so each lookup walks the whole cart.
    group.bench_with_input(BenchmarkId::new("add_existing", cart_size), &cart_size, |b, &size| {
      b.to_async(&rt).iter(|| {
        let m = m.clone();
        async move { m.add_product(ProductId(size)).await }
      });
    });

    group.bench_with_input(BenchmarkId::new("update_amount", cart_size), &cart_size, |b, &size| {
      b.to_async(&rt).iter(|| {
        let m = m.clone();
        async move {
          m.update_product_amount(UpdateProductAmount {
            product_id: ProductId(size),
            amount: 3,
          })
          .await
        }
      });
    });
  }

  group.bench_function("add_then_remove", |b| {
    let m = manager(1);
    b.to_async(&rt).iter(|| {
      let m = m.clone();
      async move {
        m.add_product(ProductId(1)).await;
        m.remove_product(ProductId(1)).await
      }
    });
  });
  group.finish();
}

fn bench_snapshot_read(c: &mut Criterion) {
  let mut group = c.benchmark_group("SnapshotRead");
  let rt = Runtime::new().unwrap();
  let m = manager(50);
  rt.block_on(async {
    for id in 1..=50 {
      m.add_product(ProductId(id)).await;
    }
  });

  group.bench_function("cart", |b| b.iter(|| m.cart()));
  group.bench_function("amounts", |b| b.iter(|| m.cart().amounts()));
  group.finish();
}

criterion_group!(benches, bench_protocol_overhead, bench_cart_operations, bench_snapshot_read);
criterion_main!(benches);
