// rocketcart/src/lib.rs

//! rocketcart: a client-side shopping cart state manager.
//!
//! The cart holds an ordered collection of products with quantities. Every
//! quantity change is validated against a remote stock service, and the
//! resulting cart is persisted to durable key-value storage after each
//! logical change.
//!
//!  - `CartManager` owns the cart and exposes a read-only snapshot plus
//!    `add_product`, `remove_product` and `update_product_amount`.
//!  - Each operation runs as a `Protocol`: named async steps over a lockable
//!    `ContextData`, committed atomically at the end.
//!  - Outcomes are reported through a `NoticeSink`, never as errors the
//!    caller must handle.
//!  - Collaborators are traits: `StockOracle`, `CatalogLookup`, `DurableStorage`.

pub mod config;
pub mod core;
pub mod error;
pub mod manager;
pub mod notice;
pub mod protocol;
pub mod services;
pub mod storage;

// --- Re-exports for the Public API ---

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{ProtocolResult, StepControl};
pub use crate::core::entry::{Cart, CartEntry, CatalogProduct, ProductId};
pub use crate::core::step::Handler;

pub use crate::protocol::Protocol;

pub use crate::manager::outcome::{CartFailure, CartOutcome, UpdateProductAmount};
pub use crate::manager::{CartManager, CartManagerBuilder};

pub use crate::notice::{CollectingNotices, Notice, NoticeKind, NoticeLevel, NoticeSink, TracingNotices};

#[cfg(feature = "http")]
pub use crate::services::HttpApi;
pub use crate::services::{CatalogLookup, InMemoryInventory, Stock, StockOracle};
pub use crate::storage::{DurableStorage, FileStorage, MemoryStorage};

pub use crate::config::CartConfig;
pub use crate::error::{CartError, CartResult};
