pub mod context_data;
pub mod control;
pub mod entry;
pub mod step;

pub use context_data::ContextData;
pub use control::{ProtocolResult, StepControl};
pub use entry::{Cart, CartEntry, CatalogProduct, ProductId};
pub use step::{Handler, SkipCondition, StepDef};
