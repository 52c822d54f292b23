// rocketcart/src/core/step.rs

//! Defines a single named step of a protocol and the handler type that runs it.

use super::ContextData;
use crate::core::control::StepControl;
use crate::error::CartResult;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a protocol step handler.
///
/// A handler takes a handle to the protocol's `ContextData<TData>` and returns a future
/// resolving to `CartResult<StepControl>`. Handlers must drop lock guards before awaiting.
pub type Handler<TData> =
  Box<dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = CartResult<StepControl>> + Send>> + Send + Sync>;

/// Condition evaluated before a step runs. If it returns true, the step is skipped.
pub type SkipCondition<TData> = Arc<dyn Fn(&ContextData<TData>) -> bool + Send + Sync + 'static>;

/// Definition of a protocol step: its name and optional skip condition.
#[derive(Clone)]
pub struct StepDef<T: 'static + Send + Sync> {
  pub name: String,
  pub skip_if: Option<SkipCondition<T>>,
}

impl<T: 'static + Send + Sync> std::fmt::Debug for StepDef<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}
