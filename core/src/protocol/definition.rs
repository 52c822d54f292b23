// rocketcart/src/protocol/definition.rs

//! Contains the `Protocol<TData>` struct and the methods used to assemble it.

use crate::core::context_data::ContextData;
use crate::core::control::StepControl;
use crate::core::step::{Handler, SkipCondition, StepDef};
use crate::error::CartResult;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// An ordered list of named steps executed against a shared `ContextData<TData>`.
///
/// Every step must have a handler registered with [`Protocol::on`] before the
/// protocol is run; a step without one fails the run with `CartError::HandlerMissing`.
pub struct Protocol<TData>
where
  TData: 'static + Send + Sync,
{
  pub(crate) name: &'static str,
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) handlers: HashMap<String, Handler<TData>>,
}

impl<TData> Protocol<TData>
where
  TData: 'static + Send + Sync,
{
  /// Creates a protocol from `(step_name, skip_if)` pairs.
  pub fn new(name: &'static str, step_defs: &[(&str, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(step_name, skip_if)| StepDef {
        name: (*step_name).to_string(),
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      name,
      steps,
      handlers: HashMap::new(),
    }
  }

  /// Panics if the step is unknown; a typo in a step name is a programming error.
  fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "rocketcart setup error: Step '{}' not found in protocol '{}'.",
        step_name, self.name
      );
    }
  }

  /// Registers the handler for `step_name`, replacing any previous one.
  pub fn on<F>(&mut self, step_name: &str, handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = CartResult<StepControl>> + Send + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler: Handler<TData> = Box::new(move |ctx_data| {
      let step_fut: Pin<Box<dyn Future<Output = CartResult<StepControl>> + Send>> = Box::pin(handler_fn(ctx_data));
      step_fut
    });
    self.handlers.insert(step_name.to_string(), handler);
  }
}
