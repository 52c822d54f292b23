// rocketcart/src/protocol/execution.rs

//! Contains `Protocol::run()`, which executes the steps in order.

use crate::core::context_data::ContextData;
use crate::core::control::{ProtocolResult, StepControl};
use crate::error::{CartError, CartResult};
use crate::protocol::definition::Protocol;
use tracing::{event, Instrument, Level};

impl<TData> Protocol<TData>
where
  TData: 'static + Send + Sync,
{
  /// Executes the protocol against `ctx_data`.
  ///
  /// Stops at the first handler returning `StepControl::Stop` or an error.
  pub async fn run(&self, ctx_data: ContextData<TData>) -> CartResult<ProtocolResult> {
    event!(Level::DEBUG, protocol = self.name, num_steps = self.steps.len(), "Protocol execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_cond_fn) = &step_def.skip_if {
        if skip_cond_fn(&ctx_data) {
          event!(Level::DEBUG, protocol = self.name, step_name, "Step skipped due to 'skip_if' condition.");
          continue;
        }
      }

      let handler_fn = self.handlers.get(step_name).ok_or_else(|| {
        event!(Level::ERROR, protocol = self.name, step_name, "Step has no handler.");
        CartError::HandlerMissing {
          step_name: step_def.name.clone(),
        }
      })?;

      let step_span = tracing::debug_span!(
        "protocol_step",
        protocol = self.name,
        step_name,
        step_index = step_idx
      );
      match handler_fn(ctx_data.clone()).instrument(step_span).await {
        Ok(StepControl::Continue) => {}
        Ok(StepControl::Stop) => {
          event!(Level::DEBUG, protocol = self.name, step_name, "Protocol stopped by step.");
          return Ok(ProtocolResult::Stopped);
        }
        Err(e) => {
          event!(Level::DEBUG, protocol = self.name, step_name, error = %e, "Step failed.");
          return Err(e);
        }
      }
    }

    event!(Level::DEBUG, protocol = self.name, "Protocol execution completed.");
    Ok(ProtocolResult::Completed)
  }
}
