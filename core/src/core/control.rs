// rocketcart/src/core/control.rs

//! Signals for controlling protocol flow and the outcome of a protocol run.

/// Signal from a step handler indicating whether the protocol should continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Proceed to the next step.
  Continue,
  /// End the protocol now without error. Remaining steps are not run.
  Stop,
}

/// Outcome of a protocol run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolResult {
  /// Every step ran.
  Completed,
  /// A handler returned `StepControl::Stop`.
  Stopped,
}
