// rocketcart/src/protocol/mod.rs

//! Defines `Protocol<TData>`, an ordered list of named async steps, and its execution.

pub mod definition;
pub mod execution;

pub use definition::Protocol;
