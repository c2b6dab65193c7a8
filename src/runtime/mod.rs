//! Single-writer async runtime wrapping a grid controller.

/// Handle and command loop implementation.
pub mod handle;
