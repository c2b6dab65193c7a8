//! Building blocks of the grid state machine.

/// Edit buffer and commit validation.
pub mod edit;
/// Enabled/disabled partition and search predicate.
pub mod filter;
/// Page math and clamping.
pub mod pagination;
/// Id-keyed selection set.
pub mod selection;
/// Backing record array and id index.
pub mod store;
