//! Shared value types, errors and pixel math.

/// Canvas and transform value types.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
