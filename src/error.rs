//! Unified error type for usbd-compose.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` under the `defmt` feature for efficient
//! on-target logging.

/// Top-level error type used across the crate.
///
/// Descriptor bookkeeping reports failure through sentinel returns
/// (`0` / `false`); `Error` surfaces only where the external stack is
/// involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// External stack initialisation failed.
    StackInit,

    /// The external stack rejected an operation after start-up.
    Stack,

    /// Buffer too small for the requested operation.
    BufferOverflow,
}
