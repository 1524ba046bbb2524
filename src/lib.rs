//! Composite USB device assembly for embedded targets.
//!
//! This crate owns the descriptor byte buffers a USB device reports
//! during enumeration - the device descriptor, the configuration
//! descriptor, and the string descriptor table - and hands them to an
//! external USB device stack through a small trait seam. Interface
//! providers append their own descriptor blocks into the shared
//! configuration buffer; the stack reads the finished buffers through
//! read-only accessors while it services the bus.
//!
//! All descriptor mutation happens during start-up. After
//! [`UsbDevice::begin`] the stack's descriptor callbacks only read,
//! which keeps them safe to invoke from interrupt or poll context
//! without locking.
//!
//! Enumeration, endpoint scheduling, and transfer state machines are
//! the wrapped stack's business; this crate only assembles the bytes
//! the stack serves.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod descriptor;
pub mod device;
pub mod error;
pub mod interface;
pub mod stack;

pub use device::{Profile, UsbDevice};
pub use error::Error;
pub use interface::UsbInterface;
pub use stack::{DescriptorSource, UsbStack};
