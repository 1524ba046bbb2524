//! Interface providers - anything that can contribute a descriptor
//! block to the shared configuration buffer.
//!
//! A provider serialises its complete function (interface descriptors,
//! class descriptors, endpoints) into the buffer tail the device hands
//! it. Providers follow the crate-wide convention that a serialiser
//! returns the number of bytes written and 0 on failure.

pub mod hid;
pub mod serial;

pub use hid::HidInterface;
pub use serial::SerialInterface;

/// A USB function that can append its descriptor block to the
/// configuration descriptor.
pub trait UsbInterface {
    /// Number of consecutive interface numbers this function claims.
    /// Single-interface functions keep the default.
    fn interface_count(&self) -> u8 {
        1
    }

    /// Serialise the function's descriptor block into `buf`, numbering
    /// its first interface `itf_num`. Returns the bytes written, or 0
    /// when the block does not fit in `buf`.
    fn descriptor(&mut self, itf_num: u8, buf: &mut [u8]) -> usize;
}
