//! Configuration descriptor header and the shared buffer interface
//! providers append into.
//!
//! The buffer always starts with one encoded configuration header
//! (USB 2.0 §9.6.3) followed by the descriptor blocks of each added
//! interface. The header's `wTotalLength` and `bNumInterfaces` fields
//! are re-patched after every successful append so the buffer is
//! servable to the host at any point.

use crate::config;
use crate::descriptor::DescriptorType;

/// Encoded length of a configuration descriptor header.
pub const CONFIGURATION_HEADER_LEN: usize = 9;

/// `bmAttributes` bit 7 is reserved-set for all devices.
const ATTR_BUS_POWERED: u8 = 0x80;
/// `bmAttributes` remote-wakeup capability bit.
const ATTR_REMOTE_WAKEUP: u8 = 0x20;
/// `bmAttributes` self-powered bit.
const ATTR_SELF_POWERED: u8 = 0x40;

/// Typed configuration descriptor header.
///
/// `wTotalLength` and `bNumInterfaces` are owned by [`ConfigBuffer`]
/// and patched there; the encoded header starts with zero interfaces
/// and a total length covering only itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigurationHeader {
    /// `bConfigurationValue` the host selects with SET_CONFIGURATION.
    pub configuration_value: u8,
    /// String-table index describing this configuration, 0 = none.
    pub description_index: u8,
    /// Advertise remote-wakeup capability.
    pub remote_wakeup: bool,
    /// Device draws no bus power.
    pub self_powered: bool,
    /// Maximum power draw in mA (encoded in 2 mA units).
    pub max_power_ma: u16,
}

impl Default for ConfigurationHeader {
    fn default() -> Self {
        Self {
            configuration_value: 1,
            description_index: 0,
            remote_wakeup: true,
            self_powered: false,
            max_power_ma: config::USB_CONFIG_POWER_MA,
        }
    }
}

impl ConfigurationHeader {
    /// Serialise into the 9-byte wire format.
    pub fn encode(&self) -> [u8; CONFIGURATION_HEADER_LEN] {
        let mut attributes = ATTR_BUS_POWERED;
        if self.remote_wakeup {
            attributes |= ATTR_REMOTE_WAKEUP;
        }
        if self.self_powered {
            attributes |= ATTR_SELF_POWERED;
        }

        let mut out = [0u8; CONFIGURATION_HEADER_LEN];
        out[0] = CONFIGURATION_HEADER_LEN as u8;
        out[1] = DescriptorType::Configuration as u8;
        out[2..4].copy_from_slice(&(CONFIGURATION_HEADER_LEN as u16).to_le_bytes());
        out[4] = 0; // bNumInterfaces, patched per append
        out[5] = self.configuration_value;
        out[6] = self.description_index;
        out[7] = attributes;
        out[8] = (self.max_power_ma / 2) as u8;
        out
    }
}

/// Backing storage for the configuration buffer.
enum Storage {
    /// Built-in buffer, enough for a handful of interfaces.
    Inline([u8; config::CONFIG_BUFFER_LEN]),
    /// Caller-supplied static storage for larger composites.
    External(&'static mut [u8]),
}

impl Storage {
    fn bytes(&self) -> &[u8] {
        match self {
            Storage::Inline(buf) => buf,
            Storage::External(buf) => buf,
        }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        match self {
            Storage::Inline(buf) => buf,
            Storage::External(buf) => buf,
        }
    }
}

/// Bounds-checked byte buffer holding one configuration descriptor.
///
/// Invariant: `len() <= capacity()`, and the encoded header's
/// `wTotalLength` always equals `len()` once [`reset`] has run.
///
/// [`reset`]: ConfigBuffer::reset
pub struct ConfigBuffer {
    storage: Storage,
    used: usize,
}

impl ConfigBuffer {
    /// Empty buffer. Not servable until [`reset`] writes a header.
    ///
    /// [`reset`]: ConfigBuffer::reset
    pub fn new() -> Self {
        Self {
            storage: Storage::Inline([0; config::CONFIG_BUFFER_LEN]),
            used: 0,
        }
    }

    /// Discard all appended interfaces and re-write the header.
    pub fn reset(&mut self, header: &ConfigurationHeader) {
        let encoded = header.encode();
        self.storage.bytes_mut()[..CONFIGURATION_HEADER_LEN].copy_from_slice(&encoded);
        self.used = CONFIGURATION_HEADER_LEN;
    }

    /// Bytes currently used, header included.
    pub fn len(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Total capacity of the backing storage.
    pub fn capacity(&self) -> usize {
        self.storage.bytes().len()
    }

    /// The servable descriptor: header plus appended interface blocks.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage.bytes()[..self.used]
    }

    /// Unused tail of the buffer, for an interface provider to
    /// serialise into. Committing the written bytes is a separate step
    /// so a failed append leaves the buffer untouched.
    pub fn remaining_mut(&mut self) -> &mut [u8] {
        let used = self.used;
        &mut self.storage.bytes_mut()[used..]
    }

    /// Commit `len` bytes previously written through [`remaining_mut`]
    /// and patch the header for `num_interfaces` total interfaces.
    ///
    /// Returns `false` (leaving the buffer unchanged) when `len` does
    /// not fit, which only happens if a provider reports more bytes
    /// than the slice it was handed.
    ///
    /// [`remaining_mut`]: ConfigBuffer::remaining_mut
    pub fn commit(&mut self, len: usize, num_interfaces: u8) -> bool {
        if len == 0 || self.used + len > self.capacity() {
            return false;
        }
        self.used += len;

        let total = self.used as u16;
        let buf = self.storage.bytes_mut();
        buf[2..4].copy_from_slice(&total.to_le_bytes());
        buf[4] = num_interfaces;
        true
    }

    /// Rebind to caller-supplied storage, keeping current contents.
    ///
    /// A no-op when the replacement is smaller than the bytes already
    /// used; the existing buffer stays bound.
    pub fn replace_storage(&mut self, buf: &'static mut [u8]) {
        if buf.len() < self.used {
            return;
        }
        buf[..self.used].copy_from_slice(self.as_bytes());
        self.storage = Storage::External(buf);
    }
}

impl Default for ConfigBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> ConfigBuffer {
        let mut buf = ConfigBuffer::new();
        buf.reset(&ConfigurationHeader::default());
        buf
    }

    #[test]
    fn header_layout() {
        let bytes = ConfigurationHeader::default().encode();
        assert_eq!(bytes[0], 9);
        assert_eq!(bytes[1], DescriptorType::Configuration as u8);
        assert_eq!(&bytes[2..4], &[9, 0]);
        assert_eq!(bytes[4], 0);
        assert_eq!(bytes[5], 1);
        // Bus powered + remote wakeup.
        assert_eq!(bytes[7], 0xA0);
        // 100 mA in 2 mA units.
        assert_eq!(bytes[8], 50);
    }

    #[test]
    fn self_powered_attribute_bit() {
        let header = ConfigurationHeader {
            self_powered: true,
            remote_wakeup: false,
            ..ConfigurationHeader::default()
        };
        assert_eq!(header.encode()[7], 0xC0);
    }

    #[test]
    fn reset_yields_just_the_header() {
        let buf = fresh();
        assert_eq!(buf.len(), CONFIGURATION_HEADER_LEN);
        assert_eq!(buf.as_bytes().len(), CONFIGURATION_HEADER_LEN);
        assert_eq!(buf.capacity(), config::CONFIG_BUFFER_LEN);
    }

    #[test]
    fn commit_advances_and_patches_header() {
        let mut buf = fresh();
        let tail = buf.remaining_mut();
        tail[..4].copy_from_slice(&[0xAA; 4]);
        assert!(buf.commit(4, 1));

        assert_eq!(buf.len(), CONFIGURATION_HEADER_LEN + 4);
        let bytes = buf.as_bytes();
        assert_eq!(&bytes[2..4], &[(CONFIGURATION_HEADER_LEN + 4) as u8, 0]);
        assert_eq!(bytes[4], 1);
        assert_eq!(&bytes[9..13], &[0xAA; 4]);
    }

    #[test]
    fn oversized_commit_is_rejected_without_side_effects() {
        let mut buf = fresh();
        let before = buf.len();
        assert!(!buf.commit(buf.capacity(), 1));
        assert_eq!(buf.len(), before);
        assert_eq!(&buf.as_bytes()[2..4], &[9, 0]);
        assert_eq!(buf.as_bytes()[4], 0);
    }

    #[test]
    fn replace_storage_copies_contents() {
        static BIG: static_cell::StaticCell<[u8; 512]> = static_cell::StaticCell::new();

        let mut buf = fresh();
        buf.remaining_mut()[..2].copy_from_slice(&[0x11, 0x22]);
        assert!(buf.commit(2, 1));
        let snapshot: heapless::Vec<u8, 32> = heapless::Vec::from_slice(buf.as_bytes()).unwrap();

        buf.replace_storage(BIG.init([0; 512]));
        assert_eq!(buf.capacity(), 512);
        assert_eq!(buf.as_bytes(), snapshot.as_slice());
    }

    #[test]
    fn undersized_replacement_is_ignored() {
        static SMALL: static_cell::StaticCell<[u8; 4]> = static_cell::StaticCell::new();

        let mut buf = fresh();
        buf.replace_storage(SMALL.init([0; 4]));
        assert_eq!(buf.capacity(), config::CONFIG_BUFFER_LEN);
        assert_eq!(buf.len(), CONFIGURATION_HEADER_LEN);
    }
}
