//! USB descriptor records and the buffers that hold them.
//!
//! Layouts follow §9.5 and §9.6 of the USB 2.0 specification. All
//! multi-byte fields are little-endian on the wire.

pub mod configuration;
pub mod device;
pub mod string;

pub use configuration::{ConfigBuffer, ConfigurationHeader, CONFIGURATION_HEADER_LEN};
pub use device::{DeviceDescriptor, DEVICE_DESCRIPTOR_LEN};
pub use string::{StringDescriptor, StringEntry, StringIndex, StringTable};

/// Descriptor type codes (USB 2.0 table 9-5, plus the HID class types).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DescriptorType {
    Device = 1,
    Configuration = 2,
    String = 3,
    Interface = 4,
    Endpoint = 5,
    InterfaceAssociation = 0x0B,
    Hid = 0x21,
    HidReport = 0x22,
    ClassSpecificInterface = 0x24,
}

/// Class codes used in the descriptors this crate assembles.
pub mod class {
    /// Class is declared per interface.
    pub const PER_INTERFACE: u8 = 0x00;
    /// Communications and CDC Control.
    pub const CDC: u8 = 0x02;
    /// Human Interface Device.
    pub const HID: u8 = 0x03;
    /// CDC Data.
    pub const CDC_DATA: u8 = 0x0A;
    /// Miscellaneous.
    pub const MISC: u8 = 0xEF;

    /// Common-class subclass, required at device level when interface
    /// association descriptors are in use.
    pub const MISC_SUBCLASS_COMMON: u8 = 0x02;
    /// IAD protocol paired with [`MISC_SUBCLASS_COMMON`].
    pub const MISC_PROTOCOL_IAD: u8 = 0x01;
}

/// Endpoint transfer types (`bmAttributes` bits 1..0).
pub mod endpoint {
    pub const CONTROL: u8 = 0;
    pub const ISOCHRONOUS: u8 = 1;
    pub const BULK: u8 = 2;
    pub const INTERRUPT: u8 = 3;

    /// Direction bit for IN endpoint addresses.
    pub const DIR_IN: u8 = 0x80;
}
