//! Compile-time defaults for the assembled device.
//!
//! Every value here seeds [`clear_configuration`]; all of them can be
//! replaced at runtime through the `UsbDevice` setters before the host
//! enumerates.
//!
//! [`clear_configuration`]: crate::UsbDevice::clear_configuration

// Identity

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0001;

/// Default device strings.
pub const USB_MANUFACTURER: &str = "usbd-compose";
pub const USB_PRODUCT: &str = "Composite USB Device";

/// Default string-descriptor language: US English.
pub const USB_LANGUAGE: u16 = 0x0409;

/// USB release reported in `bcdUSB` (2.0).
pub const USB_BCD: u16 = 0x0200;

/// Device release number reported in `bcdDevice`.
pub const USB_DEVICE_BCD: u16 = 0x0100;

// Descriptor sizing

/// Endpoint 0 max packet size.
pub const ENDPOINT0_SIZE: u8 = 64;

/// Configuration power draw in mA (encoded on the wire in 2 mA units).
pub const USB_CONFIG_POWER_MA: u16 = 100;

/// Capacity of the built-in configuration descriptor buffer. A larger
/// static buffer can be supplied with `set_configuration_buffer` when a
/// composite needs more room.
pub const CONFIG_BUFFER_LEN: usize = 256;

/// String descriptor table capacity, including the four well-known slots
/// (language, manufacturer, product, serial number).
pub const MAX_STRING_DESCRIPTORS: usize = 12;

/// Maximum UTF-16 code units in one encoded string descriptor.
pub const MAX_STRING_UNITS: usize = 31;
