//! HID function with a single interrupt IN endpoint.
//!
//! Block layout (25 bytes):
//! ```text
//! Interface(9) | HID class descriptor(9) | Interrupt IN EP(7)
//! ```
//! The HID class descriptor announces one report descriptor; the host
//! fetches the report descriptor itself through a separate GET_DESCRIPTOR
//! request served by the external stack.

use crate::descriptor::{class, endpoint, DescriptorType};
use crate::interface::UsbInterface;

/// Encoded length of the HID function block.
pub const HID_DESCRIPTOR_LEN: usize = 25;

/// HID class release in BCD (1.11).
const HID_BCD: u16 = 0x0111;

/// `bInterfaceProtocol` values for boot-protocol functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BootProtocol {
    None = 0,
    Keyboard = 1,
    Mouse = 2,
}

/// HID function provider.
pub struct HidInterface {
    report_descriptor: &'static [u8],
    description_index: u8,
    in_ep: u8,
    packet_size: u8,
    poll_ms: u8,
    boot_protocol: BootProtocol,
}

impl HidInterface {
    /// HID function serving the given report descriptor on an
    /// interrupt IN endpoint, polled every 10 ms.
    pub const fn new(report_descriptor: &'static [u8], in_ep: u8) -> Self {
        Self {
            report_descriptor,
            description_index: 0,
            in_ep,
            packet_size: 8,
            poll_ms: 10,
            boot_protocol: BootProtocol::None,
        }
    }

    /// Boot-protocol keyboard with the standard report layout.
    pub const fn keyboard(in_ep: u8) -> Self {
        let mut itf = Self::new(KEYBOARD_REPORT_DESCRIPTOR, in_ep);
        itf.boot_protocol = BootProtocol::Keyboard;
        itf
    }

    /// Attach a string-table index describing this function.
    pub const fn with_description(mut self, index: u8) -> Self {
        self.description_index = index;
        self
    }

    /// Override the interrupt endpoint poll interval.
    pub const fn with_poll_ms(mut self, poll_ms: u8) -> Self {
        self.poll_ms = poll_ms;
        self
    }
}

impl UsbInterface for HidInterface {
    fn descriptor(&mut self, itf_num: u8, buf: &mut [u8]) -> usize {
        if buf.len() < HID_DESCRIPTOR_LEN {
            return 0;
        }

        let subclass: u8 = match self.boot_protocol {
            BootProtocol::None => 0,
            // Boot-capable interfaces use the boot subclass.
            _ => 1,
        };
        let report_len = (self.report_descriptor.len() as u16).to_le_bytes();
        let hid_bcd = HID_BCD.to_le_bytes();

        let desc: [u8; HID_DESCRIPTOR_LEN] = [
            // Interface, one interrupt IN endpoint.
            9,
            DescriptorType::Interface as u8,
            itf_num,
            0,
            1,
            class::HID,
            subclass,
            self.boot_protocol as u8,
            self.description_index,
            // HID class descriptor announcing one report descriptor.
            9,
            DescriptorType::Hid as u8,
            hid_bcd[0],
            hid_bcd[1],
            0,
            1,
            DescriptorType::HidReport as u8,
            report_len[0],
            report_len[1],
            // Interrupt IN endpoint.
            7,
            DescriptorType::Endpoint as u8,
            self.in_ep,
            endpoint::INTERRUPT,
            self.packet_size,
            0,
            self.poll_ms,
        ];

        buf[..HID_DESCRIPTOR_LEN].copy_from_slice(&desc);
        HID_DESCRIPTOR_LEN
    }
}

/// Report descriptor for a standard boot-protocol keyboard:
/// 8 modifier bits, 1 reserved byte, 5 LED outputs, 6 key codes.
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    //
    //   - Modifier keys (8 bits) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Reserved byte -
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant) - padding
    //
    //   - LED output (5 bits + 3 padding) -
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant) - padding
    //
    //   - Key codes (6 bytes) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xFF, //   Usage Maximum (255)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x00, //   Input (Data, Array)
    //
    0xC0, // End Collection
];
