//! USB device descriptor (USB 2.0 §9.6.1).
//!
//! Layout (18 bytes):
//! ```text
//! Byte  0: bLength (18)
//! Byte  1: bDescriptorType (1 = Device)
//! Byte  2-3: bcdUSB
//! Byte  4: bDeviceClass
//! Byte  5: bDeviceSubClass
//! Byte  6: bDeviceProtocol
//! Byte  7: bMaxPacketSize0
//! Byte  8-9: idVendor
//! Byte 10-11: idProduct
//! Byte 12-13: bcdDevice
//! Byte 14: iManufacturer
//! Byte 15: iProduct
//! Byte 16: iSerialNumber
//! Byte 17: bNumConfigurations
//! ```

use crate::config;
use crate::descriptor::string::StringIndex;
use crate::descriptor::{class, DescriptorType};

/// Encoded length of a device descriptor.
pub const DEVICE_DESCRIPTOR_LEN: usize = 18;

/// Typed USB device descriptor, serialised on demand with [`encode`].
///
/// [`encode`]: DeviceDescriptor::encode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceDescriptor {
    /// USB release in BCD (0x0200 = USB 2.0).
    pub bcd_usb: u16,
    /// Device class, 0 when declared at interface level.
    pub device_class: u8,
    pub device_sub_class: u8,
    pub device_protocol: u8,
    /// Endpoint 0 max packet size.
    pub max_packet_size_0: u8,
    pub id_vendor: u16,
    pub id_product: u16,
    /// Device release number in BCD.
    pub bcd_device: u16,
    /// String-table index of the manufacturer name.
    pub manufacturer_index: u8,
    /// String-table index of the product name.
    pub product_index: u8,
    /// String-table index of the serial number.
    pub serial_number_index: u8,
    pub num_configurations: u8,
}

impl Default for DeviceDescriptor {
    fn default() -> Self {
        Self {
            bcd_usb: config::USB_BCD,
            device_class: class::PER_INTERFACE,
            device_sub_class: 0,
            device_protocol: 0,
            max_packet_size_0: config::ENDPOINT0_SIZE,
            id_vendor: config::USB_VID,
            id_product: config::USB_PID,
            bcd_device: config::USB_DEVICE_BCD,
            manufacturer_index: StringIndex::Manufacturer as u8,
            product_index: StringIndex::Product as u8,
            serial_number_index: StringIndex::SerialNumber as u8,
            num_configurations: 1,
        }
    }
}

impl DeviceDescriptor {
    /// Serialise into the 18-byte wire format.
    pub fn encode(&self) -> [u8; DEVICE_DESCRIPTOR_LEN] {
        let mut out = [0u8; DEVICE_DESCRIPTOR_LEN];
        out[0] = DEVICE_DESCRIPTOR_LEN as u8;
        out[1] = DescriptorType::Device as u8;
        out[2..4].copy_from_slice(&self.bcd_usb.to_le_bytes());
        out[4] = self.device_class;
        out[5] = self.device_sub_class;
        out[6] = self.device_protocol;
        out[7] = self.max_packet_size_0;
        out[8..10].copy_from_slice(&self.id_vendor.to_le_bytes());
        out[10..12].copy_from_slice(&self.id_product.to_le_bytes());
        out[12..14].copy_from_slice(&self.bcd_device.to_le_bytes());
        out[14] = self.manufacturer_index;
        out[15] = self.product_index;
        out[16] = self.serial_number_index;
        out[17] = self.num_configurations;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_descriptor_layout() {
        let bytes = DeviceDescriptor::default().encode();
        assert_eq!(bytes[0], 18);
        assert_eq!(bytes[1], DescriptorType::Device as u8);
        // bcdUSB 2.0, little-endian.
        assert_eq!(&bytes[2..4], &[0x00, 0x02]);
        assert_eq!(bytes[7], config::ENDPOINT0_SIZE);
        assert_eq!(&bytes[8..10], &config::USB_VID.to_le_bytes());
        assert_eq!(&bytes[10..12], &config::USB_PID.to_le_bytes());
        // Well-known string slots.
        assert_eq!(bytes[14], 1);
        assert_eq!(bytes[15], 2);
        assert_eq!(bytes[16], 3);
        assert_eq!(bytes[17], 1);
    }

    #[test]
    fn field_mutation_is_reflected_in_encoding() {
        let mut desc = DeviceDescriptor::default();
        desc.id_vendor = 0x239A;
        desc.id_product = 0x80F9;
        desc.bcd_usb = 0x0210;

        let bytes = desc.encode();
        assert_eq!(&bytes[2..4], &[0x10, 0x02]);
        assert_eq!(&bytes[8..10], &[0x9A, 0x23]);
        assert_eq!(&bytes[10..12], &[0xF9, 0x80]);
    }
}
