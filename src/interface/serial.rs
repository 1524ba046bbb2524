//! CDC-ACM serial function.
//!
//! The block groups a communications interface and a data interface
//! under one interface association descriptor, so the device descriptor
//! must carry the miscellaneous/common/IAD class triple (which
//! `UsbDevice::begin` forces).
//!
//! Block layout (66 bytes):
//! ```text
//! IAD(8) | Comm interface(9) | Header func(5) | Call mgmt func(5) |
//! ACM func(4) | Union func(5) | Notif EP(7) |
//! Data interface(9) | Bulk OUT EP(7) | Bulk IN EP(7)
//! ```

use crate::descriptor::{class, endpoint, DescriptorType};
use crate::interface::UsbInterface;

/// Encoded length of the complete CDC-ACM block.
pub const CDC_DESCRIPTOR_LEN: usize = 66;

/// CDC subclass: Abstract Control Model.
const CDC_SUBCLASS_ACM: u8 = 0x02;

/// Class-specific functional descriptor subtypes (CDC 1.2 §5.2.3).
const CDC_FUNC_HEADER: u8 = 0x00;
const CDC_FUNC_CALL_MANAGEMENT: u8 = 0x01;
const CDC_FUNC_ACM: u8 = 0x02;
const CDC_FUNC_UNION: u8 = 0x06;

/// Notification endpoint max packet size.
const NOTIF_PACKET_SIZE: u8 = 8;
/// Bulk endpoint max packet size (full speed).
const BULK_PACKET_SIZE: u8 = 64;
/// Notification endpoint poll interval in frames.
const NOTIF_INTERVAL: u8 = 16;

/// CDC-ACM serial function provider.
pub struct SerialInterface {
    description_index: u8,
    notif_ep: u8,
    data_out_ep: u8,
    data_in_ep: u8,
}

impl SerialInterface {
    /// Serial function with the conventional endpoint layout
    /// (notification 0x81, data OUT 0x02, data IN 0x83).
    pub const fn new(description_index: u8) -> Self {
        Self {
            description_index,
            notif_ep: 0x81,
            data_out_ep: 0x02,
            data_in_ep: 0x83,
        }
    }

    /// Serial function with explicit endpoint addresses, for composites
    /// where the default addresses are already claimed.
    pub const fn with_endpoints(
        description_index: u8,
        notif_ep: u8,
        data_out_ep: u8,
        data_in_ep: u8,
    ) -> Self {
        Self {
            description_index,
            notif_ep,
            data_out_ep,
            data_in_ep,
        }
    }
}

impl UsbInterface for SerialInterface {
    fn interface_count(&self) -> u8 {
        2
    }

    fn descriptor(&mut self, itf_num: u8, buf: &mut [u8]) -> usize {
        if buf.len() < CDC_DESCRIPTOR_LEN {
            return 0;
        }

        let comm = itf_num;
        let data = itf_num + 1;

        let desc: [u8; CDC_DESCRIPTOR_LEN] = [
            // Interface association: comm + data form one function.
            8,
            DescriptorType::InterfaceAssociation as u8,
            comm,
            2,
            class::CDC,
            CDC_SUBCLASS_ACM,
            0,
            0,
            // Communications interface, one notification endpoint.
            9,
            DescriptorType::Interface as u8,
            comm,
            0,
            1,
            class::CDC,
            CDC_SUBCLASS_ACM,
            0,
            self.description_index,
            // Header functional descriptor, bcdCDC 1.20.
            5,
            DescriptorType::ClassSpecificInterface as u8,
            CDC_FUNC_HEADER,
            0x20,
            0x01,
            // Call management: handled over the data interface.
            5,
            DescriptorType::ClassSpecificInterface as u8,
            CDC_FUNC_CALL_MANAGEMENT,
            0x00,
            data,
            // ACM: line coding and serial state supported.
            4,
            DescriptorType::ClassSpecificInterface as u8,
            CDC_FUNC_ACM,
            0x02,
            // Union: comm interface controls the data interface.
            5,
            DescriptorType::ClassSpecificInterface as u8,
            CDC_FUNC_UNION,
            comm,
            data,
            // Notification endpoint (interrupt IN).
            7,
            DescriptorType::Endpoint as u8,
            self.notif_ep,
            endpoint::INTERRUPT,
            NOTIF_PACKET_SIZE,
            0,
            NOTIF_INTERVAL,
            // Data interface, two bulk endpoints.
            9,
            DescriptorType::Interface as u8,
            data,
            0,
            2,
            class::CDC_DATA,
            0,
            0,
            0,
            // Bulk OUT.
            7,
            DescriptorType::Endpoint as u8,
            self.data_out_ep,
            endpoint::BULK,
            BULK_PACKET_SIZE,
            0,
            0,
            // Bulk IN.
            7,
            DescriptorType::Endpoint as u8,
            self.data_in_ep,
            endpoint::BULK,
            BULK_PACKET_SIZE,
            0,
            0,
        ];

        buf[..CDC_DESCRIPTOR_LEN].copy_from_slice(&desc);
        CDC_DESCRIPTOR_LEN
    }
}
