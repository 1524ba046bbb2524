//! Composite device facade.
//!
//! Owns the descriptor buffers, numbers the interfaces that providers
//! append, and delegates run-time operation to the external stack.
//! All mutation happens during start-up; after [`UsbDevice::begin`] the
//! stack only reads through the [`DescriptorSource`] accessors.

use crate::config;
use crate::descriptor::string::StringDescriptor;
use crate::descriptor::{
    class, ConfigBuffer, ConfigurationHeader, DeviceDescriptor, StringTable, DEVICE_DESCRIPTOR_LEN,
};
use crate::error::Error;
use crate::interface::{SerialInterface, UsbInterface};
use crate::stack::{DescriptorSource, UsbStack};

/// Platform profile, resolved once at start-up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Profile {
    /// Interfaces are added explicitly by the application.
    #[default]
    Manual,
    /// [`UsbDevice::begin`] injects a CDC-ACM serial function, for
    /// targets that expect a console without any application wiring.
    AutoSerial,
}

/// A USB device assembled from interface providers, served by an
/// external stack.
pub struct UsbDevice<S> {
    stack: S,
    profile: Profile,
    device: DeviceDescriptor,
    configuration: ConfigBuffer,
    strings: StringTable,
    itf_count: u8,
    ep_in_count: u8,
    ep_out_count: u8,
}

impl<S: UsbStack> UsbDevice<S> {
    /// A device in the cleared state, owning `stack`.
    pub fn new(stack: S) -> Self {
        Self::with_profile(stack, Profile::Manual)
    }

    pub fn with_profile(stack: S, profile: Profile) -> Self {
        let mut device = Self {
            stack,
            profile,
            device: DeviceDescriptor::default(),
            configuration: ConfigBuffer::new(),
            strings: StringTable::new(),
            itf_count: 0,
            ep_in_count: 1,
            ep_out_count: 1,
        };
        device.clear_configuration();
        device
    }

    // Identity setters

    pub fn set_id(&mut self, vid: u16, pid: u16) {
        self.device.id_vendor = vid;
        self.device.id_product = pid;
    }

    /// Set `bcdUSB`.
    pub fn set_version(&mut self, bcd: u16) {
        self.device.bcd_usb = bcd;
    }

    /// Set `bcdDevice`.
    pub fn set_device_version(&mut self, bcd: u16) {
        self.device.bcd_device = bcd;
    }

    // String table

    pub fn set_language_id(&mut self, language_id: u16) {
        self.strings.set_language_id(language_id);
    }

    pub fn set_manufacturer(&mut self, text: &'static str) {
        self.strings.set_manufacturer(text);
    }

    pub fn set_product(&mut self, text: &'static str) {
        self.strings.set_product(text);
    }

    pub fn set_serial_number(&mut self, text: &'static str) {
        self.strings.set_serial_number(text);
    }

    /// Add a string to the device's descriptor pool.
    ///
    /// Returns the assigned index, or 0 when the table is full or the
    /// input is empty.
    pub fn add_string_descriptor(&mut self, text: &'static str) -> u8 {
        self.strings.add(text)
    }

    // Configuration assembly

    /// Rebind the configuration buffer to caller-supplied storage,
    /// preserving what has been assembled so far. A no-op when the new
    /// buffer is smaller than the bytes already used.
    pub fn set_configuration_buffer(&mut self, buf: &'static mut [u8]) {
        self.configuration.replace_storage(buf);
    }

    /// Reset to the zero state: default device descriptor, a bare
    /// configuration header, the four well-known string slots, and all
    /// interface and endpoint numbering released.
    pub fn clear_configuration(&mut self) {
        self.device = DeviceDescriptor::default();
        self.configuration.reset(&ConfigurationHeader::default());
        self.strings
            .reset(config::USB_LANGUAGE, config::USB_MANUFACTURER, config::USB_PRODUCT);
        self.itf_count = 0;
        self.ep_in_count = 1;
        self.ep_out_count = 1;
    }

    /// Claim the next free IN endpoint address (0x81, 0x82, ...).
    pub fn alloc_endpoint_in(&mut self) -> u8 {
        let n = self.ep_in_count;
        self.ep_in_count += 1;
        crate::descriptor::endpoint::DIR_IN | n
    }

    /// Claim the next free OUT endpoint address (0x01, 0x02, ...).
    pub fn alloc_endpoint_out(&mut self) -> u8 {
        let n = self.ep_out_count;
        self.ep_out_count += 1;
        n
    }

    /// Append `itf`'s descriptor block to the configuration buffer,
    /// numbering its interfaces from the current count, and patch the
    /// header's total length and interface count.
    ///
    /// Returns `false` when the provider reports zero bytes written
    /// (typically: insufficient remaining capacity), leaving the
    /// buffer, length, and count unchanged.
    pub fn add_interface(&mut self, itf: &mut dyn UsbInterface) -> bool {
        let itf_num = self.itf_count;
        let len = itf.descriptor(itf_num, self.configuration.remaining_mut());
        if len == 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("interface {} descriptor did not fit", itf_num);
            return false;
        }

        let count = self.itf_count + itf.interface_count();
        if !self.configuration.commit(len, count) {
            return false;
        }
        self.itf_count = count;
        true
    }

    /// One-time start-up: reset to the zero state, mark the device as
    /// an IAD-capable composite, apply the platform profile, and hand
    /// off to the external stack for the given root-hub port.
    ///
    /// Anything configured earlier is discarded by the reset, so call
    /// this first; setters and `add_interface` follow, before the host
    /// enumerates.
    pub fn begin(&mut self, port: u8) -> Result<(), Error> {
        self.clear_configuration();

        // Functions grouped by interface association descriptors
        // require the miscellaneous/common/IAD triple at device level.
        self.device.device_class = class::MISC;
        self.device.device_sub_class = class::MISC_SUBCLASS_COMMON;
        self.device.device_protocol = class::MISC_PROTOCOL_IAD;

        if self.profile == Profile::AutoSerial {
            let description = self.add_string_descriptor(config::USB_PRODUCT);
            let mut serial = SerialInterface::new(description);
            if !self.add_interface(&mut serial) {
                return Err(Error::BufferOverflow);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("usb device starting on port {}", port);

        self.stack.init(port)
    }

    // Stack delegation

    /// Run one iteration of the external stack's task loop.
    pub fn task(&mut self) {
        self.stack.poll();
    }

    pub fn mounted(&self) -> bool {
        self.stack.mounted()
    }

    pub fn suspended(&self) -> bool {
        self.stack.suspended()
    }

    pub fn ready(&self) -> bool {
        self.stack.ready()
    }

    pub fn remote_wakeup(&mut self) -> bool {
        self.stack.remote_wakeup()
    }

    pub fn attach(&mut self) -> bool {
        self.stack.attach()
    }

    pub fn detach(&mut self) -> bool {
        self.stack.detach()
    }

    /// Number of interfaces appended so far.
    pub fn interface_count(&self) -> u8 {
        self.itf_count
    }

    /// Borrow the wrapped stack.
    pub fn stack(&self) -> &S {
        &self.stack
    }
}

impl<S: UsbStack> DescriptorSource for UsbDevice<S> {
    fn device_descriptor(&self) -> [u8; DEVICE_DESCRIPTOR_LEN] {
        self.device.encode()
    }

    fn configuration_descriptor(&self) -> &[u8] {
        self.configuration.as_bytes()
    }

    fn string_descriptor(&self, index: u8, _langid: u16) -> Option<StringDescriptor> {
        self.strings.descriptor(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::CONFIGURATION_HEADER_LEN;
    use crate::interface::serial::CDC_DESCRIPTOR_LEN;

    /// Test double standing in for the wrapped native stack.
    #[derive(Default)]
    struct FakeStack {
        init_port: Option<u8>,
        polls: usize,
        mounted: bool,
        suspended: bool,
        fail_init: bool,
    }

    impl UsbStack for FakeStack {
        fn init(&mut self, port: u8) -> Result<(), Error> {
            if self.fail_init {
                return Err(Error::StackInit);
            }
            self.init_port = Some(port);
            Ok(())
        }

        fn poll(&mut self) {
            self.polls += 1;
        }

        fn mounted(&self) -> bool {
            self.mounted
        }

        fn suspended(&self) -> bool {
            self.suspended
        }

        fn remote_wakeup(&mut self) -> bool {
            self.mounted
        }

        fn attach(&mut self) -> bool {
            true
        }

        fn detach(&mut self) -> bool {
            true
        }
    }

    /// Provider writing `LEN` marker bytes.
    struct Marker<const LEN: usize>;

    impl<const LEN: usize> UsbInterface for Marker<LEN> {
        fn descriptor(&mut self, itf_num: u8, buf: &mut [u8]) -> usize {
            if buf.len() < LEN {
                return 0;
            }
            buf[..LEN].fill(0xB0 | itf_num);
            LEN
        }
    }

    fn device() -> UsbDevice<FakeStack> {
        UsbDevice::new(FakeStack::default())
    }

    #[test]
    fn cleared_state_has_four_strings_and_bare_header() {
        let dev = device();
        let lang = dev.string_descriptor(0, 0).unwrap();
        assert_eq!(lang.as_bytes(), &[4, 3, 0x09, 0x04]);
        assert!(dev.string_descriptor(3, 0).is_none());
        assert_eq!(dev.configuration_descriptor().len(), CONFIGURATION_HEADER_LEN);
        assert_eq!(dev.interface_count(), 0);
    }

    #[test]
    fn add_interface_updates_length_and_count() {
        let mut dev = device();
        assert!(dev.add_interface(&mut Marker::<16>));

        let cfg = dev.configuration_descriptor();
        assert_eq!(cfg.len(), CONFIGURATION_HEADER_LEN + 16);
        assert_eq!(
            &cfg[2..4],
            &((CONFIGURATION_HEADER_LEN + 16) as u16).to_le_bytes()
        );
        assert_eq!(cfg[4], 1);
        // The provider saw interface number 0.
        assert_eq!(cfg[CONFIGURATION_HEADER_LEN], 0xB0);
    }

    #[test]
    fn failed_add_interface_changes_nothing() {
        let mut dev = device();
        assert!(dev.add_interface(&mut Marker::<16>));
        let before_len = dev.configuration_descriptor().len();

        // Larger than the whole buffer: the provider reports 0.
        assert!(!dev.add_interface(&mut Marker::<{ config::CONFIG_BUFFER_LEN }>));

        let cfg = dev.configuration_descriptor();
        assert_eq!(cfg.len(), before_len);
        assert_eq!(cfg[4], 1);
        assert_eq!(dev.interface_count(), 1);
    }

    #[test]
    fn interfaces_are_numbered_in_call_order() {
        let mut dev = device();
        assert!(dev.add_interface(&mut Marker::<8>));
        assert!(dev.add_interface(&mut Marker::<8>));

        let cfg = dev.configuration_descriptor();
        assert_eq!(cfg[CONFIGURATION_HEADER_LEN], 0xB0);
        assert_eq!(cfg[CONFIGURATION_HEADER_LEN + 8], 0xB1);
        assert_eq!(cfg[4], 2);
    }

    #[test]
    fn multi_interface_provider_advances_numbering() {
        let mut dev = device();
        let mut serial = SerialInterface::new(0);
        assert!(dev.add_interface(&mut serial));
        assert_eq!(dev.interface_count(), 2);

        // The next function is numbered after the serial pair.
        assert!(dev.add_interface(&mut Marker::<8>));
        let cfg = dev.configuration_descriptor();
        assert_eq!(cfg[CONFIGURATION_HEADER_LEN + CDC_DESCRIPTOR_LEN], 0xB2);
        assert_eq!(cfg[4], 3);
    }

    #[test]
    fn begin_forces_iad_class_and_inits_stack() {
        let mut dev = device();
        dev.begin(1).unwrap();

        let desc = dev.device_descriptor();
        assert_eq!(desc[4], class::MISC);
        assert_eq!(desc[5], class::MISC_SUBCLASS_COMMON);
        assert_eq!(desc[6], class::MISC_PROTOCOL_IAD);
        assert_eq!(dev.stack().init_port, Some(1));
    }

    #[test]
    fn begin_propagates_stack_failure() {
        let mut dev = UsbDevice::new(FakeStack {
            fail_init: true,
            ..FakeStack::default()
        });
        assert_eq!(dev.begin(0), Err(Error::StackInit));
    }

    #[test]
    fn begin_resets_prior_configuration() {
        let mut dev = device();
        assert!(dev.add_interface(&mut Marker::<32>));
        dev.set_id(0xFFFF, 0xFFFF);
        dev.begin(0).unwrap();

        assert_eq!(dev.interface_count(), 0);
        assert_eq!(dev.configuration_descriptor().len(), CONFIGURATION_HEADER_LEN);
        let desc = dev.device_descriptor();
        assert_eq!(&desc[8..10], &config::USB_VID.to_le_bytes());
    }

    #[test]
    fn auto_serial_profile_injects_cdc_function() {
        let mut dev = UsbDevice::with_profile(FakeStack::default(), Profile::AutoSerial);
        dev.begin(0).unwrap();

        assert_eq!(dev.interface_count(), 2);
        let cfg = dev.configuration_descriptor();
        assert_eq!(cfg.len(), CONFIGURATION_HEADER_LEN + CDC_DESCRIPTOR_LEN);
        assert_eq!(cfg[4], 2);
        // The serial function's description string landed at index 4.
        assert!(dev.string_descriptor(4, 0).is_some());
    }

    #[test]
    fn endpoint_allocation_is_monotonic_until_cleared() {
        let mut dev = device();
        assert_eq!(dev.alloc_endpoint_in(), 0x81);
        assert_eq!(dev.alloc_endpoint_in(), 0x82);
        assert_eq!(dev.alloc_endpoint_out(), 0x01);

        dev.clear_configuration();
        assert_eq!(dev.alloc_endpoint_in(), 0x81);
        assert_eq!(dev.alloc_endpoint_out(), 0x01);
    }

    #[test]
    fn task_and_state_queries_delegate() {
        let mut dev = UsbDevice::new(FakeStack {
            mounted: true,
            ..FakeStack::default()
        });
        dev.task();
        dev.task();
        assert_eq!(dev.stack().polls, 2);
        assert!(dev.mounted());
        assert!(!dev.suspended());
        assert!(dev.ready());
        assert!(dev.remote_wakeup());
        assert!(dev.attach());
        assert!(dev.detach());
    }

    #[test]
    fn string_langid_parameter_is_ignored() {
        let dev = device();
        assert_eq!(dev.string_descriptor(1, 0x0409), dev.string_descriptor(1, 0x0407));
    }
}
