//! Seams to the external USB device stack.
//!
//! The stack owns enumeration, endpoint scheduling, and transfer state;
//! this crate only hands it descriptor bytes. [`UsbStack`] is what an
//! integration implements over the native stack's entry points;
//! [`DescriptorSource`] is what it wires into the stack's
//! descriptor-request callbacks.

use crate::descriptor::string::StringDescriptor;
use crate::descriptor::DEVICE_DESCRIPTOR_LEN;
use crate::error::Error;

/// Operations the wrapped native USB stack must provide.
///
/// Everything besides [`init`] maps to the stack's task-polling entry
/// point and connection-state queries, and must be safe to call from
/// whatever execution context the stack polls in.
///
/// [`init`]: UsbStack::init
pub trait UsbStack {
    /// One-time stack initialisation for the given root-hub port.
    fn init(&mut self, port: u8) -> Result<(), Error>;

    /// Run one iteration of the stack's event loop.
    fn poll(&mut self);

    /// Host has configured the device.
    fn mounted(&self) -> bool;

    /// Bus is suspended.
    fn suspended(&self) -> bool;

    /// Configured and not suspended.
    fn ready(&self) -> bool {
        self.mounted() && !self.suspended()
    }

    /// Request a remote wakeup. Returns `false` when the host has not
    /// enabled it.
    fn remote_wakeup(&mut self) -> bool;

    /// Connect the bus pull-ups.
    fn attach(&mut self) -> bool;

    /// Disconnect from the bus.
    fn detach(&mut self) -> bool;
}

/// Read-only descriptor queries the stack issues while enumerating.
///
/// Implemented by `UsbDevice`; the buffers behind these accessors are
/// only mutated before the stack starts polling, so the callbacks are
/// safe in interrupt context.
pub trait DescriptorSource {
    /// The 18-byte device descriptor.
    fn device_descriptor(&self) -> [u8; DEVICE_DESCRIPTOR_LEN];

    /// The assembled configuration descriptor, header plus interfaces.
    fn configuration_descriptor(&self) -> &[u8];

    /// The string descriptor for `index`, encoded UTF-16LE. `langid`
    /// is accepted for signature compatibility with stack callbacks
    /// but does not select among translations - only one language
    /// table exists.
    fn string_descriptor(&self, index: u8, langid: u16) -> Option<StringDescriptor>;
}
