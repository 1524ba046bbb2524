//! String descriptor table and UTF-16 encoding.
//!
//! USB string descriptors are UTF-16LE. The table stores narrow
//! `&'static str` references and widens them only when the host asks;
//! index 0 is the language-ID sentinel required by USB 2.0 §9.6.7.

use heapless::Vec;

use crate::config;
use crate::descriptor::DescriptorType;

/// Encoded size of the largest servable string descriptor:
/// 2 header bytes plus [`config::MAX_STRING_UNITS`] UTF-16 code units.
pub const MAX_STRING_DESCRIPTOR_LEN: usize = 2 + 2 * config::MAX_STRING_UNITS;

/// Well-known string-table slots, fixed by the device descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StringIndex {
    /// Language-ID sentinel, always index 0.
    Language = 0,
    Manufacturer = 1,
    Product = 2,
    SerialNumber = 3,
}

/// One occupied slot in the string table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StringEntry {
    /// The supported-language table (single language).
    LanguageId(u16),
    /// Narrow text, widened to UTF-16 at lookup time.
    Text(&'static str),
}

/// An encoded string descriptor ready to hand to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringDescriptor {
    bytes: Vec<u8, MAX_STRING_DESCRIPTOR_LEN>,
}

impl StringDescriptor {
    /// Wire bytes: `bLength`, type, UTF-16LE payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn from_language_id(language_id: u16) -> Self {
        let mut bytes = Vec::new();
        let _ = bytes.push(4);
        let _ = bytes.push(DescriptorType::String as u8);
        let _ = bytes.extend_from_slice(&language_id.to_le_bytes());
        Self { bytes }
    }

    fn from_text(text: &str) -> Self {
        let mut bytes = Vec::new();
        let _ = bytes.push(0);
        let _ = bytes.push(DescriptorType::String as u8);
        for unit in text.encode_utf16().take(config::MAX_STRING_UNITS) {
            let _ = bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes[0] = bytes.len() as u8;
        Self { bytes }
    }
}

/// Fixed-capacity table mapping descriptor indices to entries.
///
/// Indices are assigned in call order and stay stable for the session.
/// The serial-number slot may be unoccupied (`None`) while still
/// reserving its index, matching a device that reports no serial.
pub struct StringTable {
    entries: Vec<Option<StringEntry>, { config::MAX_STRING_DESCRIPTORS }>,
}

impl StringTable {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Reset to the four well-known slots: language sentinel,
    /// manufacturer, product, and an empty serial slot.
    pub fn reset(&mut self, language_id: u16, manufacturer: &'static str, product: &'static str) {
        self.entries.clear();
        let _ = self.entries.push(Some(StringEntry::LanguageId(language_id)));
        let _ = self.entries.push(Some(StringEntry::Text(manufacturer)));
        let _ = self.entries.push(Some(StringEntry::Text(product)));
        let _ = self.entries.push(None);
    }

    /// Number of assigned indices, unoccupied slots included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn set(&mut self, index: StringIndex, entry: StringEntry) {
        if let Some(slot) = self.entries.get_mut(index as usize) {
            *slot = Some(entry);
        }
    }

    pub fn set_language_id(&mut self, language_id: u16) {
        self.set(StringIndex::Language, StringEntry::LanguageId(language_id));
    }

    pub fn set_manufacturer(&mut self, text: &'static str) {
        self.set(StringIndex::Manufacturer, StringEntry::Text(text));
    }

    pub fn set_product(&mut self, text: &'static str) {
        self.set(StringIndex::Product, StringEntry::Text(text));
    }

    pub fn set_serial_number(&mut self, text: &'static str) {
        self.set(StringIndex::SerialNumber, StringEntry::Text(text));
    }

    /// Append a string at the next free index.
    ///
    /// Returns the assigned index, or 0 (the sentinel slot, never valid
    /// for text) when the table is full or the input is empty.
    pub fn add(&mut self, text: &'static str) -> u8 {
        if text.is_empty() {
            return 0;
        }
        let index = self.entries.len();
        if self.entries.push(Some(StringEntry::Text(text))).is_err() {
            return 0;
        }
        index as u8
    }

    /// Encode the descriptor for `index`, or `None` for unknown or
    /// unoccupied indices.
    pub fn descriptor(&self, index: u8) -> Option<StringDescriptor> {
        let entry = self.entries.get(index as usize)?.as_ref()?;
        Some(match entry {
            StringEntry::LanguageId(id) => StringDescriptor::from_language_id(*id),
            StringEntry::Text(text) => StringDescriptor::from_text(text),
        })
    }
}

impl Default for StringTable {
    fn default() -> Self {
        Self::new()
    }
}
