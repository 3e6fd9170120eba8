//! USB topology types
//!
//! Devices, interfaces and endpoints as reported by a [`DeviceSource`](crate::DeviceSource).
//! The presentation model only reads these values and projects them into rows;
//! it never creates devices of its own.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attached devices keyed by device name
///
/// A `BTreeMap` keeps iteration order deterministic, which in turn keeps the
/// stable name sort in the snapshot builder deterministic for equal names.
pub type DeviceMap = BTreeMap<String, Device>;

/// Endpoint direction, relative to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Device to host
    In,
    /// Host to device
    Out,
}

impl Direction {
    /// Bit 7 of bEndpointAddress
    pub const IN_FLAG: u8 = 0x80;

    /// Derive the direction from an endpoint address
    pub fn from_address(address: u8) -> Self {
        if address & Self::IN_FLAG != 0 {
            Direction::In
        } else {
            Direction::Out
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::format::direction(*self))
    }
}

/// Endpoint transfer type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferType {
    Control,
    Isochronous,
    Bulk,
    Interrupt,
    /// Type code outside the four defined by the USB specification
    Unknown,
}

impl TransferType {
    /// Transfer type bits of bmAttributes
    pub const ATTRIBUTES_MASK: u8 = 0x03;

    /// Map a raw transfer type code
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => TransferType::Control,
            1 => TransferType::Isochronous,
            2 => TransferType::Bulk,
            3 => TransferType::Interrupt,
            _ => TransferType::Unknown,
        }
    }

    /// Extract the transfer type from an endpoint's bmAttributes
    pub fn from_attributes(attributes: u8) -> Self {
        Self::from_code(i64::from(attributes & Self::ATTRIBUTES_MASK))
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::format::transfer_type(*self))
    }
}

/// A USB endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// bEndpointAddress (number plus direction bit)
    pub address: u8,
    /// Endpoint number (low nibble of the address)
    pub number: u8,
    /// bmAttributes bitmask
    pub attributes: u8,
    pub direction: Direction,
    /// bInterval
    pub interval: u8,
    /// wMaxPacketSize
    pub max_packet_size: u16,
    pub transfer_type: TransferType,
}

impl Endpoint {
    /// Endpoint number bits of bEndpointAddress
    pub const NUMBER_MASK: u8 = 0x0f;

    /// Build an endpoint from its raw descriptor fields
    ///
    /// Number, direction and transfer type are derived from the address and
    /// attributes the same way the host stack derives them.
    pub fn new(address: u8, attributes: u8, interval: u8, max_packet_size: u16) -> Self {
        Self {
            address,
            number: address & Self::NUMBER_MASK,
            attributes,
            direction: Direction::from_address(address),
            interval,
            max_packet_size,
            transfer_type: TransferType::from_attributes(attributes),
        }
    }
}

/// Fields that decide whether two interfaces are "the same interface"
///
/// Repeated enumerations produce fresh values, so identity is meaningless;
/// two interfaces are equal when these fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InterfaceKey {
    pub device_id: u32,
    pub interface_id: u8,
    pub alternate_setting: u8,
    pub class: u8,
    pub subclass: u8,
    pub protocol: u8,
}

impl fmt::Display for InterfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "device {} interface {}.{}",
            self.device_id, self.interface_id, self.alternate_setting
        )
    }
}

/// A USB interface (one alternate setting of one interface number)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interface {
    /// Identifier of the owning device
    pub device_id: u32,
    /// bInterfaceNumber
    pub id: u8,
    /// bAlternateSetting
    pub alternate_setting: u8,
    pub class: u8,
    pub subclass: u8,
    pub protocol: u8,
    pub endpoints: Vec<Endpoint>,
}

impl Interface {
    /// Structural identity of this interface
    pub fn key(&self) -> InterfaceKey {
        InterfaceKey {
            device_id: self.device_id,
            interface_id: self.id,
            alternate_setting: self.alternate_setting,
            class: self.class,
            subclass: self.subclass,
            protocol: self.protocol,
        }
    }
}

impl PartialEq for Interface {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Interface {}

/// A USB device attached to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Host-assigned device identifier
    pub id: u32,
    /// Host device name (e.g. `/dev/bus/usb/001/002`)
    pub name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub class: u8,
    pub subclass: u8,
    pub protocol: u8,
    pub interfaces: Vec<Interface>,
}
