//! Topology snapshots
//!
//! A [`Snapshot`] is the sorted, nested view model built from one enumeration
//! result: device groups ordered by name, each holding its interface rows
//! ordered by interface number. A snapshot never changes after it is built;
//! refreshing the list builds a new one.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::format;
use crate::types::{Device, DeviceMap, Interface};

/// Display strings for one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRow {
    pub name: String,
    pub id: String,
    pub class: String,
    pub vendor_id: String,
    pub product_id: String,
}

impl DeviceRow {
    pub fn from_device(device: &Device) -> Self {
        Self {
            name: device.name.clone(),
            id: format!("Id: {}", format::decimal(device.id)),
            class: format!(
                "Class: {}",
                format::device_class(device.class, device.subclass, device.protocol)
            ),
            vendor_id: format!("VendorId: {}", format::hex4(device.vendor_id)),
            product_id: format!("ProductId: {}", format::hex4(device.product_id)),
        }
    }
}

impl fmt::Display for DeviceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {} / {}",
            self.name, self.id, self.class, self.vendor_id, self.product_id
        )
    }
}

/// Display strings for one interface, plus the interface they came from
///
/// The interface is kept so a click on the row can be turned back into a
/// selection, and so rows can be sorted by the numeric interface id rather
/// than by its display string.
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceRow {
    pub id: String,
    pub class: String,
    pub subclass: String,
    pub protocol: String,
    pub interface: Interface,
}

impl InterfaceRow {
    pub fn from_interface(interface: &Interface) -> Self {
        Self {
            id: format!("Id: {}", format::decimal(interface.id)),
            class: format!("Class: {}", format::decimal(interface.class)),
            subclass: format!("Subclass: {}", format::decimal(interface.subclass)),
            protocol: format!("Protocol: {}", format::decimal(interface.protocol)),
            interface: interface.clone(),
        }
    }
}

// `Interface` equality is the selection key only; rows also compare endpoints
impl PartialEq for InterfaceRow {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.class == other.class
            && self.subclass == other.subclass
            && self.protocol == other.protocol
            && self.interface.key() == other.interface.key()
            && self.interface.endpoints == other.interface.endpoints
    }
}

impl Eq for InterfaceRow {}

impl fmt::Display for InterfaceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {}",
            self.id, self.class, self.subclass, self.protocol
        )
    }
}

/// A device row together with its own interface rows
///
/// Keeping both in one record means sorting devices can never separate a
/// device from its interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceGroup {
    pub device: DeviceRow,
    pub interfaces: Vec<InterfaceRow>,
}

impl DeviceGroup {
    fn build(device: &Device) -> Self {
        let mut interfaces: Vec<InterfaceRow> = device
            .interfaces
            .iter()
            .map(InterfaceRow::from_interface)
            .collect();
        // Stable: alternate settings of one interface keep enumeration order
        interfaces.sort_by_key(|row| row.interface.id);

        Self {
            device: DeviceRow::from_device(device),
            interfaces,
        }
    }
}

/// Immutable, sorted view of the attached devices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    groups: Vec<DeviceGroup>,
}

impl Snapshot {
    /// Build a snapshot from the current device mapping
    pub fn build(devices: &DeviceMap) -> Self {
        let mut groups: Vec<DeviceGroup> = devices.values().map(DeviceGroup::build).collect();
        groups.sort_by(|a, b| a.device.name.cmp(&b.device.name));

        debug!(
            "Built snapshot: {} device(s), {} interface(s)",
            groups.len(),
            groups.iter().map(|g| g.interfaces.len()).sum::<usize>()
        );

        Self { groups }
    }

    /// Empty snapshot (nothing attached, or the list is stopped)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[DeviceGroup] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&DeviceGroup> {
        self.groups.get(index)
    }

    /// Interface bound to a child row, if both indices are in range
    pub fn interface(&self, group: usize, child: usize) -> Option<&Interface> {
        self.groups
            .get(group)
            .and_then(|g| g.interfaces.get(child))
            .map(|row| &row.interface)
    }

    /// Number of device groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
