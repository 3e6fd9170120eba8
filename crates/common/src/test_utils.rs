//! Test utilities for usb-device-list
//!
//! Provides a scripted device source and helper functions for building
//! realistic device trees in tests across crates.
//!
//! # Example
//!
//! ```
//! use common::test_utils::{create_mock_device, MockDeviceSource};
//! use model::DeviceSource;
//!
//! let device = create_mock_device(1, 0x1234, 0x5678);
//! assert_eq!(device.vendor_id, 0x1234);
//!
//! let source = MockDeviceSource::fixed(vec![device]);
//! assert_eq!(source.list_devices().len(), 1);
//! ```

use model::{Device, DeviceMap, DeviceSource, Endpoint, Interface};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use tracing::debug;

/// Device name the way a Linux host reports it
pub fn mock_device_name(bus: u8, address: u8) -> String {
    format!("/dev/bus/usb/{:03}/{:03}", bus, address)
}

/// Create a mock Device with no interfaces
///
/// The device sits on bus 1 at address `id % 128`, and its id follows the
/// host convention of `bus * 1000 + address`.
///
/// # Example
/// ```
/// use common::test_utils::create_mock_device;
///
/// let device = create_mock_device(5, 0x1234, 0x5678);
/// assert_eq!(device.name, "/dev/bus/usb/001/005");
/// assert_eq!(device.id, 1005);
/// ```
pub fn create_mock_device(id: u32, vendor_id: u16, product_id: u16) -> Device {
    create_mock_device_with_class(id, vendor_id, product_id, 0x00, 0x00, 0x00)
}

/// Create a mock Device with a specific USB class
pub fn create_mock_device_with_class(
    id: u32,
    vendor_id: u16,
    product_id: u16,
    class: u8,
    subclass: u8,
    protocol: u8,
) -> Device {
    let address = (id % 128) as u8;
    Device {
        id: 1000 + u32::from(address),
        name: mock_device_name(1, address),
        vendor_id,
        product_id,
        class,
        subclass,
        protocol,
        interfaces: Vec::new(),
    }
}

/// Create a mock interface belonging to `device`
pub fn create_mock_interface(
    device: &Device,
    id: u8,
    class: u8,
    subclass: u8,
    protocol: u8,
    endpoints: Vec<Endpoint>,
) -> Interface {
    Interface {
        device_id: device.id,
        id,
        alternate_setting: 0,
        class,
        subclass,
        protocol,
        endpoints,
    }
}

/// Create a mock mass storage device (bulk-only transport)
pub fn create_mock_mass_storage_device(id: u32) -> Device {
    let mut device = create_mock_device(id, 0x0781, 0x5581);
    let iface = create_mock_interface(
        &device,
        0,
        0x08,
        0x06,
        0x50,
        vec![
            Endpoint::new(0x02, 0x02, 0, 512),
            Endpoint::new(0x81, 0x02, 0, 512),
        ],
    );
    device.interfaces.push(iface);
    device
}

/// Create a mock HID device (keyboard and mouse interfaces)
pub fn create_mock_hid_device(id: u32) -> Device {
    let mut device = create_mock_device(id, 0x046d, 0xc52b);
    let mouse = create_mock_interface(
        &device,
        1,
        0x03,
        0x01,
        0x02,
        vec![Endpoint::new(0x82, 0x03, 2, 8)],
    );
    let keyboard = create_mock_interface(
        &device,
        0,
        0x03,
        0x01,
        0x01,
        vec![Endpoint::new(0x81, 0x03, 8, 8)],
    );
    // Reported out of order on purpose; the list sorts them
    device.interfaces.push(mouse);
    device.interfaces.push(keyboard);
    device
}

/// Create a mock hub device
pub fn create_mock_hub_device(id: u32) -> Device {
    let mut device = create_mock_device_with_class(id, 0x05e3, 0x0608, 0x09, 0x00, 0x01);
    let iface = create_mock_interface(
        &device,
        0,
        0x09,
        0x00,
        0x00,
        vec![Endpoint::new(0x81, 0x03, 12, 1)],
    );
    device.interfaces.push(iface);
    device
}

/// Key a list of devices by name
pub fn create_mock_device_map(devices: Vec<Device>) -> DeviceMap {
    devices.into_iter().map(|d| (d.name.clone(), d)).collect()
}

/// Create a map of `count` plain mock devices
///
/// # Example
/// ```
/// use common::test_utils::create_mock_device_list;
///
/// let devices = create_mock_device_list(5);
/// assert_eq!(devices.len(), 5);
/// ```
pub fn create_mock_device_list(count: u32) -> DeviceMap {
    create_mock_device_map(
        (1..=count)
            .map(|i| create_mock_device(i, 0x1000 + (i as u16), 0x2000 + (i as u16)))
            .collect(),
    )
}

/// Device source that replays a script of enumeration results
///
/// Each query returns the next scripted map; once the script runs out the
/// last map is repeated. Useful for simulating devices coming and going
/// between refreshes.
#[derive(Debug, Default)]
pub struct MockDeviceSource {
    script: RefCell<VecDeque<DeviceMap>>,
    last: RefCell<DeviceMap>,
    calls: Cell<usize>,
}

impl MockDeviceSource {
    /// Source that always reports the same devices
    pub fn fixed(devices: Vec<Device>) -> Self {
        Self::scripted(vec![create_mock_device_map(devices)])
    }

    /// Source that reports each map in turn
    pub fn scripted(maps: Vec<DeviceMap>) -> Self {
        Self {
            script: RefCell::new(maps.into()),
            last: RefCell::new(DeviceMap::new()),
            calls: Cell::new(0),
        }
    }

    /// Number of times `list_devices` has been called
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl DeviceSource for MockDeviceSource {
    fn list_devices(&self) -> DeviceMap {
        self.calls.set(self.calls.get() + 1);
        if let Some(next) = self.script.borrow_mut().pop_front() {
            *self.last.borrow_mut() = next;
        }
        let devices = self.last.borrow().clone();
        debug!(
            "Mock enumeration #{} returned {} device(s)",
            self.calls.get(),
            devices.len()
        );
        devices
    }
}
