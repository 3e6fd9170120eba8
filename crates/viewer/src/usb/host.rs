//! Host USB enumeration
//!
//! [`HostUsb`] reads the device tree through libusb and converts it into the
//! presentation model's [`Device`] / [`Interface`] / [`Endpoint`] values.
//! Descriptors are read from the kernel's cache; no device is opened.

use common::{Error, Result};
use model::{Device, DeviceMap, DeviceSource, Endpoint, Interface};
use rusb::{ConfigDescriptor, Context, EndpointDescriptor, SyncType, TransferType, UsageType, UsbContext};
use tracing::{debug, warn};

/// Linux Foundation vendor ID, used by the root hubs of every host controller
const ROOT_HUB_VENDOR_ID: u16 = 0x1d6b;

/// USB hub class code
const HUB_CLASS: u8 = 0x09;

/// libusb-backed device source
pub struct HostUsb {
    context: Context,
    /// Device filters (VID:PID patterns)
    allowed_filters: Vec<String>,
    skip_root_hubs: bool,
}

impl HostUsb {
    /// Create a new host enumeration service
    pub fn new(allowed_filters: Vec<String>, skip_root_hubs: bool) -> Result<Self> {
        let context = Context::new()
            .map_err(|e| Error::Usb(format!("Failed to create libusb context: {}", e)))?;

        debug!(
            "libusb context ready ({} filter(s), skip_root_hubs={})",
            allowed_filters.len(),
            skip_root_hubs
        );

        Ok(Self {
            context,
            allowed_filters,
            skip_root_hubs,
        })
    }

    /// Enumerate all currently connected USB devices
    pub fn try_list_devices(&self) -> Result<DeviceMap> {
        let devices = self
            .context
            .devices()
            .map_err(|e| Error::Usb(format!("Failed to list devices: {}", e)))?;

        let mut map = DeviceMap::new();
        for device in devices.iter() {
            match self.read_device(&device) {
                Ok(Some(dev)) => {
                    map.insert(dev.name.clone(), dev);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        "Failed to read device bus={} addr={}: {}",
                        device.bus_number(),
                        device.address(),
                        e
                    );
                }
            }
        }

        debug!("Enumerated {} devices", map.len());
        Ok(map)
    }

    /// Convert one libusb device, or `None` if it is filtered out
    fn read_device(&self, device: &rusb::Device<Context>) -> rusb::Result<Option<Device>> {
        let desc = device.device_descriptor()?;
        let bus = device.bus_number();
        let address = device.address();

        if !check_filter(desc.vendor_id(), desc.product_id(), &self.allowed_filters) {
            debug!(
                "Device ignored by filter: bus={}, addr={}, vid={:#x}, pid={:#x}",
                bus,
                address,
                desc.vendor_id(),
                desc.product_id()
            );
            return Ok(None);
        }

        if self.skip_root_hubs && is_root_hub(desc.vendor_id(), desc.class_code()) {
            debug!("Skipping root hub: bus={}, addr={}", bus, address);
            return Ok(None);
        }

        let id = device_id(bus, address);
        let interfaces = match read_config(device) {
            Some(config) => interfaces_from_config(id, &config),
            None => Vec::new(),
        };

        Ok(Some(Device {
            id,
            name: device_name(bus, address),
            vendor_id: desc.vendor_id(),
            product_id: desc.product_id(),
            class: desc.class_code(),
            subclass: desc.sub_class_code(),
            protocol: desc.protocol_code(),
            interfaces,
        }))
    }
}

impl DeviceSource for HostUsb {
    fn list_devices(&self) -> DeviceMap {
        match self.try_list_devices() {
            Ok(devices) => devices,
            Err(e) => {
                warn!("{}, showing no devices", e);
                DeviceMap::new()
            }
        }
    }
}

/// Device node path, as the kernel names it under usbfs
pub fn device_name(bus: u8, address: u8) -> String {
    format!("/dev/bus/usb/{:03}/{:03}", bus, address)
}

/// Numeric device identifier derived from its bus position
pub fn device_id(bus: u8, address: u8) -> u32 {
    u32::from(bus) * 1000 + u32::from(address)
}

fn is_root_hub(vendor_id: u16, class: u8) -> bool {
    vendor_id == ROOT_HUB_VENDOR_ID && class == HUB_CLASS
}

/// Active configuration, falling back to the first one for unconfigured devices
fn read_config(device: &rusb::Device<Context>) -> Option<ConfigDescriptor> {
    match device.active_config_descriptor() {
        Ok(config) => Some(config),
        Err(e) => {
            debug!(
                "No active configuration on bus={} addr={} ({}), trying config 0",
                device.bus_number(),
                device.address(),
                e
            );
            device.config_descriptor(0).ok()
        }
    }
}

/// One interface per alternate setting, in descriptor order
fn interfaces_from_config(device_id: u32, config: &ConfigDescriptor) -> Vec<Interface> {
    let mut interfaces = Vec::new();
    for interface in config.interfaces() {
        for desc in interface.descriptors() {
            let endpoints = desc
                .endpoint_descriptors()
                .map(|ep| endpoint_from_descriptor(&ep))
                .collect();

            interfaces.push(Interface {
                device_id,
                id: desc.interface_number(),
                alternate_setting: desc.setting_number(),
                class: desc.class_code(),
                subclass: desc.sub_class_code(),
                protocol: desc.protocol_code(),
                endpoints,
            });
        }
    }
    interfaces
}

fn endpoint_from_descriptor(ep: &EndpointDescriptor) -> Endpoint {
    let attributes = encode_attributes(ep.transfer_type(), ep.sync_type(), ep.usage_type());
    Endpoint::new(ep.address(), attributes, ep.interval(), ep.max_packet_size())
}

/// Reassemble bmAttributes from the fields libusb decodes it into
fn encode_attributes(transfer: TransferType, sync: SyncType, usage: UsageType) -> u8 {
    let transfer = match transfer {
        TransferType::Control => 0,
        TransferType::Isochronous => 1,
        TransferType::Bulk => 2,
        TransferType::Interrupt => 3,
    };
    let sync = match sync {
        SyncType::NoSync => 0,
        SyncType::Asynchronous => 1,
        SyncType::Adaptive => 2,
        SyncType::Synchronous => 3,
    };
    let usage = match usage {
        UsageType::Data => 0,
        UsageType::Feedback => 1,
        UsageType::FeedbackData => 2,
        UsageType::Reserved => 3,
    };
    transfer | (sync << 2) | (usage << 4)
}

/// Check if a VID/PID pair is allowed by the filters
fn check_filter(vid: u16, pid: u16, filters: &[String]) -> bool {
    // If no filters are defined, all devices are allowed
    if filters.is_empty() {
        return true;
    }

    filters.iter().any(|filter| {
        // Filters are validated by the config loader
        let Some((filter_vid, filter_pid)) = filter.split_once(':') else {
            return false;
        };
        matches_id(filter_vid, vid) && matches_id(filter_pid, pid)
    })
}

fn matches_id(pattern: &str, id: u16) -> bool {
    if pattern == "*" {
        return true;
    }
    let hex = pattern.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(hex, 16)
        .map(|v| v == id)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_name_and_id() {
        assert_eq!(device_name(1, 2), "/dev/bus/usb/001/002");
        assert_eq!(device_name(12, 127), "/dev/bus/usb/012/127");
        assert_eq!(device_id(1, 2), 1002);
        assert_eq!(device_id(3, 45), 3045);
    }

    #[test]
    fn test_is_root_hub() {
        assert!(is_root_hub(0x1d6b, 0x09));
        assert!(!is_root_hub(0x1d6b, 0x00));
        assert!(!is_root_hub(0x05e3, 0x09));
    }

    #[test]
    fn test_encode_attributes() {
        assert_eq!(
            encode_attributes(TransferType::Bulk, SyncType::NoSync, UsageType::Data),
            0x02
        );
        assert_eq!(
            encode_attributes(TransferType::Interrupt, SyncType::NoSync, UsageType::Data),
            0x03
        );
        assert_eq!(
            encode_attributes(
                TransferType::Isochronous,
                SyncType::Asynchronous,
                UsageType::Feedback
            ),
            0x15
        );
        assert_eq!(
            encode_attributes(
                TransferType::Isochronous,
                SyncType::Synchronous,
                UsageType::Reserved
            ),
            0x3d
        );
    }

    #[test]
    fn test_encoded_attributes_round_trip_type() {
        let attrs = encode_attributes(TransferType::Isochronous, SyncType::Adaptive, UsageType::Data);
        assert_eq!(
            model::TransferType::from_attributes(attrs),
            model::TransferType::Isochronous
        );
    }

    #[test]
    fn test_check_filter_empty_allows_all() {
        assert!(check_filter(0x1234, 0x5678, &[]));
    }

    #[test]
    fn test_check_filter_patterns() {
        let filters = vec!["0x046d:*".to_string(), "0x1d6b:0x0002".to_string()];
        assert!(check_filter(0x046d, 0xc52b, &filters));
        assert!(check_filter(0x1d6b, 0x0002, &filters));
        assert!(!check_filter(0x1d6b, 0x0003, &filters));
        assert!(!check_filter(0x0781, 0x5581, &filters));
    }

    #[test]
    fn test_check_filter_wildcards() {
        let filters = vec!["*:0x0002".to_string()];
        assert!(check_filter(0x1d6b, 0x0002, &filters));
        assert!(!check_filter(0x1d6b, 0x0003, &filters));

        let filters = vec!["*:*".to_string()];
        assert!(check_filter(0xffff, 0xffff, &filters));
    }

    #[test]
    fn test_check_filter_malformed_never_matches() {
        let filters = vec!["garbage".to_string()];
        assert!(!check_filter(0x1234, 0x5678, &filters));
    }
}
