//! Device enumeration seam

use crate::types::DeviceMap;

/// Something that can report the devices currently attached
///
/// Enumeration is a single synchronous query. An empty map means nothing is
/// attached (or nothing could be read); it is not an error.
pub trait DeviceSource {
    fn list_devices(&self) -> DeviceMap;
}

/// A fixed device set; every query returns the same devices
impl DeviceSource for DeviceMap {
    fn list_devices(&self) -> DeviceMap {
        self.clone()
    }
}

impl<S: DeviceSource + ?Sized> DeviceSource for &S {
    fn list_devices(&self) -> DeviceMap {
        (**self).list_devices()
    }
}

impl<S: DeviceSource + ?Sized> DeviceSource for Box<S> {
    fn list_devices(&self) -> DeviceMap {
        (**self).list_devices()
    }
}
