//! USB subsystem
//!
//! Enumerates the host's USB devices through libusb and hands them to the
//! presentation model as a [`model::DeviceSource`].

pub mod host;

pub use host::HostUsb;
