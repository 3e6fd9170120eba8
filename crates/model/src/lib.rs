//! Presentation model for usb-device-list
//!
//! This crate turns a USB device enumeration into sorted, human-readable
//! rows and tracks which interface the user has selected. It has no USB
//! backend of its own: enumeration comes in through [`DeviceSource`].
//!
//! # Example
//!
//! ```
//! use model::{Device, DeviceMap, Snapshot};
//!
//! let mut devices = DeviceMap::new();
//! for name in ["Zeta", "Alpha"] {
//!     devices.insert(
//!         name.to_string(),
//!         Device {
//!             id: 1,
//!             name: name.to_string(),
//!             vendor_id: 0x1d6b,
//!             product_id: 0x0002,
//!             class: 0x09,
//!             subclass: 0,
//!             protocol: 0,
//!             interfaces: Vec::new(),
//!         },
//!     );
//! }
//!
//! let snapshot = Snapshot::build(&devices);
//! assert_eq!(snapshot.groups()[0].device.name, "Alpha");
//! assert_eq!(snapshot.groups()[0].device.vendor_id, "VendorId: 0x1d6b");
//! ```

pub mod detail;
pub mod format;
pub mod presenter;
pub mod selection;
pub mod snapshot;
pub mod source;
pub mod types;

pub use detail::{DetailChange, DetailPane, EndpointListing, EndpointRow};
pub use presenter::DeviceListPresenter;
pub use selection::{Selection, SelectionCoordinator, SelectionEvent, selection_channel};
pub use snapshot::{DeviceGroup, DeviceRow, InterfaceRow, Snapshot};
pub use source::DeviceSource;
pub use types::{Device, DeviceMap, Direction, Endpoint, Interface, InterfaceKey, TransferType};
