//! Common utilities for usb-device-list
//!
//! This crate provides the shared error type, logging setup, and test
//! fixtures used by the viewer and by integration tests.

pub mod error;
pub mod logging;
pub mod test_utils;

pub use error::{Error, Result};
pub use logging::setup_logging;
