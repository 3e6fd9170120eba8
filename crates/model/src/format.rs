//! Field formatting
//!
//! Pure, total functions turning descriptor fields into display strings.
//! Values that cannot be represented degrade to [`INVALID`] or [`UNKNOWN`]
//! instead of failing.

use crate::types::{Direction, TransferType};

/// Marker for numbers outside the range a hex field can hold
pub const INVALID: &str = "invalid";

/// Marker for class codes and transfer types with no known name
pub const UNKNOWN: &str = "Unknown";

/// Standard USB class codes and their display names
///
/// See <https://www.usb.org/defined-class-codes>.
const CLASS_NAMES: &[(u8, &str)] = &[
    (0x00, "Periferal"),
    (0x01, "Audio"),
    (0x02, "Comm"),
    (0x03, "HID"),
    (0x05, "PID"),
    (0x06, "Image"),
    (0x07, "Printer"),
    (0x08, "MassStorage"),
    (0x09, "Hub"),
    (0x0a, "CDC-Data"),
    (0x0b, "SmartCard"),
    (0x0d, "ContentSec"),
    (0x0e, "VideoCamera"),
    (0x0f, "PersonalHealthcare"),
    (0xdc, "DiagnosticDevice"),
    (0xe0, "Wireless"),
    (0xef, "Misc"),
    (0xfe, "AppSpec"),
    (0xff, "VendorSpec"),
];

/// Format a byte as `0x` plus two lowercase hex digits
///
/// ```
/// assert_eq!(model::format::hex2(8), "0x08");
/// assert_eq!(model::format::hex2(256), "invalid");
/// ```
pub fn hex2(value: impl Into<i64>) -> String {
    let value: i64 = value.into();
    match u8::try_from(value) {
        Ok(byte) => format!("0x{:02x}", byte),
        Err(_) => INVALID.to_string(),
    }
}

/// Format a halfword as `0x` plus four lowercase hex digits
///
/// ```
/// assert_eq!(model::format::hex4(0x1d6b), "0x1d6b");
/// assert_eq!(model::format::hex4(2), "0x0002");
/// assert_eq!(model::format::hex4(-1), "invalid");
/// ```
pub fn hex4(value: impl Into<i64>) -> String {
    let value: i64 = value.into();
    match u16::try_from(value) {
        Ok(half) => format!("0x{:04x}", half),
        Err(_) => INVALID.to_string(),
    }
}

/// Plain base-10 rendering for fields shown without transformation
pub fn decimal(value: impl Into<i64>) -> String {
    let value: i64 = value.into();
    value.to_string()
}

/// Human-readable name of a USB class code
pub fn class_name(code: impl Into<i64>) -> &'static str {
    let code: i64 = code.into();
    CLASS_NAMES
        .iter()
        .find(|(c, _)| i64::from(*c) == code)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN)
}

/// Device class line: `<Name>(<class>, <subclass>, <protocol>)`
pub fn device_class(
    class: impl Into<i64>,
    subclass: impl Into<i64>,
    protocol: impl Into<i64>,
) -> String {
    let class: i64 = class.into();
    format!(
        "{}({}, {}, {})",
        class_name(class),
        hex2(class),
        hex2(subclass),
        hex2(protocol)
    )
}

pub fn direction(direction: Direction) -> &'static str {
    match direction {
        Direction::In => "IN",
        Direction::Out => "OUT",
    }
}

pub fn transfer_type(transfer_type: TransferType) -> &'static str {
    match transfer_type {
        TransferType::Control => "Control",
        TransferType::Isochronous => "Isochronous",
        TransferType::Bulk => "Bulk",
        TransferType::Interrupt => "Interrupt",
        TransferType::Unknown => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex2_all_bytes() {
        for value in 0..=255i64 {
            let s = hex2(value);
            assert_eq!(s.len(), 4, "{}", s);
            assert!(s.starts_with("0x"));
            assert_eq!(i64::from_str_radix(&s[2..], 16).unwrap(), value);
            assert_eq!(s, s.to_lowercase());
        }
    }

    #[test]
    fn test_hex2_out_of_range() {
        assert_eq!(hex2(256), INVALID);
        assert_eq!(hex2(-1), INVALID);
        assert_eq!(hex2(i64::MAX), INVALID);
        assert_eq!(hex2(i64::MIN), INVALID);
    }

    #[test]
    fn test_hex2_padding() {
        assert_eq!(hex2(0u8), "0x00");
        assert_eq!(hex2(0x0eu8), "0x0e");
        assert_eq!(hex2(0xffu8), "0xff");
    }

    #[test]
    fn test_hex4_padding() {
        assert_eq!(hex4(0u16), "0x0000");
        assert_eq!(hex4(0xfu16), "0x000f");
        assert_eq!(hex4(0xabcu16), "0x0abc");
        assert_eq!(hex4(0x1d6bu16), "0x1d6b");
        assert_eq!(hex4(0xffffu16), "0xffff");
    }

    #[test]
    fn test_hex4_all_halfwords() {
        for value in 0..=65535i64 {
            let s = hex4(value);
            assert_eq!(s.len(), 6, "{}", s);
            assert!(s.starts_with("0x"));
            assert_eq!(i64::from_str_radix(&s[2..], 16).unwrap(), value);
            assert_eq!(s, s.to_lowercase());
        }
    }

    #[test]
    fn test_hex4_out_of_range() {
        assert_eq!(hex4(0x10000), INVALID);
        assert_eq!(hex4(-1), INVALID);
    }

    #[test]
    fn test_class_names() {
        assert_eq!(class_name(0x00), "Periferal");
        assert_eq!(class_name(0x03), "HID");
        assert_eq!(class_name(0x08), "MassStorage");
        assert_eq!(class_name(0x0e), "VideoCamera");
        assert_eq!(class_name(0x0f), "PersonalHealthcare");
        assert_eq!(class_name(0xdc), "DiagnosticDevice");
        assert_eq!(class_name(0xff), "VendorSpec");
    }

    #[test]
    fn test_class_name_unknown() {
        let known: Vec<i64> = CLASS_NAMES.iter().map(|(c, _)| i64::from(*c)).collect();
        for code in 0..=255i64 {
            if !known.contains(&code) {
                assert_eq!(class_name(code), UNKNOWN, "code {:#x}", code);
            }
        }
        assert_eq!(class_name(0x04), UNKNOWN);
        assert_eq!(class_name(0x100), UNKNOWN);
        assert_eq!(class_name(-1), UNKNOWN);
    }

    #[test]
    fn test_device_class() {
        assert_eq!(device_class(0x0eu8, 0x01u8, 0x00u8), "VideoCamera(0x0e, 0x01, 0x00)");
        assert_eq!(device_class(0x09u8, 0u8, 3u8), "Hub(0x09, 0x00, 0x03)");
        assert_eq!(device_class(0x42, 0x100, 1), "Unknown(0x42, invalid, 0x01)");
    }

    #[test]
    fn test_direction_and_type_labels() {
        assert_eq!(direction(Direction::In), "IN");
        assert_eq!(direction(Direction::Out), "OUT");
        assert_eq!(transfer_type(TransferType::Bulk), "Bulk");
        assert_eq!(transfer_type(TransferType::from_code(7)), "Unknown");
    }

    #[test]
    fn test_decimal() {
        assert_eq!(decimal(0u8), "0");
        assert_eq!(decimal(1002u32), "1002");
        assert_eq!(decimal(512u16), "512");
    }
}
