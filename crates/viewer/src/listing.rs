//! Non-interactive device listing
//!
//! Prints the same rows the TUI shows: every device, its interfaces, and the
//! endpoints of each interface.

use anyhow::{Context, Result};
use model::{EndpointListing, Snapshot};
use std::fmt::{self, Write};

/// Render the snapshot as indented text
pub fn render_text(snapshot: &Snapshot) -> Result<String> {
    let mut out = String::new();
    write_text(&mut out, snapshot).context("Failed to format device list")?;
    Ok(out)
}

fn write_text(out: &mut impl Write, snapshot: &Snapshot) -> fmt::Result {
    if snapshot.is_empty() {
        return writeln!(out, "No USB devices found.");
    }

    writeln!(out, "Found {} USB device(s):\n", snapshot.len())?;
    for group in snapshot.groups() {
        writeln!(out, "{}", group.device)?;
        for row in &group.interfaces {
            writeln!(out, "    {}", row)?;
            for endpoint in EndpointListing::build(&row.interface).rows() {
                writeln!(out, "        {}", endpoint)?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Render the snapshot as pretty-printed JSON
pub fn render_json(snapshot: &Snapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot).context("Failed to serialize device list")
}
