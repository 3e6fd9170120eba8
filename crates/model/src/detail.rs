//! Endpoint detail
//!
//! [`EndpointListing`] is the detail view for one interface: one row per
//! endpoint, ordered by endpoint number. [`DetailPane`] owns the listing that
//! is currently shown and decides, for each selection event, whether to
//! remove it, replace it, or leave it alone.

use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc;
use tracing::debug;

use crate::format;
use crate::selection::SelectionEvent;
use crate::types::{Endpoint, Interface, InterfaceKey};

/// Display strings for one endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointRow {
    pub address: String,
    pub number: String,
    pub attributes: String,
    pub direction: String,
    pub interval: String,
    pub max_packet_size: String,
    pub transfer_type: String,
}

impl EndpointRow {
    pub fn from_endpoint(endpoint: &Endpoint) -> Self {
        Self {
            address: format!("Address: {}", format::decimal(endpoint.address)),
            number: format!("Endpoint Number: {}", format::decimal(endpoint.number)),
            attributes: format!("Attributes: {}", format::decimal(endpoint.attributes)),
            direction: format!("Direction: {}", format::direction(endpoint.direction)),
            interval: format!("Interval: {}", format::decimal(endpoint.interval)),
            max_packet_size: format!(
                "MaxPacketSize: {}",
                format::decimal(endpoint.max_packet_size)
            ),
            transfer_type: format!("Type: {}", format::transfer_type(endpoint.transfer_type)),
        }
    }
}

impl fmt::Display for EndpointRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {} / {} / {} / {} / {}",
            self.address,
            self.number,
            self.attributes,
            self.direction,
            self.interval,
            self.max_packet_size,
            self.transfer_type
        )
    }
}

/// Endpoint rows for one interface, sorted by endpoint number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointListing {
    interface: InterfaceKey,
    rows: Vec<EndpointRow>,
}

impl EndpointListing {
    pub fn build(interface: &Interface) -> Self {
        let mut endpoints: Vec<&Endpoint> = interface.endpoints.iter().collect();
        endpoints.sort_by_key(|ep| ep.number);

        Self {
            interface: interface.key(),
            rows: endpoints.into_iter().map(EndpointRow::from_endpoint).collect(),
        }
    }

    /// Interface this listing was built for
    pub fn interface(&self) -> InterfaceKey {
        self.interface
    }

    pub fn rows(&self) -> &[EndpointRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What a selection event did to the detail pane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailChange {
    /// The shown listing was removed
    Removed,
    /// A new listing replaced whatever was shown
    Replaced,
    /// Nothing changed
    Unchanged,
}

/// Detail presentation state
///
/// Replacement is debounced by interface equality: re-selecting the interface
/// already shown keeps the current listing (and its scroll position).
#[derive(Debug, Default)]
pub struct DetailPane {
    target: Option<Interface>,
    listing: Option<EndpointListing>,
    /// Bumped on every replacement; lets callers tell listings apart
    generation: u64,
}

impl DetailPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a newly selected interface (or `None` for no selection)
    pub fn show(&mut self, iface: Option<&Interface>) -> DetailChange {
        match iface {
            None => {
                if self.listing.is_none() {
                    return DetailChange::Unchanged;
                }
                self.target = None;
                self.listing = None;
                debug!("Detail view removed");
                DetailChange::Removed
            }
            Some(iface) if self.target.as_ref() != Some(iface) => {
                self.listing = Some(EndpointListing::build(iface));
                self.target = Some(iface.clone());
                self.generation += 1;
                debug!(
                    "Detail view replaced with {} ({} endpoint(s))",
                    iface.key(),
                    iface.endpoints.len()
                );
                DetailChange::Replaced
            }
            Some(_) => DetailChange::Unchanged,
        }
    }

    /// Apply one selection event
    pub fn apply(&mut self, event: &SelectionEvent) -> DetailChange {
        match event {
            SelectionEvent::Selected(iface) => self.show(Some(iface)),
            SelectionEvent::Cleared => self.show(None),
        }
    }

    /// Apply every pending selection event, in order
    pub fn sync(&mut self, rx: &mut mpsc::UnboundedReceiver<SelectionEvent>) -> Vec<DetailChange> {
        let mut changes = Vec::new();
        while let Ok(event) = rx.try_recv() {
            changes.push(self.apply(&event));
        }
        changes
    }

    /// Interface whose endpoints are currently shown
    pub fn target(&self) -> Option<&Interface> {
        self.target.as_ref()
    }

    pub fn listing(&self) -> Option<&EndpointListing> {
        self.listing.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransferType;

    fn make_interface(id: u8, endpoints: Vec<Endpoint>) -> Interface {
        Interface {
            device_id: 2001,
            id,
            alternate_setting: 0,
            class: 0x08,
            subclass: 0x06,
            protocol: 0x50,
            endpoints,
        }
    }

    #[test]
    fn test_endpoint_row_strings() {
        let row = EndpointRow::from_endpoint(&Endpoint::new(0x81, 0x02, 0, 512));
        assert_eq!(row.address, "Address: 129");
        assert_eq!(row.number, "Endpoint Number: 1");
        assert_eq!(row.attributes, "Attributes: 2");
        assert_eq!(row.direction, "Direction: IN");
        assert_eq!(row.interval, "Interval: 0");
        assert_eq!(row.max_packet_size, "MaxPacketSize: 512");
        assert_eq!(row.transfer_type, "Type: Bulk");
    }

    #[test]
    fn test_unknown_transfer_type_row() {
        let mut ep = Endpoint::new(0x01, 0x02, 0, 64);
        ep.transfer_type = TransferType::from_code(9);
        let row = EndpointRow::from_endpoint(&ep);
        assert_eq!(row.transfer_type, "Type: Unknown");
        assert_eq!(row.direction, "Direction: OUT");
    }

    #[test]
    fn test_listing_sorted_by_number() {
        let iface = make_interface(
            0,
            vec![
                Endpoint::new(0x83, 0x03, 10, 8),
                Endpoint::new(0x01, 0x02, 0, 512),
                Endpoint::new(0x82, 0x02, 0, 512),
            ],
        );
        let listing = EndpointListing::build(&iface);
        let numbers: Vec<&str> = listing.rows().iter().map(|r| r.number.as_str()).collect();
        assert_eq!(
            numbers,
            vec!["Endpoint Number: 1", "Endpoint Number: 2", "Endpoint Number: 3"]
        );
        assert_eq!(listing.interface(), iface.key());
    }

    #[test]
    fn test_listing_without_endpoints() {
        let listing = EndpointListing::build(&make_interface(0, Vec::new()));
        assert!(listing.is_empty());
    }

    #[test]
    fn test_show_same_interface_is_debounced() {
        let mut pane = DetailPane::new();
        let a = make_interface(0, vec![Endpoint::new(0x81, 0x02, 0, 512)]);

        assert_eq!(pane.show(Some(&a)), DetailChange::Replaced);
        let generation = pane.generation();

        // A fresh enumeration of the same interface is still the same interface
        let a_again = a.clone();
        assert_eq!(pane.show(Some(&a_again)), DetailChange::Unchanged);
        assert_eq!(pane.generation(), generation);
        assert_eq!(pane.target(), Some(&a));
    }

    #[test]
    fn test_show_different_interface_replaces() {
        let mut pane = DetailPane::new();
        let a = make_interface(0, Vec::new());
        let b = make_interface(1, vec![Endpoint::new(0x02, 0x02, 0, 64)]);

        pane.show(Some(&a));
        assert_eq!(pane.show(Some(&b)), DetailChange::Replaced);
        assert_eq!(pane.target(), Some(&b));
        assert_eq!(pane.listing().unwrap().rows().len(), 1);
    }

    #[test]
    fn test_show_none_removes_once() {
        let mut pane = DetailPane::new();
        assert_eq!(pane.show(None), DetailChange::Unchanged);

        pane.show(Some(&make_interface(0, Vec::new())));
        assert_eq!(pane.show(None), DetailChange::Removed);
        assert!(pane.listing().is_none());
        assert!(pane.target().is_none());
        assert_eq!(pane.show(None), DetailChange::Unchanged);
    }

    #[test]
    fn test_sync_drains_events_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let a = make_interface(0, Vec::new());
        let b = make_interface(1, Vec::new());

        tx.send(SelectionEvent::Selected(a.clone())).unwrap();
        tx.send(SelectionEvent::Selected(a)).unwrap();
        tx.send(SelectionEvent::Selected(b)).unwrap();
        tx.send(SelectionEvent::Cleared).unwrap();

        let mut pane = DetailPane::new();
        assert_eq!(
            pane.sync(&mut rx),
            vec![
                DetailChange::Replaced,
                DetailChange::Unchanged,
                DetailChange::Replaced,
                DetailChange::Removed,
            ]
        );
        assert!(pane.sync(&mut rx).is_empty());
    }
}
