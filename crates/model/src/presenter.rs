//! Device list presenter
//!
//! Glue between a [`DeviceSource`], the current [`Snapshot`] and the
//! [`SelectionCoordinator`]. A presentation surface drives it with three
//! triggers (start, refresh, child activation) and reads back the snapshot and
//! per-group expansion state.
//!
//! The source is handed in on [`start`](DeviceListPresenter::start) and handed
//! back on [`stop`](DeviceListPresenter::stop); the presenter never reaches
//! for a global enumeration service.

use tracing::{debug, info};

use crate::selection::SelectionCoordinator;
use crate::snapshot::Snapshot;
use crate::source::DeviceSource;
use crate::types::Interface;

pub struct DeviceListPresenter<S> {
    source: Option<S>,
    snapshot: Snapshot,
    /// Expansion flag per device group, index-aligned with the snapshot
    expanded: Vec<bool>,
    selection: SelectionCoordinator,
}

impl<S: DeviceSource> DeviceListPresenter<S> {
    pub fn new(selection: SelectionCoordinator) -> Self {
        Self {
            source: None,
            snapshot: Snapshot::empty(),
            expanded: Vec::new(),
            selection,
        }
    }

    /// Attach the enumeration source and show the initial device list
    pub fn start(&mut self, source: S) {
        self.source = Some(source);
        info!("Device list started");
        self.refresh();
    }

    /// Detach the enumeration source and drop the shown list
    pub fn stop(&mut self) -> Option<S> {
        self.snapshot = Snapshot::empty();
        self.expanded.clear();
        self.selection.refresh();
        info!("Device list stopped");
        self.source.take()
    }

    pub fn is_started(&self) -> bool {
        self.source.is_some()
    }

    /// Re-query the source, rebuild the snapshot and clear the selection
    ///
    /// Returns `false` when the presenter has not been started.
    pub fn refresh(&mut self) -> bool {
        let Some(source) = self.source.as_ref() else {
            debug!("Refresh ignored: device list not started");
            return false;
        };

        let devices = source.list_devices();
        self.snapshot = Snapshot::build(&devices);
        self.expanded = vec![true; self.snapshot.len()];
        self.selection.refresh();

        info!("Device list refreshed: {} device(s)", self.snapshot.len());
        true
    }

    /// A child row was activated in the list
    ///
    /// A row with a bound interface selects it; anything else (including an
    /// index that does not exist) deselects. Returns whether an interface
    /// was selected.
    pub fn activate_child(&mut self, group: usize, child: usize) -> bool {
        let iface = self.snapshot.interface(group, child);
        self.selection.pick(iface);
        iface.is_some()
    }

    /// Explicitly clear the selection
    pub fn deselect(&mut self) {
        self.selection.pick(None);
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Interface bound to a child row
    pub fn interface(&self, group: usize, child: usize) -> Option<&Interface> {
        self.snapshot.interface(group, child)
    }

    pub fn is_expanded(&self, group: usize) -> bool {
        self.expanded.get(group).copied().unwrap_or(false)
    }

    /// True when every group is expanded (vacuously true for an empty list)
    pub fn all_expanded(&self) -> bool {
        self.expanded.iter().all(|e| *e)
    }

    /// Flip one group between expanded and collapsed
    pub fn toggle_group(&mut self, group: usize) {
        if let Some(flag) = self.expanded.get_mut(group) {
            *flag = !*flag;
        }
    }

    pub fn selection(&self) -> &SelectionCoordinator {
        &self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{Selection, SelectionEvent, selection_channel};
    use crate::types::{Device, DeviceMap};
    use std::cell::Cell;

    /// Source that counts how often it was queried
    struct CountingSource {
        devices: DeviceMap,
        calls: Cell<usize>,
    }

    impl DeviceSource for CountingSource {
        fn list_devices(&self) -> DeviceMap {
            self.calls.set(self.calls.get() + 1);
            self.devices.clone()
        }
    }

    fn make_devices() -> DeviceMap {
        let device = Device {
            id: 1,
            name: "kbd".to_string(),
            vendor_id: 0x046d,
            product_id: 0xc31c,
            class: 0,
            subclass: 0,
            protocol: 0,
            interfaces: vec![Interface {
                device_id: 1,
                id: 0,
                alternate_setting: 0,
                class: 3,
                subclass: 1,
                protocol: 1,
                endpoints: Vec::new(),
            }],
        };
        DeviceMap::from([(device.name.clone(), device)])
    }

    #[test]
    fn test_start_builds_expands_and_clears() {
        let (coordinator, mut rx) = selection_channel();
        let mut presenter = DeviceListPresenter::new(coordinator);
        presenter.start(make_devices());

        assert!(presenter.is_started());
        assert_eq!(presenter.snapshot().len(), 1);
        assert!(presenter.is_expanded(0));
        assert!(presenter.all_expanded());
        assert_eq!(rx.try_recv().ok(), Some(SelectionEvent::Cleared));
    }

    #[test]
    fn test_refresh_requeries_source() {
        let source = CountingSource {
            devices: make_devices(),
            calls: Cell::new(0),
        };
        let (coordinator, _rx) = selection_channel();
        let mut presenter = DeviceListPresenter::new(coordinator);

        presenter.start(&source);
        assert!(presenter.refresh());
        assert_eq!(source.calls.get(), 2);
    }

    #[test]
    fn test_refresh_before_start_is_ignored() {
        let (coordinator, mut rx) = selection_channel();
        let mut presenter: DeviceListPresenter<DeviceMap> = DeviceListPresenter::new(coordinator);
        assert!(!presenter.refresh());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_activate_child_selects() {
        let (coordinator, _rx) = selection_channel();
        let mut presenter = DeviceListPresenter::new(coordinator);
        presenter.start(make_devices());

        assert!(presenter.activate_child(0, 0));
        let key = presenter.interface(0, 0).unwrap().key();
        assert_eq!(presenter.selection().state(), Selection::Selected(key));
    }

    #[test]
    fn test_activate_unbound_child_deselects() {
        let (coordinator, _rx) = selection_channel();
        let mut presenter = DeviceListPresenter::new(coordinator);
        presenter.start(make_devices());

        presenter.activate_child(0, 0);
        assert!(!presenter.activate_child(0, 5));
        assert_eq!(presenter.selection().state(), Selection::Unselected);
    }

    #[test]
    fn test_refresh_clears_selection() {
        let (coordinator, _rx) = selection_channel();
        let mut presenter = DeviceListPresenter::new(coordinator);
        presenter.start(make_devices());

        presenter.activate_child(0, 0);
        presenter.refresh();
        assert_eq!(presenter.selection().state(), Selection::Unselected);
    }

    #[test]
    fn test_toggle_group_and_refresh_reexpands() {
        let (coordinator, _rx) = selection_channel();
        let mut presenter = DeviceListPresenter::new(coordinator);
        presenter.start(make_devices());

        presenter.toggle_group(0);
        assert!(!presenter.is_expanded(0));
        assert!(!presenter.all_expanded());

        presenter.refresh();
        assert!(presenter.is_expanded(0));
    }

    #[test]
    fn test_stop_returns_source_and_empties_list() {
        let (coordinator, _rx) = selection_channel();
        let mut presenter = DeviceListPresenter::new(coordinator);
        presenter.start(make_devices());

        let source = presenter.stop();
        assert!(source.is_some());
        assert!(!presenter.is_started());
        assert!(presenter.snapshot().is_empty());
        assert!(presenter.all_expanded());
    }

    #[test]
    fn test_stop_clears_selection() {
        let (coordinator, mut rx) = selection_channel();
        let mut presenter = DeviceListPresenter::new(coordinator);
        presenter.start(make_devices());
        presenter.activate_child(0, 0);
        while rx.try_recv().is_ok() {}

        assert!(presenter.stop().is_some());
        assert!(presenter.snapshot().is_empty());
        assert_eq!(presenter.selection().state(), Selection::Unselected);
        assert_eq!(rx.try_recv().ok(), Some(SelectionEvent::Cleared));
    }
}
