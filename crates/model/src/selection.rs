//! Interface selection
//!
//! The coordinator is a two-state machine (unselected / selected) that
//! reports every transition as a [`SelectionEvent`] on an unbounded channel.
//! The detail pane consumes those events; nothing reads selection back out of
//! the list view.

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::types::{Interface, InterfaceKey};

/// Current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(InterfaceKey),
}

/// Notification sent to the detail renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// An interface was picked
    Selected(Interface),
    /// Selection was cleared
    Cleared,
}

/// Tracks the single selected interface
pub struct SelectionCoordinator {
    state: Selection,
    events: mpsc::UnboundedSender<SelectionEvent>,
}

/// Create a coordinator and the receiver its events arrive on
pub fn selection_channel() -> (SelectionCoordinator, mpsc::UnboundedReceiver<SelectionEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SelectionCoordinator::new(tx), rx)
}

impl SelectionCoordinator {
    pub fn new(events: mpsc::UnboundedSender<SelectionEvent>) -> Self {
        Self {
            state: Selection::Unselected,
            events,
        }
    }

    pub fn state(&self) -> Selection {
        self.state
    }

    pub fn selected(&self) -> Option<InterfaceKey> {
        match self.state {
            Selection::Selected(key) => Some(key),
            Selection::Unselected => None,
        }
    }

    /// The device list was rebuilt; whatever was selected is gone
    pub fn refresh(&mut self) {
        debug!("Selection cleared by refresh");
        self.clear();
    }

    /// Pick an interface, or `None` to deselect
    pub fn pick(&mut self, iface: Option<&Interface>) {
        match iface {
            Some(iface) => {
                let key = iface.key();
                if self.state == Selection::Selected(key) {
                    trace!("Re-picked {}", key);
                } else {
                    debug!("Selected {}", key);
                }
                self.state = Selection::Selected(key);
                self.emit(SelectionEvent::Selected(iface.clone()));
            }
            None => {
                debug!("Selection cleared");
                self.clear();
            }
        }
    }

    fn clear(&mut self) {
        self.state = Selection::Unselected;
        self.emit(SelectionEvent::Cleared);
    }

    fn emit(&self, event: SelectionEvent) {
        // A dropped receiver only means no detail pane is listening
        if self.events.send(event).is_err() {
            trace!("No detail listener for selection event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_interface(id: u8) -> Interface {
        Interface {
            device_id: 1001,
            id,
            alternate_setting: 0,
            class: 0x03,
            subclass: 0,
            protocol: 0,
            endpoints: Vec::new(),
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<SelectionEvent>) -> Vec<SelectionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_starts_unselected() {
        let (coordinator, mut rx) = selection_channel();
        assert_eq!(coordinator.state(), Selection::Unselected);
        assert!(coordinator.selected().is_none());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_pick_selects_and_notifies() {
        let (mut coordinator, mut rx) = selection_channel();
        let a = make_interface(0);

        coordinator.pick(Some(&a));
        assert_eq!(coordinator.state(), Selection::Selected(a.key()));
        assert_eq!(drain(&mut rx), vec![SelectionEvent::Selected(a)]);
    }

    #[test]
    fn test_pick_other_replaces() {
        let (mut coordinator, mut rx) = selection_channel();
        let a = make_interface(0);
        let b = make_interface(1);

        coordinator.pick(Some(&a));
        coordinator.pick(Some(&b));
        assert_eq!(coordinator.selected(), Some(b.key()));
        assert_eq!(drain(&mut rx).len(), 2);
    }

    #[test]
    fn test_pick_none_clears() {
        let (mut coordinator, mut rx) = selection_channel();
        coordinator.pick(Some(&make_interface(0)));
        coordinator.pick(None);

        assert_eq!(coordinator.state(), Selection::Unselected);
        assert_eq!(drain(&mut rx).last(), Some(&SelectionEvent::Cleared));
    }

    #[test]
    fn test_refresh_always_clears() {
        let (mut coordinator, mut rx) = selection_channel();

        coordinator.refresh();
        assert_eq!(drain(&mut rx), vec![SelectionEvent::Cleared]);

        coordinator.pick(Some(&make_interface(2)));
        coordinator.refresh();
        assert_eq!(coordinator.state(), Selection::Unselected);
        assert_eq!(drain(&mut rx).last(), Some(&SelectionEvent::Cleared));
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (mut coordinator, rx) = selection_channel();
        drop(rx);
        coordinator.pick(Some(&make_interface(0)));
        coordinator.refresh();
        assert_eq!(coordinator.state(), Selection::Unselected);
    }
}
