//! USB link state tracking.

use log::{info, trace};

use super::{UsbEvent, UsbEventSink};
use crate::display::StatusDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Disconnected,
    Connected,
    Suspended,
}

/// Follows bus lifecycle events and mirrors them on the display.
///
/// This is the only writer of the link state. Each event is handled on its
/// own, so repeating an event only repeats the redraw.
pub struct LinkMonitor<D> {
    state: LinkState,
    display: D,
}

impl<D: StatusDisplay> LinkMonitor<D> {
    pub fn new(display: D) -> Self {
        Self { state: LinkState::Disconnected, display }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Draw the idle screen shown before the host enumerates the device.
    pub fn announce_ready(&mut self) {
        self.display.show_message("USB Stick is ready");
        self.display.show_stick();
        self.display.show_connected(self.state == LinkState::Connected);
    }

    pub fn handle(&mut self, event: UsbEvent) {
        let next = match event {
            UsbEvent::Started => {
                self.display.show_connected(true);
                LinkState::Connected
            }
            UsbEvent::Stopped => {
                self.display.show_connected(false);
                LinkState::Disconnected
            }
            UsbEvent::Suspended => {
                self.display.show_message("USB suspend");
                LinkState::Suspended
            }
            UsbEvent::Resumed => {
                self.display.show_message("USB resume");
                LinkState::Connected
            }
            UsbEvent::Other(id) => {
                trace!("ignoring usb event {}", id);
                return;
            }
        };
        info!("usb link {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

impl<D: StatusDisplay> UsbEventSink for LinkMonitor<D> {
    fn on_event(&mut self, event: UsbEvent) {
        self.handle(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    #[derive(Debug, PartialEq)]
    enum Call {
        Connected(bool),
        Message(String),
        Stick,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl StatusDisplay for Recorder {
        fn show_connected(&mut self, connected: bool) {
            self.calls.push(Call::Connected(connected));
        }

        fn show_message(&mut self, text: &str) {
            self.calls.push(Call::Message(text.to_string()));
        }

        fn show_stick(&mut self) {
            self.calls.push(Call::Stick);
        }
    }

    #[test]
    fn test_starts_disconnected() {
        let monitor = LinkMonitor::new(Recorder::default());
        assert_eq!(monitor.state(), LinkState::Disconnected);
        assert!(monitor.display().calls.is_empty());
    }

    #[test]
    fn test_announce_ready() {
        let mut monitor = LinkMonitor::new(Recorder::default());
        monitor.announce_ready();
        assert_eq!(
            monitor.display().calls,
            [Call::Message("USB Stick is ready".into()), Call::Stick, Call::Connected(false)]
        );
    }

    #[test]
    fn test_transitions() {
        let mut monitor = LinkMonitor::new(Recorder::default());
        monitor.handle(UsbEvent::Started);
        assert_eq!(monitor.state(), LinkState::Connected);
        monitor.handle(UsbEvent::Suspended);
        assert_eq!(monitor.state(), LinkState::Suspended);
        monitor.handle(UsbEvent::Resumed);
        assert_eq!(monitor.state(), LinkState::Connected);
        monitor.handle(UsbEvent::Stopped);
        assert_eq!(monitor.state(), LinkState::Disconnected);
        assert_eq!(
            monitor.display().calls,
            [
                Call::Connected(true),
                Call::Message("USB suspend".into()),
                Call::Message("USB resume".into()),
                Call::Connected(false),
            ]
        );
    }

    #[test]
    fn test_suspend_from_any_state() {
        let mut monitor = LinkMonitor::new(Recorder::default());
        monitor.handle(UsbEvent::Suspended);
        assert_eq!(monitor.state(), LinkState::Suspended);
    }

    #[test]
    fn test_other_events_are_ignored() {
        let mut monitor = LinkMonitor::new(Recorder::default());
        monitor.handle(UsbEvent::Started);
        monitor.on_event(UsbEvent::Other(7));
        assert_eq!(monitor.state(), LinkState::Connected);
        assert_eq!(monitor.display().calls, [Call::Connected(true)]);
    }

    #[test]
    fn test_repeated_attach() {
        let mut monitor = LinkMonitor::new(Recorder::default());
        monitor.handle(UsbEvent::Started);
        monitor.handle(UsbEvent::Started);
        assert_eq!(monitor.state(), LinkState::Connected);
        assert_eq!(monitor.display().calls, [Call::Connected(true), Call::Connected(true)]);
    }
}
