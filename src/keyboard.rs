use crate::device::Delay;

/// A change on the keyboard matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: u8,
    pub pressed: bool,
}

/// Non-blocking keyboard.
pub trait Keypad {
    type Error;

    /// Returns `WouldBlock` until a key changes state.
    fn poll_key(&mut self) -> nb::Result<KeyEvent, Self::Error>;
}

/// Block until any key is pressed or released, sleeping `poll_ms` between scans.
pub fn wait_for_any_key<K, D>(keypad: &mut K, delay: &mut D, poll_ms: u32) -> Result<KeyEvent, K::Error>
where
    K: Keypad + ?Sized,
    D: Delay + ?Sized,
{
    loop {
        match keypad.poll_key() {
            Ok(event) => return Ok(event),
            Err(nb::Error::WouldBlock) => delay.delay_ms(poll_ms),
            Err(nb::Error::Other(err)) => return Err(err),
        }
    }
}
