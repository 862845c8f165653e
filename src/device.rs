//! Device bring-up.
//!
//! Welcome screen, card mount and MSC registration, in that order. The USB
//! endpoint only comes up once the card is mounted with a usable geometry.

use core::fmt;
use log::{info, warn};

use crate::config::{DeviceConfig, SdPins};
use crate::display::StatusDisplay;
use crate::drivers::storage::medium::{MountError, StorageMedium};
use crate::drivers::storage::sector::SectorAdapter;
use crate::drivers::usb::link::LinkMonitor;
use crate::drivers::usb::mass_storage::MscBridge;
use crate::drivers::usb::{MscTransport, UsbError};
use crate::keyboard::{wait_for_any_key, Keypad};

/// Millisecond sleep provided by the platform.
pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

pub const NO_CARD_MESSAGE: &str = "No SD Card found !";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError<E> {
    Input(E),
    Mount(MountError),
    Usb(UsbError),
}

impl<E> From<MountError> for StartError<E> {
    fn from(err: MountError) -> Self {
        StartError::Mount(err)
    }
}

impl<E> From<UsbError> for StartError<E> {
    fn from(err: UsbError) -> Self {
        StartError::Usb(err)
    }
}

impl<E: fmt::Debug> fmt::Display for StartError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::Input(err) => write!(f, "keyboard error: {:?}", err),
            StartError::Mount(err) => write!(f, "mount failed: {}", err),
            StartError::Usb(err) => write!(f, "usb setup failed: {}", err),
        }
    }
}

/// Poll until the card mounts, showing a message after every miss.
pub fn mount_medium<M, D, Y>(
    medium: &mut M,
    pins: &SdPins,
    display: &mut D,
    delay: &mut Y,
    retry_ms: u32,
    attempts: Option<u32>,
) -> Result<(), MountError>
where
    M: StorageMedium + ?Sized,
    D: StatusDisplay + ?Sized,
    Y: Delay + ?Sized,
{
    let mut failures = 0u32;
    while !medium.mount(pins.chip_select, &pins.bus) {
        failures = failures.saturating_add(1);
        display.show_message(NO_CARD_MESSAGE);
        if attempts.is_some_and(|limit| failures >= limit) {
            return Err(MountError::NoMedium { attempts: failures });
        }
        warn!("no card on cs={} (attempt {}), retrying", pins.chip_select, failures);
        delay.delay_ms(retry_ms);
    }
    Ok(())
}

/// Run the full start-up sequence and return the registered bridge.
pub fn start<M, T, D, K, Y>(
    config: &DeviceConfig,
    mut medium: M,
    transport: &mut T,
    mut display: D,
    keypad: &mut K,
    delay: &mut Y,
) -> Result<MscBridge<M, D>, StartError<K::Error>>
where
    M: StorageMedium,
    T: MscTransport + ?Sized,
    D: StatusDisplay,
    K: Keypad + ?Sized,
    Y: Delay + ?Sized,
{
    display.show_welcome(config.version);
    wait_for_any_key(keypad, delay, config.key_poll_ms).map_err(StartError::Input)?;
    display.clear();

    mount_medium(
        &mut medium,
        &config.pins,
        &mut display,
        delay,
        config.mount_retry_ms,
        config.mount_attempts,
    )?;
    let adapter = SectorAdapter::new(medium)?;

    let mut link = LinkMonitor::new(display);
    link.announce_ready();

    let bridge = MscBridge::register(adapter, link, &config.identity, transport)?;
    info!("usb stick ready");
    Ok(bridge)
}
