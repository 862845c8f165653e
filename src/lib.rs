//! Firmware core that exposes a handheld's SD card to a USB host as a plain
//! mass-storage drive, sector for sector.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod device;
pub mod display;
pub mod drivers;
pub mod graphics;
pub mod keyboard;
pub mod logger;

pub use config::{DeviceConfig, Identity, SdPins};
pub use device::{start, Delay, StartError};
pub use display::{LcdDisplay, StatusDisplay};
pub use drivers::storage::medium::{MountError, SpiBus, StorageMedium};
pub use drivers::storage::sector::{Geometry, IoError, SectorAdapter};
pub use drivers::usb::link::{LinkMonitor, LinkState};
pub use drivers::usb::mass_storage::MscBridge;
pub use drivers::usb::{BlockDevice, MscTransport, UsbEvent, UsbEventSink};
