//! Build-time device configuration.

use core::fmt;
use heapless::String;

use crate::drivers::storage::medium::SpiBus;

/// SCSI INQUIRY field widths.
pub const VENDOR_ID_LEN: usize = 8;
pub const PRODUCT_ID_LEN: usize = 16;
pub const REVISION_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    FieldTooLong { field: &'static str, max: usize },
    NotAscii { field: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FieldTooLong { field, max } => {
                write!(f, "{} longer than {} characters", field, max)
            }
            ConfigError::NotAscii { field } => write!(f, "{} must be ASCII", field),
        }
    }
}

/// Identification strings reported to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    vendor: String<VENDOR_ID_LEN>,
    product: String<PRODUCT_ID_LEN>,
    revision: String<REVISION_LEN>,
}

impl Identity {
    pub fn new(vendor: &str, product: &str, revision: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            vendor: field("vendor id", vendor)?,
            product: field("product id", product)?,
            revision: field("product revision", revision)?,
        })
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }
}

pub const DEFAULT_VENDOR: &str = "ESP32";
pub const DEFAULT_PRODUCT: &str = "USB_MSC";
pub const DEFAULT_REVISION: &str = "1.0";

const _: () = assert!(
    DEFAULT_VENDOR.len() <= VENDOR_ID_LEN
        && DEFAULT_PRODUCT.len() <= PRODUCT_ID_LEN
        && DEFAULT_REVISION.len() <= REVISION_LEN
);

impl Default for Identity {
    fn default() -> Self {
        // Field widths are checked at compile time above.
        Self {
            vendor: field("vendor id", DEFAULT_VENDOR).unwrap_or_default(),
            product: field("product id", DEFAULT_PRODUCT).unwrap_or_default(),
            revision: field("product revision", DEFAULT_REVISION).unwrap_or_default(),
        }
    }
}

fn field<const N: usize>(name: &'static str, value: &str) -> Result<String<N>, ConfigError> {
    if !value.is_ascii() {
        return Err(ConfigError::NotAscii { field: name });
    }
    let mut out = String::new();
    out.push_str(value)
        .map_err(|_| ConfigError::FieldTooLong { field: name, max: N })?;
    Ok(out)
}

/// Card slot wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdPins {
    pub chip_select: u8,
    pub bus: SpiBus,
}

impl SdPins {
    /// M5Stack Cardputer microSD slot.
    pub const CARDPUTER: SdPins = SdPins {
        chip_select: 12,
        bus: SpiBus { clk: 40, miso: 39, mosi: 14 },
    };
}

#[derive(Debug, Clone)]
pub struct DeviceConfig {
    pub identity: Identity,
    pub pins: SdPins,
    /// Pause between mount attempts.
    pub mount_retry_ms: u32,
    /// `None` keeps polling until a card shows up.
    pub mount_attempts: Option<u32>,
    /// Keyboard polling period on the welcome screen.
    pub key_poll_ms: u32,
    pub version: &'static str,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            identity: Identity::default(),
            pins: SdPins::CARDPUTER,
            mount_retry_ms: 1000,
            mount_attempts: None,
            key_poll_ms: 5,
            version: "Version 0.1 - Geo",
        }
    }
}
