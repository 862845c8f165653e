//! USB device side: the seams between this crate and the platform's USB
//! Mass Storage transport.
//!
//! The transport owns the endpoint, decodes SCSI commands and calls back into
//! a [`BlockDevice`]. It also forwards bus lifecycle events to a
//! [`UsbEventSink`].

pub mod link;
pub mod mass_storage;

use bitflags::bitflags;
use core::fmt;

/// Value a block handler returns to the transport on failure.
pub const TRANSFER_ERROR: i32 = -1;

/// Common USB error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsbError {
    /// The transport could not bring the MSC endpoint up.
    EndpointUnavailable,
    /// `begin` was called with a zero sector size or count.
    InvalidGeometry,
}

impl fmt::Display for UsbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsbError::EndpointUnavailable => write!(f, "MSC endpoint unavailable"),
            UsbError::InvalidGeometry => write!(f, "invalid geometry for MSC endpoint"),
        }
    }
}

/// Bus lifecycle events delivered by the USB stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsbEvent {
    /// Attached to a host and configured.
    Started,
    Stopped,
    Suspended,
    Resumed,
    Other(i32),
}

impl UsbEvent {
    /// Map an event id as numbered by the platform USB stack.
    pub const fn from_raw(id: i32) -> Self {
        match id {
            0 => UsbEvent::Started,
            1 => UsbEvent::Stopped,
            2 => UsbEvent::Suspended,
            3 => UsbEvent::Resumed,
            other => UsbEvent::Other(other),
        }
    }
}

bitflags! {
    /// START and LOEJ bits of a SCSI START STOP UNIT command.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StartStop: u8 {
        const START = 0x01;
        const LOAD_EJECT = 0x02;
    }
}

impl StartStop {
    /// Split byte 4 of a START STOP UNIT CDB into its power condition and flags.
    pub const fn from_cdb(byte: u8) -> (u8, StartStop) {
        (byte >> 4, StartStop::from_bits_truncate(byte))
    }
}

/// Backing store callbacks invoked by the MSC transport.
///
/// Byte counts come straight from the host request. `offset` is the byte
/// offset into the first sector and is always zero for this transport.
pub trait BlockDevice {
    /// Returns the number of bytes read, or [`TRANSFER_ERROR`].
    fn read(&mut self, lba: u32, offset: u32, buffer: &mut [u8], byte_count: u32) -> i32;

    /// Returns the number of bytes written, or [`TRANSFER_ERROR`].
    fn write(&mut self, lba: u32, offset: u32, buffer: &[u8], byte_count: u32) -> i32;

    fn start_stop(&mut self, power_condition: u8, start: bool, load_eject: bool) -> bool;
}

/// Receiver for bus lifecycle events.
pub trait UsbEventSink {
    fn on_event(&mut self, event: UsbEvent);
}

/// Configuration surface of the platform MSC transport.
pub trait MscTransport {
    fn set_vendor_id(&mut self, vendor: &str);
    fn set_product_id(&mut self, product: &str);
    fn set_product_revision(&mut self, revision: &str);
    fn set_media_present(&mut self, present: bool);

    /// Activate the endpoint with the given geometry.
    fn begin(&mut self, sector_count: u32, sector_size: u32) -> Result<(), UsbError>;
}
