//! Storage medium collaborator.
//!
//! The medium is the physical card behind the USB drive. It is addressed in
//! whole sectors only; nothing in this crate interprets the bytes.

use core::fmt;

/// SPI wiring used to reach the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiBus {
    pub clk: u8,
    pub miso: u8,
    pub mosi: u8,
}

/// Raw sector access to a removable card.
///
/// Geometry is fixed for the lifetime of a mount; a remount may report
/// different values.
pub trait StorageMedium {
    /// Bring the card up on the given bus. Returns `false` if no card answers.
    fn mount(&mut self, chip_select: u8, bus: &SpiBus) -> bool;

    /// Bytes per sector.
    fn sector_size(&self) -> u32;

    /// Number of addressable sectors.
    fn sector_count(&self) -> u32;

    fn total_bytes(&self) -> u64;

    fn used_bytes(&self) -> u64;

    /// Read one sector into `dest[..sector_size]`.
    fn read_raw(&mut self, dest: &mut [u8], sector: u32) -> bool;

    /// Write `src[..sector_size]` to one sector.
    fn write_raw(&mut self, src: &[u8], sector: u32) -> bool;
}

impl<M: StorageMedium + ?Sized> StorageMedium for &mut M {
    fn mount(&mut self, chip_select: u8, bus: &SpiBus) -> bool {
        (**self).mount(chip_select, bus)
    }

    fn sector_size(&self) -> u32 {
        (**self).sector_size()
    }

    fn sector_count(&self) -> u32 {
        (**self).sector_count()
    }

    fn total_bytes(&self) -> u64 {
        (**self).total_bytes()
    }

    fn used_bytes(&self) -> u64 {
        (**self).used_bytes()
    }

    fn read_raw(&mut self, dest: &mut [u8], sector: u32) -> bool {
        (**self).read_raw(dest, sector)
    }

    fn write_raw(&mut self, src: &[u8], sector: u32) -> bool {
        (**self).write_raw(src, sector)
    }
}

/// Errors raised while bringing the medium up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountError {
    /// No card answered within the allowed number of attempts.
    NoMedium { attempts: u32 },
    /// The card mounted but reported an unusable geometry.
    InvalidGeometry { sector_size: u32, sector_count: u32 },
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::NoMedium { attempts } => {
                write!(f, "no card found after {} attempt(s)", attempts)
            }
            MountError::InvalidGeometry { sector_size, sector_count } => write!(
                f,
                "invalid geometry: {} sectors of {} bytes",
                sector_count, sector_size
            ),
        }
    }
}
