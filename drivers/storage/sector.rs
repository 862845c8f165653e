//! Sector I/O adapter.
//!
//! Turns byte-sized block requests coming from the USB side into whole-sector
//! transfers on the medium. Requests always start at a sector boundary; any
//! trailing partial sector in the byte count is dropped, not rejected.

use core::fmt;
use log::info;

use super::medium::{MountError, StorageMedium};

/// Medium geometry captured at mount time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub sector_size: u32,
    pub sector_count: u32,
}

impl Geometry {
    pub fn capacity(&self) -> u64 {
        self.sector_size as u64 * self.sector_count as u64
    }
}

/// Errors returned for a single block request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoError {
    /// The medium reports a zero sector size.
    DiskError,
    ReadFailure { sector: u64 },
    WriteFailure { sector: u64 },
    /// The write is larger than the free space reported by the medium.
    OutOfSpace { requested: u32, available: u64 },
    /// The caller's buffer cannot hold the whole transfer.
    BufferTooSmall { needed: usize, len: usize },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoError::DiskError => write!(f, "disk error: sector size is zero"),
            IoError::ReadFailure { sector } => write!(f, "read failed at sector {}", sector),
            IoError::WriteFailure { sector } => write!(f, "write failed at sector {}", sector),
            IoError::OutOfSpace { requested, available } => write!(
                f,
                "out of space: {} bytes requested, {} available",
                requested, available
            ),
            IoError::BufferTooSmall { needed, len } => {
                write!(f, "buffer too small: {} bytes needed, {} given", needed, len)
            }
        }
    }
}

/// Raw sector access on a mounted medium.
pub struct SectorAdapter<M> {
    medium: M,
    geometry: Geometry,
}

impl<M: StorageMedium> SectorAdapter<M> {
    /// Take a freshly mounted medium and capture its geometry.
    ///
    /// Fails if either the sector size or the sector count is zero; the
    /// bridge must not register on such a medium.
    pub fn new(medium: M) -> Result<Self, MountError> {
        let geometry = Geometry {
            sector_size: medium.sector_size(),
            sector_count: medium.sector_count(),
        };
        if geometry.sector_size == 0 || geometry.sector_count == 0 {
            return Err(MountError::InvalidGeometry {
                sector_size: geometry.sector_size,
                sector_count: geometry.sector_count,
            });
        }
        info!(
            "medium mounted: {} sectors of {} bytes ({} bytes)",
            geometry.sector_count,
            geometry.sector_size,
            geometry.capacity()
        );
        Ok(Self { medium, geometry })
    }

    /// Geometry as seen at mount time.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Free space as currently reported by the medium.
    pub fn free_bytes(&self) -> u64 {
        self.medium.total_bytes().saturating_sub(self.medium.used_bytes())
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    /// Read `byte_count / sector_size` sectors starting at `lba` into `buffer`.
    ///
    /// Returns the number of bytes transferred. Stops at the first sector
    /// that fails.
    pub fn read_sectors(
        &mut self,
        lba: u32,
        buffer: &mut [u8],
        byte_count: u32,
    ) -> Result<u32, IoError> {
        let (size, count) = self.plan(buffer.len(), byte_count)?;

        for (i, chunk) in buffer[..size * count].chunks_exact_mut(size).enumerate() {
            let sector = lba as u64 + i as u64;
            let ok = u32::try_from(sector)
                .map(|sector| self.medium.read_raw(chunk, sector))
                .unwrap_or(false);
            if !ok {
                return Err(IoError::ReadFailure { sector });
            }
        }
        Ok((size * count) as u32)
    }

    /// Write `byte_count / sector_size` sectors from `buffer` starting at `lba`.
    ///
    /// The whole request is refused up front if `byte_count` exceeds the free
    /// space reported by the medium. That check is advisory: it is not
    /// repeated while sectors are written. A failing sector aborts the request
    /// and leaves the sectors before it written.
    pub fn write_sectors(&mut self, lba: u32, buffer: &[u8], byte_count: u32) -> Result<u32, IoError> {
        let available = self.free_bytes();
        if byte_count as u64 > available {
            return Err(IoError::OutOfSpace { requested: byte_count, available });
        }

        let (size, count) = self.plan(buffer.len(), byte_count)?;

        for (i, chunk) in buffer[..size * count].chunks_exact(size).enumerate() {
            let sector = lba as u64 + i as u64;
            let ok = u32::try_from(sector)
                .map(|sector| self.medium.write_raw(chunk, sector))
                .unwrap_or(false);
            if !ok {
                return Err(IoError::WriteFailure { sector });
            }
        }
        Ok((size * count) as u32)
    }

    /// Sector size and whole-sector count for a request.
    fn plan(&self, buffer_len: usize, byte_count: u32) -> Result<(usize, usize), IoError> {
        let sector_size = self.medium.sector_size();
        if sector_size == 0 {
            return Err(IoError::DiskError);
        }
        let size = sector_size as usize;
        let count = (byte_count / sector_size) as usize;
        let needed = size * count;
        if buffer_len < needed {
            return Err(IoError::BufferTooSmall { needed, len: buffer_len });
        }
        Ok((size, count))
    }
}
