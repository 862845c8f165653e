//! In-memory storage medium.
//!
//! Holds a whole card image in RAM. Useful for bring-up without a card slot
//! and for exercising the bridge on the host.

use alloc::vec;
use alloc::vec::Vec;

use super::medium::{SpiBus, StorageMedium};

pub struct RamMedium {
    data: Vec<u8>,
    sector_size: u32,
    used_bytes: u64,
    present: bool,
    mounted: bool,
}

impl RamMedium {
    /// Create a zero-filled medium of `sector_count` sectors.
    pub fn new(sector_size: u32, sector_count: u32) -> Self {
        let len = sector_size as usize * sector_count as usize;
        Self {
            data: vec![0; len],
            sector_size,
            used_bytes: 0,
            present: true,
            mounted: false,
        }
    }

    /// Set the bytes reported as already in use.
    pub fn with_used_bytes(mut self, used_bytes: u64) -> Self {
        self.used_bytes = used_bytes;
        self
    }

    pub fn set_used_bytes(&mut self, used_bytes: u64) {
        self.used_bytes = used_bytes;
    }

    /// Insert or pull the card. Pulling it also drops the mount.
    pub fn set_present(&mut self, present: bool) {
        self.present = present;
        if !present {
            self.mounted = false;
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The raw card image.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn sector_range(&self, sector: u32, len: usize) -> Option<core::ops::Range<usize>> {
        let size = self.sector_size as usize;
        if !self.mounted || size == 0 || len < size {
            return None;
        }
        let start = (sector as usize).checked_mul(size)?;
        let end = start.checked_add(size)?;
        if end > self.data.len() {
            return None;
        }
        Some(start..end)
    }
}

impl StorageMedium for RamMedium {
    fn mount(&mut self, _chip_select: u8, _bus: &SpiBus) -> bool {
        self.mounted = self.present;
        self.mounted
    }

    fn sector_size(&self) -> u32 {
        self.sector_size
    }

    fn sector_count(&self) -> u32 {
        match self.sector_size {
            0 => 0,
            size => (self.data.len() / size as usize) as u32,
        }
    }

    fn total_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    fn read_raw(&mut self, dest: &mut [u8], sector: u32) -> bool {
        match self.sector_range(sector, dest.len()) {
            Some(range) => {
                let size = range.len();
                dest[..size].copy_from_slice(&self.data[range]);
                true
            }
            None => false,
        }
    }

    fn write_raw(&mut self, src: &[u8], sector: u32) -> bool {
        match self.sector_range(sector, src.len()) {
            Some(range) => {
                let size = range.len();
                self.data[range].copy_from_slice(&src[..size]);
                true
            }
            None => false,
        }
    }
}
