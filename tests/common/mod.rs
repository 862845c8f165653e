#![allow(dead_code)]

use std::collections::VecDeque;

use sdstick::drivers::storage::ram::RamMedium;
use sdstick::drivers::usb::{BlockDevice, StartStop, UsbError};
use sdstick::keyboard::{KeyEvent, Keypad};
use sdstick::{Delay, MscTransport, SpiBus, StatusDisplay, StorageMedium};

pub const BUS: SpiBus = SpiBus { clk: 40, miso: 39, mosi: 14 };

pub fn mounted_ram(sector_size: u32, sector_count: u32) -> RamMedium {
    let mut medium = RamMedium::new(sector_size, sector_count);
    assert!(medium.mount(12, &BUS));
    medium
}

/// Medium wrapper that fails chosen sectors and counts physical operations.
pub struct FaultyMedium {
    pub inner: RamMedium,
    pub fail_read_at: Option<u32>,
    pub fail_write_at: Option<u32>,
    /// Reported instead of the real sector size once set.
    pub sector_size_override: Option<u32>,
    pub reads: Vec<u32>,
    pub writes: Vec<u32>,
}

impl FaultyMedium {
    pub fn new(inner: RamMedium) -> Self {
        Self {
            inner,
            fail_read_at: None,
            fail_write_at: None,
            sector_size_override: None,
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }
}

impl StorageMedium for FaultyMedium {
    fn mount(&mut self, chip_select: u8, bus: &SpiBus) -> bool {
        self.inner.mount(chip_select, bus)
    }

    fn sector_size(&self) -> u32 {
        self.sector_size_override.unwrap_or_else(|| self.inner.sector_size())
    }

    fn sector_count(&self) -> u32 {
        self.inner.sector_count()
    }

    fn total_bytes(&self) -> u64 {
        self.inner.total_bytes()
    }

    fn used_bytes(&self) -> u64 {
        self.inner.used_bytes()
    }

    fn read_raw(&mut self, dest: &mut [u8], sector: u32) -> bool {
        self.reads.push(sector);
        if self.fail_read_at == Some(sector) {
            return false;
        }
        self.inner.read_raw(dest, sector)
    }

    fn write_raw(&mut self, src: &[u8], sector: u32) -> bool {
        self.writes.push(sector);
        if self.fail_write_at == Some(sector) {
            return false;
        }
        self.inner.write_raw(src, sector)
    }
}

/// Medium that only answers after a number of failed mount attempts.
pub struct LateCard {
    pub inner: RamMedium,
    pub misses: u32,
    pub attempts: u32,
}

impl StorageMedium for LateCard {
    fn mount(&mut self, chip_select: u8, bus: &SpiBus) -> bool {
        self.attempts += 1;
        if self.attempts <= self.misses {
            return false;
        }
        self.inner.mount(chip_select, bus)
    }

    fn sector_size(&self) -> u32 {
        self.inner.sector_size()
    }

    fn sector_count(&self) -> u32 {
        self.inner.sector_count()
    }

    fn total_bytes(&self) -> u64 {
        self.inner.total_bytes()
    }

    fn used_bytes(&self) -> u64 {
        self.inner.used_bytes()
    }

    fn read_raw(&mut self, dest: &mut [u8], sector: u32) -> bool {
        self.inner.read_raw(dest, sector)
    }

    fn write_raw(&mut self, src: &[u8], sector: u32) -> bool {
        self.inner.write_raw(src, sector)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Welcome(String),
    Clear,
    Stick,
    Connected(bool),
    Message(String),
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub calls: Vec<Screen>,
}

impl StatusDisplay for RecordingDisplay {
    fn show_connected(&mut self, connected: bool) {
        self.calls.push(Screen::Connected(connected));
    }

    fn show_message(&mut self, text: &str) {
        self.calls.push(Screen::Message(text.to_string()));
    }

    fn show_welcome(&mut self, version: &str) {
        self.calls.push(Screen::Welcome(version.to_string()));
    }

    fn show_stick(&mut self) {
        self.calls.push(Screen::Stick);
    }

    fn clear(&mut self) {
        self.calls.push(Screen::Clear);
    }
}

/// Records what the bridge configured on the transport.
#[derive(Default)]
pub struct LoopbackTransport {
    pub vendor: String,
    pub product: String,
    pub revision: String,
    pub media_present: Option<bool>,
    pub begun: Option<(u32, u32)>,
    pub refuse_begin: bool,
}

impl MscTransport for LoopbackTransport {
    fn set_vendor_id(&mut self, vendor: &str) {
        self.vendor = vendor.to_string();
    }

    fn set_product_id(&mut self, product: &str) {
        self.product = product.to_string();
    }

    fn set_product_revision(&mut self, revision: &str) {
        self.revision = revision.to_string();
    }

    fn set_media_present(&mut self, present: bool) {
        self.media_present = Some(present);
    }

    fn begin(&mut self, sector_count: u32, sector_size: u32) -> Result<(), UsbError> {
        if self.refuse_begin {
            return Err(UsbError::EndpointUnavailable);
        }
        if sector_count == 0 || sector_size == 0 {
            return Err(UsbError::InvalidGeometry);
        }
        self.begun = Some((sector_count, sector_size));
        Ok(())
    }
}

/// Issues requests the way the MSC class driver does after decoding a CDB.
pub struct Host {
    pub sector_size: u32,
}

impl Host {
    pub fn read10<B: BlockDevice>(&self, dev: &mut B, lba: u32, blocks: u16) -> Result<Vec<u8>, i32> {
        let len = blocks as u32 * self.sector_size;
        let mut buf = vec![0u8; len as usize];
        match dev.read(lba, 0, &mut buf, len) {
            n if n < 0 => Err(n),
            n => {
                buf.truncate(n as usize);
                Ok(buf)
            }
        }
    }

    pub fn write10<B: BlockDevice>(&self, dev: &mut B, lba: u32, data: &[u8]) -> i32 {
        dev.write(lba, 0, data, data.len() as u32)
    }

    pub fn start_stop_unit<B: BlockDevice>(&self, dev: &mut B, byte4: u8) -> bool {
        let (power, flags) = StartStop::from_cdb(byte4);
        dev.start_stop(
            power,
            flags.contains(StartStop::START),
            flags.contains(StartStop::LOAD_EJECT),
        )
    }
}

/// Keypad that stays idle for a number of scans, then reports one key.
pub struct ScriptedKeypad {
    pub events: VecDeque<Option<KeyEvent>>,
}

impl ScriptedKeypad {
    pub fn after(idle_scans: usize) -> Self {
        let mut events: VecDeque<_> = std::iter::repeat(None).take(idle_scans).collect();
        events.push_back(Some(KeyEvent { code: 0x28, pressed: true }));
        Self { events }
    }
}

impl Keypad for ScriptedKeypad {
    type Error = ();

    fn poll_key(&mut self) -> nb::Result<KeyEvent, ()> {
        match self.events.pop_front() {
            Some(Some(event)) => Ok(event),
            Some(None) => Err(nb::Error::WouldBlock),
            None => Err(nb::Error::Other(())),
        }
    }
}

#[derive(Default)]
pub struct RecordingDelay {
    pub sleeps: Vec<u32>,
}

impl Delay for RecordingDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.sleeps.push(ms);
    }
}
