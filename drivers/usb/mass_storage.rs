//! USB Mass Storage bridge.
//!
//! Exposes a mounted medium to the host as a raw block device. Block requests
//! go to the [`SectorAdapter`]; lifecycle events go to the [`LinkMonitor`].
//! The two halves share no state.

use log::{debug, info, warn};

use super::link::{LinkMonitor, LinkState};
use super::{BlockDevice, MscTransport, StartStop, UsbError, UsbEvent, UsbEventSink, TRANSFER_ERROR};
use crate::config::Identity;
use crate::display::StatusDisplay;
use crate::drivers::storage::medium::StorageMedium;
use crate::drivers::storage::sector::{Geometry, SectorAdapter};

/// Media is always reported present; card removal is not detected.
pub const MEDIA_PRESENT: bool = true;

/// A medium registered as the transport's backing store.
pub struct MscBridge<M, D> {
    adapter: SectorAdapter<M>,
    link: LinkMonitor<D>,
}

impl<M: StorageMedium, D: StatusDisplay> MscBridge<M, D> {
    /// Configure the transport and start MSC service with the medium's
    /// geometry.
    ///
    /// Taking a [`SectorAdapter`] guarantees the geometry was validated at
    /// mount time.
    pub fn register<T: MscTransport + ?Sized>(
        adapter: SectorAdapter<M>,
        link: LinkMonitor<D>,
        identity: &Identity,
        transport: &mut T,
    ) -> Result<Self, UsbError> {
        let Geometry { sector_size, sector_count } = adapter.geometry();

        transport.set_vendor_id(identity.vendor());
        transport.set_product_id(identity.product());
        transport.set_product_revision(identity.revision());
        transport.set_media_present(MEDIA_PRESENT);
        transport.begin(sector_count, sector_size)?;

        info!(
            "msc registered as {} {} rev {}: {} x {} bytes",
            identity.vendor(),
            identity.product(),
            identity.revision(),
            sector_count,
            sector_size
        );
        Ok(Self { adapter, link })
    }

    pub fn geometry(&self) -> Geometry {
        self.adapter.geometry()
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    pub fn adapter(&self) -> &SectorAdapter<M> {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut SectorAdapter<M> {
        &mut self.adapter
    }

    pub fn link(&self) -> &LinkMonitor<D> {
        &self.link
    }
}

/// Clamp a byte count to what fits in the transport's return value.
fn transferred(bytes: u32) -> i32 {
    i32::try_from(bytes).unwrap_or(TRANSFER_ERROR)
}

impl<M: StorageMedium, D: StatusDisplay> BlockDevice for MscBridge<M, D> {
    fn read(&mut self, lba: u32, _offset: u32, buffer: &mut [u8], byte_count: u32) -> i32 {
        match self.adapter.read_sectors(lba, buffer, byte_count) {
            Ok(bytes) => transferred(bytes),
            Err(err) => {
                warn!("msc read lba={} len={}: {}", lba, byte_count, err);
                TRANSFER_ERROR
            }
        }
    }

    fn write(&mut self, lba: u32, _offset: u32, buffer: &[u8], byte_count: u32) -> i32 {
        match self.adapter.write_sectors(lba, buffer, byte_count) {
            Ok(bytes) => transferred(bytes),
            Err(err) => {
                warn!("msc write lba={} len={}: {}", lba, byte_count, err);
                TRANSFER_ERROR
            }
        }
    }

    fn start_stop(&mut self, power_condition: u8, start: bool, load_eject: bool) -> bool {
        let mut flags = StartStop::empty();
        flags.set(StartStop::START, start);
        flags.set(StartStop::LOAD_EJECT, load_eject);
        debug!("msc start/stop power={} {:?}", power_condition, flags);
        // Nothing to spin up or eject.
        true
    }
}

impl<M: StorageMedium, D: StatusDisplay> UsbEventSink for MscBridge<M, D> {
    fn on_event(&mut self, event: UsbEvent) {
        self.link.handle(event);
    }
}
