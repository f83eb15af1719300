use std::cell::{Cell, RefCell};

use pilot_emu_errors::{EmuError, EmuResult};
use tracing::trace;

use crate::access::MemAccess;
use crate::addr::GuestAddr;

/// Default base of the arena that mapped host buffers are carved from. Sits
/// above the DragonBall register page would ever reach and outside any RAM
/// card, so the ranges cannot collide.
pub const DEFAULT_ARENA_BASE: u32 = 0x8000_0000;

/// Regions are reserved in power-of-two granules of at least this size so two
/// live mappings never abut and an off-by-one access faults instead of
/// silently landing in a neighbour.
const GRANULE: u32 = 0x100;

struct Region {
    host_id: usize,
    base: GuestAddr,
    reserved: u32,
    bytes: Vec<u8>,
}

/// The bank that makes host-owned buffers addressable by guest code.
///
/// Regions are only ever created through [`ScopedMapping`], which guarantees
/// the unmap on every exit path; the bank itself just owns the projection
/// records and answers accesses against them.
pub struct MappedBank {
    next: Cell<u32>,
    regions: RefCell<Vec<Region>>,
}

impl MappedBank {
    pub fn new() -> Self {
        Self::with_arena(GuestAddr::new(DEFAULT_ARENA_BASE))
    }

    pub fn with_arena(base: GuestAddr) -> Self {
        Self {
            next: Cell::new(base.get()),
            regions: RefCell::new(Vec::new()),
        }
    }

    /// Whether `addr..addr+len` falls entirely inside one live region.
    pub fn contains(&self, addr: GuestAddr, len: usize) -> bool {
        self.regions
            .borrow()
            .iter()
            .any(|r| Self::region_span(r, addr, len).is_some())
    }

    pub fn live_mappings(&self) -> usize {
        self.regions.borrow().len()
    }

    fn region_span(region: &Region, addr: GuestAddr, len: usize) -> Option<std::ops::Range<usize>> {
        let start = addr.get().checked_sub(region.base.get())? as usize;
        let end = start.checked_add(len)?;

        if end <= region.bytes.len() {
            Some(start..end)
        } else {
            None
        }
    }

    fn map(&self, host_id: usize, data: &[u8]) -> EmuResult<GuestAddr> {
        let mut regions = self.regions.borrow_mut();

        if let Some(live) = regions.iter().find(|r| r.host_id == host_id) {
            return Err(EmuError::AlreadyMapped {
                guest: live.base.get(),
            });
        }

        let reserved = (data.len().max(1) as u32).next_power_of_two().max(GRANULE);
        let base = GuestAddr::new(self.next.get());
        self.next.set(base.get().wrapping_add(reserved));

        trace!(guest = %base, len = data.len(), "mapping host buffer");

        regions.push(Region {
            host_id,
            base,
            reserved,
            bytes: data.to_vec(),
        });

        Ok(base)
    }

    fn unmap(&self, base: GuestAddr, host: &mut [u8]) {
        let mut regions = self.regions.borrow_mut();

        let idx = regions
            .iter()
            .position(|r| r.base == base)
            .expect("a live ScopedMapping always has its region");
        let region = regions.remove(idx);

        trace!(guest = %base, "unmapping host buffer");

        host.copy_from_slice(&region.bytes);

        // Mappings are scoped, so unmaps arrive in LIFO order and the arena
        // can be rolled back instead of leaking address space.
        if region.base.get().wrapping_add(region.reserved) == self.next.get() {
            self.next.set(region.base.get());
        }
    }
}

impl Default for MappedBank {
    fn default() -> Self {
        Self::new()
    }
}

impl MemAccess for MappedBank {
    fn read(&self, addr: GuestAddr, data: &mut [u8]) -> EmuResult<()> {
        let regions = self.regions.borrow();

        for region in regions.iter() {
            if let Some(range) = Self::region_span(region, addr, data.len()) {
                data.copy_from_slice(&region.bytes[range]);
                return Ok(());
            }
        }

        Err(EmuError::BusError { addr: addr.get() })
    }

    fn write(&self, addr: GuestAddr, data: &[u8]) -> EmuResult<()> {
        let mut regions = self.regions.borrow_mut();

        for region in regions.iter_mut() {
            if let Some(range) = Self::region_span(region, addr, data.len()) {
                region.bytes[range].copy_from_slice(data);
                return Ok(());
            }
        }

        Err(EmuError::BusError { addr: addr.get() })
    }
}

/// Projects a host buffer into guest address space for the enclosing scope.
///
/// Construction with `None` is a valid no-op mapping: [`Self::guest_addr`]
/// stays null and dropping does nothing. With `Some(buf)` the buffer's bytes
/// become guest-addressable at the returned address; when the guard drops the
/// guest-visible (possibly modified) contents are copied back into the host
/// buffer and the region is released, on every exit path including error
/// propagation through `?`.
pub struct ScopedMapping<'a> {
    bank: &'a MappedBank,
    host: Option<&'a mut [u8]>,
    guest: GuestAddr,
}

impl<'a> ScopedMapping<'a> {
    pub fn new(bank: &'a MappedBank, host: Option<&'a mut [u8]>) -> EmuResult<Self> {
        let (host, guest) = match host {
            None => (None, GuestAddr::NULL),
            Some(buf) => {
                let guest = bank.map(buf.as_ptr() as usize, buf)?;
                (Some(buf), guest)
            }
        };

        Ok(Self { bank, host, guest })
    }

    /// The guest address the host buffer is visible at, or null for the no-op
    /// mapping.
    pub fn guest_addr(&self) -> GuestAddr {
        self.guest
    }
}

impl<'a> Drop for ScopedMapping<'a> {
    fn drop(&mut self) {
        if let Some(host) = self.host.take() {
            self.bank.unmap(self.guest, host);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_null_mapping_is_a_noop() {
        let bank = MappedBank::new();

        let mapping = ScopedMapping::new(&bank, None).unwrap();
        assert!(mapping.guest_addr().is_null());
        drop(mapping);

        assert_eq!(bank.live_mappings(), 0);
    }

    #[test]
    fn test_mapping_lifetime_is_the_scope() {
        let bank = MappedBank::new();
        let mut buf = *b"DLP\0";

        let guest = {
            let mapping = ScopedMapping::new(&bank, Some(&mut buf)).unwrap();
            let guest = mapping.guest_addr();

            assert_eq!(bank.get_u8(guest).unwrap(), b'D');

            // Guest-side stores land in the projection and reach the host
            // buffer once the scope closes.
            bank.put_u8(guest.offset(3), b'!').unwrap();
            guest
        };

        assert_eq!(&buf, b"DLP!");
        assert_eq!(
            bank.get_u8(guest),
            Err(EmuError::BusError { addr: guest.get() })
        );
    }

    #[test]
    fn test_double_mapping_is_rejected() {
        let bank = MappedBank::new();
        let mut buf = [0u8; 16];

        let ptr_id = buf.as_ptr() as usize;
        let _live = ScopedMapping::new(&bank, Some(&mut buf)).unwrap();

        // Same buffer again, while the first projection is live.
        let dup = bank.map(ptr_id, &[0u8; 16]);
        assert!(matches!(dup, Err(EmuError::AlreadyMapped { .. })));
        assert_eq!(bank.live_mappings(), 1);
    }

    #[test]
    fn test_arena_rolls_back_in_scope_order() {
        let bank = MappedBank::new();
        let mut buf = [0u8; 8];

        let first = {
            let mapping = ScopedMapping::new(&bank, Some(&mut buf)).unwrap();
            mapping.guest_addr()
        };

        let second = {
            let mapping = ScopedMapping::new(&bank, Some(&mut buf)).unwrap();
            mapping.guest_addr()
        };

        assert_eq!(first, second);
    }
}
