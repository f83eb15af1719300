use std::cell::RefCell;

use pilot_emu_errors::{EmuError, EmuResult};

use crate::access::MemAccess;
use crate::addr::GuestAddr;

/// A flat, contiguous bank of guest RAM.
///
/// Execution is single-threaded and synchronous, so interior mutability is a
/// `RefCell` rather than a lock; `write` completes before returning, which
/// gives the "stores are immediately visible" ordering guarantee for free.
pub struct Ram {
    base: GuestAddr,
    bytes: RefCell<Vec<u8>>,
}

impl Ram {
    pub fn new(base: GuestAddr, size: usize) -> Self {
        Self {
            base,
            bytes: RefCell::new(vec![0; size]),
        }
    }

    pub fn base(&self) -> GuestAddr {
        self.base
    }

    pub fn size(&self) -> usize {
        self.bytes.borrow().len()
    }

    pub fn contains(&self, addr: GuestAddr, len: usize) -> bool {
        self.span(addr, len).is_some()
    }

    fn span(&self, addr: GuestAddr, len: usize) -> Option<std::ops::Range<usize>> {
        let start = addr.get().checked_sub(self.base.get())? as usize;
        let end = start.checked_add(len)?;

        if end <= self.bytes.borrow().len() {
            Some(start..end)
        } else {
            None
        }
    }
}

impl MemAccess for Ram {
    fn read(&self, addr: GuestAddr, data: &mut [u8]) -> EmuResult<()> {
        let range = self
            .span(addr, data.len())
            .ok_or(EmuError::BusError { addr: addr.get() })?;

        data.copy_from_slice(&self.bytes.borrow()[range]);
        Ok(())
    }

    fn write(&self, addr: GuestAddr, data: &[u8]) -> EmuResult<()> {
        let range = self
            .span(addr, data.len())
            .ok_or(EmuError::BusError { addr: addr.get() })?;

        self.bytes.borrow_mut()[range].copy_from_slice(data);
        Ok(())
    }
}
