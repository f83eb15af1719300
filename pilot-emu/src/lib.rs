//! Top-level assembly of the handheld emulation core.
//!
//! [`AddressSpace`] stitches the guest's RAM, the host-projection bank and
//! the hardware register window into one bus; [`Machine`] owns an address
//! space plus the per-ROM knobs the OS-call layers need.

use pilot_emu_errors::{EmuError, EmuResult};
use pilot_emu_hal::{HalBank, HalDispatch};
use pilot_emu_mem::{GuestAddr, MappedBank, MemAccess, Ram};
use pilot_emu_trap::{LowMemGlobals, TrapContext, TrapRegs};
use tracing::info;

pub use pilot_emu_errors as errors;
pub use pilot_emu_hal as hal;
pub use pilot_emu_marshal as marshal;
pub use pilot_emu_mem as mem;
pub use pilot_emu_trap as trap;

/// The guest bus: every access is routed to exactly one backing region.
///
/// Accesses that straddle a region boundary or hit unbacked space fail with
/// a bus error rather than reading garbage.
pub struct AddressSpace {
    ram: Ram,
    mapped: MappedBank,
    hal: HalDispatch,
}

impl AddressSpace {
    pub fn new(ram: Ram, mapped: MappedBank, hal: HalDispatch) -> Self {
        Self { ram, mapped, hal }
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn mapped(&self) -> &MappedBank {
        &self.mapped
    }

    pub fn hal(&self) -> &HalDispatch {
        &self.hal
    }
}

impl MemAccess for AddressSpace {
    fn read(&self, addr: GuestAddr, data: &mut [u8]) -> EmuResult<()> {
        if self.ram.contains(addr, data.len()) {
            self.ram.read(addr, data)
        } else if self.mapped.contains(addr, data.len()) {
            self.mapped.read(addr, data)
        } else if self.hal.contains(addr) {
            self.hal.read(addr, data)
        } else {
            Err(EmuError::BusError { addr: addr.get() })
        }
    }

    fn write(&self, addr: GuestAddr, data: &[u8]) -> EmuResult<()> {
        if self.ram.contains(addr, data.len()) {
            self.ram.write(addr, data)
        } else if self.mapped.contains(addr, data.len()) {
            self.mapped.write(addr, data)
        } else if self.hal.contains(addr) {
            self.hal.write(addr, data)
        } else {
            Err(EmuError::BusError { addr: addr.get() })
        }
    }
}

/// Per-ROM assembly knobs.
#[derive(Copy, Clone, Debug)]
pub struct MachineConfig {
    pub ram_base: GuestAddr,
    pub ram_size: usize,
    /// Low-memory globals the library resolver reads; their addresses vary
    /// by ROM generation.
    pub globals: LowMemGlobals,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            ram_base: GuestAddr::new(0),
            ram_size: 0x0010_0000,
            globals: LowMemGlobals {
                lib_table_ptr: GuestAddr::new(0x0104),
                lib_table_entries: GuestAddr::new(0x0108),
            },
        }
    }
}

/// One emulated handheld: an address space plus the knobs derived from its
/// configuration.
pub struct Machine {
    mem: AddressSpace,
    globals: LowMemGlobals,
}

impl Machine {
    pub fn new(config: MachineConfig, bank: Box<dyn HalBank>) -> Self {
        info!(
            ram_base = %config.ram_base,
            ram_size = config.ram_size,
            "assembling machine"
        );

        Self {
            mem: AddressSpace::new(
                Ram::new(config.ram_base, config.ram_size),
                MappedBank::new(),
                HalDispatch::new(bank),
            ),
            globals: config.globals,
        }
    }

    pub fn mem(&self) -> &AddressSpace {
        &self.mem
    }

    pub fn hal(&self) -> &dyn HalBank {
        self.mem.hal.active()
    }

    /// Replaces the active hardware profile; configuration-time only.
    pub fn swap_hal(&mut self, bank: Box<dyn HalBank>) -> Box<dyn HalBank> {
        self.mem.hal.swap(bank)
    }

    /// Resolves the OS call at `pc` against this machine's memory.
    pub fn resolve_call<R: TrapRegs>(&self, regs: &R, pc: GuestAddr) -> EmuResult<TrapContext> {
        pilot_emu_trap::resolve(&self.mem, regs, pc)
    }

    /// Name of the library behind `ref_num`, read from the guest's table.
    pub fn library_name(&self, ref_num: u16) -> EmuResult<Option<String>> {
        pilot_emu_trap::library_name(&self.mem, &self.globals, ref_num)
    }
}

#[cfg(test)]
mod test {
    use pilot_emu_hal::Ez328Bank;

    use super::*;

    #[test]
    fn test_unbacked_access_is_bus_error() {
        let machine = Machine::new(MachineConfig::default(), Box::new(Ez328Bank::new()));

        let mut byte = [0u8; 1];
        assert_eq!(
            machine.mem().read(GuestAddr::new(0x4000_0000), &mut byte),
            Err(EmuError::BusError { addr: 0x4000_0000 })
        );
    }

    #[test]
    fn test_ram_and_register_window_both_reachable() {
        let machine = Machine::new(MachineConfig::default(), Box::new(Ez328Bank::new()));
        let mem = machine.mem();

        mem.put_u16(GuestAddr::new(0x2000), 0xBEEF).unwrap();
        assert_eq!(mem.get_u16(GuestAddr::new(0x2000)).unwrap(), 0xBEEF);

        // The register window responds even though it is far above RAM.
        mem.get_u8(GuestAddr::new(0xFFFF_F000)).unwrap();
    }
}
