use pilot_emu_errors::{EmuError, EmuResult};
use pilot_emu_mem::{GuestAddr, MemAccess};
use tracing::trace;

use crate::{HalBank, Port};

/// Base of the controller's memory-mapped register window.
pub const REGISTER_WINDOW_BASE: u32 = 0xFFFF_F000;
/// Size of the register window in bytes.
pub const REGISTER_WINDOW_SIZE: u32 = 0x1000;

/// System control register, the first byte of the window.
const OFF_SCR: u32 = 0x000;

/// Port data register offsets within the window, in [`Port::ALL`] order.
const PORT_DATA_OFFSETS: [u32; 8] = [
    0x409, // B
    0x411, // C
    0x419, // D
    0x421, // E
    0x429, // F
    0x431, // G
    0x439, // J
    0x441, // K
];

fn port_at(offset: u32) -> Option<Port> {
    PORT_DATA_OFFSETS
        .iter()
        .position(|off| *off == offset)
        .map(|i| Port::ALL[i])
}

/// Routes the register window to the active device profile.
///
/// Exactly one [`HalBank`] is active at a time; swapping banks is a
/// configuration-time operation, never something the running guest triggers.
pub struct HalDispatch {
    active: Box<dyn HalBank>,
}

impl HalDispatch {
    pub fn new(bank: Box<dyn HalBank>) -> Self {
        Self { active: bank }
    }

    pub fn active(&self) -> &dyn HalBank {
        &*self.active
    }

    /// Replaces the active profile, returning the previous one.
    pub fn swap(&mut self, bank: Box<dyn HalBank>) -> Box<dyn HalBank> {
        std::mem::replace(&mut self.active, bank)
    }

    pub fn contains(&self, addr: GuestAddr) -> bool {
        addr.get().wrapping_sub(REGISTER_WINDOW_BASE) < REGISTER_WINDOW_SIZE
    }

    /// Reads one register byte. Unassigned offsets read as `0x00`.
    fn read_byte(&self, offset: u32) -> u8 {
        if let Some(port) = port_at(offset) {
            return self.active.port_input_value(port) | self.active.port_output_value(port);
        }

        match offset {
            OFF_SCR => 0x1C,
            _ => 0x00,
        }
    }

    /// Writes one register byte. Stores to unassigned offsets are ignored.
    fn write_byte(&self, offset: u32, value: u8) {
        if let Some(port) = port_at(offset) {
            self.active.set_port_output(port, value);
        } else {
            trace!(offset, value, "ignored register store");
        }
    }
}

impl MemAccess for HalDispatch {
    fn read(&self, addr: GuestAddr, data: &mut [u8]) -> EmuResult<()> {
        let offset = addr.get().wrapping_sub(REGISTER_WINDOW_BASE);

        if offset >= REGISTER_WINDOW_SIZE || data.len() as u32 > REGISTER_WINDOW_SIZE - offset {
            return Err(EmuError::BusError { addr: addr.get() });
        }

        for (i, byte) in data.iter_mut().enumerate() {
            *byte = self.read_byte(offset + i as u32);
        }

        Ok(())
    }

    fn write(&self, addr: GuestAddr, data: &[u8]) -> EmuResult<()> {
        let offset = addr.get().wrapping_sub(REGISTER_WINDOW_BASE);

        if offset >= REGISTER_WINDOW_SIZE || data.len() as u32 > REGISTER_WINDOW_SIZE - offset {
            return Err(EmuError::BusError { addr: addr.get() });
        }

        for (i, byte) in data.iter().enumerate() {
            self.write_byte(offset + i as u32, *byte);
        }

        Ok(())
    }
}
