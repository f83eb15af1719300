//! The hardware-register-bank family.
//!
//! One [`HalBank`] implementation exists per device profile; all of them
//! share the capability set the peripheral-dispatch loop calls into, and
//! [`HalDispatch`] routes the memory-mapped register window to whichever
//! bank is active. Capabilities a profile does not wire up fall back to the
//! trait's documented defaults.

pub mod card;
pub mod dispatch;
pub mod ez328;
pub mod spi;
pub mod vz_yellowstone;

pub use card::{CardImage, Slot};
pub use dispatch::HalDispatch;
pub use ez328::Ez328Bank;
pub use spi::{SpiSlave, TouchAdc};
pub use vz_yellowstone::VzYellowStoneBank;

/// A general-purpose I/O port of the controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Port {
    B,
    C,
    D,
    E,
    F,
    G,
    J,
    K,
}

impl Port {
    pub const ALL: [Port; 8] = [
        Port::B,
        Port::C,
        Port::D,
        Port::E,
        Port::F,
        Port::G,
        Port::J,
        Port::K,
    ];

    pub const fn index(self) -> usize {
        match self {
            Port::B => 0,
            Port::C => 1,
            Port::D => 2,
            Port::E => 3,
            Port::F => 4,
            Port::G => 5,
            Port::J => 6,
            Port::K => 7,
        }
    }
}

/// The key-matrix layout a profile reports to the input glue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyMatrix {
    pub rows: usize,
    pub cols: usize,
    /// `rows * cols` key codes, row-major.
    pub key_map: &'static [u16],
    /// Which rows are driven active-high.
    pub row_active: &'static [bool],
}

/// The capability set every hardware profile exposes.
///
/// Defaults are the documented "not wired on this profile" answers: screen
/// on, backlight off, LEDs clear, vibrator off, serial off, ports reading
/// `0x00`, no SPI slave. Every query is total: any port index yields a
/// defined value, never an error.
pub trait HalBank {
    fn lcd_screen_on(&self) -> bool {
        true
    }

    fn lcd_backlight_on(&self) -> bool {
        false
    }

    /// Bitmask of lit LEDs.
    fn led_state(&self) -> u16 {
        0
    }

    fn vibrate_on(&self) -> bool {
        false
    }

    fn serial_port_on(&self, _uart: usize) -> bool {
        false
    }

    /// The value the guest reads from the port's pins.
    fn port_input_value(&self, _port: Port) -> u8 {
        0x00
    }

    /// The value the port's peripheral multiplexer feeds back internally.
    fn port_internal_value(&self, _port: Port) -> u8 {
        0x00
    }

    /// The guest-visible output latch of the port.
    fn port_output_value(&self, _port: Port) -> u8 {
        0x00
    }

    /// Stores to the port's data register land here. Profiles without
    /// writable ports ignore them.
    fn set_port_output(&self, _port: Port, _value: u8) {}

    fn key_info(&self) -> KeyMatrix;

    /// Attaches a card image to a slot, replacing any image already there.
    fn mount(&self, slot: Slot, image: CardImage);

    /// Detaches a slot's card image; an empty slot is left unchanged and no
    /// error is raised.
    fn unmount(&self, slot: Slot);

    /// The slave on the second SPI master, for profiles that have one.
    fn spi_slave(&self) -> Option<&dyn SpiSlave> {
        None
    }
}
