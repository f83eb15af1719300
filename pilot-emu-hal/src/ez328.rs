use std::cell::RefCell;

use tracing::debug;

use crate::card::SlotState;
use crate::{CardImage, HalBank, KeyMatrix, Port, Slot};

/// Port D bit driving the LCD enable line.
const PORT_D_LCD_ON: u8 = 0x80;
/// Port G bit driving the backlight transistor.
const PORT_G_BACKLIGHT_ON: u8 = 0x20;

#[rustfmt::skip]
static KEY_MAP: [u16; 12] = [
    0x01, 0x02, 0x03, 0x04,
    0x05, 0x06, 0x07, 0x08,
    0x09, 0x0A, 0x0B, 0x0C,
];

static ROW_ACTIVE: [bool; 3] = [true, true, true];

/// The baseline EZ-generation profile.
///
/// Screen and backlight follow the port latches the ROM drives; everything
/// the hardware does not wire up stays on the trait defaults.
pub struct Ez328Bank {
    outputs: RefCell<[u8; 8]>,
    slots: SlotState,
}

impl Ez328Bank {
    pub fn new() -> Self {
        Self {
            // The boot ROM expects the LCD enable line high out of reset.
            outputs: RefCell::new([0, 0, PORT_D_LCD_ON, 0, 0, 0, 0, 0]),
            slots: SlotState::default(),
        }
    }

    pub fn is_mounted(&self, slot: Slot) -> bool {
        self.slots.is_mounted(slot)
    }
}

impl Default for Ez328Bank {
    fn default() -> Self {
        Self::new()
    }
}

impl HalBank for Ez328Bank {
    fn lcd_screen_on(&self) -> bool {
        self.port_output_value(Port::D) & PORT_D_LCD_ON != 0
    }

    fn lcd_backlight_on(&self) -> bool {
        self.port_output_value(Port::G) & PORT_G_BACKLIGHT_ON != 0
    }

    fn port_output_value(&self, port: Port) -> u8 {
        self.outputs.borrow()[port.index()]
    }

    fn set_port_output(&self, port: Port, value: u8) {
        self.outputs.borrow_mut()[port.index()] = value;
    }

    fn key_info(&self) -> KeyMatrix {
        KeyMatrix {
            rows: 3,
            cols: 4,
            key_map: &KEY_MAP,
            row_active: &ROW_ACTIVE,
        }
    }

    fn mount(&self, slot: Slot, image: CardImage) {
        if self.slots.mount(slot, image).is_some() {
            debug!(?slot, "replaced mounted card image");
        }
    }

    fn unmount(&self, slot: Slot) {
        self.slots.unmount(slot);
    }
}
