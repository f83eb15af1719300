use std::cell::RefCell;

use tracing::debug;

use crate::card::SlotState;
use crate::spi::{SpiSlave, TouchAdc};
use crate::{CardImage, HalBank, KeyMatrix, Port, Slot};

/// Port J bit gating the LCD controller; active low on this board.
const PORT_J_LCD_OFF: u8 = 0x02;
/// Port K bit sinking the backlight LED; active low.
const PORT_K_BACKLIGHT_OFF: u8 = 0x08;
/// Port K bit driving the vibrator motor; active low.
const PORT_K_VIBRATE_OFF: u8 = 0x10;
/// Port G bit lighting the power LED.
const PORT_G_POWER_LED: u8 = 0x01;

/// Port D pins the keypad columns come in on; idle high.
const PORT_D_KEY_BITS: u8 = 0x0F;
/// Port F pin reporting the media-slot detect switch; low when a card is in.
const PORT_F_CARD_DETECT: u8 = 0x02;

#[rustfmt::skip]
static KEY_MAP: [u16; 12] = [
    0x01, 0x02, 0x03, 0x0D,
    0x05, 0x06, 0x07, 0x0E,
    0x09, 0x0A, 0x0B, 0x0F,
];

static ROW_ACTIVE: [bool; 3] = [true, true, false];

/// The VZ-generation "YellowStone" handheld profile.
///
/// Its screen, backlight and vibrator lines are wired active-low, the power
/// LED hangs off port G, one removable-media slot reports through a port F
/// detect pin, and the touch panel ADC sits on the second SPI master.
pub struct VzYellowStoneBank {
    outputs: RefCell<[u8; 8]>,
    slots: SlotState,
    adc: TouchAdc,
}

impl VzYellowStoneBank {
    pub fn new() -> Self {
        Self {
            outputs: RefCell::new([0; 8]),
            slots: SlotState::default(),
            adc: TouchAdc::new(),
        }
    }

    pub fn touch_adc(&self) -> &TouchAdc {
        &self.adc
    }

    pub fn is_mounted(&self, slot: Slot) -> bool {
        self.slots.is_mounted(slot)
    }
}

impl Default for VzYellowStoneBank {
    fn default() -> Self {
        Self::new()
    }
}

impl HalBank for VzYellowStoneBank {
    fn lcd_screen_on(&self) -> bool {
        self.port_output_value(Port::J) & PORT_J_LCD_OFF == 0
    }

    fn lcd_backlight_on(&self) -> bool {
        self.port_output_value(Port::K) & PORT_K_BACKLIGHT_OFF == 0
    }

    fn led_state(&self) -> u16 {
        (self.port_output_value(Port::G) & PORT_G_POWER_LED) as u16
    }

    fn vibrate_on(&self) -> bool {
        self.port_output_value(Port::K) & PORT_K_VIBRATE_OFF == 0
    }

    fn serial_port_on(&self, uart: usize) -> bool {
        // Only the IR transceiver on UART 1 is populated.
        uart == 1
    }

    fn port_input_value(&self, port: Port) -> u8 {
        match port {
            Port::D => PORT_D_KEY_BITS,
            Port::F if !self.slots.is_mounted(Slot::One) => PORT_F_CARD_DETECT,
            _ => 0x00,
        }
    }

    fn port_internal_value(&self, port: Port) -> u8 {
        match port {
            // The detect switch is also visible on the peripheral mux.
            Port::F => self.port_input_value(Port::F),
            _ => 0x00,
        }
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
        debug!(?slot, len = image.len(), "mounting card image");
        self.slots.mount(slot, image);
    }

    fn unmount(&self, slot: Slot) {
        if self.slots.unmount(slot).is_some() {
            debug!(?slot, "unmounted card image");
        }
    }

    fn spi_slave(&self) -> Option<&dyn SpiSlave> {
        Some(&self.adc)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_active_low_screen_and_backlight() {
        let bank = VzYellowStoneBank::new();

        // Latches come up clear, so the active-low lines read as on.
        assert!(bank.lcd_screen_on());
        assert!(bank.lcd_backlight_on());
        assert!(bank.vibrate_on());

        bank.set_port_output(Port::J, PORT_J_LCD_OFF);
        bank.set_port_output(Port::K, PORT_K_BACKLIGHT_OFF | PORT_K_VIBRATE_OFF);
        assert!(!bank.lcd_screen_on());
        assert!(!bank.lcd_backlight_on());
        assert!(!bank.vibrate_on());
    }

    #[test]
    fn test_led_tracks_port_g() {
        let bank = VzYellowStoneBank::new();
        assert_eq!(bank.led_state(), 0);

        bank.set_port_output(Port::G, PORT_G_POWER_LED);
        assert_eq!(bank.led_state(), 1);
    }

    #[test]
    fn test_card_detect_follows_slot_state() {
        let bank = VzYellowStoneBank::new();
        assert_eq!(bank.port_input_value(Port::F) & PORT_F_CARD_DETECT, PORT_F_CARD_DETECT);

        bank.mount(Slot::One, CardImage::new(vec![0; 32]));
        assert_eq!(bank.port_input_value(Port::F) & PORT_F_CARD_DETECT, 0);

        bank.unmount(Slot::One);
        bank.unmount(Slot::One);
        assert_eq!(bank.port_input_value(Port::F) & PORT_F_CARD_DETECT, PORT_F_CARD_DETECT);
    }

    #[test]
    fn test_port_queries_are_total() {
        let bank = VzYellowStoneBank::new();

        for port in Port::ALL {
            bank.port_input_value(port);
            bank.port_internal_value(port);
            bank.port_output_value(port);
        }
    }

    #[test]
    fn test_touch_adc_on_second_spi() {
        let bank = VzYellowStoneBank::new();

        bank.touch_adc().latch(0x0123);
        let slave = bank.spi_slave().unwrap();
        assert_eq!(slave.exchange(0x8000), 0);
        assert_eq!(slave.exchange(0x0000), 0x0123);
    }
}
