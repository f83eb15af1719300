use std::cell::Cell;

/// A device hanging off one of the controller's SPI masters.
pub trait SpiSlave {
    /// Clocks one 16-bit frame out and the slave's response frame in.
    fn exchange(&self, frame: u16) -> u16;
}

/// The touch-panel ADC some profiles wire to the second SPI master.
///
/// Responds to each conversion command with the previously latched channel
/// value; channels are poked by the input glue (excluded collaborator).
#[derive(Default)]
pub struct TouchAdc {
    latched: Cell<u16>,
}

impl TouchAdc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latch(&self, sample: u16) {
        self.latched.set(sample);
    }
}

impl SpiSlave for TouchAdc {
    fn exchange(&self, frame: u16) -> u16 {
        // Command frames have the start bit set; anything else is clocking
        // out the previous conversion.
        if frame & 0x8000 != 0 {
            0
        } else {
            self.latched.get()
        }
    }
}
