//! Pulse encoder
//!
//! Turns one pixel into 24 timed pulses on the configured bit: green, red,
//! blue, each most significant bit first. A 1-bit is a long high followed by
//! a short low, a 0-bit a short high followed by a longer low.
//!
//! The 0-bit high phase is the narrowest window in the protocol. An interrupt
//! landing there stretches it into a 1-bit, so it runs inside a critical
//! section that ends as soon as the falling edge has been written. Every
//! other phase has enough slack to absorb an interrupt.

use crate::PortLine;
use crate::color::{GrbPixel, Rgb};
use crate::line::PinMask;
use crate::timing::PulseCycles;

/// Cycle-counted transmitter for a single output bit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PulseEncoder {
    mask: PinMask,
    cycles: PulseCycles,
    latch_us: u32,
}

impl PulseEncoder {
    pub const fn new(mask: PinMask, cycles: PulseCycles, latch_us: u32) -> Self {
        Self {
            mask,
            cycles,
            latch_us,
        }
    }

    pub const fn mask(&self) -> PinMask {
        self.mask
    }

    pub const fn cycles(&self) -> &PulseCycles {
        &self.cycles
    }

    /// Encode and send one color
    pub fn send_pixel<L: PortLine>(&self, line: &mut L, color: Rgb) {
        self.send_grb(line, GrbPixel::from(color));
    }

    /// Send a pixel that is already in wire order
    pub fn send_grb<L: PortLine>(&self, line: &mut L, pixel: GrbPixel) {
        for byte in pixel.wire_bytes() {
            self.send_byte(line, byte);
        }
    }

    /// Hold the line low long enough for the strip to show the frame
    pub fn latch<L: PortLine>(&self, line: &mut L) {
        line.set_low(self.mask);
        line.delay_us(self.latch_us);
    }

    fn send_byte<L: PortLine>(&self, line: &mut L, mut byte: u8) {
        for _ in 0..8 {
            if byte & 0x80 == 0 {
                self.send_zero(line);
            } else {
                self.send_one(line);
            }
            byte <<= 1;
        }
    }

    #[inline(always)]
    fn send_one<L: PortLine>(&self, line: &mut L) {
        line.toggle(self.mask);
        line.spin(self.cycles.on1);
        line.toggle(self.mask);
        line.spin(self.cycles.off1);
    }

    #[inline(always)]
    fn send_zero<L: PortLine>(&self, line: &mut L) {
        line.without_interrupts(|line| {
            line.toggle(self.mask);
            line.spin(self.cycles.on0);
            line.toggle(self.mask);
        });
        line.spin(self.cycles.off0);
    }
}
