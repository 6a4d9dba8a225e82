//! Recording line for running the encoder without hardware
//!
//! Real pulse widths can only be checked with a logic analyzer. This line
//! keeps a virtual clock in CPU cycles instead and records how long the
//! output stays at each level, so pulse trains can be inspected in tests.
//!
//! Every write to the port (toggle or force-low) closes the current pulse
//! and starts a new one; idle spins and delays extend it. A pulse that began
//! at an edge is recorded even when no time passed in it, so a phase whose
//! idle count rounds to zero still shows up as its half of a bit.

use heapless::Vec;

use crate::PortLine;
use crate::line::PinMask;
use crate::timing::cycles_to_ns;

/// Output level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// One stretch of constant output level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub level: Level,
    pub duration_ns: u64,
}

/// [`PortLine`] that records pulses instead of driving a pin
///
/// N is the number of pulses kept. A pixel takes 48, a latch one more.
/// Pulses past N are dropped and flagged by [`RecordingLine::overflowed`].
#[derive(Debug)]
pub struct RecordingLine<const N: usize> {
    cpu_hz: u32,
    output_mask: PinMask,
    level: Level,
    from_edge: bool,
    elapsed_cycles: u64,
    elapsed_us: u64,
    toggles: usize,
    pulses: Vec<Pulse, N>,
    overflowed: bool,
}

impl<const N: usize> RecordingLine<N> {
    pub const fn new(cpu_hz: u32) -> Self {
        Self {
            cpu_hz,
            output_mask: 0,
            level: Level::Low,
            from_edge: false,
            elapsed_cycles: 0,
            elapsed_us: 0,
            toggles: 0,
            pulses: Vec::new(),
            overflowed: false,
        }
    }

    /// Close the pulse in progress so it shows up in [`RecordingLine::pulses`]
    pub fn flush(&mut self) {
        self.close_pulse();
        self.from_edge = false;
    }

    /// Record the pulse in progress and start timing a new one
    ///
    /// Idle time with no edge before it and nothing elapsed is not a pulse.
    fn close_pulse(&mut self) {
        let duration_ns = self.elapsed_ns();
        self.elapsed_cycles = 0;
        self.elapsed_us = 0;
        if duration_ns == 0 && !self.from_edge {
            return;
        }
        let pulse = Pulse {
            level: self.level,
            duration_ns,
        };
        if self.pulses.push(pulse).is_err() {
            self.overflowed = true;
        }
    }

    /// Forget everything recorded so far, keeping level and output mask
    pub fn clear(&mut self) {
        self.pulses.clear();
        self.from_edge = false;
        self.elapsed_cycles = 0;
        self.elapsed_us = 0;
        self.toggles = 0;
        self.overflowed = false;
    }

    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses
    }

    pub const fn level(&self) -> Level {
        self.level
    }

    pub const fn toggles(&self) -> usize {
        self.toggles
    }

    pub const fn output_mask(&self) -> PinMask {
        self.output_mask
    }

    pub const fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Decode recorded high/low pairs back into bytes
    ///
    /// A pair whose high phase outlasts its low phase is a 1. Low pulses
    /// without a preceding high (the latch, idle time) are skipped. Trailing
    /// bits that do not fill a byte are dropped.
    pub fn decode<const M: usize>(&self) -> Vec<u8, M> {
        decode_bytes(&self.pulses)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn elapsed_ns(&self) -> u64 {
        let cycles = self.elapsed_cycles.min(u64::from(u32::MAX)) as u32;
        cycles_to_ns(cycles, self.cpu_hz) + self.elapsed_us * 1000
    }
}

impl<const N: usize> PortLine for RecordingLine<N> {
    fn set_output(&mut self, mask: PinMask) {
        self.output_mask |= mask;
    }

    fn toggle(&mut self, mask: PinMask) {
        if mask & self.output_mask == 0 {
            return;
        }
        self.close_pulse();
        self.from_edge = true;
        self.toggles += 1;
        self.level = match self.level {
            Level::Low => Level::High,
            Level::High => Level::Low,
        };
    }

    fn set_low(&mut self, mask: PinMask) {
        if mask & self.output_mask == 0 {
            return;
        }
        // Ending a high level is an edge, re-asserting low is not
        self.from_edge |= self.level == Level::High;
        self.close_pulse();
        self.from_edge = true;
        self.level = Level::Low;
    }

    fn spin(&mut self, cycles: u32) {
        self.elapsed_cycles += u64::from(cycles);
    }

    fn delay_us(&mut self, us: u32) {
        self.elapsed_us += u64::from(us);
    }
}

/// Decode high/low pulse pairs into bytes, MSB first
pub fn decode_bytes<const M: usize>(pulses: &[Pulse]) -> Vec<u8, M> {
    let mut bytes = Vec::new();
    let mut current = 0u8;
    let mut bits = 0;
    let mut high: Option<u64> = None;

    for pulse in pulses {
        match (pulse.level, high) {
            (Level::High, _) => high = Some(pulse.duration_ns),
            (Level::Low, Some(high_ns)) => {
                current = (current << 1) | u8::from(high_ns > pulse.duration_ns);
                bits += 1;
                high = None;
                if bits == 8 {
                    if bytes.push(current).is_err() {
                        break;
                    }
                    current = 0;
                    bits = 0;
                }
            }
            (Level::Low, None) => {}
        }
    }
    bytes
}
