//! Output line configuration and platform adapters

use core::ptr::write_volatile;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::PortLine;
use crate::spin::spin_cycles;
use crate::timing::cycles_to_ns;

/// Bit mask selecting one bit of an output port
pub type PinMask = u32;

/// Number of bits in a port register
pub const PORT_WIDTH: u8 = 32;

/// Cycles the output loop spends in each phase besides the idle spin
///
/// These are the instructions between two edges: the toggle itself, the
/// bit shift and branch, and the loop counters. A platform whose toggle
/// path has a known instruction cost declares it here so the idle counts
/// can be shortened by the same amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopOverhead {
    pub on1: u32,
    pub off1: u32,
    pub on0: u32,
    pub off0: u32,
}

impl LoopOverhead {
    /// No loop cost; the idle spin is the whole phase
    pub const NONE: Self = Self {
        on1: 0,
        off1: 0,
        on0: 0,
        off0: 0,
    };

    /// Single-cycle `out` toggle with a shift/branch bit loop (AVR class)
    pub const AVR: Self = Self {
        on1: 2,
        off1: 5,
        on0: 1,
        off0: 5,
    };
}

/// Which pin drives the strip and how many pixels hang off it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineConfig {
    pin: u8,
    mask: PinMask,
    pixel_count: usize,
}

impl LineConfig {
    /// Create a config for `pin`
    ///
    /// A pin outside the port width produces an empty mask, so the line is
    /// never touched.
    pub const fn new(pin: u8, pixel_count: usize) -> Self {
        Self {
            pin,
            mask: pin_mask(pin),
            pixel_count,
        }
    }

    pub const fn pin(&self) -> u8 {
        self.pin
    }

    pub const fn mask(&self) -> PinMask {
        self.mask
    }

    pub const fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    pub const fn is_valid(&self) -> bool {
        self.mask != 0
    }

    pub(crate) const fn with_pixel_count(mut self, pixel_count: usize) -> Self {
        self.pixel_count = pixel_count;
        self
    }
}

/// Mask for `pin`, or 0 if the pin does not exist on the port
pub const fn pin_mask(pin: u8) -> PinMask {
    if pin < PORT_WIDTH { 1 << pin } else { 0 }
}

/// Addresses of the port registers a [`RegisterLine`] writes
///
/// Each register takes a bit mask and acts only on the set bits, the way
/// XOR/CLR/SET aliases work on most MCU GPIO blocks (RP2040 SIO, nRF
/// OUTSET/OUTCLR, AVR `PINx` writes).
#[derive(Debug, Clone, Copy)]
pub struct PortRegisters {
    /// Writing a mask flips those output bits
    pub toggle: *mut u32,
    /// Writing a mask drives those output bits low
    pub clear: *mut u32,
    /// Writing a mask switches those pins to output
    pub output_enable: *mut u32,
}

/// Cycle-counted line driving a port through its toggle register
///
/// This is the timing-accurate line: each edge is one volatile store and
/// every idle phase is a counted instruction loop from [`crate::spin`].
/// `overhead` is what the compiled bit loop costs per phase on the target
/// and has to be measured once per toolchain and core, e.g. with a logic
/// analyzer; [`LoopOverhead::AVR`] is the figure for a single-cycle `out`
/// loop.
pub struct RegisterLine {
    registers: PortRegisters,
    overhead: LoopOverhead,
    cpu_hz: u32,
}

impl RegisterLine {
    /// # Safety
    ///
    /// All three pointers must be valid, aligned registers (or memory) for
    /// volatile `u32` writes for as long as the line lives, and nothing else
    /// may drive the bits this line is given.
    pub const unsafe fn new(registers: PortRegisters, overhead: LoopOverhead, cpu_hz: u32) -> Self {
        Self {
            registers,
            overhead,
            cpu_hz,
        }
    }

    pub const fn registers(&self) -> &PortRegisters {
        &self.registers
    }
}

impl PortLine for RegisterLine {
    fn overhead(&self) -> LoopOverhead {
        self.overhead
    }

    fn set_output(&mut self, mask: PinMask) {
        unsafe { write_volatile(self.registers.output_enable, mask) };
    }

    #[inline(always)]
    fn toggle(&mut self, mask: PinMask) {
        unsafe { write_volatile(self.registers.toggle, mask) };
    }

    fn set_low(&mut self, mask: PinMask) {
        unsafe { write_volatile(self.registers.clear, mask) };
    }

    #[inline(always)]
    fn spin(&mut self, cycles: u32) {
        spin_cycles(cycles);
    }

    fn delay_us(&mut self, us: u32) {
        let cycles = u64::from(us) * u64::from(self.cpu_hz) / 1_000_000;
        let mut remaining = cycles;
        while remaining > 0 {
            let chunk = u32::try_from(remaining).unwrap_or(u32::MAX);
            spin_cycles(chunk);
            remaining -= u64::from(chunk);
        }
    }
}

/// [`PortLine`] over any `embedded-hal` output pin and delay provider
///
/// Portable fallback, not timing accurate: every phase goes through a
/// `DelayNs` call and a HAL pin write, whose call overhead is unknown and
/// not subtracted. It works where the HAL delay and pin writes are fast
/// relative to the 350 ns 0-bit high phase; otherwise use [`RegisterLine`].
///
/// The pin is already a single output, so the mask only decides whether the
/// line is enabled. The level is tracked here so a toggle is one write, not
/// a read-back. Pin errors are dropped: there is nobody to report them to in
/// the middle of a frame.
pub struct HalLine<P, D> {
    pin: P,
    delay: D,
    cpu_hz: u32,
    high: bool,
}

impl<P, D> HalLine<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D, cpu_hz: u32) -> Self {
        Self {
            pin,
            delay,
            cpu_hz,
            high: false,
        }
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P, D> PortLine for HalLine<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    fn set_output(&mut self, mask: PinMask) {
        if mask != 0 {
            self.pin.set_low().ok();
            self.high = false;
        }
    }

    fn toggle(&mut self, mask: PinMask) {
        if mask == 0 {
            return;
        }
        if self.high {
            self.pin.set_low().ok();
        } else {
            self.pin.set_high().ok();
        }
        self.high = !self.high;
    }

    fn set_low(&mut self, mask: PinMask) {
        if mask != 0 {
            self.pin.set_low().ok();
            self.high = false;
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn spin(&mut self, cycles: u32) {
        if cycles == 0 {
            return;
        }
        let ns = cycles_to_ns(cycles, self.cpu_hz).min(u64::from(u32::MAX));
        self.delay.delay_ns(ns as u32);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
