//! Strip driver
//!
//! Owns the output line, its configuration and the optional pixel buffer.
//! The driver is either unbuffered, where pixels are streamed straight
//! through [`Driver::send_one`] and closed with [`Driver::latch`], or
//! buffered, where colors are written into the store and flushed with
//! [`Driver::send_all`]. Only [`Driver::initialize`] moves between the two.

use core::convert::Infallible;

use embassy_time::Duration;
use smart_leds::SmartLedsWrite;

use crate::PortLine;
use crate::color::{BLACK, GrbPixel, Rgb};
use crate::encoder::PulseEncoder;
use crate::error::{Error, Result};
use crate::line::{LineConfig, PORT_WIDTH};
use crate::log::trace;
use crate::store::PixelStore;
use crate::timing::{LATCH_THRESHOLD, PulseCycles, Timing};

/// WS2812 driver for one output line
///
/// CAPACITY is the largest buffered strip this driver can hold.
pub struct Driver<L: PortLine, const CAPACITY: usize> {
    line: L,
    cpu_hz: u32,
    timing: Timing,
    config: LineConfig,
    encoder: PulseEncoder,
    store: PixelStore<CAPACITY>,
}

impl<L: PortLine, const CAPACITY: usize> Driver<L, CAPACITY> {
    /// Create a driver for a CPU running at `cpu_hz` with WS2812 timings
    ///
    /// Nothing is written to the line until [`Driver::initialize`].
    pub fn new(line: L, cpu_hz: u32) -> Self {
        Self::with_timing(line, cpu_hz, Timing::WS2812)
    }

    /// Create a driver with custom pulse timings
    ///
    /// A latch shorter than [`LATCH_THRESHOLD`] would never end the frame, so
    /// it is raised to the threshold.
    pub fn with_timing(line: L, cpu_hz: u32, mut timing: Timing) -> Self {
        if timing.latch < LATCH_THRESHOLD {
            trace!(
                "tinypixel: latch of {} us is below threshold, using {} us",
                timing.latch.as_micros(),
                LATCH_THRESHOLD.as_micros()
            );
            timing.latch = LATCH_THRESHOLD;
        }
        let config = LineConfig::default();
        let encoder = Self::encoder_for(&line, &config, &timing, cpu_hz);
        Self {
            line,
            cpu_hz,
            timing,
            config,
            encoder,
            store: PixelStore::new(),
        }
    }

    fn encoder_for(line: &L, config: &LineConfig, timing: &Timing, cpu_hz: u32) -> PulseEncoder {
        let cycles = PulseCycles::for_clock(timing, line.overhead(), cpu_hz);
        PulseEncoder::new(config.mask(), cycles, timing.latch_us())
    }

    /// Set up `pin` as the data line and choose buffered or unbuffered mode
    ///
    /// Blanks the first pixel and latches so the line starts from a known
    /// idle state. With `buffered` a zeroed buffer of `pixel_count` pixels is
    /// allocated (clamped to CAPACITY); a different count discards old
    /// contents. Without it any existing buffer is freed.
    pub fn initialize(&mut self, pin: u8, pixel_count: usize, buffered: bool) {
        let config = LineConfig::new(pin, pixel_count);
        if !config.is_valid() {
            trace!("tinypixel: pin {} is not on the port, line disabled", pin);
        }
        self.config = config;
        self.encoder = Self::encoder_for(&self.line, &self.config, &self.timing, self.cpu_hz);

        self.line.set_output(self.config.mask());
        self.encoder.send_pixel(&mut self.line, BLACK);
        self.encoder.latch(&mut self.line);

        if !buffered {
            if self.store.is_allocated() {
                trace!("tinypixel: freeing pixel buffer");
            }
            self.store.free();
            return;
        }

        if self.store.is_allocated() && self.store.len() == pixel_count.min(CAPACITY) {
            self.config = self.config.with_pixel_count(self.store.len());
            return;
        }
        let allocated = self.store.allocate(pixel_count);
        if allocated < pixel_count {
            trace!(
                "tinypixel: {} pixels requested, buffer clamped to {}",
                pixel_count,
                allocated
            );
        }
        self.config = self.config.with_pixel_count(allocated);
        trace!("tinypixel: allocated buffer of {} pixels", allocated);
    }

    /// Strict variant of [`Driver::initialize`]
    ///
    /// Fails without touching the line if the pin does not exist or the
    /// buffer would not fit.
    pub fn try_initialize(&mut self, pin: u8, pixel_count: usize, buffered: bool) -> Result<()> {
        if pin >= PORT_WIDTH {
            return Err(Error::InvalidPin(pin));
        }
        if buffered && pixel_count > CAPACITY {
            return Err(Error::CapacityExceeded {
                requested: pixel_count,
                capacity: CAPACITY,
            });
        }
        self.initialize(pin, pixel_count, buffered);
        Ok(())
    }

    /// Encode and send a single pixel
    pub fn send_one(&mut self, color: Rgb) {
        self.encoder.send_pixel(&mut self.line, color);
    }

    /// Send a pixel that is already in wire order
    pub fn send_grb(&mut self, pixel: GrbPixel) {
        self.encoder.send_grb(&mut self.line, pixel);
    }

    /// End the frame
    pub fn latch(&mut self) {
        self.encoder.latch(&mut self.line);
    }

    /// Write `color` into the buffer at `index`
    ///
    /// Ignored without a buffer or when `index` is out of range.
    pub fn set_at(&mut self, index: usize, color: Rgb) {
        self.store.set(index, color);
    }

    /// Write a wire-ordered pixel into the buffer at `index`
    pub fn set_grb_at(&mut self, index: usize, pixel: GrbPixel) {
        self.store.set(index, pixel.into());
    }

    pub fn try_set_at(&mut self, index: usize, color: Rgb) -> Result<()> {
        if !self.store.is_allocated() {
            return Err(Error::NotBuffered);
        }
        if self.store.set(index, color) {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                count: self.store.len(),
            })
        }
    }

    /// Fill the whole buffer with `color`
    pub fn set_all(&mut self, color: Rgb) {
        self.store.fill(color);
    }

    pub fn try_set_all(&mut self, color: Rgb) -> Result<()> {
        if !self.store.is_allocated() {
            return Err(Error::NotBuffered);
        }
        self.store.fill(color);
        Ok(())
    }

    /// Send every buffered pixel in index order, then latch
    ///
    /// Blocks for the whole frame, see [`Driver::frame_duration`]. Does
    /// nothing without a buffer.
    pub fn send_all(&mut self) {
        if !self.store.is_allocated() {
            return;
        }
        for &color in self.store.as_slice() {
            self.encoder.send_pixel(&mut self.line, color);
        }
        self.encoder.latch(&mut self.line);
    }

    pub fn try_send_all(&mut self) -> Result<()> {
        if !self.store.is_allocated() {
            return Err(Error::NotBuffered);
        }
        self.send_all();
        Ok(())
    }

    /// Buffered color at `index`
    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.store.get(index)
    }

    /// Buffered colors, empty when unbuffered
    pub fn pixels(&self) -> &[Rgb] {
        self.store.as_slice()
    }

    pub fn pixel_count(&self) -> usize {
        self.config.pixel_count()
    }

    pub const fn is_buffered(&self) -> bool {
        self.store.is_allocated()
    }

    pub const fn config(&self) -> &LineConfig {
        &self.config
    }

    pub const fn timing(&self) -> &Timing {
        &self.timing
    }

    pub const fn cycles(&self) -> &PulseCycles {
        self.encoder.cycles()
    }

    /// Time a full [`Driver::send_all`] keeps the CPU busy
    pub fn frame_duration(&self) -> Duration {
        self.timing.frame_duration(self.store.len())
    }

    pub fn line(&self) -> &L {
        &self.line
    }

    pub fn line_mut(&mut self) -> &mut L {
        &mut self.line
    }

    /// Give the line back, dropping the buffer
    pub fn release(self) -> L {
        self.line
    }
}

impl<L: PortLine, const CAPACITY: usize> SmartLedsWrite for Driver<L, CAPACITY> {
    type Error = Infallible;
    type Color = Rgb;

    /// Stream colors unbuffered and latch
    fn write<T, I>(&mut self, iterator: T) -> core::result::Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        for color in iterator {
            self.send_one(color.into());
        }
        self.latch();
        Ok(())
    }
}
