#![no_std]

mod log;

pub mod color;
pub mod driver;
pub mod encoder;
pub mod error;
pub mod line;
pub mod sim;
pub mod spin;
pub mod store;
pub mod timing;

pub use color::{GrbPixel, Rgb};
pub use driver::Driver;
pub use encoder::PulseEncoder;
pub use error::{Error, Result};
pub use line::{HalLine, LineConfig, LoopOverhead, PinMask, PortRegisters, RegisterLine};
pub use sim::{Level, Pulse, RecordingLine};
pub use store::PixelStore;
pub use timing::{PulseCycles, Timing};

pub use embassy_time::Duration;

/// Output port capability the encoder runs on
///
/// Implement this trait to support different hardware platforms. The
/// encoder only ever touches the bit selected by `mask`.
pub trait PortLine {
    /// Cycles the platform's bit loop adds to each phase
    fn overhead(&self) -> LoopOverhead {
        LoopOverhead::NONE
    }

    /// Configure the masked bit as an output
    fn set_output(&mut self, mask: PinMask);

    /// Flip the masked bit
    ///
    /// Must complete in a short, fixed number of cycles.
    fn toggle(&mut self, mask: PinMask);

    /// Drive the masked bit low
    fn set_low(&mut self, mask: PinMask);

    /// Busy-wait `cycles` CPU cycles, rounding down rather than overshooting
    fn spin(&mut self, cycles: u32);

    /// Wait at least `us` microseconds
    fn delay_us(&mut self, us: u32);

    /// Run `f` with interrupts held off
    ///
    /// Wraps the high phase of every 0-bit. Interrupt state is restored as
    /// soon as `f` returns.
    fn without_interrupts<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        critical_section::with(|_| f(self))
    }
}
