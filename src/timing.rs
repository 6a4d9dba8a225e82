//! Pulse timing and cycle arithmetic.
//!
//! The receiver tells a 0-bit from a 1-bit only by the ratio of high time to
//! low time inside a ~1.25 µs window, and recognises the end of a frame only
//! by a long low period. Everything here converts those nanosecond targets
//! into idle-cycle counts for a given CPU clock so the output loop can be
//! reused across processor speeds.

use embassy_time::Duration;

use crate::line::LoopOverhead;

/// Width of a 1-bit high phase in ns
pub const T1H_NS: u32 = 900;
/// Width of a 1-bit low phase in ns
pub const T1L_NS: u32 = 350;
/// Width of a 0-bit high phase in ns
pub const T0H_NS: u32 = 350;
/// Width of a 0-bit low phase in ns
pub const T0L_NS: u32 = 500;

/// Low time used to latch a frame
pub const LATCH: Duration = Duration::from_micros(260);

/// Shortest low time receivers treat as end of frame
pub const LATCH_THRESHOLD: Duration = Duration::from_micros(50);

/// Allowed deviation of a realized pulse from its nominal width
pub const TOLERANCE_NS: u32 = 150;

const NS_PER_SECOND: u64 = 1_000_000_000;

/// Nominal pulse widths of the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// 1-bit high time, ns
    pub t1h: u32,
    /// 1-bit low time, ns
    pub t1l: u32,
    /// 0-bit high time, ns
    pub t0h: u32,
    /// 0-bit low time, ns
    pub t0l: u32,
    /// Low hold that latches the frame
    pub latch: Duration,
}

impl Timing {
    pub const WS2812: Self = Self {
        t1h: T1H_NS,
        t1l: T1L_NS,
        t0h: T0H_NS,
        t0l: T0L_NS,
        latch: LATCH,
    };

    /// Length of the widest bit window in ns
    pub const fn bit_window_ns(&self) -> u32 {
        let one = self.t1h + self.t1l;
        let zero = self.t0h + self.t0l;
        if one > zero { one } else { zero }
    }

    /// Latch hold in whole microseconds
    pub fn latch_us(&self) -> u32 {
        u32::try_from(self.latch.as_micros()).unwrap_or(u32::MAX)
    }

    /// Estimated time `pixel_count` pixels plus the latch keep the CPU busy
    ///
    /// Saturates at [`Duration::MAX`] instead of overflowing.
    pub fn frame_duration(&self, pixel_count: usize) -> Duration {
        let bits = u64::try_from(pixel_count).unwrap_or(u64::MAX).saturating_mul(24);
        let data_ns = bits.saturating_mul(u64::from(self.bit_window_ns()));
        let data = Duration::from_micros(data_ns.div_ceil(1000).min(Duration::MAX.as_micros()));
        data.checked_add(self.latch).unwrap_or(Duration::MAX)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::WS2812
    }
}

/// Convert a width in ns to whole CPU cycles, rounding down
#[allow(clippy::cast_possible_truncation)]
pub const fn ns_to_cycles(ns: u32, cpu_hz: u32) -> u32 {
    (ns as u64 * cpu_hz as u64 / NS_PER_SECOND) as u32
}

/// Convert CPU cycles to ns
pub const fn cycles_to_ns(cycles: u32, cpu_hz: u32) -> u64 {
    if cpu_hz == 0 {
        return 0;
    }
    cycles as u64 * NS_PER_SECOND / cpu_hz as u64
}

/// Idle cycles left for a phase once `overhead` cycles of loop work are paid
pub const fn delay_cycles(ns: u32, overhead: u32, cpu_hz: u32) -> u32 {
    ns_to_cycles(ns, cpu_hz).saturating_sub(overhead)
}

/// Check a realized width against its nominal value
pub const fn within_tolerance(nominal_ns: u32, realized_ns: u64) -> bool {
    realized_ns.abs_diff(nominal_ns as u64) <= TOLERANCE_NS as u64
}

/// Idle-cycle counts for every phase of a bit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PulseCycles {
    pub on1: u32,
    pub off1: u32,
    pub on0: u32,
    pub off0: u32,
    overhead: LoopOverhead,
    cpu_hz: u32,
}

impl PulseCycles {
    /// Compute idle counts for `timing` at `cpu_hz`
    ///
    /// `overhead` is the number of cycles the output loop itself spends in
    /// each phase; it is subtracted so the realized width stays on target.
    pub const fn for_clock(timing: &Timing, overhead: LoopOverhead, cpu_hz: u32) -> Self {
        Self {
            on1: delay_cycles(timing.t1h, overhead.on1, cpu_hz),
            off1: delay_cycles(timing.t1l, overhead.off1, cpu_hz),
            on0: delay_cycles(timing.t0h, overhead.on0, cpu_hz),
            off0: delay_cycles(timing.t0l, overhead.off0, cpu_hz),
            overhead,
            cpu_hz,
        }
    }

    pub const fn cpu_hz(&self) -> u32 {
        self.cpu_hz
    }

    /// Realized 1-bit high width in ns
    pub const fn realized_t1h(&self) -> u64 {
        cycles_to_ns(self.on1 + self.overhead.on1, self.cpu_hz)
    }

    /// Realized 1-bit low width in ns
    pub const fn realized_t1l(&self) -> u64 {
        cycles_to_ns(self.off1 + self.overhead.off1, self.cpu_hz)
    }

    /// Realized 0-bit high width in ns
    pub const fn realized_t0h(&self) -> u64 {
        cycles_to_ns(self.on0 + self.overhead.on0, self.cpu_hz)
    }

    /// Realized 0-bit low width in ns
    pub const fn realized_t0l(&self) -> u64 {
        cycles_to_ns(self.off0 + self.overhead.off0, self.cpu_hz)
    }

    /// Whether all four phases land inside the receiver tolerance
    ///
    /// Below about 16 MHz with a 5-cycle low-phase loop cost the 350 ns
    /// 1-bit low cannot be met: at 8 MHz it realizes as 625 ns. Strips
    /// usually still latch such bits correctly because only the high width
    /// decides the bit, see [`PulseCycles::high_phases_valid`].
    pub const fn all_phases_valid(&self, timing: &Timing) -> bool {
        self.high_phases_valid(timing)
            && within_tolerance(timing.t1l, self.realized_t1l())
            && within_tolerance(timing.t0l, self.realized_t0l())
    }

    /// Whether both high phases land inside the receiver tolerance
    ///
    /// Low phases have enough slack that only the high widths decide how a
    /// bit is classified.
    pub const fn high_phases_valid(&self, timing: &Timing) -> bool {
        within_tolerance(timing.t1h, self.realized_t1h())
            && within_tolerance(timing.t0h, self.realized_t0h())
    }
}
