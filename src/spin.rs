//! Cycle-counted busy wait
//!
//! A countdown loop of known length per iteration. Unlike a delay call it has
//! no setup cost beyond loading the counter, so idle counts of a few cycles
//! stay accurate. Cycles that do not fill a whole iteration are dropped,
//! which keeps a phase at or below its target width.

#[cfg(any(target_arch = "arm", target_arch = "riscv32"))]
use core::arch::asm;

/// Cycles one iteration of the countdown loop takes
///
/// `subs` + taken `bne` on Cortex-M0+/M3/M4.
#[cfg(target_arch = "arm")]
pub const CYCLES_PER_LOOP: u32 = 3;

/// `addi` + taken `bnez` on single-issue RV32 cores
#[cfg(target_arch = "riscv32")]
pub const CYCLES_PER_LOOP: u32 = 2;

/// Hosts have no fixed cost per iteration; one spin hint per cycle
#[cfg(not(any(target_arch = "arm", target_arch = "riscv32")))]
pub const CYCLES_PER_LOOP: u32 = 1;

/// Whether [`spin_cycles`] is backed by a counted instruction loop
pub const CYCLE_ACCURATE: bool = cfg!(any(target_arch = "arm", target_arch = "riscv32"));

/// Number of loop iterations that fit in `cycles`
pub const fn loops_for(cycles: u32) -> u32 {
    cycles / CYCLES_PER_LOOP
}

/// Busy-wait for about `cycles` CPU cycles, never longer
#[inline(always)]
pub fn spin_cycles(cycles: u32) {
    let loops = loops_for(cycles);
    if loops == 0 {
        return;
    }
    spin_loops(loops);
}

#[cfg(target_arch = "arm")]
#[inline(always)]
fn spin_loops(loops: u32) {
    unsafe {
        asm!(
            "2:",
            "subs {0}, #1",
            "bne 2b",
            inout(reg) loops => _,
            options(nomem, nostack),
        );
    }
}

#[cfg(target_arch = "riscv32")]
#[inline(always)]
fn spin_loops(loops: u32) {
    unsafe {
        asm!(
            "2:",
            "addi {0}, {0}, -1",
            "bnez {0}, 2b",
            inout(reg) loops => _,
            options(nomem, nostack),
        );
    }
}

#[cfg(not(any(target_arch = "arm", target_arch = "riscv32")))]
#[inline(always)]
fn spin_loops(loops: u32) {
    for _ in 0..loops {
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loops_round_down() {
        assert_eq!(loops_for(0), 0);
        assert_eq!(loops_for(CYCLES_PER_LOOP - 1), 0);
        assert_eq!(loops_for(CYCLES_PER_LOOP * 4 + 1), 4);
    }

    #[test]
    fn test_spin_returns() {
        spin_cycles(0);
        spin_cycles(1000);
    }
}
