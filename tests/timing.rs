mod tests {
    use tinypixel::{Duration, LoopOverhead};
    use tinypixel::timing::{LATCH, PulseCycles, T0H_NS, T1H_NS, Timing, within_tolerance};

    const AVR: LoopOverhead = LoopOverhead::AVR;

    #[test]
    fn test_cycles_at_16mhz() {
        let cycles = PulseCycles::for_clock(&Timing::WS2812, AVR, 16_000_000);
        assert_eq!(cycles.on1, 12);
        assert_eq!(cycles.off1, 0);
        assert_eq!(cycles.on0, 4);
        assert_eq!(cycles.off0, 3);

        assert_eq!(cycles.realized_t1h(), 875);
        assert_eq!(cycles.realized_t0h(), 312);
        assert_eq!(cycles.realized_t0l(), 500);
    }

    #[test]
    fn test_cycles_without_overhead() {
        let cycles = PulseCycles::for_clock(&Timing::WS2812, LoopOverhead::NONE, 16_000_000);
        assert_eq!(cycles.on1, 14);
        assert_eq!(cycles.off1, 5);
        assert_eq!(cycles.on0, 5);
        assert_eq!(cycles.off0, 8);
    }

    #[test]
    fn test_high_phases_within_tolerance() {
        for cpu_hz in [8_000_000, 16_000_000, 20_000_000] {
            let cycles = PulseCycles::for_clock(&Timing::WS2812, AVR, cpu_hz);
            assert!(cycles.high_phases_valid(&Timing::WS2812), "{cpu_hz} Hz");
        }
    }

    #[test]
    fn test_all_phases_within_tolerance_at_16mhz_and_up() {
        for cpu_hz in [16_000_000, 20_000_000, 48_000_000] {
            let timing = Timing::WS2812;
            let cycles = PulseCycles::for_clock(&timing, AVR, cpu_hz);
            assert!(within_tolerance(timing.t1h, cycles.realized_t1h()));
            assert!(within_tolerance(timing.t1l, cycles.realized_t1l()));
            assert!(within_tolerance(timing.t0h, cycles.realized_t0h()));
            assert!(within_tolerance(timing.t0l, cycles.realized_t0l()));
            assert!(cycles.all_phases_valid(&timing));
        }
    }

    #[test]
    fn test_low_phases_out_of_reach_at_8mhz() {
        let timing = Timing::WS2812;
        let cycles = PulseCycles::for_clock(&timing, AVR, 8_000_000);
        assert_eq!(cycles.off1, 0);
        assert_eq!(cycles.realized_t1l(), 625);
        assert!(!within_tolerance(timing.t1l, cycles.realized_t1l()));
        assert!(cycles.high_phases_valid(&timing));
        assert!(!cycles.all_phases_valid(&timing));
    }

    #[test]
    fn test_cycles_scale_with_clock() {
        let slow = PulseCycles::for_clock(&Timing::WS2812, AVR, 16_000_000);
        let fast = PulseCycles::for_clock(&Timing::WS2812, AVR, 32_000_000);
        assert!(fast.on1 > slow.on1);
        assert!(fast.on0 > slow.on0);
        assert_eq!(fast.cpu_hz(), 32_000_000);
    }

    #[test]
    fn test_nominal_ratios() {
        let timing = Timing::WS2812;
        assert!(timing.t1h > timing.t1l);
        assert!(timing.t0l > timing.t0h);
        assert_eq!(timing.t1h, T1H_NS);
        assert_eq!(timing.t0h, T0H_NS);
        assert_eq!(timing.bit_window_ns(), 1250);
    }

    #[test]
    fn test_latch_and_frame_duration() {
        let timing = Timing::WS2812;
        assert_eq!(timing.latch, LATCH);
        assert_eq!(timing.latch_us(), 260);
        assert_eq!(timing.frame_duration(0).as_micros(), 260);
        assert_eq!(timing.frame_duration(10).as_micros(), 560);
    }

    #[test]
    fn test_frame_duration_saturates() {
        let timing = Timing::WS2812;
        assert!(timing.frame_duration(usize::MAX) > timing.frame_duration(1_000_000));

        let endless = Timing {
            latch: Duration::MAX,
            ..Timing::WS2812
        };
        assert_eq!(endless.frame_duration(8), Duration::MAX);
    }

    #[test]
    fn test_tolerance_bounds() {
        assert!(within_tolerance(350, 500));
        assert!(within_tolerance(350, 200));
        assert!(!within_tolerance(350, 501));
        assert!(!within_tolerance(900, 749));
    }
}
