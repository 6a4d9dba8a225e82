mod tests {
    use heapless::Vec;
    use tinypixel::timing::{LATCH_THRESHOLD, PulseCycles, Timing};
    use tinypixel::{
        GrbPixel, Level, LoopOverhead, PinMask, PortLine, Pulse, PulseEncoder, RecordingLine, Rgb,
    };

    const CPU_HZ: u32 = 16_000_000;
    const MASK: u32 = 1 << 2;

    fn setup() -> (PulseEncoder, RecordingLine<128>) {
        let cycles = PulseCycles::for_clock(&Timing::WS2812, LoopOverhead::NONE, CPU_HZ);
        let encoder = PulseEncoder::new(MASK, cycles, Timing::WS2812.latch_us());
        let mut line = RecordingLine::new(CPU_HZ);
        line.set_output(MASK);
        (encoder, line)
    }

    #[test]
    fn test_pixel_is_24_high_low_pairs() {
        let (encoder, mut line) = setup();
        encoder.send_pixel(&mut line, Rgb::new(0x12, 0x34, 0x56));
        line.flush();

        let pulses = line.pulses();
        assert_eq!(pulses.len(), 48);
        assert_eq!(line.toggles(), 48);
        for pair in pulses.chunks(2) {
            assert_eq!(pair[0].level, Level::High);
            assert_eq!(pair[1].level, Level::Low);
        }
        assert_eq!(line.level(), Level::Low);
    }

    #[test]
    fn test_wire_order_is_grb_msb_first() {
        let (encoder, mut line) = setup();
        encoder.send_pixel(&mut line, Rgb::new(0xAA, 0x0F, 0x81));
        line.flush();
        assert_eq!(line.decode::<3>().as_slice(), &[0x0F, 0xAA, 0x81]);
    }

    #[test]
    fn test_one_bits_are_long_high() {
        let (encoder, mut line) = setup();
        encoder.send_pixel(&mut line, Rgb::new(0, 0xFF, 0));
        line.flush();

        // Green goes first, so the first 8 bits are ones and the rest zeros
        let pulses = line.pulses();
        for pair in pulses[..16].chunks(2) {
            assert!(pair[0].duration_ns > pair[1].duration_ns);
            assert_eq!(pair[0].duration_ns, 875);
        }
        for pair in pulses[16..].chunks(2) {
            assert!(pair[1].duration_ns > pair[0].duration_ns);
            assert_eq!(pair[1].duration_ns, 500);
        }
    }

    #[test]
    fn test_latch_holds_low_without_toggles() {
        let (encoder, mut line) = setup();
        encoder.send_pixel(&mut line, Rgb::new(1, 2, 3));
        line.clear();

        encoder.latch(&mut line);
        line.flush();

        assert_eq!(line.toggles(), 0);
        assert_eq!(
            line.pulses(),
            &[Pulse {
                level: Level::Low,
                duration_ns: 260_000
            }]
        );
        assert!(line.pulses()[0].duration_ns > LATCH_THRESHOLD.as_micros() * 1000);
    }

    #[test]
    fn test_latch_closes_last_bit() {
        let (encoder, mut line) = setup();
        encoder.send_pixel(&mut line, Rgb::new(0, 0, 0));
        encoder.latch(&mut line);
        line.flush();

        let pulses = line.pulses();
        assert_eq!(pulses.len(), 49);
        assert_eq!(pulses[47].duration_ns, 500);
        assert_eq!(pulses[48].duration_ns, 260_000);
    }

    #[test]
    fn test_other_bits_untouched() {
        let (encoder, mut line) = setup();
        line.clear();
        let other = PulseEncoder::new(1 << 5, *encoder.cycles(), 260);
        other.send_pixel(&mut line, Rgb::new(255, 255, 255));
        assert_eq!(line.toggles(), 0);
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        Toggle,
        Spin(u32),
    }

    /// Logs every toggle and spin together with whether interrupts were held
    #[derive(Default)]
    struct SectionLine {
        masked: bool,
        sections: usize,
        ops: Vec<(Op, bool), 128>,
    }

    impl PortLine for SectionLine {
        fn set_output(&mut self, _mask: PinMask) {}

        fn toggle(&mut self, _mask: PinMask) {
            self.ops.push((Op::Toggle, self.masked)).ok();
        }

        fn set_low(&mut self, _mask: PinMask) {}

        fn spin(&mut self, cycles: u32) {
            self.ops.push((Op::Spin(cycles), self.masked)).ok();
        }

        fn delay_us(&mut self, _us: u32) {}

        fn without_interrupts<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
            assert!(!self.masked, "sections must not nest");
            self.sections += 1;
            self.masked = true;
            let result = f(self);
            self.masked = false;
            result
        }
    }

    #[test]
    fn test_only_zero_bit_high_phase_holds_interrupts() {
        let (encoder, _) = setup();
        let cycles = *encoder.cycles();
        let mut line = SectionLine::default();

        // 1010_0000 then two zero bytes
        encoder.send_grb(&mut line, GrbPixel::new(0xA0, 0, 0));

        assert_eq!(line.ops.len(), 24 * 4);
        assert_eq!(line.sections, 22);
        for (bit, ops) in line.ops.chunks(4).enumerate() {
            if bit == 0 || bit == 2 {
                assert_eq!(
                    ops,
                    &[
                        (Op::Toggle, false),
                        (Op::Spin(cycles.on1), false),
                        (Op::Toggle, false),
                        (Op::Spin(cycles.off1), false),
                    ],
                    "bit {bit}"
                );
            } else {
                assert_eq!(
                    ops,
                    &[
                        (Op::Toggle, true),
                        (Op::Spin(cycles.on0), true),
                        (Op::Toggle, true),
                        (Op::Spin(cycles.off0), false),
                    ],
                    "bit {bit}"
                );
            }
        }
    }
}
