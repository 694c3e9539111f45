//! Hardware self-test.
//!
//! Passes audio through untouched and mirrors the control surface onto the
//! indicators so every switch, toggle and the test pot can be checked by
//! eye:
//!
//! ```text
//! SPST 1 ─► LED 1 (full when closed)
//! SPST 2 ─► LED 2 (full when closed)
//! POT  3 ─► LED 3 (brightness follows the knob)
//! SPDT 1 ─► LED 4 (off / half / full for A / B / C)
//! ```

use pedal_controls::{Led, Pot, Position, Spdt, Spst, Toggle, LED_FULL};

use crate::effect::{pass_through, Effect, PollContext};

const SWITCH_LEDS: [(Spst, Led); 2] = [(Spst::One, Led::One), (Spst::Two, Led::Two)];
const TEST_POT: Pot = Pot::Three;
const TEST_TOGGLE: Spdt = Spdt::One;

/// Control-surface checkout effect.
#[derive(Debug, Default)]
pub struct HwTest {
    toggle: Toggle,
}

impl HwTest {
    pub const fn new() -> Self {
        Self {
            toggle: Toggle::new(),
        }
    }

    /// 10-bit pot reading to LED brightness, unfiltered.
    fn pot_level(raw: u16) -> u8 {
        (raw / 4).min(u16::from(LED_FULL)) as u8
    }

    fn toggle_level(position: Position) -> u8 {
        match position {
            Position::A => 0,
            Position::B => LED_FULL / 2,
            Position::C => LED_FULL,
        }
    }

    fn mirror(&mut self, ctx: &mut PollContext<'_>) {
        let controls = ctx.controls;

        for (switch, led) in SWITCH_LEDS {
            let level = if controls.spst(switch) { LED_FULL } else { 0 };
            ctx.indicators.set(led, level);
        }

        ctx.indicators
            .set(Led::Three, Self::pot_level(controls.pot(TEST_POT)));

        let (first, second) = controls.spdt(TEST_TOGGLE);
        if let Some(position) = self.toggle.update(first, second) {
            ctx.indicators.set(Led::Four, Self::toggle_level(position));
        }
    }
}

impl Effect for HwTest {
    fn setup(&mut self, _channels: usize, ctx: &mut PollContext<'_>) {
        self.toggle.reset();
        self.mirror(ctx);
    }

    fn cleanup(&mut self, ctx: &mut PollContext<'_>) {
        ctx.indicators.clear();
    }

    fn audio_callback(&mut self, input: &[&[f32]], output: &mut [&mut [f32]]) {
        pass_through(input, output);
    }

    fn poll(&mut self, ctx: &mut PollContext<'_>) {
        self.mirror(ctx);
    }

    fn name(&self) -> &'static str {
        "HwTest"
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use pedal_controls::{ControlSnapshot, Indicators};

    fn drive(
        effect: &mut HwTest,
        indicators: &mut Indicators,
        controls: ControlSnapshot,
        setup: bool,
    ) {
        let diagnostics = Diagnostics::new(false);
        let mut ctx = PollContext {
            controls: &controls,
            indicators,
            diagnostics: &diagnostics,
        };
        if setup {
            effect.setup(1, &mut ctx);
        } else {
            effect.poll(&mut ctx);
        }
    }

    #[test]
    fn switches_light_their_leds() {
        let mut effect = HwTest::new();
        let mut leds = Indicators::new();
        drive(&mut effect, &mut leds, ControlSnapshot::default(), true);
        assert_eq!(leds.lit_count(), 0);

        let controls = ControlSnapshot {
            spst: [true, false, false, false],
            ..ControlSnapshot::default()
        };
        drive(&mut effect, &mut leds, controls, false);
        assert_eq!(leds.get(Led::One), LED_FULL);
        assert_eq!(leds.get(Led::Two), 0);
    }

    #[test]
    fn pot_sets_brightness() {
        let mut effect = HwTest::new();
        let mut leds = Indicators::new();
        let controls = ControlSnapshot {
            pots: [0, 0, 1023, 0],
            ..ControlSnapshot::default()
        };
        drive(&mut effect, &mut leds, controls, true);
        assert_eq!(leds.get(Led::Three), LED_FULL);

        let controls = ControlSnapshot {
            pots: [0, 0, 0, 0],
            ..ControlSnapshot::default()
        };
        drive(&mut effect, &mut leds, controls, false);
        assert_eq!(leds.get(Led::Three), 0);

        assert_eq!(HwTest::pot_level(700), 175);
    }

    #[test]
    fn toggle_positions_map_to_led_four() {
        let mut effect = HwTest::new();
        let mut leds = Indicators::new();
        let lines = [([false, false], 0), ([true, false], LED_FULL / 2), ([false, true], LED_FULL)];
        for (i, (spdt, expected)) in lines.into_iter().enumerate() {
            let controls = ControlSnapshot {
                spdt: [spdt, [false, false]],
                ..ControlSnapshot::default()
            };
            drive(&mut effect, &mut leds, controls, i == 0);
            assert_eq!(leds.get(Led::Four), expected);
        }
    }

    #[test]
    fn cleanup_turns_everything_off() {
        let mut effect = HwTest::new();
        let mut leds = Indicators::new();
        let controls = ControlSnapshot {
            spst: [true, true, false, false],
            spdt: [[false, true], [false, false]],
            pots: [0, 0, 700, 0],
            ..ControlSnapshot::default()
        };
        drive(&mut effect, &mut leds, controls, true);
        assert_eq!(leds.lit_count(), 4);

        let diagnostics = Diagnostics::new(false);
        let mut ctx = PollContext {
            controls: &controls,
            indicators: &mut leds,
            diagnostics: &diagnostics,
        };
        effect.cleanup(&mut ctx);
        assert_eq!(leds.lit_count(), 0);
        assert_eq!(effect.name(), "HwTest");
    }
}
