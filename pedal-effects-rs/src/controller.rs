//! Active-effect ownership and hot-swap.
//!
//! [`PedalController`] owns the registry, the indicator frame and the
//! diagnostics boundary, and remembers which effect is active. The board
//! layer keeps it behind one lock shared by the audio context and the
//! control loop, so a hand-off (outgoing `cleanup`, incoming `setup`,
//! switching the active id) is never interleaved with an audio block.

use pedal_controls::{ControlSnapshot, Indicators, SelectorFilter};

use crate::diagnostics::{Diagnostics, Event};
use crate::effect::PollContext;
use crate::registry::{EffectId, EffectRegistry};

// ── Configuration ────────────────────────────────────────────────────

/// Controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PedalConfig {
    /// Audio channels handed to `setup`. Default: 1.
    pub channels: usize,
    /// Emit diagnostic events. Default: true.
    pub debug: bool,
    /// Run this effect and ignore the selector. Default: `None`.
    pub fixed_effect: Option<EffectId>,
    /// Consecutive reads a new selector code must survive. Default: 1.
    pub selector_settle_polls: u8,
}

impl Default for PedalConfig {
    fn default() -> Self {
        Self {
            channels: 1,
            debug: true,
            fixed_effect: None,
            selector_settle_polls: 1,
        }
    }
}

/// A completed switch between two effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Handoff {
    pub from: EffectId,
    pub to: EffectId,
}

// ── PedalController ──────────────────────────────────────────────────

/// Runs exactly one effect from `R` at a time.
pub struct PedalController<R: EffectRegistry> {
    registry: R,
    config: PedalConfig,
    selector: SelectorFilter,
    /// Always a resolved id, never `Unset`.
    active: EffectId,
    indicators: Indicators,
    diagnostics: Diagnostics,
}

impl<R: EffectRegistry> PedalController<R> {
    /// Pick the initial effect from the selector (or
    /// [`PedalConfig::fixed_effect`]) and set it up.
    ///
    /// Audio may be routed through [`audio_callback`](Self::audio_callback)
    /// as soon as this returns.
    pub fn start(mut registry: R, config: PedalConfig, controls: &ControlSnapshot) -> Self {
        let code = controls.selector_code();
        let active = config
            .fixed_effect
            .unwrap_or(EffectId::from_code(code))
            .resolved();
        let diagnostics = Diagnostics::new(config.debug);
        let mut indicators = Indicators::new();

        let effect = registry.resolve(active);
        diagnostics.emit(Event::Starting {
            effect: effect.name(),
            detent: code.detent(),
        });
        let mut ctx = PollContext {
            controls,
            indicators: &mut indicators,
            diagnostics: &diagnostics,
        };
        effect.setup(config.channels, &mut ctx);

        Self {
            registry,
            selector: SelectorFilter::new(config.selector_settle_polls, code),
            config,
            active,
            indicators,
            diagnostics,
        }
    }

    /// One control-loop iteration.
    ///
    /// Switches effects first if the selector moved to a different one,
    /// then runs the active effect's `poll`. Returns the hand-off, if one
    /// happened.
    pub fn poll(&mut self, controls: &ControlSnapshot) -> Option<Handoff> {
        let handoff = self.follow_selector(controls);

        let mut ctx = PollContext {
            controls,
            indicators: &mut self.indicators,
            diagnostics: &self.diagnostics,
        };
        self.registry.resolve(self.active).poll(&mut ctx);
        handoff
    }

    /// Process one audio block with the active effect.
    pub fn audio_callback(&mut self, input: &[&[f32]], output: &mut [&mut [f32]]) {
        self.registry
            .resolve(self.active)
            .audio_callback(input, output);
    }

    fn follow_selector(&mut self, controls: &ControlSnapshot) -> Option<Handoff> {
        if self.config.fixed_effect.is_some() {
            return None;
        }
        let code = self.selector.update(controls.selector_code())?;
        let next = EffectId::from_code(code).resolved();
        if next == self.active {
            return None;
        }
        let from = self.active;

        let mut ctx = PollContext {
            controls,
            indicators: &mut self.indicators,
            diagnostics: &self.diagnostics,
        };

        let outgoing = self.registry.resolve(from);
        let from_name = outgoing.name();
        outgoing.cleanup(&mut ctx);
        ctx.indicators.clear();

        let incoming = self.registry.resolve(next);
        self.diagnostics.emit(Event::Switching {
            from: from_name,
            to: incoming.name(),
        });
        incoming.setup(self.config.channels, &mut ctx);
        self.active = next;

        Some(Handoff { from, to: next })
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Identifier of the running effect.
    pub fn active(&self) -> EffectId {
        self.active
    }

    /// Diagnostic name of the running effect.
    pub fn name(&mut self) -> &'static str {
        self.registry.resolve(self.active).name()
    }

    /// Indicator frame to apply to the LEDs.
    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Effect;
    use pedal_controls::Led;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Setup,
        Cleanup,
        Audio,
        Poll,
    }

    type Log = Rc<RefCell<Vec<(&'static str, Call)>>>;

    /// Records every lifecycle call and refuses audio before `setup`.
    struct Stub {
        name: &'static str,
        led: Led,
        marker: f32,
        ready: bool,
        log: Log,
    }

    impl Effect for Stub {
        fn setup(&mut self, _channels: usize, ctx: &mut PollContext<'_>) {
            self.log.borrow_mut().push((self.name, Call::Setup));
            ctx.indicators.set(self.led, 1);
            self.ready = true;
        }

        fn cleanup(&mut self, _ctx: &mut PollContext<'_>) {
            // Leaves its indicator lit on purpose.
            self.log.borrow_mut().push((self.name, Call::Cleanup));
            self.ready = false;
        }

        fn audio_callback(&mut self, _input: &[&[f32]], output: &mut [&mut [f32]]) {
            assert!(self.ready, "{} received audio before setup", self.name);
            self.log.borrow_mut().push((self.name, Call::Audio));
            for channel in output.iter_mut() {
                channel.fill(self.marker);
            }
        }

        fn poll(&mut self, _ctx: &mut PollContext<'_>) {
            self.log.borrow_mut().push((self.name, Call::Poll));
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    struct StubRegistry {
        effects: [Stub; 3],
    }

    impl StubRegistry {
        fn new(log: &Log) -> Self {
            let stub = |name, led, marker| Stub {
                name,
                led,
                marker,
                ready: false,
                log: Rc::clone(log),
            };
            Self {
                effects: [
                    stub("hw", Led::One, 1.0),
                    stub("echo", Led::Two, 2.0),
                    stub("bypass", Led::Three, 3.0),
                ],
            }
        }
    }

    impl EffectRegistry for StubRegistry {
        fn resolve(&mut self, id: EffectId) -> &mut dyn Effect {
            let index = match id.resolved() {
                EffectId::HwTest => 0,
                EffectId::SingleEcho => 1,
                EffectId::Bypass | EffectId::Unset => 2,
            };
            &mut self.effects[index]
        }
    }

    fn selecting(code: u8) -> ControlSnapshot {
        ControlSnapshot {
            selector: [code & 8 != 0, code & 4 != 0, code & 2 != 0, code & 1 != 0],
            ..ControlSnapshot::default()
        }
    }

    fn run_block(controller: &mut PedalController<StubRegistry>) -> f32 {
        let input: [f32; 1] = [0.0];
        let mut out = [0.0f32];
        {
            let inp: [&[f32]; 1] = [&input];
            let mut output: [&mut [f32]; 1] = [&mut out];
            controller.audio_callback(&inp, &mut output);
        }
        out[0]
    }

    fn start(code: u8, config: PedalConfig) -> (PedalController<StubRegistry>, Log) {
        let log = Log::default();
        let controller = PedalController::start(StubRegistry::new(&log), config, &selecting(code));
        (controller, log)
    }

    // ── Startup ──────────────────────────────────────────────────────

    #[test]
    fn start_sets_up_selected_effect() {
        let (controller, log) = start(1, PedalConfig::default());
        assert_eq!(controller.active(), EffectId::SingleEcho);
        assert_eq!(*log.borrow(), vec![("echo", Call::Setup)]);
        assert_eq!(controller.indicators().get(Led::Two), 1);
        assert_eq!(controller.diagnostics().emitted(), 1);
    }

    #[test]
    fn unknown_code_starts_fallback() {
        let (mut controller, log) = start(13, PedalConfig::default());
        assert_eq!(controller.active(), EffectId::Bypass);
        assert_eq!(controller.name(), "bypass");
        assert_eq!(*log.borrow(), vec![("bypass", Call::Setup)]);
    }

    #[test]
    fn fixed_effect_ignores_selector() {
        let config = PedalConfig {
            fixed_effect: Some(EffectId::HwTest),
            ..PedalConfig::default()
        };
        let (mut controller, log) = start(1, config);
        assert_eq!(controller.active(), EffectId::HwTest);

        assert_eq!(controller.poll(&selecting(2)), None);
        assert_eq!(controller.active(), EffectId::HwTest);
        assert_eq!(*log.borrow(), vec![("hw", Call::Setup), ("hw", Call::Poll)]);
    }

    // ── Hand-off ─────────────────────────────────────────────────────

    #[test]
    fn unchanged_selector_only_polls() {
        let (mut controller, log) = start(1, PedalConfig::default());
        for _ in 0..3 {
            assert_eq!(controller.poll(&selecting(1)), None);
        }
        assert_eq!(
            *log.borrow(),
            vec![
                ("echo", Call::Setup),
                ("echo", Call::Poll),
                ("echo", Call::Poll),
                ("echo", Call::Poll),
            ]
        );
    }

    #[test]
    fn handoff_cleans_up_before_setup() {
        let (mut controller, log) = start(1, PedalConfig::default());
        let handoff = controller.poll(&selecting(0));

        assert_eq!(
            handoff,
            Some(Handoff {
                from: EffectId::SingleEcho,
                to: EffectId::HwTest,
            })
        );
        assert_eq!(
            *log.borrow(),
            vec![
                ("echo", Call::Setup),
                ("echo", Call::Cleanup),
                ("hw", Call::Setup),
                ("hw", Call::Poll),
            ]
        );
        assert_eq!(controller.diagnostics().emitted(), 2);
    }

    #[test]
    fn audio_follows_active_effect() {
        let (mut controller, log) = start(1, PedalConfig::default());
        assert_eq!(run_block(&mut controller), 2.0);

        controller.poll(&selecting(0));
        assert_eq!(run_block(&mut controller), 1.0);

        controller.poll(&selecting(7));
        assert_eq!(run_block(&mut controller), 3.0);

        // Every audio block landed on an effect that had been set up.
        let log = log.borrow();
        for (i, &(name, call)) in log.iter().enumerate() {
            if call == Call::Audio {
                let last_lifecycle = log[..i]
                    .iter()
                    .rev()
                    .find(|(n, c)| *n == name && matches!(c, Call::Setup | Call::Cleanup));
                assert_eq!(last_lifecycle.map(|&(_, c)| c), Some(Call::Setup));
            }
        }
    }

    #[test]
    fn handoff_clears_outgoing_indicators() {
        let (mut controller, _log) = start(1, PedalConfig::default());
        controller.poll(&selecting(0));
        assert_eq!(controller.indicators().get(Led::Two), 0);
        assert_eq!(controller.indicators().get(Led::One), 1);
        assert_eq!(controller.indicators().lit_count(), 1);
    }

    #[test]
    fn codes_resolving_to_same_effect_do_not_switch() {
        // 2 is Bypass; 5 and 9 are unused and fall back to Bypass.
        let (mut controller, log) = start(2, PedalConfig::default());
        assert_eq!(controller.poll(&selecting(5)), None);
        assert_eq!(controller.poll(&selecting(9)), None);
        assert_eq!(controller.active(), EffectId::Bypass);
        assert!(!log.borrow().iter().any(|&(_, c)| c == Call::Cleanup));
    }

    #[test]
    fn settle_polls_delay_switch() {
        let config = PedalConfig {
            selector_settle_polls: 3,
            ..PedalConfig::default()
        };
        let (mut controller, _log) = start(1, config);

        assert_eq!(controller.poll(&selecting(0)), None);
        // Transient code in between restarts the count.
        assert_eq!(controller.poll(&selecting(3)), None);
        assert_eq!(controller.poll(&selecting(0)), None);
        assert_eq!(controller.poll(&selecting(0)), None);
        assert!(controller.poll(&selecting(0)).is_some());
        assert_eq!(controller.active(), EffectId::HwTest);
    }

    #[test]
    fn quiet_diagnostics_emit_nothing() {
        let config = PedalConfig {
            debug: false,
            ..PedalConfig::default()
        };
        let (mut controller, _log) = start(1, config);
        controller.poll(&selecting(0));
        assert_eq!(controller.diagnostics().emitted(), 0);
    }

    // ── With the pedal's effects ─────────────────────────────────────

    mod pedal {
        use super::*;
        use crate::echo::{EchoConfig, SingleEcho};
        use crate::registry::Registry;
        use crate::tempo::{TapTempo, TempoConfig};

        #[test]
        fn echo_to_hw_test_and_back() {
            let tempo = TapTempo::new(TempoConfig::default()).unwrap();
            let mut buffer = vec![0.0f32; 96_000];
            let echo = SingleEcho::new(EchoConfig::default(), &mut buffer, &tempo).unwrap();

            let mut controls = selecting(1);
            controls.pots = [1023, 1023, 0, 0];
            let mut controller =
                PedalController::start(Registry::new(echo), PedalConfig::default(), &controls);
            assert_eq!(controller.name(), "SingleEcho");
            assert_eq!(controller.registry().single_echo().delay_samples(), 32_000);
            assert_eq!(controller.indicators().levels(), [128, 0, 0, 0]);

            // Fill some of the delay line.
            let block: [f32; 4] = [0.5, 0.25, -0.25, 0.125];
            let mut out = [0.0f32; 4];
            {
                let inp: [&[f32]; 1] = [&block];
                let mut output: [&mut [f32]; 1] = [&mut out];
                controller.audio_callback(&inp, &mut output);
            }
            assert_eq!(out, block);
            assert!(controller
                .registry()
                .single_echo()
                .delay_line()
                .samples()
                .iter()
                .any(|&s| s != 0.0));

            // Switch to the hardware test with SPST 2 closed.
            let mut controls = selecting(0);
            controls.spst = [false, true, false, false];
            let handoff = controller.poll(&controls);
            assert_eq!(handoff.map(|h| h.to), Some(EffectId::HwTest));
            assert!(controller
                .registry()
                .single_echo()
                .delay_line()
                .samples()
                .iter()
                .all(|&s| s == 0.0));
            assert_eq!(controller.indicators().levels(), [0, 255, 0, 0]);

            // Back to the echo in dotted-eighth.
            let mut controls = selecting(1);
            controls.spdt = [[true, false], [false, false]];
            controller.poll(&controls);
            assert_eq!(controller.active(), EffectId::SingleEcho);
            assert_eq!(controller.registry().single_echo().delay_samples(), 24_000);
            assert_eq!(controller.indicators().levels(), [0, 128, 0, 0]);
        }
    }
}
