//! Tap-tempo single echo.
//!
//! A regenerative delay whose length follows the tapped tempo:
//!
//! ```text
//! dry ──┬──────────────────────────────(+)──× gain──► out
//!       │                               ▲
//!       └─►(+)──► delay line ──► wet ──×level
//!           ▲                     │
//!           └──────── ×decay ◄────┘
//! ```
//!
//! # Controls
//!
//! ```text
//! SPST 1   tap tempo
//! SPDT 1   delay type: quarter / dotted eighth / triplet
//! POT  1   effect level
//! POT  2   decay (feedback)
//! POT  3   output boost (only with a BoostConfig)
//! LED  1   quarter
//! LED  2   dotted eighth
//! LED  3   triplet
//! ```

mod config;
mod delay_type;

pub use config::{BoostConfig, EchoConfig, TapSource};
pub use delay_type::DelayType;

use pedal_controls::{Button, Knob, Led, Pot, Spdt, Spst, Toggle};

use crate::delay_line::DelayLine;
use crate::diagnostics::Event;
use crate::effect::{pass_through, Effect, PollContext};
use crate::error::ConfigError;
use crate::tempo::{TapOutcome, TapTempo};

/// Delay buffer length needed for the longest tap interval at the default
/// 96 kHz. Other rates need [`max_delay_samples`].
///
/// [`max_delay_samples`]: crate::TempoConfig::max_delay_samples
pub const DELAY_MAX_SAMPLES: usize = 96_000;

pub const TAP_BUTTON: Spst = Spst::One;
pub const TYPE_SWITCH: Spdt = Spdt::One;
pub const LEVEL_POT: Pot = Pot::One;
pub const DECAY_POT: Pot = Pot::Two;
pub const BOOST_POT: Pot = Pot::Three;

/// Indicators owned by the echo.
const TYPE_LEDS: [Led; 3] = [Led::One, Led::Two, Led::Three];

/// The tap-tempo echo effect.
pub struct SingleEcho<'a> {
    config: EchoConfig,
    delay_line: DelayLine<'a>,
    tempo: &'a TapTempo,

    tap_button: Button,
    type_switch: Toggle,
    level_knob: Knob,
    decay_knob: Knob,
    boost_knob: Option<Knob>,

    delay_type: DelayType,
    /// Base length the delay line was last set from.
    applied_base: u32,
    level: f32,
    decay: f32,
    gain: f32,
}

impl<'a> SingleEcho<'a> {
    /// Build the echo over `delay_buffer`, following `tempo`.
    ///
    /// `delay_buffer` should hold [`max_delay_samples`] samples; longer
    /// taps are clamped to its capacity.
    ///
    /// [`max_delay_samples`]: crate::TempoConfig::max_delay_samples
    ///
    /// # Errors
    ///
    /// Returns the result of [`EchoConfig::validate`], or
    /// [`ConfigError::DelayBufferTooShort`].
    pub fn new(
        config: EchoConfig,
        delay_buffer: &'a mut [f32],
        tempo: &'a TapTempo,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let boost_knob = match &config.boost {
            Some(boost) => Some(Knob::new(boost.knob)?),
            None => None,
        };

        Ok(Self {
            delay_line: DelayLine::new(delay_buffer)?,
            tempo,
            tap_button: Button::new(config.tap_debounce_ms),
            type_switch: Toggle::new(),
            level_knob: Knob::new(config.level)?,
            decay_knob: Knob::new(config.decay)?,
            boost_knob,
            delay_type: DelayType::Unset,
            applied_base: tempo.base_samples(),
            level: config.level.min_value,
            decay: config.decay.min_value,
            gain: 1.0,
            config,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn delay_type(&self) -> DelayType {
        self.delay_type
    }

    /// Current delay length in samples.
    pub fn delay_samples(&self) -> usize {
        self.delay_line.delay()
    }

    pub fn delay_line(&self) -> &DelayLine<'a> {
        &self.delay_line
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    /// Output gain (1.0 without a boost stage).
    pub fn gain(&self) -> f32 {
        self.gain
    }

    // ── Control handling ─────────────────────────────────────────────

    /// Re-apply the delay length if the tempo or type changed.
    fn sync_delay(&mut self) {
        let base = self.tempo.base_samples();
        if base != self.applied_base {
            self.applied_base = base;
            self.apply_delay();
        }
    }

    fn apply_delay(&mut self) {
        self.delay_line
            .set_delay(self.delay_type.scale(self.applied_base));
    }

    fn poll_tap(&mut self, ctx: &mut PollContext<'_>) {
        if self.config.tap_source != TapSource::Polled {
            return;
        }

        let tempo = self.tempo;
        let mut outcome = None;
        self.tap_button.poll(
            ctx.controls.spst(TAP_BUTTON),
            ctx.controls.now_ms,
            |now_ms| outcome = Some(tempo.tap(now_ms)),
        );

        match outcome {
            Some(TapOutcome::Recorded { interval_ms, .. }) => {
                self.sync_delay();
                ctx.diagnostics.emit(Event::TempoTapped {
                    interval_ms,
                    delay_samples: self.delay_samples() as u32,
                });
            }
            Some(TapOutcome::Reset) => ctx.diagnostics.emit(Event::TempoReset),
            None => {}
        }
    }

    fn poll_knobs(&mut self, ctx: &mut PollContext<'_>) {
        if let Some(level) = self.level_knob.update(ctx.controls.pot(LEVEL_POT)) {
            self.level = level;
        }
        if let Some(decay) = self.decay_knob.update(ctx.controls.pot(DECAY_POT)) {
            self.decay = decay;
        }
        if let (Some(knob), Some(boost)) = (self.boost_knob.as_mut(), self.config.boost.as_ref()) {
            if let Some(value) = knob.update(ctx.controls.pot(BOOST_POT)) {
                self.gain = boost.gain(value);
            }
        }
    }

    fn poll_type(&mut self, ctx: &mut PollContext<'_>) {
        let (first, second) = ctx.controls.spdt(TYPE_SWITCH);
        let Some(position) = self.type_switch.update(first, second) else {
            return;
        };
        let delay_type = DelayType::from_position(position);
        if delay_type == self.delay_type {
            return;
        }

        self.delay_type = delay_type;
        self.apply_delay();

        for led in TYPE_LEDS {
            ctx.indicators.off(led);
        }
        if let Some(led) = delay_type.indicator() {
            ctx.indicators.set(led, self.config.led_intensity);
        }

        ctx.diagnostics.emit(Event::DelayTypeChanged {
            delay_type,
            delay_samples: self.delay_samples() as u32,
        });
    }
}

impl Effect for SingleEcho<'_> {
    fn setup(&mut self, _channels: usize, ctx: &mut PollContext<'_>) {
        self.delay_line.reset();
        self.tempo.reseed();
        self.applied_base = self.tempo.base_samples();

        let controls = ctx.controls;
        self.level = self.level_knob.prime(controls.pot(LEVEL_POT));
        self.decay = self.decay_knob.prime(controls.pot(DECAY_POT));
        self.gain = match (self.boost_knob.as_mut(), self.config.boost.as_ref()) {
            (Some(knob), Some(boost)) => boost.gain(knob.prime(controls.pot(BOOST_POT))),
            _ => 1.0,
        };
        self.tap_button.prime(controls.spst(TAP_BUTTON));

        self.delay_type = DelayType::Unset;
        self.type_switch.reset();
        self.apply_delay();
        self.poll_type(ctx);
    }

    fn cleanup(&mut self, ctx: &mut PollContext<'_>) {
        self.delay_line.reset();
        for led in TYPE_LEDS {
            ctx.indicators.off(led);
        }
    }

    fn audio_callback(&mut self, input: &[&[f32]], output: &mut [&mut [f32]]) {
        // Taps recorded by the interrupt path land here without a poll.
        self.sync_delay();

        let (Some(dry_in), Some((out, rest_out))) = (input.first(), output.split_first_mut()) else {
            return;
        };

        for (y, &dry) in out.iter_mut().zip(dry_in.iter()) {
            let wet = self.delay_line.read();
            self.delay_line.write(wet * self.decay + dry);
            *y = (wet * self.level + dry) * self.gain;
        }

        // Further channels carry the dry signal.
        pass_through(&input[1..], rest_out);
    }

    fn poll(&mut self, ctx: &mut PollContext<'_>) {
        self.poll_tap(ctx);
        self.poll_knobs(ctx);
        self.poll_type(ctx);
        self.sync_delay();
    }

    fn name(&self) -> &'static str {
        "SingleEcho"
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
