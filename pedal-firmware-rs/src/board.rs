//! Board I/O: the control surface and the audio path.
//!
//! Pin assignments (Pico 2, RP2350A):
//!
//! ```text
//! Selector 1-4  GP2  GP3  GP4  GP5    (line 1 is the MSB)
//! SPST 1-4      GP6  GP7  GP8  GP9    (pull-down, closed = high)
//! SPDT 1        GP10 GP11
//! SPDT 2        GP12 GP13
//! LED  1-4      GP16 GP18 GP20 GP22   (PWM slices 0-3, channel A)
//! Audio out     GP14                  (PWM slice 7, channel A, RC filtered)
//! Audio in      GP26 / ADC0
//! POT  1-3      GP27 GP28 GP29 / ADC1-3
//! Power LED     GP25
//! ```
//!
//! The RP2350A has four ADC inputs and audio takes one, so POT 4 is not
//! wired on this board and always reads 0.

use core::sync::atomic::{AtomicU16, Ordering};

use embassy_rp::adc::{self, Adc};
use embassy_rp::gpio::{Input, Output};
use embassy_rp::pwm::{self, Pwm};
use pedal_controls::{ControlSnapshot, Indicators, POT_COUNT, SPDT_COUNT};

use crate::config::{AUDIO_PWM_TOP, LED_PWM_TOP, POT_SCAN_INTERVAL};

/// Pots converted on this board, starting at POT 1.
pub const WIRED_POTS: usize = 3;

/// Latest 10-bit pot readings, written by the audio path, read by the
/// control loop.
static POT_READINGS: [AtomicU16; POT_COUNT] = [
    AtomicU16::new(0),
    AtomicU16::new(0),
    AtomicU16::new(0),
    AtomicU16::new(0),
];

fn pot_readings() -> [u16; POT_COUNT] {
    core::array::from_fn(|i| POT_READINGS[i].load(Ordering::Relaxed))
}

// ── Control surface ──────────────────────────────────────────────────

/// Digital inputs and indicator outputs owned by the control loop.
pub struct ControlSurface {
    pub selector: [Input<'static>; 4],
    /// `None` when the tap interrupt task owns SPST 1.
    pub tap: Option<Input<'static>>,
    pub spst: [Input<'static>; 3],
    pub spdt: [[Input<'static>; 2]; SPDT_COUNT],
    pub leds: [Pwm<'static>; 4],
    /// Held so the pin stays driven.
    pub _power_led: Output<'static>,
}

impl ControlSurface {
    /// Read every input once.
    pub fn snapshot(&self, now_ms: u32) -> ControlSnapshot {
        let tap = self.tap.as_ref().is_some_and(|pin| pin.is_high());
        ControlSnapshot {
            now_ms,
            selector: core::array::from_fn(|i| self.selector[i].is_high()),
            spst: [
                tap,
                self.spst[0].is_high(),
                self.spst[1].is_high(),
                self.spst[2].is_high(),
            ],
            spdt: core::array::from_fn(|i| {
                let [first, second] = &self.spdt[i];
                [first.is_high(), second.is_high()]
            }),
            pots: pot_readings(),
        }
    }

    /// Drive the LEDs from an indicator frame.
    pub fn show(&mut self, frame: &Indicators) {
        for (pwm, level) in self.leds.iter_mut().zip(frame.levels()) {
            pwm.set_config(&led_config(level));
        }
    }
}

pub fn led_config(level: u8) -> pwm::Config {
    let mut config = pwm::Config::default();
    config.top = LED_PWM_TOP;
    config.compare_a = u16::from(level);
    config
}

// ── Audio path ───────────────────────────────────────────────────────

/// ADC input, PWM output, and the pot scanner that shares the ADC.
pub struct AudioIo {
    pub adc: Adc<'static, adc::Blocking>,
    pub input: adc::Channel<'static>,
    pub pots: [adc::Channel<'static>; WIRED_POTS],
    pub output: Pwm<'static>,
    next_pot: usize,
    countdown: u32,
}

impl AudioIo {
    pub fn new(
        adc: Adc<'static, adc::Blocking>,
        input: adc::Channel<'static>,
        pots: [adc::Channel<'static>; WIRED_POTS],
        output: Pwm<'static>,
    ) -> Self {
        Self {
            adc,
            input,
            pots,
            output,
            next_pot: 0,
            countdown: POT_SCAN_INTERVAL,
        }
    }

    /// One input sample in `[-1, 1]`; silence if the conversion fails.
    pub fn read_sample(&mut self) -> f32 {
        match self.adc.blocking_read(&mut self.input) {
            Ok(raw) => adc_to_sample(raw),
            Err(_) => 0.0,
        }
    }

    pub fn write_sample(&mut self, sample: f32) {
        self.output.set_config(&audio_config(sample));
    }

    /// Convert one pot every `POT_SCAN_INTERVAL` calls.
    pub fn scan_pots(&mut self) {
        self.countdown -= 1;
        if self.countdown > 0 {
            return;
        }
        self.countdown = POT_SCAN_INTERVAL;
        self.convert_pot(self.next_pot);
        self.next_pot = (self.next_pot + 1) % WIRED_POTS;
    }

    /// Convert every pot now.
    pub fn scan_all_pots(&mut self) {
        for pot in 0..WIRED_POTS {
            self.convert_pot(pot);
        }
    }

    fn convert_pot(&mut self, pot: usize) {
        if let Ok(raw) = self.adc.blocking_read(&mut self.pots[pot]) {
            // 12-bit ADC, 10-bit pot scale.
            POT_READINGS[pot].store(raw >> 2, Ordering::Relaxed);
        }
    }
}

fn adc_to_sample(raw: u16) -> f32 {
    (f32::from(raw) - 2048.0) / 2048.0
}

pub fn audio_config(sample: f32) -> pwm::Config {
    let level = (sample.clamp(-1.0, 1.0) + 1.0) * 0.5;
    let mut config = pwm::Config::default();
    config.top = AUDIO_PWM_TOP;
    config.compare_a = (level * f32::from(AUDIO_PWM_TOP)) as u16;
    config
}
