//! Build-time pedal settings.
//!
//! Everything tunable about this board lives here; the library crates only
//! see the resulting config structs.

use pedal_effects::{EchoConfig, EffectId, PedalConfig, TapSource, TempoConfig};

/// Emit diagnostic events over RTT.
pub const DEBUG: bool = true;

/// Audio sample rate in Hz. The audio ticker needs a whole number of timer
/// ticks per sample, so this must divide the 1 MHz tick rate.
pub const SAMPLE_RATE: u32 = 100_000;

const _: () = assert!(
    embassy_time::TICK_HZ % (SAMPLE_RATE as u64) == 0,
    "SAMPLE_RATE must divide the embassy-time tick rate"
);

/// Tempo before the first tap.
pub const INITIAL_BPM: u32 = 90;

/// Samples per audio callback. One sample keeps latency minimal.
pub const BLOCK_SIZE: usize = 1;

/// Audio channels handed to effects.
pub const CHANNELS: usize = 1;

/// Run this effect regardless of the selector. `None` reads the selector.
pub const FIXED_EFFECT: Option<EffectId> = None;

/// Where tap-tempo presses come from.
pub const TAP_SOURCE: TapSource = TapSource::Polled;

/// Control-loop period.
pub const CONTROL_PERIOD_MS: u64 = 2;

/// Audio samples between two pot conversions. Each pot is refreshed every
/// `POT_SCAN_INTERVAL × 3` samples (~1 ms at 100 kHz).
pub const POT_SCAN_INTERVAL: u32 = 32;

/// PWM wrap value of the audio output (10-bit, ~146 kHz carrier at 150 MHz).
pub const AUDIO_PWM_TOP: u16 = 1023;

/// PWM wrap value of the indicator LEDs; matches the 0-255 intensity scale.
pub const LED_PWM_TOP: u16 = 255;

pub fn pedal_config() -> PedalConfig {
    PedalConfig {
        channels: CHANNELS,
        debug: DEBUG,
        fixed_effect: FIXED_EFFECT,
        ..PedalConfig::default()
    }
}

pub const fn tempo_config() -> TempoConfig {
    TempoConfig {
        sample_rate: SAMPLE_RATE,
        initial_bpm: INITIAL_BPM,
    }
}

pub fn echo_config() -> EchoConfig {
    EchoConfig {
        tap_source: TAP_SOURCE,
        ..EchoConfig::default()
    }
}
