use pedal_controls::KnobConfig;

use crate::error::ConfigError;

/// Where tap-tempo presses come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapSource {
    /// The echo samples the tap button in every [`poll`](crate::Effect::poll).
    #[default]
    Polled,
    /// An edge interrupt feeds [`TapTempo::tap`](crate::TapTempo::tap)
    /// directly; the echo only follows the published tempo.
    Interrupt,
}

/// Output boost stage: `gain = boost × multiplier + adder`, where `boost`
/// is the boost knob value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoostConfig {
    /// Boost knob mapping. Default: `[0.0, 1.0]`.
    pub knob: KnobConfig,
    /// Default: 6.0.
    pub multiplier: f32,
    /// Default: 1.0, so the gain runs from 1× to 7×.
    pub adder: f32,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            knob: KnobConfig::with_range(0.0, 1.0),
            multiplier: 6.0,
            adder: 1.0,
        }
    }
}

impl BoostConfig {
    pub fn gain(&self, boost: f32) -> f32 {
        boost * self.multiplier + self.adder
    }
}

/// Echo engine configuration.
///
/// [`EchoConfig::default()`] is the pedal's stock voicing:
/// full-range level, decay capped at 0.75, 300 ms tap debounce, indicators
/// at half brightness, no boost stage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EchoConfig {
    /// Wet level knob. Default: `[0.0, 1.0]`.
    pub level: KnobConfig,
    /// Feedback knob. Default: `[0.0, 0.75]`. Must stay below 1.0.
    pub decay: KnobConfig,
    /// Optional output boost on pot 3.
    pub boost: Option<BoostConfig>,
    /// Minimum time between accepted taps. Default: 300 ms.
    pub tap_debounce_ms: u32,
    pub tap_source: TapSource,
    /// Brightness of the delay-type indicator. Default: 128.
    pub led_intensity: u8,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            level: KnobConfig::with_range(0.0, 1.0),
            decay: KnobConfig::with_range(0.0, 0.75),
            boost: None,
            tap_debounce_ms: 300,
            tap_source: TapSource::Polled,
            led_intensity: 128,
        }
    }
}

impl EchoConfig {
    /// Check every knob and that the feedback loop is bounded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level.validate()?;
        self.decay.validate()?;
        if let Some(boost) = &self.boost {
            boost.knob.validate()?;
        }
        if self.decay.min_value.abs() >= 1.0 || self.decay.max_value.abs() >= 1.0 {
            return Err(ConfigError::UnstableFeedback);
        }
        Ok(())
    }
}
