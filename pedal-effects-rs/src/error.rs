//! Error types for effect configuration.

use core::fmt;

use pedal_controls::ControlError;

/// Errors raised while building effects from a configuration.
///
/// Only construction can fail. Once an effect is running every input is
/// clamped or reset instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The delay buffer must hold at least two samples.
    DelayBufferTooShort,
    /// Sample rate of zero.
    ZeroSampleRate,
    /// Initial tempo of zero beats per minute.
    ZeroTempo,
    /// Decay can reach 1.0 or more, so the feedback loop would not die out.
    UnstableFeedback,
    /// A knob configuration was rejected.
    Knob(ControlError),
}

// Allow ergonomic `?` propagation from knob construction.
impl From<ControlError> for ConfigError {
    fn from(error: ControlError) -> Self {
        ConfigError::Knob(error)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::DelayBufferTooShort => {
                write!(f, "Delay buffer must hold at least 2 samples")
            }
            ConfigError::ZeroSampleRate => write!(f, "Sample rate must be non-zero"),
            ConfigError::ZeroTempo => write!(f, "Initial tempo must be non-zero"),
            ConfigError::UnstableFeedback => write!(f, "Maximum decay must stay below 1.0"),
            ConfigError::Knob(e) => write!(f, "Knob configuration: {}", e),
        }
    }
}
