//! Error types for control filter configuration.

use core::fmt;

/// Errors raised when a filter is built from an unusable configuration.
///
/// Filters never fail once constructed; out-of-range readings are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlError {
    /// `min_reading` is not strictly below `max_reading`.
    EmptyReadingRange,
    /// The flutter margin spans half the reading range or more, so every
    /// reading would snap to an end stop.
    FlutterTooWide,
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ControlError::EmptyReadingRange => write!(f, "Knob reading range is empty"),
            ControlError::FlutterTooWide => {
                write!(f, "Knob flutter margin covers the whole reading range")
            }
        }
    }
}
