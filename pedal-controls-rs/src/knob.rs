//! Potentiometer filter with hysteresis and end-stop snapping.

use crate::error::ControlError;

/// Configuration for a single [`Knob`].
///
/// [`KnobConfig::default()`] matches a 10-bit ADC (0–1023) with a flutter
/// margin of 10 counts, mapped onto `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KnobConfig {
    /// A reading must move by more than this many counts to be accepted.
    pub flutter: u16,
    /// Lowest raw reading the pot reaches. Default: 0.
    pub min_reading: u16,
    /// Highest raw reading the pot reaches. Default: 1023.
    pub max_reading: u16,
    /// Output value at `min_reading`.
    pub min_value: f32,
    /// Output value at `max_reading`. May be below `min_value` for pots
    /// wired in reverse.
    pub max_value: f32,
}

impl Default for KnobConfig {
    fn default() -> Self {
        Self {
            flutter: 10,
            min_reading: 0,
            max_reading: 1023,
            min_value: 0.0,
            max_value: 1.0,
        }
    }
}

impl KnobConfig {
    /// Default reading range and flutter, mapped onto `[min_value, max_value]`.
    pub fn with_range(min_value: f32, max_value: f32) -> Self {
        Self {
            min_value,
            max_value,
            ..Self::default()
        }
    }

    /// Check that the reading range is non-empty and leaves room between
    /// the two snapping zones.
    pub fn validate(&self) -> Result<(), ControlError> {
        if self.min_reading >= self.max_reading {
            return Err(ControlError::EmptyReadingRange);
        }
        let span = self.max_reading - self.min_reading;
        if u32::from(self.flutter) * 2 >= u32::from(span) {
            return Err(ControlError::FlutterTooWide);
        }
        Ok(())
    }

    /// Snap a raw reading to the configured bounds.
    ///
    /// Readings outside `[min_reading, max_reading]` are clamped, and
    /// readings within `flutter` of either bound land exactly on it.
    pub fn snap(&self, raw: u16) -> u16 {
        let raw = raw.clamp(self.min_reading, self.max_reading);
        if raw <= self.min_reading.saturating_add(self.flutter) {
            self.min_reading
        } else if raw >= self.max_reading.saturating_sub(self.flutter) {
            self.max_reading
        } else {
            raw
        }
    }

    /// Map a reading linearly onto `[min_value, max_value]`.
    ///
    /// The result is always within the configured output range, whichever
    /// way round it is.
    pub fn map(&self, reading: u16) -> f32 {
        let reading = reading.clamp(self.min_reading, self.max_reading);
        let span = f32::from(self.max_reading - self.min_reading);
        let t = f32::from(reading - self.min_reading) / span;
        let value = self.min_value + (self.max_value - self.min_value) * t;

        let (lo, hi) = if self.min_value <= self.max_value {
            (self.min_value, self.max_value)
        } else {
            (self.max_value, self.min_value)
        };
        value.clamp(lo, hi)
    }
}

/// Hysteresis filter for one potentiometer.
///
/// # Example
///
/// ```
/// use pedal_controls::{Knob, KnobConfig};
///
/// let mut decay = Knob::new(KnobConfig::with_range(0.0, 0.75)).unwrap();
/// decay.prime(512);
///
/// // Jitter inside the flutter margin is ignored.
/// assert_eq!(decay.update(518), None);
///
/// // Turning the knob all the way up snaps onto the end stop.
/// assert_eq!(decay.update(1019), Some(0.75));
/// ```
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Knob {
    config: KnobConfig,
    /// Last accepted (snapped) reading.
    reading: u16,
    /// `config.map(reading)`, cached.
    value: f32,
}

impl Knob {
    /// Build a knob resting at `min_reading`.
    ///
    /// # Errors
    ///
    /// Returns the result of [`KnobConfig::validate`].
    pub fn new(config: KnobConfig) -> Result<Self, ControlError> {
        config.validate()?;
        Ok(Self {
            config,
            reading: config.min_reading,
            value: config.min_value,
        })
    }

    /// Accept `raw` unconditionally and return the mapped value.
    ///
    /// Used when an effect is set up, so it starts from the physical knob
    /// position instead of whatever was stored last time.
    pub fn prime(&mut self, raw: u16) -> f32 {
        self.accept(raw);
        self.value
    }

    /// Feed a new raw reading.
    ///
    /// Returns `Some(value)` when the reading moved by more than the
    /// flutter margin and was accepted, `None` otherwise.
    pub fn update(&mut self, raw: u16) -> Option<f32> {
        if raw.abs_diff(self.reading) <= self.config.flutter {
            return None;
        }
        self.accept(raw);
        Some(self.value)
    }

    /// Last accepted reading, after snapping.
    pub fn reading(&self) -> u16 {
        self.reading
    }

    /// Current mapped value.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// The configuration this knob was built with.
    pub fn config(&self) -> &KnobConfig {
        &self.config
    }

    fn accept(&mut self, raw: u16) {
        self.reading = self.config.snap(raw);
        self.value = self.config.map(self.reading);
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
