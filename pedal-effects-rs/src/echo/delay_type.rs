use pedal_controls::{Led, Position};

/// Rhythmic subdivision applied to the tapped quarter-note tempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DelayType {
    Quarter,
    DottedEighth,
    Triplet,
    /// No type selected yet; the delay runs at the plain quarter length.
    #[default]
    Unset,
}

impl DelayType {
    /// Multiplier applied to the base tempo length.
    pub const fn multiplier(self) -> f32 {
        match self {
            DelayType::Quarter | DelayType::Unset => 1.0,
            DelayType::DottedEighth => 0.75,
            DelayType::Triplet => 0.333,
        }
    }

    /// Type selected by each toggle position.
    pub const fn from_position(position: Position) -> Self {
        match position {
            Position::A => DelayType::Quarter,
            Position::B => DelayType::DottedEighth,
            Position::C => DelayType::Triplet,
        }
    }

    /// Indicator showing this type.
    pub const fn indicator(self) -> Option<Led> {
        match self {
            DelayType::Quarter => Some(Led::One),
            DelayType::DottedEighth => Some(Led::Two),
            DelayType::Triplet => Some(Led::Three),
            DelayType::Unset => None,
        }
    }

    /// Delay length for `base_samples` at this type.
    pub fn scale(self, base_samples: u32) -> usize {
        (base_samples as f32 * self.multiplier()) as usize
    }
}
