//! The pedal's physical control surface.
//!
//! Every effect draws from the same fixed set of controls:
//!
//! ```text
//! SPST 1-4   single-pole footswitches / buttons
//! SPDT 1-2   three-position toggles, two lines each
//! POT  1-4   potentiometers (10-bit readings)
//! LED  1-4   PWM indicator outputs
//! ```
//!
//! Effects claim controls statically through constants of these enums.
//! The board layer reads all inputs into a [`ControlSnapshot`] once per
//! control-loop iteration and applies the [`Indicators`] frame afterwards.

use crate::selector::SelectorCode;

macro_rules! control_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $idx:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All controls of this kind, in index order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Zero-based slot index.
            pub const fn index(self) -> usize {
                match self {
                    $($name::$variant => $idx),+
                }
            }
        }
    };
}

control_enum! {
    /// Single-pole single-throw switch.
    Spst { One = 0, Two = 1, Three = 2, Four = 3 }
}

control_enum! {
    /// Single-pole double-throw (three-position) toggle.
    Spdt { One = 0, Two = 1 }
}

control_enum! {
    /// Potentiometer.
    Pot { One = 0, Two = 1, Three = 2, Four = 3 }
}

control_enum! {
    /// Indicator LED.
    Led { One = 0, Two = 1, Three = 2, Four = 3 }
}

/// Number of SPST switches.
pub const SPST_COUNT: usize = 4;
/// Number of SPDT toggles.
pub const SPDT_COUNT: usize = 2;
/// Number of potentiometers.
pub const POT_COUNT: usize = 4;
/// Number of indicator LEDs.
pub const LED_COUNT: usize = 4;

/// Full brightness for an indicator.
pub const LED_FULL: u8 = u8::MAX;

/// One reading of every input on the control surface.
///
/// Taken by the board layer outside any critical section, then handed to
/// the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlSnapshot {
    /// Milliseconds since boot when the snapshot was taken (wrapping).
    pub now_ms: u32,
    /// Selector lines 1–4.
    pub selector: [bool; 4],
    /// SPST levels, `true` = high.
    pub spst: [bool; SPST_COUNT],
    /// SPDT line pairs.
    pub spdt: [[bool; 2]; SPDT_COUNT],
    /// Raw potentiometer readings.
    pub pots: [u16; POT_COUNT],
}

impl ControlSnapshot {
    pub fn spst(&self, switch: Spst) -> bool {
        self.spst[switch.index()]
    }

    /// Both lines of a toggle as `(first, second)`.
    pub fn spdt(&self, switch: Spdt) -> (bool, bool) {
        let [first, second] = self.spdt[switch.index()];
        (first, second)
    }

    pub fn pot(&self, pot: Pot) -> u16 {
        self.pots[pot.index()]
    }

    pub fn selector_code(&self) -> SelectorCode {
        SelectorCode::from_lines(self.selector)
    }
}

/// Intensity frame for the indicator LEDs (0 = off, 255 = full).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Indicators {
    levels: [u8; LED_COUNT],
}

impl Indicators {
    pub const fn new() -> Self {
        Self {
            levels: [0; LED_COUNT],
        }
    }

    pub fn set(&mut self, led: Led, intensity: u8) {
        self.levels[led.index()] = intensity;
    }

    pub fn off(&mut self, led: Led) {
        self.set(led, 0);
    }

    pub fn get(&self, led: Led) -> u8 {
        self.levels[led.index()]
    }

    /// Turn every indicator off.
    pub fn clear(&mut self) {
        self.levels = [0; LED_COUNT];
    }

    /// Number of indicators with a non-zero intensity.
    pub fn lit_count(&self) -> usize {
        self.levels.iter().filter(|&&level| level > 0).count()
    }

    pub fn levels(&self) -> [u8; LED_COUNT] {
        self.levels
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
