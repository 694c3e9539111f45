//! Filtered control inputs for a single-channel effects pedal.
//!
//! Raw pin readings are noisy: potentiometers flutter by a few ADC counts,
//! push buttons bounce, and the rotary effect selector reports a
//! reflected-binary code rather than a position. This crate turns those
//! readings into stable logical values:
//!
//! - [`Knob`]: hysteresis and end-stop snapping for analog readings,
//!   mapped into an application range.
//! - [`Toggle`]: a three-position switch wired as two digital lines.
//! - [`Button`]: rising-edge detection with a debounce window, usable from
//!   a polling loop or from an edge interrupt.
//! - [`SelectorCode`] / [`SelectorFilter`]: the 4-line effect selector.
//!
//! The filters never touch hardware. The board layer reads every pin once
//! per control-loop iteration into a [`ControlSnapshot`] and writes the
//! resulting [`Indicators`] frame back to the LEDs, so the filters can be
//! driven identically on target and in host tests.
//!
//! # Crate Features
//!
//! - **`defmt`**: [`defmt::Format`] on all public types.
//! - **`task`**: [`tap_button_task`], an async edge watcher built on
//!   `embedded-hal-async` and `embassy-time`.

#![cfg_attr(not(test), no_std)]

pub mod button;
pub mod error;
pub mod knob;
pub mod selector;
pub mod surface;
#[cfg(feature = "task")]
pub mod tap_task;
pub mod toggle;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use button::Button;
pub use error::ControlError;
pub use knob::{Knob, KnobConfig};
pub use selector::{SelectorCode, SelectorFilter};
pub use surface::{
    ControlSnapshot, Indicators, Led, Pot, Spdt, Spst, LED_COUNT, LED_FULL, POT_COUNT, SPDT_COUNT,
    SPST_COUNT,
};
#[cfg(feature = "task")]
pub use tap_task::tap_button_task;
pub use toggle::{Position, Toggle};
