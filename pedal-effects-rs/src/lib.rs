//! Effect runtime for a single-channel effects pedal.
//!
//! Every effect implements [`Effect`]: lifecycle hooks (`setup`,
//! `cleanup`), a real-time block callback and a low-priority `poll` that
//! reads the controls. [`Registry`] owns one instance of each effect and
//! [`PedalController`] runs whichever one the selector points at, handing
//! over between them in order: the outgoing effect is cleaned up before
//! the incoming one is set up.
//!
//! The only effect with real DSP is [`SingleEcho`], a feedback delay whose
//! length follows a tapped tempo ([`TapTempo`]).
//!
//! # Quick Start
//!
//! ```
//! use pedal_controls::ControlSnapshot;
//! use pedal_effects::{
//!     EchoConfig, PedalConfig, PedalController, Registry, SingleEcho, TapTempo, TempoConfig,
//! };
//!
//! let tempo = TapTempo::new(TempoConfig::default()).unwrap();
//! let mut delay_buffer = vec![0.0f32; pedal_effects::echo::DELAY_MAX_SAMPLES];
//! let echo = SingleEcho::new(EchoConfig::default(), &mut delay_buffer, &tempo).unwrap();
//!
//! let controls = ControlSnapshot {
//!     selector: [false, false, false, true],
//!     ..ControlSnapshot::default()
//! };
//! let mut pedal = PedalController::start(Registry::new(echo), PedalConfig::default(), &controls);
//! assert_eq!(pedal.name(), "SingleEcho");
//!
//! // Real-time context: one block per call.
//! let input = [0.25f32];
//! let mut output = [0.0f32];
//! let channels_in: [&[f32]; 1] = [&input];
//! let mut channels_out: [&mut [f32]; 1] = [&mut output];
//! pedal.audio_callback(&channels_in, &mut channels_out);
//!
//! // Control loop.
//! pedal.poll(&controls);
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`**: [`defmt::Format`] on public types, and diagnostic events
//!   logged through `defmt`.

#![cfg_attr(not(test), no_std)]

pub mod bypass;
pub mod controller;
pub mod delay_line;
pub mod diagnostics;
pub mod echo;
pub mod effect;
pub mod error;
pub mod hw_test;
pub mod registry;
pub mod tempo;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use bypass::Bypass;
pub use controller::{Handoff, PedalConfig, PedalController};
pub use delay_line::DelayLine;
pub use diagnostics::{Diagnostics, Event};
pub use echo::{BoostConfig, DelayType, EchoConfig, SingleEcho, TapSource};
pub use effect::{pass_through, Effect, PollContext};
pub use error::ConfigError;
pub use hw_test::HwTest;
pub use registry::{EffectId, EffectRegistry, Registry};
pub use tempo::{TapOutcome, TapTempo, TempoConfig, TempoHistory, MAX_TAP_INTERVAL_MS};
