//! Diagnostic event reporting.
//!
//! All runtime messages go through [`Diagnostics::emit`], which checks the
//! debug flag once and forwards to `defmt` when the `defmt` feature is
//! enabled. Messages are advisory; nothing depends on them being seen.

use core::cell::Cell;

use crate::echo::DelayType;

/// Something worth reporting on the debug channel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// First effect activated at power-on.
    Starting { effect: &'static str, detent: u8 },
    /// Hand-off from one effect to another.
    Switching { from: &'static str, to: &'static str },
    /// Echo delay type changed.
    DelayTypeChanged { delay_type: DelayType, delay_samples: u32 },
    /// A tap was recorded and the tempo recomputed.
    TempoTapped { interval_ms: u32, delay_samples: u32 },
    /// A tap arrived too late to be part of the current tempo; history
    /// cleared.
    TempoReset,
}

/// The single logging boundary.
#[derive(Debug, Default)]
pub struct Diagnostics {
    enabled: bool,
    emitted: Cell<u32>,
}

impl Diagnostics {
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            emitted: Cell::new(0),
        }
    }

    /// Report `event` if diagnostics are enabled.
    pub fn emit(&self, event: Event) {
        if !self.enabled {
            return;
        }
        self.emitted.set(self.emitted.get().wrapping_add(1));

        #[cfg(feature = "defmt")]
        defmt::info!("{}", event);
        #[cfg(not(feature = "defmt"))]
        let _ = event;
    }

    /// Number of events passed through since construction.
    pub fn emitted(&self) -> u32 {
        self.emitted.get()
    }
}
