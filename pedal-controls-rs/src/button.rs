//! Push-button edge detection with a debounce window.
//!
//! A [`Button`] can be driven two ways:
//!
//! - **Polling**: [`Button::poll`] is called once per control-loop
//!   iteration with the current line level and detects the rising edge
//!   itself.
//! - **Interrupt**: the edge is detected by hardware and
//!   [`Button::trigger`] is called from the edge handler.
//!
//! Either way the handler runs at most once per qualifying edge, and never
//! within `debounce_ms` of the previous accepted press.

/// Rising-edge detector with a minimum time between accepted presses.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Button {
    debounce_ms: u32,
    last_trigger_ms: Option<u32>,
    previous_level: bool,
}

impl Button {
    /// A released button that ignores edges closer than `debounce_ms` apart.
    pub const fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_ms,
            last_trigger_ms: None,
            previous_level: false,
        }
    }

    /// Record the current level without reporting an edge.
    ///
    /// A button held down while an effect is set up must not count as a
    /// press.
    pub fn prime(&mut self, level: bool) {
        self.previous_level = level;
    }

    /// Feed the current line level from a polling loop.
    ///
    /// Calls `on_press(now_ms)` and returns `true` when a low→high
    /// transition is seen outside the debounce window.
    pub fn poll<F>(&mut self, level: bool, now_ms: u32, on_press: F) -> bool
    where
        F: FnOnce(u32),
    {
        let rising = level && !self.previous_level;
        self.previous_level = level;
        rising && self.trigger(now_ms, on_press)
    }

    /// Report an edge detected elsewhere (e.g. by a GPIO interrupt).
    ///
    /// Calls `on_press(now_ms)` and returns `true` unless the previous
    /// accepted press was `debounce_ms` or less ago. Timestamps wrap.
    pub fn trigger<F>(&mut self, now_ms: u32, on_press: F) -> bool
    where
        F: FnOnce(u32),
    {
        if let Some(last) = self.last_trigger_ms {
            if now_ms.wrapping_sub(last) <= self.debounce_ms {
                return false;
            }
        }
        self.last_trigger_ms = Some(now_ms);
        on_press(now_ms);
        true
    }

    /// Timestamp of the last accepted press.
    pub fn last_trigger_ms(&self) -> Option<u32> {
        self.last_trigger_ms
    }

    /// Minimum spacing between two accepted presses.
    pub fn debounce_ms(&self) -> u32 {
        self.debounce_ms
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
