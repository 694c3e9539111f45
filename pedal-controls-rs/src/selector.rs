//! Effect selector decoding.
//!
//! The selector is a 16-detent rotary encoder presenting its position on
//! four digital lines in reflected binary (Gray code). Turning it clockwise
//! from the first detent produces the codes
//!
//! ```text
//! 0, 1, 3, 2, 6, 7, 5, 4, 12, 13, 15, 14, 10, 11, 9, 8
//! ```
//!
//! Consumers treat the code as an opaque identifier; [`SelectorCode::detent`]
//! exists only for diagnostics.

/// Raw 4-bit selector code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelectorCode(u8);

impl SelectorCode {
    /// Combine the four selector lines.
    ///
    /// `lines[0]` is line 1 (most significant bit), `lines[3]` is line 4:
    /// `line4 | line3 << 1 | line2 << 2 | line1 << 3`.
    pub const fn from_lines(lines: [bool; 4]) -> Self {
        let [line1, line2, line3, line4] = lines;
        Self(
            (line4 as u8)
                | ((line3 as u8) << 1)
                | ((line2 as u8) << 2)
                | ((line1 as u8) << 3),
        )
    }

    pub const fn from_raw(code: u8) -> Self {
        Self(code & 0x0F)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Physical detent index (0–15) that produces this code.
    pub const fn detent(self) -> u8 {
        let g = self.0;
        g ^ (g >> 1) ^ (g >> 2) ^ (g >> 3)
    }
}

/// Requires a selector code to be read `settle_polls` times in a row before
/// it is adopted.
///
/// A settle count of 1 adopts every new code immediately.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelectorFilter {
    settle_polls: u8,
    stable: SelectorCode,
    candidate: SelectorCode,
    seen: u8,
}

impl SelectorFilter {
    /// Start settled on `initial`. A `settle_polls` of 0 is treated as 1.
    pub const fn new(settle_polls: u8, initial: SelectorCode) -> Self {
        Self {
            settle_polls: if settle_polls == 0 { 1 } else { settle_polls },
            stable: initial,
            candidate: initial,
            seen: 0,
        }
    }

    /// Feed the latest code. Returns `Some(code)` when a different code has
    /// just been adopted.
    pub fn update(&mut self, code: SelectorCode) -> Option<SelectorCode> {
        if code == self.stable {
            self.candidate = code;
            self.seen = 0;
            return None;
        }

        if code == self.candidate {
            self.seen = self.seen.saturating_add(1);
        } else {
            self.candidate = code;
            self.seen = 1;
        }

        if self.seen >= self.settle_polls {
            self.stable = code;
            self.seen = 0;
            Some(code)
        } else {
            None
        }
    }

    /// Currently adopted code.
    pub fn stable(&self) -> SelectorCode {
        self.stable
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
