//! Three-position toggle switch wired as two digital lines.

/// Logical position of a three-position toggle.
///
/// The two-line encoding has four combinations; the one left over after
/// A and B folds into C, so every line state decodes to a real position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Position {
    /// Both lines low.
    A,
    /// First line high, second line low.
    B,
    /// Second line high (with or without the first).
    C,
}

impl Position {
    /// Zero-based index of the position (A = 0, B = 1, C = 2).
    pub const fn index(self) -> usize {
        match self {
            Position::A => 0,
            Position::B => 1,
            Position::C => 2,
        }
    }
}

/// Change detector for a three-position toggle.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Toggle {
    position: Option<Position>,
}

impl Toggle {
    /// A toggle that has not been read yet; its first `update` reports a change.
    pub const fn new() -> Self {
        Self { position: None }
    }

    /// Decode two line states into a position. Pure and total.
    pub const fn decode(first: bool, second: bool) -> Position {
        match (first, second) {
            (false, false) => Position::A,
            (true, false) => Position::B,
            _ => Position::C,
        }
    }

    /// Feed the current line states.
    ///
    /// Returns `Some(position)` on the first call after construction or
    /// [`reset`](Self::reset), and whenever the decoded position differs
    /// from the previous one.
    pub fn update(&mut self, first: bool, second: bool) -> Option<Position> {
        let position = Self::decode(first, second);
        if self.position == Some(position) {
            return None;
        }
        self.position = Some(position);
        Some(position)
    }

    /// Last decoded position, if any.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Forget the last position so the next [`update`](Self::update)
    /// reports it again.
    pub fn reset(&mut self) {
        self.position = None;
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_table() {
        assert_eq!(Toggle::decode(false, false), Position::A);
        assert_eq!(Toggle::decode(true, false), Position::B);
        assert_eq!(Toggle::decode(false, true), Position::C);
        assert_eq!(Toggle::decode(true, true), Position::C);
    }

    #[test]
    fn first_update_always_reports() {
        let mut t = Toggle::new();
        assert_eq!(t.position(), None);
        assert_eq!(t.update(false, false), Some(Position::A));
        assert_eq!(t.position(), Some(Position::A));
    }

    #[test]
    fn unchanged_position_not_reported() {
        let mut t = Toggle::new();
        t.update(true, false);
        assert_eq!(t.update(true, false), None);
    }

    #[test]
    fn both_c_encodings_are_the_same_position() {
        let mut t = Toggle::new();
        assert_eq!(t.update(false, true), Some(Position::C));
        assert_eq!(t.update(true, true), None);
    }

    #[test]
    fn reset_forces_report() {
        let mut t = Toggle::new();
        t.update(true, false);
        t.reset();
        assert_eq!(t.update(true, false), Some(Position::B));
    }

    #[test]
    fn indices_are_distinct() {
        assert_eq!(Position::A.index(), 0);
        assert_eq!(Position::B.index(), 1);
        assert_eq!(Position::C.index(), 2);
    }
}
