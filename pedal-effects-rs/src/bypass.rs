//! Pass-through effect, also the fallback for unknown selector codes.

use crate::effect::{pass_through, Effect, PollContext};

/// Copies every input channel to its output unchanged.
#[derive(Debug, Default)]
pub struct Bypass;

impl Bypass {
    pub const fn new() -> Self {
        Self
    }
}

impl Effect for Bypass {
    fn setup(&mut self, _channels: usize, _ctx: &mut PollContext<'_>) {}

    fn cleanup(&mut self, _ctx: &mut PollContext<'_>) {}

    fn audio_callback(&mut self, input: &[&[f32]], output: &mut [&mut [f32]]) {
        pass_through(input, output);
    }

    fn poll(&mut self, _ctx: &mut PollContext<'_>) {}

    fn name(&self) -> &'static str {
        "Bypass"
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use pedal_controls::{ControlSnapshot, Indicators};

    #[test]
    fn output_equals_input() {
        let controls = ControlSnapshot::default();
        let mut indicators = Indicators::new();
        let diagnostics = Diagnostics::new(false);
        let mut ctx = PollContext {
            controls: &controls,
            indicators: &mut indicators,
            diagnostics: &diagnostics,
        };

        let mut bypass = Bypass::new();
        bypass.setup(1, &mut ctx);

        let block: [f32; 4] = [0.0, 0.5, -0.5, 1.0];
        let mut out = [0.0f32; 4];
        {
            let input: [&[f32]; 1] = [&block];
            let mut output: [&mut [f32]; 1] = [&mut out];
            bypass.audio_callback(&input, &mut output);
        }
        assert_eq!(out, block);

        bypass.poll(&mut ctx);
        bypass.cleanup(&mut ctx);
        assert_eq!(indicators.lit_count(), 0);
        assert_eq!(bypass.name(), "Bypass");
    }
}
