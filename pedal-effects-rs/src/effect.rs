//! The capability contract every effect implements.

use pedal_controls::{ControlSnapshot, Indicators};

use crate::diagnostics::Diagnostics;

/// Everything an effect may touch outside its own state during a control
/// operation.
pub struct PollContext<'c> {
    /// Control readings for this iteration.
    pub controls: &'c ControlSnapshot,
    /// Indicator frame, applied to the LEDs after the iteration.
    pub indicators: &'c mut Indicators,
    pub diagnostics: &'c Diagnostics,
}

/// A selectable signal-processing algorithm.
///
/// Instances live for the whole program. The controller activates one at a
/// time with [`setup`](Effect::setup), drives it with
/// [`audio_callback`](Effect::audio_callback) from the real-time context and
/// [`poll`](Effect::poll) from the control loop, and deactivates it with
/// [`cleanup`](Effect::cleanup).
pub trait Effect {
    /// Reset DSP state and read every claimed control once so the effect
    /// starts from the physical control positions.
    fn setup(&mut self, channels: usize, ctx: &mut PollContext<'_>);

    /// Turn off claimed indicators and clear DSP memory. Must not block.
    fn cleanup(&mut self, ctx: &mut PollContext<'_>);

    /// Process one block in place of the audio engine.
    ///
    /// `input[ch]` and `output[ch]` have the block length. Runs in the
    /// real-time context: bounded time, no allocation, no blocking, and no
    /// references to the buffers kept after return.
    fn audio_callback(&mut self, input: &[&[f32]], output: &mut [&mut [f32]]);

    /// One control-loop iteration: filter controls and apply parameter
    /// changes.
    fn poll(&mut self, ctx: &mut PollContext<'_>);

    /// Stable name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Copy every input channel to the matching output channel.
pub fn pass_through(input: &[&[f32]], output: &mut [&mut [f32]]) {
    for (inp, out) in input.iter().zip(output.iter_mut()) {
        let len = inp.len().min(out.len());
        out[..len].copy_from_slice(&inp[..len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_through_copies_each_channel() {
        let left: [f32; 3] = [0.1, 0.2, 0.3];
        let right: [f32; 3] = [-0.1, -0.2, -0.3];
        let mut out_left = [0.0f32; 3];
        let mut out_right = [0.0f32; 3];
        {
            let input: [&[f32]; 2] = [&left, &right];
            let mut output: [&mut [f32]; 2] = [&mut out_left, &mut out_right];
            pass_through(&input, &mut output);
        }
        assert_eq!(out_left, left);
        assert_eq!(out_right, right);
    }

    #[test]
    fn pass_through_tolerates_channel_mismatch() {
        let mono: [f32; 1] = [0.5];
        let mut out_a = [0.0f32];
        let mut out_b = [9.0f32];
        {
            let input: [&[f32]; 1] = [&mono];
            let mut output: [&mut [f32]; 2] = [&mut out_a, &mut out_b];
            pass_through(&input, &mut output);
        }
        assert_eq!(out_a, [0.5]);
        assert_eq!(out_b, [9.0]);
    }
}
