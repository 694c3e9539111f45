//! Fixed-capacity circular delay line.
//!
//! The sample storage is borrowed, not owned: on target it is a `'static`
//! buffer placed by the firmware, in tests a heap vector. Nothing is ever
//! allocated or resized while audio runs.

use crate::error::ConfigError;

/// Circular buffer read at a fixed offset behind the write cursor.
///
/// The write cursor moves backwards through the buffer; the read position
/// is `write + delay`, so [`read`](Self::read) returns the sample written
/// `delay` calls to [`write`](Self::write) ago. Changing the delay only
/// moves the read position, never the stored samples.
///
/// # Example
///
/// ```
/// use pedal_effects::DelayLine;
///
/// let mut storage = [0.0f32; 8];
/// let mut line = DelayLine::new(&mut storage).unwrap();
/// line.set_delay(2);
///
/// let mut out = [0.0; 4];
/// for (i, y) in out.iter_mut().enumerate() {
///     *y = line.read();
///     line.write(if i == 0 { 1.0 } else { 0.0 });
/// }
/// assert_eq!(out, [0.0, 0.0, 1.0, 0.0]);
/// ```
#[derive(Debug)]
pub struct DelayLine<'a> {
    buffer: &'a mut [f32],
    write: usize,
    delay: usize,
}

impl<'a> DelayLine<'a> {
    /// Wrap `buffer`, clearing it. The delay starts at one sample.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DelayBufferTooShort`] if `buffer` holds fewer than two
    /// samples.
    pub fn new(buffer: &'a mut [f32]) -> Result<Self, ConfigError> {
        if buffer.len() < 2 {
            return Err(ConfigError::DelayBufferTooShort);
        }
        let mut line = Self {
            buffer,
            write: 0,
            delay: 1,
        };
        line.reset();
        Ok(line)
    }

    /// Maximum number of samples the line can hold.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Set the delay length, clamped to `1..=capacity - 1`. Returns the
    /// length actually applied.
    pub fn set_delay(&mut self, samples: usize) -> usize {
        self.delay = samples.clamp(1, self.buffer.len() - 1);
        self.delay
    }

    /// Current delay length in samples.
    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Read the delayed sample for the current position.
    #[inline]
    pub fn read(&self) -> f32 {
        let mut pos = self.write + self.delay;
        if pos >= self.buffer.len() {
            pos -= self.buffer.len();
        }
        self.buffer[pos]
    }

    /// Store a sample and advance the cursor.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write] = sample;
        self.write = if self.write == 0 {
            self.buffer.len() - 1
        } else {
            self.write - 1
        };
    }

    /// Silence the line and rewind the cursor. The delay length is kept.
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write = 0;
    }

    /// Raw stored samples.
    pub fn samples(&self) -> &[f32] {
        &*self.buffer
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
