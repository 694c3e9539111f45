//! Tap-tempo tracking.
//!
//! [`TapTempo`] turns tap timestamps into a delay length in samples. It is
//! shared between whoever sees the taps (the control loop when the button
//! is polled, an edge-interrupt task otherwise) and the echo engine, so all
//! of its methods take `&self`:
//!
//! - the last tap timestamp and the derived delay length are atomics, so
//!   the real-time path reads the delay length without locking;
//! - the history of recent intervals sits behind an `embassy-sync`
//!   blocking mutex on a critical section. The critical section in
//!   [`TapTempo::tap`] covers one push and a sum over at most `N` entries,
//!   a few dozen instructions for the default `N = 4`.
//!
//! # Scale
//!
//! A tap interval of 2000 ms corresponds to `sample_rate` samples, so at
//! 96 kHz a 500 ms interval gives 24000 samples and the 90 bpm seed gives
//! `96000 × 30 / 90 = 32000` samples. Taps are always shorter than 2000 ms,
//! so a delay buffer of [`TempoConfig::max_delay_samples`] never clamps.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Deque;

use crate::error::ConfigError;

/// Tap intervals at or above this are a tempo reset, not a tap.
pub const MAX_TAP_INTERVAL_MS: u32 = 2000;

/// Number of recent intervals averaged into the tempo.
pub const TEMPO_HISTORY_LEN: usize = 4;

/// Interval, in milliseconds, that spans `sample_rate` samples.
const TAP_SCALE_MS: u64 = 2000;

// ── TempoConfig ──────────────────────────────────────────────────────────

/// Tempo tracking configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TempoConfig {
    /// Audio sample rate in Hz. Default: 96000.
    pub sample_rate: u32,
    /// Tempo before the first tap, in beats per minute. Default: 90.
    pub initial_bpm: u32,
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            sample_rate: 96_000,
            initial_bpm: 90,
        }
    }
}

impl TempoConfig {
    /// Rejects a zero sample rate or tempo.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.initial_bpm == 0 {
            return Err(ConfigError::ZeroTempo);
        }
        Ok(())
    }

    /// One quarter note at the initial tempo, in samples:
    /// `sample_rate / bpm × 60 / 2`.
    pub fn seed_samples(&self) -> u32 {
        (u64::from(self.sample_rate) * 30 / u64::from(self.initial_bpm.max(1))) as u32
    }

    /// Delay buffer length that holds the longest tracked tempo. Every
    /// recorded interval is under [`MAX_TAP_INTERVAL_MS`], so the base delay
    /// stays below `sample_rate` samples.
    pub const fn max_delay_samples(&self) -> usize {
        self.sample_rate as usize
    }

    /// Delay length for an average tap interval of `total_ms / count`.
    pub fn samples_for(&self, total_ms: u32, count: usize) -> u32 {
        if count == 0 {
            return 0;
        }
        (u64::from(self.sample_rate) * u64::from(total_ms) / (TAP_SCALE_MS * count as u64)) as u32
    }
}

// ── TempoHistory ─────────────────────────────────────────────────────────

/// The last `N` tap intervals in milliseconds, oldest first.
#[derive(Debug, Clone)]
pub struct TempoHistory<const N: usize> {
    durations: Deque<u32, N>,
}

impl<const N: usize> Default for TempoHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TempoHistory<N> {
    pub const fn new() -> Self {
        Self {
            durations: Deque::new(),
        }
    }

    /// Append an interval, dropping the oldest once `N` are stored.
    pub fn push(&mut self, duration_ms: u32) {
        if self.durations.is_full() {
            self.durations.pop_front();
        }
        // Cannot fail: a slot was just freed if needed.
        let _ = self.durations.push_back(duration_ms);
    }

    pub fn clear(&mut self) {
        self.durations.clear();
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Sum of the stored intervals. At most `N × MAX_TAP_INTERVAL_MS`.
    pub fn total_ms(&self) -> u32 {
        self.durations.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &u32> {
        self.durations.iter()
    }
}

// ── TapTempo ─────────────────────────────────────────────────────────────

/// What a tap did to the tempo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapOutcome {
    /// Interval recorded and the base delay recomputed.
    Recorded { interval_ms: u32, base_samples: u32 },
    /// First tap, or the interval was at least [`MAX_TAP_INTERVAL_MS`]:
    /// history cleared, base delay unchanged.
    Reset,
}

/// Shared tap-tempo state.
///
/// # Example
///
/// ```
/// use pedal_effects::{TapOutcome, TapTempo, TempoConfig};
///
/// let tempo: TapTempo = TapTempo::new(TempoConfig::default()).unwrap();
/// assert_eq!(tempo.base_samples(), 32_000);
///
/// assert_eq!(tempo.tap(10_000), TapOutcome::Reset);
/// assert_eq!(
///     tempo.tap(10_500),
///     TapOutcome::Recorded { interval_ms: 500, base_samples: 24_000 }
/// );
/// ```
pub struct TapTempo<const N: usize = TEMPO_HISTORY_LEN> {
    config: TempoConfig,
    last_tap_ms: AtomicU32,
    has_tapped: AtomicBool,
    base_samples: AtomicU32,
    history: Mutex<CriticalSectionRawMutex, RefCell<TempoHistory<N>>>,
}

impl<const N: usize> TapTempo<N> {
    /// Build tempo state seeded at `config.initial_bpm`.
    ///
    /// # Errors
    ///
    /// Returns the result of [`TempoConfig::validate`].
    pub fn new(config: TempoConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            last_tap_ms: AtomicU32::new(0),
            has_tapped: AtomicBool::new(false),
            base_samples: AtomicU32::new(config.seed_samples()),
            history: Mutex::new(RefCell::new(TempoHistory::new())),
        })
    }

    /// Register a tap at `now_ms` (wrapping milliseconds).
    ///
    /// Short and non-blocking, so it can be called from an edge interrupt
    /// task. The timestamp, history and base delay change together inside
    /// one critical section.
    pub fn tap(&self, now_ms: u32) -> TapOutcome {
        self.history.lock(|history| {
            let mut history = history.borrow_mut();

            let previous = self.last_tap_ms.load(Ordering::Relaxed);
            let had_tap = self.has_tapped.load(Ordering::Relaxed);
            self.last_tap_ms.store(now_ms, Ordering::Relaxed);
            self.has_tapped.store(true, Ordering::Relaxed);

            let interval_ms = now_ms.wrapping_sub(previous);
            if !had_tap || interval_ms >= MAX_TAP_INTERVAL_MS {
                history.clear();
                return TapOutcome::Reset;
            }

            history.push(interval_ms);
            let base_samples = self.config.samples_for(history.total_ms(), history.len());
            self.base_samples.store(base_samples, Ordering::Release);
            TapOutcome::Recorded {
                interval_ms,
                base_samples,
            }
        })
    }

    /// Forget all taps and return to the initial tempo.
    pub fn reseed(&self) {
        self.history.lock(|history| {
            history.borrow_mut().clear();
            self.has_tapped.store(false, Ordering::Relaxed);
            self.base_samples
                .store(self.config.seed_samples(), Ordering::Release);
        });
    }

    /// Current quarter-note delay in samples, before any delay-type
    /// multiplier. Lock-free.
    pub fn base_samples(&self) -> u32 {
        self.base_samples.load(Ordering::Acquire)
    }

    /// Copy of the interval history, oldest first.
    pub fn history(&self) -> heapless::Vec<u32, N> {
        self.history
            .lock(|history| history.borrow().iter().copied().collect())
    }

    pub fn config(&self) -> &TempoConfig {
        &self.config
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
