//! Interrupt-driven tap-tempo button watcher.
//!
//! Instead of sampling the tap button from the control loop, the button's
//! GPIO edge interrupt wakes [`tap_button_task`], which applies the
//! debounce window and hands the timestamp to the caller. The callback
//! runs in the task's context and must stay short: record the tap and
//! return. No logging happens on the tap path, not even when the edge wait
//! fails.

use embedded_hal_async::digital::Wait;

use crate::button::Button;

/// Back-off after a failed edge wait, so a broken pin cannot spin the task.
const WAIT_ERROR_BACKOFF_MS: u64 = 10;

/// Wait for rising edges on `pin` forever, calling `on_tap(now_ms)` for
/// every edge that passes `button`'s debounce window.
///
/// This is a regular `async fn`, **not** an Embassy `#[task]`. Callers
/// wrap it in a concrete task, since Embassy tasks cannot be generic:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn tap_task(pin: Input<'static>) {
///     tap_button_task(pin, Button::new(300), |now| {
///         TAP_TEMPO.tap(now);
///     })
///     .await;
/// }
/// ```
pub async fn tap_button_task<P, F>(mut pin: P, mut button: Button, mut on_tap: F) -> !
where
    P: Wait,
    F: FnMut(u32),
{
    loop {
        let edge = pin.wait_for_rising_edge().await;
        let now_ms = embassy_time::Instant::now().as_millis() as u32;
        if handle_edge(edge, now_ms, &mut button, &mut on_tap) == EdgeStep::Backoff {
            embassy_time::Timer::after_millis(WAIT_ERROR_BACKOFF_MS).await;
        }
    }
}

/// What the watcher does after one edge wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeStep {
    Tapped,
    Debounced,
    /// The wait failed. Silently retry after [`WAIT_ERROR_BACKOFF_MS`].
    Backoff,
}

fn handle_edge<E, F>(edge: Result<(), E>, now_ms: u32, button: &mut Button, on_tap: F) -> EdgeStep
where
    F: FnMut(u32),
{
    if edge.is_err() {
        return EdgeStep::Backoff;
    }
    if button.trigger(now_ms, on_tap) {
        EdgeStep::Tapped
    } else {
        EdgeStep::Debounced
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct PinFault;

    #[test]
    fn failed_wait_backs_off_without_tapping() {
        let mut button = Button::new(300);
        let mut taps = Vec::new();
        let step = handle_edge(Err(PinFault), 1000, &mut button, |t| taps.push(t));
        assert_eq!(step, EdgeStep::Backoff);
        assert!(taps.is_empty());
        assert_eq!(button.last_trigger_ms(), None);
    }

    #[test]
    fn edges_pass_through_debounce() {
        let mut button = Button::new(300);
        let mut taps = Vec::new();
        let ok = || Ok::<(), PinFault>(());

        assert_eq!(handle_edge(ok(), 1000, &mut button, |t| taps.push(t)), EdgeStep::Tapped);
        assert_eq!(handle_edge(ok(), 1200, &mut button, |t| taps.push(t)), EdgeStep::Debounced);
        assert_eq!(
            handle_edge(Err(PinFault), 1250, &mut button, |t| taps.push(t)),
            EdgeStep::Backoff
        );
        assert_eq!(handle_edge(ok(), 1400, &mut button, |t| taps.push(t)), EdgeStep::Tapped);
        assert_eq!(taps, vec![1000, 1400]);
    }
}
