//! Toast
//!
//! The transient "added to cart" notification. The source system is
//! single-threaded and event-driven, so the auto-hide is a deadline
//! resolved by polling rather than a timer: showing again while visible
//! replaces the pending deadline, so the last scheduled hide always wins
//! and no stale dismissal can blank a newer message.

use std::time::{Duration, Instant};

/// How long a toast stays visible once shown.
pub const TOAST_DURATION: Duration = Duration::from_millis(3_000);

/// A transient, auto-dismissing notification.
#[derive(Clone, Debug, Default)]
pub struct Toast {
    message: String,
    visible: bool,
    hide_at: Option<Instant>,
}

impl Toast {
    /// An empty, hidden toast.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a message and schedule the auto-hide [`TOAST_DURATION`] out
    /// from `now`, superseding any pending deadline.
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.message = message.into();
        self.visible = true;
        self.hide_at = Some(now + TOAST_DURATION);
    }

    /// Hide immediately and drop any pending deadline.
    pub fn hide(&mut self) {
        self.visible = false;
        self.hide_at = None;
    }

    /// Resolve the auto-hide deadline against `now`.
    pub fn poll(&mut self, now: Instant) {
        if let Some(deadline) = self.hide_at
            && now >= deadline
        {
            self.hide();
        }
    }

    /// Whether the toast is currently visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The most recently shown message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
