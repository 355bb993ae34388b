//! Clipboard and toast capabilities plus the reentrancy guard used by the
//! copy and save actions.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::CoreError;

/// How long the "copied"/"saved" state stays on a control after success.
pub const FEEDBACK_WINDOW: Duration = Duration::from_secs(2);

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), CoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
        }
    }
}

/// Transient notifications.
pub trait Notifier: Send + Sync {
    fn toast(&self, toast: Toast);
}

// ---------------------------------------------------------------------------
// Guard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardState {
    Ready,
    InFlight,
    /// Succeeded; positive feedback shows until the deadline.
    Cooling(Instant),
}

/// Lets one action run at a time and holds it off for [`FEEDBACK_WINDOW`]
/// after a success. A failure releases it immediately.
#[derive(Debug, Clone)]
pub struct FeedbackGuard {
    state: GuardState,
    window: Duration,
}

impl Default for FeedbackGuard {
    fn default() -> Self {
        Self::new(FEEDBACK_WINDOW)
    }
}

impl FeedbackGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            state: GuardState::Ready,
            window,
        }
    }

    /// Claim the guard. `false` if an action is running or cooling down.
    pub fn try_begin(&mut self, now: Instant) -> bool {
        if self.is_busy(now) {
            return false;
        }
        self.state = GuardState::InFlight;
        true
    }

    pub fn succeed(&mut self, now: Instant) {
        self.state = GuardState::Cooling(now + self.window);
    }

    pub fn fail(&mut self) {
        self.state = GuardState::Ready;
    }

    pub fn is_busy(&self, now: Instant) -> bool {
        match self.state {
            GuardState::Ready => false,
            GuardState::InFlight => true,
            GuardState::Cooling(until) => now < until,
        }
    }

    /// Whether the success feedback is currently showing.
    pub fn feedback_active(&self, now: Instant) -> bool {
        matches!(self.state, GuardState::Cooling(until) if now < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_refused_while_in_flight() {
        let now = Instant::now();
        let mut guard = FeedbackGuard::default();
        assert!(guard.try_begin(now));
        assert!(!guard.try_begin(now));
    }

    #[test]
    fn success_holds_for_the_window() {
        let now = Instant::now();
        let mut guard = FeedbackGuard::default();
        assert!(guard.try_begin(now));
        guard.succeed(now);

        assert!(guard.feedback_active(now + Duration::from_millis(1999)));
        assert!(!guard.try_begin(now + Duration::from_millis(1999)));
        assert!(!guard.feedback_active(now + FEEDBACK_WINDOW));
        assert!(guard.try_begin(now + FEEDBACK_WINDOW));
    }

    #[test]
    fn failure_releases_immediately() {
        let now = Instant::now();
        let mut guard = FeedbackGuard::default();
        assert!(guard.try_begin(now));
        guard.fail();
        assert!(!guard.feedback_active(now));
        assert!(guard.try_begin(now));
    }
}
