//! Confirmation dialog: a single shared modal used for alerts,
//! confirmations and error reports.
//!
//! The [`Dialog`] trait is the capability workflows depend on;
//! [`ConfirmationDialog`] is the real implementation, a two-state
//! (`Hidden` / `Visible`) machine whose pending outcome is delivered over a
//! oneshot channel. Test code substitutes its own [`Dialog`].

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

pub const DEFAULT_TITLE: &str = "Alert";
pub const DEFAULT_CONFIRM_TEXT: &str = "OK";
pub const DEFAULT_CANCEL_TEXT: &str = "Cancel";
pub const CONFIRM_TITLE: &str = "Confirm";
pub const ERROR_TITLE: &str = "Error";

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One show/resolve cycle worth of dialog content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub title: String,
    /// Plain text, or raw markup when `is_html` is set.
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
    pub show_cancel: bool,
    pub is_html: bool,
}

impl Default for DialogRequest {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            message: String::new(),
            confirm_text: DEFAULT_CONFIRM_TEXT.to_string(),
            cancel_text: DEFAULT_CANCEL_TEXT.to_string(),
            show_cancel: false,
            is_html: false,
        }
    }
}

impl DialogRequest {
    /// Informational message with only the confirm control.
    pub fn alert(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Yes/no question; confirm maps to `true`, everything else to `false`.
    pub fn confirm(message: impl Into<String>) -> Self {
        Self {
            title: CONFIRM_TITLE.to_string(),
            message: message.into(),
            confirm_text: "Confirm".to_string(),
            show_cancel: true,
            ..Self::default()
        }
    }

    /// Same shape as [`alert`](Self::alert) with an error title.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: ERROR_TITLE.to_string(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Raw markup body with an empty title.
    pub fn html(markup: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            message: markup.into(),
            is_html: true,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Capability trait
// ---------------------------------------------------------------------------

/// Modal dialog capability injected into workflows.
#[async_trait]
pub trait Dialog: Send + Sync {
    /// Show `request` and wait for the user's answer.
    async fn show(&self, request: DialogRequest) -> bool;

    async fn alert(&self, message: &str, title: &str) -> bool {
        self.show(DialogRequest::alert(message).with_title(title))
            .await
    }

    async fn confirm(&self, message: &str, title: &str) -> bool {
        self.show(DialogRequest::confirm(message).with_title(title))
            .await
    }

    async fn error(&self, message: &str, title: &str) -> bool {
        self.show(DialogRequest::error(message).with_title(title))
            .await
    }
}

// ---------------------------------------------------------------------------
// Shared implementation
// ---------------------------------------------------------------------------

/// Observable state of a [`ConfirmationDialog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogSnapshot {
    pub visible: bool,
    pub request: Option<DialogRequest>,
    /// Page scrolling is suspended while the dialog is visible.
    pub scroll_locked: bool,
    /// The confirm control holds input focus while the dialog is visible.
    pub confirm_focused: bool,
}

struct VisibleDialog {
    request: DialogRequest,
    responder: oneshot::Sender<bool>,
}

/// The single shared modal. At most one request is visible at a time.
#[derive(Default)]
pub struct ConfirmationDialog {
    visible: Mutex<Option<VisibleDialog>>,
}

/// Outcome of a dialog opened with [`ConfirmationDialog::open`].
pub struct PendingOutcome(oneshot::Receiver<bool>);

impl PendingOutcome {
    /// Wait for the answer. A dialog abandoned without an answer counts as
    /// declined.
    pub async fn outcome(self) -> bool {
        self.0.await.unwrap_or(false)
    }
}

impl ConfirmationDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `request` visible and return a handle to its outcome.
    ///
    /// A request that is still visible is resolved as declined first.
    pub fn open(&self, request: DialogRequest) -> PendingOutcome {
        let (tx, rx) = oneshot::channel();
        let mut visible = self.lock();
        if let Some(previous) = visible.take() {
            tracing::debug!(title = %previous.request.title, "Dialog replaced while visible");
            let _ = previous.responder.send(false);
        }
        tracing::debug!(title = %request.title, show_cancel = request.show_cancel, "Dialog shown");
        *visible = Some(VisibleDialog {
            request,
            responder: tx,
        });
        PendingOutcome(rx)
    }

    /// Activate the confirm control. Returns `false` if nothing was visible.
    pub fn click_confirm(&self) -> bool {
        self.resolve(true)
    }

    pub fn click_cancel(&self) -> bool {
        self.resolve(false)
    }

    pub fn click_close(&self) -> bool {
        self.resolve(false)
    }

    /// Click on the overlay outside the dialog body.
    pub fn click_backdrop(&self) -> bool {
        self.resolve(false)
    }

    /// Hide programmatically; a pending outcome resolves as declined.
    pub fn hide(&self) -> bool {
        self.resolve(false)
    }

    pub fn is_visible(&self) -> bool {
        self.lock().is_some()
    }

    pub fn snapshot(&self) -> DialogSnapshot {
        let visible = self.lock();
        match visible.as_ref() {
            Some(active) => DialogSnapshot {
                visible: true,
                request: Some(active.request.clone()),
                scroll_locked: true,
                confirm_focused: true,
            },
            None => DialogSnapshot {
                visible: false,
                request: None,
                scroll_locked: false,
                confirm_focused: false,
            },
        }
    }

    fn resolve(&self, confirmed: bool) -> bool {
        match self.lock().take() {
            Some(active) => {
                tracing::debug!(title = %active.request.title, confirmed, "Dialog resolved");
                let _ = active.responder.send(confirmed);
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<VisibleDialog>> {
        self.visible
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Dialog for ConfirmationDialog {
    async fn show(&self, request: DialogRequest) -> bool {
        let pending = self.open(request);
        pending.outcome().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn request_defaults() {
        let request = DialogRequest::default();
        assert_eq!(request.title, "Alert");
        assert_eq!(request.confirm_text, "OK");
        assert_eq!(request.cancel_text, "Cancel");
        assert!(!request.show_cancel);
        assert!(!request.is_html);
    }

    #[test]
    fn confirm_request_shows_cancel() {
        let request = DialogRequest::confirm("Delete?");
        assert_eq!(request.title, "Confirm");
        assert!(request.show_cancel);
    }

    #[test]
    fn error_request_uses_error_title() {
        assert_eq!(DialogRequest::error("boom").title, "Error");
    }

    #[tokio::test]
    async fn confirm_control_resolves_true() {
        let dialog = ConfirmationDialog::new();
        let pending = dialog.open(DialogRequest::confirm("Delete?"));
        assert!(dialog.click_confirm());
        assert!(pending.outcome().await);
        assert!(!dialog.is_visible());
    }

    #[tokio::test]
    async fn cancel_close_and_backdrop_resolve_false() {
        let dialog = ConfirmationDialog::new();

        let pending = dialog.open(DialogRequest::confirm("Delete?"));
        dialog.click_cancel();
        assert!(!pending.outcome().await);

        let pending = dialog.open(DialogRequest::confirm("Delete?"));
        dialog.click_close();
        assert!(!pending.outcome().await);

        let pending = dialog.open(DialogRequest::confirm("Delete?"));
        dialog.click_backdrop();
        assert!(!pending.outcome().await);

        let pending = dialog.open(DialogRequest::confirm("Delete?"));
        dialog.hide();
        assert!(!pending.outcome().await);
    }

    #[tokio::test]
    async fn new_request_declines_the_previous_one() {
        let dialog = ConfirmationDialog::new();
        let first = dialog.open(DialogRequest::alert("first"));
        let second = dialog.open(DialogRequest::alert("second"));

        assert!(!first.outcome().await);
        assert_eq!(
            dialog.snapshot().request.map(|r| r.message),
            Some("second".to_string())
        );

        dialog.click_confirm();
        assert!(second.outcome().await);
    }

    #[test]
    fn visible_dialog_locks_scroll_and_focuses_confirm() {
        let dialog = ConfirmationDialog::new();
        assert!(!dialog.snapshot().scroll_locked);

        let _pending = dialog.open(DialogRequest::alert("hello"));
        let snapshot = dialog.snapshot();
        assert!(snapshot.visible);
        assert!(snapshot.scroll_locked);
        assert!(snapshot.confirm_focused);

        dialog.hide();
        assert!(!dialog.snapshot().confirm_focused);
    }

    #[test]
    fn clicks_without_a_visible_dialog_are_ignored() {
        let dialog = ConfirmationDialog::new();
        assert!(!dialog.click_confirm());
        assert!(!dialog.hide());
    }

    #[tokio::test]
    async fn trait_confirm_waits_for_user() {
        let dialog = Arc::new(ConfirmationDialog::new());
        let shown = Arc::clone(&dialog);
        let task = tokio::spawn(async move { shown.confirm("Delete?", "Confirm").await });

        while !dialog.is_visible() {
            tokio::task::yield_now().await;
        }
        let request = dialog.snapshot().request.expect("visible request");
        assert!(request.show_cancel);
        dialog.click_confirm();

        assert!(task.await.expect("task completes"));
    }
}
