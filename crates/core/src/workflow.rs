//! Generation workflow: validate, call the provider, render, persist, and
//! the copy / save / re-submit actions on the rendered output.
//!
//! ```text
//! Idle ──submit──▶ Validating ──ok──▶ Pending ──success──▶ Rendered
//!   ▲                  │                 │                    │
//!   └──── invalid ─────┘                 └─ failure: back to  │
//!                                           the prior state   │
//!            Rendered ──re_submit / submit──▶ Pending ◀───────┘
//! ```
//!
//! All operations take `&self`. Interior state sits behind a mutex that is
//! never held across an await, so overlapping UI callbacks are serialized
//! by [`WorkflowState`] rather than by disabled controls.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::time::Instant;

use crate::clock::EntryClock;
use crate::completion::{Completer, CompletionRequest, DEFAULT_MODEL};
use crate::dialog::{Dialog, ERROR_TITLE};
use crate::error::CoreError;
use crate::feedback::{Clipboard, FeedbackGuard, Notifier, Toast};
use crate::history::{HistoryStore, SavedEntry, SavedStore};
use crate::output::{CharCount, OutputSurface};
use crate::storage::KeyValueStore;
use crate::variant::GenerationKind;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Validating,
    Pending,
    Rendered,
}

/// Who supplies the provider API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// The user must enter a key; submitting without one is rejected.
    UserSupplied,
    /// Requests go through the server proxy, which holds its own key.
    ServerHeld,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The completion was rendered and recorded in history.
    Rendered(String),
    /// The provider returned nothing usable; nothing changed.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Performed,
    /// Not applicable right now (no output, wrong state, or still in its
    /// feedback window).
    Ignored,
}

/// Derived enablement and labels of the workflow's controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub copy_enabled: bool,
    pub save_enabled: bool,
    pub resubmit_enabled: bool,
    pub copy_feedback: bool,
    pub save_feedback: bool,
    pub input_count: CharCount,
    pub output_count: CharCount,
}

/// Capabilities a workflow needs from its host.
#[derive(Clone)]
pub struct WorkflowDeps {
    pub completer: Arc<dyn Completer>,
    pub dialog: Arc<dyn Dialog>,
    pub clipboard: Arc<dyn Clipboard>,
    pub notifier: Arc<dyn Notifier>,
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<EntryClock>,
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

struct Inner<K: GenerationKind> {
    state: WorkflowState,
    input: String,
    api_key: String,
    options: K::Options,
    model: String,
    output: OutputSurface,
    copy_guard: FeedbackGuard,
    save_guard: FeedbackGuard,
}

/// A request admitted past validation.
struct PendingCall {
    request: CompletionRequest,
    input: String,
    tag: String,
    model: String,
}

/// Puts the state and output back where `admit` found them unless
/// disarmed. Also runs when the caller drops an in-flight `submit`.
struct RestoreOnDrop<'a, K: GenerationKind> {
    workflow: &'a GenerationWorkflow<K>,
    prior: Option<(WorkflowState, OutputSurface)>,
}

impl<K: GenerationKind> RestoreOnDrop<'_, K> {
    fn disarm(mut self) {
        self.prior = None;
    }
}

impl<K: GenerationKind> Drop for RestoreOnDrop<'_, K> {
    fn drop(&mut self) {
        if let Some((state, output)) = self.prior.take() {
            let mut inner = self.workflow.lock();
            inner.state = state;
            inner.output = output;
        }
    }
}

/// Releases the copy guard unless the clipboard write settled it.
struct CopyInFlight<'a, K: GenerationKind> {
    workflow: &'a GenerationWorkflow<K>,
    settled: bool,
}

impl<K: GenerationKind> Drop for CopyInFlight<'_, K> {
    fn drop(&mut self) {
        if !self.settled {
            self.workflow.lock().copy_guard.fail();
        }
    }
}

/// Why a submit was refused before any network call.
struct Rejection {
    error: CoreError,
    message: &'static str,
    title: &'static str,
}

pub struct GenerationWorkflow<K: GenerationKind> {
    completer: Arc<dyn Completer>,
    dialog: Arc<dyn Dialog>,
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
    history: HistoryStore,
    saved: SavedStore,
    clock: Arc<EntryClock>,
    key_policy: KeyPolicy,
    inner: Mutex<Inner<K>>,
}

impl<K: GenerationKind> GenerationWorkflow<K> {
    pub fn new(deps: WorkflowDeps, key_policy: KeyPolicy) -> Self {
        Self {
            completer: deps.completer,
            dialog: deps.dialog,
            clipboard: deps.clipboard,
            notifier: deps.notifier,
            history: HistoryStore::new(Arc::clone(&deps.store)),
            saved: SavedStore::new(deps.store, K::SAVED_KEY),
            clock: deps.clock,
            key_policy,
            inner: Mutex::new(Inner {
                state: WorkflowState::Idle,
                input: String::new(),
                api_key: String::new(),
                options: K::Options::default(),
                model: DEFAULT_MODEL.to_string(),
                output: OutputSurface::new(K::LABELS.placeholder),
                copy_guard: FeedbackGuard::default(),
                save_guard: FeedbackGuard::default(),
            }),
        }
    }

    // ---- field setters (form inputs) ----

    pub fn set_input(&self, text: &str) {
        self.lock().input = text.to_string();
    }

    pub fn set_api_key(&self, key: &str) {
        self.lock().api_key = key.to_string();
    }

    pub fn set_options(&self, options: K::Options) {
        self.lock().options = options;
    }

    pub fn set_model(&self, model: &str) {
        self.lock().model = model.to_string();
    }

    /// Apply a user edit to the rendered output. Control enablement is
    /// derived from the new text on the next [`controls`](Self::controls).
    pub fn edit_output(&self, text: &str) -> bool {
        self.lock().output.edit(text)
    }

    // ---- observers ----

    pub fn state(&self) -> WorkflowState {
        self.lock().state
    }

    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    pub fn options(&self) -> K::Options {
        self.lock().options.clone()
    }

    pub fn output(&self) -> OutputSurface {
        self.lock().output.clone()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn saved(&self) -> &SavedStore {
        &self.saved
    }

    pub fn controls(&self) -> ControlState {
        let now = Instant::now();
        let inner = self.lock();
        let pending = inner.state == WorkflowState::Pending;
        let actionable = Self::actionable(&inner);

        ControlState {
            submit_enabled: !pending,
            submit_label: if pending { K::LABELS.loading } else { K::LABELS.submit },
            copy_enabled: actionable,
            save_enabled: actionable,
            resubmit_enabled: actionable,
            copy_feedback: inner.copy_guard.feedback_active(now),
            save_feedback: inner.save_guard.feedback_active(now),
            input_count: CharCount::of(&inner.input),
            output_count: inner.output.char_count(),
        }
    }

    // ---- operations ----

    /// Validate the form, call the provider and render the result.
    ///
    /// Validation and provider failures are shown in the dialog before the
    /// error is returned; the workflow is back in its prior state by then.
    pub async fn submit(&self) -> Result<SubmitOutcome, CoreError> {
        let (call, restore) = match self.admit() {
            Ok(admitted) => admitted,
            Err(rejection) => {
                if !matches!(rejection.error, CoreError::InvalidState(_)) {
                    self.dialog.alert(rejection.message, rejection.title).await;
                }
                return Err(rejection.error);
            }
        };

        tracing::info!(workflow = K::NAME, model = %call.model, tag = %call.tag, "Requesting completion");
        let result = self.completer.complete(&call.request).await;

        match result {
            Ok(completion) if !completion.text.is_empty() => {
                restore.disarm();
                Ok(self.finish_rendered(call, completion.text))
            }
            Ok(_) => {
                tracing::warn!(workflow = K::NAME, "Provider returned an empty completion");
                drop(restore);
                Ok(SubmitOutcome::Empty)
            }
            Err(CoreError::Parse(reason)) => {
                tracing::warn!(workflow = K::NAME, %reason, "Unparseable completion treated as empty");
                drop(restore);
                Ok(SubmitOutcome::Empty)
            }
            Err(err) => {
                tracing::warn!(workflow = K::NAME, error = %err, "Completion failed");
                drop(restore);
                let detail = match err.user_message() {
                    "" => K::LABELS.failure_fallback,
                    message => message,
                };
                self.dialog.error(&format!("Error: {detail}"), ERROR_TITLE).await;
                Err(err)
            }
        }
    }

    /// Copy the output to the clipboard. Ignored while a previous copy is
    /// still showing its feedback.
    pub async fn copy(&self) -> Result<ActionOutcome, CoreError> {
        let text = {
            let mut inner = self.lock();
            if !Self::actionable(&inner) || !inner.copy_guard.try_begin(Instant::now()) {
                return Ok(ActionOutcome::Ignored);
            }
            inner.output.text().to_string()
        };
        let mut in_flight = CopyInFlight {
            workflow: self,
            settled: false,
        };

        match self.clipboard.write_text(&text).await {
            Ok(()) => {
                in_flight.settled = true;
                self.lock().copy_guard.succeed(Instant::now());
                self.notifier.toast(Toast::success(K::LABELS.copied));
                Ok(ActionOutcome::Performed)
            }
            Err(err) => {
                tracing::warn!(workflow = K::NAME, error = %err, "Clipboard write failed");
                drop(in_flight);
                self.notifier.toast(Toast::error(K::LABELS.copy_failed));
                Err(err)
            }
        }
    }

    /// Append the output to the saved items. Saving the same text again
    /// (after the feedback window) stores a second entry.
    pub fn save(&self) -> Result<ActionOutcome, CoreError> {
        let mut inner = self.lock();
        if !Self::actionable(&inner) || !inner.save_guard.try_begin(Instant::now()) {
            return Ok(ActionOutcome::Ignored);
        }

        let text = inner.output.text().to_string();
        match self.saved.save(&self.clock, &text) {
            Ok(SavedEntry { id, .. }) => {
                inner.save_guard.succeed(Instant::now());
                drop(inner);
                tracing::info!(workflow = K::NAME, id, "Saved output");
                self.notifier.toast(Toast::success(K::LABELS.saved));
                Ok(ActionOutcome::Performed)
            }
            Err(err) => {
                inner.save_guard.fail();
                drop(inner);
                tracing::warn!(workflow = K::NAME, error = %err, "Saving output failed");
                self.notifier.toast(Toast::error(K::LABELS.save_failed));
                Err(err)
            }
        }
    }

    /// Feed the (possibly edited) output back in as the input and submit.
    /// `Ok(None)` when there is nothing to re-submit.
    pub async fn re_submit(&self) -> Result<Option<SubmitOutcome>, CoreError> {
        {
            let mut inner = self.lock();
            if !Self::actionable(&inner) {
                return Ok(None);
            }
            inner.input = inner.output.text().to_string();
        }
        self.submit().await.map(Some)
    }

    // ---- internals ----

    fn actionable(inner: &Inner<K>) -> bool {
        inner.state == WorkflowState::Rendered && inner.output.has_content()
    }

    /// Validate and, if admitted, move to `Pending` with a cleared output.
    /// Dropping the returned guard undoes the move.
    fn admit(&self) -> Result<(PendingCall, RestoreOnDrop<'_, K>), Rejection> {
        let mut inner = self.lock();
        if inner.state == WorkflowState::Pending {
            return Err(Rejection {
                error: CoreError::InvalidState("a generation is already in flight".into()),
                message: "",
                title: "",
            });
        }

        let prior_state = inner.state;
        inner.state = WorkflowState::Validating;

        let input = inner.input.trim().to_string();
        if input.is_empty() {
            inner.state = prior_state;
            return Err(Rejection {
                error: CoreError::Validation("missing input".into()),
                message: K::LABELS.missing_input,
                title: K::LABELS.missing_input_title,
            });
        }

        let api_key = inner.api_key.trim().to_string();
        if api_key.is_empty() && self.key_policy == KeyPolicy::UserSupplied {
            inner.state = prior_state;
            return Err(Rejection {
                error: CoreError::Validation("missing key".into()),
                message: K::LABELS.missing_key,
                title: K::LABELS.missing_key_title,
            });
        }

        let request = CompletionRequest::new(
            K::system_prompt(&inner.options),
            K::user_prompt(&input, &inner.options),
            K::proxy_payload(&input, &inner.options),
        )
        .with_api_key((!api_key.is_empty()).then_some(api_key))
        .with_model(inner.model.clone());

        let call = PendingCall {
            request,
            tag: K::history_tag(&inner.options),
            model: inner.model.clone(),
            input,
        };
        let restore = RestoreOnDrop {
            workflow: self,
            prior: Some((prior_state, inner.output.clone())),
        };

        inner.state = WorkflowState::Pending;
        inner.output.clear();
        Ok((call, restore))
    }

    fn finish_rendered(&self, call: PendingCall, text: String) -> SubmitOutcome {
        {
            let mut inner = self.lock();
            inner.output.render(&text);
            inner.state = WorkflowState::Rendered;
        }

        match self
            .history
            .record(&self.clock, &call.input, &text, &call.model, &call.tag)
        {
            Ok(entry) => {
                tracing::info!(workflow = K::NAME, id = entry.id, chars = text.len(), "Completion rendered");
            }
            Err(err) => {
                tracing::warn!(workflow = K::NAME, error = %err, "Recording history failed");
                self.notifier.toast(Toast::error("Failed to save to history"));
            }
        }

        SubmitOutcome::Rendered(text)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
