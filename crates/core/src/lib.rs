//! Promptbrary core: the generation workflow and everything it depends on.
//!
//! Holds the domain pieces shared by every front-end: the confirmation
//! dialog, durable history and saved-item lists, prompt templates, the
//! generic prompt-enhancement / social-post workflow, and the capability
//! traits (completer, clipboard, notifier, storage) hosts implement.

pub mod clock;
pub mod completion;
pub mod dialog;
pub mod error;
pub mod feedback;
pub mod history;
pub mod output;
pub mod prompts;
pub mod proxy;
pub mod storage;
pub mod types;
pub mod variant;
pub mod workflow;
