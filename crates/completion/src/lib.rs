//! HTTP clients for remote completions.
//!
//! [`client::CompletionClient`] calls an OpenAI-compatible provider
//! directly; [`proxy::ProxyClient`] goes through the Promptbrary server.
//! Both implement the core `Completer` trait.

pub mod client;
pub mod error;
pub mod proxy;

pub use client::{ChatBackend, CompletionClient};
pub use error::CompletionError;
pub use proxy::ProxyClient;
