//! # genui core
//!
//! Compile-and-render pipeline turning a UI DSL into a live page region:
//!
//! 1. [`CredentialProvider`] resolves the API key from a [`CredentialStore`],
//!    prompting through a [`CredentialPrompt`] when nothing is stored.
//! 2. [`DataFetcher`] GETs the initial data and yields the DSL script.
//! 3. [`CompilerClient`] asks the generative AI endpoint to compile the DSL
//!    into a single self-contained `<div>`.
//! 4. [`split`] separates `<script>` blocks from the static markup.
//! 5. [`OutputRenderer`] swaps the output region of the [`HostPage`] and
//!    activates the scripts once their markup is attached.
//!
//! [`Pipeline::run`] drives all five stages and renders any failure into the
//! same region.
//!
//! [`CredentialStore`]: genui_config::credential::CredentialStore

mod compiler;
mod credential;
mod fetch;
pub mod model;
mod page;
mod pipeline;
mod render;
mod splitter;


pub use compiler::{CompilerClient, build_prompt};
pub use credential::{Credential, CredentialPrompt, CredentialProvider, DeclinePrompt};
pub use fetch::DataFetcher;
pub use page::{EventKind, HostPage, Listener, ListenerAction, ListenerRegistry, Region, ScriptElement};
pub use pipeline::Pipeline;
pub use render::{DeferredScripts, OutputRenderer, RenderState, ScriptHost};
pub use splitter::{BlockSpan, SplitOutput, split, strip_code_fence};

use genui_config::credential::StoreError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("API key is required to use this application")]
    MissingCredential,
    #[error("Credential store error: {0}")]
    CredentialStore(#[from] StoreError),
    #[error("Failed to fetch data from {url}. Is the backend running? ({reason})")]
    Fetch { url: String, reason: String },
    #[error("Malformed response from {source_name}: {reason}")]
    MalformedResponse { source_name: String, reason: String },
    #[error("Compile request failed with status {status}: {body}")]
    CompileRequest { status: u16, body: String },
    #[error("Failed to reach the compile endpoint: {0}")]
    CompileTransport(String),
    #[error("Compile endpoint returned no generated text")]
    CompileEmptyResponse,
}
