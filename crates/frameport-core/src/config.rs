//! Embedding configuration and its resolution chain.
//!
//! Every option can come from several places. The precedence is fixed:
//!
//! ```text
//! explicit option ──> element attribute ──> ambient global ──> default
//! ```
//!
//! [`resolve`] walks that chain once, before the engine starts. The result is
//! a plain [`ResolvedConfig`]; nothing re-reads attributes afterwards.

use std::{fmt, future::Future};

use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};

/// Notebook served when nothing else configures a source.
pub const DEFAULT_SRC: &str = "https://unpkg.com/starboard-notebook@0.11.1/dist/index.html";

/// Sandbox policy applied when nothing else configures one.
pub const DEFAULT_SANDBOX: &str = "allow-scripts allow-modals allow-same-origin allow-pointer-lock allow-top-navigation-by-user-activation allow-forms allow-downloads";

/// Content to inject into the notebook once the frame is ready.
///
/// The deferred form lets a host start the embed before the content has been
/// fetched; the engine awaits it only when the frame signals readiness.
#[derive(Clone)]
pub enum InitialContent {
    /// Content available up front
    Ready(String),
    /// Content still being produced
    Deferred(Shared<BoxFuture<'static, String>>),
}

impl InitialContent {
    /// Wrap a future producing the content.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = String> + Send + 'static,
    {
        Self::Deferred(future.boxed().shared())
    }

    /// Wait for the content.
    pub async fn resolve(self) -> String {
        match self {
            Self::Ready(content) => content,
            Self::Deferred(future) => future.await,
        }
    }

    /// Content if it is already available.
    pub fn peek(&self) -> Option<&str> {
        match self {
            Self::Ready(content) => Some(content.as_str()),
            Self::Deferred(_) => None,
        }
    }
}

impl fmt::Debug for InitialContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(content) => f.debug_tuple("Ready").field(&content.len()).finish(),
            Self::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

impl From<String> for InitialContent {
    fn from(content: String) -> Self {
        Self::Ready(content)
    }
}

impl From<&str> for InitialContent {
    fn from(content: &str) -> Self {
        Self::Ready(content.to_string())
    }
}

/// Read access to the attributes of the element hosting the frame.
pub trait AttributeSource {
    /// Value of the named attribute, if set.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Value of a `data-*` attribute, keyed without the prefix.
    fn data_attribute(&self, key: &str) -> Option<String> {
        self.attribute(&format!("data-{key}"))
    }

    /// Text of an inline content script nested in the element, if any.
    fn inline_script(&self) -> Option<String> {
        None
    }
}

/// An element with no attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAttributes;

impl AttributeSource for NoAttributes {
    fn attribute(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Page-wide settings consulted after element attributes.
#[derive(Debug, Clone, Default)]
pub struct Ambient {
    /// Page-wide default notebook source
    pub iframe_src: Option<String>,
}

/// Options supplied explicitly by the host. Unset fields fall through the
/// resolution chain.
#[derive(Debug, Clone, Default)]
pub struct EmbedOptions {
    /// Notebook URL loaded into the frame
    pub src: Option<String>,
    /// Base URL handed to the notebook with its initial content
    pub base_url: Option<String>,
    /// Follow the frame's resize requests
    pub auto_resize: Option<bool>,
    /// Frame sandbox policy
    pub sandbox: Option<String>,
    /// Content injected when the frame is ready
    pub notebook_content: Option<InitialContent>,
    /// Ask before leaving the page with unsaved changes
    pub prevent_navigation_with_unsaved_changes: Option<bool>,
}

impl EmbedOptions {
    /// Empty options; everything falls through to attributes and defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the notebook source URL.
    #[must_use]
    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Enable or disable auto-resize.
    #[must_use]
    pub fn with_auto_resize(mut self, auto_resize: bool) -> Self {
        self.auto_resize = Some(auto_resize);
        self
    }

    /// Set the sandbox policy.
    #[must_use]
    pub fn with_sandbox(mut self, sandbox: impl Into<String>) -> Self {
        self.sandbox = Some(sandbox.into());
        self
    }

    /// Set the initial notebook content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<InitialContent>) -> Self {
        self.notebook_content = Some(content.into());
        self
    }

    /// Enable or disable the unsaved-changes navigation guard.
    #[must_use]
    pub fn with_navigation_guard(mut self, enabled: bool) -> Self {
        self.prevent_navigation_with_unsaved_changes = Some(enabled);
        self
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Notebook URL loaded into the frame
    pub src: String,
    /// Base URL handed to the notebook with its initial content
    pub base_url: Option<String>,
    /// Follow the frame's resize requests
    pub auto_resize: bool,
    /// Frame sandbox policy
    pub sandbox: String,
    /// Content injected when the frame is ready
    pub notebook_content: Option<InitialContent>,
    /// Ask before leaving the page with unsaved changes
    pub prevent_navigation_with_unsaved_changes: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve(&EmbedOptions::default(), &NoAttributes, &Ambient::default())
    }
}

/// Resolve options against element attributes, ambient settings and
/// defaults.
///
/// Empty strings count as unset for `base_url` and `notebook_content`, since
/// an empty notebook is indistinguishable from no notebook.
pub fn resolve(
    options: &EmbedOptions,
    attributes: &dyn AttributeSource,
    ambient: &Ambient,
) -> ResolvedConfig {
    let src = options
        .src
        .clone()
        .or_else(|| attributes.attribute("src"))
        .or_else(|| ambient.iframe_src.clone())
        .unwrap_or_else(|| DEFAULT_SRC.to_string());

    let base_url = non_empty(options.base_url.clone())
        .or_else(|| non_empty(attributes.data_attribute("base-url")));

    let sandbox = options
        .sandbox
        .clone()
        .or_else(|| attributes.attribute("sandbox"))
        .unwrap_or_else(|| DEFAULT_SANDBOX.to_string());

    let notebook_content = match &options.notebook_content {
        Some(InitialContent::Ready(content)) if content.is_empty() => None,
        Some(content) => Some(content.clone()),
        None => None,
    }
    .or_else(|| non_empty(attributes.inline_script()).map(InitialContent::Ready));

    ResolvedConfig {
        src,
        base_url,
        auto_resize: options.auto_resize.unwrap_or(true),
        sandbox,
        notebook_content,
        prevent_navigation_with_unsaved_changes: options
            .prevent_navigation_with_unsaved_changes
            .unwrap_or(false),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
