//! Rendering collaborator interface
//!
//! All DOM interaction goes through the narrow [`Renderer`]/[`RenderNode`]
//! capability surface (query/click/navigate/settle), so the pagination
//! state machine and extraction strategies are testable against a scripted
//! fake without a real browser. The live backend is a WebDriver session.

mod scripted;
mod webdriver;

pub use scripted::{ScriptedNode, ScriptedPage, ScriptedRenderer};
pub use webdriver::{WebDriverNode, WebDriverRenderer};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a rendering backend.
///
/// `NotFound` is load-bearing: the probe termination policy treats it as
/// the sole "no next page" signal, and anything else as a genuine fault.
/// Conflating the two would silently truncate a catalog.
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    #[error("no element matching `{selector}`")]
    NotFound { selector: String },

    #[error("rendering backend error: {0}")]
    Backend(String),
}

impl DriverError {
    pub fn not_found(selector: &str) -> Self {
        Self::NotFound {
            selector: selector.to_string(),
        }
    }

    /// True if this error means "the element is absent", as opposed to the
    /// backend itself failing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for rendering operations
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// One item-shaped node on a rendered page.
#[async_trait]
pub trait RenderNode: Send + Sync {
    /// Visible text content of the node.
    async fn text(&self) -> DriverResult<String>;

    /// Attribute value, or `None` if the attribute is absent.
    async fn attribute(&self, name: &str) -> DriverResult<Option<String>>;

    /// First descendant matching the selector, or `None`.
    ///
    /// Node-scoped lookups are optional-by-design: a missing sub-field is a
    /// data gap, not an error.
    async fn query(&self, selector: &str) -> DriverResult<Option<Self>>
    where
        Self: Sized;
}

/// A rendering session over one browser tab (or a scripted equivalent).
#[async_trait]
pub trait Renderer: Send + Sync {
    type Node: RenderNode;

    /// Opens the initial URL for a run.
    async fn open(&self, url: &str) -> DriverResult<()>;

    /// Navigates the existing session to a new URL.
    async fn navigate(&self, url: &str) -> DriverResult<()>;

    /// All nodes currently matching the selector. An empty result is not an
    /// error at this level; callers decide whether emptiness is structural.
    async fn query_all(&self, selector: &str) -> DriverResult<Vec<Self::Node>>;

    /// The first node matching the selector, or `DriverError::NotFound`.
    async fn query_one(&self, selector: &str) -> DriverResult<Self::Node>;

    /// Clicks the first node matching the selector.
    async fn click(&self, selector: &str) -> DriverResult<()>;

    /// Scrolls the first node matching the selector into view.
    async fn scroll_into_view(&self, selector: &str) -> DriverResult<()>;

    /// Waits out a settle delay. Item nodes may not exist yet if queried
    /// immediately after navigation, so controllers always settle before
    /// querying.
    async fn settle(&self, delay: Duration);
}
