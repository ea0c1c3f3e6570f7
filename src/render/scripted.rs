//! Scripted rendering backend
//!
//! A deterministic in-memory stand-in for a browser session. A script is a
//! sequence of [`ScriptedPage`]s; `open` rewinds to the first page, and
//! every `click` or `navigate` advances to the next one. Tests build page
//! sequences to exercise the pagination state machine, the termination
//! policies, and the carousel walker without any real rendering.

use crate::render::{DriverError, DriverResult, RenderNode, Renderer};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// A fake DOM node with text, attributes, and selector-addressed children.
#[derive(Debug, Clone, Default)]
pub struct ScriptedNode {
    text: String,
    attributes: HashMap<String, String>,
    children: HashMap<String, ScriptedNode>,
}

impl ScriptedNode {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, selector: &str, node: ScriptedNode) -> Self {
        self.children.insert(selector.to_string(), node);
        self
    }
}

#[async_trait]
impl RenderNode for ScriptedNode {
    async fn text(&self) -> DriverResult<String> {
        Ok(self.text.clone())
    }

    async fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
        Ok(self.attributes.get(name).cloned())
    }

    async fn query(&self, selector: &str) -> DriverResult<Option<Self>> {
        Ok(self.children.get(selector).cloned())
    }
}

/// One rendered page in a script.
///
/// `collections` answers `query_all` by selector; `singles` answers
/// `query_one`, where an entry may also be a scripted failure (to model a
/// backend fault during a probe lookup). A selector with no entry at all
/// answers `query_one` with `NotFound`.
#[derive(Debug, Default)]
pub struct ScriptedPage {
    collections: HashMap<String, Vec<ScriptedNode>>,
    singles: HashMap<String, Result<ScriptedNode, DriverError>>,
}

impl ScriptedPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(mut self, selector: &str, nodes: Vec<ScriptedNode>) -> Self {
        self.collections.insert(selector.to_string(), nodes);
        self
    }

    pub fn single(mut self, selector: &str, node: ScriptedNode) -> Self {
        self.singles.insert(selector.to_string(), Ok(node));
        self
    }

    pub fn failing(mut self, selector: &str, error: DriverError) -> Self {
        self.singles.insert(selector.to_string(), Err(error));
        self
    }
}

/// A scripted rendering session over a fixed page sequence.
pub struct ScriptedRenderer {
    pages: Vec<ScriptedPage>,
    cursor: Mutex<usize>,
    clicks: Mutex<Vec<String>>,
    visited: Mutex<Vec<String>>,
}

impl ScriptedRenderer {
    pub fn new(pages: Vec<ScriptedPage>) -> Self {
        Self {
            pages,
            cursor: Mutex::new(0),
            clicks: Mutex::new(Vec::new()),
            visited: Mutex::new(Vec::new()),
        }
    }

    fn advance(&self) {
        let mut cursor = self.cursor.lock().unwrap();
        if *cursor + 1 < self.pages.len() {
            *cursor += 1;
        }
    }

    fn current(&self) -> &ScriptedPage {
        let cursor = *self.cursor.lock().unwrap();
        &self.pages[cursor]
    }

    /// Selectors clicked so far, in order.
    pub fn clicks(&self) -> Vec<String> {
        self.clicks.lock().unwrap().clone()
    }

    /// URLs opened or navigated to so far, in order.
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    type Node = ScriptedNode;

    async fn open(&self, url: &str) -> DriverResult<()> {
        self.visited.lock().unwrap().push(url.to_string());
        *self.cursor.lock().unwrap() = 0;
        Ok(())
    }

    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.visited.lock().unwrap().push(url.to_string());
        self.advance();
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> DriverResult<Vec<Self::Node>> {
        Ok(self
            .current()
            .collections
            .get(selector)
            .cloned()
            .unwrap_or_default())
    }

    async fn query_one(&self, selector: &str) -> DriverResult<Self::Node> {
        match self.current().singles.get(selector) {
            Some(Ok(node)) => Ok(node.clone()),
            Some(Err(error)) => Err(error.clone()),
            None => Err(DriverError::not_found(selector)),
        }
    }

    async fn click(&self, selector: &str) -> DriverResult<()> {
        self.clicks.lock().unwrap().push(selector.to_string());
        self.advance();
        Ok(())
    }

    async fn scroll_into_view(&self, _selector: &str) -> DriverResult<()> {
        Ok(())
    }

    async fn settle(&self, _delay: Duration) {
        // Scripted pages are always ready; tests should not sleep.
    }
}
