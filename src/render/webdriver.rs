//! WebDriver rendering backend
//!
//! The live backend: one [`WebDriverRenderer`] owns one browser session
//! driven over the WebDriver protocol. A missing element comes back from
//! the wire as a `NoSuchElement` error, which maps to
//! [`DriverError::NotFound`]; every other protocol failure maps to
//! [`DriverError::Backend`] so the probe termination policy can tell the
//! two apart.

use crate::render::{DriverError, DriverResult, RenderNode, Renderer};
use async_trait::async_trait;
use std::time::Duration;
use thirtyfour::error::{WebDriverError, WebDriverErrorInner};
use thirtyfour::{By, DesiredCapabilities, WebDriver, WebElement};

fn map_err(selector: &str, err: WebDriverError) -> DriverError {
    match err.as_inner() {
        WebDriverErrorInner::NoSuchElement(_) => DriverError::not_found(selector),
        _ => DriverError::Backend(err.to_string()),
    }
}

/// A rendering session backed by a WebDriver-compatible browser.
pub struct WebDriverRenderer {
    driver: WebDriver,
}

impl WebDriverRenderer {
    /// Connects to a running WebDriver server and starts a browser session.
    pub async fn connect(server_url: &str) -> DriverResult<Self> {
        let caps = DesiredCapabilities::chrome();
        let driver = WebDriver::new(server_url, caps)
            .await
            .map_err(|e| DriverError::Backend(e.to_string()))?;
        Ok(Self { driver })
    }

    /// Ends the browser session. Sessions left open leak browser processes
    /// on the WebDriver host.
    pub async fn quit(self) -> DriverResult<()> {
        self.driver
            .quit()
            .await
            .map_err(|e| DriverError::Backend(e.to_string()))
    }
}

/// A live DOM element held by the WebDriver session.
pub struct WebDriverNode {
    element: WebElement,
}

#[async_trait]
impl RenderNode for WebDriverNode {
    async fn text(&self) -> DriverResult<String> {
        self.element
            .text()
            .await
            .map_err(|e| DriverError::Backend(e.to_string()))
    }

    async fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
        self.element
            .attr(name)
            .await
            .map_err(|e| DriverError::Backend(e.to_string()))
    }

    async fn query(&self, selector: &str) -> DriverResult<Option<Self>> {
        match self.element.find(By::Css(selector)).await {
            Ok(element) => Ok(Some(Self { element })),
            Err(err) => match err.as_inner() {
                WebDriverErrorInner::NoSuchElement(_) => Ok(None),
                _ => Err(DriverError::Backend(err.to_string())),
            },
        }
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    type Node = WebDriverNode;

    async fn open(&self, url: &str) -> DriverResult<()> {
        self.driver
            .goto(url)
            .await
            .map_err(|e| DriverError::Backend(e.to_string()))
    }

    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.open(url).await
    }

    async fn query_all(&self, selector: &str) -> DriverResult<Vec<Self::Node>> {
        let elements = self
            .driver
            .find_all(By::Css(selector))
            .await
            .map_err(|e| map_err(selector, e))?;
        Ok(elements
            .into_iter()
            .map(|element| WebDriverNode { element })
            .collect())
    }

    async fn query_one(&self, selector: &str) -> DriverResult<Self::Node> {
        let element = self
            .driver
            .find(By::Css(selector))
            .await
            .map_err(|e| map_err(selector, e))?;
        Ok(WebDriverNode { element })
    }

    async fn click(&self, selector: &str) -> DriverResult<()> {
        let node = self.query_one(selector).await?;
        node.element
            .click()
            .await
            .map_err(|e| map_err(selector, e))
    }

    async fn scroll_into_view(&self, selector: &str) -> DriverResult<()> {
        let node = self.query_one(selector).await?;
        node.element
            .scroll_into_view()
            .await
            .map_err(|e| map_err(selector, e))
    }

    async fn settle(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
