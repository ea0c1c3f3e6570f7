//! Cycle-detecting carousel walker
//!
//! The bundle gallery presents one active slide at a time and wraps around
//! with no page boundary to terminate on. The walker keeps a set of seen
//! identifiers and stops the first time a freshly read identifier repeats.
//! There is no counted bound: termination is guaranteed only because the
//! underlying carousel is finite and wraps.

use crate::catalog::BundleGame;
use crate::render::{RenderNode, Renderer};
use crate::scrape::controller::SettleDelay;
use crate::{Result, SyncError};
use std::collections::HashSet;

/// Selector table for one gallery's carousel.
#[derive(Debug, Clone)]
pub struct CarouselSelectors {
    /// Carousel container, scrolled into view before the walk starts.
    pub container: Option<String>,

    /// Name of the currently active slide. Doubles as the cycle
    /// identifier.
    pub active_name: String,

    /// Developer credit of the currently active slide.
    pub active_developer: String,

    /// The control advancing to the next slide.
    pub next_control: String,
}

/// Walks a wrapping carousel, collecting one record per distinct slide.
pub struct CarouselWalker<'a, R: Renderer> {
    renderer: &'a R,
    selectors: &'a CarouselSelectors,
    delay: SettleDelay,
    gallery: String,
}

impl<'a, R: Renderer> CarouselWalker<'a, R> {
    pub fn new(
        renderer: &'a R,
        selectors: &'a CarouselSelectors,
        delay: SettleDelay,
        gallery: &str,
    ) -> Self {
        Self {
            renderer,
            selectors,
            delay,
            gallery: gallery.to_string(),
        }
    }

    async fn active_text(&self, selector: &str) -> Result<String> {
        match self.renderer.query_one(selector).await {
            Ok(node) => Ok(node.text().await?),
            Err(e) if e.is_not_found() => Err(SyncError::Structural {
                retailer: self.gallery.clone(),
                selector: selector.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Collects every distinct slide, stopping on the first repeat.
    pub async fn run(&self) -> Result<Vec<BundleGame>> {
        if let Some(container) = &self.selectors.container {
            self.renderer.scroll_into_view(container).await?;
            self.renderer.settle(self.delay.sample()).await;
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut games = Vec::new();

        loop {
            let name = self.active_text(&self.selectors.active_name).await?;
            // The first repeated identifier means the carousel has wrapped
            if !seen.insert(name.clone()) {
                break;
            }
            let developer = self.active_text(&self.selectors.active_developer).await?;
            games.push(BundleGame { name, developer });

            self.renderer.click(&self.selectors.next_control).await?;
            self.renderer.settle(self.delay.sample()).await;
        }

        tracing::debug!(gallery = %self.gallery, slides = games.len(), "carousel walk complete");
        Ok(games)
    }
}
