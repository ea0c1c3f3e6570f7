//! Pagination controller
//!
//! Drives one retailer's listing from its first page to exhaustion through
//! the `Loading -> Extracting -> Advancing` cycle, appending each page to
//! the snapshot sink as it completes. Retailers differ in how they expose
//! "no next page", so termination is a tagged policy rather than a
//! subclass hierarchy.

use crate::catalog::RetailerSnapshot;
use crate::render::{RenderNode, Renderer};
use crate::scrape::run_state::RunState;
use crate::scrape::strategy::{extract_items, ItemShape, ListingSelectors};
use crate::store::SnapshotSink;
use crate::{Result, SyncError};
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Randomized settle delay applied before querying a freshly loaded page.
///
/// Client-side rendering means item nodes may not exist immediately after
/// navigation; the delay is a design requirement, not tuning.
#[derive(Debug, Clone, Copy)]
pub struct SettleDelay {
    pub base: Duration,
    pub jitter: Duration,
}

impl SettleDelay {
    pub fn from_millis(base_ms: u64, jitter_ms: u64) -> Self {
        Self {
            base: Duration::from_millis(base_ms),
            jitter: Duration::from_millis(jitter_ms),
        }
    }

    /// Base delay plus a uniform random jitter.
    pub fn sample(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.base;
        }
        let jitter_ms = rand::rng().random_range(0..=self.jitter.as_millis() as u64);
        self.base + Duration::from_millis(jitter_ms)
    }
}

/// Termination policy selector, as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminationKind {
    ExplicitDisabled,
    Probe,
}

/// How a run decides that no further page exists.
#[derive(Debug, Clone)]
pub enum TerminationPolicy {
    /// The "next" control always exists but carries a sentinel href when
    /// disabled on the last page.
    ExplicitDisabled {
        selector: String,
        disabled_href: String,
    },

    /// The "next" control stops being findable on the last page. Only the
    /// not-found condition terminates; any other lookup failure is fatal,
    /// because conflating the two silently truncates the catalog.
    Probe { selector: String },
}

/// Everything needed to run one retailer listing end-to-end.
#[derive(Debug, Clone)]
pub struct ListingPlan {
    pub retailer: String,
    pub start_url: String,
    pub shape: ItemShape,
    pub selectors: ListingSelectors,
    pub discount_prefix: String,
    pub policy: TerminationPolicy,
    pub delay: SettleDelay,
}

/// Drives repeated extract/advance cycles for one retailer.
pub struct PaginationController<'a, R: Renderer, S: SnapshotSink> {
    renderer: &'a R,
    sink: &'a mut S,
    plan: ListingPlan,
    cancel: Arc<AtomicBool>,
}

impl<'a, R: Renderer, S: SnapshotSink> PaginationController<'a, R, S> {
    pub fn new(renderer: &'a R, sink: &'a mut S, plan: ListingPlan) -> Self {
        Self {
            renderer,
            sink,
            plan,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Installs a shared stop flag. A requested stop is honored at the next
    /// page boundary; the in-flight page always finishes, since a
    /// truncated page would corrupt the zero-default semantics.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Runs the listing to exhaustion and returns the snapshot.
    pub async fn run(mut self) -> Result<RetailerSnapshot> {
        let captured_at = Utc::now();
        tracing::info!(
            retailer = %self.plan.retailer,
            url = %self.plan.start_url,
            "starting pagination run"
        );
        self.renderer.open(&self.plan.start_url).await?;

        let mut entries = Vec::new();
        let mut page = 0usize;
        let mut state = RunState::Loading;

        while !state.is_terminal() {
            state = match state {
                RunState::Loading => {
                    let delay = self.plan.delay.sample();
                    tracing::debug!(retailer = %self.plan.retailer, ?delay, "settling");
                    self.renderer.settle(delay).await;
                    RunState::Extracting
                }

                RunState::Extracting => {
                    let nodes = self.renderer.query_all(&self.plan.selectors.item).await?;
                    if nodes.is_empty() {
                        // An empty container where items were expected means
                        // the page structure changed
                        return Err(SyncError::Structural {
                            retailer: self.plan.retailer.clone(),
                            selector: self.plan.selectors.item.clone(),
                        });
                    }
                    let page_entries = extract_items(
                        self.plan.shape,
                        &self.plan.selectors,
                        &self.plan.discount_prefix,
                        &nodes,
                        &self.plan.retailer,
                    )
                    .await?;
                    page += 1;
                    tracing::info!(
                        retailer = %self.plan.retailer,
                        page,
                        items = page_entries.len(),
                        "extracted page"
                    );
                    self.sink.append_page(&page_entries)?;
                    entries.extend(page_entries);

                    if self.cancel.load(Ordering::Relaxed) {
                        tracing::warn!(
                            retailer = %self.plan.retailer,
                            "stop requested, halting after completed page"
                        );
                        RunState::Done
                    } else {
                        RunState::Advancing
                    }
                }

                RunState::Advancing => self.advance().await?,

                RunState::Done => unreachable!("terminal state re-entered"),
            };
        }

        tracing::info!(
            retailer = %self.plan.retailer,
            pages = page,
            items = entries.len(),
            "pagination run complete"
        );
        let snapshot = RetailerSnapshot {
            retailer: self.plan.retailer.clone(),
            captured_at,
            entries,
        };
        self.sink.finish(&snapshot)?;
        Ok(snapshot)
    }

    /// Decides whether another page exists, navigating to it if so.
    async fn advance(&self) -> Result<RunState> {
        match &self.plan.policy {
            TerminationPolicy::ExplicitDisabled {
                selector,
                disabled_href,
            } => {
                // Under this policy the control must exist on every page;
                // its absence is a structural change, not termination
                let control = match self.renderer.query_one(selector).await {
                    Ok(node) => node,
                    Err(e) if e.is_not_found() => {
                        return Err(SyncError::Structural {
                            retailer: self.plan.retailer.clone(),
                            selector: selector.clone(),
                        })
                    }
                    Err(e) => return Err(e.into()),
                };
                let href = control.attribute("href").await?;
                if href.as_deref() == Some(disabled_href.as_str()) {
                    Ok(RunState::Done)
                } else {
                    self.renderer.scroll_into_view(selector).await?;
                    self.renderer.click(selector).await?;
                    Ok(RunState::Loading)
                }
            }

            TerminationPolicy::Probe { selector } => {
                match self.renderer.query_one(selector).await {
                    Ok(_) => {
                        self.renderer.click(selector).await?;
                        Ok(RunState::Loading)
                    }
                    // Not-found is the sole termination signal
                    Err(e) if e.is_not_found() => Ok(RunState::Done),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}
