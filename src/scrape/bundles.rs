//! Bundle gallery extraction
//!
//! The gallery branch lists bundle SKUs behind anchor cards; each bundle
//! page carries its price and a media carousel of the included titles.
//! Termination inside a bundle is cycle detection (see
//! [`crate::scrape::carousel`]); across bundles it is the finite anchor
//! list read up front.

use crate::catalog::Bundle;
use crate::fields;
use crate::render::{RenderNode, Renderer};
use crate::scrape::carousel::{CarouselSelectors, CarouselWalker};
use crate::scrape::controller::SettleDelay;
use crate::{Result, SyncError};
use url::Url;

/// Everything needed to walk the bundle gallery end-to-end.
#[derive(Debug, Clone)]
pub struct GalleryPlan {
    pub url: String,
    pub link_selector: String,
    pub title_selector: String,
    pub ends_selector: String,
    pub price_selector: String,
    pub carousel: CarouselSelectors,
    pub delay: SettleDelay,
}

/// Collects every bundle behind the gallery listing.
pub async fn collect_bundles<R: Renderer>(renderer: &R, plan: &GalleryPlan) -> Result<Vec<Bundle>> {
    let base = Url::parse(&plan.url).map_err(|e| SyncError::ReconcileInput {
        path: plan.url.clone(),
        message: format!("invalid gallery URL: {e}"),
    })?;

    renderer.open(&plan.url).await?;
    renderer.settle(plan.delay.sample()).await;

    // Read the whole listing up front; navigation below replaces the page
    let mut links = Vec::new();
    for anchor in renderer.query_all(&plan.link_selector).await? {
        let href = anchor
            .attribute("href")
            .await?
            .ok_or_else(|| SyncError::Structural {
                retailer: "bundles".to_string(),
                selector: plan.link_selector.clone(),
            })?;
        let resolved = base
            .join(&href)
            .map(|u| u.to_string())
            .unwrap_or(href);
        links.push(resolved);
    }

    let mut titles = Vec::new();
    for node in renderer.query_all(&plan.title_selector).await? {
        titles.push(node.text().await?);
    }
    let mut ends = Vec::new();
    for node in renderer.query_all(&plan.ends_selector).await? {
        ends.push(node.text().await?);
    }

    if titles.len() != links.len() {
        // Card anchors and captions should pair off one-to-one
        return Err(SyncError::Structural {
            retailer: "bundles".to_string(),
            selector: plan.title_selector.clone(),
        });
    }
    tracing::info!(bundles = links.len(), "gallery listing read");

    let mut bundles = Vec::new();
    for (index, link) in links.iter().enumerate() {
        renderer.navigate(link).await?;
        renderer.settle(plan.delay.sample()).await;

        let price = match renderer.query_one(&plan.price_selector).await {
            Ok(node) => fields::parse_price(&node.text().await?),
            Err(e) if e.is_not_found() => {
                return Err(SyncError::Structural {
                    retailer: "bundles".to_string(),
                    selector: plan.price_selector.clone(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let walker = CarouselWalker::new(renderer, &plan.carousel, plan.delay, &titles[index]);
        let games = walker.run().await?;

        tracing::info!(bundle = %titles[index], games = games.len(), "bundle extracted");
        bundles.push(Bundle {
            name: titles[index].clone(),
            price,
            active_until: ends.get(index).cloned().unwrap_or_default(),
            games,
        });
    }

    Ok(bundles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ScriptedNode, ScriptedPage, ScriptedRenderer};
    use rust_decimal::Decimal;

    fn slide(name: &str, developer: &str) -> ScriptedPage {
        ScriptedPage::new()
            .single(".price", ScriptedNode::with_text("$4.99"))
            .single(".active h3", ScriptedNode::with_text(name))
            .single(".active .dev", ScriptedNode::with_text(developer))
    }

    fn plan() -> GalleryPlan {
        GalleryPlan {
            url: "http://bundles.test/bundles".to_string(),
            link_selector: ".fit-click".to_string(),
            title_selector: ".caption h3".to_string(),
            ends_selector: ".ends span".to_string(),
            price_selector: ".price".to_string(),
            carousel: CarouselSelectors {
                container: None,
                active_name: ".active h3".to_string(),
                active_developer: ".active .dev".to_string(),
                next_control: ".carousel-next".to_string(),
            },
            delay: SettleDelay::from_millis(0, 0),
        }
    }

    #[tokio::test]
    async fn test_collects_bundle_with_carousel_games() {
        let listing = ScriptedPage::new()
            .items(
                ".fit-click",
                vec![ScriptedNode::with_text("").attr("href", "/bundle/one")],
            )
            .items(".caption h3", vec![ScriptedNode::with_text("Indie Pack")])
            .items(".ends span", vec![ScriptedNode::with_text("3 days")]);

        let renderer = ScriptedRenderer::new(vec![
            listing,
            slide("Alpha", "Dev A"),
            slide("Beta", "Dev B"),
            slide("Alpha", "Dev A"),
        ]);

        let bundles = collect_bundles(&renderer, &plan()).await.unwrap();
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].name, "Indie Pack");
        assert_eq!(bundles[0].price, "4.99".parse::<Decimal>().unwrap());
        assert_eq!(bundles[0].active_until, "3 days");
        assert_eq!(bundles[0].games.len(), 2);
        // Relative hrefs resolve against the gallery URL
        assert_eq!(
            renderer.visited()[1],
            "http://bundles.test/bundle/one"
        );
    }

    #[tokio::test]
    async fn test_title_anchor_mismatch_is_structural() {
        let listing = ScriptedPage::new().items(
            ".fit-click",
            vec![ScriptedNode::with_text("").attr("href", "/bundle/one")],
        );
        let renderer = ScriptedRenderer::new(vec![listing]);

        let err = collect_bundles(&renderer, &plan()).await.unwrap_err();
        assert!(matches!(err, SyncError::Structural { .. }));
    }
}
