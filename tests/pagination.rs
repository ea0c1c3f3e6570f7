//! End-to-end pagination runs against the scripted rendering backend.

use shelfdiff::render::{ScriptedNode, ScriptedPage, ScriptedRenderer};
use shelfdiff::scrape::{ItemShape, ListingPlan, ListingSelectors, SettleDelay, TerminationPolicy};
use shelfdiff::store::{read_snapshot_pages, JsonlSink, MemorySink};
use shelfdiff::PaginationController;
use rust_decimal::Decimal;
use tempfile::TempDir;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn flat_item(name: &str, price: &str, discount: Option<&str>) -> ScriptedNode {
    let mut node = ScriptedNode::default()
        .child("h3 a", ScriptedNode::with_text(name))
        .child(".buy span", ScriptedNode::with_text(price));
    if let Some(d) = discount {
        node = node.child(".buy a", ScriptedNode::with_text(d));
    }
    node
}

fn flat_plan(policy: TerminationPolicy) -> ListingPlan {
    ListingPlan {
        retailer: "billetshop".to_string(),
        start_url: "http://billetshop.test/catalog".to_string(),
        shape: ItemShape::Flat,
        selectors: ListingSelectors {
            item: ".grid-item".to_string(),
            name: "h3 a".to_string(),
            price: Some(".buy span".to_string()),
            discount: Some(".buy a".to_string()),
            original_price: None,
            savings: None,
            next: ".next a".to_string(),
        },
        discount_prefix: "Sale".to_string(),
        policy,
        delay: SettleDelay::from_millis(0, 0),
    }
}

fn explicit_disabled() -> TerminationPolicy {
    TerminationPolicy::ExplicitDisabled {
        selector: ".next a".to_string(),
        disabled_href: "javascript:void(0);".to_string(),
    }
}

#[tokio::test]
async fn explicit_disabled_walks_all_pages_in_order() {
    let pages = vec![
        ScriptedPage::new()
            .items(".grid-item", vec![flat_item("Alpha", "$10.00", Some("Sale-10%"))])
            .single(".next a", ScriptedNode::with_text("2").attr("href", "/catalog?p=2")),
        ScriptedPage::new()
            .items(".grid-item", vec![flat_item("Beta", "$20.00", None)])
            .single(".next a", ScriptedNode::with_text("3").attr("href", "/catalog?p=3")),
        ScriptedPage::new()
            .items(".grid-item", vec![flat_item("Gamma", "$30.00", Some("Sale-30%"))])
            .single(
                ".next a",
                ScriptedNode::with_text("3").attr("href", "javascript:void(0);"),
            ),
    ];
    let renderer = ScriptedRenderer::new(pages);
    let mut sink = MemorySink::new();

    let snapshot = PaginationController::new(&renderer, &mut sink, flat_plan(explicit_disabled()))
        .run()
        .await
        .unwrap();

    // Three pages, concatenated in visit order
    let names: Vec<_> = snapshot.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
    assert_eq!(sink.pages.len(), 3);
    assert_eq!(snapshot.entries[0].discount_percent, 10);
    // The un-discounted middle item degrades to zero with its gap flagged
    assert_eq!(snapshot.entries[1].discount_percent, 0);
    assert!(snapshot.entries[1].discount_missing);
    // Two advances; the disabled sentinel on page three is never clicked
    assert_eq!(renderer.clicks().len(), 2);
    assert!(sink.finished.is_some());
}

#[tokio::test]
async fn probe_terminates_when_next_control_disappears() {
    let pages = vec![
        ScriptedPage::new()
            .items(".grid-item", vec![flat_item("One", "$1.00", None)])
            .single(".next a", ScriptedNode::with_text("next")),
        // Final page carries no next control at all
        ScriptedPage::new().items(".grid-item", vec![flat_item("Two", "$2.00", None)]),
    ];
    let renderer = ScriptedRenderer::new(pages);
    let mut sink = MemorySink::new();

    let plan = flat_plan(TerminationPolicy::Probe {
        selector: ".next a".to_string(),
    });
    let snapshot = PaginationController::new(&renderer, &mut sink, plan)
        .run()
        .await
        .unwrap();

    assert_eq!(snapshot.entries.len(), 2);
    assert_eq!(renderer.clicks(), vec![".next a"]);
}

#[tokio::test]
async fn simple_shape_run_persists_pages_to_disk() {
    fn simple_item(name: &str, current: &str, struck: Option<&str>, savings: Option<&str>) -> ScriptedNode {
        let mut node = ScriptedNode::default()
            .child("h4 a", ScriptedNode::with_text(name))
            .child(".price_current", ScriptedNode::with_text(current));
        if let Some(s) = struck {
            node = node.child(".price_base strike", ScriptedNode::with_text(s));
        }
        if let Some(s) = savings {
            node = node.child(".price_saving", ScriptedNode::with_text(s));
        }
        node
    }

    let pages = vec![
        ScriptedPage::new()
            .items(
                ".row",
                vec![simple_item("Deal", "$9.99", Some("$19.99"), Some("-50%"))],
            )
            .single("a[rel=next]", ScriptedNode::with_text("next")),
        ScriptedPage::new().items(".row", vec![simple_item("Full Price", "$29.99", None, None)]),
    ];
    let renderer = ScriptedRenderer::new(pages);

    let dir = TempDir::new().unwrap();
    let mut sink = JsonlSink::create(dir.path(), "planetshop", "full").unwrap();
    let path = sink.path().to_path_buf();

    let plan = ListingPlan {
        retailer: "planetshop".to_string(),
        start_url: "http://planetshop.test/all".to_string(),
        shape: ItemShape::Simple,
        selectors: ListingSelectors {
            item: ".row".to_string(),
            name: "h4 a".to_string(),
            price: Some(".price_current".to_string()),
            discount: None,
            original_price: Some(".price_base strike".to_string()),
            savings: Some(".price_saving".to_string()),
            next: "a[rel=next]".to_string(),
        },
        discount_prefix: String::new(),
        policy: TerminationPolicy::Probe {
            selector: "a[rel=next]".to_string(),
        },
        delay: SettleDelay::from_millis(0, 0),
    };

    let snapshot = PaginationController::new(&renderer, &mut sink, plan)
        .run()
        .await
        .unwrap();

    assert_eq!(snapshot.entries[0].price, dec("9.99"));
    assert_eq!(snapshot.entries[0].original_price, dec("19.99"));
    assert_eq!(snapshot.entries[0].discount_percent, 50);
    assert_eq!(snapshot.entries[1].original_price, dec("29.99"));
    assert_eq!(snapshot.entries[1].discount_percent, 0);

    // The page file reads back in the same order the run produced
    let persisted = read_snapshot_pages(&path).unwrap();
    assert_eq!(persisted, snapshot.entries);
}

#[tokio::test]
async fn interrupted_run_keeps_completed_pages() {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    let pages = vec![
        ScriptedPage::new()
            .items(".grid-item", vec![flat_item("Kept", "$5.00", None)])
            .single(".next a", ScriptedNode::with_text("next")),
        ScriptedPage::new()
            .items(".grid-item", vec![flat_item("Never Seen", "$6.00", None)])
            .single(".next a", ScriptedNode::with_text("next")),
    ];
    let renderer = ScriptedRenderer::new(pages);
    let mut sink = MemorySink::new();

    let plan = flat_plan(TerminationPolicy::Probe {
        selector: ".next a".to_string(),
    });
    let snapshot = PaginationController::new(&renderer, &mut sink, plan)
        .with_cancel_flag(Arc::new(AtomicBool::new(true)))
        .run()
        .await
        .unwrap();

    assert_eq!(snapshot.entries.len(), 1);
    assert_eq!(snapshot.entries[0].name, "Kept");
    assert!(sink.finished.is_some());
}
