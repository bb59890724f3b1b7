//! Instrumentation emitted while computing a CMP.

mod common;

use coalesce_core::{CmpBuilder, CmpError};
use coalesce_test_support::tracing::recorded;
use common::{path, star};
use rstest::rstest;
use tracing::Level;

#[rstest]
fn run_records_phase_spans() {
    let engine = CmpBuilder::new()
        .with_paint_channels(3)
        .build()
        .expect("configuration must be valid");
    let graph = star(4, 1.0);

    let (result, layer) = recorded(|| engine.run(&graph, 0));
    let cmp = result.expect("run must succeed");

    let run = layer.span("core.cmp").expect("core.cmp span must exist");
    assert_eq!(run.field("root"), Some("0"));
    assert_eq!(run.field("paint_channels"), Some("3"));
    assert_eq!(run.field("site_limit"), Some("None"));

    for phase in ["core.cmp.discover", "core.cmp.merge", "core.cmp.hierarchy"] {
        assert!(layer.span(phase).is_some(), "{phase} span must exist");
    }
    let merge = layer.span("core.cmp.merge").expect("merge span");
    assert_eq!(merge.field("active"), Some("5"));
    let hierarchy = layer.span("core.cmp.hierarchy").expect("hierarchy span");
    assert_eq!(hierarchy.field("clusters"), Some("1"));

    assert!(layer.has_event(Level::INFO, "cmp computed"));
    let computed = layer
        .events()
        .into_iter()
        .find(|event| event.field("message") == Some("cmp computed"))
        .expect("completion event");
    assert_eq!(computed.field("sites"), Some("5"));
    assert_eq!(computed.field("merges"), Some(cmp.merge_count().to_string().as_str()));
}

#[rstest]
fn phases_report_their_totals() {
    let graph = path(&[0.5, 1.5, 1.5]);
    let (result, layer) = recorded(|| CmpBuilder::new().build().and_then(|e| e.run(&graph, 0)));
    result.expect("run must succeed");

    let event = |message: &str| {
        layer
            .events()
            .into_iter()
            .find(|event| event.level == Level::DEBUG && event.field("message") == Some(message))
            .unwrap_or_else(|| panic!("missing event: {message}"))
    };
    let discovered = event("component discovered");
    assert_eq!(discovered.field("sites"), Some("3"));
    assert_eq!(discovered.field("edges"), Some("4"));

    let coalesced = event("coalescing finished");
    assert_eq!(coalesced.field("merges"), Some("1"));
    assert_eq!(coalesced.field("deactivations"), Some("1"));
}

#[rstest]
fn site_limit_is_logged_and_returned() {
    let engine = CmpBuilder::new()
        .with_site_limit(2)
        .build()
        .expect("configuration must be valid");
    let graph = path(&[1.0; 4]);

    let (result, layer) = recorded(|| engine.run(&graph, 0));
    assert_eq!(result.expect_err("limit must trip"), CmpError::SiteLimitExceeded { limit: 2 });

    let run = layer.span("core.cmp").expect("core.cmp span must exist");
    assert_eq!(run.field("site_limit"), Some("Some(2)"));
    assert!(layer.has_event(Level::WARN, "site limit reached during discovery"));
    assert!(
        layer
            .events()
            .iter()
            .any(|event| event.level == Level::ERROR && event.field("error").is_some())
    );
    assert!(!layer.has_event(Level::INFO, "cmp computed"));
}
