#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use labelstat_core::host::CounterHandle;
use labelstat_gateway::obs::metrics::{CounterStore, GatewayMetrics};

#[test]
fn store_hands_out_distinct_handles() {
    let store = CounterStore::default();
    let joy = store.define("joy").unwrap();
    let anger = store.define("anger").unwrap();
    assert_ne!(joy, anger);

    store.add(joy, 2).unwrap();
    store.add(anger, 1).unwrap();
    store.add(joy, 1).unwrap();
    assert_eq!(store.value("joy"), Some(3));
    assert_eq!(store.value("anger"), Some(1));
    assert_eq!(store.value("fear"), None);
    assert_eq!(store.len(), 2);
}

#[test]
fn unknown_handle_is_an_error() {
    let store = CounterStore::default();
    let err = store.add(CounterHandle(42), 1).unwrap_err();
    assert_eq!(err.kind().as_str(), "INTERNAL");
}

#[test]
fn render_includes_label_counters_and_ops() {
    let store = CounterStore::default();
    let joy = store.define("joy_model=bert").unwrap();
    store.add(joy, 5).unwrap();
    store.define("").unwrap();

    let m = GatewayMetrics::default();
    m.proxied_responses.inc(&[("status", "200")]);
    m.filter_outcomes.inc(&[("outcome", "recorded")]);
    m.upstream_duration.observe(&[("status", "200")], Duration::from_millis(3));
    assert_eq!(m.proxied_responses.get(&[("status", "200")]), 1);

    let text = m.render(&store);
    assert!(text.contains("# TYPE labelstat_label_total counter"));
    assert!(text.contains("labelstat_label_total{key=\"joy_model=bert\"} 5"));
    assert!(text.contains("labelstat_label_total{key=\"\"} 0"));
    assert!(text.contains("labelstat_proxied_responses_total{status=\"200\"} 1"));
    assert!(text.contains("labelstat_filter_outcomes_total{outcome=\"recorded\"} 1"));
    assert!(text.contains("labelstat_upstream_duration_micros_bucket{status=\"200\",le=\"5000\"} 1"));
    assert!(text.contains("labelstat_draining 0"));

    m.set_draining();
    assert!(m.render(&store).contains("labelstat_draining 1"));
}
