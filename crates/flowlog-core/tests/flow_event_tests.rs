//! End-to-end tests for building, chaining, and serializing flow events

use std::sync::Arc;

use chrono::{FixedOffset, TimeZone, Utc};
use flowlog_core::{
    event_for, event_with_history, from_json, generate_correlation_id, generate_short_id,
    to_value, FixedClock, FlowEvent, FlowEventBuilder, FlowEventError, SeededRandom, SystemRandom,
};
use rstest::rstest;
use serde_json::{json, Value};
use uuid::Uuid;

fn oslo_timestamp() -> chrono::DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2017, 6, 7, 10, 44, 31)
        .unwrap()
}

fn full_event() -> FlowEvent {
    event_with_history("abc123", "A,B")
        .unwrap()
        .reporter(|r| {
            r.deployment("test")
                .name("unit-test")
                .version("1.0")
                .container_id("no container")
                .instance("the only instance")
        })
        .source(|s| {
            s.node_type("ether")
                .address("void")
                .payload_type("fubarsource")
                .payload_id("pid2source")
        })
        .destination(|d| {
            d.node_type("internal")
                .address("rstest-value-test")
                .payload_type("fubar")
                .payload_id("pid2")
        })
        .edge(|e| {
            e.id("C")
                .retry_group_id("rg-1")
                .timestamp(oslo_timestamp())
                .milestone("event-values-test")
                .status("test-ok")
                .error_type("no-error")
                .error_reason("none")
                .comment("some comment")
        })
        .build()
        .unwrap()
}

#[test]
fn test_minimal_flow_event() {
    let before = Utc::now();
    let event = event_for("m1").edge_id("A").build().unwrap();
    let after = Utc::now();

    assert_eq!(event.correlation_id(), "m1");
    assert_eq!(event.edge().id(), "A");
    assert_eq!(event.edge().status(), "OK");

    let ts = event.edge().parsed_timestamp().unwrap();
    assert!(ts >= before && ts <= after, "{ts} not within [{before}, {after}]");
}

#[rstest]
#[case(None, "A", "A")]
#[case(Some("A"), "B", "A,B")]
#[case(Some("A,B"), "C", "A,B,C")]
#[case(Some("A,B,C"), "D", "A,B,C,D")]
#[case(Some("A B"), "C", "A,B,C")]
fn test_next_history(#[case] history: Option<&str>, #[case] edge_id: &str, #[case] expected: &str) {
    let event = FlowEventBuilder::new()
        .correlation_id("h1")
        .history(history)
        .unwrap()
        .edge_id(edge_id)
        .build()
        .unwrap();
    assert_eq!(event.next_history(), expected);
}

#[test]
fn test_all_fields_assigned() {
    let event = full_event();

    assert_eq!(event.correlation_id(), "abc123");
    assert_eq!(event.history(), Some(&["A".to_string(), "B".to_string()][..]));

    let reporter = event.reporter().unwrap();
    assert_eq!(reporter.deployment(), Some("test"));
    assert_eq!(reporter.name(), Some("unit-test"));
    assert_eq!(reporter.version(), Some("1.0"));
    assert_eq!(reporter.container_id(), Some("no container"));
    assert_eq!(reporter.instance(), Some("the only instance"));

    let source = event.source().unwrap();
    assert_eq!(source.node_type(), Some("ether"));
    assert_eq!(source.address(), Some("void"));
    assert_eq!(source.payload_type(), Some("fubarsource"));
    assert_eq!(source.payload_id(), Some("pid2source"));

    let destination = event.destination().unwrap();
    assert_eq!(destination.node_type(), Some("internal"));
    assert_eq!(destination.address(), Some("rstest-value-test"));
    assert_eq!(destination.payload_type(), Some("fubar"));
    assert_eq!(destination.payload_id(), Some("pid2"));

    let edge = event.edge();
    assert_eq!(edge.id(), "C");
    assert_eq!(edge.retry_group_id(), Some("rg-1"));
    assert_eq!(edge.timestamp(), "2017-06-07T10:44:31+02:00");
    assert_eq!(edge.milestone(), Some("event-values-test"));
    assert_eq!(edge.status(), "test-ok");
    assert_eq!(edge.error_type(), Some("no-error"));
    assert_eq!(edge.error_reason(), Some("none"));
    assert_eq!(edge.comment(), Some("some comment"));
}

#[test]
fn test_wire_format() {
    let value = to_value(&full_event()).unwrap();
    assert_eq!(
        value,
        json!({
            "flowEventVersion": "0.1",
            "correlationId": "abc123",
            "history": ["A", "B"],
            "reporter": {
                "deployment": "test",
                "name": "unit-test",
                "version": "1.0",
                "containerId": "no container",
                "instance": "the only instance"
            },
            "source": {
                "type": "ether",
                "address": "void",
                "payloadType": "fubarsource",
                "payloadId": "pid2source"
            },
            "destination": {
                "type": "internal",
                "address": "rstest-value-test",
                "payloadType": "fubar",
                "payloadId": "pid2"
            },
            "edge": {
                "id": "C",
                "retryGroupId": "rg-1",
                "timestamp": "2017-06-07T10:44:31+02:00",
                "milestone": "event-values-test",
                "status": "test-ok",
                "errorType": "no-error",
                "errorReason": "none",
                "comment": "some comment"
            }
        })
    );
}

#[test]
fn test_serialization_round_trip() {
    let event = full_event();
    let json1 = event.to_json().unwrap();
    let copy = from_json(&json1).unwrap();
    let json2 = copy.to_json().unwrap();

    assert_eq!(copy, event);
    assert_eq!(
        serde_json::from_str::<Value>(&json1).unwrap(),
        serde_json::from_str::<Value>(&json2).unwrap()
    );
}

#[test]
fn test_absent_groups_are_not_serialized() {
    let event = event_for("c1").edge_id("A").build().unwrap();
    let value = to_value(&event).unwrap();
    let object = value.as_object().unwrap();

    for key in ["history", "reporter", "source", "destination"] {
        assert!(!object.contains_key(key), "{key} should be absent");
    }

    let copy = from_json(&event.to_json().unwrap()).unwrap();
    assert_eq!(copy, event);
    assert!(copy.reporter().is_none());
    assert!(copy.history().is_none());
}

#[test]
fn test_missing_required_fields() {
    assert!(matches!(
        FlowEventBuilder::new().edge_id("A").build(),
        Err(FlowEventError::MissingRequiredField { field }) if field == "correlationId"
    ));
    assert!(matches!(
        FlowEventBuilder::new().correlation_id("c").build(),
        Err(FlowEventError::MissingRequiredField { field }) if field == "edge.id"
    ));
}

#[rstest]
#[case("A;B")]
#[case("A,B;C")]
#[case("A|B")]
fn test_invalid_history(#[case] raw: &str) {
    assert!(matches!(
        event_with_history("c", raw),
        Err(FlowEventError::InvalidHistoryFormat { .. })
    ));
}

#[test]
fn test_generated_edge_id_is_five_base64_chars() {
    for _ in 0..100 {
        let event = event_for("c67").generate_edge_id().build().unwrap();
        let id = event.edge().id();
        assert_eq!(id.len(), 5);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/'));
    }
}

#[test]
fn test_generated_correlation_id_is_uuid() {
    let event = FlowEventBuilder::new()
        .generate_correlation_id()
        .edge_id("i42")
        .build()
        .unwrap();
    assert!(Uuid::parse_str(event.correlation_id()).is_ok());
    assert!(Uuid::parse_str(&generate_correlation_id(&SystemRandom)).is_ok());
}

#[test]
fn test_deterministic_collaborators() {
    let now = Utc.with_ymd_and_hms(2021, 9, 9, 9, 9, 9).unwrap().fixed_offset();
    let build = || {
        FlowEventBuilder::with_collaborators(Arc::new(FixedClock(now)), Arc::new(SeededRandom::new(3)))
            .generate_correlation_id()
            .generate_edge_id()
            .build()
            .unwrap()
    };
    let (a, b) = (build(), build());
    assert_eq!(a, b);
    assert_eq!(a.edge().timestamp(), "2021-09-09T09:09:09+00:00");
    assert_eq!(generate_short_id(&SeededRandom::new(3)).len(), 5);
}

#[test]
fn test_flow_across_hops() {
    let first = event_for("corrId382").generate_edge_id().build().unwrap();
    let second = event_with_history("corrId382", &first.next_history())
        .unwrap()
        .generate_edge_id()
        .build()
        .unwrap();
    let third = event_with_history("corrId382", &second.next_history())
        .unwrap()
        .generate_edge_id()
        .build()
        .unwrap();

    let next = third.next_history();
    let chain: Vec<&str> = next.split(',').collect();
    assert_eq!(
        chain,
        vec![first.edge().id(), second.edge().id(), third.edge().id()]
    );
}
