//! JSON encoding and decoding of flow events.
//!
//! Optional fields and groups that are unset are left out of the document
//! entirely. A history of `None` is omitted while an empty history is
//! written as `[]`, so the two stay distinguishable.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{FlowEventError, Result};
use crate::event::{Edge, FlowEvent, Node, Reporter, DEFAULT_STATUS, FLOW_EVENT_VERSION};
use crate::history::is_valid_edge_id;

/// Lenient mirror of the wire format. Required fields are checked after
/// decoding so that their absence is reported as a missing field rather
/// than a generic decode failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlowEventDocument {
    flow_event_version: Option<String>,
    correlation_id: Option<String>,
    history: Option<Vec<String>>,
    reporter: Option<Reporter>,
    source: Option<Node>,
    destination: Option<Node>,
    edge: Option<EdgeDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EdgeDocument {
    id: Option<String>,
    retry_group_id: Option<String>,
    timestamp: Option<String>,
    milestone: Option<String>,
    status: Option<String>,
    error_type: Option<String>,
    error_reason: Option<String>,
    comment: Option<String>,
}

/// Serialize an event to a compact JSON string.
pub fn to_json(event: &FlowEvent) -> Result<String> {
    Ok(serde_json::to_string(event)?)
}

/// Serialize an event to an indented JSON string.
pub fn to_json_pretty(event: &FlowEvent) -> Result<String> {
    Ok(serde_json::to_string_pretty(event)?)
}

/// Serialize an event to a JSON value.
pub fn to_value(event: &FlowEvent) -> Result<Value> {
    Ok(serde_json::to_value(event)?)
}

/// Decode an event from a JSON string.
pub fn from_json(json: &str) -> Result<FlowEvent> {
    let document: FlowEventDocument = serde_json::from_str(json)?;
    document.into_event()
}

/// Decode an event from an already parsed JSON value.
pub fn from_value(value: Value) -> Result<FlowEvent> {
    let document: FlowEventDocument = serde_json::from_value(value)?;
    document.into_event()
}

impl FlowEventDocument {
    fn into_event(self) -> Result<FlowEvent> {
        if let Some(version) = self.flow_event_version.as_deref() {
            if version != FLOW_EVENT_VERSION {
                return Err(FlowEventError::malformed(format!(
                    "unsupported flowEventVersion {version:?}, expected {FLOW_EVENT_VERSION:?}"
                )));
            }
        }

        let correlation_id = self
            .correlation_id
            .ok_or_else(|| FlowEventError::missing("correlationId"))?;
        let edge = self.edge.ok_or_else(|| FlowEventError::missing("edge.id"))?;
        let id = edge.id.ok_or_else(|| FlowEventError::missing("edge.id"))?;
        let timestamp = edge
            .timestamp
            .ok_or_else(|| FlowEventError::missing("edge.timestamp"))?;

        // The id becomes the next hop's history, so it shares the history alphabet
        if !is_valid_edge_id(&id) {
            return Err(FlowEventError::malformed(format!("invalid edge id {id:?}")));
        }
        DateTime::parse_from_rfc3339(&timestamp).map_err(|e| {
            FlowEventError::malformed(format!("invalid edge timestamp {timestamp:?}: {e}"))
        })?;

        if let Some(history) = &self.history {
            if let Some(bad) = history.iter().find(|id| !is_valid_edge_id(id)) {
                return Err(FlowEventError::InvalidHistoryFormat {
                    history: bad.clone(),
                });
            }
        }

        let edge = Edge::new(
            id,
            edge.retry_group_id,
            timestamp,
            edge.milestone,
            edge.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            edge.error_type,
            edge.error_reason,
            edge.comment,
        );

        Ok(FlowEvent::new(
            correlation_id,
            self.history,
            self.reporter.filter(|r| !r.is_empty()),
            self.source.filter(|n| !n.is_empty()),
            self.destination.filter(|n| !n.is_empty()),
            edge,
        ))
    }
}

impl std::str::FromStr for FlowEvent {
    type Err = FlowEventError;

    fn from_str(s: &str) -> Result<Self> {
        from_json(s)
    }
}
