//! Immutable flow event types.
//!
//! Values of these types are produced by [`FlowEventBuilder`](crate::FlowEventBuilder)
//! or decoded with [`from_json`](crate::from_json); they are never mutated
//! afterwards.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{FlowEventError, Result};
use crate::history;

/// Version tag written into every flow event document.
pub const FLOW_EVENT_VERSION: &str = "0.1";

/// Status given to an edge when none is set explicitly.
pub const DEFAULT_STATUS: &str = "OK";

/// The process that emitted an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reporter {
    #[serde(skip_serializing_if = "Option::is_none")]
    deployment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    container_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instance: Option<String>,
}

impl Reporter {
    pub(crate) fn new(
        deployment: Option<String>,
        name: Option<String>,
        version: Option<String>,
        container_id: Option<String>,
        instance: Option<String>,
    ) -> Self {
        Self {
            deployment,
            name,
            version,
            container_id,
            instance,
        }
    }

    pub fn deployment(&self) -> Option<&str> {
        self.deployment.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref()
    }

    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.deployment.is_none()
            && self.name.is_none()
            && self.version.is_none()
            && self.container_id.is_none()
            && self.instance.is_none()
    }
}

/// One endpoint (source or destination) of a traced interaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    node_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload_id: Option<String>,
}

impl Node {
    pub(crate) fn new(
        node_type: Option<String>,
        address: Option<String>,
        payload_type: Option<String>,
        payload_id: Option<String>,
    ) -> Self {
        Self {
            node_type,
            address,
            payload_type,
            payload_id,
        }
    }

    /// The kind of endpoint, e.g. `"http"` or `"queue"`.
    pub fn node_type(&self) -> Option<&str> {
        self.node_type.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn payload_type(&self) -> Option<&str> {
        self.payload_type.as_deref()
    }

    pub fn payload_id(&self) -> Option<&str> {
        self.payload_id.as_deref()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.node_type.is_none()
            && self.address.is_none()
            && self.payload_type.is_none()
            && self.payload_id.is_none()
    }
}

/// The traced step itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_group_id: Option<String>,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    milestone: Option<String>,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl Edge {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: String,
        retry_group_id: Option<String>,
        timestamp: String,
        milestone: Option<String>,
        status: String,
        error_type: Option<String>,
        error_reason: Option<String>,
        comment: Option<String>,
    ) -> Self {
        Self {
            id,
            retry_group_id,
            timestamp,
            milestone,
            status,
            error_type,
            error_reason,
            comment,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Groups retried attempts of the same logical step.
    pub fn retry_group_id(&self) -> Option<&str> {
        self.retry_group_id.as_deref()
    }

    /// ISO-8601 timestamp with offset, exactly as it appears on the wire.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The timestamp parsed back into a date-time.
    pub fn parsed_timestamp(&self) -> Result<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).map_err(|e| {
            FlowEventError::malformed(format!("invalid edge timestamp {:?}: {}", self.timestamp, e))
        })
    }

    pub fn milestone(&self) -> Option<&str> {
        self.milestone.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn error_type(&self) -> Option<&str> {
        self.error_type.as_deref()
    }

    pub fn error_reason(&self) -> Option<&str> {
        self.error_reason.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// One recorded step in a traced flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEvent {
    flow_event_version: &'static str,
    correlation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    history: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reporter: Option<Reporter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<Node>,
    edge: Edge,
}

impl FlowEvent {
    pub(crate) fn new(
        correlation_id: String,
        history: Option<Vec<String>>,
        reporter: Option<Reporter>,
        source: Option<Node>,
        destination: Option<Node>,
        edge: Edge,
    ) -> Self {
        Self {
            flow_event_version: FLOW_EVENT_VERSION,
            correlation_id,
            history,
            reporter,
            source,
            destination,
            edge,
        }
    }

    pub fn flow_event_version(&self) -> &str {
        self.flow_event_version
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Prior edge ids, oldest first. `None` when this is the first hop.
    pub fn history(&self) -> Option<&[String]> {
        self.history.as_deref()
    }

    pub fn reporter(&self) -> Option<&Reporter> {
        self.reporter.as_ref()
    }

    pub fn source(&self) -> Option<&Node> {
        self.source.as_ref()
    }

    pub fn destination(&self) -> Option<&Node> {
        self.destination.as_ref()
    }

    pub fn edge(&self) -> &Edge {
        &self.edge
    }

    /// The history to pass on to the next hop: this event's history with
    /// its own edge id appended.
    pub fn next_history(&self) -> String {
        history::next_history(self.history(), self.edge.id())
    }

    /// Serialize to a compact JSON document.
    pub fn to_json(&self) -> Result<String> {
        crate::codec::to_json(self)
    }
}
