//! Fluent construction of [`FlowEvent`]s.
//!
//! A [`FlowEventBuilder`] accumulates one draft event. Fields are grouped
//! into four scopes (reporter, source, destination, edge) which can be
//! addressed in any order and as many times as needed; `build()` is the only
//! step that validates and fills in defaults.
//!
//! ```
//! use flowlog_core::FlowEventBuilder;
//!
//! let event = FlowEventBuilder::new()
//!     .correlation_id("abc123")
//!     .history("A,B")?
//!     .reporter(|r| r.name("billing").version("1.4.0"))
//!     .destination(|d| d.node_type("queue").address("invoices"))
//!     .edge(|e| e.id("C").milestone("invoice-queued"))
//!     .build()?;
//!
//! assert_eq!(event.next_history(), "A,B,C");
//! assert!(event.source().is_none());
//! # Ok::<(), flowlog_core::FlowEventError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone};
use tracing::debug;

use crate::clock::{format_timestamp, Clock, SystemClock};
use crate::error::{FlowEventError, Result};
use crate::event::{Edge, FlowEvent, Node, Reporter, DEFAULT_STATUS};
use crate::history::parse_history;
use crate::ids::{generate_correlation_id, generate_short_id, RandomSource, SystemRandom};

/// Reporter fields collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReporterDraft {
    deployment: Option<String>,
    name: Option<String>,
    version: Option<String>,
    container_id: Option<String>,
    instance: Option<String>,
}

impl ReporterDraft {
    pub fn deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = Some(deployment.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn container_id(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    fn finish(&self) -> Option<Reporter> {
        let reporter = Reporter::new(
            self.deployment.clone(),
            self.name.clone(),
            self.version.clone(),
            self.container_id.clone(),
            self.instance.clone(),
        );
        (!reporter.is_empty()).then_some(reporter)
    }
}

/// Source or destination fields collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDraft {
    node_type: Option<String>,
    address: Option<String>,
    payload_type: Option<String>,
    payload_id: Option<String>,
}

impl NodeDraft {
    pub fn node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn payload_type(mut self, payload_type: impl Into<String>) -> Self {
        self.payload_type = Some(payload_type.into());
        self
    }

    pub fn payload_id(mut self, payload_id: impl Into<String>) -> Self {
        self.payload_id = Some(payload_id.into());
        self
    }

    fn finish(&self) -> Option<Node> {
        let node = Node::new(
            self.node_type.clone(),
            self.address.clone(),
            self.payload_type.clone(),
            self.payload_id.clone(),
        );
        (!node.is_empty()).then_some(node)
    }
}

/// Edge fields collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeDraft {
    id: Option<String>,
    retry_group_id: Option<String>,
    timestamp: Option<DateTime<FixedOffset>>,
    milestone: Option<String>,
    status: Option<String>,
    error_type: Option<String>,
    error_reason: Option<String>,
    comment: Option<String>,
}

impl EdgeDraft {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn retry_group_id(mut self, retry_group_id: impl Into<String>) -> Self {
        self.retry_group_id = Some(retry_group_id.into());
        self
    }

    /// Set the edge time. The offset of `timestamp` is kept on the wire.
    pub fn timestamp<Tz: TimeZone>(mut self, timestamp: DateTime<Tz>) -> Self {
        self.timestamp = Some(timestamp.fixed_offset());
        self
    }

    pub fn milestone(mut self, milestone: impl Into<String>) -> Self {
        self.milestone = Some(milestone.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    pub fn error_reason(mut self, error_reason: impl Into<String>) -> Self {
        self.error_reason = Some(error_reason.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Accumulates the fields of one flow event.
#[derive(Clone)]
pub struct FlowEventBuilder {
    correlation_id: Option<String>,
    history: Option<Vec<String>>,
    reporter: ReporterDraft,
    source: NodeDraft,
    destination: NodeDraft,
    edge: EdgeDraft,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
}

impl fmt::Debug for FlowEventBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowEventBuilder")
            .field("correlation_id", &self.correlation_id)
            .field("history", &self.history)
            .field("reporter", &self.reporter)
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("edge", &self.edge)
            .finish_non_exhaustive()
    }
}

impl Default for FlowEventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowEventBuilder {
    /// A builder using the system clock and system randomness.
    pub fn new() -> Self {
        Self::with_collaborators(Arc::new(SystemClock), Arc::new(SystemRandom))
    }

    /// A builder using the given clock and random source.
    pub fn with_collaborators(clock: Arc<dyn Clock>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            correlation_id: None,
            history: None,
            reporter: ReporterDraft::default(),
            source: NodeDraft::default(),
            destination: NodeDraft::default(),
            edge: EdgeDraft::default(),
            clock,
            random,
        }
    }

    pub fn correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Set the correlation id to a freshly generated UUID.
    pub fn generate_correlation_id(self) -> Self {
        let id = generate_correlation_id(self.random.as_ref());
        self.correlation_id(id)
    }

    /// Set the history from its raw comma/space separated form.
    ///
    /// `None` or `""` clears the history. Fails immediately if the string
    /// is not a well-formed chain.
    pub fn history<'a>(mut self, raw: impl Into<Option<&'a str>>) -> Result<Self> {
        self.history = parse_history(raw.into())?;
        Ok(self)
    }

    pub fn reporter(mut self, f: impl FnOnce(ReporterDraft) -> ReporterDraft) -> Self {
        self.reporter = f(std::mem::take(&mut self.reporter));
        self
    }

    pub fn source(mut self, f: impl FnOnce(NodeDraft) -> NodeDraft) -> Self {
        self.source = f(std::mem::take(&mut self.source));
        self
    }

    pub fn destination(mut self, f: impl FnOnce(NodeDraft) -> NodeDraft) -> Self {
        self.destination = f(std::mem::take(&mut self.destination));
        self
    }

    pub fn edge(mut self, f: impl FnOnce(EdgeDraft) -> EdgeDraft) -> Self {
        self.edge = f(std::mem::take(&mut self.edge));
        self
    }

    /// Shortcut for `.edge(|e| e.id(id))`.
    pub fn edge_id(self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.edge(|e| e.id(id))
    }

    /// Set the edge id to a freshly generated short id.
    pub fn generate_edge_id(self) -> Self {
        let id = generate_short_id(self.random.as_ref());
        self.edge_id(id)
    }

    /// Validate the draft and produce the immutable event.
    ///
    /// The builder is left untouched, so calling `build()` again yields an
    /// equal event (apart from a defaulted timestamp, which is re-read from
    /// the clock).
    pub fn build(&self) -> Result<FlowEvent> {
        let correlation_id = self
            .correlation_id
            .clone()
            .ok_or_else(|| FlowEventError::missing("correlationId"))?;
        let edge_id = self
            .edge
            .id
            .clone()
            .ok_or_else(|| FlowEventError::missing("edge.id"))?;

        let timestamp = self.edge.timestamp.unwrap_or_else(|| self.clock.now());
        let status = self
            .edge
            .status
            .clone()
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());

        let edge = Edge::new(
            edge_id,
            self.edge.retry_group_id.clone(),
            format_timestamp(&timestamp),
            self.edge.milestone.clone(),
            status,
            self.edge.error_type.clone(),
            self.edge.error_reason.clone(),
            self.edge.comment.clone(),
        );

        let event = FlowEvent::new(
            correlation_id,
            self.history.clone(),
            self.reporter.finish(),
            self.source.finish(),
            self.destination.finish(),
            edge,
        );
        debug!(
            correlation_id = event.correlation_id(),
            edge_id = event.edge().id(),
            "built flow event"
        );
        Ok(event)
    }
}
