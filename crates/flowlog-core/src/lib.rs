//! Causally-chained flow events for tracing work across services
//!
//! A flow event records one step (an *edge*) of a unit of work moving
//! through a distributed system, together with optional context:
//! - the *reporter* process that emitted it
//! - the *source* and *destination* endpoints involved
//! - the *history* of edge ids the flow has already passed through
//!
//! Events are assembled with [`FlowEventBuilder`], serialized with
//! [`to_json`], and linked hop to hop by passing
//! [`FlowEvent::next_history`] along with the correlation id.
//!
//! ```
//! let event = flowlog_core::event_with_history("corrId382", "A,B,C")?
//!     .edge_id("D")
//!     .build()?;
//!
//! let json = event.to_json()?;
//! assert!(json.contains(r#""history":["A","B","C"]"#));
//! assert_eq!(event.next_history(), "A,B,C,D");
//! # Ok::<(), flowlog_core::FlowEventError>(())
//! ```

pub mod builder;
pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod event;
pub mod history;
pub mod ids;
pub mod logger;

pub use builder::*;
pub use clock::*;
pub use codec::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use history::*;
pub use ids::*;
pub use logger::*;
