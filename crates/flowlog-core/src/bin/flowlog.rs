//! flowlog CLI
//!
//! Builds a single flow event from command-line flags and prints its JSON
//! document to stdout. Useful from shell scripts and batch jobs that want
//! to take part in a traced flow.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use clap::Parser;
use flowlog_core::{FlowEvent, FlowLogger, FlowLoggerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "flowlog", version, about = "Emit a flow event as JSON")]
struct Args {
    /// Correlation id of the flow (generated when omitted)
    #[arg(long, short = 'c')]
    correlation_id: Option<String>,

    /// History received from the previous hop, e.g. "A,B,C"
    #[arg(long = "history", short = 'H')]
    history: Option<String>,

    /// Edge id (a short id is generated when omitted)
    #[arg(long, short = 'e')]
    edge_id: Option<String>,

    #[arg(long)]
    retry_group_id: Option<String>,

    /// RFC 3339 edge timestamp, e.g. 2017-06-07T10:44:31+02:00 (now when omitted)
    #[arg(long, value_parser = parse_timestamp)]
    timestamp: Option<DateTime<FixedOffset>>,

    #[arg(long)]
    milestone: Option<String>,

    /// Edge status [default: OK]
    #[arg(long)]
    status: Option<String>,

    #[arg(long)]
    error_type: Option<String>,

    #[arg(long)]
    error_reason: Option<String>,

    #[arg(long)]
    comment: Option<String>,

    #[arg(long)]
    source_type: Option<String>,

    #[arg(long)]
    source_address: Option<String>,

    #[arg(long)]
    source_payload_type: Option<String>,

    #[arg(long)]
    source_payload_id: Option<String>,

    #[arg(long)]
    destination_type: Option<String>,

    #[arg(long)]
    destination_address: Option<String>,

    #[arg(long)]
    destination_payload_type: Option<String>,

    #[arg(long)]
    destination_payload_id: Option<String>,

    /// TOML config file with reporter defaults (FLOWLOG_* env vars otherwise)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON document
    #[arg(long)]
    pretty: bool,

    /// Also print the history to hand to the next hop
    #[arg(long)]
    next_history: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout only carries the document
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => FlowLoggerConfig::load(path)?,
        None => FlowLoggerConfig::from_env(),
    };
    config.pretty |= args.pretty;
    let logger = FlowLogger::new(config)?;

    let next_history = args.next_history;
    let event = build_event(&logger, args)?;

    let json = logger.emit(&event)?;
    println!("{json}");
    if next_history {
        println!("{}", event.next_history());
    }

    Ok(())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(raw).map_err(|e| format!("invalid RFC 3339 timestamp {raw:?}: {e}"))
}

fn build_event(logger: &FlowLogger, args: Args) -> Result<FlowEvent, Box<dyn std::error::Error>> {
    let mut builder = logger.event().history(args.history.as_deref())?;
    builder = match args.correlation_id {
        Some(id) => builder.correlation_id(id),
        None => builder.generate_correlation_id(),
    };
    builder = match args.edge_id {
        Some(id) => builder.edge_id(id),
        None => builder.generate_edge_id(),
    };

    let event = builder
        .edge(|mut e| {
            if let Some(v) = args.timestamp {
                e = e.timestamp(v);
            }
            if let Some(v) = args.retry_group_id {
                e = e.retry_group_id(v);
            }
            if let Some(v) = args.milestone {
                e = e.milestone(v);
            }
            if let Some(v) = args.status {
                e = e.status(v);
            }
            if let Some(v) = args.error_type {
                e = e.error_type(v);
            }
            if let Some(v) = args.error_reason {
                e = e.error_reason(v);
            }
            if let Some(v) = args.comment {
                e = e.comment(v);
            }
            e
        })
        .source(|mut s| {
            if let Some(v) = args.source_type {
                s = s.node_type(v);
            }
            if let Some(v) = args.source_address {
                s = s.address(v);
            }
            if let Some(v) = args.source_payload_type {
                s = s.payload_type(v);
            }
            if let Some(v) = args.source_payload_id {
                s = s.payload_id(v);
            }
            s
        })
        .destination(|mut d| {
            if let Some(v) = args.destination_type {
                d = d.node_type(v);
            }
            if let Some(v) = args.destination_address {
                d = d.address(v);
            }
            if let Some(v) = args.destination_payload_type {
                d = d.payload_type(v);
            }
            if let Some(v) = args.destination_payload_id {
                d = d.payload_id(v);
            }
            d
        })
        .build()?;
    Ok(event)
}
