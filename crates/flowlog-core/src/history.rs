//! History chain encoding and decoding.
//!
//! A history is the ordered list of edge ids a flow has passed through,
//! oldest first. Between processes it travels as a single string with the
//! ids separated by commas (spaces are accepted on input as well).

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::error::{FlowEventError, Result};

/// Separator used when formatting a history chain.
pub const HISTORY_SEPARATOR: char = ',';

lazy_static! {
    // One or more ids from the Base64 basic alphabet (plus `=` padding),
    // separated by single commas or spaces
    static ref HISTORY_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9+/=]+(?:[, ][A-Za-z0-9+/=]+)*$").unwrap();

    static ref EDGE_ID_REGEX: Regex = Regex::new(r"^[A-Za-z0-9+/=]+$").unwrap();
}

/// Parse a raw history string into its ordered edge ids.
///
/// `None` and the empty string both mean "no history yet" and return
/// `Ok(None)`. Anything else must be a well-formed chain.
///
/// # Examples
/// ```
/// use flowlog_core::parse_history;
/// assert_eq!(
///     parse_history(Some("A,B C")).unwrap(),
///     Some(vec!["A".to_string(), "B".to_string(), "C".to_string()])
/// );
/// assert_eq!(parse_history(Some("")).unwrap(), None);
/// assert!(parse_history(Some("A;B")).is_err());
/// ```
pub fn parse_history(raw: Option<&str>) -> Result<Option<Vec<String>>> {
    let raw = match raw {
        None => return Ok(None),
        Some(raw) if raw.is_empty() => return Ok(None),
        Some(raw) => raw,
    };

    if !HISTORY_REGEX.is_match(raw) {
        return Err(FlowEventError::InvalidHistoryFormat {
            history: raw.to_string(),
        });
    }

    let ids: Vec<String> = raw
        .split(|c| c == ',' || c == ' ')
        .map(str::to_string)
        .collect();
    trace!(len = ids.len(), "parsed history chain");
    Ok(Some(ids))
}

/// Format the history to hand to the next hop: the existing chain with
/// `edge_id` appended last.
pub fn next_history(history: Option<&[String]>, edge_id: &str) -> String {
    let mut chain = String::new();
    for id in history.unwrap_or_default() {
        chain.push_str(id);
        chain.push(HISTORY_SEPARATOR);
    }
    chain.push_str(edge_id);
    chain
}

/// Check a single chain element against the allowed alphabet.
pub fn is_valid_edge_id(id: &str) -> bool {
    EDGE_ID_REGEX.is_match(id)
}
