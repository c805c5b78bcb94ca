//! Parsing front end for Apex debug logs: tokenizer and event decoder.
//!
//! The tokenizer splits raw text into timestamped, pipe-delimited tokens;
//! the decoder maps each token to a typed [`Event`]. Both degrade
//! gracefully: malformed lines and unknown tags become warnings or
//! `Unknown` events, never aborts.

pub mod decoder;
pub mod tokenizer;

pub use decoder::decode;
pub use tokenizer::{Token, Tokenizer, TokenizerItem};

use apexlog_core::{Event, ParseWarning};

/// Tokenizes and decodes a full log text in one pass.
///
/// Returns the ordered event sequence plus all warnings accumulated by both
/// stages. Convenience over driving [`Tokenizer`] and [`decode`] by hand;
/// the results are identical.
pub fn parse_events(text: &str) -> (Vec<Event>, Vec<ParseWarning>) {
    let mut events = Vec::new();
    let mut warnings = Vec::new();
    for item in Tokenizer::new(text) {
        match item {
            TokenizerItem::Token(token) => {
                events.push(decode(token, &mut warnings));
            }
            TokenizerItem::Warning(warning) => warnings.push(warning),
        }
    }
    (events, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_events_preserves_stream_order() {
        let log = "64.0 APEX_CODE,FINEST;DB,INFO\n\
                   09:00:00.0 (100)|EXECUTION_STARTED\n\
                   09:00:00.1 (200)|SOQL_EXECUTE_BEGIN|[4]|Aggregations:0|SELECT Id FROM Account\n\
                   09:00:00.2 (300)|SOQL_EXECUTE_END|[4]|Rows:12\n\
                   09:00:00.3 (400)|EXECUTION_FINISHED\n";
        let (events, warnings) = parse_events(log);
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
        assert_eq!(events.len(), 4);
        let timestamps: Vec<u64> = events.iter().map(|e| e.timestamp_ns()).collect();
        assert_eq!(timestamps, vec![100, 200, 300, 400]);
    }
}
