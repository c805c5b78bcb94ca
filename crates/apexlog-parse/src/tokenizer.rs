//! Line tokenizer for the Apex debug log format.
//!
//! Each event line has the shape:
//!
//! ```text
//! HH:MM:SS.mmm (123456789)|EVENT_TYPE|field|field|...
//! ```
//!
//! The parenthesized integer is elapsed nanoseconds since log start and is
//! the authoritative timestamp. An optional version header line
//! (`64.0 APEX_CODE,FINEST;...`) may precede the first event and is skipped
//! silently. Tokenization is lazy and stateless: re-invoking on the same
//! text restarts it.

use serde::Serialize;
use smallvec::SmallVec;

use apexlog_core::ParseWarning;

/// One tokenized log line. Transient: consumed by the decoder, not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Elapsed nanoseconds since log start.
    pub timestamp_ns: u64,
    /// The event-type tag (e.g. `SOQL_EXECUTE_BEGIN`).
    pub event_type: String,
    /// Pipe-delimited fields following the tag, in order.
    pub fields: SmallVec<[String; 6]>,
    /// 0-based source line number, for warning attribution.
    pub line: usize,
}

/// Output of one tokenizer step: a token, or a warning for a line (or
/// timestamp ordering anomaly) that produced none.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenizerItem {
    Token(Token),
    Warning(ParseWarning),
}

/// Lazy iterator over the tokens of a raw log text.
pub struct Tokenizer<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    prev_ns: Option<u64>,
    /// Token held back while its timestamp-regression warning is emitted.
    pending: Option<Token>,
    at_start: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Tokenizer {
            lines: text.lines().enumerate(),
            prev_ns: None,
            pending: None,
            at_start: true,
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = TokenizerItem;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            return Some(TokenizerItem::Token(token));
        }

        loop {
            let (line_no, raw) = self.lines.next()?;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if self.at_start {
                self.at_start = false;
                if is_version_header(line) {
                    continue;
                }
            }

            let token = match parse_line(line, line_no) {
                Some(token) => token,
                None => {
                    return Some(TokenizerItem::Warning(ParseWarning::MalformedLine {
                        line: line_no,
                    }));
                }
            };

            let prev_ns = self.prev_ns.replace(token.timestamp_ns);
            if let Some(prev_ns) = prev_ns {
                if token.timestamp_ns < prev_ns {
                    // Keep the token, in original order, behind the warning.
                    // Reordering would corrupt causal nesting.
                    let warning = ParseWarning::TimestampRegression {
                        line: line_no,
                        prev_ns,
                        timestamp_ns: token.timestamp_ns,
                    };
                    self.pending = Some(token);
                    return Some(TokenizerItem::Warning(warning));
                }
            }
            return Some(TokenizerItem::Token(token));
        }
    }
}

/// Recognizes the log's version header, e.g. `64.0 APEX_CODE,FINEST;DB,INFO`.
fn is_version_header(line: &str) -> bool {
    line.starts_with(|c: char| c.is_ascii_digit()) && line.contains("APEX_CODE")
}

/// Splits one event line into a token. Returns `None` when the line does not
/// match the expected shape.
fn parse_line(line: &str, line_no: usize) -> Option<Token> {
    let mut segments = line.split('|');
    let clock = segments.next()?;
    let timestamp_ns = parse_elapsed_ns(clock)?;

    let event_type = segments.next()?.trim();
    if event_type.is_empty() {
        return None;
    }

    let fields: SmallVec<[String; 6]> = segments.map(|s| s.to_string()).collect();
    Some(Token {
        timestamp_ns,
        event_type: event_type.to_string(),
        fields,
        line: line_no,
    })
}

/// Extracts the parenthesized elapsed-nanoseconds value from the leading
/// clock segment, e.g. `09:12:24.123 (123456789)` -> `123456789`.
fn parse_elapsed_ns(clock: &str) -> Option<u64> {
    let open = clock.find('(')?;
    let close = clock[open..].find(')')? + open;
    clock[open + 1..close].parse().ok()
}
