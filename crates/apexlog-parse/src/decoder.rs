//! Token-to-event decoding.
//!
//! One [`Event`] per recognized token, order preserved. The tag table is
//! exhaustive over the grammar the engine understands; anything else decodes
//! to [`Event::Unknown`] with fields preserved verbatim, because the log
//! format evolves across platform versions and the engine must degrade
//! gracefully. A field-count mismatch on a known tag downgrades that token
//! to `Unknown` plus a warning rather than aborting the analysis.

use apexlog_core::{CodeUnitKind, DmlOp, Event, LimitCategory, ParseWarning};

use crate::tokenizer::Token;

/// Decodes one token into a typed event, accumulating warnings for
/// downgraded tokens.
pub fn decode(mut token: Token, warnings: &mut Vec<ParseWarning>) -> Event {
    let tag = std::mem::take(&mut token.event_type);
    let ts = token.timestamp_ns;

    match tag.as_str() {
        "EXECUTION_STARTED" => Event::CodeUnitStarted {
            kind: CodeUnitKind::Execution,
            identifier: "execution".to_string(),
            timestamp_ns: ts,
        },

        "EXECUTION_FINISHED" => Event::CodeUnitFinished {
            kind: CodeUnitKind::Execution,
            identifier: "execution".to_string(),
            timestamp_ns: ts,
        },

        "CODE_UNIT_STARTED" => match token.fields.last() {
            Some(label) => Event::CodeUnitStarted {
                kind: infer_unit_kind(label),
                identifier: label.clone(),
                timestamp_ns: ts,
            },
            None => downgrade(tag, token, 1, warnings),
        },

        "CODE_UNIT_FINISHED" => match token.fields.last() {
            Some(label) => Event::CodeUnitFinished {
                kind: infer_unit_kind(label),
                identifier: label.clone(),
                timestamp_ns: ts,
            },
            None => downgrade(tag, token, 1, warnings),
        },

        "METHOD_ENTRY" => match token.fields.last() {
            Some(signature) => Event::CodeUnitStarted {
                kind: CodeUnitKind::Method,
                identifier: signature.clone(),
                timestamp_ns: ts,
            },
            None => downgrade(tag, token, 1, warnings),
        },

        "METHOD_EXIT" => match token.fields.last() {
            Some(signature) => Event::CodeUnitFinished {
                kind: CodeUnitKind::Method,
                identifier: signature.clone(),
                timestamp_ns: ts,
            },
            None => downgrade(tag, token, 1, warnings),
        },

        "SOQL_EXECUTE_BEGIN" => {
            if token.fields.len() < 2 {
                return downgrade(tag, token, 2, warnings);
            }
            Event::SoqlExecuteBegin {
                query: token.fields.last().cloned().unwrap_or_default(),
                timestamp_ns: ts,
            }
        }

        "SOQL_EXECUTE_END" => match prefixed_u64(&token, "Rows:") {
            Some(row_count) => Event::SoqlExecuteEnd {
                row_count,
                timestamp_ns: ts,
            },
            None => downgrade(tag, token, 2, warnings),
        },

        "DML_BEGIN" => {
            let op = prefixed_field(&token, "Op:").and_then(parse_dml_op);
            let object_type = prefixed_field(&token, "Type:");
            let row_count = prefixed_u64(&token, "Rows:");
            match (op, object_type, row_count) {
                (Some(op), Some(object_type), Some(row_count)) => Event::DmlBegin {
                    op,
                    object_type: object_type.to_string(),
                    row_count,
                    timestamp_ns: ts,
                },
                _ => downgrade(tag, token, 4, warnings),
            }
        }

        "DML_END" => {
            if token.fields.is_empty() {
                return downgrade(tag, token, 1, warnings);
            }
            Event::DmlEnd { timestamp_ns: ts }
        }

        "LIMIT_USAGE" => {
            if token.fields.len() < 4 {
                return downgrade(tag, token, 4, warnings);
            }
            let category_tag = token.fields[1].trim();
            let category = match LimitCategory::from_tag(category_tag) {
                Some(category) => category,
                None => {
                    warnings.push(ParseWarning::UnknownLimitCategory {
                        line: token.line,
                        category: category_tag.to_string(),
                    });
                    return unknown(tag, token);
                }
            };
            match (token.fields[2].trim().parse(), token.fields[3].trim().parse()) {
                (Ok(used), Ok(limit)) => Event::LimitUsage {
                    category,
                    used,
                    limit,
                    timestamp_ns: ts,
                },
                _ => {
                    warnings.push(ParseWarning::MalformedLine { line: token.line });
                    unknown(tag, token)
                }
            }
        }

        "EXCEPTION_THROWN" => {
            if token.fields.len() < 2 {
                return downgrade(tag, token, 2, warnings);
            }
            Event::Exception {
                error_type: token.fields[1].clone(),
                // Message may itself contain pipes; rejoin the remainder.
                message: token.fields[2..].join("|"),
                timestamp_ns: ts,
            }
        }

        "FATAL_ERROR" => {
            if token.fields.is_empty() {
                return downgrade(tag, token, 1, warnings);
            }
            Event::Exception {
                error_type: "FATAL_ERROR".to_string(),
                message: token.fields.join("|"),
                timestamp_ns: ts,
            }
        }

        _ => unknown(tag, token),
    }
}

/// Infers the unit kind from a `CODE_UNIT_STARTED`/`FINISHED` label.
fn infer_unit_kind(label: &str) -> CodeUnitKind {
    if label.contains(" trigger event ") {
        CodeUnitKind::Trigger
    } else if label.starts_with("Workflow:") {
        CodeUnitKind::Workflow
    } else if label.starts_with("Flow:") {
        CodeUnitKind::Flow
    } else if label.contains("execute_anonymous") {
        CodeUnitKind::Anonymous
    } else {
        CodeUnitKind::Method
    }
}

/// Finds the first field with the given prefix and returns the remainder.
fn prefixed_field<'a>(token: &'a Token, prefix: &str) -> Option<&'a str> {
    token
        .fields
        .iter()
        .find_map(|f| f.trim().strip_prefix(prefix))
}

fn prefixed_u64(token: &Token, prefix: &str) -> Option<u64> {
    prefixed_field(token, prefix)?.parse().ok()
}

fn parse_dml_op(s: &str) -> Option<DmlOp> {
    match s.to_ascii_lowercase().as_str() {
        "insert" => Some(DmlOp::Insert),
        "update" => Some(DmlOp::Update),
        "delete" => Some(DmlOp::Delete),
        "upsert" => Some(DmlOp::Upsert),
        "undelete" => Some(DmlOp::Undelete),
        "merge" => Some(DmlOp::Merge),
        _ => None,
    }
}

/// Downgrades a known tag with a bad field list to `Unknown`, with a warning.
fn downgrade(
    tag: String,
    token: Token,
    expected: usize,
    warnings: &mut Vec<ParseWarning>,
) -> Event {
    warnings.push(ParseWarning::FieldCountMismatch {
        line: token.line,
        tag: tag.clone(),
        expected,
        actual: token.fields.len(),
    });
    unknown(tag, token)
}

fn unknown(tag: String, token: Token) -> Event {
    Event::Unknown {
        tag,
        fields: token.fields.into_vec(),
        timestamp_ns: token.timestamp_ns,
    }
}
