//! The analysis pipeline: raw log text in, [`AnalysisReport`] out.
//!
//! A single synchronous pass over one log: tokenize, decode, build the
//! execution tree while tallying limit consumption, then run the rule
//! battery. The engine is stateless and performs no I/O; concurrent
//! invocations over different logs need no coordination. Only an empty
//! input aborts; every other anomaly degrades to a parse warning in the
//! report.

pub mod limits;
pub mod rules;
pub mod tree;

pub use limits::LimitAccountant;
pub use rules::{run_rules, RuleContext};
pub use tree::TreeBuilder;

use apexlog_core::{AnalysisReport, AnalyzeConfig, AnalyzeError, ParseWarning};
use apexlog_parse::{decode, Tokenizer, TokenizerItem};

/// Analyzes one raw debug log.
///
/// Returns a complete report (possibly with warnings) or a single fatal
/// input error; never a partially populated report. Analyzing the same text
/// with the same configuration twice yields byte-identical serialized
/// reports.
///
/// # Errors
///
/// [`AnalyzeError::EmptyInput`] when `text` is empty or whitespace only.
pub fn analyze(text: &str, config: &AnalyzeConfig) -> Result<AnalysisReport, AnalyzeError> {
    if text.trim().is_empty() {
        return Err(AnalyzeError::EmptyInput);
    }

    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut builder = TreeBuilder::new();
    let mut accountant = LimitAccountant::new();

    // Tree building and limit accounting share one forward pass; the
    // accountant sees each event attributed to the scope open when it
    // arrived, exactly mirroring the builder's stack state.
    for item in Tokenizer::new(text) {
        match item {
            TokenizerItem::Token(token) => {
                let event = decode(token, &mut warnings);
                accountant.observe(builder.current_scope(), &event);
                builder.observe(event);
            }
            TokenizerItem::Warning(warning) => warnings.push(warning),
        }
    }

    let (tree, tree_warnings) = builder.finish();
    warnings.extend(tree_warnings);
    let limits = accountant.finish();

    let findings = run_rules(&RuleContext {
        tree: &tree,
        limits: &limits,
        warnings: &warnings,
        config,
    });

    Ok(AnalysisReport {
        tree,
        limits,
        findings,
        parse_warnings: warnings.iter().map(|w| w.to_string()).collect(),
    })
}
