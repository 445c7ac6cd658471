//! Mermaid-subset tokeniser: splits source into logical lines, strips
//! comments, detects the diagram type, and dispatches to the graph or
//! sequence parser.
//!
//! Grounded on the teacher's `ascii/mod.rs::parse_config_from_text` for
//! the config-directive scan and this module's own `parse_mermaid`/
//! `detect_diagram_type` for the overall line-splitting and dispatch
//! shape, but the teacher supports five diagram families from a shared
//! line stream — this module only ever chooses between graph and
//! sequence, per the closed diagram set this renderer supports.

pub mod graph;
pub mod sequence;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::model::{Graph, SequenceDiagram};

/// The parsed form of a Mermaid source string, ready for layout.
pub enum Diagram {
    Graph(Graph),
    Sequence(SequenceDiagram),
}

/// `"sequence"` or `"graph"`, mirroring the public `detectDiagramType`.
pub fn detect_diagram_type(source: &str) -> Result<&'static str, RenderError> {
    let lines = preprocess(source)?;
    if is_sequence_header(&lines[0]) {
        Ok("sequence")
    } else {
        Ok("graph")
    }
}

pub fn parse(source: &str, config: &RenderConfig) -> Result<Diagram, RenderError> {
    let lines = preprocess(source)?;
    if is_sequence_header(&lines[0]) {
        sequence::parse(&lines).map(Diagram::Sequence)
    } else {
        graph::parse(&lines, config).map(Diagram::Graph)
    }
}

fn is_sequence_header(line: &str) -> bool {
    line.eq_ignore_ascii_case("sequenceDiagram")
}

/// Split on `\n` and literal `\n` escape sequences, strip `%%` comments
/// (whole-line and trailing), trim each line, and drop blank lines.
/// Parsing stops entirely at a line that is exactly `---` (the
/// test-fixture separator) — everything from that line onward is
/// dropped before this function returns.
pub(crate) fn preprocess(source: &str) -> Result<Vec<String>, RenderError> {
    let mut lines = Vec::new();

    'outer: for raw_line in source.split('\n') {
        for part in raw_line.split("\\n") {
            let stripped = strip_comment(part);
            let trimmed = stripped.trim();
            if trimmed == "---" {
                break 'outer;
            }
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
    }

    if lines.is_empty() {
        return Err(RenderError::EmptySource);
    }
    Ok(lines)
}

/// Drop a whole-line `%%` comment entirely, or truncate a line at a
/// trailing `%% ...` marker.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with("%%") {
        return "";
    }
    match line.find("%%") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_is_an_error() {
        assert_eq!(preprocess("   \n%% just a comment\n").unwrap_err(), RenderError::EmptySource);
    }

    #[test]
    fn strips_trailing_comment() {
        let lines = preprocess("graph LR %% note\nA --> B").unwrap();
        assert_eq!(lines[0], "graph LR");
    }

    #[test]
    fn splits_on_literal_backslash_n() {
        let lines = preprocess("graph LR\\nA --> B").unwrap();
        assert_eq!(lines, vec!["graph LR".to_string(), "A --> B".to_string()]);
    }

    #[test]
    fn stops_at_fixture_separator() {
        let lines = preprocess("graph LR\nA --> B\n---\nexpected output here").unwrap();
        assert_eq!(lines, vec!["graph LR".to_string(), "A --> B".to_string()]);
    }

    #[test]
    fn detects_sequence_diagrams() {
        assert_eq!(detect_diagram_type("sequenceDiagram\nparticipant A").unwrap(), "sequence");
        assert_eq!(detect_diagram_type("graph LR\nA --> B").unwrap(), "graph");
    }
}
