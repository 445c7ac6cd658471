//! Render a Mermaid flowchart/sequence-diagram subset to ASCII or
//! Unicode box-drawing art.
//!
//! # Supported diagram types
//!
//! - Flowcharts (`graph TD` / `flowchart LR`, ...)
//! - Sequence diagrams (`sequenceDiagram`)
//!
//! `render` auto-detects which engine a source string needs;
//! [`render_graph`] and [`render_sequence_diagram`] call a specific
//! engine directly. [`render_graph`] fails with
//! [`RenderError::WrongDiagramType`] if the source is a sequence
//! diagram; [`render_sequence_diagram`] fails with
//! [`RenderError::MissingSequenceKeyword`] if it isn't.

pub mod alphabet;
pub mod canvas;
pub mod config;
pub mod error;
pub mod geom;
pub mod graph;
pub mod layout;
pub mod markdown;
pub mod model;
pub mod parser;
pub mod raster;
pub mod router;
pub mod sequence;

pub use config::RenderConfig;
pub use error::RenderError;
pub use markdown::{extract_mermaid_source, has_mermaid_blocks, split_markdown_content};

/// Render `source` to a character grid, picking the graph or sequence
/// engine automatically from its first meaningful line.
#[tracing::instrument(skip(source), fields(len = source.len()))]
pub fn render(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    match detect_diagram_type(source)? {
        "sequence" => render_sequence_diagram(source, config),
        _ => render_graph(source, config),
    }
}

/// `"sequence"` or `"graph"`, from the source's first meaningful line.
pub fn detect_diagram_type(source: &str) -> Result<&'static str, RenderError> {
    parser::detect_diagram_type(source)
}

/// Render `source` with the flowchart/graph engine. Errs with
/// [`RenderError::WrongDiagramType`] if it parses as a sequence diagram.
pub fn render_graph(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    tracing::debug!("dispatching to graph engine");
    graph::render(source, config)
}

/// Render `source` with the sequence-diagram engine. Errs with
/// [`RenderError::MissingSequenceKeyword`] if its first meaningful line
/// isn't `sequenceDiagram`.
pub fn render_sequence_diagram(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    tracing::debug!("dispatching to sequence engine");
    sequence::render_sequence_diagram(source, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_dispatches_to_graph_engine() {
        let out = render("graph LR\nA --> B", &RenderConfig::default()).unwrap();
        assert!(out.contains('A'));
    }

    #[test]
    fn render_dispatches_to_sequence_engine() {
        let out = render("sequenceDiagram\nA->>B: hi", &RenderConfig::default()).unwrap();
        assert!(out.contains("hi"));
    }

    #[test]
    fn render_graph_rejects_sequence_source() {
        let err = render_graph("sequenceDiagram\nA->>B: hi", &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, RenderError::WrongDiagramType { .. }));
    }

    #[test]
    fn render_sequence_rejects_graph_source() {
        let err = render_sequence_diagram("graph LR\nA --> B", &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, RenderError::MissingSequenceKeyword));
    }
}
