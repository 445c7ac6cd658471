//! Graph engine orchestrator: parse, lay out, route, and rasterize a
//! flowchart/graph diagram end to end.
//!
//! Grounded on the teacher's top-level `ascii::render_mermaid_ascii`,
//! which strings together its own parse/grid/pathfinder/draw phases in
//! the same order; this module does the equivalent for the graph
//! (non-sequence) half of the renderer.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::layout;
use crate::model::Graph;
use crate::parser;
use crate::raster;
use crate::router;

/// Parse, lay out, route every edge, and rasterize `source` as a graph
/// diagram. Returns the final trimmed character grid as a string.
#[tracing::instrument(skip(source, config))]
pub fn render(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let config = config.normalized();
    let mut graph = match parser::parse(source, &config)? {
        parser::Diagram::Graph(g) => g,
        parser::Diagram::Sequence(_) => {
            return Err(RenderError::WrongDiagramType { expected: "graph", found: "sequence" })
        }
    };
    tracing::debug!(nodes = graph.nodes.len(), edges = graph.edges.len(), "parsed graph");
    let canvas = render_graph(&mut graph);
    Ok(canvas.to_string_trimmed())
}

/// Lay out, route, and rasterize an already-parsed [`Graph`]. Exposed
/// separately from [`render`] so callers that already hold a parsed
/// graph (or need the intermediate [`crate::canvas::Canvas`]) can skip
/// re-parsing.
pub fn render_graph(graph: &mut Graph) -> crate::canvas::Canvas {
    let mut lay = layout::layout(graph);
    tracing::debug!(columns = lay.column_width.len(), rows = lay.row_height.len(), "laid out grid");
    let mut routes = Vec::with_capacity(graph.edges.len());

    for i in 0..graph.edges.len() {
        let (from, to, is_self, label_len) = {
            let edge = &graph.edges[i];
            let from = node_grid_coord(graph, &edge.from);
            let to = node_grid_coord(graph, &edge.to);
            (from, to, edge.is_self_edge(), edge.label.chars().count())
        };
        let (Some(from), Some(to)) = (from, to) else { continue };

        let route = router::route_edge(&lay.occupied, from, to, is_self, graph.direction);
        if route.path.is_empty() {
            tracing::trace!(from = %graph.edges[i].from, to = %graph.edges[i].to, "no route found, edge will not be drawn");
        }
        layout::grow_for_path(&mut lay, &route.path, graph.padding_x, graph.padding_y);

        let label_segment = if graph.edges[i].label.is_empty() {
            None
        } else {
            router::label_segment(&route.path, label_len)
        };

        graph.edges[i].path = route.path.clone();
        graph.edges[i].start_dir = Some(route.start_dir);
        graph.edges[i].end_dir = Some(route.end_dir);
        graph.edges[i].label_segment = label_segment;
        routes.push(route);
    }

    tracing::debug!(routed = routes.len(), "routed edges, rasterising");
    raster::rasterize(graph, &lay, &routes)
}

fn node_grid_coord(graph: &Graph, name: &str) -> Option<crate::geom::GridCoord> {
    graph.node_index(name).and_then(|i| graph.nodes[i].grid_coord)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_simple_edge_end_to_end() {
        let out = render("graph LR\nA --> B", &RenderConfig::default()).unwrap();
        assert!(out.contains('A'));
        assert!(out.contains('B'));
    }

    #[test]
    fn labeled_edge_carries_its_text() {
        let out = render("graph LR\nA -->|go| B", &RenderConfig::default()).unwrap();
        assert!(out.contains("go"));
    }

    #[test]
    fn subgraph_renders_a_border() {
        let out = render("graph LR\nsubgraph S\nA --> B\nend", &RenderConfig::default()).unwrap();
        assert!(out.chars().any(|c| c == '┌' || c == '+'));
    }

    #[test]
    fn ascii_mode_produces_only_ascii() {
        let config = RenderConfig { ascii: true, ..Default::default() };
        let out = render("graph LR\nA --> B", &config).unwrap();
        assert!(out.chars().all(|c| c.is_ascii()));
    }
}
