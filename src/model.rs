//! The graph IR: nodes, edges, subgraphs, and the properties bag layout
//! and the rasteriser thread through a render call.
//!
//! Grounded on the teacher crate's `ascii/types.rs` (`AsciiNode`,
//! `AsciiEdge`, `GraphProperties`) and `ascii/grid.rs`'s subgraph
//! bookkeeping, generalized so subgraphs form an explicit tree (per
//! design note: the parent link is a weak back-reference, nodes and
//! subgraphs each live in one flat, owning list on [`Graph`]).

use std::collections::HashMap;

use crate::geom::{Direction, DrawingCoord, GridCoord};

/// A single flowchart/graph node.
///
/// `grid_coord` and `drawing_coord` are write-once: `None` until the
/// layout (resp. rasteriser) phase assigns them, `Some` forever after.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Display text; defaults to `name` but may be overridden by a
    /// bracket-delimited label (`A[Go away]`, `A(Go away)`, ...). The
    /// delimiter shape itself is accepted but not reflected in the
    /// rendered box — every node renders as a rectangle.
    pub label: String,
    /// Parse order; used only as a deterministic placement tiebreak.
    pub index: usize,
    pub grid_coord: Option<GridCoord>,
    pub drawing_coord: Option<DrawingCoord>,
    /// `(w, h)` of the rendered box, set once the node's label is known.
    pub box_size: Option<(usize, usize)>,
    pub drawn: bool,
    pub style_class_name: Option<String>,
}

impl Node {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        let name = name.into();
        Node {
            label: name.clone(),
            name,
            index,
            grid_coord: None,
            drawing_coord: None,
            box_size: None,
            drawn: false,
            style_class_name: None,
        }
    }
}

/// An edge between two nodes, identified by name. `path`, `label_segment`,
/// `start_dir` and `end_dir` are populated once, by the router.
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: String,
    /// Parse order; edges are drawn in this order (§4.6 z-order).
    pub index: usize,
    pub path: Vec<GridCoord>,
    /// The two path endpoints the label is anchored between, if any.
    pub label_segment: Option<[GridCoord; 2]>,
    pub start_dir: Option<Direction>,
    pub end_dir: Option<Direction>,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, label: impl Into<String>, index: usize) -> Self {
        Edge {
            from: from.into(),
            to: to.into(),
            label: label.into(),
            index,
            path: Vec::new(),
            label_segment: None,
            start_dir: None,
            end_dir: None,
        }
    }

    pub fn is_self_edge(&self) -> bool {
        self.from == self.to
    }
}

/// A bounding box in drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BBox {
    pub fn overlaps_x(&self, other: &BBox) -> bool {
        self.min_x <= other.max_x && other.min_x <= self.max_x
    }

    pub fn overlaps_y(&self, other: &BBox) -> bool {
        self.min_y <= other.max_y && other.min_y <= self.max_y
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.min_x += dx;
        self.max_x += dx;
        self.min_y += dy;
        self.max_y += dy;
    }
}

/// A named, possibly-nested region containing a subset of nodes.
///
/// Subgraphs live in one flat owning list on [`Graph`]; `parent` is a
/// weak back-reference (an index into that list), never an owning
/// pointer, so the tree has no cycles to worry about at the type level.
#[derive(Debug, Clone)]
pub struct Subgraph {
    pub name: String,
    pub index: usize,
    /// Names of nodes directly declared inside this subgraph (not
    /// including nodes that only live in a nested child subgraph).
    pub nodes: Vec<String>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub bbox: Option<BBox>,
}

impl Subgraph {
    pub fn new(name: impl Into<String>, index: usize, parent: Option<usize>) -> Self {
        Subgraph {
            name: name.into(),
            index,
            nodes: Vec::new(),
            parent,
            children: Vec::new(),
            bbox: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphDirection {
    LR,
    TD,
}

/// Everything the parser produces and the layout/router/rasteriser
/// phases consume and extend in place.
///
/// Grounded on the teacher's `GraphProperties`: nodes and edges each
/// live in one insertion-ordered collection; `edges_by_source` is a
/// derived index rebuilt once parsing finishes, mirroring the teacher's
/// `parent -> [TextEdge]` map.
#[derive(Debug, Clone)]
pub struct Graph {
    pub direction: GraphDirection,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub subgraphs: Vec<Subgraph>,
    /// Map from node name to every subgraph index that directly or
    /// transitively contains it.
    pub node_subgraphs: HashMap<String, Vec<usize>>,
    pub style_classes: HashMap<String, Vec<(String, String)>>,
    pub node_style_refs: HashMap<String, String>,
    pub padding_x: usize,
    pub padding_y: usize,
    pub box_border_padding: usize,
    pub use_ascii: bool,
}

impl Graph {
    pub fn new(
        direction: GraphDirection,
        padding_x: usize,
        padding_y: usize,
        box_border_padding: usize,
        use_ascii: bool,
    ) -> Self {
        Graph {
            direction,
            nodes: Vec::new(),
            edges: Vec::new(),
            subgraphs: Vec::new(),
            node_subgraphs: HashMap::new(),
            style_classes: HashMap::new(),
            node_style_refs: HashMap::new(),
            padding_x,
            padding_y,
            box_border_padding,
            use_ascii,
        }
    }

    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Insert a node if it isn't already present; returns its index.
    pub fn ensure_node(&mut self, name: &str) -> usize {
        if let Some(i) = self.node_index(name) {
            return i;
        }
        let idx = self.nodes.len();
        self.nodes.push(Node::new(name, idx));
        idx
    }

    /// Names of edges grouped by source, in parse order, mirroring the
    /// teacher's `edges-by-source` map.
    pub fn edges_by_source(&self) -> HashMap<String, Vec<&Edge>> {
        let mut map: HashMap<String, Vec<&Edge>> = HashMap::new();
        for edge in &self.edges {
            map.entry(edge.from.clone()).or_default().push(edge);
        }
        map
    }

    pub fn in_subgraph(&self, name: &str) -> bool {
        self.node_subgraphs.get(name).map(|v| !v.is_empty()).unwrap_or(false)
    }

    /// `true` if `name` has at least one incoming edge from a node not
    /// listed in any of `name`'s own subgraphs.
    pub fn has_incoming_from_outside(&self, name: &str) -> bool {
        let own = self.node_subgraphs.get(name).cloned().unwrap_or_default();
        self.edges.iter().any(|e| {
            e.to == name
                && !own.is_empty()
                && !self
                    .node_subgraphs
                    .get(&e.from)
                    .map(|s| s.iter().any(|g| own.contains(g)))
                    .unwrap_or(false)
        })
    }

    pub fn has_incoming_edge(&self, name: &str) -> bool {
        self.edges.iter().any(|e| e.to == name)
    }
}

/// A sequence-diagram participant.
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: String,
    pub label: String,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowStyle {
    Solid,
    Dotted,
}

/// A message sent from one participant to another (or itself).
/// `number == 0` means unnumbered.
#[derive(Debug, Clone)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub label: String,
    pub arrow: ArrowStyle,
    pub number: u32,
}

impl Message {
    pub fn is_self_message(&self) -> bool {
        self.from == self.to
    }
}

#[derive(Debug, Clone)]
pub struct SequenceDiagram {
    pub participants: Vec<Participant>,
    pub messages: Vec<Message>,
    pub autonumber: bool,
}

impl SequenceDiagram {
    pub fn new() -> Self {
        SequenceDiagram {
            participants: Vec::new(),
            messages: Vec::new(),
            autonumber: false,
        }
    }

    pub fn participant_index(&self, id: &str) -> Option<usize> {
        self.participants.iter().position(|p| p.id == id)
    }

    /// Insert a participant (defaulting its label to its id) if it
    /// isn't already present; returns its index.
    pub fn ensure_participant(&mut self, id: &str) -> usize {
        if let Some(i) = self.participant_index(id) {
            return i;
        }
        let idx = self.participants.len();
        self.participants.push(Participant {
            id: id.to_string(),
            label: id.to_string(),
            index: idx,
        });
        idx
    }
}

impl Default for SequenceDiagram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_node_is_idempotent() {
        let mut g = Graph::new(GraphDirection::LR, 5, 5, 1, false);
        let a1 = g.ensure_node("A");
        let a2 = g.ensure_node("A");
        assert_eq!(a1, a2);
        assert_eq!(g.nodes.len(), 1);
    }

    #[test]
    fn ensure_participant_defaults_label_to_id() {
        let mut s = SequenceDiagram::new();
        let i = s.ensure_participant("A");
        assert_eq!(s.participants[i].label, "A");
    }

    #[test]
    fn bbox_overlap_detection() {
        let a = BBox { min_x: 0, min_y: 0, max_x: 5, max_y: 5 };
        let b = BBox { min_x: 3, min_y: 10, max_x: 8, max_y: 15 };
        assert!(a.overlaps_x(&b));
        assert!(!a.overlaps_y(&b));
    }
}
