//! Grid placement and per-column/row sizing for the graph engine.
//!
//! Grounded on the teacher's `ascii/grid.rs`: `create_mapping` (root
//! placement, BFS child placement), `reserve_spot_in_grid` (3x3
//! reservation with perpendicular-axis collision retry), `set_column_width`
//! (column/row sizing including the subgraph-topmost padding bump), and
//! `has_incoming_edge_from_outside_subgraph`.

use std::collections::{HashMap, HashSet};

use crate::geom::GridCoord;
use crate::model::{Graph, GraphDirection};

/// Column widths, row heights, and the set of grid cells a node's 3x3
/// reservation occupies — everything the router needs to treat the
/// layout as an obstacle map.
pub struct Layout {
    pub column_width: HashMap<i32, usize>,
    pub row_height: HashMap<i32, usize>,
    pub occupied: HashSet<(i32, i32)>,
}

/// Node that directly contains `name`, innermost first — i.e. the last
/// entry pushed during parsing, since frames are pushed outermost-first.
fn innermost_subgraph(graph: &Graph, name: &str) -> Option<usize> {
    graph.node_subgraphs.get(name).and_then(|v| v.last().copied())
}

fn topmost_with_external_incoming(graph: &Graph, sg: usize) -> Option<usize> {
    graph
        .subgraphs
        .get(sg)?
        .nodes
        .iter()
        .filter_map(|n| graph.node_index(n))
        .filter(|&idx| has_incoming_from_outside(graph, &graph.nodes[idx].name, sg))
        .min_by_key(|&idx| graph.nodes[idx].grid_coord.map(|c| c.y).unwrap_or(i32::MAX))
}

fn has_incoming_from_outside(graph: &Graph, name: &str, own_sg: usize) -> bool {
    graph
        .edges
        .iter()
        .any(|e| e.to == name && innermost_subgraph(graph, &e.from) != Some(own_sg))
}

/// `true` if `node_idx` is the topmost node (least grid y) in its
/// innermost subgraph among those with an incoming edge from outside it.
fn is_topmost_with_external_incoming(graph: &Graph, node_idx: usize) -> bool {
    let name = &graph.nodes[node_idx].name;
    let Some(sg) = innermost_subgraph(graph, name) else { return false };
    if !has_incoming_from_outside(graph, name, sg) {
        return false;
    }
    topmost_with_external_incoming(graph, sg) == Some(node_idx)
}

/// Reserve a 3x3 block for `node_idx` starting at `requested`, retrying
/// at `+4` on the non-level axis on collision.
fn reserve_spot(
    occupied: &mut HashSet<(i32, i32)>,
    graph: &mut Graph,
    node_idx: usize,
    mut requested: GridCoord,
    direction: GraphDirection,
) -> GridCoord {
    loop {
        if !occupied.contains(&(requested.x, requested.y)) {
            break;
        }
        requested = match direction {
            GraphDirection::LR => GridCoord::new(requested.x, requested.y + 4),
            GraphDirection::TD => GridCoord::new(requested.x + 4, requested.y),
        };
    }
    for dx in 0..3 {
        for dy in 0..3 {
            occupied.insert((requested.x + dx, requested.y + dy));
        }
    }
    graph.nodes[node_idx].grid_coord = Some(requested);
    requested
}

fn children_of(graph: &Graph, node_idx: usize) -> Vec<usize> {
    let name = graph.nodes[node_idx].name.clone();
    graph
        .edges
        .iter()
        .filter(|e| e.from == name)
        .filter_map(|e| graph.node_index(&e.to))
        .collect()
}

/// Phase A: assign every node a `grid_coord`. Phase B: compute column
/// widths and row heights. Returns the layout plus the set of occupied
/// grid cells the router treats as obstacles.
pub fn layout(graph: &mut Graph) -> Layout {
    let direction = graph.direction;
    let mut occupied: HashSet<(i32, i32)> = HashSet::new();
    let mut next_position_per_level: HashMap<i32, i32> = HashMap::new();

    // Roots: nodes never seen as a child before their own definition.
    let mut seen: HashSet<usize> = HashSet::new();
    let mut roots = Vec::new();
    for idx in 0..graph.nodes.len() {
        if !seen.contains(&idx) {
            roots.push(idx);
        }
        seen.insert(idx);
        for child in children_of(graph, idx) {
            seen.insert(child);
        }
    }
    if roots.is_empty() && !graph.nodes.is_empty() {
        roots.push(0);
    }

    let has_external_root = roots.iter().any(|&idx| !graph.in_subgraph(&graph.nodes[idx].name));
    let has_subgraph_root_with_edges = roots
        .iter()
        .any(|&idx| graph.in_subgraph(&graph.nodes[idx].name) && !children_of(graph, idx).is_empty());
    let should_separate = direction == GraphDirection::LR && has_external_root && has_subgraph_root_with_edges;

    let (external_roots, subgraph_roots): (Vec<usize>, Vec<usize>) = if should_separate {
        roots.iter().partition(|&&idx| !graph.in_subgraph(&graph.nodes[idx].name))
    } else {
        (roots.clone(), Vec::new())
    };

    let mut place_at_level = |occupied: &mut HashSet<(i32, i32)>, graph: &mut Graph, idx: usize, level: i32| {
        let pos = *next_position_per_level.get(&level).unwrap_or(&0);
        let requested = match direction {
            GraphDirection::LR => GridCoord::new(level, pos),
            GraphDirection::TD => GridCoord::new(pos, level),
        };
        reserve_spot(occupied, graph, idx, requested, direction);
        next_position_per_level.insert(level, pos + 4);
    };

    for &idx in &external_roots {
        place_at_level(&mut occupied, graph, idx, 0);
    }
    for &idx in &subgraph_roots {
        place_at_level(&mut occupied, graph, idx, 4);
    }

    let mut queue: Vec<usize> = external_roots.iter().chain(subgraph_roots.iter()).copied().collect();
    let mut placed: HashSet<usize> = queue.iter().copied().collect();
    let mut cursor = 0;
    while cursor < queue.len() {
        let current = queue[cursor];
        cursor += 1;
        let Some(gc) = graph.nodes[current].grid_coord else { continue };
        let child_level = match direction {
            GraphDirection::LR => gc.x + 4,
            GraphDirection::TD => gc.y + 4,
        };
        for child in children_of(graph, current) {
            if placed.contains(&child) || graph.nodes[child].grid_coord.is_some() {
                continue;
            }
            place_at_level(&mut occupied, graph, child, child_level);
            placed.insert(child);
            queue.push(child);
        }
    }

    let mut column_width: HashMap<i32, usize> = HashMap::new();
    let mut row_height: HashMap<i32, usize> = HashMap::new();
    let box_padding = graph.box_border_padding;

    for idx in 0..graph.nodes.len() {
        let Some(gc) = graph.nodes[idx].grid_coord else { continue };
        let label_len = graph.nodes[idx].label.chars().count();

        let col_widths = [1, 2 * box_padding + label_len, 1];
        let row_heights = [1, 1 + 2 * box_padding, 1];

        for (i, &w) in col_widths.iter().enumerate() {
            let x = gc.x + i as i32;
            let e = column_width.entry(x).or_insert(0);
            *e = (*e).max(w);
        }
        for (i, &h) in row_heights.iter().enumerate() {
            let y = gc.y + i as i32;
            let e = row_height.entry(y).or_insert(0);
            *e = (*e).max(h);
        }

        if gc.x > 0 {
            let e = column_width.entry(gc.x - 1).or_insert(0);
            *e = (*e).max(graph.padding_x);
        }
        if gc.y > 0 {
            let mut pad = graph.padding_y;
            if is_topmost_with_external_incoming(graph, idx) {
                pad += 4;
            }
            let e = row_height.entry(gc.y - 1).or_insert(0);
            *e = (*e).max(pad);
        }
    }

    Layout { column_width, row_height, occupied }
}

/// Widen/heighten the cells a routed path visits to at least half-padding,
/// per §4.5's per-edge sizing adjustment.
pub fn grow_for_path(layout: &mut Layout, path: &[GridCoord], padding_x: usize, padding_y: usize) {
    for c in path {
        let e = layout.column_width.entry(c.x).or_insert(0);
        *e = (*e).max(padding_x / 2);
        let e = layout.row_height.entry(c.y).or_insert(0);
        *e = (*e).max(padding_y / 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::parser;

    fn build(src: &str) -> Graph {
        match parser::parse(src, &RenderConfig::default()).unwrap() {
            parser::Diagram::Graph(g) => g,
            _ => panic!("expected a graph"),
        }
    }

    fn build_with(src: &str, config: &RenderConfig) -> Graph {
        match parser::parse(src, config).unwrap() {
            parser::Diagram::Graph(g) => g,
            _ => panic!("expected a graph"),
        }
    }

    #[test]
    fn box_border_padding_widens_node_interior() {
        let default_config = RenderConfig::default();
        let mut g_default = build_with("graph LR\nA --> B", &default_config);
        let lay_default = layout(&mut g_default);
        let a = g_default.node_index("A").unwrap();
        let gc = g_default.nodes[a].grid_coord.unwrap();
        let default_height = *lay_default.row_height.get(&(gc.y + 1)).unwrap();

        let wide_config = RenderConfig { box_border_padding: 3, ..RenderConfig::default() };
        let mut g_wide = build_with("graph LR\nA --> B", &wide_config);
        let lay_wide = layout(&mut g_wide);
        let wide_height = *lay_wide.row_height.get(&(gc.y + 1)).unwrap();

        assert!(wide_height > default_height);
    }

    #[test]
    fn roots_placed_at_level_zero() {
        let mut g = build("graph LR\nA --> B");
        let _ = layout(&mut g);
        let a = g.node_index("A").unwrap();
        assert_eq!(g.nodes[a].grid_coord.unwrap(), GridCoord::new(0, 0));
    }

    #[test]
    fn child_placed_one_level_deeper_lr() {
        let mut g = build("graph LR\nA --> B");
        let _ = layout(&mut g);
        let b = g.node_index("B").unwrap();
        assert_eq!(g.nodes[b].grid_coord.unwrap().x, 4);
    }

    #[test]
    fn siblings_stack_on_free_axis() {
        let mut g = build("graph TD\nA --> B\nA --> C");
        let _ = layout(&mut g);
        let bi = g.node_index("B").unwrap();
        let ci = g.node_index("C").unwrap();
        let b = g.nodes[bi].grid_coord.unwrap();
        let c = g.nodes[ci].grid_coord.unwrap();
        assert_ne!(b.x, c.x);
        assert_eq!(b.y, c.y);
    }

    #[test]
    fn column_width_covers_label() {
        let mut g = build("graph LR\nA --> B");
        let lay = layout(&mut g);
        let a = g.node_index("A").unwrap();
        let gc = g.nodes[a].grid_coord.unwrap();
        assert_eq!(*lay.column_width.get(&(gc.x + 1)).unwrap(), 2 + 1);
    }
}
