//! Graph/flowchart parser: `graph`/`flowchart` header, subgraphs,
//! classDef/style-class annotations, and `-->` edge chains.
//!
//! Grounded on the teacher's `parser/flowchart.rs` (`parse_flowchart`,
//! `consume_node_group`, `consume_single_node`, the `RE_NODE_*` shape
//! patterns) and `ascii/mod.rs::parse_config_from_text` for the padding
//! directives, narrowed to the single `-->` arrow style and the handful
//! of node-shape delimiters the spec's subset recognises.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::model::{Graph, GraphDirection};

lazy_static! {
    static ref RE_HEADER: Regex = Regex::new(r"(?i)^(?:graph|flowchart)\s+(LR|TD|TB)\s*$").unwrap();
    static ref RE_PADDING_X: Regex = Regex::new(r"(?i)^paddingx\s*=\s*(\d+)$").unwrap();
    static ref RE_PADDING_Y: Regex = Regex::new(r"(?i)^paddingy\s*=\s*(\d+)$").unwrap();
    static ref RE_SUBGRAPH: Regex = Regex::new(r"^subgraph\s+(.+)$").unwrap();
    static ref RE_CLASSDEF: Regex = Regex::new(r"^classDef\s+(\S+)\s+(.+)$").unwrap();
    static ref RE_CLASS_SUFFIX: Regex = Regex::new(r"^:::([A-Za-z_][\w-]*)").unwrap();
    static ref RE_ARROW: Regex = Regex::new(r"^-->\s*(?:\|([^|]*)\|)?").unwrap();

    // Node-shape delimiters: the shape itself is discarded (every node
    // renders as a plain rectangle, per the rasteriser's contract); only
    // the id and the enclosed label text are kept. Ordered most- to
    // least-specific so e.g. `((x))` isn't swallowed by `(x)` first.
    static ref RE_NODE_DOUBLE_CIRCLE: Regex = Regex::new(r"^([A-Za-z_][\w-]*)\(\((.+?)\)\)").unwrap();
    static ref RE_NODE_STADIUM: Regex = Regex::new(r"^([A-Za-z_][\w-]*)\(\[(.+?)\]\)").unwrap();
    static ref RE_NODE_SUBROUTINE: Regex = Regex::new(r"^([A-Za-z_][\w-]*)\[\[(.+?)\]\]").unwrap();
    static ref RE_NODE_HEXAGON: Regex = Regex::new(r"^([A-Za-z_][\w-]*)\{\{(.+?)\}\}").unwrap();
    static ref RE_NODE_RECTANGLE: Regex = Regex::new(r"^([A-Za-z_][\w-]*)\[(.+?)\]").unwrap();
    static ref RE_NODE_ROUNDED: Regex = Regex::new(r"^([A-Za-z_][\w-]*)\((.+?)\)").unwrap();
    static ref RE_NODE_DIAMOND: Regex = Regex::new(r"^([A-Za-z_][\w-]*)\{(.+?)\}").unwrap();
    static ref RE_BARE_ID: Regex = Regex::new(r"^([A-Za-z_][\w-]*)").unwrap();
}

pub fn parse(lines: &[String], config: &RenderConfig) -> Result<Graph, RenderError> {
    let mut idx = 0;
    let mut padding_x = config.padding_x;
    let mut padding_y = config.padding_y;

    while idx < lines.len() {
        if let Some(caps) = RE_PADDING_X.captures(&lines[idx]) {
            padding_x = caps[1].parse().unwrap_or(padding_x);
            idx += 1;
        } else if let Some(caps) = RE_PADDING_Y.captures(&lines[idx]) {
            padding_y = caps[1].parse().unwrap_or(padding_y);
            idx += 1;
        } else {
            break;
        }
    }

    let mut direction = GraphDirection::LR;
    if idx < lines.len() {
        if let Some(caps) = RE_HEADER.captures(&lines[idx]) {
            direction = if caps[1].eq_ignore_ascii_case("LR") {
                GraphDirection::LR
            } else {
                GraphDirection::TD
            };
            idx += 1;
        }
    }

    let mut graph = Graph::new(direction, padding_x, padding_y, config.box_border_padding, config.ascii);
    let mut subgraph_stack: Vec<usize> = Vec::new();

    for line in &lines[idx..] {
        let line = line.as_str();

        if let Some(caps) = RE_CLASSDEF.captures(line) {
            let name = caps[1].to_string();
            let props = parse_style_props(&caps[2]);
            graph.style_classes.insert(name, props);
            continue;
        }

        if let Some(caps) = RE_SUBGRAPH.captures(line) {
            let name = caps[1].trim().to_string();
            let parent = subgraph_stack.last().copied();
            let sg_index = graph.subgraphs.len();
            graph.subgraphs.push(crate::model::Subgraph::new(name, sg_index, parent));
            if let Some(&p) = subgraph_stack.last() {
                graph.subgraphs[p].children.push(sg_index);
            }
            subgraph_stack.push(sg_index);
            continue;
        }

        if line == "end" {
            if subgraph_stack.pop().is_none() {
                return Err(RenderError::MalformedSubgraph);
            }
            continue;
        }

        parse_edge_line(line, &mut graph, &subgraph_stack);
    }

    if !subgraph_stack.is_empty() {
        return Err(RenderError::MalformedSubgraph);
    }

    Ok(graph)
}

fn parse_style_props(s: &str) -> Vec<(String, String)> {
    s.split(',')
        .filter_map(|pair| {
            let (k, v) = pair.split_once(':')?;
            let (k, v) = (k.trim(), v.trim());
            if k.is_empty() || v.is_empty() {
                None
            } else {
                Some((k.to_string(), v.to_string()))
            }
        })
        .collect()
}

/// Register a node-first-add into every open subgraph frame, per the
/// containment rule: a node is only attributed to the subgraphs open at
/// the moment it is *created*, not on every subsequent mention.
fn register_in_open_subgraphs(graph: &mut Graph, name: &str, subgraph_stack: &[usize]) {
    for &sg in subgraph_stack {
        let entry = graph.node_subgraphs.entry(name.to_string()).or_default();
        if !entry.contains(&sg) {
            entry.push(sg);
        }
        if !graph.subgraphs[sg].nodes.contains(&name.to_string()) {
            graph.subgraphs[sg].nodes.push(name.to_string());
        }
    }
}

/// Parse a line of the form `GROUP --> GROUP --> GROUP ...`, where each
/// `GROUP` is an `&`-joined list of node tokens, chaining the previous
/// group's ids to the next group's ids as a cross product at each arrow.
fn parse_edge_line(line: &str, graph: &mut Graph, subgraph_stack: &[usize]) {
    let mut remaining = line.trim();
    let Some((mut prev_ids, rest)) = consume_node_group(remaining, graph, subgraph_stack) else {
        return;
    };
    remaining = rest;

    while !remaining.is_empty() {
        let Some(caps) = RE_ARROW.captures(remaining) else { break };
        let label = caps.get(1).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
        remaining = remaining[caps[0].len()..].trim_start();

        let Some((target_ids, rest2)) = consume_node_group(remaining, graph, subgraph_stack) else {
            break;
        };
        remaining = rest2;

        for source in &prev_ids {
            for target in &target_ids {
                let edge_index = graph.edges.len();
                graph
                    .edges
                    .push(crate::model::Edge::new(source.clone(), target.clone(), label.clone(), edge_index));
            }
        }

        prev_ids = target_ids;
    }
}

fn consume_node_group<'a>(
    input: &'a str,
    graph: &mut Graph,
    subgraph_stack: &[usize],
) -> Option<(Vec<String>, &'a str)> {
    let mut remaining = input.trim();
    let mut ids = Vec::new();

    loop {
        let Some((id, rest)) = consume_single_node(remaining, graph, subgraph_stack) else { break };
        ids.push(id);
        remaining = rest.trim_start();

        if let Some(caps) = RE_CLASS_SUFFIX.captures(remaining) {
            let class_name = caps[1].to_string();
            if let Some(last) = ids.last() {
                graph.node_style_refs.insert(last.clone(), class_name);
            }
            remaining = remaining[caps[0].len()..].trim_start();
        }

        if let Some(stripped) = remaining.strip_prefix('&') {
            remaining = stripped.trim_start();
            continue;
        }
        break;
    }

    if ids.is_empty() {
        None
    } else {
        Some((ids, remaining))
    }
}

fn consume_single_node<'a>(input: &'a str, graph: &mut Graph, subgraph_stack: &[usize]) -> Option<(String, &'a str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }

    for (regex, _) in node_shape_patterns() {
        if let Some(caps) = regex.captures(input) {
            let id = caps[1].to_string();
            let label = caps[2].to_string();
            let matched = caps[0].len();
            ensure_labeled_node(graph, &id, &label, subgraph_stack);
            return Some((id, &input[matched..]));
        }
    }

    let caps = RE_BARE_ID.captures(input)?;
    let id = caps[1].to_string();
    let matched = caps[0].len();
    ensure_labeled_node(graph, &id, &id.clone(), subgraph_stack);
    Some((id, &input[matched..]))
}

fn node_shape_patterns() -> [(&'static Regex, ()); 7] {
    [
        (&RE_NODE_DOUBLE_CIRCLE, ()),
        (&RE_NODE_STADIUM, ()),
        (&RE_NODE_SUBROUTINE, ()),
        (&RE_NODE_HEXAGON, ()),
        (&RE_NODE_RECTANGLE, ()),
        (&RE_NODE_DIAMOND, ()),
        // Single-paren form last: it's a strict substring of the
        // double-circle and stadium patterns, so trying it first would
        // mismatch on `A((x))`/`A([x])`.
        (&RE_NODE_ROUNDED, ()),
    ]
}

fn ensure_labeled_node(graph: &mut Graph, id: &str, label: &str, subgraph_stack: &[usize]) {
    let existed = graph.node_index(id).is_some();
    let idx = graph.ensure_node(id);
    if !existed {
        graph.nodes[idx].label = label.to_string();
        register_in_open_subgraphs(graph, id, subgraph_stack);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(s: &str) -> Vec<String> {
        s.lines().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect()
    }

    #[test]
    fn parses_minimal_edge() {
        let g = parse(&lines("graph LR\nA --> B"), &RenderConfig::default()).unwrap();
        assert_eq!(g.direction, GraphDirection::LR);
        assert_eq!(g.nodes.len(), 2);
        assert_eq!(g.edges.len(), 1);
        assert_eq!(g.edges[0].from, "A");
        assert_eq!(g.edges[0].to, "B");
    }

    #[test]
    fn defaults_to_lr_without_header() {
        let g = parse(&lines("A --> B"), &RenderConfig::default()).unwrap();
        assert_eq!(g.direction, GraphDirection::LR);
    }

    #[test]
    fn parses_labeled_edge() {
        let g = parse(&lines("graph LR\nA -->|go| B"), &RenderConfig::default()).unwrap();
        assert_eq!(g.edges[0].label, "go");
    }

    #[test]
    fn parses_ampersand_fan_out() {
        let g = parse(&lines("graph TD\nA --> B & C"), &RenderConfig::default()).unwrap();
        assert_eq!(g.edges.len(), 2);
        assert_eq!(g.nodes.len(), 3);
    }

    #[test]
    fn subgraph_nesting_and_membership() {
        let g = parse(&lines("graph LR\nsubgraph S\nB\nend\nA --> B"), &RenderConfig::default()).unwrap();
        assert_eq!(g.subgraphs.len(), 1);
        assert!(g.in_subgraph("B"));
        assert!(!g.in_subgraph("A"));
    }

    #[test]
    fn unmatched_end_is_an_error() {
        assert!(parse(&lines("graph LR\nend"), &RenderConfig::default()).is_err());
    }

    #[test]
    fn bracket_label_sets_display_text() {
        let g = parse(&lines("graph LR\nA[Go away] --> B"), &RenderConfig::default()).unwrap();
        let idx = g.node_index("A").unwrap();
        assert_eq!(g.nodes[idx].label, "Go away");
    }

    #[test]
    fn self_edge_is_recognised() {
        let g = parse(&lines("graph LR\nA --> A"), &RenderConfig::default()).unwrap();
        assert!(g.edges[0].is_self_edge());
    }
}
