//! Isolating `` ```mermaid `` fences from a markdown stream.
//!
//! No teacher counterpart — grounded on the regex-based, line-oriented
//! scanning style the teacher's own parser regexes use throughout
//! `parser/flowchart.rs` rather than pulling in a full CommonMark parser
//! for three fenced-block-aware string functions.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_FENCE_START: Regex = Regex::new(r"(?m)^```mermaid[ \t]*$").unwrap();
    static ref RE_FENCE_END: Regex = Regex::new(r"(?m)^```[ \t]*$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Text,
    Mermaid,
}

/// One chunk of a `splitMarkdownContent` partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub content: String,
    /// `false` only for a trailing, unclosed `` ```mermaid `` block.
    pub is_complete: bool,
}

/// Partition `source` into text and mermaid segments. Concatenating the
/// segments in order — mermaid ones re-wrapped as
/// `` ```mermaid\n{content}\n``` `` (or, for an incomplete trailing
/// block, `` ```mermaid\n{content} `` with no closing fence) —
/// reproduces `source` exactly.
pub fn split_markdown_content(source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = source;

    loop {
        let Some(start) = RE_FENCE_START.find(rest) else {
            if !rest.is_empty() {
                segments.push(Segment { kind: SegmentKind::Text, content: rest.to_string(), is_complete: true });
            }
            break;
        };

        let before = &rest[..start.start()];
        if !before.is_empty() {
            segments.push(Segment { kind: SegmentKind::Text, content: before.to_string(), is_complete: true });
        }

        let after_fence = &rest[start.end()..];
        let after_fence = after_fence.strip_prefix('\n').unwrap_or(after_fence);

        match RE_FENCE_END.find(after_fence) {
            Some(end) => {
                let body = &after_fence[..end.start()];
                let body = body.strip_suffix('\n').unwrap_or(body);
                segments.push(Segment { kind: SegmentKind::Mermaid, content: body.to_string(), is_complete: true });
                rest = &after_fence[end.end()..];
            }
            None => {
                segments.push(Segment {
                    kind: SegmentKind::Mermaid,
                    content: after_fence.to_string(),
                    is_complete: false,
                });
                rest = "";
            }
        }
    }

    segments
}

/// `true` if `source` contains at least one `` ```mermaid `` fence,
/// closed or not.
pub fn has_mermaid_blocks(source: &str) -> bool {
    split_markdown_content(source).iter().any(|s| s.kind == SegmentKind::Mermaid)
}

/// Every mermaid fence's body, in document order, fence markers stripped.
pub fn extract_mermaid_source(source: &str) -> Vec<String> {
    split_markdown_content(source)
        .into_iter()
        .filter(|s| s.kind == SegmentKind::Mermaid)
        .map(|s| s.content)
        .collect()
}
