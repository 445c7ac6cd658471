//! Sequence-diagram engine: fixed-spacing participant layout and a
//! top-to-bottom row renderer.
//!
//! Grounded on the teacher's `ascii/sequence.rs` for overall shape — one
//! pass sizing participant boxes and centring their lifelines, one pass
//! computing each message's vertical offset, one draw pass emitting
//! header/lifeline/message rows with the shared alphabet — but the
//! teacher sizes inter-lifeline gaps dynamically to fit each message's
//! label, where this engine uses the fixed `boxWidth + 5` spacing and
//! `boxWidth = max(3, |label|+2)` rule; the two layouts diverge on
//! purpose.

use crate::alphabet::SequenceAlphabet;
use crate::canvas::Canvas;
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::geom::DrawingCoord;
use crate::model::{ArrowStyle, SequenceDiagram};
use crate::parser;

const SELF_LOOP_WIDTH: i32 = 4;
const PARTICIPANT_GAP: usize = 5;

struct Layout {
    box_width: Vec<usize>,
    centre: Vec<i32>,
    total_width: i32,
}

fn compute_layout(diagram: &SequenceDiagram) -> Layout {
    let box_width: Vec<usize> = diagram.participants.iter().map(|p| (p.label.chars().count() + 2).max(3)).collect();

    let mut centre = vec![0i32; diagram.participants.len()];
    let mut cursor: i32 = 0;
    for i in 0..diagram.participants.len() {
        if i > 0 {
            cursor += box_width[i - 1] as i32 + PARTICIPANT_GAP as i32;
        }
        centre[i] = cursor + box_width[i] as i32 / 2;
    }

    let last = diagram.participants.len().saturating_sub(1);
    let total_width = centre.get(last).copied().unwrap_or(0) + (box_width.get(last).copied().unwrap_or(0) as i32 + 2) / 2;

    Layout { box_width, centre, total_width }
}

/// Parse and rasterize `source` as a sequence diagram.
///
/// Calls `parser::sequence::parse` directly rather than going through
/// `parser::mod::parse`'s auto-dispatch, so a source whose first line
/// isn't `sequenceDiagram` fails with [`RenderError::MissingSequenceKeyword`]
/// instead of being silently accepted as a (possibly nonsensical) graph.
#[tracing::instrument(skip(source, config))]
pub fn render(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let config = config.normalized();
    let lines = parser::preprocess(source)?;
    let diagram = parser::sequence::parse(&lines)?;
    tracing::debug!(participants = diagram.participants.len(), messages = diagram.messages.len(), "parsed sequence diagram");
    let layout = compute_layout(&diagram);
    tracing::debug!(total_width = layout.total_width, "laid out participants");
    Ok(render_diagram_with_layout(&diagram, &layout, &config))
}

fn render_diagram_with_layout(diagram: &SequenceDiagram, layout: &Layout, config: &RenderConfig) -> String {
    let alphabet = SequenceAlphabet::for_config(config.ascii);

    // Rough upper bound on height: 3 header rows, 1 leading blank
    // lifeline row, up to 4 rows per message (spacer + 2 content rows,
    // self-messages take one extra), 1 trailing lifeline row.
    let height = 3 + 1 + diagram.messages.len() * 4 + 1;
    let width_for_self = diagram
        .messages
        .iter()
        .filter(|m| m.is_self_message())
        .filter_map(|m| diagram.participant_index(&m.from).map(|i| (i, m)))
        .map(|(i, m)| layout.centre[i] + 6 + label_text(diagram, m).chars().count() as i32)
        .max()
        .unwrap_or(0);
    let width = (layout.total_width.max(width_for_self) + 2).max(0) as usize;

    let mut canvas = Canvas::create(width, height);
    let mut y: i32 = 0;

    draw_header(&mut canvas, diagram, layout, alphabet);
    y += 3;

    draw_lifelines(&mut canvas, diagram, layout, y, alphabet);
    y += 1;

    for message in &diagram.messages {
        draw_lifelines(&mut canvas, diagram, layout, y, alphabet);
        y += 1;

        if message.is_self_message() {
            y = draw_self_message(&mut canvas, diagram, layout, message, y, alphabet);
        } else {
            y = draw_message(&mut canvas, diagram, layout, message, y, alphabet);
        }
    }

    draw_lifelines(&mut canvas, diagram, layout, y, alphabet);

    canvas.to_string_trimmed() + "\n"
}

fn label_text(diagram: &SequenceDiagram, message: &crate::model::Message) -> String {
    let _ = diagram;
    if message.number > 0 {
        format!("{}. {}", message.number, message.label)
    } else {
        message.label.clone()
    }
}

fn draw_header(canvas: &mut Canvas, diagram: &SequenceDiagram, layout: &Layout, alphabet: &SequenceAlphabet) {
    for (i, participant) in diagram.participants.iter().enumerate() {
        let w = layout.box_width[i] as i32;
        let centre = layout.centre[i];
        let left = centre - w / 2;
        let right = left + w - 1;

        canvas.set(left, 0, alphabet.corner_tl);
        canvas.set(right, 0, alphabet.corner_tr);
        for x in (left + 1)..right {
            canvas.set(x, 0, alphabet.h_line);
        }

        canvas.set(left, 1, alphabet.v_line);
        canvas.set(right, 1, alphabet.v_line);
        let label_x = centre - participant.label.chars().count() as i32 / 2;
        canvas.draw_text(DrawingCoord::new(label_x, 1), &participant.label);

        canvas.set(left, 2, alphabet.corner_bl);
        canvas.set(right, 2, alphabet.corner_br);
        for x in (left + 1)..right {
            canvas.set(x, 2, if x == centre { alphabet.tee_down } else { alphabet.h_line });
        }
    }
}

fn draw_lifelines(canvas: &mut Canvas, diagram: &SequenceDiagram, layout: &Layout, y: i32, alphabet: &SequenceAlphabet) {
    for i in 0..diagram.participants.len() {
        canvas.set(layout.centre[i], y, alphabet.v_line);
    }
}

fn draw_message(
    canvas: &mut Canvas,
    diagram: &SequenceDiagram,
    layout: &Layout,
    message: &crate::model::Message,
    y: i32,
    alphabet: &SequenceAlphabet,
) -> i32 {
    let from_idx = diagram.participant_index(&message.from).unwrap_or(0);
    let to_idx = diagram.participant_index(&message.to).unwrap_or(0);
    let (from_centre, to_centre) = (layout.centre[from_idx], layout.centre[to_idx]);

    // Label row.
    draw_lifelines(canvas, diagram, layout, y, alphabet);
    let text = label_text(diagram, message);
    let label_x = from_centre.min(to_centre) + 2;
    canvas.draw_text(DrawingCoord::new(label_x, y), &text);
    let arrow_y = y + 1;

    // Arrow row.
    draw_lifelines(canvas, diagram, layout, arrow_y, alphabet);
    let rightward = to_centre > from_centre;
    let fill = match message.arrow {
        ArrowStyle::Solid => alphabet.h_line,
        ArrowStyle::Dotted => alphabet.h_dotted,
    };
    canvas.set(from_centre, arrow_y, if rightward { alphabet.tee_right } else { alphabet.tee_left });

    if rightward {
        for x in (from_centre + 1)..(to_centre - 1) {
            canvas.set(x, arrow_y, fill);
        }
        canvas.set(to_centre - 1, arrow_y, alphabet.arrow_right);
    } else {
        for x in (to_centre + 2)..from_centre {
            canvas.set(x, arrow_y, fill);
        }
        canvas.set(to_centre + 1, arrow_y, alphabet.arrow_left);
    }
    canvas.set(to_centre, arrow_y, alphabet.v_line);

    arrow_y + 1
}

fn draw_self_message(
    canvas: &mut Canvas,
    diagram: &SequenceDiagram,
    layout: &Layout,
    message: &crate::model::Message,
    y: i32,
    alphabet: &SequenceAlphabet,
) -> i32 {
    let idx = diagram.participant_index(&message.from).unwrap_or(0);
    let centre = layout.centre[idx];
    let right = centre + SELF_LOOP_WIDTH;

    // Label row, to the right of the lifeline.
    draw_lifelines(canvas, diagram, layout, y, alphabet);
    let text = label_text(diagram, message);
    canvas.draw_text(DrawingCoord::new(centre + 6, y), &text);

    let top_y = y + 1;
    draw_lifelines(canvas, diagram, layout, top_y, alphabet);
    canvas.set(centre, top_y, alphabet.tee_right);
    for x in (centre + 1)..right {
        canvas.set(x, top_y, alphabet.h_line);
    }
    canvas.set(right, top_y, alphabet.self_corner_down);

    let mid_y = top_y + 1;
    draw_lifelines(canvas, diagram, layout, mid_y, alphabet);
    canvas.set(right, mid_y, alphabet.v_line);

    let bottom_y = mid_y + 1;
    draw_lifelines(canvas, diagram, layout, bottom_y, alphabet);
    canvas.set(centre + 1, bottom_y, alphabet.arrow_left);
    for x in (centre + 2)..right {
        canvas.set(x, bottom_y, alphabet.h_line);
    }
    canvas.set(right, bottom_y, alphabet.self_corner_left);

    bottom_y + 1
}

/// Convenience entry point mirroring [`crate::graph::render`]'s shape,
/// for callers that already know the source is a sequence diagram.
pub fn render_sequence_diagram(source: &str, config: &RenderConfig) -> Result<String, RenderError> {
    render(source, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_and_message() {
        let out = render("sequenceDiagram\nparticipant A\nparticipant B\nA->>B: hi", &RenderConfig::default()).unwrap();
        assert!(out.contains('A'));
        assert!(out.contains('B'));
        assert!(out.contains("hi"));
        assert!(out.contains('►'));
    }

    #[test]
    fn numbered_message_has_prefix() {
        let out = render(
            "sequenceDiagram\nparticipant A\nparticipant B\nautonumber\nA->>B: hi",
            &RenderConfig::default(),
        )
        .unwrap();
        assert!(out.contains("1. hi"));
    }

    #[test]
    fn self_message_loops_back() {
        let out = render("sequenceDiagram\nparticipant A\nA->>A: think", &RenderConfig::default()).unwrap();
        assert!(out.contains("think"));
        assert!(out.contains('◄'));
    }

    #[test]
    fn dotted_arrow_uses_dotted_fill() {
        let out = render("sequenceDiagram\nparticipant A\nparticipant B\nA-->>B: ping", &RenderConfig::default()).unwrap();
        assert!(out.contains('╌'));
    }

    #[test]
    fn ascii_mode_has_no_unicode_glyphs() {
        let config = RenderConfig { ascii: true, ..Default::default() };
        let out = render("sequenceDiagram\nparticipant A\nparticipant B\nA->>B: hi", &config).unwrap();
        assert!(out.chars().all(|c| c.is_ascii()));
    }

    #[test]
    fn rejects_source_missing_the_sequence_keyword() {
        let err = render("graph LR\nA --> B", &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, RenderError::MissingSequenceKeyword));
    }
}
