//! Sequence-diagram parser: `participant`, `autonumber`, and `->>`/`-->>`
//! messages.
//!
//! Grounded on the teacher's original `parser/sequence.rs`
//! (`parse_sequence_diagram`, its actor/message regexes, `ensure_actor`),
//! narrowed to the two arrow styles and the participant-only actor kind
//! this renderer's sequence engine models; notes, activation markers, and
//! loop/alt/par/critical/break/rect blocks have no counterpart here.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::RenderError;
use crate::model::{ArrowStyle, SequenceDiagram};

lazy_static! {
    static ref RE_PARTICIPANT: Regex =
        Regex::new(r#"^participant\s+(?:"([^"]+)"|(\S+))(?:\s+as\s+(.+))?$"#).unwrap();
    static ref RE_MESSAGE: Regex =
        Regex::new(r#"^(?:"([^"]+)"|(\S+))\s*(-->>|->>)\s*(?:"([^"]+)"|(\S+))\s*:\s*(.+)$"#).unwrap();
}

pub fn parse(lines: &[String]) -> Result<SequenceDiagram, RenderError> {
    if !lines[0].eq_ignore_ascii_case("sequenceDiagram") {
        return Err(RenderError::MissingSequenceKeyword);
    }

    let mut diagram = SequenceDiagram::new();

    for line in &lines[1..] {
        let line = line.as_str();

        if line.eq_ignore_ascii_case("autonumber") {
            diagram.autonumber = true;
            continue;
        }

        if let Some(caps) = RE_PARTICIPANT.captures(line) {
            let id = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()).unwrap_or_default();
            let label = caps.get(3).map(|m| m.as_str().trim()).unwrap_or(id);
            let idx = diagram.ensure_participant(id);
            diagram.participants[idx].label = label.to_string();
            continue;
        }

        if let Some(caps) = RE_MESSAGE.captures(line) {
            let from = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()).unwrap_or_default();
            let arrow = if &caps[3] == "-->>" { ArrowStyle::Dotted } else { ArrowStyle::Solid };
            let to = caps.get(4).or_else(|| caps.get(5)).map(|m| m.as_str()).unwrap_or_default();
            let label = caps[6].trim().to_string();

            diagram.ensure_participant(from);
            diagram.ensure_participant(to);

            let number = if diagram.autonumber {
                diagram.messages.iter().filter(|m| m.number > 0).count() as u32 + 1
            } else {
                0
            };

            diagram.messages.push(crate::model::Message {
                from: from.to_string(),
                to: to.to_string(),
                label,
                arrow,
                number,
            });
            continue;
        }
        // Unknown lines in the sequence subset are silently ignored.
    }

    if diagram.participants.is_empty() {
        return Err(RenderError::NoParticipants);
    }

    Ok(diagram)
}
