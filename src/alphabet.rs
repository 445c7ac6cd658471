//! Glyph tables for the two renderers (graph and sequence), each with a
//! Unicode and an ASCII variant, plus the junction-merge lookup used when
//! two box-drawing runs cross.
//!
//! Grounded on the teacher crate's inline `(h_line, v_line, tl, tr, bl,
//! br)` tuples repeated at every draw call site in `ascii/draw.rs` and
//! `ascii/sequence.rs`, and its free-standing `merge_junctions` table in
//! `ascii/canvas.rs`, generalized into one alphabet struct per diagram
//! family so a draw routine takes "the alphabet" instead of six loose
//! chars.

/// Glyph table for the flowchart/graph renderer.
#[derive(Debug, Clone, Copy)]
pub struct GraphAlphabet {
    pub h_line: char,
    pub v_line: char,
    pub corner_tl: char,
    pub corner_tr: char,
    pub corner_bl: char,
    pub corner_br: char,
    pub tee_up: char,
    pub tee_down: char,
    pub tee_left: char,
    pub tee_right: char,
    pub cross: char,
    pub diag_back: char, // UpperLeft <-> LowerRight stroke: ╲
    pub diag_fwd: char,  // UpperRight <-> LowerLeft stroke: ╱
    pub arrow_up: char,
    pub arrow_down: char,
    pub arrow_left: char,
    pub arrow_right: char,
    pub arrow_upper_left: char,
    pub arrow_upper_right: char,
    pub arrow_lower_left: char,
    pub arrow_lower_right: char,
    pub arrow_middle: char,
}

pub const GRAPH_UNICODE: GraphAlphabet = GraphAlphabet {
    h_line: '─',
    v_line: '│',
    corner_tl: '┌',
    corner_tr: '┐',
    corner_bl: '└',
    corner_br: '┘',
    tee_up: '┴',
    tee_down: '┬',
    tee_left: '┤',
    tee_right: '├',
    cross: '┼',
    diag_back: '╲',
    diag_fwd: '╱',
    arrow_up: '▲',
    arrow_down: '▼',
    arrow_left: '◄',
    arrow_right: '►',
    arrow_upper_left: '◤',
    arrow_upper_right: '◥',
    arrow_lower_left: '◣',
    arrow_lower_right: '◢',
    arrow_middle: '●',
};

pub const GRAPH_ASCII: GraphAlphabet = GraphAlphabet {
    h_line: '-',
    v_line: '|',
    corner_tl: '+',
    corner_tr: '+',
    corner_bl: '+',
    corner_br: '+',
    tee_up: '+',
    tee_down: '+',
    tee_left: '+',
    tee_right: '+',
    cross: '+',
    diag_back: '\\',
    diag_fwd: '/',
    arrow_up: '^',
    arrow_down: 'v',
    arrow_left: '<',
    arrow_right: '>',
    arrow_upper_left: '*',
    arrow_upper_right: '*',
    arrow_lower_left: '*',
    arrow_lower_right: '*',
    arrow_middle: '*',
};

impl GraphAlphabet {
    pub fn for_config(ascii: bool) -> &'static GraphAlphabet {
        if ascii { &GRAPH_ASCII } else { &GRAPH_UNICODE }
    }

    /// Select a corner glyph purely from the turn direction (the
    /// direction of travel before and after the bend). Any pairing that
    /// isn't one of the eight valid 90-degree turns falls back to the
    /// cross glyph — the ASCII alphabet folds every one of these to `+`
    /// by construction since all its corner/tee/cross fields are `+`.
    pub fn corner_glyph(&self, prev_dir: crate::geom::Direction, next_dir: crate::geom::Direction) -> char {
        use crate::geom::Direction::*;
        match (prev_dir, next_dir) {
            (Up, Right) => self.corner_tl,
            (Up, Left) => self.corner_tr,
            (Down, Right) => self.corner_bl,
            (Down, Left) => self.corner_br,
            (Right, Down) => self.corner_tr,
            (Right, Up) => self.corner_br,
            (Left, Down) => self.corner_tl,
            (Left, Up) => self.corner_bl,
            _ => self.cross,
        }
    }

    /// Arrowhead glyph for a path's final direction of travel. Uses
    /// `travel_dir` unless it is `Middle`, in which case it falls back to
    /// `end_dir` (the edge's anchored end direction).
    pub fn arrow_glyph(&self, travel_dir: crate::geom::Direction, end_dir: crate::geom::Direction) -> char {
        use crate::geom::Direction::*;
        let dir = if travel_dir == Middle { end_dir } else { travel_dir };
        match dir {
            Up => self.arrow_up,
            Down => self.arrow_down,
            Left => self.arrow_left,
            Right => self.arrow_right,
            UpperLeft => self.arrow_upper_left,
            UpperRight => self.arrow_upper_right,
            LowerLeft => self.arrow_lower_left,
            LowerRight => self.arrow_lower_right,
            Middle => self.arrow_middle,
        }
    }

    /// The tee glyph that fuses a path's start cell back into the source
    /// node's border, keyed on the direction the path leaves in.
    pub fn box_start_glyph(&self, dir: crate::geom::Direction) -> Option<char> {
        use crate::geom::Direction::*;
        match dir {
            Up => Some(self.tee_up),
            Down => Some(self.tee_down),
            Left => Some(self.tee_left),
            Right => Some(self.tee_right),
            _ => None,
        }
    }
}

/// `true` for Unicode box-drawing glyphs that participate in junction
/// merging. Disjoint from the ASCII alphabet by construction: ASCII mode
/// never merges (ascii/canvas.rs's own contract — ASCII lines overwrite).
pub fn is_junction(c: char) -> bool {
    matches!(c, '─' | '│' | '┌' | '┐' | '└' | '┘' | '├' | '┤' | '┬' | '┴' | '┼')
}

/// Merge two junction glyphs into the smallest covering junction.
///
/// Commutative for mirrored pairs, idempotent (`merge(c, c) == c`), and
/// total: pairs that aren't enumerated below default to keeping `dest`
/// (the first argument) — the "keep the first" default a 2-level lookup
/// table falls back to when a pair hasn't been enumerated.
pub fn merge(dest: char, src: char) -> char {
    use '─' as H;
    use '│' as V;
    match (dest, src) {
        (a, b) if a == b => a,

        (H, V) | (V, H) => '┼',
        (H, '┌') | ('┌', H) => '┬',
        (H, '┐') | ('┐', H) => '┬',
        (H, '└') | ('└', H) => '┴',
        (H, '┘') | ('┘', H) => '┴',
        (H, '├') | ('├', H) => '┼',
        (H, '┤') | ('┤', H) => '┼',
        (H, '┬') | ('┬', H) => '┬',
        (H, '┴') | ('┴', H) => '┴',
        (H, '┼') | ('┼', H) => '┼',

        (V, '┌') | ('┌', V) => '├',
        (V, '┐') | ('┐', V) => '┤',
        (V, '└') | ('└', V) => '├',
        (V, '┘') | ('┘', V) => '┤',
        (V, '┬') | ('┬', V) => '┼',
        (V, '┴') | ('┴', V) => '┼',
        (V, '├') | ('├', V) => '├',
        (V, '┤') | ('┤', V) => '┤',
        (V, '┼') | ('┼', V) => '┼',

        ('┌', '┘') | ('┘', '┌') => '┼',
        ('┐', '└') | ('└', '┐') => '┼',
        ('┌', '└') | ('└', '┌') => '├',
        ('┐', '┘') | ('┘', '┐') => '┤',
        ('┌', '┐') | ('┐', '┌') => '┬',
        ('└', '┘') | ('┘', '└') => '┴',

        ('┬', '┴') | ('┴', '┬') => '┼',
        ('├', '┤') | ('┤', '├') => '┼',
        ('├', '┐') | ('┐', '├') => '┼',
        ('├', '┘') | ('┘', '├') => '┼',
        ('┤', '┌') | ('┌', '┤') => '┼',
        ('┤', '└') | ('└', '┤') => '┼',
        ('┬', '└') | ('└', '┬') => '┼',
        ('┬', '┘') | ('┘', '┬') => '┼',
        ('┴', '┌') | ('┌', '┴') => '┼',
        ('┴', '┐') | ('┐', '┴') => '┼',

        (a, _) => a,
    }
}

/// Glyph table for the sequence-diagram renderer.
#[derive(Debug, Clone, Copy)]
pub struct SequenceAlphabet {
    pub h_line: char,
    pub h_dotted: char,
    pub v_line: char,
    pub corner_tl: char,
    pub corner_tr: char,
    pub corner_bl: char,
    pub corner_br: char,
    pub tee_down: char,
    /// Junction where a message line leaves a lifeline heading right (`├`).
    pub tee_right: char,
    /// Junction where a message line leaves a lifeline heading left (`┤`).
    pub tee_left: char,
    pub arrow_left: char,
    pub arrow_right: char,
    /// Self-message loop: top-right turn (exits right, turns down).
    pub self_corner_down: char,
    /// Self-message loop: bottom-right turn (turns back left).
    pub self_corner_left: char,
}

pub const SEQUENCE_UNICODE: SequenceAlphabet = SequenceAlphabet {
    h_line: '─',
    h_dotted: '╌',
    v_line: '│',
    corner_tl: '┌',
    corner_tr: '┐',
    corner_bl: '└',
    corner_br: '┘',
    tee_down: '┴',
    tee_right: '├',
    tee_left: '┤',
    arrow_left: '◄',
    arrow_right: '►',
    self_corner_down: '┐',
    self_corner_left: '┘',
};

pub const SEQUENCE_ASCII: SequenceAlphabet = SequenceAlphabet {
    h_line: '-',
    h_dotted: '.',
    v_line: '|',
    corner_tl: '+',
    corner_tr: '+',
    corner_bl: '+',
    corner_br: '+',
    tee_down: '+',
    tee_right: '+',
    tee_left: '+',
    arrow_left: '<',
    arrow_right: '>',
    self_corner_down: '+',
    self_corner_left: '+',
};

impl SequenceAlphabet {
    pub fn for_config(ascii: bool) -> &'static SequenceAlphabet {
        if ascii { &SEQUENCE_ASCII } else { &SEQUENCE_UNICODE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_idempotent() {
        for c in ['─', '│', '┌', '┐', '└', '┘', '├', '┤', '┬', '┴', '┼'] {
            assert_eq!(merge(c, c), c);
        }
    }

    #[test]
    fn merge_is_commutative_for_enumerated_pairs() {
        let glyphs = ['─', '│', '┌', '┐', '└', '┘', '├', '┤', '┬', '┴', '┼'];
        for &a in &glyphs {
            for &b in &glyphs {
                // Either both directions are enumerated (and agree) or
                // both fall through to the same "keep dest" default,
                // which is necessarily asymmetric for a != b — so we
                // only assert agreement when the result is not simply
                // `a` or `b` verbatim (i.e. a "real" merge happened).
                let ab = merge(a, b);
                let ba = merge(b, a);
                if ab != a && ab != b {
                    assert_eq!(ab, ba, "merge({a:?},{b:?}) should equal merge({b:?},{a:?})");
                }
            }
        }
    }

    #[test]
    fn cross_junction() {
        assert_eq!(merge('─', '│'), '┼');
        assert_eq!(merge('│', '─'), '┼');
    }

    #[test]
    fn ascii_alphabet_collapses_all_junctions_to_plus() {
        let a = GRAPH_ASCII;
        assert_eq!(a.corner_tl, '+');
        assert_eq!(a.cross, '+');
        assert_eq!(a.tee_up, '+');
    }
}
