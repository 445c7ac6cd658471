//! The 2D mutable character canvas shared by both renderers.
//!
//! Grounded directly on the teacher crate's `ascii/canvas.rs`
//! (`mk_canvas`, `increase_size`, `set_char`, `get_char`,
//! `merge_canvases`, `canvas_to_string`, `draw_text`) and `ascii/draw.rs`
//! (`draw_box`, `draw_line`), generalized to take an [`Alphabet`] instead
//! of inlining a glyph tuple at every call site.

use crate::alphabet::{self, GraphAlphabet};
use crate::geom::{determine_direction_drawing, Direction, DrawingCoord};

/// Column-major character grid: `canvas[x][y]`.
#[derive(Debug, Clone)]
pub struct Canvas {
    cells: Vec<Vec<char>>,
}

impl Canvas {
    /// A blank `(w+1) x (h+1)` canvas — inclusive indexing, since the
    /// layout and router both address cells by an inclusive maximum
    /// coordinate rather than an exclusive width/height.
    pub fn create(w: usize, h: usize) -> Self {
        let mut cells = Vec::with_capacity(w + 1);
        for _ in 0..=w {
            cells.push(vec![' '; h + 1]);
        }
        Canvas { cells }
    }

    /// `(max_x, max_y)`, i.e. one less than the allocated width/height.
    pub fn size(&self) -> (usize, usize) {
        if self.cells.is_empty() {
            (0, 0)
        } else {
            (self.cells.len() - 1, self.cells[0].len().saturating_sub(1))
        }
    }

    /// A blank canvas of identical size, for building an overlay that
    /// will be merged back at a known z-order.
    pub fn copy_shape(&self) -> Canvas {
        let (w, h) = self.size();
        Canvas::create(w, h)
    }

    /// Grow in place to cover at least `(x, y)`, preserving existing cells.
    pub fn extend(&mut self, x: usize, y: usize) {
        let (cur_w, cur_h) = self.size();
        let target_w = x.max(cur_w);
        let target_h = y.max(cur_h);
        for col in self.cells.iter_mut() {
            col.resize(target_h + 1, ' ');
        }
        while self.cells.len() <= target_w {
            self.cells.push(vec![' '; target_h + 1]);
        }
    }

    pub fn get(&self, x: i32, y: i32) -> char {
        if x < 0 || y < 0 {
            return ' ';
        }
        let (x, y) = (x as usize, y as usize);
        self.cells.get(x).and_then(|col| col.get(y)).copied().unwrap_or(' ')
    }

    pub fn set(&mut self, x: i32, y: i32, c: char) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        self.extend(x, y);
        self.cells[x][y] = c;
    }

    /// Write `s` starting at `start`, advancing +x one cell per character.
    pub fn draw_text(&mut self, start: DrawingCoord, s: &str) {
        for (i, c) in s.chars().enumerate() {
            self.set(start.x + i as i32, start.y, c);
        }
    }

    /// Emit rows top-to-bottom, columns left-to-right, joined by `\n`.
    /// Trailing all-space rows are dropped; no trailing newline.
    pub fn to_string_trimmed(&self) -> String {
        let (max_x, max_y) = self.size();
        let mut lines = Vec::with_capacity(max_y + 1);
        for y in 0..=max_y {
            let mut line = String::with_capacity(max_x + 1);
            for x in 0..=max_x {
                line.push(self.get(x as i32, y as i32));
            }
            lines.push(line);
        }
        while matches!(lines.last(), Some(l) if l.chars().all(|c| c == ' ')) {
            lines.pop();
        }
        lines.join("\n")
    }

    /// Merge `overlays` onto `self` at `offset`, in argument order. A
    /// non-space overlay cell overwrites the destination unless both the
    /// destination and the overlay cell are Unicode junction glyphs and
    /// `use_ascii` is false, in which case they fuse via
    /// [`alphabet::merge`]. Space cells never write. Returns a new,
    /// appropriately-sized canvas; `self` is left untouched.
    pub fn merge(&self, offset: DrawingCoord, overlays: &[&Canvas], use_ascii: bool) -> Canvas {
        let (mut max_x, mut max_y) = self.size();
        for overlay in overlays {
            let (ow, oh) = overlay.size();
            if offset.x >= 0 {
                max_x = max_x.max(ow + offset.x as usize);
            }
            if offset.y >= 0 {
                max_y = max_y.max(oh + offset.y as usize);
            }
        }

        let mut merged = Canvas::create(max_x, max_y);
        for x in 0..=max_x {
            for y in 0..=max_y {
                merged.cells[x][y] = self.get(x as i32, y as i32);
            }
        }

        for overlay in overlays {
            let (ow, oh) = overlay.size();
            for ox in 0..=ow {
                for oy in 0..=oh {
                    let c = overlay.cells[ox][oy];
                    if c == ' ' {
                        continue;
                    }
                    let mx = ox as i32 + offset.x;
                    let my = oy as i32 + offset.y;
                    if mx < 0 || my < 0 {
                        continue;
                    }
                    let (mx, my) = (mx as usize, my as usize);
                    merged.extend(mx, my);
                    let dest = merged.cells[mx][my];
                    merged.cells[mx][my] = if !use_ascii && alphabet::is_junction(dest) && alphabet::is_junction(c) {
                        alphabet::merge(dest, c)
                    } else {
                        c
                    };
                }
            }
        }
        merged
    }
}

/// Draw a `w x h` bordered box with `text` centred on row `floor(h/2)`,
/// starting at column `floor(w/2) - ceil(|text|/2) + 1`.
pub fn draw_box(w: usize, h: usize, text: &str, alphabet: &GraphAlphabet) -> Canvas {
    let mut canvas = Canvas::create(w, h);
    let (w, h) = (w as i32, h as i32);

    for x in 1..w {
        canvas.set(x, 0, alphabet.h_line);
        canvas.set(x, h, alphabet.h_line);
    }
    for y in 1..h {
        canvas.set(0, y, alphabet.v_line);
        canvas.set(w, y, alphabet.v_line);
    }
    canvas.set(0, 0, alphabet.corner_tl);
    canvas.set(w, 0, alphabet.corner_tr);
    canvas.set(0, h, alphabet.corner_bl);
    canvas.set(w, h, alphabet.corner_br);

    let text_y = h / 2;
    let label_half = (text.chars().count() as i32 + 1) / 2; // ceil division
    let text_x = w / 2 - label_half + 1;
    canvas.draw_text(DrawingCoord::new(text_x, text_y), text);

    canvas
}

/// Draw a line along one of the eight compass directions between `from`
/// and `to`, inset by `offset_from`/`offset_to` cells at each end.
/// Returns the cells written, in traversal order, for arrow-head
/// placement by the caller.
pub fn draw_line(
    canvas: &mut Canvas,
    from: DrawingCoord,
    to: DrawingCoord,
    offset_from: i32,
    offset_to: i32,
    alphabet: &GraphAlphabet,
) -> Vec<DrawingCoord> {
    let dir = determine_direction_drawing(from, to);
    let mut written = Vec::new();

    match dir {
        Direction::Up => {
            for y in ((to.y - offset_to)..=(from.y - offset_from)).rev() {
                written.push(DrawingCoord::new(from.x, y));
                canvas.set(from.x, y, alphabet.v_line);
            }
        }
        Direction::Down => {
            for y in (from.y + offset_from)..=(to.y + offset_to) {
                written.push(DrawingCoord::new(from.x, y));
                canvas.set(from.x, y, alphabet.v_line);
            }
        }
        Direction::Left => {
            for x in ((to.x - offset_to)..=(from.x - offset_from)).rev() {
                written.push(DrawingCoord::new(x, from.y));
                canvas.set(x, from.y, alphabet.h_line);
            }
        }
        Direction::Right => {
            for x in (from.x + offset_from)..=(to.x + offset_to) {
                written.push(DrawingCoord::new(x, from.y));
                canvas.set(x, from.y, alphabet.h_line);
            }
        }
        Direction::UpperLeft => {
            let (mut x, mut y) = (from.x, from.y - offset_from);
            while x >= to.x - offset_to && y >= to.y - offset_to {
                written.push(DrawingCoord::new(x, y));
                canvas.set(x, y, alphabet.diag_back);
                x -= 1;
                y -= 1;
            }
        }
        Direction::UpperRight => {
            let (mut x, mut y) = (from.x, from.y - offset_from);
            while x <= to.x + offset_to && y >= to.y - offset_to {
                written.push(DrawingCoord::new(x, y));
                canvas.set(x, y, alphabet.diag_fwd);
                x += 1;
                y -= 1;
            }
        }
        Direction::LowerLeft => {
            let (mut x, mut y) = (from.x, from.y + offset_from);
            while x >= to.x - offset_to && y <= to.y + offset_to {
                written.push(DrawingCoord::new(x, y));
                canvas.set(x, y, alphabet.diag_fwd);
                x -= 1;
                y += 1;
            }
        }
        Direction::LowerRight => {
            let (mut x, mut y) = (from.x, from.y + offset_from);
            while x <= to.x + offset_to && y <= to.y + offset_to {
                written.push(DrawingCoord::new(x, y));
                canvas.set(x, y, alphabet.diag_back);
                x += 1;
                y += 1;
            }
        }
        Direction::Middle => {}
    }

    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::GRAPH_UNICODE;

    #[test]
    fn create_is_inclusive() {
        let c = Canvas::create(3, 2);
        assert_eq!(c.size(), (3, 2));
    }

    #[test]
    fn set_get_roundtrip() {
        let mut c = Canvas::create(2, 2);
        c.set(1, 1, 'x');
        assert_eq!(c.get(1, 1), 'x');
        assert_eq!(c.get(0, 0), ' ');
    }

    #[test]
    fn negative_coords_are_noops() {
        let mut c = Canvas::create(2, 2);
        c.set(-1, -1, 'x');
        assert_eq!(c.get(-1, -1), ' ');
    }

    #[test]
    fn merge_overwrites_non_space_and_respects_space() {
        let base = Canvas::create(2, 2);
        let mut overlay = base.copy_shape();
        overlay.set(1, 1, 'x');
        let merged = base.merge(DrawingCoord::new(0, 0), &[&overlay], true);
        assert_eq!(merged.get(1, 1), 'x');
        assert_eq!(merged.get(0, 0), ' ');
    }

    #[test]
    fn merge_fuses_junctions_in_unicode_mode() {
        let mut base = Canvas::create(2, 2);
        base.set(1, 1, '─');
        let mut overlay = base.copy_shape();
        overlay.set(1, 1, '│');
        let merged = base.merge(DrawingCoord::new(0, 0), &[&overlay], false);
        assert_eq!(merged.get(1, 1), '┼');
    }

    #[test]
    fn merge_overwrites_junctions_in_ascii_mode() {
        let mut base = Canvas::create(2, 2);
        base.set(1, 1, '-');
        let mut overlay = base.copy_shape();
        overlay.set(1, 1, '|');
        let merged = base.merge(DrawingCoord::new(0, 0), &[&overlay], true);
        assert_eq!(merged.get(1, 1), '|');
    }

    #[test]
    fn draw_box_centers_label() {
        let b = draw_box(6, 2, "Go", &GRAPH_UNICODE);
        assert_eq!(b.get(0, 0), '┌');
        assert_eq!(b.get(6, 0), '┐');
        assert_eq!(b.get(0, 2), '└');
        assert_eq!(b.get(6, 2), '┘');
        // label centred on row 1
        let row: String = (0..=6).map(|x| b.get(x, 1)).collect();
        assert!(row.contains("Go"));
    }

    #[test]
    fn to_string_trims_trailing_blank_rows() {
        let mut c = Canvas::create(2, 3);
        c.set(0, 0, 'a');
        let s = c.to_string_trimmed();
        assert_eq!(s.lines().count(), 1);
    }
}
