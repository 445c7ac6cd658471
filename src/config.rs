//! Configuration accepted by [`crate::render`].

/// Options controlling how a diagram is rendered.
///
/// Mirrors the teacher crate's `AsciiRenderOptions`: a plain `Clone`
/// struct meant to be partially overridden with `..Default::default()`
/// at call sites rather than built through a builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// `true` selects the pure-ASCII alphabet (`+`, `-`, `|`, `>`, ...).
    /// `false` (the default) selects Unicode box-drawing glyphs.
    pub ascii: bool,
    /// Horizontal spacing between nodes/columns. Must be >= 1. Default 5.
    pub padding_x: usize,
    /// Vertical spacing between nodes/rows. Must be >= 1. Default 5.
    pub padding_y: usize,
    /// Padding between a node's border and its label, on each side.
    /// Not part of the distilled spec's public knobs, but harmless to
    /// keep: it only affects node interior spacing. Default 1.
    pub box_border_padding: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ascii: false,
            padding_x: 5,
            padding_y: 5,
            box_border_padding: 1,
        }
    }
}

impl RenderConfig {
    /// Clamp user-supplied padding to the documented minimum of 1.
    pub(crate) fn normalized(mut self) -> Self {
        self.padding_x = self.padding_x.max(1);
        self.padding_y = self.padding_y.max(1);
        self
    }
}
