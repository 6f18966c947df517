// src/core/highlight.rs
use crate::config::EngineSettings;
use crate::core::pair_index::PairIndex;
use crate::core::synonyms::SynonymGraph;
use crate::core::types::{Pair, ProjectState, TextSide};

/// Render directive for one character cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStyle {
    pub background: Option<String>,
    /// Set where an exact match lies under a cosine correspondence's color.
    pub border: bool,
    pub tooltip: Option<String>,
    /// Synonym word decoration, drawn beneath the pair highlight.
    pub underline: Option<String>,
}

/// Styles for every character of both texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderFrame {
    pub a: Vec<CellStyle>,
    pub b: Vec<CellStyle>,
}

impl RenderFrame {
    fn blank(len_a: usize, len_b: usize) -> Self {
        Self {
            a: vec![CellStyle::default(); len_a],
            b: vec![CellStyle::default(); len_b],
        }
    }

    pub fn cells(&self, side: TextSide) -> &[CellStyle] {
        match side {
            TextSide::A => &self.a,
            TextSide::B => &self.b,
        }
    }

    fn cells_mut(&mut self, side: TextSide) -> &mut [CellStyle] {
        match side {
            TextSide::A => &mut self.a,
            TextSide::B => &mut self.b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Hover {
    side: TextSide,
    index: usize,
    color: Option<String>,
}

/// Derives cell styles from the pairs, their hold flags, the pointer and the
/// synonym graph. Holds no pair state of its own.
#[derive(Debug, Clone)]
pub struct HighlightEngine {
    match_color: String,
    palette: Vec<String>,
    hover_color: Option<String>,
    underline_color: String,
    hover: Option<Hover>,
}

impl HighlightEngine {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            match_color: settings.match_color.clone(),
            palette: settings.palette.clone(),
            hover_color: settings.hover_color.clone(),
            underline_color: settings.underline_color.clone(),
            hover: None,
        }
    }

    /// Pointer entered character `index` of `side`. `color` overrides the
    /// emphasis color of a non-exact pair revealed by this hover.
    pub fn pointer_over(&mut self, side: TextSide, index: usize, color: Option<String>) {
        self.hover = Some(Hover { side, index, color });
    }

    pub fn pointer_leave(&mut self) {
        self.hover = None;
    }

    pub fn hovered(&self) -> Option<(TextSide, usize)> {
        self.hover.as_ref().map(|hover| (hover.side, hover.index))
    }

    /// Flips `hold` on the pair governing `index`. Returns its position.
    pub fn toggle_hold(pairs: &mut [Pair], side: TextSide, index: usize) -> Option<usize> {
        let position = PairIndex::new(pairs).position(index, side)?;
        let pair = &mut pairs[position];
        pair.hold = !pair.hold;
        Some(position)
    }

    pub fn render(&self, project: &ProjectState) -> RenderFrame {
        let len_a = project.text_len(TextSide::A);
        let len_b = project.text_len(TextSide::B);
        let mut frame = RenderFrame::blank(len_a, len_b);

        self.underline_synonyms(&mut frame, &project.config.synonyms);

        let exact = ExactCoverage {
            a: exact_coverage(&project.pairs, TextSide::A, len_a),
            b: exact_coverage(&project.pairs, TextSide::B, len_b),
        };

        for (position, pair) in project.pairs.iter().enumerate() {
            if pair.hold {
                let color = self.pair_color(pair, position, None);
                paint(&mut frame, pair, color, &exact);
            }
        }

        if let Some(hover) = &self.hover {
            let index = PairIndex::new(&project.pairs);
            if let Some(position) = index.position(hover.index, hover.side) {
                let pair = &project.pairs[position];
                if !pair.hold {
                    let emphasis = hover.color.as_deref().or(self.hover_color.as_deref());
                    let color = self.pair_color(pair, position, emphasis);
                    paint(&mut frame, pair, color, &exact);
                }
            }
        }
        frame
    }

    /// Exact matches always take the match color. Other pairs take the
    /// override when one applies, else cycle the palette by position.
    pub fn pair_color<'s>(
        &'s self,
        pair: &Pair,
        position: usize,
        hover_override: Option<&'s str>,
    ) -> &'s str {
        if pair.is_exact_match {
            return &self.match_color;
        }
        if let Some(color) = hover_override {
            return color;
        }
        match self.palette.len() {
            0 => &self.match_color,
            len => &self.palette[position % len],
        }
    }

    fn underline_synonyms(&self, frame: &mut RenderFrame, synonyms: &SynonymGraph) {
        for side in [TextSide::A, TextSide::B] {
            let cells = frame.cells_mut(side);
            for entry in synonyms.entries(side) {
                let end = entry.word.end.min(cells.len());
                for cell in cells.iter_mut().take(end).skip(entry.word.start) {
                    cell.underline = Some(self.underline_color.clone());
                }
            }
        }
    }
}

/// Per-character flags: inside some exact-match pair.
struct ExactCoverage {
    a: Vec<bool>,
    b: Vec<bool>,
}

impl ExactCoverage {
    fn side(&self, side: TextSide) -> &[bool] {
        match side {
            TextSide::A => &self.a,
            TextSide::B => &self.b,
        }
    }
}

fn exact_coverage(pairs: &[Pair], side: TextSide, len: usize) -> Vec<bool> {
    let mut covered = vec![false; len];
    for pair in pairs.iter().filter(|pair| pair.is_exact_match) {
        let range = pair.side(side);
        let end = range.end.min(len);
        for flag in covered.iter_mut().take(end).skip(range.start) {
            *flag = true;
        }
    }
    covered
}

fn paint(frame: &mut RenderFrame, pair: &Pair, color: &str, exact: &ExactCoverage) {
    let tooltip = tooltip(pair);
    for side in [TextSide::A, TextSide::B] {
        let covered = exact.side(side);
        let range = pair.side(side);
        let cells = frame.cells_mut(side);
        let end = range.end.min(cells.len());
        for i in range.start..end {
            let cell = &mut cells[i];
            cell.background = Some(color.to_string());
            cell.tooltip = Some(tooltip.clone());
            cell.border = !pair.is_exact_match && covered[i];
        }
    }
}

/// e.g. `"Edit Ratio similarity: 0.9500"`.
pub fn tooltip(pair: &Pair) -> String {
    format!(
        "{} similarity: {}",
        pair.similarity_class(),
        format_significant(pair.similarity, 4)
    )
}

/// Formats `value` with `digits` significant digits.
pub fn format_significant(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    if value == 0.0 || !value.is_finite() {
        return format!("{:.*}", digits - 1, value);
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
    let formatted = format!("{:.*}", decimals, value);
    // Rounding can carry into a new leading digit: 0.99996 -> "1.0000".
    let rounded: f64 = formatted.parse().unwrap_or(value);
    if decimals > 0 && rounded != 0.0 && (rounded.abs().log10().floor() as i32) > magnitude {
        return format!("{:.*}", decimals - 1, value);
    }
    formatted
}
