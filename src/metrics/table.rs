use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Per-character layout corrections, in pixels at the reference character size.
pub struct GlyphMetric {
    /// Vertical shift applied to the glyph (negative moves it up).
    pub vertical_offset: i32,
    /// Horizontal correction applied before the glyph.
    pub left_spacing: i32,
    /// Horizontal correction applied after the glyph.
    pub right_spacing: i32,
    /// Relative visual width of the glyph.
    pub width_ratio: f64,
}

impl GlyphMetric {
    /// Metric used for characters without a table entry.
    pub const DEFAULT: Self = Self {
        vertical_offset: 0,
        left_spacing: 0,
        right_spacing: 0,
        width_ratio: 1.0,
    };
}

impl Default for GlyphMetric {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Source of per-character metrics consumed by the layout engine.
///
/// Lookups never fail: characters without an entry resolve to [`GlyphMetric::DEFAULT`].
pub trait GlyphMetrics {
    /// Metric for `ch`.
    fn lookup(&self, ch: char) -> GlyphMetric;
}

impl<M: GlyphMetrics + ?Sized> GlyphMetrics for &M {
    fn lookup(&self, ch: char) -> GlyphMetric {
        (**self).lookup(ch)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Literal metric table keyed by character.
pub struct GlyphMetricsTable {
    entries: HashMap<char, GlyphMetric>,
}

// (vertical offset, left spacing, right spacing)
const UPPER: [(char, i32, i32, i32); 26] = [
    ('A', -50, -4, -4),
    ('B', -50, -4, -4),
    ('C', -50, -4, -4),
    ('D', -50, -4, -4),
    ('E', -50, -4, -4),
    ('F', -50, -4, -4),
    ('G', -50, -4, -4),
    ('H', -50, -4, -4),
    ('I', -50, -4, -4),
    ('J', -50, -4, -4),
    ('K', -50, -4, -4),
    ('L', -50, -4, -4),
    ('M', -50, 4, 4),
    ('N', -50, -4, -4),
    ('O', -50, -4, -4),
    ('P', -50, -4, -4),
    ('Q', -50, -4, -4),
    ('R', -50, -4, -4),
    ('S', -50, -4, -4),
    ('T', -50, -4, -4),
    ('U', -50, -4, -4),
    ('V', -50, -4, -4),
    ('W', -50, -4, -4),
    ('X', -50, -4, -4),
    ('Y', -50, -4, -4),
    ('Z', -50, -4, -4),
];

const LOWER: [(char, i32, i32, i32); 26] = [
    ('a', 0, 0, 0),
    ('b', 0, 0, 0),
    ('c', 0, 0, 0),
    ('d', -10, 0, 0),
    ('e', 0, 0, 0),
    ('f', -10, 0, 0),
    ('g', 10, 0, 0),
    ('h', 0, 0, 0),
    ('i', -10, -10, -10),
    ('j', -8, -10, -10),
    ('k', -10, 0, 0),
    ('l', -8, -10, -10),
    ('m', 0, 4, 4),
    ('n', 0, 0, 0),
    ('o', 0, 0, 0),
    ('p', 10, 0, 0),
    ('q', 10, 0, 0),
    ('r', 0, 0, 0),
    ('s', 0, 0, 0),
    ('t', -8, -10, -10),
    ('u', 0, 0, 0),
    ('v', -8, 0, 0),
    ('w', -8, 16, 10),
    ('x', 0, 0, 0),
    ('y', 15, 0, 0),
    ('z', 10, 0, 0),
];

const WIDE: [char; 4] = ['m', 'w', 'M', 'W'];
const WIDE_RATIO: f64 = 1.2;

impl GlyphMetricsTable {
    /// The hand-tuned table shipped with the glyph library.
    pub fn builtin() -> Self {
        let mut entries = HashMap::with_capacity(UPPER.len() + LOWER.len() + 11);
        for (ch, vertical_offset, left_spacing, right_spacing) in UPPER.into_iter().chain(LOWER) {
            entries.insert(
                ch,
                GlyphMetric {
                    vertical_offset,
                    left_spacing,
                    right_spacing,
                    width_ratio: 1.0,
                },
            );
        }
        for ch in ('0'..='9').chain([' ']) {
            entries.insert(ch, GlyphMetric::DEFAULT);
        }
        for ch in WIDE {
            if let Some(m) = entries.get_mut(&ch) {
                m.width_ratio = WIDE_RATIO;
            }
        }
        Self { entries }
    }

    /// A table with no per-glyph corrections: every character uses the default metric.
    pub fn flat() -> Self {
        Self::default()
    }

    /// Replace or add the entry for `ch`.
    pub fn set(&mut self, ch: char, metric: GlyphMetric) {
        self.entries.insert(ch, metric);
    }

    /// Number of explicit entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no character has an explicit entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GlyphMetrics for GlyphMetricsTable {
    fn lookup(&self, ch: char) -> GlyphMetric {
        self.entries.get(&ch).copied().unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metrics/table.rs"]
mod tests;
