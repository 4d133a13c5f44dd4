//! Terminal bar chart for Z histograms.

// Counts and widths are small; f64 <-> usize conversions don't lose anything in practice
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::fmt;

use mesh_stats::Histogram;
use owo_colors::OwoColorize;

/// Total chart width in columns.
pub const CHART_WIDTH: usize = 60;

const TITLE: &str = "Histogram";
const BAR: &str = "█";

/// Colour of the lowest bucket.
const LOW: Rgb = Rgb(255, 0, 0);
/// Colour of the highest bucket.
const HIGH: Rgb = Rgb(0, 0, 255);

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear blend towards `other`; `t` is clamped to `0..=1`.
    #[must_use]
    pub fn blend(self, other: Self, t: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| {
            (f64::from(b) - f64::from(a))
                .mul_add(t, f64::from(a))
                .round() as u8
        };
        Self(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// One labelled bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Bucket lower edge, two decimals.
    pub label: String,
    /// Bar length in chart units: `log10(count)`, 0 for empty buckets.
    pub value: f64,
    /// Bar colour.
    pub color: Rgb,
}

/// Log-scaled bar chart of a histogram, highest bucket first.
#[derive(Debug, Clone)]
pub struct BarChart {
    rows: Vec<Row>,
    width: usize,
}

impl BarChart {
    /// Build the chart rows for `histogram`.
    #[must_use]
    pub fn new(histogram: &Histogram, width: usize) -> Self {
        let bounds = histogram.bounds();
        let rows = histogram
            .buckets()
            .rev()
            .map(|bucket| Row {
                label: format!("{:.2}", bucket.lower_edge),
                value: log_count(bucket.count),
                color: LOW.blend(HIGH, bounds.fraction(bucket.lower_edge)),
            })
            .collect();
        Self { rows, width }
    }

    /// Rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn label_width(&self) -> usize {
        self.rows.iter().map(|r| r.label.len()).max().unwrap_or(0)
    }

    fn max_value(&self) -> f64 {
        self.rows.iter().map(|r| r.value).fold(0.0, f64::max)
    }

    /// Columns left for the bar itself after label and value text.
    fn bar_width(&self) -> usize {
        let value_width = format!("{:.2}", self.max_value()).len();
        self.width
            .saturating_sub(self.label_width() + value_width + 2)
            .max(1)
    }
}

impl fmt::Display for BarChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pad = self.width.saturating_sub(TITLE.len()) / 2;
        writeln!(f, "{:pad$}{}", "", TITLE.green().bold().underline())?;

        let label_width = self.label_width();
        let bar_width = self.bar_width();
        let max_value = self.max_value();
        for row in self.rows() {
            let bar = BAR.repeat(bar_len(row.value, max_value, bar_width));
            let Rgb(r, g, b) = row.color;
            writeln!(
                f,
                "{:>label_width$} {} {:.2}",
                row.label,
                bar.truecolor(r, g, b),
                row.value
            )?;
        }
        Ok(())
    }
}

/// `log10(count)`, with an empty bucket drawn as an empty bar.
#[must_use]
pub fn log_count(count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        (count as f64).log10()
    }
}

/// Bar length in columns for `value` when `max_value` fills `width`.
#[must_use]
pub fn bar_len(value: f64, max_value: f64, width: usize) -> usize {
    if max_value <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max_value) * width as f64).round().min(width as f64) as usize
}
