//! Chart adapters.
//!
//! Reshape `{label, value}` points into series the templates can draw
//! directly, and into JSON for the client-side chart script.

use serde::Serialize;

use prifam_core::Sentiment;

use crate::models::ChartPoint;

/// Slice colours, used in order for non-sentiment pies.
const PALETTE: [&str; 6] = [
    "#3b82f6", "#f97316", "#a855f7", "#14b8a6", "#eab308", "#64748b",
];

/// Colour for a sentiment label.
#[must_use]
pub const fn sentiment_color(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "#22c55e",
        Sentiment::Neutral => "#eab308",
        Sentiment::Negative => "#ef4444",
    }
}

/// One slice of a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
    /// Share of the total, 0-100, one decimal.
    pub percent: f64,
    pub color: &'static str,
}

/// One column of a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarColumn {
    pub label: String,
    pub value: u64,
    /// Height relative to the tallest column, 0-100.
    pub height: f64,
}

#[allow(clippy::cast_precision_loss)] // chart counts are far below 2^52
fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 * 1000.0 / whole as f64).round() / 10.0
    }
}

/// Pie slices with percentages.
///
/// Points labelled with a sentiment take that sentiment's colour; others
/// take palette colours in order.
#[must_use]
pub fn pie_slices(points: &[ChartPoint]) -> Vec<PieSlice> {
    let total: u64 = points.iter().map(|p| p.value).sum();
    points
        .iter()
        .zip(PALETTE.iter().cycle())
        .map(|(point, fallback)| PieSlice {
            label: point.label.clone(),
            value: point.value,
            percent: ratio(point.value, total),
            color: point
                .label
                .parse::<Sentiment>()
                .map_or(*fallback, sentiment_color),
        })
        .collect()
}

/// Bar columns scaled to the tallest value.
#[must_use]
pub fn bar_columns(points: &[ChartPoint]) -> Vec<BarColumn> {
    let max = points.iter().map(|p| p.value).max().unwrap_or(0);
    points
        .iter()
        .map(|point| BarColumn {
            label: point.label.clone(),
            value: point.value,
            height: ratio(point.value, max),
        })
        .collect()
}

/// JSON form of any chart series, for embedding in a `<script>` data block.
#[must_use]
pub fn to_json<T: Serialize>(series: &[T]) -> String {
    serde_json::to_string(series).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to serialize chart series");
        "[]".to_string()
    })
}
