//! Utility functions for chart drawing: colors, value ranges, tick formatting.

use plotters::prelude::*;

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Get a color from the Office palette.
#[inline]
pub fn office_color(idx: usize) -> RGBColor {
    OFFICE10[idx % OFFICE10.len()]
}

/// Scale each channel by `factor` (< 1 darkens).
pub fn shade(color: RGBColor, factor: f64) -> RGBColor {
    let f = |c: u8| (c as f64 * factor).clamp(0.0, 255.0) as u8;
    RGBColor(f(color.0), f(color.1), f(color.2))
}

/// Parse `#rrggbb` or one of the few named colors the option bag uses.
///
/// `transparent` maps to `None`: bitmaps have no alpha channel, callers pick the canvas
/// default instead.
pub fn parse_color(s: &str) -> Option<RGBColor> {
    match s.trim().to_ascii_lowercase().as_str() {
        "black" => Some(BLACK),
        "white" => Some(WHITE),
        "transparent" => None,
        hex => {
            let hex = hex.strip_prefix('#')?;
            if hex.len() != 6 {
                return None;
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
        }
    }
}

/// Smallest plot, in pixels per axis, that decorations may not eat into.
pub const MIN_PLOT_PX: u32 = 40;

/// Whether `dim` still leaves [`MIN_PLOT_PX`] on both axes after reserving `reserve`.
pub fn leaves_room(dim: (u32, u32), reserve: (u32, u32)) -> bool {
    dim.0 >= reserve.0.saturating_add(MIN_PLOT_PX) && dim.1 >= reserve.1.saturating_add(MIN_PLOT_PX)
}

/// Widen a degenerate `(min, max)` range and add a little headroom above the data.
pub fn padded_range(min: f64, max: f64) -> (f64, f64) {
    let (mut lo, mut hi) = (min, max);
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }
    let headroom = (hi - lo) * 0.05;
    (lo, hi + headroom)
}

/// Smallest gap between consecutive sorted positions, 1.0 when there is none.
pub fn category_step(positions: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = positions.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| *d > f64::EPSILON)
        .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))))
        .unwrap_or(1.0)
}

/// Tick label for a value axis; `log` axes carry log10 values.
pub fn format_tick(v: f64, log: bool) -> String {
    let v = if log { 10f64.powf(v) } else { v };
    let a = v.abs();
    let prec = if a >= 100.0 || a == 0.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    format!("{:.*}", prec, v)
}
