//! Pie charts: polygon wedges in pixel coordinates.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::legend::{LegendLayout, draw_legend_entries};
use super::util::{leaves_room, office_color, shade};
use crate::render_options::RenderOptions;
use crate::table::DataTable;
use crate::types::{LegendPosition, SliceText};

/// Angular resolution of wedge arcs.
const ARC_STEP: f64 = PI / 90.0;

/// A slice as start angle and sweep, clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub start: f64,
    pub sweep: f64,
    pub share: f64,
}

/// Split the circle proportionally to `values`; non-positive values get empty wedges.
pub fn wedges(values: &[f64]) -> Vec<Wedge> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let mut start = -FRAC_PI_2;
    values
        .iter()
        .map(|v| {
            let share = if total > 0.0 { v.max(0.0) / total } else { 0.0 };
            let wedge = Wedge {
                start,
                sweep: share * TAU,
                share,
            };
            start += wedge.sweep;
            wedge
        })
        .collect()
}

/// Outline of a wedge around `center` with radii `(rx, ry)`.
fn wedge_outline(center: (f64, f64), rx: f64, ry: f64, wedge: &Wedge) -> Vec<(i32, i32)> {
    let segments = (wedge.sweep / ARC_STEP).ceil().max(2.0) as usize;
    let mut points = Vec::with_capacity(segments + 2);
    points.push((center.0.round() as i32, center.1.round() as i32));
    for i in 0..=segments {
        let a = wedge.start + wedge.sweep * i as f64 / segments as f64;
        points.push((
            (center.0 + rx * a.cos()).round() as i32,
            (center.1 + ry * a.sin()).round() as i32,
        ));
    }
    points
}

pub fn draw_pie<DB>(
    area: &DrawingArea<DB, Shift>,
    table: &DataTable,
    options: &RenderOptions,
    text: bool,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let values: Vec<f64> = table.series_values(0).collect();
    let labels: Vec<String> = (0..table.row_count()).map(|r| table.category_label(r)).collect();
    let colors: Vec<RGBColor> = (0..values.len()).map(office_color).collect();

    let dim = area.dim_in_pixel();
    // The panel is dropped when it would squeeze the pie below the minimum plot size.
    let panel = match options.legend.position {
        LegendPosition::Left | LegendPosition::Right if text => {
            let side = (dim.0 / 4).max(60);
            if leaves_room(dim, (side, 0)) { side } else { 0 }
        }
        LegendPosition::Top | LegendPosition::Bottom if text => {
            if leaves_room(dim, (0, 40)) { 40 } else { 0 }
        }
        _ => 0,
    };
    let (w, h, panel) = (dim.0 as i32, dim.1 as i32, panel as i32);
    let (pie_area, legend_area) = match options.legend.position {
        LegendPosition::Right if panel > 0 => {
            let (pie, legend) = area.split_horizontally(w - panel);
            (pie, Some((legend, LegendLayout::Column)))
        }
        LegendPosition::Left if panel > 0 => {
            let (legend, pie) = area.split_horizontally(panel);
            (pie, Some((legend, LegendLayout::Column)))
        }
        LegendPosition::Top if panel > 0 => {
            let (legend, pie) = area.split_vertically(panel);
            (pie, Some((legend, LegendLayout::Row)))
        }
        LegendPosition::Bottom if panel > 0 => {
            let (pie, legend) = area.split_vertically(h - panel);
            (pie, Some((legend, LegendLayout::Row)))
        }
        _ => (area.margin(0, 0, 0, 0), None),
    };

    let (pw, ph) = pie_area.dim_in_pixel();
    let (pw, ph) = (pw as f64, ph as f64);
    let labeled = text && options.legend.position == LegendPosition::Labeled;
    let radius = pw.min(ph) * if labeled { 0.32 } else { 0.42 };
    let (rx, ry, depth) = if options.is_3d {
        (radius, radius * 0.6, radius * 0.15)
    } else {
        (radius, radius, 0.0)
    };
    let center = (pw / 2.0, ph / 2.0 - depth / 2.0);
    let slices = wedges(&values);

    if depth > 0.0 {
        let below = (center.0, center.1 + depth);
        for (wedge, color) in slices.iter().zip(&colors) {
            if wedge.sweep > 0.0 {
                pie_area
                    .draw(&Polygon::new(wedge_outline(below, rx, ry, wedge), shade(*color, 0.6).filled()))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
        }
    }
    for (wedge, color) in slices.iter().zip(&colors) {
        if wedge.sweep > 0.0 {
            pie_area
                .draw(&Polygon::new(wedge_outline(center, rx, ry, wedge), color.filled()))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    if !text {
        return Ok(());
    }

    let centered = TextStyle::from((FontFamily::SansSerif, 12))
        .pos(Pos::new(HPos::Center, VPos::Center));
    let on_slice = centered.color(&WHITE);
    for (r, wedge) in slices.iter().enumerate() {
        if wedge.share <= 0.0 {
            continue;
        }
        let mid = wedge.start + wedge.sweep / 2.0;
        let slice_text = match options.pie_slice_text.unwrap_or(SliceText::Percentage) {
            SliceText::Hidden => None,
            SliceText::Percentage => Some(format!("{:.1}%", wedge.share * 100.0)),
            SliceText::Value => Some(super::util::format_tick(values[r], false)),
            SliceText::Label => Some(labels[r].clone()),
        };
        // Slices narrower than ~10 degrees have no room for text.
        if let Some(s) = slice_text.filter(|_| wedge.sweep > PI / 18.0) {
            let at = (
                (center.0 + rx * 0.65 * mid.cos()).round() as i32,
                (center.1 + ry * 0.65 * mid.sin()).round() as i32,
            );
            pie_area
                .draw(&Text::new(s, at, on_slice.clone()))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
        if labeled {
            let at = (
                (center.0 + rx * 1.25 * mid.cos()).round() as i32,
                (center.1 + ry * 1.25 * mid.sin()).round() as i32,
            );
            pie_area
                .draw(&Text::new(labels[r].clone(), at, centered.clone()))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    if let Some((legend, layout)) = legend_area {
        let entries: Vec<(String, RGBColor)> = labels.into_iter().zip(colors).collect();
        draw_legend_entries(&legend, &entries, layout)?;
    }
    Ok(())
}
