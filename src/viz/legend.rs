//! Legend panel drawn next to pie charts.

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendLayout {
    /// One entry per line, vertically centered (left/right panels).
    Column,
    /// Entries flow left to right, wrapping (top/bottom bands).
    Row,
}

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Shorten `text` with a trailing ellipsis so that it fits `max_px`.
pub fn fit_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out: String = text.chars().collect();
    while !out.is_empty() && estimate_text_width_px(&format!("{out}…"), font_px) > max_px {
        out.pop();
    }
    if out.is_empty() { String::new() } else { format!("{out}…") }
}

pub fn draw_legend_entries<DB>(
    area: &DrawingArea<DB, Shift>,
    entries: &[(String, RGBColor)],
    layout: LegendLayout,
) -> Result<()>
where
    DB: DrawingBackend,
{
    const FONT_PX: u32 = 12;
    const MARKER: i32 = 5;
    const MARKER_GAP: i32 = 6;
    const ENTRY_GAP: i32 = 14;
    const PAD: i32 = 8;

    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let line_h = FONT_PX as i32 + 8;
    let style = TextStyle::from((FontFamily::SansSerif, FONT_PX)).pos(Pos::new(HPos::Left, VPos::Center));

    let draw_entry = |label: &str, color: &RGBColor, x: i32, y: i32| -> Result<()> {
        area.draw(&Rectangle::new(
            [(x, y - MARKER), (x + 2 * MARKER, y + MARKER)],
            color.filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        area.draw(&Text::new(
            label.to_string(),
            (x + 2 * MARKER + MARKER_GAP, y),
            style.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        Ok(())
    };

    match layout {
        LegendLayout::Column => {
            let max_text = (w - PAD * 2 - 2 * MARKER - MARKER_GAP).max(0) as u32;
            let total_h = entries.len() as i32 * line_h;
            let mut y = ((h - total_h) / 2).max(PAD) + line_h / 2;
            for (label, color) in entries {
                if y > h - PAD {
                    break;
                }
                draw_entry(&fit_to_width(label, FONT_PX, max_text), color, PAD, y)?;
                y += line_h;
            }
        }
        LegendLayout::Row => {
            let max_text = ((w - PAD * 2) / 2).max(0) as u32;
            let (mut x, mut y) = (PAD, PAD + line_h / 2);
            for (label, color) in entries {
                let label = fit_to_width(label, FONT_PX, max_text);
                let block = 2 * MARKER + MARKER_GAP + estimate_text_width_px(&label, FONT_PX) as i32 + ENTRY_GAP;
                if x + block > w - PAD && x > PAD {
                    x = PAD;
                    y += line_h;
                }
                if y > h - PAD {
                    break;
                }
                draw_entry(&label, color, x, y)?;
                x += block;
            }
        }
    }
    Ok(())
}
