//! Default rendering collaborator: draws a [`DataTable`] with **plotters**.
//!
//! - Bar, Line, Area, Dot, Step on cartesian axes; Pie as polygon wedges (3D adds a shadow)
//! - Vertical orientation swaps the category and value axes
//! - Absolute and relative stacking; logarithmic value axes plot `log10`
//! - Microsoft Office palette, background fill and border from the option bag
//!
//! Drawing is generic over [`DrawingBackend`]: [`PlottersRenderer`] renders into an RGB
//! buffer for the reduction pipeline, [`render_to_file`] writes SVG or PNG directly.
//!
//! Text (titles, tick labels, legends, slice text) needs a registered font, see
//! [`initialize`] and [`initialize_default`]. Without one the chart is drawn without any
//! text. Decorations (title, label areas, legends) are only laid out when the canvas
//! leaves room for the plot itself.

pub mod legend;
pub mod pie;
pub mod util;

use crate::bitmap::Bitmap;
use crate::reduction::ChartRenderer;
use crate::render_options::RenderOptions;
use crate::table::{ColumnType, DataTable, Value};
use crate::types::{ChartKind, LegendPosition, Stacking};
use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontFamily, FontStyle};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

/// One-time registration of the "sans-serif" font used by the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();
static FONTS_READY: AtomicBool = AtomicBool::new(false);

/// DejaVu Sans, shipped with the crate (license in `assets/DejaVuSans-LICENSE.txt`).
pub const DEJAVU_SANS: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Title band reserved above the plot: 18 px text plus padding.
const TITLE_BAND_PX: u32 = 40;

/// Register `font` (TrueType/OpenType bytes) for chart text.
///
/// Safe to call many times; only the first call registers anything. Returns whether text
/// rendering is available.
pub fn initialize(font: &'static [u8]) -> bool {
    INIT_FONTS.call_once(|| {
        let ok = plotters::style::register_font("sans-serif", FontStyle::Normal, font).is_ok();
        if !ok {
            log::warn!("font registration failed; charts are drawn without text");
        }
        FONTS_READY.store(ok, Ordering::SeqCst);
    });
    fonts_ready()
}

/// [`initialize`] with the bundled [`DEJAVU_SANS`].
pub fn initialize_default() -> bool {
    initialize(DEJAVU_SANS)
}

pub fn fonts_ready() -> bool {
    FONTS_READY.load(Ordering::SeqCst)
}

/// Renders charts into in-memory RGB bitmaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlottersRenderer;

impl ChartRenderer for PlottersRenderer {
    fn render(&self, kind: ChartKind, table: &DataTable, options: &RenderOptions) -> Result<Bitmap> {
        let (width, height) = (options.width, options.height);
        let mut buf = vec![0u8; Bitmap::buffer_len(width, height)?];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            draw_chart(&root, kind, table, options)?;
            root.present().map_err(|e| anyhow!("{:?}", e))?;
        }
        Bitmap::from_rgb(width, height, buf)
    }
}

/// Render straight to a file: `.svg` through the SVG backend, anything else as PNG.
pub fn render_to_file<P: AsRef<Path>>(
    kind: ChartKind,
    table: &DataTable,
    options: &RenderOptions,
    out_path: P,
) -> Result<()> {
    let out_path = out_path.as_ref();
    let size = (options.width, options.height);
    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(out_path, size).into_drawing_area();
        draw_chart(&root, kind, table, options)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    } else {
        Bitmap::buffer_len(options.width, options.height)?;
        let root = BitMapBackend::new(out_path, size).into_drawing_area();
        draw_chart(&root, kind, table, options)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Draw a complete chart (background, plot, legend, border) on any backend.
pub fn draw_chart<DB>(
    root: &DrawingArea<DB, Shift>,
    kind: ChartKind,
    table: &DataTable,
    options: &RenderOptions,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let background = options
        .background_color
        .fill
        .as_deref()
        .and_then(util::parse_color)
        .unwrap_or(WHITE);
    root.fill(&background).map_err(|e| anyhow!("{:?}", e))?;

    let text = fonts_ready();
    let plot_area = match options.title.as_deref() {
        Some(title) if text && util::leaves_room(root.dim_in_pixel(), (0, TITLE_BAND_PX)) => root
            .titled(title, (FontFamily::SansSerif, 18))
            .map_err(|e| anyhow!("{:?}", e))?,
        _ => root.margin(0, 0, 0, 0),
    };

    if table.row_count() > 0 && table.series_count() > 0 {
        if kind.is_pie() {
            pie::draw_pie(&plot_area, table, options, text)?;
        } else {
            draw_cartesian(&plot_area, kind, table, options, text)?;
        }
    } else {
        log::debug!("empty table, drawing background only");
    }

    let stroke_width = options.background_color.stroke_width;
    if stroke_width > 0 {
        let (w, h) = root.dim_in_pixel();
        let stroke = util::parse_color(&options.background_color.stroke).unwrap_or(BLACK);
        root.draw(&Rectangle::new(
            [(0, 0), (w as i32 - 1, h as i32 - 1)],
            stroke.stroke_width(stroke_width),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Lower and upper bound of every series per row, after stacking.
struct Layer {
    label: String,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

fn stack_layers(table: &DataTable, stacking: Option<Stacking>) -> Vec<Layer> {
    let rows = table.row_count();
    let series: Vec<Vec<f64>> = (0..table.series_count())
        .map(|s| table.series_values(s).collect())
        .collect();
    let label = |s: usize| {
        table.columns()[s + 1]
            .label
            .clone()
            .unwrap_or_else(|| format!("Series {}", s + 1))
    };

    match stacking {
        None | Some(Stacking::Unstacked) => series
            .into_iter()
            .enumerate()
            .map(|(s, upper)| Layer {
                label: label(s),
                lower: vec![0.0; rows],
                upper,
            })
            .collect(),
        Some(mode) => {
            let totals: Vec<f64> = (0..rows).map(|r| series.iter().map(|v| v[r]).sum()).collect();
            let mut cumulative = vec![0.0; rows];
            series
                .into_iter()
                .enumerate()
                .map(|(s, values)| {
                    let lower = cumulative.clone();
                    for (r, v) in values.iter().enumerate() {
                        let share = if mode == Stacking::Relative && totals[r] != 0.0 {
                            v / totals[r]
                        } else {
                            *v
                        };
                        cumulative[r] += share;
                    }
                    Layer {
                        label: label(s),
                        lower,
                        upper: cumulative.clone(),
                    }
                })
                .collect()
        }
    }
}

fn draw_cartesian<DB>(
    area: &DrawingArea<DB, Shift>,
    kind: ChartKind,
    table: &DataTable,
    options: &RenderOptions,
    text: bool,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let rows = table.row_count();
    let vertical = options.is_vertical();
    let log = options.log_scale();
    let stacked = matches!(options.is_stacked, Some(Stacking::Absolute | Stacking::Relative));

    // Category positions: numeric categories as given, string categories by row index.
    let numeric_categories = table.columns()[0].ty == ColumnType::Number;
    let categories: Vec<f64> = (0..rows)
        .map(|r| match table.value(r, 0) {
            Some(Value::Number(n)) if numeric_categories => *n,
            _ => r as f64,
        })
        .collect();
    let step = util::category_step(&categories);
    let half = step / 2.0;

    let mut layers = stack_layers(table, options.is_stacked);
    if log {
        let smallest = layers
            .iter()
            .flat_map(|l| l.upper.iter().copied())
            .filter(|v| *v > 0.0)
            .fold(f64::INFINITY, f64::min);
        let floor = if smallest.is_finite() { smallest.log10().floor() } else { 0.0 };
        let project = |v: f64| if v > 0.0 { v.log10() } else { floor };
        for layer in &mut layers {
            layer.lower.iter_mut().for_each(|v| *v = project(*v));
            layer.upper.iter_mut().for_each(|v| *v = project(*v));
        }
    }
    let baseline = layers
        .iter()
        .flat_map(|l| l.lower.iter().copied())
        .fold(if log { f64::INFINITY } else { 0.0 }, f64::min);
    let (vmin, vmax) = layers
        .iter()
        .flat_map(|l| l.upper.iter().copied())
        .fold((baseline, baseline), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let (vmin, vmax) = util::padded_range(vmin, vmax);

    let cat_lo = categories.iter().copied().fold(f64::INFINITY, f64::min) - half;
    let cat_hi = categories.iter().copied().fold(f64::NEG_INFINITY, f64::max) + half;

    // Vertical charts list categories top to bottom, hence the negated category axis.
    let pt = |c: f64, v: f64| if vertical { (v, -c) } else { (c, v) };
    let (x_range, y_range) = if vertical {
        (vmin..vmax, -cat_hi..-cat_lo)
    } else {
        (cat_lo..cat_hi, vmin..vmax)
    };

    let dim = area.dim_in_pixel();
    let margin = if util::leaves_room(dim, (24, 24)) { 12 } else { 0 };
    let labels = text && util::leaves_room(dim, (2 * margin + 56, 2 * margin + 36));

    let mut builder = ChartBuilder::on(area);
    builder.margin(margin);
    if labels {
        builder
            .set_label_area_size(LabelAreaPosition::Left, 56)
            .set_label_area_size(LabelAreaPosition::Bottom, 36);
    }
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| anyhow!("{:?}", e))?;

    let domain_fmt = |v: &f64| {
        let c = if vertical { -*v } else { *v };
        if numeric_categories {
            util::format_tick(c, false)
        } else {
            let r = c.round();
            if (c - r).abs() < 1e-6 && r >= 0.0 && (r as usize) < rows {
                table.category_label(r as usize)
            } else {
                String::new()
            }
        }
    };
    let range_fmt = |v: &f64| util::format_tick(*v, log);
    let (x_fmt, y_fmt): (&dyn Fn(&f64) -> String, &dyn Fn(&f64) -> String) = if vertical {
        (&range_fmt, &domain_fmt)
    } else {
        (&domain_fmt, &range_fmt)
    };
    let domain_labels = rows.clamp(1, 12);

    {
        let mut mesh = chart.configure_mesh();
        mesh.bold_line_style(BLACK.mix(0.15))
            .light_line_style(BLACK.mix(0.05));
        if labels {
            mesh.x_labels(if vertical { 8 } else { domain_labels })
                .y_labels(if vertical { domain_labels } else { 8 })
                .x_label_formatter(x_fmt)
                .y_label_formatter(y_fmt)
                .label_style((FontFamily::SansSerif, 12))
                .axis_desc_style((FontFamily::SansSerif, 14));
            if let Some(title) = &options.h_axis.title {
                mesh.x_desc(title.clone());
            }
            if let Some(title) = &options.v_axis.title {
                mesh.y_desc(title.clone());
            }
        } else {
            mesh.x_labels(0).y_labels(0);
        }
        mesh.draw().map_err(|e| anyhow!("{:?}", e))?;
    }

    let group_w = step * 0.8;
    let n_series = layers.len().max(1) as f64;
    let point_size = options
        .point_size
        .map(|s| s.clamp(0, 50) as i32)
        .unwrap_or(if kind == ChartKind::Dot { 4 } else { 0 });

    for (s, layer) in layers.iter().enumerate() {
        let color = util::office_color(s);
        let tops: Vec<(f64, f64)> = (0..rows).map(|r| pt(categories[r], layer.upper[r])).collect();

        let anno = match kind {
            ChartKind::Bar => {
                let bars = (0..rows).map(|r| {
                    let c = categories[r];
                    let (c0, c1) = if stacked {
                        (c - group_w / 2.0, c + group_w / 2.0)
                    } else {
                        let w = group_w / n_series;
                        let c0 = c - group_w / 2.0 + s as f64 * w;
                        (c0, c0 + w)
                    };
                    Rectangle::new([pt(c0, layer.lower[r]), pt(c1, layer.upper[r])], color.filled())
                });
                chart.draw_series(bars).map_err(|e| anyhow!("{:?}", e))?
            }
            ChartKind::Line => chart
                .draw_series(LineSeries::new(tops.clone(), color.stroke_width(2)))
                .map_err(|e| anyhow!("{:?}", e))?,
            ChartKind::Area => {
                let mut band = tops.clone();
                band.extend((0..rows).rev().map(|r| pt(categories[r], layer.lower[r])));
                chart
                    .draw_series(std::iter::once(Polygon::new(band, color.mix(0.3).filled())))
                    .map_err(|e| anyhow!("{:?}", e))?;
                chart
                    .draw_series(std::iter::once(PathElement::new(tops.clone(), color.stroke_width(2))))
                    .map_err(|e| anyhow!("{:?}", e))?
            }
            ChartKind::Dot => chart
                .draw_series(
                    tops.iter()
                        .map(|p| Circle::new(*p, point_size.max(1), color.filled())),
                )
                .map_err(|e| anyhow!("{:?}", e))?,
            ChartKind::Step => {
                let stairs = |values: &[f64]| -> Vec<(f64, f64)> {
                    (0..rows)
                        .flat_map(|r| {
                            let c = categories[r];
                            [pt(c - half, values[r]), pt(c + half, values[r])]
                        })
                        .collect()
                };
                let upper = stairs(&layer.upper);
                let mut band = upper.clone();
                band.extend(stairs(&layer.lower).into_iter().rev());
                chart
                    .draw_series(std::iter::once(Polygon::new(band, color.mix(0.5).filled())))
                    .map_err(|e| anyhow!("{:?}", e))?;
                chart
                    .draw_series(std::iter::once(PathElement::new(upper, color.stroke_width(2))))
                    .map_err(|e| anyhow!("{:?}", e))?
            }
            ChartKind::Pie => return Err(anyhow!("pie charts have no cartesian axes")),
        };
        anno.label(layer.label.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 12, y + 4)], color.filled()));

        if point_size > 0 && matches!(kind, ChartKind::Line | ChartKind::Area | ChartKind::Step) {
            chart
                .draw_series(tops.iter().map(|p| Circle::new(*p, point_size, color.filled())))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    if labels {
        let position = match options.legend.position {
            LegendPosition::Hidden | LegendPosition::Labeled => None,
            LegendPosition::Top => Some(SeriesLabelPosition::UpperMiddle),
            LegendPosition::Bottom => Some(SeriesLabelPosition::LowerMiddle),
            LegendPosition::Left => Some(SeriesLabelPosition::MiddleLeft),
            LegendPosition::Right => Some(SeriesLabelPosition::MiddleRight),
        };
        if let Some(position) = position {
            chart
                .configure_series_labels()
                .position(position)
                .border_style(BLACK)
                .background_style(WHITE.mix(0.85))
                .label_font((FontFamily::SansSerif, 12))
                .draw()
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }
    Ok(())
}
