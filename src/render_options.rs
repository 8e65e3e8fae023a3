//! Translation of resolved [`ChartOptions`] into the renderer's flat option bag.
//!
//! The bag serializes to camelCase JSON (`enableInteractivity`, `hAxis`, `pieSliceText`,
//! …) so that it can be handed to any renderer speaking that schema.

use serde::{Deserialize, Serialize};

use crate::options::ChartOptions;
use crate::types::{ChartKind, LegendPosition, SliceText, Stacking};

/// Only emitted for vertical charts; the renderer's default is horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    pub stroke_width: u32,
    pub stroke: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    pub alignment: String,
    pub position: LegendPosition,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_scale: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub enable_interactivity: bool,
    pub background_color: Background,
    pub legend: Legend,
    pub h_axis: AxisOptions,
    pub v_axis: AxisOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_stacked: Option<Stacking>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pie_slice_text: Option<SliceText>,
    #[serde(rename = "is3D", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_3d: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_size: Option<i64>,
}

impl RenderOptions {
    pub fn is_vertical(&self) -> bool {
        self.orientation == Some(Orientation::Vertical)
    }

    /// Axis carrying the categories.
    pub fn domain_axis(&self) -> &AxisOptions {
        if self.is_vertical() { &self.v_axis } else { &self.h_axis }
    }

    /// Axis carrying the series values.
    pub fn range_axis(&self) -> &AxisOptions {
        if self.is_vertical() { &self.h_axis } else { &self.v_axis }
    }

    pub fn log_scale(&self) -> bool {
        self.range_axis().log_scale == Some(true)
    }
}

/// Map resolved options for a chart of `kind` to the renderer's option bag.
pub fn render_options(kind: ChartKind, options: &ChartOptions) -> RenderOptions {
    let legend_position = if kind.is_pie() || options.series_names.is_some() {
        options.legend_position
    } else {
        LegendPosition::Hidden
    };

    let mut h_axis = AxisOptions::default();
    let mut v_axis = AxisOptions::default();
    let (domain_axis, range_axis) = if options.horizontal_domain {
        (&mut h_axis, &mut v_axis)
    } else {
        (&mut v_axis, &mut h_axis)
    };
    domain_axis.title = options.domain_text.clone();
    range_axis.title = options.range_text.clone();
    range_axis.log_scale = options.logarithmic_scale;

    RenderOptions {
        width: options.width,
        height: options.height,
        enable_interactivity: false,
        background_color: Background {
            stroke_width: 1,
            stroke: "black".to_string(),
            fill: options.background_color.map(|c| c.css()),
        },
        legend: Legend {
            alignment: "center".to_string(),
            position: legend_position,
        },
        h_axis,
        v_axis,
        orientation: (!options.horizontal_domain).then_some(Orientation::Vertical),
        title: options.title.clone(),
        is_stacked: options.stacking,
        pie_slice_text: kind.is_pie().then_some(options.slice_text),
        is_3d: kind.is_pie() && options.is_3d,
        point_size: options.dot_size,
    }
}
