//! Public enums shared by validation, table building and rendering.

use serde::{Deserialize, Serialize};

/// Chart types supported by the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    /// Column chart (bars grouped per category).
    Bar,
    Line,
    /// Filled area from the baseline to the values.
    Area,
    /// Scatter (markers only).
    Dot,
    /// Stepped area chart.
    Step,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Area,
        ChartKind::Dot,
        ChartKind::Step,
        ChartKind::Pie,
    ];

    /// Host tag under which the reducer for this kind is registered.
    pub fn tag(self) -> &'static str {
        match self {
            ChartKind::Bar => "Chart.Bar",
            ChartKind::Line => "Chart.Line",
            ChartKind::Area => "Chart.Area",
            ChartKind::Dot => "Chart.Dot",
            ChartKind::Step => "Chart.Step",
            ChartKind::Pie => "Chart.Pie",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    pub fn is_pie(self) -> bool {
        self == ChartKind::Pie
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stacking {
    /// Explicit "none": series overlay.
    #[serde(rename = "none")]
    Unstacked,
    Absolute,
    Relative,
}

impl Stacking {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Stacking::Unstacked),
            "absolute" => Some(Stacking::Absolute),
            "relative" => Some(Stacking::Relative),
            _ => None,
        }
    }
}

/// Legend placement. `Labeled` ("beside slice") is only valid for pie charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[serde(rename = "none")]
    Hidden,
    Top,
    Bottom,
    Left,
    Right,
    Labeled,
}

impl LegendPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            LegendPosition::Hidden => "none",
            LegendPosition::Top => "top",
            LegendPosition::Bottom => "bottom",
            LegendPosition::Left => "left",
            LegendPosition::Right => "right",
            LegendPosition::Labeled => "labeled",
        }
    }
}

/// What is printed on pie slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceText {
    #[serde(rename = "none")]
    Hidden,
    Percentage,
    Value,
    Label,
}

impl SliceText {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(SliceText::Hidden),
            "percentage" => Some(SliceText::Percentage),
            "value" => Some(SliceText::Value),
            "label" => Some(SliceText::Label),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundColor {
    Transparent,
    Rgb(u8, u8, u8),
}

impl BackgroundColor {
    /// Convert unit-interval channels; each channel rounds to the nearest 8-bit value.
    pub fn from_unit_rgb(red: f64, green: f64, blue: f64) -> Self {
        let channel = |c: f64| (c * 255.0 + 0.5).floor().clamp(0.0, 255.0) as u8;
        BackgroundColor::Rgb(channel(red), channel(green), channel(blue))
    }

    /// `"transparent"` or `"#rrggbb"`.
    pub fn css(&self) -> String {
        match self {
            BackgroundColor::Transparent => "transparent".to_string(),
            BackgroundColor::Rgb(r, g, b) => format!("#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

/// Names given to the series (non-category) columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesNames {
    Single(String),
    Many(Vec<String>),
}

impl SeriesNames {
    pub fn len(&self) -> usize {
        match self {
            SeriesNames::Single(_) => 1,
            SeriesNames::Many(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        match self {
            SeriesNames::Single(name) if index == 0 => Some(name),
            SeriesNames::Single(_) => None,
            SeriesNames::Many(names) => names.get(index).map(String::as_str),
        }
    }
}
