//! Chart option validation.
//!
//! Options arrive as `name = value` nodes. [`OptionsBuilder`] checks each one against the
//! chart kind and the value domain and accumulates the accepted fields; the resulting
//! [`ChartOptions`] only leaves [`validate_options`] when every option was accepted.

use crate::error::{ChartError, INVALID_FOR_CHART};
use crate::node::{Node, NodeKind, NodePath, OPTION_TAG};
use crate::types::{BackgroundColor, ChartKind, LegendPosition, SeriesNames, SliceText, Stacking};

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 300;

/// Resolved chart options.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub series_names: Option<SeriesNames>,
    pub horizontal_domain: bool,
    pub stacking: Option<Stacking>,
    pub is_3d: bool,
    pub background_color: Option<BackgroundColor>,
    pub legend_position: LegendPosition,
    pub slice_text: SliceText,
    pub domain_text: Option<String>,
    pub range_text: Option<String>,
    pub logarithmic_scale: Option<bool>,
    /// First category index for flat (single-series) data.
    pub starting: i64,
    pub dot_size: Option<i64>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: None,
            series_names: None,
            horizontal_domain: true,
            stacking: None,
            is_3d: false,
            background_color: None,
            legend_position: LegendPosition::Bottom,
            slice_text: SliceText::Percentage,
            domain_text: None,
            range_text: None,
            logarithmic_scale: None,
            starting: 1,
            dot_size: None,
        }
    }
}

impl ChartOptions {
    pub fn is_logarithmic(&self) -> bool {
        self.logarithmic_scale == Some(true)
    }
}

/// Accumulates validated options for one chart kind.
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    kind: ChartKind,
    options: ChartOptions,
}

impl OptionsBuilder {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            options: ChartOptions::default(),
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Check one option node located at `at` and record its value.
    ///
    /// Fields are only written once the whole option has been checked.
    pub fn apply(&mut self, option: &Node, at: &NodePath) -> Result<(), ChartError> {
        let (name, value) = match option {
            Node::Other { tag, children } if tag == OPTION_TAG && children.len() == 2 => {
                match children[0].as_str() {
                    Some(name) => (name.to_lowercase(), &children[1]),
                    None => return Err(ChartError::validation(at.clone(), "Invalid option")),
                }
            }
            _ => return Err(ChartError::validation(at.clone(), "Invalid option")),
        };
        let name_at = at.child(0);
        let value_at = at.child(1);
        let is_pie = self.kind.is_pie();

        match name.as_str() {
            "size" => {
                let Node::List(items) = value else {
                    return Err(ChartError::validation(value_at, "Value must be a list"));
                };
                if items.len() != 2 {
                    return Err(ChartError::validation(value_at, "Value must be a two-element list"));
                }
                let width = positive_dimension(&items[0], &value_at.child(0))?;
                let height = positive_dimension(&items[1], &value_at.child(1))?;
                self.options.width = width;
                self.options.height = height;
            }

            "title" => {
                let Some(title) = value.as_str() else {
                    return Err(ChartError::validation(value_at, "Value is not a string"));
                };
                self.options.title = Some(title.to_string());
            }

            "domain text" | "range text" => {
                if is_pie {
                    return Err(ChartError::validation(at.clone(), INVALID_FOR_CHART));
                }
                let Some(text) = value.as_str() else {
                    return Err(ChartError::validation(at.clone(), "Option is not a string"));
                };
                if name == "domain text" {
                    self.options.domain_text = Some(text.to_string());
                } else {
                    self.options.range_text = Some(text.to_string());
                }
            }

            "3d" => {
                if !is_pie {
                    return Err(ChartError::validation(at.clone(), INVALID_FOR_CHART));
                }
                let Some(flag) = value.as_bool() else {
                    return Err(ChartError::validation(at.clone(), "Option is not a boolean value"));
                };
                self.options.is_3d = flag;
            }

            "series names" => {
                if is_pie {
                    return Err(ChartError::validation(at.clone(), INVALID_FOR_CHART));
                }
                let names = match value.kind() {
                    NodeKind::String => SeriesNames::Single(value.as_str().unwrap_or_default().to_string()),
                    NodeKind::List | NodeKind::Matrix => {
                        let items = value.children();
                        if items.is_empty() {
                            return Err(ChartError::validation(value_at, "Empty list"));
                        }
                        let mut names = Vec::with_capacity(items.len());
                        for (i, item) in items.iter().enumerate() {
                            match item.as_str() {
                                Some(s) => names.push(s.to_string()),
                                None => {
                                    return Err(ChartError::validation(
                                        value_at.child(i),
                                        "Value is not a string",
                                    ));
                                }
                            }
                        }
                        SeriesNames::Many(names)
                    }
                    _ => return Err(ChartError::validation(at.clone(), "Invalid option")),
                };
                self.options.series_names = Some(names);
            }

            "horizontal domain" => {
                if is_pie {
                    return Err(ChartError::validation(at.clone(), INVALID_FOR_CHART));
                }
                let Some(flag) = value.as_bool() else {
                    return Err(ChartError::validation(at.clone(), "Option is not a boolean value"));
                };
                self.options.horizontal_domain = flag;
            }

            "stacking" => {
                if is_pie {
                    return Err(ChartError::validation(at.clone(), INVALID_FOR_CHART));
                }
                let Some(s) = value.as_str() else {
                    return Err(ChartError::validation(at.clone(), "Expression is not a string"));
                };
                let Some(stacking) = Stacking::parse(&s.to_lowercase()) else {
                    return Err(ChartError::validation(value_at, "Invalid option"));
                };
                self.options.stacking = Some(stacking);
            }

            "background color" => {
                let color = match value {
                    Node::Null => BackgroundColor::Transparent,
                    Node::Color { red, green, blue }
                        if [red, green, blue].iter().all(|c| (0.0..=1.0).contains(*c)) =>
                    {
                        BackgroundColor::from_unit_rgb(*red, *green, *blue)
                    }
                    _ => return Err(ChartError::validation(value_at, "Invalid option")),
                };
                self.options.background_color = Some(color);
            }

            "legend position" => {
                let Some(s) = value.as_str() else {
                    return Err(ChartError::validation(value_at, "Value is not a string"));
                };
                let position = match s.to_lowercase().as_str() {
                    "none" => LegendPosition::Hidden,
                    "top" => LegendPosition::Top,
                    "bottom" => LegendPosition::Bottom,
                    "left" => LegendPosition::Left,
                    "right" => LegendPosition::Right,
                    "beside slice" if is_pie => LegendPosition::Labeled,
                    "beside slice" => return Err(ChartError::validation(value_at, INVALID_FOR_CHART)),
                    _ => return Err(ChartError::validation(value_at, "Invalid option")),
                };
                self.options.legend_position = position;
            }

            "slice text" => {
                if !is_pie {
                    return Err(ChartError::validation(value_at, INVALID_FOR_CHART));
                }
                let Some(s) = value.as_str() else {
                    return Err(ChartError::validation(value_at, "Expression is not a string"));
                };
                let Some(text) = SliceText::parse(&s.to_lowercase()) else {
                    return Err(ChartError::validation(value_at, "Invalid option"));
                };
                self.options.slice_text = text;
            }

            "logarithmic scale" => {
                if is_pie {
                    return Err(ChartError::validation(value_at, INVALID_FOR_CHART));
                }
                let Some(flag) = value.as_bool() else {
                    return Err(ChartError::validation(value_at, "Option is not a boolean value"));
                };
                self.options.logarithmic_scale = Some(flag);
            }

            "starting" => {
                let Some(starting) = value.native_integer() else {
                    return Err(ChartError::validation(value_at, "Value is not a valid number"));
                };
                self.options.starting = starting;
            }

            "dot size" => {
                let Some(size) = value.native_integer() else {
                    return Err(ChartError::validation(value_at, "Value is not a valid number"));
                };
                self.options.dot_size = Some(size);
            }

            _ => return Err(ChartError::validation(name_at, "Unknown option")),
        }
        Ok(())
    }

    pub fn finish(self) -> ChartOptions {
        self.options
    }
}

fn positive_dimension(node: &Node, at: &NodePath) -> Result<u32, ChartError> {
    node.native_integer()
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
        .ok_or_else(|| ChartError::validation(at.clone(), "Value is not a valid number"))
}

/// Validate `options` (located at `base.child(i)`) for `kind`.
///
/// Every option is checked so that all problems are reported at once; the options are
/// returned only when none failed.
pub fn validate_options(
    kind: ChartKind,
    options: &[Node],
    base: &NodePath,
) -> Result<ChartOptions, Vec<ChartError>> {
    let mut builder = OptionsBuilder::new(kind);
    let errors: Vec<ChartError> = options
        .iter()
        .enumerate()
        .filter_map(|(i, option)| builder.apply(option, &base.child(i)).err())
        .collect();
    if errors.is_empty() {
        Ok(builder.finish())
    } else {
        Err(errors)
    }
}
