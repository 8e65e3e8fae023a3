//! expr_chart
//!
//! Chart reduction for expression trees. A chart invocation (`Chart.Bar`, `Chart.Line`,
//! `Chart.Area`, `Chart.Dot`, `Chart.Step`, `Chart.Pie`) carries its data and a list of
//! `Expression.Option` nodes; reducing it validates the options, derives a data table,
//! translates the options for a renderer and replaces the invocation with a raster image.
//!
//! ### Features
//! - Option validation with errors attached to the offending node
//! - Table derivation from flat sequences or matrices
//! - Render option bag serializable to JSON
//! - Default renderer on top of plotters (bitmap and SVG)
//! - CSV/JSON export of the derived table
//!
//! ### Example
//! ```no_run
//! use std::sync::Arc;
//! use expr_chart::{ChartReducer, Diagnostics, Node, NodePath, Reducer, viz::PlottersRenderer};
//!
//! let mut chart = Node::other(
//!     "Chart.Bar",
//!     vec![
//!         Node::list([Node::number(3), Node::number(5), Node::number(2)]),
//!         Node::list([Node::option("title", Node::string("Sales"))]),
//!     ],
//! );
//! let reducer = ChartReducer::new(Arc::new(PlottersRenderer));
//! let mut diagnostics = Diagnostics::new();
//! if reducer.reduce(&mut chart, &NodePath::root(), &mut diagnostics) {
//!     if let Node::RasterGraphics { value } = &chart {
//!         value.save_png("sales.png")?;
//!     }
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod bitmap;
pub mod error;
pub mod node;
pub mod options;
pub mod reduction;
pub mod render_options;
pub mod storage;
pub mod table;
pub mod types;
pub mod viz;

pub use bitmap::Bitmap;
pub use error::{ChartError, Diagnostic, Diagnostics};
pub use node::{Node, NodeKind, NodePath};
pub use options::{ChartOptions, OptionsBuilder, validate_options};
pub use reduction::{
    ChartReducer, ChartRenderer, PreparedChart, Reducer, ReducerConfig, ReductionManager,
    prepare_chart, register_chart_reducers,
};
pub use render_options::{RenderOptions, render_options};
pub use table::{DataTable, build_table};
pub use types::{ChartKind, LegendPosition, SeriesNames, SliceText, Stacking};
