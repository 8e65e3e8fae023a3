//! Chart reduction: the entry point invoked by the host for `Chart.*` nodes.
//!
//! A reduction validates the options, derives the data table, translates the options for
//! the renderer, renders on a worker thread and replaces the invocation node with the
//! resulting raster graphics. Failures are reported to [`Diagnostics`] and leave the node
//! untouched.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crate::bitmap::Bitmap;
use crate::error::{ChartError, Diagnostics};
use crate::node::{Node, NodeKind, NodePath};
use crate::options::{ChartOptions, validate_options};
use crate::render_options::{RenderOptions, render_options};
use crate::table::{DataTable, build_table};
use crate::types::ChartKind;

/// Default bound on how long a reduction waits for the renderer.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Rendering collaborator: turns a table and option bag into a bitmap.
pub trait ChartRenderer: Send + Sync {
    fn render(
        &self,
        kind: ChartKind,
        table: &DataTable,
        options: &RenderOptions,
    ) -> anyhow::Result<Bitmap>;
}

/// A reducer registered against a host tag.
pub trait Reducer: Send + Sync {
    /// Reduce `node`, located at `at` in the host tree. Returns `false` on failure, with
    /// the cause reported to `diagnostics`.
    fn reduce(&self, node: &mut Node, at: &NodePath, diagnostics: &mut Diagnostics) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReducerConfig {
    /// `None` waits for the renderer indefinitely.
    pub render_timeout: Option<Duration>,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            render_timeout: Some(DEFAULT_RENDER_TIMEOUT),
        }
    }
}

/// Everything a renderer needs, derived from a chart invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedChart {
    pub kind: ChartKind,
    pub options: ChartOptions,
    pub table: DataTable,
    pub render_options: RenderOptions,
}

/// Validate a chart invocation (`Chart.*` node with data and an optional option list).
///
/// Error paths are relative to `invocation`.
pub fn prepare_chart(invocation: &Node) -> Result<PreparedChart, Vec<ChartError>> {
    let root = NodePath::root();
    let Some(kind) = ChartKind::from_tag(invocation.tag()) else {
        return Err(vec![ChartError::validation(root, "Not a chart expression")]);
    };
    let Some(data) = invocation.child(0) else {
        return Err(vec![ChartError::validation(root, "Chart has no data")]);
    };
    let option_nodes = match invocation.child(1) {
        None => &[][..],
        Some(list) if matches!(list.kind(), NodeKind::List | NodeKind::Matrix) => list.children(),
        Some(_) => {
            return Err(vec![ChartError::validation(root.child(1), "Options must be a list")]);
        }
    };

    let options = validate_options(kind, option_nodes, &root.child(1))?;
    let table = build_table(kind, data, &options, &root.child(0)).map_err(|e| vec![e])?;
    let render_options = render_options(kind, &options);
    Ok(PreparedChart {
        kind,
        options,
        table,
        render_options,
    })
}

/// Reducer for all chart kinds.
#[derive(Clone)]
pub struct ChartReducer {
    renderer: Arc<dyn ChartRenderer>,
    config: ReducerConfig,
}

impl ChartReducer {
    pub fn new(renderer: Arc<dyn ChartRenderer>) -> Self {
        Self::with_config(renderer, ReducerConfig::default())
    }

    pub fn with_config(renderer: Arc<dyn ChartRenderer>, config: ReducerConfig) -> Self {
        Self { renderer, config }
    }

    pub fn config(&self) -> ReducerConfig {
        self.config
    }

    /// Run the renderer on a worker thread and wait for its single result.
    ///
    /// On timeout the worker is left to finish on its own; its result is dropped.
    pub fn render(&self, prepared: PreparedChart) -> Result<Bitmap, ChartError> {
        let (tx, rx) = mpsc::channel();
        let renderer = Arc::clone(&self.renderer);
        let PreparedChart {
            kind,
            table,
            render_options,
            ..
        } = prepared;

        thread::Builder::new()
            .name("chart-render".into())
            .spawn(move || {
                let result = renderer.render(kind, &table, &render_options);
                // The receiver is gone after a timeout.
                let _ = tx.send(result);
            })
            .map_err(|e| ChartError::Render {
                message: format!("cannot start renderer: {e}"),
            })?;

        let received = match self.config.render_timeout {
            Some(after) => rx.recv_timeout(after).map_err(|e| match e {
                RecvTimeoutError::Timeout => {
                    log::warn!("{} renderer timed out after {after:?}", kind.tag());
                    ChartError::Timeout { after }
                }
                RecvTimeoutError::Disconnected => renderer_vanished(),
            }),
            None => rx.recv().map_err(|_| renderer_vanished()),
        }?;

        received.map_err(|e| ChartError::Render {
            message: format!("{e:#}"),
        })
    }
}

fn renderer_vanished() -> ChartError {
    ChartError::Render {
        message: "renderer stopped without producing an image".to_string(),
    }
}

impl Reducer for ChartReducer {
    fn reduce(&self, node: &mut Node, at: &NodePath, diagnostics: &mut Diagnostics) -> bool {
        let prepared = match prepare_chart(node) {
            Ok(prepared) => prepared,
            Err(errors) => {
                for e in &errors {
                    diagnostics.report(at, e);
                }
                return false;
            }
        };
        log::debug!(
            "{}: {} rows x {} columns, {}x{} px",
            prepared.kind.tag(),
            prepared.table.row_count(),
            prepared.table.column_count(),
            prepared.render_options.width,
            prepared.render_options.height
        );

        match self.render(prepared) {
            Ok(bitmap) => {
                *node = Node::RasterGraphics { value: bitmap };
                true
            }
            Err(e) => {
                diagnostics.report(at, &e);
                false
            }
        }
    }
}

/// Dispatches nodes to reducers by host tag.
#[derive(Default)]
pub struct ReductionManager {
    reducers: HashMap<String, Arc<dyn Reducer>>,
}

impl ReductionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `reducer` for `tag`, replacing any previous registration.
    pub fn add_reducer(&mut self, tag: impl Into<String>, reducer: Arc<dyn Reducer>) {
        self.reducers.insert(tag.into(), reducer);
    }

    pub fn has_reducer(&self, tag: &str) -> bool {
        self.reducers.contains_key(tag)
    }

    /// Reduce `node` if a reducer is registered for its tag.
    ///
    /// Returns `None` when nothing is registered, otherwise the reducer's success flag.
    pub fn reduce(&self, node: &mut Node, at: &NodePath, diagnostics: &mut Diagnostics) -> Option<bool> {
        let reducer = self.reducers.get(node.tag())?;
        log::debug!("reducing {} at {at}", node.tag());
        Some(reducer.reduce(node, at, diagnostics))
    }

    /// Reduce every registered node of the tree, children before parents.
    ///
    /// Returns `false` if any reduction failed.
    pub fn reduce_tree(&self, root: &mut Node, diagnostics: &mut Diagnostics) -> bool {
        self.reduce_subtree(root, &NodePath::root(), diagnostics)
    }

    fn reduce_subtree(&self, node: &mut Node, at: &NodePath, diagnostics: &mut Diagnostics) -> bool {
        let mut ok = true;
        if let Node::List(children) | Node::Other { children, .. } = node {
            for (i, child) in children.iter_mut().enumerate() {
                ok &= self.reduce_subtree(child, &at.child(i), diagnostics);
            }
        }
        if !ok {
            return false;
        }
        self.reduce(node, at, diagnostics).unwrap_or(true)
    }
}

/// Register `reducer` for every chart kind.
pub fn register_chart_reducers(manager: &mut ReductionManager, reducer: Arc<ChartReducer>) {
    for kind in ChartKind::ALL {
        manager.add_reducer(kind.tag(), reducer.clone());
    }
}
