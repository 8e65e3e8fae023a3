//! Expression-tree nodes as seen by the chart reducers.
//!
//! The host expression system is modelled as a closed [`Node`] enum. Callers discriminate
//! nodes through [`NodeKind`] instead of comparing tag strings; everything the chart
//! package does not understand is an [`Node::Other`] carrying its host tag and children.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bitmap::Bitmap;
use crate::error::ChartError;

/// Host tag of an option (`name = value`) node.
pub const OPTION_TAG: &str = "Expression.Option";
/// Host tag of the raster-graphics node that replaces a rendered chart.
pub const RASTER_GRAPHICS_TAG: &str = "Graphics.RasterGraphics";

pub const ADDITION_TAG: &str = "Math.Arithmetic.Addition";
pub const MULTIPLICATION_TAG: &str = "Math.Arithmetic.Multiplication";
pub const NEGATIVE_TAG: &str = "Math.Arithmetic.Negative";
pub const DIVISION_TAG: &str = "Math.Arithmetic.Division";

/// Discriminant of a node, as used by the validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Number,
    String,
    Boolean,
    Color,
    List,
    /// A non-empty list of lists that all have the same, non-zero length.
    Matrix,
    Null,
    Other,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Node {
    Number(f64),
    String(String),
    Boolean(bool),
    /// Color with channels in `[0, 1]`.
    Color { red: f64, green: f64, blue: f64 },
    List(Vec<Node>),
    Null,
    /// Result of a rendered chart; `value` is its single attribute.
    RasterGraphics { value: Bitmap },
    /// Any other host expression, e.g. a chart invocation or an option.
    Other { tag: String, children: Vec<Node> },
}

impl Node {
    pub fn number(value: impl Into<f64>) -> Self {
        Node::Number(value.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::String(value.into())
    }

    pub fn color(red: f64, green: f64, blue: f64) -> Self {
        Node::Color { red, green, blue }
    }

    pub fn list(children: impl IntoIterator<Item = Node>) -> Self {
        Node::List(children.into_iter().collect())
    }

    /// Build a matrix as a list of row lists.
    pub fn matrix(rows: impl IntoIterator<Item = Vec<Node>>) -> Self {
        Node::List(rows.into_iter().map(Node::List).collect())
    }

    pub fn other(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Other {
            tag: tag.into(),
            children,
        }
    }

    /// An option node `name = value`.
    pub fn option(name: impl Into<String>, value: Node) -> Self {
        Node::other(OPTION_TAG, vec![Node::string(name), value])
    }

    /// Host-style tag of this node.
    pub fn tag(&self) -> &str {
        match self {
            Node::Number(_) => "Math.Number",
            Node::String(_) => "String.String",
            Node::Boolean(true) => "Logic.True",
            Node::Boolean(false) => "Logic.False",
            Node::Color { .. } => "Color.Color",
            Node::List(_) => "List.List",
            Node::Null => "Null",
            Node::RasterGraphics { .. } => RASTER_GRAPHICS_TAG,
            Node::Other { tag, .. } => tag,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Number(_) => NodeKind::Number,
            Node::String(_) => NodeKind::String,
            Node::Boolean(_) => NodeKind::Boolean,
            Node::Color { .. } => NodeKind::Color,
            Node::List(_) if self.matrix_columns().is_some() => NodeKind::Matrix,
            Node::List(_) => NodeKind::List,
            Node::Null => NodeKind::Null,
            Node::RasterGraphics { .. } | Node::Other { .. } => NodeKind::Other,
        }
    }

    /// Ordered children; scalars have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::List(children) | Node::Other { children, .. } => children,
            _ => &[],
        }
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children().get(index)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer value of a canonical number, if it is integral and fits in an `i64`.
    pub fn native_integer(&self) -> Option<i64> {
        match self {
            Node::Number(n)
                if n.is_finite()
                    && n.fract() == 0.0
                    && *n >= i64::MIN as f64
                    && *n <= i64::MAX as f64 =>
            {
                Some(*n as i64)
            }
            _ => None,
        }
    }

    /// Number of columns if this node is a matrix.
    pub fn matrix_columns(&self) -> Option<usize> {
        let Node::List(rows) = self else {
            return None;
        };
        let first = match rows.first()? {
            Node::List(cells) if !cells.is_empty() => cells.len(),
            _ => return None,
        };
        rows.iter()
            .all(|row| matches!(row, Node::List(cells) if cells.len() == first))
            .then_some(first)
    }

    /// Reduce this node to a native number.
    ///
    /// `at` is the path of this node; it localizes the error.
    pub fn evaluate(&self, at: &NodePath) -> Result<f64, ChartError> {
        let value = match self {
            Node::Number(n) => *n,
            Node::Other { tag, children } => {
                let operands = children
                    .iter()
                    .enumerate()
                    .map(|(i, c)| c.evaluate(&at.child(i)))
                    .collect::<Result<Vec<f64>, _>>()
                    // The whole expression is non-numeric, not just the operand.
                    .map_err(|_| ChartError::not_numeric(at.clone()))?;
                match (tag.as_str(), operands.as_slice()) {
                    (ADDITION_TAG, ops) if !ops.is_empty() => ops.iter().sum(),
                    (MULTIPLICATION_TAG, ops) if !ops.is_empty() => ops.iter().product(),
                    (NEGATIVE_TAG, [x]) => -x,
                    (DIVISION_TAG, [n, d]) => n / d,
                    _ => return Err(ChartError::not_numeric(at.clone())),
                }
            }
            _ => return Err(ChartError::not_numeric(at.clone())),
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ChartError::not_numeric(at.clone()))
        }
    }
}

/// Position of a node as child indexes from the reduced (invocation) node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indexes = self.0.clone();
        indexes.push(index);
        Self(indexes)
    }

    pub fn indexes(&self) -> &[usize] {
        &self.0
    }

    /// Resolve this path against `root`.
    pub fn resolve<'a>(&self, root: &'a Node) -> Option<&'a Node> {
        self.0.iter().try_fold(root, |node, &i| node.child(i))
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indexes: Vec<usize>) -> Self {
        Self(indexes)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for i in &self.0 {
            write!(f, "/{i}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_detection_requires_equal_row_lengths() {
        let m = Node::matrix(vec![
            vec![Node::number(1), Node::number(2)],
            vec![Node::number(3), Node::number(4)],
        ]);
        assert_eq!(m.kind(), NodeKind::Matrix);
        assert_eq!(m.matrix_columns(), Some(2));

        let ragged = Node::matrix(vec![vec![Node::number(1), Node::number(2)], vec![Node::number(3)]]);
        assert_eq!(ragged.kind(), NodeKind::List);

        let empty = Node::list(Vec::new());
        assert_eq!(empty.kind(), NodeKind::List);
        assert_eq!(empty.matrix_columns(), None);
    }

    #[test]
    fn evaluate_arithmetic_and_reject_symbols() {
        let at = NodePath::root();
        let sum = Node::other(ADDITION_TAG, vec![Node::number(2), Node::number(3.5)]);
        assert_eq!(sum.evaluate(&at).unwrap(), 5.5);

        let neg = Node::other(NEGATIVE_TAG, vec![sum]);
        assert_eq!(neg.evaluate(&at).unwrap(), -5.5);

        let sym = Node::other("Symbolic.Symbol", Vec::new());
        let err = sym.evaluate(&at.child(4)).unwrap_err();
        assert_eq!(err.path(), Some(&NodePath::from(vec![4])));
        assert_eq!(err.message(), "Value is not numeric");

        let div0 = Node::other(DIVISION_TAG, vec![Node::number(1), Node::number(0)]);
        assert!(div0.evaluate(&at).is_err());
    }

    #[test]
    fn native_integer_only_for_integral_numbers() {
        assert_eq!(Node::number(-3).native_integer(), Some(-3));
        assert_eq!(Node::number(2.5).native_integer(), None);
        assert_eq!(Node::string("2").native_integer(), None);
    }

    #[test]
    fn path_resolves_and_displays() {
        let tree = Node::other("Chart.Bar", vec![Node::list(vec![Node::number(7)])]);
        let p = NodePath::root().child(0).child(0);
        assert_eq!(p.resolve(&tree), Some(&Node::number(7)));
        assert_eq!(p.to_string(), "/0/0");
        assert_eq!(NodePath::root().to_string(), "/");
    }
}
