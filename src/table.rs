//! Tabular data model handed to renderers, and its derivation from the data node.
//!
//! Two data shapes are accepted:
//! - a flat list of scalars: one implicit series, categories `starting, starting + 1, …`;
//! - a matrix: column 0 holds the categories (strings or numbers), columns `1..` the series.

use serde::{Deserialize, Serialize};

use crate::error::ChartError;
use crate::node::{Node, NodeKind, NodePath};
use crate::options::ChartOptions;
use crate::types::{ChartKind, SeriesNames};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    #[serde(rename = "type")]
    pub ty: ColumnType,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    String(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Number(_) => None,
        }
    }
}

/// Typed columns plus rows aligned with them by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl DataTable {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of series, i.e. columns after the category column.
    pub fn series_count(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row)?.get(column)
    }

    /// Values of series `s` (0-based, excluding the category column).
    pub fn series_values(&self, s: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(s + 1).and_then(Value::as_f64).unwrap_or(0.0))
    }

    /// Display label of the category in `row`.
    pub fn category_label(&self, row: usize) -> String {
        match self.value(row, 0) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) if n.fract() == 0.0 => format!("{}", *n as i64),
            Some(Value::Number(n)) => n.to_string(),
            None => String::new(),
        }
    }

    fn add_column(&mut self, ty: ColumnType, label: Option<&str>) {
        self.columns.push(Column {
            ty,
            label: label.map(str::to_string),
        });
    }
}

/// Derive the table for a chart of `kind` from `data`, located at `at`.
pub fn build_table(
    kind: ChartKind,
    data: &Node,
    options: &ChartOptions,
    at: &NodePath,
) -> Result<DataTable, ChartError> {
    match data.kind() {
        NodeKind::Matrix => build_from_matrix(kind, data, options, at),
        NodeKind::List => build_from_list(kind, data.children(), options, at),
        _ => Err(ChartError::validation(at.clone(), "Invalid data")),
    }
}

fn build_from_list(
    kind: ChartKind,
    items: &[Node],
    options: &ChartOptions,
    at: &NodePath,
) -> Result<DataTable, ChartError> {
    let series_name = match &options.series_names {
        None => None,
        Some(SeriesNames::Single(name)) => Some(name.as_str()),
        Some(SeriesNames::Many(_)) => {
            return Err(ChartError::validation(
                at.clone(),
                "Series names must be a single string for single-series data",
            ));
        }
    };

    let mut table = DataTable::default();
    table.add_column(ColumnType::Number, None);
    table.add_column(ColumnType::Number, series_name);

    for (r, item) in items.iter().enumerate() {
        let cell_at = at.child(r);
        let number = series_value(kind, item, options, &cell_at)?;
        let index = options.starting as f64 + r as f64;
        table.rows.push(vec![Value::Number(index), Value::Number(number)]);
    }
    log::debug!("flat data: {} rows, 1 series", table.row_count());
    Ok(table)
}

fn build_from_matrix(
    kind: ChartKind,
    data: &Node,
    options: &ChartOptions,
    at: &NodePath,
) -> Result<DataTable, ChartError> {
    let rows = data.children();
    let cols = data.matrix_columns().unwrap_or(0);

    if cols == 1 {
        return Err(ChartError::validation(at.clone(), "Data has no series"));
    }
    if let Some(names) = &options.series_names
        && names.len() != cols - 1
    {
        return Err(ChartError::validation(at.clone(), "Series data and names do not match"));
    }

    let categories_are_strings = rows
        .first()
        .and_then(|row| row.child(0))
        .is_some_and(|cell| cell.kind() == NodeKind::String);
    if kind.is_pie() && !categories_are_strings {
        return Err(ChartError::validation(
            at.clone(),
            "Pie chart must have non-numerical categories",
        ));
    }

    let mut table = DataTable::default();
    table.add_column(
        if categories_are_strings { ColumnType::String } else { ColumnType::Number },
        None,
    );
    for c in 1..cols {
        let label = options.series_names.as_ref().and_then(|names| names.get(c - 1));
        table.add_column(ColumnType::Number, label);
    }

    for (r, row) in rows.iter().enumerate() {
        let row_at = at.child(r);
        let cells = row.children();
        let mut values = Vec::with_capacity(cols);

        let category_at = row_at.child(0);
        let category = if categories_are_strings {
            match cells[0].as_str() {
                Some(s) => Value::String(s.to_string()),
                None => return Err(ChartError::validation(category_at, "Invalid type")),
            }
        } else {
            Value::Number(cells[0].evaluate(&category_at)?)
        };
        values.push(category);

        for (c, cell) in cells.iter().enumerate().skip(1) {
            let number = series_value(kind, cell, options, &row_at.child(c))?;
            values.push(Value::Number(number));
        }
        table.rows.push(values);
    }
    log::debug!(
        "matrix data: {} rows, {} series, {} categories",
        table.row_count(),
        table.series_count(),
        if categories_are_strings { "string" } else { "numeric" }
    );
    Ok(table)
}

/// Evaluate a series cell and apply the positivity constraints.
fn series_value(
    kind: ChartKind,
    cell: &Node,
    options: &ChartOptions,
    at: &NodePath,
) -> Result<f64, ChartError> {
    let number = cell.evaluate(at)?;
    if number <= 0.0 {
        if kind.is_pie() {
            return Err(ChartError::validation(at.clone(), "Non-positive value for pie chart"));
        }
        if options.is_logarithmic() {
            return Err(ChartError::validation(
                at.clone(),
                "Non-positive value for logarithmic scale",
            ));
        }
    }
    Ok(number)
}
