use crate::table::{DataTable, Value};
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column headers: labels where present, otherwise `category` / `series N`.
pub fn table_headers(table: &DataTable) -> Vec<String> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| match (&c.label, i) {
            (Some(label), _) => label.clone(),
            (None, 0) => "category".to_string(),
            (None, i) => format!("series {i}"),
        })
        .collect()
}

/// Save a data table as CSV with header.
pub fn save_table_csv<P: AsRef<Path>>(table: &DataTable, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(table_headers(table))?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(|v| match v {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
        }))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a data table as pretty JSON (`columns` and `rows`).
pub fn save_table_json<P: AsRef<Path>>(table: &DataTable, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(table)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodePath};
    use crate::options::ChartOptions;
    use crate::table::build_table;
    use crate::types::ChartKind;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let data = Node::list([Node::number(1.5), Node::number(2)]);
        let table =
            build_table(ChartKind::Line, &data, &ChartOptions::default(), &NodePath::root()).unwrap();
        save_table_csv(&table, &csvp).unwrap();
        save_table_json(&table, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());
        let csv = std::fs::read_to_string(&csvp).unwrap();
        assert_eq!(csv.lines().next(), Some("category,series 1"));
    }
}
