use expr_chart::table::{ColumnType, Value};
use expr_chart::{ChartKind, ChartOptions, Node, NodePath, SeriesNames, build_table};

fn n(v: f64) -> Node {
    Node::number(v)
}

fn s(v: &str) -> Node {
    Node::string(v)
}

fn path(indexes: &[usize]) -> NodePath {
    NodePath::from(indexes.to_vec())
}

fn quarters() -> Node {
    Node::matrix(vec![
        vec![s("Q1"), n(3.0), n(1.0)],
        vec![s("Q2"), n(5.0), n(2.0)],
        vec![s("Q3"), n(2.0), n(4.0)],
    ])
}

#[test]
fn flat_sequence_gets_index_categories() {
    let data = Node::list([n(4.0), n(8.0), n(15.0), n(16.0)]);
    let options = ChartOptions {
        starting: 10,
        ..ChartOptions::default()
    };
    let t = build_table(ChartKind::Line, &data, &options, &NodePath::root()).unwrap();
    assert_eq!(t.row_count(), 4);
    assert_eq!(t.column_count(), 2);
    assert!(t.columns().iter().all(|c| c.ty == ColumnType::Number));
    assert_eq!(t.value(0, 0), Some(&Value::Number(10.0)));
    assert_eq!(t.value(3, 0), Some(&Value::Number(13.0)));
    assert_eq!(t.series_values(0).collect::<Vec<_>>(), vec![4.0, 8.0, 15.0, 16.0]);
}

#[test]
fn flat_sequence_takes_a_single_series_name() {
    let data = Node::list([n(1.0), n(2.0)]);
    let options = ChartOptions {
        series_names: Some(SeriesNames::Single("Visitors".into())),
        ..ChartOptions::default()
    };
    let t = build_table(ChartKind::Bar, &data, &options, &NodePath::root()).unwrap();
    assert_eq!(t.columns()[1].label.as_deref(), Some("Visitors"));

    let options = ChartOptions {
        series_names: Some(SeriesNames::Many(vec!["a".into()])),
        ..ChartOptions::default()
    };
    let e = build_table(ChartKind::Bar, &data, &options, &NodePath::root()).unwrap_err();
    assert_eq!(e.path(), Some(&NodePath::root()));
}

#[test]
fn matrix_with_string_categories() {
    let options = ChartOptions {
        series_names: Some(SeriesNames::Many(vec!["North".into(), "South".into()])),
        ..ChartOptions::default()
    };
    let t = build_table(ChartKind::Bar, &quarters(), &options, &NodePath::root()).unwrap();
    assert_eq!(t.row_count(), 3);
    assert_eq!(t.column_count(), 3);
    assert_eq!(t.series_count(), 2);
    assert_eq!(t.columns()[0].ty, ColumnType::String);
    assert_eq!(t.columns()[1].label.as_deref(), Some("North"));
    assert_eq!(t.columns()[2].label.as_deref(), Some("South"));
    assert_eq!(t.category_label(1), "Q2");
    assert_eq!(t.series_values(1).collect::<Vec<_>>(), vec![1.0, 2.0, 4.0]);
}

#[test]
fn matrix_with_numeric_categories_evaluates_them() {
    let data = Node::matrix(vec![
        vec![n(2000.0), n(1.0)],
        vec![
            Node::other("Math.Arithmetic.Addition", vec![n(2000.0), n(1.0)]),
            n(2.0),
        ],
    ]);
    let t = build_table(ChartKind::Area, &data, &ChartOptions::default(), &NodePath::root()).unwrap();
    assert_eq!(t.columns()[0].ty, ColumnType::Number);
    assert_eq!(t.value(1, 0), Some(&Value::Number(2001.0)));
}

#[test]
fn category_type_is_fixed_by_the_first_row() {
    let data = Node::matrix(vec![vec![s("a"), n(1.0)], vec![n(2.0), n(2.0)]]);
    let e = build_table(ChartKind::Bar, &data, &ChartOptions::default(), &path(&[0])).unwrap_err();
    assert_eq!(e.message(), "Invalid type");
    assert_eq!(e.path(), Some(&path(&[0, 1, 0])));
}

#[test]
fn series_names_must_match_the_series_columns() {
    let options = ChartOptions {
        series_names: Some(SeriesNames::Many(vec!["only one".into()])),
        ..ChartOptions::default()
    };
    let e = build_table(ChartKind::Bar, &quarters(), &options, &path(&[0])).unwrap_err();
    assert_eq!(e.message(), "Series data and names do not match");
    assert_eq!(e.path(), Some(&path(&[0])));
}

#[test]
fn single_column_matrix_has_no_series() {
    let data = Node::matrix(vec![vec![s("a")], vec![s("b")]]);
    let e = build_table(ChartKind::Bar, &data, &ChartOptions::default(), &NodePath::root()).unwrap_err();
    assert_eq!(e.message(), "Data has no series");
}

#[test]
fn pie_requires_string_categories_and_positive_values() {
    let numeric = Node::matrix(vec![vec![n(1.0), n(3.0)], vec![n(2.0), n(4.0)]]);
    let e = build_table(ChartKind::Pie, &numeric, &ChartOptions::default(), &NodePath::root()).unwrap_err();
    assert_eq!(e.message(), "Pie chart must have non-numerical categories");

    let zero = Node::matrix(vec![vec![s("a"), n(3.0)], vec![s("b"), n(0.0)]]);
    let e = build_table(ChartKind::Pie, &zero, &ChartOptions::default(), &NodePath::root()).unwrap_err();
    assert!(e.message().contains("pie chart"), "{}", e.message());
    assert_eq!(e.path(), Some(&path(&[1, 1])));

    let ok = Node::matrix(vec![vec![s("a"), n(3.0)], vec![s("b"), n(1.0)]]);
    let t = build_table(ChartKind::Pie, &ok, &ChartOptions::default(), &NodePath::root()).unwrap();
    assert_eq!(t.row_count(), 2);
}

#[test]
fn logarithmic_scale_rejects_non_positive_values() {
    let options = ChartOptions {
        logarithmic_scale: Some(true),
        ..ChartOptions::default()
    };
    let data = Node::list([n(1.0), n(-2.0)]);
    let e = build_table(ChartKind::Line, &data, &options, &NodePath::root()).unwrap_err();
    assert!(e.message().contains("logarithmic scale"), "{}", e.message());
    assert_eq!(e.path(), Some(&path(&[1])));

    // Without the log scale the same data is fine.
    assert!(build_table(ChartKind::Line, &data, &ChartOptions::default(), &NodePath::root()).is_ok());
}

#[test]
fn non_numeric_cells_fail_evaluation() {
    let data = Node::list([n(1.0), s("two")]);
    let e = build_table(ChartKind::Bar, &data, &ChartOptions::default(), &NodePath::root()).unwrap_err();
    assert_eq!(e.message(), "Value is not numeric");
    assert_eq!(e.path(), Some(&path(&[1])));

    let e = build_table(ChartKind::Bar, &n(3.0), &ChartOptions::default(), &NodePath::root()).unwrap_err();
    assert_eq!(e.message(), "Invalid data");
}
