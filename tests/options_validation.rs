use expr_chart::error::INVALID_FOR_CHART;
use expr_chart::types::BackgroundColor;
use expr_chart::{ChartError, ChartKind, LegendPosition, Node, NodePath, SeriesNames, SliceText, Stacking, validate_options};

fn opt(name: &str, value: Node) -> Node {
    Node::option(name, value)
}

/// The single error of an option list expected to fail once.
fn single_error(kind: ChartKind, options: &[Node]) -> ChartError {
    let mut errors = validate_options(kind, options, &NodePath::root()).expect_err("options must fail");
    assert_eq!(errors.len(), 1, "{errors:?}");
    errors.remove(0)
}

fn path(indexes: &[usize]) -> NodePath {
    NodePath::from(indexes.to_vec())
}

#[test]
fn defaults_without_options() {
    let o = validate_options(ChartKind::Bar, &[], &NodePath::root()).unwrap();
    assert_eq!((o.width, o.height), (400, 300));
    assert!(o.horizontal_domain);
    assert_eq!(o.starting, 1);
    assert_eq!(o.legend_position, LegendPosition::Bottom);
    assert_eq!(o.slice_text, SliceText::Percentage);
    assert!(o.series_names.is_none());
}

#[test]
fn accepts_a_full_cartesian_option_list() {
    let options = [
        opt("Size", Node::list([Node::number(640), Node::number(480)])),
        opt("Title", Node::string("Revenue")),
        opt("Domain Text", Node::string("Quarter")),
        opt("Range Text", Node::string("EUR")),
        opt("Series Names", Node::list([Node::string("North"), Node::string("South")])),
        opt("Horizontal Domain", Node::Boolean(false)),
        opt("Stacking", Node::string("Relative")),
        opt("Legend Position", Node::string("Right")),
        opt("Logarithmic Scale", Node::Boolean(true)),
        opt("Starting", Node::number(2000)),
        opt("Dot Size", Node::number(3)),
    ];
    let o = validate_options(ChartKind::Line, &options, &NodePath::root()).unwrap();
    assert_eq!((o.width, o.height), (640, 480));
    assert_eq!(o.title.as_deref(), Some("Revenue"));
    assert_eq!(o.domain_text.as_deref(), Some("Quarter"));
    assert_eq!(o.range_text.as_deref(), Some("EUR"));
    assert_eq!(
        o.series_names,
        Some(SeriesNames::Many(vec!["North".into(), "South".into()]))
    );
    assert!(!o.horizontal_domain);
    assert_eq!(o.stacking, Some(Stacking::Relative));
    assert_eq!(o.legend_position, LegendPosition::Right);
    assert!(o.is_logarithmic());
    assert_eq!(o.starting, 2000);
    assert_eq!(o.dot_size, Some(3));
}

#[test]
fn pie_options() {
    let options = [
        opt("3D", Node::Boolean(true)),
        opt("Slice Text", Node::string("label")),
        opt("Legend Position", Node::string("beside slice")),
    ];
    let o = validate_options(ChartKind::Pie, &options, &NodePath::root()).unwrap();
    assert!(o.is_3d);
    assert_eq!(o.slice_text, SliceText::Label);
    assert_eq!(o.legend_position, LegendPosition::Labeled);
}

#[test]
fn size_reports_the_offending_element() {
    let e = single_error(
        ChartKind::Bar,
        &[opt("size", Node::list([Node::number(10), Node::number(-5)]))],
    );
    assert_eq!(e.path(), Some(&path(&[0, 1, 1])));
    assert_eq!(e.message(), "Value is not a valid number");

    let e = single_error(ChartKind::Bar, &[opt("size", Node::list([Node::number(10)]))]);
    assert_eq!(e.path(), Some(&path(&[0, 1])));

    let e = single_error(
        ChartKind::Bar,
        &[opt("size", Node::list([Node::number(10.5), Node::number(20)]))],
    );
    assert_eq!(e.path(), Some(&path(&[0, 1, 0])));
}

#[test]
fn pie_only_options_are_rejected_for_other_kinds() {
    let e = single_error(ChartKind::Bar, &[opt("3d", Node::Boolean(true))]);
    assert_eq!(e.message(), INVALID_FOR_CHART);
    assert_eq!(e.path(), Some(&path(&[0])));

    let e = single_error(ChartKind::Line, &[opt("slice text", Node::string("value"))]);
    assert_eq!(e.message(), INVALID_FOR_CHART);
    assert_eq!(e.path(), Some(&path(&[0, 1])));

    let e = single_error(ChartKind::Area, &[opt("legend position", Node::string("beside slice"))]);
    assert_eq!(e.message(), INVALID_FOR_CHART);
    assert_eq!(e.path(), Some(&path(&[0, 1])));
}

#[test]
fn axis_options_are_rejected_for_pie() {
    for (name, value, at) in [
        ("domain text", Node::string("x"), path(&[0])),
        ("range text", Node::string("y"), path(&[0])),
        ("series names", Node::string("s"), path(&[0])),
        ("horizontal domain", Node::Boolean(true), path(&[0])),
        ("stacking", Node::string("absolute"), path(&[0])),
        ("logarithmic scale", Node::Boolean(true), path(&[0, 1])),
    ] {
        let e = single_error(ChartKind::Pie, &[opt(name, value)]);
        assert_eq!(e.message(), INVALID_FOR_CHART, "{name}");
        assert_eq!(e.path(), Some(&at), "{name}");
    }
}

#[test]
fn value_type_errors() {
    let e = single_error(ChartKind::Bar, &[opt("title", Node::number(1))]);
    assert_eq!(e.message(), "Value is not a string");
    assert_eq!(e.path(), Some(&path(&[0, 1])));

    let e = single_error(ChartKind::Bar, &[opt("stacking", Node::string("sideways"))]);
    assert_eq!(e.message(), "Invalid option");

    let e = single_error(ChartKind::Bar, &[opt("horizontal domain", Node::string("yes"))]);
    assert_eq!(e.message(), "Option is not a boolean value");

    let e = single_error(ChartKind::Dot, &[opt("dot size", Node::string("big"))]);
    assert_eq!(e.message(), "Value is not a valid number");

    let e = single_error(
        ChartKind::Bar,
        &[opt("series names", Node::list([Node::string("a"), Node::number(2)]))],
    );
    assert_eq!(e.message(), "Value is not a string");
    assert_eq!(e.path(), Some(&path(&[0, 1, 1])));

    let e = single_error(ChartKind::Bar, &[opt("series names", Node::List(Vec::new()))]);
    assert_eq!(e.message(), "Empty list");
}

#[test]
fn unknown_and_malformed_options() {
    let e = single_error(ChartKind::Bar, &[opt("colour scheme", Node::string("x"))]);
    assert_eq!(e.message(), "Unknown option");
    assert_eq!(e.path(), Some(&path(&[0, 0])));

    let e = single_error(ChartKind::Bar, &[Node::number(3)]);
    assert_eq!(e.message(), "Invalid option");
    assert_eq!(e.path(), Some(&path(&[0])));
}

#[test]
fn background_color_variants() {
    let o = validate_options(
        ChartKind::Bar,
        &[opt("background color", Node::color(1.0, 0.0, 0.5))],
        &NodePath::root(),
    )
    .unwrap();
    let color = o.background_color.unwrap();
    assert_eq!(color.css(), "#ff0080");

    let o = validate_options(ChartKind::Pie, &[opt("background color", Node::Null)], &NodePath::root())
        .unwrap();
    assert_eq!(o.background_color, Some(BackgroundColor::Transparent));
    assert_eq!(o.background_color.unwrap().css(), "transparent");

    let e = single_error(ChartKind::Bar, &[opt("background color", Node::color(1.5, 0.0, 0.0))]);
    assert_eq!(e.message(), "Invalid option");
    let e = single_error(ChartKind::Bar, &[opt("background color", Node::string("red"))]);
    assert_eq!(e.path(), Some(&path(&[0, 1])));
}

#[test]
fn every_failing_option_is_reported() {
    let options = [
        opt("title", Node::number(1)),
        opt("size", Node::list([Node::number(100), Node::number(100)])),
        opt("3d", Node::Boolean(true)),
    ];
    let errors = validate_options(ChartKind::Bar, &options, &path(&[1])).unwrap_err();
    let paths: Vec<_> = errors.iter().filter_map(|e| e.path().cloned()).collect();
    assert_eq!(paths, vec![path(&[1, 0, 1]), path(&[1, 2])]);
}

#[test]
fn revalidation_is_idempotent() {
    let options = [
        opt("size", Node::list([Node::number(300), Node::number(200)])),
        opt("title", Node::string("T")),
        opt("series names", Node::string("only")),
        opt("background color", Node::color(0.2, 0.4, 0.6)),
        opt("starting", Node::number(-3)),
    ];
    let a = validate_options(ChartKind::Step, &options, &NodePath::root()).unwrap();
    let b = validate_options(ChartKind::Step, &options, &NodePath::root()).unwrap();
    assert_eq!(a, b);
}
