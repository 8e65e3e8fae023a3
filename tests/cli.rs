use assert_cmd::prelude::*;
use expr_chart::Node;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

fn write_chart(dir: &Path, node: &Node) -> PathBuf {
    let path = dir.join("chart.json");
    std::fs::write(&path, serde_json::to_string(node).unwrap()).unwrap();
    path
}

fn bar_chart(options: Vec<Node>) -> Node {
    Node::other(
        "Chart.Bar",
        vec![
            Node::list([Node::number(3), Node::number(5), Node::number(2)]),
            Node::List(options),
        ],
    )
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("exprchart").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("exprchart"));
}

#[test]
fn render_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_chart(dir.path(), &bar_chart(vec![]));
    let out = dir.path().join("chart.png");

    let mut cmd = Command::cargo_bin("exprchart").unwrap();
    cmd.arg("render").arg("--input").arg(&input).arg("--out").arg(&out);
    cmd.assert().success();
    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

#[test]
fn render_reports_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_chart(
        dir.path(),
        &bar_chart(vec![Node::option(
            "size",
            Node::list([Node::number(10), Node::number(-5)]),
        )]),
    );
    let out = dir.path().join("chart.png");

    let mut cmd = Command::cargo_bin("exprchart").unwrap();
    cmd.args(["render", "--input"]).arg(&input).arg("--out").arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("/1/0/1/1: Value is not a valid number"));
    assert!(!out.exists());
}

#[test]
fn options_prints_the_bag() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_chart(
        dir.path(),
        &bar_chart(vec![Node::option("title", Node::string("Sales"))]),
    );
    let mut cmd = Command::cargo_bin("exprchart").unwrap();
    cmd.args(["options", "--input"]).arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"enableInteractivity\": false"))
        .stdout(predicate::str::contains("\"title\": \"Sales\""));
}

#[test]
fn table_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_chart(dir.path(), &bar_chart(vec![Node::option("starting", Node::number(0))]));
    let out = dir.path().join("table.txt");

    let mut cmd = Command::cargo_bin("exprchart").unwrap();
    cmd.args(["table", "--format", "csv", "--input"]).arg(&input).arg("--out").arg(&out);
    cmd.assert().success();
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("category,series 1\n0,3\n"));
}

#[test]
fn small_pie_renders_to_svg_with_the_bundled_font() {
    let dir = tempfile::tempdir().unwrap();
    let pie = Node::other(
        "Chart.Pie",
        vec![
            Node::matrix(vec![
                vec![Node::string("a"), Node::number(1)],
                vec![Node::string("b"), Node::number(2)],
            ]),
            Node::list([
                Node::option("size", Node::list([Node::number(30), Node::number(30)])),
                Node::option("title", Node::string("Tiny")),
            ]),
        ],
    );
    let input = write_chart(dir.path(), &pie);
    let out = dir.path().join("chart.svg");

    let mut cmd = Command::cargo_bin("exprchart").unwrap();
    cmd.args(["render", "--input"]).arg(&input).arg("--out").arg(&out);
    cmd.assert().success();
    assert!(std::fs::read_to_string(&out).unwrap().contains("<svg"));
}
