use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use expr_chart::error::Diagnostics;
use expr_chart::reduction::{ChartReducer, ReducerConfig, ReductionManager, register_chart_reducers};
use expr_chart::{ChartError, Node, NodePath, prepare_chart, storage, viz};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "exprchart",
    version,
    about = "Validate, tabulate & render chart expressions stored as JSON"
)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a chart invocation to PNG or SVG.
    Render(RenderArgs),
    /// Write the derived data table as CSV or JSON.
    Table(TableArgs),
    /// Print the render option bag as JSON.
    Options(InputArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// JSON file holding the chart invocation node.
    #[arg(short, long)]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output image (.png or .svg).
    #[arg(short, long)]
    out: PathBuf,
    /// Give up waiting for the renderer after this many seconds (0 waits forever).
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    /// TrueType/OpenType font used for titles, labels and legends (default: bundled DejaVu Sans).
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TableArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Save the table to file (format inferred by --format or extension).
    #[arg(short, long)]
    out: PathBuf,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let result = match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Table(args) => cmd_table(args),
        Command::Options(args) => cmd_options(args),
    };
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn read_node(path: &Path) -> Result<Node> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_errors(errors: &[ChartError]) {
    for e in errors {
        let path = e.path().cloned().unwrap_or_else(NodePath::root);
        eprintln!("{}: {}", path, e.message());
    }
}

fn load_font(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    // Registered fonts must live for the whole process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    if !viz::initialize(bytes) {
        bail!("{} is not a usable font", path.display());
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> Result<bool> {
    match &args.font {
        Some(font) => load_font(font)?,
        None => {
            viz::initialize_default();
        }
    }
    let mut node = read_node(&args.input.input)?;
    let out = &args.out;

    if out.extension().and_then(|e| e.to_str()) == Some("svg") {
        let prepared = match prepare_chart(&node) {
            Ok(p) => p,
            Err(errors) => {
                print_errors(&errors);
                return Ok(false);
            }
        };
        viz::render_to_file(prepared.kind, &prepared.table, &prepared.render_options, out)?;
        eprintln!("Wrote chart to {}", out.display());
        return Ok(true);
    }

    let config = ReducerConfig {
        render_timeout: (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs)),
    };
    let mut manager = ReductionManager::new();
    register_chart_reducers(
        &mut manager,
        Arc::new(ChartReducer::with_config(Arc::new(viz::PlottersRenderer), config)),
    );
    let mut diagnostics = Diagnostics::new();
    if !manager.reduce_tree(&mut node, &mut diagnostics) {
        for d in diagnostics.iter() {
            eprintln!("{}: {}", d.path, d.message);
        }
        return Ok(false);
    }
    match &node {
        Node::RasterGraphics { value } => {
            value.save_png(out)?;
            eprintln!("Wrote chart to {}", out.display());
            Ok(true)
        }
        other => bail!("{} is not a chart expression", other.tag()),
    }
}

fn cmd_table(args: TableArgs) -> Result<bool> {
    let node = read_node(&args.input.input)?;
    let prepared = match prepare_chart(&node) {
        Ok(p) => p,
        Err(errors) => {
            print_errors(&errors);
            return Ok(false);
        }
    };
    let path = &args.out;
    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_table_csv(&prepared.table, path)?,
        "json" => storage::save_table_json(&prepared.table, path)?,
        other => bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", prepared.table.row_count(), path.display());
    Ok(true)
}

fn cmd_options(args: InputArgs) -> Result<bool> {
    let node = read_node(&args.input)?;
    match prepare_chart(&node) {
        Ok(prepared) => {
            println!("{}", serde_json::to_string_pretty(&prepared.render_options)?);
            Ok(true)
        }
        Err(errors) => {
            print_errors(&errors);
            Ok(false)
        }
    }
}
