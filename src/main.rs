mod app;
mod util;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use losses_dashboard::charts::{ChartSpec, render_all};
use losses_dashboard::filter::FilterChain;
use losses_dashboard::losses::{Dataset, MetricId, load_dataset, prepare};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Combined loss table (CSV with a header row)
    #[arg(long, global = true, default_value = "all_losses.csv")]
    data: PathBuf,

    /// Debug logging plus a dataset reload button in the dashboard
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the chart descriptions for one selection as JSON
    Render(RenderArgs),
    /// Build the combined table from the per-side exports
    Prepare(PrepareArgs),
}

#[derive(Debug, clap::Args)]
struct RenderArgs {
    /// Equipment type to include (repeatable)
    #[arg(long)]
    equipment: Vec<String>,

    /// Manufacturer to include (repeatable, defaults to every available one)
    #[arg(long)]
    manufacturer: Vec<String>,

    /// Model to include (repeatable, defaults to every available one)
    #[arg(long)]
    model: Vec<String>,

    /// Bubble chart x-axis column
    #[arg(long)]
    x: Option<String>,

    /// Bubble chart y-axis column
    #[arg(long)]
    y: Option<String>,

    /// Bubble size column
    #[arg(long)]
    size: Option<String>,

    /// Loss type plotted by the pie and bar charts
    #[arg(long)]
    loss_type: Option<String>,

    /// Split the pie and bar charts into one panel per side
    #[arg(long)]
    dual: bool,
}

#[derive(Debug, clap::Args)]
struct PrepareArgs {
    #[arg(long)]
    russia: PathBuf,

    #[arg(long)]
    ukraine: PathBuf,

    #[arg(long, default_value = "all_losses.csv")]
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let result = match args.command {
        None => run_dashboard(args.data, args.debug),
        Some(Command::Render(render)) => run_render(&args.data, render),
        Some(Command::Prepare(plan)) => run_prepare(plan),
    };

    report(result)
}

/// Logs a failure once, with its context chain, and maps it to the exit status.
fn report(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_dashboard(data: PathBuf, debug: bool) -> Result<()> {
    let dataset = load_dataset(&data)
        .with_context(|| format!("cannot start without data from {}", data.display()))?;
    let dataset = Arc::new(dataset);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 960.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Equipment losses",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::DashboardApp::new(cc, data, dataset, debug)))
        }),
    )
    .map_err(|error| anyhow!("dashboard window failed: {error}"))
}

fn run_render(data: &Path, args: RenderArgs) -> Result<()> {
    let dataset =
        load_dataset(data).with_context(|| format!("failed to load {}", data.display()))?;

    let mut chain = FilterChain::new(&dataset);
    if !args.equipment.is_empty() {
        chain.set_equipment(&dataset, Some(args.equipment));
    }
    if !args.manufacturer.is_empty() {
        chain.set_manufacturer(&dataset, Some(args.manufacturer));
    }
    if !args.model.is_empty() {
        chain.set_model(Some(args.model));
    }

    let defaults = ChartSpec::default_bubble(dataset.schema());
    let bubble = ChartSpec::bubble(
        resolve_axis(&dataset, args.x.as_deref())?.or(defaults.x),
        resolve_axis(&dataset, args.y.as_deref())?.or(defaults.y),
        resolve_axis(&dataset, args.size.as_deref())?.or(defaults.size),
    );
    let loss_type = ChartSpec::loss_type(
        resolve_axis(&dataset, args.loss_type.as_deref())?
            .or(ChartSpec::default_loss_type(dataset.schema()).y),
    );

    let charts = render_all(chain.selection(), &bubble, &loss_type, args.dual, &dataset);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &charts).context("failed to encode charts")?;
    writeln!(handle).context("failed to write charts")?;
    Ok(())
}

fn resolve_axis(dataset: &Dataset, name: Option<&str>) -> Result<Option<MetricId>> {
    name
        .map(|name| dataset.schema().axis_by_name(name))
        .transpose()
        .map_err(anyhow::Error::from)
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    let summary = prepare::prepare(&args.russia, &args.ukraine, &args.output)
        .context("failed to prepare the combined loss table")?;
    println!(
        "wrote {} rows ({} russia, {} ukraine) with {} columns to {}",
        summary.russia_rows + summary.ukraine_rows,
        summary.russia_rows,
        summary.ukraine_rows,
        summary.columns,
        args.output.display()
    );
    Ok(())
}
