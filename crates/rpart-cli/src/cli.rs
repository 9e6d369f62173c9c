use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rpart_core::RandomColors;
use rpart_tree::{Editor, EditorConfig, PartitionTree, TreeSnapshot};
use serde::Serialize;

use crate::error::{CliError, Result};
use crate::render::{RenderOptions, render_text};
use crate::script::{Script, run_script};
use crate::settings::{init_tracing, load_config, load_json, with_canvas_overrides};

#[derive(Debug, Parser)]
#[command(
    name = "rpart",
    about = "Headless driver for the recursive partition editor",
    version
)]
pub struct Cli {
    /// Log filter (e.g. `debug`, `rpart_tree=trace`); `RUST_LOG` wins when set.
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay an event script and print the resulting tree.
    Run(RunArgs),

    /// Render a tree snapshot as text.
    Render(RenderArgs),

    /// Show how a ratio would snap.
    Snap(SnapArgs),

    /// Print the effective configuration as TOML.
    #[command(name = "print-config")]
    PrintConfig(ConfigArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// TOML config file.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct CanvasArgs {
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub width: Option<u16>,

    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub height: Option<u16>,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// JSON script: `{ "events": [...] }`.
    pub script: PathBuf,

    #[command(flatten)]
    pub canvas: CanvasArgs,

    /// Seed for region colors; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Record rejected events and continue instead of aborting.
    #[arg(long = "keep-going")]
    pub keep_going: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Tree snapshot JSON.
    pub snapshot: PathBuf,

    #[command(flatten)]
    pub canvas: CanvasArgs,

    /// Overlay divider hit zones.
    #[arg(long)]
    pub dividers: bool,

    /// Omit the region legend.
    #[arg(long = "no-legend")]
    pub no_legend: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Clone, Args)]
pub struct SnapArgs {
    /// Raw ratio to evaluate.
    #[arg(allow_negative_numbers = true)]
    pub ratio: f64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref(), cli.log_json);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let output = execute(cli.command)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Run one command and return what it would print.
pub fn execute(command: Commands) -> Result<String> {
    match command {
        Commands::Run(args) => execute_run(args),
        Commands::Render(args) => execute_render(args),
        Commands::Snap(args) => execute_snap(args),
        Commands::PrintConfig(args) => execute_print_config(args),
    }
}

fn effective_config(config: &ConfigArgs, canvas: &CanvasArgs) -> Result<EditorConfig> {
    let loaded = load_config(config.config.as_deref())?;
    with_canvas_overrides(loaded, canvas.width, canvas.height)
}

fn to_json(value: &impl Serialize) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

fn execute_run(args: RunArgs) -> Result<String> {
    let config = effective_config(&args.config, &args.canvas)?;
    let script = Script::load(&args.script)?;
    let colors = args
        .seed
        .map_or_else(RandomColors::from_os_rng, RandomColors::seeded);
    let mut editor = Editor::new(config, colors)?;
    let report = run_script(&mut editor, script, args.keep_going)?;

    match args.format {
        OutputFormat::Json => to_json(&report),
        OutputFormat::Text => {
            let mut out = render_text(
                &editor.layout(),
                RenderOptions {
                    dividers: false,
                    legend: true,
                },
            );
            out.push_str(&format!(
                "\nrevision {}  leaves {}  depth {}  hash {}\n",
                report.revision, report.leaf_count, report.depth, report.state_hash
            ));
            Ok(out)
        }
    }
}

fn execute_render(args: RenderArgs) -> Result<String> {
    let config = effective_config(&args.config, &args.canvas)?;
    let snapshot: TreeSnapshot = load_json(&args.snapshot)?;
    let tree = PartitionTree::from_snapshot(&snapshot)?;
    let layout = tree.solve_layout(config.canvas.area());
    Ok(render_text(
        &layout,
        RenderOptions {
            dividers: args.dividers,
            legend: !args.no_legend,
        },
    ))
}

fn execute_snap(args: SnapArgs) -> Result<String> {
    if !args.ratio.is_finite() {
        return Err(CliError::invalid(format!(
            "ratio must be a finite number, got {}",
            args.ratio
        )));
    }
    let config = load_config(args.config.config.as_deref())?;
    let outcome = config.snap.evaluate(args.ratio);
    match args.format {
        OutputFormat::Json => to_json(&outcome),
        OutputFormat::Text => Ok(match &outcome.target {
            Some(target) => format!(
                "{} -> {} (snapped to {})\n",
                outcome.input,
                outcome.ratio.get(),
                target.label
            ),
            None => format!("{} -> {}\n", outcome.input, outcome.ratio.get()),
        }),
    }
}

fn execute_print_config(args: ConfigArgs) -> Result<String> {
    let config = load_config(args.config.as_deref())?;
    Ok(toml::to_string_pretty(&config)?)
}
