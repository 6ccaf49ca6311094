use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use su_usage::responsive::{DEFAULT_CHART_WIDTH, responsive_profile};
use su_usage::{ChartState, DisplayMode, RenderOptions, UsageInput};
use su_usage::{storage, viz};

#[derive(Parser, Debug)]
#[command(
    name = "su-usage",
    version,
    about = "Interpolate, tabulate, export & chart monthly resource-usage costs"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the stacked usage chart to a PNG file.
    Render(RenderArgs),
    /// Print the day-by-day table.
    Table(TableArgs),
    /// Write `su_usage_<mode>.csv` into a directory.
    Export(ExportArgs),
    /// Print the hover tooltip for one day.
    Tooltip(TooltipArgs),
    /// Print tick spacing and font sizes for a surface width.
    Profile(ProfileArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum Mode {
    #[default]
    Cumulative,
    Daily,
}

impl From<Mode> for DisplayMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Cumulative => DisplayMode::Cumulative,
            Mode::Daily => DisplayMode::Daily,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TableFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// JSON input `{ year, month, datasets }`; omitted selects the sample data.
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Year (defaults to the input's, then the current year).
    #[arg(long)]
    year: Option<i32>,
    /// Zero-indexed month 0-11 (defaults to the input's, then the current month).
    #[arg(long)]
    month: Option<u32>,
    #[arg(long, value_enum, default_value_t = Mode::Cumulative)]
    mode: Mode,
    /// Hide the series with this label (repeatable).
    #[arg(long)]
    hide: Vec<String>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output PNG path.
    #[arg(short, long, default_value = "su_usage.png")]
    out: PathBuf,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 400)]
    height: u32,
    /// TrueType font for labels; without one the chart is drawn without text.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Locale for value-axis labels (en, de, fr, es, it, pt, nl).
    #[arg(long, default_value = "en")]
    locale: String,
}

#[derive(Args, Debug)]
struct TableArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long, value_enum, default_value_t = TableFormat::Text)]
    format: TableFormat,
    /// Also save the table as JSON.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct TooltipArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Day of month, 1-based.
    #[arg(long)]
    day: usize,
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[arg(long, default_value_t = DEFAULT_CHART_WIDTH)]
    width: f64,
    /// Number of axis labels.
    #[arg(long, default_value_t = 30)]
    labels: usize,
}

fn load_state(args: &InputArgs) -> Result<ChartState> {
    let mut input = match &args.input {
        Some(path) => storage::load_input(path)?,
        None => UsageInput::default(),
    };
    if args.year.is_some() {
        input.year = args.year;
    }
    if args.month.is_some() {
        input.month = args.month;
    }
    let mut state = ChartState::from_input(input)?;
    state.switch_mode(args.mode.into());
    for label in &args.hide {
        if !state.hide_label(label) {
            log::warn!("--hide {label}: no series with that label");
        }
    }
    Ok(state)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Table(args) => cmd_table(args),
        Command::Export(args) => cmd_export(args),
        Command::Tooltip(args) => cmd_tooltip(args),
        Command::Profile(args) => cmd_profile(args),
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let state = load_state(&args.input)?;
    if let Some(font) = &args.font {
        viz::register_font_file(font)?;
    }
    let opts = RenderOptions {
        width: args.width,
        height: args.height,
        locale: args.locale,
        ..RenderOptions::default()
    };
    let chart = viz::render_chart(&state, &opts)?;
    viz::save_png(&chart, &args.out)?;
    println!("{}", args.out.display());
    Ok(())
}

fn cmd_table(args: TableArgs) -> Result<()> {
    let state = load_state(&args.input)?;
    let table = state.table();
    match args.format {
        TableFormat::Text => {
            println!("{}", state.title());
            println!("{}", state.subtitle());
            println!();
            print!("{table}");
        }
        TableFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
    }
    if let Some(path) = &args.out {
        storage::save_table_json(&table, path)?;
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    let state = load_state(&args.input)?;
    let path = su_usage::export::save_csv(
        state.labels(),
        &state.current_datasets(),
        state.mode(),
        &args.out_dir,
    )?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_tooltip(args: TooltipArgs) -> Result<()> {
    let state = load_state(&args.input)?;
    if args.day == 0 || args.day > state.labels().len() {
        bail!("--day must be between 1 and {}", state.labels().len());
    }
    // Short series are drawn with one padding slot in front.
    let offset = usize::from(state.is_low_data());
    match state.tooltip(args.day - 1 + offset) {
        Some(tooltip) => print!("{tooltip}"),
        None => println!("no data for day {}", args.day),
    }
    Ok(())
}

fn cmd_profile(args: ProfileArgs) -> Result<()> {
    let profile = responsive_profile(args.labels, args.width);
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}
