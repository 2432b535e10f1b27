use std::{
    fs::File,
    io::{self, BufReader, Read, Write},
    path::PathBuf,
};

use clap::{Parser, Subcommand, ValueEnum};
use jiff::{Zoned, tz::TimeZone};
use miette::IntoDiagnostic;
use serde_json::Value;
use time_range::{
    Clock, FixedClock, Resolver, Row, SinceUntil, SystemClock, WeekStart, calendar,
    filter_points, format, is_time_series_cell, process_rows, window::point_timestamp,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Parser, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[clap(long, global = true, help = "Path to the configuration file")]
    config: Option<PathBuf>,
    #[clap(
        long,
        global = true,
        value_enum,
        default_value = "warn",
        help = "Log level (error, warn, info, debug, trace)"
    )]
    log_level: LogLevel,
    #[clap(
        long,
        global = true,
        help = "Evaluate relative expressions at this instant instead of the wall clock"
    )]
    now: Option<String>,
    #[clap(long, global = true, help = "IANA time zone used for calendar arithmetic")]
    time_zone: Option<String>,
    #[clap(long, global = true, value_enum, help = "First day of the week")]
    week_start: Option<WeekStartArg>,
}

#[derive(Subcommand, Clone)]
enum Commands {
    #[command(about = "Resolve a time range expression to since and until instants")]
    Resolve(ResolveArgs),
    #[command(about = "Filter the time-series cells of JSON rows to a time range")]
    Filter(FilterArgs),
    #[command(about = "Print the points of a time-series cell that fall in a time range")]
    Points(PointsArgs),
    #[command(about = "Check whether a cell value holds a time-series array")]
    Sniff(SniffArgs),
}

#[derive(clap::Args, Clone, Debug)]
struct RangeArgs {
    #[clap(help = "Time range expression, e.g. \"last 7 days\" or \"2024-01-01 : now\"")]
    time_range: String,
    #[clap(long, help = "Left bound paired with bare \"next ...\" expressions")]
    relative_start: Option<String>,
    #[clap(long, help = "Right bound paired with bare \"last ...\" expressions")]
    relative_end: Option<String>,
}

#[derive(clap::Args, Clone, Debug)]
struct ResolveArgs {
    #[clap(flatten)]
    range: RangeArgs,
    #[clap(long, value_enum, default_value = "rfc3339", help = "Output format")]
    format: OutputFormat,
}

#[derive(clap::Args, Clone, Debug)]
struct FilterArgs {
    #[clap(flatten)]
    range: RangeArgs,
    #[clap(long = "column", short, help = "Column holding time-series cells (repeatable)")]
    columns: Vec<String>,
    #[clap(long, short, help = "JSON file with an array of rows, stdin if omitted")]
    input: Option<PathBuf>,
}

#[derive(clap::Args, Clone, Debug)]
struct PointsArgs {
    #[clap(flatten)]
    range: RangeArgs,
    #[clap(help = "Time-series cell, e.g. '[[\"2024-06-01\", 1234.5]]'")]
    cell: String,
    #[clap(long, default_value_t = 2, help = "Maximum fraction digits of values")]
    decimals: usize,
    #[clap(long, help = "Label points by month instead of by day")]
    monthly: bool,
}

#[derive(clap::Args, Clone, Debug)]
struct SniffArgs {
    #[clap(help = "Cell value to inspect")]
    value: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Rfc3339,
    Chart,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum WeekStartArg {
    Sunday,
    Monday,
}

impl From<WeekStartArg> for WeekStart {
    fn from(value: WeekStartArg) -> Self {
        match value {
            WeekStartArg::Sunday => WeekStart::Sunday,
            WeekStartArg::Monday => WeekStart::Monday,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::builder().from_env_lossy()
    } else {
        let level = args.log_level.as_str();
        EnvFilter::builder().parse_lossy(format!("time_range={level},time_range_cli={level}"))
    };
    let _ = tracing_subscriber::fmt::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .try_init();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(time_zone) = &args.time_zone {
        config.time_zone = Some(time_zone.clone());
    }
    if let Some(week_start) = args.week_start {
        config.week_start = week_start.into();
    }
    let tz = config.time_zone()?;
    let now = match &args.now {
        Some(now) => calendar::parse_datetime(now, &tz)?,
        None => SystemClock::new(tz.clone()).now(),
    };
    info!(%now, "evaluating");

    let mut stdout = io::stdout().lock();
    match args.command {
        Commands::Resolve(ResolveArgs {
            range,
            format: output,
        }) => {
            let range = resolve(&config, now, range)?;
            let render = |at: Option<&Zoned>| match (at, output) {
                (None, _) => "-".to_string(),
                (Some(at), OutputFormat::Rfc3339) => at.to_string(),
                (Some(at), OutputFormat::Chart) => format::chart_date(at, true),
            };
            writeln!(stdout, "since {}", render(range.since())).into_diagnostic()?;
            writeln!(stdout, "until {}", render(range.until())).into_diagnostic()?;
        }
        Commands::Filter(FilterArgs {
            range,
            columns,
            input,
        }) => {
            let columns = if columns.is_empty() {
                config.time_range_cols.clone()
            } else {
                columns
            };
            if columns.is_empty() {
                return Err(miette::miette!(
                    "No time-series columns given; pass --column or set time_range_cols"
                ));
            }
            let range = resolve(&config, now, range)?;
            let rows = read_rows(input)?;
            let rows = process_rows(&rows, &columns, &range)?;
            info!(rows = rows.len(), ?columns, "filtered rows");
            serde_json::to_writer_pretty(&mut stdout, &rows).into_diagnostic()?;
            writeln!(stdout).into_diagnostic()?;
        }
        Commands::Points(PointsArgs {
            range,
            cell,
            decimals,
            monthly,
        }) => {
            let range = resolve(&config, now, range)?;
            let points: Vec<Value> = serde_json::from_str(&cell).into_diagnostic()?;
            let points = match range.bounds() {
                Some((since, until)) => filter_points(&points, since, until)?,
                None => points,
            };
            for line in point_lines(&points, &tz, decimals, monthly)? {
                writeln!(stdout, "{line}").into_diagnostic()?;
            }
        }
        Commands::Sniff(SniffArgs { value }) => {
            writeln!(stdout, "{}", is_time_series_cell(&value)).into_diagnostic()?;
        }
    }
    Ok(())
}

fn resolve(config: &Config, now: Zoned, args: RangeArgs) -> miette::Result<SinceUntil> {
    let mut options = config.resolve_options();
    if args.relative_start.is_some() {
        options.relative_start = args.relative_start;
    }
    if args.relative_end.is_some() {
        options.relative_end = args.relative_end;
    }
    let resolver = Resolver::new(FixedClock(now), options);
    Ok(resolver.resolve(Some(&args.time_range))?)
}

/// One `label<TAB>amount` line per point; `-` when the value is not a number.
fn point_lines(
    points: &[Value],
    tz: &TimeZone,
    decimals: usize,
    monthly: bool,
) -> Result<Vec<String>, time_range::Error> {
    points
        .iter()
        .map(|point| -> Result<String, time_range::Error> {
            let at = point_timestamp(point, tz)?.to_zoned(tz.clone());
            let amount = match point.get(1).and_then(Value::as_f64) {
                Some(value) => format::standard_amount(value, decimals),
                None => "-".to_string(),
            };
            Ok(format!("{}\t{amount}", format::chart_date(&at, !monthly)))
        })
        .collect()
}

fn read_rows(input: Option<PathBuf>) -> miette::Result<Vec<Row>> {
    let reader: Box<dyn Read> = match input {
        Some(path) => Box::new(BufReader::new(File::open(&path).into_diagnostic()?)),
        None => Box::new(io::stdin().lock()),
    };
    serde_json::from_reader(reader).into_diagnostic()
}
