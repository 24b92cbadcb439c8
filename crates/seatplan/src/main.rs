//! Seatplan entry point.
//!
//! Runs one allocation from the command line: import the roster, create the
//! halls, apply the class drops in order, then print the seating document.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()             -- institution names, hall defaults, log level
//!  └─ read_roster_rows()        -- CSV → rows → SeatingSession::import_roster
//!  └─ create_hall() per --hall
//!  └─ handle(DropClass) per --drop
//!       └─ resolve_pending()    -- --middle answers, then stdin
//!  └─ render_text() / render_json()
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use seatplan::application::render_plan::{render_json, render_text, ExamMetadata};
use seatplan::application::session::{Command, DropOutcome, SeatingSession};
use seatplan::infrastructure::prompt::{
    resolve_pending, Resolution, ScriptedPrompt, TerminalPrompt,
};
use seatplan::infrastructure::roster_file::read_roster_rows;
use seatplan::infrastructure::storage::config::{self, AppConfig};
use seatplan_core::HallConfig;

/// Exam hall seating planner.
#[derive(Debug, Parser)]
#[command(name = "seatplan", version, about)]
struct Cli {
    /// Configuration file (defaults to the platform config directory).
    #[arg(long, env = "SEATPLAN_CONFIG")]
    config: Option<PathBuf>,

    /// Write the effective configuration back to the config file.
    #[arg(long)]
    save_config: bool,

    /// Roster CSV: class names in the first row, register numbers below.
    #[arg(long, env = "SEATPLAN_ROSTER")]
    roster: Option<PathBuf>,

    /// Hall to create, as NAME:ROWSxCOLS or NAME:ROWSxCOLSxCAP. Repeatable.
    #[arg(long = "hall", value_name = "NAME:ROWSxCOLSxCAP")]
    halls: Vec<HallSpec>,

    /// Class to drop on a hall, as CLASS@HALL. Applied in order. Repeatable.
    #[arg(long = "drop", value_name = "CLASS@HALL")]
    drops: Vec<DropSpec>,

    /// Answer for the next middle-seat decision. Repeatable.
    #[arg(long = "middle", value_name = "CLASS")]
    middle: Vec<String>,

    /// Exam date (YYYY-MM-DD). Defaults to today.
    #[arg(long, env = "SEATPLAN_EXAM_DATE")]
    date: Option<String>,

    /// Overrides the configured exam title.
    #[arg(long, env = "SEATPLAN_EXAM_TITLE")]
    exam_title: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the document here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Overrides the configured log level (RUST_LOG still wins).
    #[arg(long, env = "SEATPLAN_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

// ── Argument values ──────────────────────────────────────────────────────────

/// A `--hall` value. Capacity falls back to the configured default.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HallSpec {
    name: String,
    rows: u32,
    cols: u32,
    capacity: Option<u32>,
}

impl HallSpec {
    fn to_hall_config(&self, default_capacity: u32) -> HallConfig {
        HallConfig::new(
            self.name.clone(),
            self.rows,
            self.cols,
            self.capacity.unwrap_or(default_capacity),
        )
    }
}

impl FromStr for HallSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, dims) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected NAME:ROWSxCOLS[xCAP], got {s:?}"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err("hall name must not be empty".to_string());
        }
        let numbers = dims
            .split(['x', 'X'])
            .map(|n| {
                n.trim()
                    .parse::<u32>()
                    .map_err(|_| format!("{n:?} is not a number in {s:?}"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        match numbers.as_slice() {
            [rows, cols] => Ok(Self {
                name: name.to_string(),
                rows: *rows,
                cols: *cols,
                capacity: None,
            }),
            [rows, cols, cap] => Ok(Self {
                name: name.to_string(),
                rows: *rows,
                cols: *cols,
                capacity: Some(*cap),
            }),
            _ => Err(format!("expected ROWSxCOLS or ROWSxCOLSxCAP, got {dims:?}")),
        }
    }
}

/// A `--drop` value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DropSpec {
    class_name: String,
    hall_name: String,
}

impl FromStr for DropSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (class_name, hall_name) = s
            .rsplit_once('@')
            .ok_or_else(|| format!("expected CLASS@HALL, got {s:?}"))?;
        let (class_name, hall_name) = (class_name.trim(), hall_name.trim());
        if class_name.is_empty() || hall_name.is_empty() {
            return Err(format!("expected CLASS@HALL, got {s:?}"));
        }
        Ok(Self {
            class_name: class_name.to_string(),
            hall_name: hall_name.to_string(),
        })
    }
}

// ── main ─────────────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => config::config_file_path().ok(),
    };
    let config = match &config_path {
        Some(path) => config::load_config(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };

    // Logs go to stderr; stdout carries the document. Level is overridden by `RUST_LOG`.
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();

    info!("Seatplan starting");

    if cli.save_config {
        let path = config_path.as_ref().context("no config path available to save to")?;
        config::save_config(&config, path)
            .with_context(|| format!("saving config to {}", path.display()))?;
        info!(path = %path.display(), "configuration saved");
    }

    let mut session = SeatingSession::new(config.hall_defaults.to_hall_config());

    // ── Roster ───────────────────────────────────────────────────────────────
    match &cli.roster {
        Some(path) => {
            let rows = read_roster_rows(path)
                .with_context(|| format!("reading roster {}", path.display()))?;
            session.import_roster(rows).context("importing roster")?;
        }
        None => warn!("no roster given; halls will be printed empty"),
    }

    // ── Halls ────────────────────────────────────────────────────────────────
    if cli.halls.is_empty() {
        let defaults = session.last_hall_config().clone();
        session
            .create_hall(&defaults)
            .context("creating default hall")?;
    }
    for spec in &cli.halls {
        let hall_config = spec.to_hall_config(config.hall_defaults.capacity);
        session
            .create_hall(&hall_config)
            .with_context(|| format!("creating hall {:?}", spec.name))?;
    }

    // ── Drops ────────────────────────────────────────────────────────────────
    let stdin = io::stdin();
    let mut prompt = ScriptedPrompt::new(
        cli.middle.iter().cloned(),
        TerminalPrompt::new(stdin.lock(), io::stderr()),
    );

    for spec in &cli.drops {
        let Some(hall_id) = session.halls().find_by_name(&spec.hall_name).map(|h| h.id) else {
            bail!("--drop {}@{}: no hall with that name", spec.class_name, spec.hall_name);
        };
        let outcome = session
            .handle(Command::DropClass {
                class_name: spec.class_name.clone(),
                hall_id,
            })
            .with_context(|| format!("dropping {} on {}", spec.class_name, spec.hall_name))?;

        match outcome {
            DropOutcome::AwaitingDecision(_) => {
                match resolve_pending(&mut session, &mut prompt).context("middle-seat decision")? {
                    Resolution::Decided(report) => info!(
                        class = %spec.class_name,
                        hall = %spec.hall_name,
                        middle = %report.middle_class,
                        placed = report.placed_incoming,
                        remaining = report.remaining_incoming,
                        "drop applied"
                    ),
                    Resolution::Cancelled(_) => {
                        warn!(class = %spec.class_name, hall = %spec.hall_name, "drop cancelled")
                    }
                }
            }
            DropOutcome::Unresolved => {
                warn!(class = %spec.class_name, "unknown class, drop ignored")
            }
            other => {
                info!(class = %spec.class_name, hall = %spec.hall_name, ?other, "drop applied")
            }
        }
    }
    if prompt.remaining() > 0 {
        warn!(unused = prompt.remaining(), "some --middle answers were not needed");
    }

    let unseated = session.roster().total_available();
    info!(
        seated = session.halls().seated_count(),
        unseated,
        written_off = session.written_off().len(),
        "allocation finished"
    );

    // ── Document ─────────────────────────────────────────────────────────────
    let meta = ExamMetadata {
        college_name: config.institution.college_name.clone(),
        department_name: config.institution.department_name.clone(),
        exam_title: cli
            .exam_title
            .clone()
            .unwrap_or_else(|| config.institution.exam_title.clone()),
        exam_date: Some(exam_date_or_today(
            cli.date.clone(),
            chrono::Local::now().date_naive(),
        )),
    };
    let sheets = session.hall_sheets();
    let document = match cli.format {
        OutputFormat::Text => render_text(&sheets, &meta),
        OutputFormat::Json => render_json(&sheets, &meta),
    }
    .context("rendering seating plan")?;

    match &cli.out {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "seating plan written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{document}").context("writing seating plan to stdout")?;
        }
    }

    info!("Seatplan finished");
    Ok(())
}

/// The exam date to print: the one given, or `today` as `YYYY-MM-DD`.
fn exam_date_or_today(given: Option<String>, today: chrono::NaiveDate) -> String {
    given.unwrap_or_else(|| today.format("%Y-%m-%d").to_string())
}
