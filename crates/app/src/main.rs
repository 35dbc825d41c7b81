use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use sdg_core::FormLayout;
use sdg_core::model::ProjectId;
use services::{AppServices, AssessmentConfig, AssessmentService, Clock, GoalRange, ResultsService};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://sdg_assessment.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidProjectId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidLayout { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidProjectId { raw } => write!(f, "invalid --project value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidLayout { raw } => {
                write!(f, "invalid --layout value (expected single or paged): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn project_id(&self) -> ProjectId {
        self.services.project_id()
    }

    fn assessments(&self) -> Arc<AssessmentService> {
        self.services.assessments()
    }

    fn results(&self) -> Arc<ResultsService> {
        self.services.results()
    }
}

struct Args {
    db_url: String,
    project_id: ProjectId,
    layout: FormLayout,
    extended_goals: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- ui           [--db <sqlite_url>] [--project <id>] [--layout single|paged] [--extended-goals]"
    );
    eprintln!("  cargo run -p app -- clear-drafts [--db <sqlite_url>] [--project <id>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --project 1");
    eprintln!("  --layout single");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SDG_DB_URL, SDG_PROJECT_ID, SDG_LAYOUT");
    eprintln!("  SDG_SERVER_URL, SDG_CSRF_TOKEN  # server-side progress saving");
    eprintln!("  RUST_LOG                        # default: info,sqlx=warn");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    ClearDrafts,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "clear-drafts" => Some(Self::ClearDrafts),
            _ => None,
        }
    }
}

fn parse_layout(raw: &str) -> Option<FormLayout> {
    match raw.trim() {
        "single" | "single-page" => Some(FormLayout::SinglePage),
        "paged" | "multi-page" => Some(FormLayout::Paged),
        _ => None,
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("SDG_DB_URL")
            .ok()
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut project_id = std::env::var("SDG_PROJECT_ID")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or_else(|| ProjectId::new(1), ProjectId::new);
        let mut layout = std::env::var("SDG_LAYOUT")
            .ok()
            .and_then(|value| parse_layout(&value))
            .unwrap_or_default();
        let mut extended_goals = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--project" => {
                    let value = require_value(args, "--project")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidProjectId { raw: value.clone() })?;
                    project_id = ProjectId::new(parsed);
                }
                "--layout" => {
                    let value = require_value(args, "--layout")?;
                    layout = parse_layout(&value)
                        .ok_or_else(|| ArgsError::InvalidLayout { raw: value.clone() })?;
                }
                "--extended-goals" => extended_goals = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            project_id,
            layout,
            extended_goals,
        })
    }

    fn config(&self) -> AssessmentConfig {
        AssessmentConfig {
            layout: self.layout,
            goals: if self.extended_goals {
                GoalRange::Extended
            } else {
                GoalRange::Canonical
            },
            ..AssessmentConfig::default()
        }
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,sqlx=warn".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(
        &parsed.db_url,
        Clock::default(),
        parsed.project_id,
        &parsed.config(),
    )
    .await?;

    match cmd {
        Command::Ui => {
            info!(
                project = %parsed.project_id,
                layout = ?parsed.layout,
                extended = parsed.extended_goals,
                "launching assessment window"
            );
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("SDG Self-Assessment")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::ClearDrafts => {
            let cleared = services.drafts().clear_project(parsed.project_id).await;
            eprintln!("cleared {cleared} draft(s) for project {}", parsed.project_id);
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
