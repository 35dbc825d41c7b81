use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sdg_core::demo::fill_demo_answers;
use sdg_core::model::{Assessment, ProjectId};
use sdg_core::{FormStore, Questionnaire};
use storage::repository::{NewSubmission, Storage};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    project_id: ProjectId,
    submissions: u32,
    extended: bool,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidProjectId { raw: String },
    InvalidSubmissions { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidProjectId { raw } => write!(f, "invalid --project value: {raw}"),
            ArgsError::InvalidSubmissions { raw } => {
                write!(f, "invalid --submissions value: {raw}")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("SDG_DB_URL").unwrap_or_else(|_| "sqlite:sdg_assessment.sqlite3".into());
        let mut project_id = std::env::var("SDG_PROJECT_ID")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or_else(|| ProjectId::new(1), ProjectId::new);
        let mut submissions = 3;
        let mut extended = false;
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--project" => {
                    let value = require_value(&mut args, "--project")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidProjectId { raw: value.clone() })?;
                    project_id = ProjectId::new(parsed);
                }
                "--submissions" => {
                    let value = require_value(&mut args, "--submissions")?;
                    submissions = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidSubmissions { raw: value.clone() })?;
                }
                "--extended-goals" => extended = true,
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
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
            submissions,
            extended,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:sdg_assessment.sqlite3)");
    eprintln!("  --project <id>            Project id to attach submissions to (default: 1)");
    eprintln!("  --submissions <n>         Number of sample submissions to append (default: 3)");
    eprintln!("  --extended-goals          Include the experimental goals 18 to 27");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  SDG_DB_URL, SDG_PROJECT_ID");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);
    let questionnaire = Arc::new(if args.extended {
        Questionnaire::extended()
    } else {
        Questionnaire::canonical()
    });

    for i in 0..args.submissions {
        let assessment = Assessment::new(args.project_id, None, questionnaire.goals())?;
        let mut store = FormStore::new(assessment, Arc::clone(&questionnaire));
        fill_demo_answers(&mut store, i as usize)?;

        let submitted_at = now - Duration::days(i64::from(i) * 7);
        let mut assessment = store.into_assessment();
        assessment.finalize(submitted_at)?;
        storage
            .submissions
            .append_submission(&NewSubmission::new(assessment, submitted_at))
            .await?;
    }

    println!(
        "Seeded {} submissions for project {} into {}",
        args.submissions,
        args.project_id.value(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
