use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use tracing::warn;

mod aggregate;
mod config;
mod db;
mod error;
mod models;
mod report;
mod source;
mod status;

use crate::models::{AttendanceOverview, AttendanceStatus};

#[derive(Parser)]
#[command(name = "campus-attendance")]
#[command(about = "Student attendance aggregation for the campus connect backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load demo students, subjects and attendance
    Seed,
    /// Upsert attendance rows from a CSV file (email,subject,date,status)
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Record one student's attendance for a class
    Mark {
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        status: AttendanceStatus,
    },
    /// Print per-subject and overall attendance for a student
    Summary {
        #[arg(long)]
        email: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn aggregate_or_interrupt(
    source: Arc<dyn source::AttendanceSource>,
    email: &str,
) -> anyhow::Result<AttendanceOverview> {
    tokio::select! {
        result = aggregate::fetch_and_aggregate(source, email) => {
            if let Some(operation) = result.as_ref().err().and_then(|err| err.operation()) {
                warn!(%operation, "attendance fetch failed");
            }
            result.with_context(|| format!("failed to aggregate attendance for {email}"))
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, abandoning in-flight attendance fetches");
            anyhow::bail!("aggregation interrupted")
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = config::Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let written = db::import_csv(&pool, &csv).await?;
            println!("Wrote {written} attendance rows from {}.", csv.display());
        }
        Commands::Mark {
            email,
            subject,
            date,
            status,
        } => {
            db::mark_attendance(&pool, &email, &subject, date, status).await?;
            println!("Marked {email} {status} for {subject} on {date}.");
        }
        Commands::Summary { email, format } => {
            let source = Arc::new(db::PgAttendanceSource::new(pool.clone()));
            let overview = aggregate_or_interrupt(source, &email).await?;

            match format {
                OutputFormat::Text => print!("{}", report::render_summary(&email, &overview)),
                OutputFormat::Json => {
                    let payload = serde_json::json!({
                        "email": email,
                        "overview": overview,
                        "status": status::classify_status(overview.overall_percentage),
                        "color": status::color_band(overview.overall_percentage),
                    });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
            }
        }
        Commands::Report { email, out } => {
            let source = Arc::new(db::PgAttendanceSource::new(pool.clone()));
            let overview = aggregate_or_interrupt(source, &email).await?;
            let report = report::build_report(&email, &overview);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
