mod analysis;
mod clean;
mod parser;
mod pipeline;
mod scraper;
mod settings;
mod sources;
mod table;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use clean::runtime::ParsePolicy;
use pipeline::{Pipeline, Stage};
use settings::Settings;

#[derive(Parser)]
#[command(name = "originals", about = "Scrape, clean and chart Netflix originals listings")]
struct Cli {
    /// Directory holding the raw and cleaned CSV files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the listing pages into raw CSV files
    Scrape,
    /// Normalize the raw files into cleaned CSV files
    Clean {
        /// Leave unreadable movie runtimes missing instead of failing
        #[arg(long)]
        lenient_movies: bool,
    },
    /// Chart the cleaned files
    Analyze {
        /// Also write each chart as JSON here
        #[arg(long)]
        charts_dir: Option<PathBuf>,
    },
    /// Scrape, clean and analyze in one go
    Run {
        #[arg(long)]
        lenient_movies: bool,
        #[arg(long)]
        charts_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }

    let stages: &[Stage] = match cli.command {
        Commands::Scrape => &[Stage::Scrape],
        Commands::Clean { lenient_movies } => {
            apply_overrides(&mut settings, lenient_movies, None);
            &[Stage::Clean]
        }
        Commands::Analyze { charts_dir } => {
            apply_overrides(&mut settings, false, charts_dir);
            &[Stage::Analyze]
        }
        Commands::Run {
            lenient_movies,
            charts_dir,
        } => {
            apply_overrides(&mut settings, lenient_movies, charts_dir);
            &Stage::ALL
        }
    };

    let result = Pipeline::new(settings).run(stages).await;

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn apply_overrides(settings: &mut Settings, lenient_movies: bool, charts_dir: Option<PathBuf>) {
    if lenient_movies {
        settings.movie_runtime_policy = ParsePolicy::Lenient;
    }
    if charts_dir.is_some() {
        settings.charts_dir = charts_dir;
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
