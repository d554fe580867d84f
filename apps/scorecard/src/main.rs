use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scorecard::config::Config;
use scorecard::models::{ScoringSettingsUpdate, ScoringWeights};
use scorecard::{ApiClient, Concern, ControllerOptions, ScoreController, ScoreState};

#[derive(Parser)]
#[command(name = "scorecard")]
#[command(about = "Predictive-success scores, insights and scoring settings for candidates", long_about = None)]
struct Cli {
    /// Backend base URL (overrides SCORECARD_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Bearer token (overrides SCORECARD_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a fresh score for a candidate
    Score {
        candidate: String,
        #[arg(long)]
        job: Option<String>,
    },
    /// Show the candidate's score history
    History {
        candidate: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show existing AI insights, or generate new ones
    Insights {
        candidate: String,
        #[arg(long)]
        job: Option<String>,
        #[arg(long)]
        generate: bool,
    },
    /// Show effective scoring settings (job-scoped when --job is given)
    Settings {
        #[arg(long)]
        job: Option<String>,
    },
    /// Recalculate score and reload history and insights together
    Refresh {
        candidate: String,
        #[arg(long)]
        job: Option<String>,
    },
    /// Validate and save category weights (global unless --job is given)
    SaveWeights {
        #[arg(long)]
        job: Option<String>,
        #[arg(long)]
        skill_match: f64,
        #[arg(long)]
        personality_fit: f64,
        #[arg(long)]
        experience: f64,
        #[arg(long)]
        education: f64,
        #[arg(long)]
        profile_quality: f64,
    },
    /// Remove a job's settings override so global defaults apply again
    ResetJob {
        #[arg(long)]
        job: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.base_url.clone(), cli.token.clone())?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting scorecard v{}", env!("CARGO_PKG_VERSION"));

    let api = Arc::new(
        ApiClient::from_config(&config).context("Failed to build scoring API client")?,
    );
    info!("Scoring API client initialized ({})", config.api_base_url);

    let controller = |options: ControllerOptions| ScoreController::new(api.clone(), options);

    match cli.command {
        Commands::Score { candidate, job } => {
            let ctl = controller(with_job(ControllerOptions::for_candidate(candidate), job));
            ctl.calculate_score(None).await;
            report(&ctl.state(), &[Concern::Score])
        }
        Commands::History { candidate, limit } => {
            let ctl = controller(ControllerOptions::for_candidate(candidate));
            ctl.fetch_history(limit).await;
            report(&ctl.state(), &[Concern::History])
        }
        Commands::Insights {
            candidate,
            job,
            generate,
        } => {
            let ctl = controller(with_job(ControllerOptions::for_candidate(candidate), job));
            if generate {
                ctl.generate_insights(None).await;
            } else {
                ctl.fetch_insights().await;
            }
            report(&ctl.state(), &[Concern::Insights])
        }
        Commands::Settings { job } => {
            let ctl = controller(with_job(ControllerOptions::default(), job));
            ctl.fetch_settings(None).await;
            report(&ctl.state(), &[Concern::Settings])
        }
        Commands::Refresh { candidate, job } => {
            let ctl = controller(with_job(ControllerOptions::for_candidate(candidate), job));
            ctl.refresh().await;
            report(
                &ctl.state(),
                &[Concern::Score, Concern::History, Concern::Insights],
            )
        }
        Commands::SaveWeights {
            job,
            skill_match,
            personality_fit,
            experience,
            education,
            profile_quality,
        } => {
            let ctl = controller(with_job(ControllerOptions::default(), job));
            let update = ScoringSettingsUpdate {
                weights: Some(ScoringWeights {
                    skill_match,
                    personality_fit,
                    experience,
                    education,
                    profile_quality,
                }),
                ..Default::default()
            };
            ctl.save_settings(update, None).await;
            report(&ctl.state(), &[Concern::Settings])
        }
        Commands::ResetJob { job } => {
            let ctl = controller(ControllerOptions::default().with_job(job));
            ctl.reset_job_settings(None).await;
            report(&ctl.state(), &[Concern::Settings])
        }
    }
}

fn with_job(options: ControllerOptions, job: Option<String>) -> ControllerOptions {
    match job {
        Some(job) => options.with_job(job),
        None => options,
    }
}

/// Prints the requested concerns as JSON and fails if any of them carries an error.
fn report(state: &ScoreState, concerns: &[Concern]) -> Result<()> {
    let mut out = serde_json::Map::new();
    for &concern in concerns {
        let (key, value) = match concern {
            Concern::Score => ("score", serde_json::to_value(&state.score)?),
            Concern::History => ("history", serde_json::to_value(&state.history)?),
            Concern::Insights => ("insights", serde_json::to_value(&state.insights)?),
            Concern::Settings => (
                "settings",
                json!({
                    "effective": state.settings,
                    "jobSpecific": state.settings_are_job_specific,
                }),
            ),
        };
        out.insert(
            key.to_string(),
            json!({ "value": value, "error": state.error_for(concern) }),
        );
    }
    println!("{}", serde_json::to_string_pretty(&Value::Object(out))?);

    let failures: Vec<&str> = concerns
        .iter()
        .filter_map(|&c| state.error_for(c))
        .collect();
    if !failures.is_empty() {
        bail!("{}", failures.join("; "));
    }
    Ok(())
}
