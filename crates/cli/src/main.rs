use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};

use tabshare_cli::{AppConfig, Scenario};
use tabshare_observability::LogFormat;
use tabshare_report::{ReportFormat, render};
use tabshare_session::Session;

#[derive(Parser)]
#[command(name = "tabshare")]
#[command(about = "Split shared expenses and work out who owes whom", version)]
struct Cli {
    /// Path to a TOML config file ([session], [report], [logging])
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log output format (overrides the config file)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a scenario and render the full summary
    Report {
        /// Scenario TOML file
        #[arg(short, long)]
        scenario: PathBuf,

        /// Output format: text, html or json
        #[arg(short, long, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replay a scenario and print only the settlement transfers
    Settle {
        /// Scenario TOML file
        #[arg(short, long)]
        scenario: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    match cli.verbose {
        0 => {}
        1 => config.logging.level = "debug".to_string(),
        _ => config.logging.level = "trace".to_string(),
    }
    tabshare_observability::init(&config.logging);

    match cli.command {
        Command::Report {
            scenario,
            format,
            output,
        } => {
            let session = replay(&scenario, &config)?;
            let document = render(format, &session.snapshot(), &config.report)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, document)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), %format, "report written");
                }
                None => print!("{document}"),
            }
        }
        Command::Settle { scenario } => {
            let session = replay(&scenario, &config)?;
            let settlements = session.settlements();

            if settlements.is_empty() {
                println!("{}", tabshare_report::text::ALL_SETTLED);
            }
            for s in settlements {
                println!("{} -> {}: {}", s.from.name, s.to.name, config.report.money(s.amount));
            }
        }
    }

    Ok(())
}

fn replay(path: &std::path::Path, config: &AppConfig) -> anyhow::Result<Session> {
    let scenario = Scenario::from_file(path)?;
    let mut session = Session::new(config.session.clone());

    let issues = scenario.replay(&mut session);
    tracing::info!(
        scenario = %path.display(),
        participants = session.participants().len(),
        expenses = session.expenses().len(),
        skipped = issues.len(),
        "scenario replayed"
    );

    Ok(session)
}
