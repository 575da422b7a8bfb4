use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use z_cli::{format_tokens, schedule_rows, Config, SimulationReport};
use z_token::{Clock, SystemClock};

#[derive(Parser)]
#[command(name = "ztoken")]
#[command(about = "Z Token issuance calculator")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print machine readable JSON instead of tables
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the yearly rate and full-year issuance
    Schedule {
        #[arg(short, long, default_value_t = 15)]
        years: u64,
    },

    /// Resolve the issuance year of a timestamp
    Year {
        #[arg(long)]
        at: u64,
    },

    /// Tokens accrued between two timestamps
    Mintable {
        /// Defaults to the mint watermark, which is the deploy time here
        #[arg(long)]
        from: Option<u64>,

        #[arg(long)]
        to: u64,
    },

    /// Replay periodic mints from deployment
    Simulate {
        /// Seconds between mints
        #[arg(long, default_value_t = 86_400)]
        every: u64,

        /// Seconds after deployment to stop at
        #[arg(long)]
        until: u64,

        /// Share of each mint burned right away, in basis points
        #[arg(long, default_value_t = 0)]
        burn_bps: u16,
    },
}

fn format_time(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            log::info!("No config given, using the default schedule");
            Config::default()
        }
    };
    let now = SystemClock.now();
    let (token, _clock) = config.deploy(now)?;

    match cli.command {
        Commands::Schedule { years } => {
            let rows = schedule_rows(token.engine(), years);
            if cli.json {
                return print_json(&rows);
            }

            println!(
                "{} {} ({}), base supply {}",
                "Schedule".cyan().bold(),
                token.name(),
                token.symbol(),
                format_tokens(token.base_supply())
            );
            println!("{:>6}  {:>8}  {:>28}", "Year", "Rate", "Issuance");
            for row in rows {
                println!(
                    "{:>6}  {:>7.2}%  {:>28}",
                    row.year,
                    f64::from(row.rate_bps) / 100.0,
                    format_tokens(row.tokens)
                );
            }
        }

        Commands::Year { at } => {
            let year = token.year_since_deploy(at)?;
            let rate = token.current_inflation_rate(year);
            if cli.json {
                return print_json(&serde_json::json!({
                    "timestamp": at,
                    "year": year,
                    "rate_bps": rate,
                    "year_start": token.engine().resolver().year_start(year),
                }));
            }

            println!("{}: {}", "Time".yellow().bold(), format_time(at));
            println!("{}: {}", "Year".yellow().bold(), year);
            println!("{}: {} bp", "Rate".yellow().bold(), rate);
        }

        Commands::Mintable { from, to } => {
            let (from, breakdown) = match from {
                Some(from) => (from, token.engine().breakdown(from, to)?),
                None => (token.last_mint_time(), token.mintable_breakdown(to)?),
            };
            let total = breakdown.total()?;
            if cli.json {
                return print_json(&serde_json::json!({
                    "from": from,
                    "to": to,
                    "breakdown": breakdown,
                    "total": total,
                }));
            }

            println!(
                "{} {} -> {}",
                "Window".yellow().bold(),
                format_time(from),
                format_time(to)
            );
            println!("  years      {} -> {}", breakdown.start_year, breakdown.end_year);
            println!("  remainder  {}", format_tokens(breakdown.remainder));
            println!("  full years {}", format_tokens(breakdown.full_years));
            println!("  partial    {}", format_tokens(breakdown.partial));
            println!("{} {}", "Mintable".green().bold(), format_tokens(total));
        }

        Commands::Simulate {
            every,
            until,
            burn_bps,
        } => {
            let report = SimulationReport::simulate(&config, now, every, until, burn_bps)?;
            if cli.json {
                return print_json(&report);
            }

            println!(
                "{} {} mints every {}s from {}",
                "Simulation".cyan().bold(),
                report.mints,
                every,
                format_time(report.deploy_time)
            );
            println!("  base supply   {}", format_tokens(report.base_supply));
            println!("  minted        {}", format_tokens(report.total_minted));
            println!("  burned        {}", format_tokens(report.total_burned));
            println!("  final supply  {}", format_tokens(report.final_supply));
            println!("  single mint   {}", format_tokens(report.single_mint_amount));
            println!("{:>6}  {:>9}  {:>28}  {:>28}", "Year", "Mints", "Minted", "Burned");
            for summary in &report.years {
                println!(
                    "{:>6}  {:>9}  {:>28}  {:>28}",
                    summary.year,
                    summary.mints,
                    format_tokens(summary.minted),
                    format_tokens(summary.burned)
                );
            }

            let loss = report.rounding_loss();
            if loss > 0 {
                println!("  {} {} base units", "rounding loss".yellow(), loss);
            } else {
                println!("  {}", "no rounding loss".green());
            }
        }
    }

    Ok(())
}
