//! Impact Report Tool
//!
//! CLI to run the delay-impact analytics offline against a rental export,
//! without standing up the HTTP service.
//!
//! Usage:
//!   cargo run --bin impact_report -- --rentals ./data/sample_rentals.json summary
//!   cargo run --bin impact_report -- curve --n-interval 7
//!   cargo run --bin impact_report -- impact --threshold 120 --scope connect
//!   cargo run --bin impact_report -- --json impact --threshold 120

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use delaygate_backend::{engine, ingest, models::Channel};

/// Offline delay-impact reports over a rental export
#[derive(Parser, Debug)]
#[command(name = "impact_report")]
#[command(about = "Run delay-impact analytics against a rental export")]
struct Cli {
    /// Path to the rental export (JSON array of raw rows)
    #[arg(
        short,
        long,
        env = "RENTALS_PATH",
        default_value = "./data/sample_rentals.json"
    )]
    rentals: PathBuf,

    /// Emit machine-readable JSON instead of tables
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Headline statistics for the snapshot
    Summary,

    /// Cancellation-rate curve by delay bucket and channel
    Curve {
        /// Number of equal-width buckets over the 12-hour delay domain
        #[arg(short, long, default_value = "7")]
        n_interval: u32,
    },

    /// Counterfactual impact of a minimum buffer threshold
    Impact {
        /// Buffer threshold in minutes
        #[arg(short, long)]
        threshold: f64,

        /// all, connect or mobile
        #[arg(short, long, default_value = "all")]
        scope: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let snapshot = ingest::load_snapshot(&cli.rentals)?;

    match cli.command {
        Commands::Summary => {
            let summary = engine::summarize(snapshot.records(), snapshot.pairs());
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Rentals:             {}", summary.total_rentals);
                println!("Affected (linked):   {}", summary.affected_rentals);
                println!(
                    "Consecutive share:   {}",
                    fmt_opt(summary.consecutive_share_pct, "%")
                );
                println!(
                    "Avg checkout delay:  {}",
                    fmt_opt(summary.avg_checkout_delay_minutes, " min")
                );
                println!(
                    "Avg gap to previous: {}",
                    fmt_opt(summary.avg_gap_minutes, " min")
                );
            }
        }

        Commands::Curve { n_interval } => {
            let table = engine::aggregate(snapshot.pairs(), n_interval)?;

            let mut rows: Vec<_> = table.into_iter().collect();
            rows.sort_by(|((bucket_a, chan_a), _), ((bucket_b, chan_b), _)| {
                bucket_a
                    .cmp(bucket_b)
                    .then(chan_a.as_str().cmp(chan_b.as_str()))
            });

            if cli.json {
                let rows: Vec<_> = rows
                    .iter()
                    .map(|((bucket, channel), rate)| {
                        serde_json::json!({
                            "delay_upper_edge": bucket.upper_edge_minutes(n_interval),
                            "channel": channel,
                            "cancellation_rate": rate.cancellation_rate,
                            "sample_count": rate.sample_count,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:>12}  {:>8}  {:>12}  {:>8}", "delay <", "channel", "cancel rate", "samples");
                for ((bucket, channel), rate) in rows {
                    let edge = match bucket.upper_edge_minutes(n_interval) {
                        Some(edge) => format!("{edge:.0} min"),
                        None => "overflow".to_string(),
                    };
                    println!(
                        "{:>12}  {:>8}  {:>12.3}  {:>8}",
                        edge,
                        channel.as_str(),
                        rate.cancellation_rate,
                        rate.sample_count
                    );
                }
            }
        }

        Commands::Impact { threshold, scope } => {
            let scope = parse_scope(&scope)?;
            let counts = engine::simulate(snapshot.pairs(), threshold, scope)?;
            let revenue_loss_pct = counts.revenue_loss_pct(snapshot.total_rentals())?;
            let friction_loss_pct = counts.friction_loss_pct(snapshot.canceled_affected())?;

            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "threshold": threshold,
                        "scope": scope.map(|c| c.as_str().to_string()),
                        "would_drop_completed": counts.would_drop_completed,
                        "would_drop_canceled": counts.would_drop_canceled,
                        "revenue_loss_pct": revenue_loss_pct,
                        "friction_loss_pct": friction_loss_pct,
                    }))?
                );
            } else {
                println!("Threshold:               {threshold:.0} min");
                println!(
                    "Scope:                   {}",
                    scope.map(|c| c.as_str().to_string()).unwrap_or_else(|| "all".to_string())
                );
                println!("Blocked completed trips: {}", counts.would_drop_completed);
                println!("Blocked canceled trips:  {}", counts.would_drop_canceled);
                println!("Revenue loss:            {revenue_loss_pct:.2}%");
                println!("Friction loss:           {friction_loss_pct:.2}");
            }
        }
    }

    Ok(())
}

fn parse_scope(scope: &str) -> Result<Option<Channel>> {
    match scope {
        "all" => Ok(None),
        "connect" => Ok(Some(Channel::Connect)),
        "mobile" => Ok(Some(Channel::Mobile)),
        other => bail!("unknown scope '{other}' (expected all, connect or mobile)"),
    }
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.1}{unit}"),
        None => "n/a".to_string(),
    }
}
