//! CLI entry point for staffdesk.
//!
//! Developer tool for checking how backend timestamps render in London
//! time and what the global loading bar shows for a set of slices.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use core_types::SliceKind;
use flexi_logger::Logger;
use store::{AggregatorConfig, LoadingAggregator, LoadingSnapshot};
use timefmt::UtcOutput;

/// staffdesk: timestamp and loading-state helpers for the StaffDesk dashboard
#[derive(Parser)]
#[command(name = "staffdesk")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a backend timestamp in London local time
    Display {
        /// Timestamp as returned by the backend
        raw: String,

        /// strftime pattern (default: "%d %b %Y, %I:%M %p")
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Hours and minutes worked between two timestamps
    Duration {
        start: String,

        /// End of the shift (default: now, marked live)
        #[arg(short, long)]
        end: Option<String>,
    },

    /// Convert a London wall-clock time to UTC
    ToUtc {
        /// Local time, e.g. 2025-06-01T09:30 (default: now)
        local: Option<String>,

        /// Print in database style instead of ISO 8601
        #[arg(long)]
        db: bool,
    },

    /// Convert a backend timestamp to a datetime-local input value
    ToLocal { raw: String },

    /// Show the loading bar message for slices that are loading
    Loading {
        /// Slice names (auth, invoices, workers, projects, specializations, tasks)
        #[arg(required = true)]
        slices: Vec<String>,

        /// Simulate this many progress ticks
        #[arg(short, long, default_value = "0")]
        ticks: u32,
    },
}

fn parse_slice(s: &str) -> Result<SliceKind> {
    SliceKind::from_name(s).with_context(|| format!("Unknown slice: {s}"))
}

/// Fail on the sentinel the formatter returns for unparseable input.
fn checked(output: String, input: &str) -> Result<String> {
    if output == timefmt::INVALID {
        bail!("Unrecognised timestamp: {input}");
    }
    Ok(output)
}

fn main() -> Result<()> {
    let _logger = Logger::try_with_env_or_str("warn")
        .context("Invalid log specification")?
        .start()
        .context("Failed to start logger")?;

    let cli = Cli::parse();
    let output = run(cli.command)?;
    println!("{output}");

    Ok(())
}

fn run(command: Commands) -> Result<String> {
    match command {
        Commands::Display { raw, format } => {
            timefmt::parse_timestamp(&raw)
                .with_context(|| format!("Unrecognised timestamp: {raw}"))?;
            let output = timefmt::to_local_display(Some(&raw), format.as_deref());
            if output == timefmt::INVALID {
                bail!("Invalid format: {}", format.unwrap_or_default());
            }
            Ok(output)
        }
        Commands::Duration { start, end } => {
            timefmt::parse_timestamp(&start)
                .with_context(|| format!("Invalid start: {start}"))?;
            if let Some(end) = &end {
                timefmt::parse_timestamp(end).with_context(|| format!("Invalid end: {end}"))?;
            }
            Ok(timefmt::duration_between(&start, end.as_deref()))
        }
        Commands::ToUtc { local, db } => {
            let output = if db { UtcOutput::Database } else { UtcOutput::Iso };
            let input = local.clone().unwrap_or_default();
            checked(timefmt::local_to_utc(local.as_deref(), output), &input)
        }
        Commands::ToLocal { raw } => checked(timefmt::utc_to_local_input(Some(&raw)), &raw),
        Commands::Loading { slices, ticks } => {
            let loading = slices
                .iter()
                .map(|s| parse_slice(s))
                .collect::<Result<Vec<_>>>()?;
            Ok(simulate_loading(&loading, ticks, &mut rand::thread_rng()))
        }
    }
}

/// Run the aggregator against `loading` and report each tick.
fn simulate_loading<R: rand::Rng>(loading: &[SliceKind], ticks: u32, rng: &mut R) -> String {
    let snapshot =
        LoadingSnapshot::from_flags(SliceKind::ALL.map(|kind| (kind, loading.contains(&kind))));
    let mut aggregator = LoadingAggregator::new(AggregatorConfig::default());
    let tick_ms = u64::from(aggregator.config().tick_ms);

    aggregator.observe(&snapshot, 0);
    log::debug!("aggregator phase: {:?}", aggregator.phase());

    let mut lines = vec![aggregator.message().to_string()];
    for n in 1..=u64::from(ticks) {
        aggregator.tick(rng, n * tick_ms);
        lines.push(format!("{:>3.0}%", aggregator.progress()));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_parse_slice_valid() {
        assert_eq!(parse_slice("auth").unwrap(), SliceKind::Auth);
        assert_eq!(parse_slice("tasks").unwrap(), SliceKind::Tasks);
    }

    #[test]
    fn test_parse_slice_invalid() {
        let err = parse_slice("payroll").unwrap_err();
        assert_eq!(err.to_string(), "Unknown slice: payroll");
    }

    #[test]
    fn test_cli_parse_display() {
        let cli = Cli::try_parse_from([
            "staffdesk",
            "display",
            "2025-07-01 08:00:00",
            "--format",
            "%H:%M",
        ])
        .unwrap();

        match cli.command {
            Commands::Display { raw, format } => {
                assert_eq!(raw, "2025-07-01 08:00:00");
                assert_eq!(format.as_deref(), Some("%H:%M"));
            }
            _ => panic!("Expected Display command"),
        }
    }

    #[test]
    fn test_cli_parse_to_utc_defaults() {
        let cli = Cli::try_parse_from(["staffdesk", "to-utc"]).unwrap();

        match cli.command {
            Commands::ToUtc { local, db } => {
                assert!(local.is_none());
                assert!(!db);
            }
            _ => panic!("Expected ToUtc command"),
        }
    }

    #[test]
    fn test_cli_loading_requires_slice() {
        assert!(Cli::try_parse_from(["staffdesk", "loading"]).is_err());
    }

    #[test]
    fn test_run_display_summer_time() {
        let output = run(Commands::Display {
            raw: "2025-07-01T08:00:00Z".to_string(),
            format: Some("%H:%M".to_string()),
        })
        .unwrap();
        assert_eq!(output, "09:00");
    }

    #[test]
    fn test_run_display_rejects_garbage() {
        let err = run(Commands::Display {
            raw: "not-a-date".to_string(),
            format: None,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Unrecognised timestamp: not-a-date");
    }

    #[test]
    fn test_run_display_reports_bad_format() {
        let err = run(Commands::Display {
            raw: "2025-07-01T08:00:00Z".to_string(),
            format: Some("%Q".to_string()),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid format: %Q");
    }

    #[test]
    fn test_run_duration_closed_shift() {
        let output = run(Commands::Duration {
            start: "2025-07-01 08:00:00".to_string(),
            end: Some("2025-07-01 16:30:00".to_string()),
        })
        .unwrap();
        assert_eq!(output, "8h 30m");
    }

    #[test]
    fn test_run_duration_invalid_start() {
        let err = run(Commands::Duration {
            start: "soon".to_string(),
            end: None,
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid start: soon");
    }

    #[test]
    fn test_run_to_utc_in_winter() {
        let output = run(Commands::ToUtc {
            local: Some("2025-01-15T09:30".to_string()),
            db: true,
        })
        .unwrap();
        assert_eq!(output, "2025-01-15 09:30:00");
    }

    #[test]
    fn test_simulate_loading_reports_message_and_ticks() {
        let mut rng = StdRng::seed_from_u64(11);

        let output = simulate_loading(&[SliceKind::Auth, SliceKind::Tasks], 3, &mut rng);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("authenticating"));
        assert!(lines[0].contains("loading tasks"));
        assert!(lines[1..].iter().all(|line| line.ends_with('%')));
    }
}
