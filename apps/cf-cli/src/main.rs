use cf_app::{AppError, AppResult, Config, FillService, FillStage};
use cf_core::{EntryId, format_time_period, get_time_period, in_seconds};
use cf_fill::PartialFillParameters;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cf-cli")]
#[command(about = "cylfill CLI - Gas cylinder fill timer and fill log", long_about = None)]
struct Cli {
    /// Config file (defaults to ./cylfill.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current fill parameters and progress
    Status,
    /// Change fill parameters
    Set {
        /// Cylinder water capacity in litres
        #[arg(long)]
        cylinder_size: Option<f64>,
        /// Pressure before filling, in bar
        #[arg(long)]
        starting_pressure: Option<f64>,
        /// Compressor output in L/min
        #[arg(long)]
        fill_rate: Option<f64>,
        /// Pressure to fill to, in bar
        #[arg(long)]
        target_pressure: Option<f64>,
    },
    /// Use the average fill rate from the log
    UseLogRate,
    /// Start filling now
    Start,
    /// Abandon the current fill without logging it
    Stop,
    /// Finish the current fill and add it to the log
    Finish,
    /// Inspect or edit the fill log
    #[command(subcommand)]
    Log(LogCommands),
    /// Reset the session to its defaults
    Reset {
        /// Also delete every log entry
        #[arg(long)]
        log: bool,
    },
}

#[derive(Subcommand)]
enum LogCommands {
    /// List logged fills, newest first
    List,
    /// Show fill count and average fill rates
    Stats,
    /// Export the log as CSV
    Export {
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete one log entry
    Delete {
        /// Entry id
        id: String,
    },
    /// Add random entries (needs debug features)
    Seed {
        /// Number of entries to add
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let mut svc = FillService::open(&config)?;

    match cli.command {
        Commands::Status => cmd_status(&svc),
        Commands::Set {
            cylinder_size,
            starting_pressure,
            fill_rate,
            target_pressure,
        } => cmd_set(
            &mut svc,
            PartialFillParameters {
                cylinder_size,
                starting_pressure,
                fill_rate,
                target_pressure,
            },
        ),
        Commands::UseLogRate => cmd_use_log_rate(&mut svc),
        Commands::Start => cmd_start(&mut svc),
        Commands::Stop => {
            svc.stop()?;
            println!("✓ Fill stopped");
            Ok(())
        }
        Commands::Finish => cmd_finish(&mut svc),
        Commands::Log(log_cmd) => match log_cmd {
            LogCommands::List => cmd_log_list(&svc),
            LogCommands::Stats => cmd_log_stats(&svc),
            LogCommands::Export { output } => cmd_log_export(&svc, output.as_deref()),
            LogCommands::Delete { id } => cmd_log_delete(&mut svc, &id),
            LogCommands::Seed { count } => {
                let added = svc.seed_fake_entries(count, &mut rand::thread_rng())?;
                println!("✓ Added {} fake log entries", added.len());
                Ok(())
            }
        },
        Commands::Reset { log } => {
            svc.reset(log)?;
            if log {
                println!("✓ Session and log reset");
            } else {
                println!("✓ Session reset");
            }
            Ok(())
        }
    }
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v} {unit}"),
        None => "-".to_string(),
    }
}

fn print_parameters(svc: &FillService) {
    let state = svc.fill().state();
    println!("  Cylinder size:     {}", fmt_opt(state.cylinder_size, "L"));
    println!("  Starting pressure: {}", fmt_opt(state.starting_pressure, "bar"));
    let source = if state.fill_rate_from_log { " (from log)" } else { "" };
    println!("  Fill rate:         {}{}", fmt_opt(state.fill_rate, "L/min"), source);
    println!("  Target pressure:   {}", fmt_opt(state.target_pressure, "bar"));
}

fn cmd_status(svc: &FillService) -> AppResult<()> {
    let progress = svc.progress(svc.now())?;
    println!("Fill session: {}", progress.stage.label());
    print_parameters(svc);

    if progress.stage == FillStage::Idle {
        match svc.fill().get_fill_time() {
            Ok(t) => println!(
                "  Fill time:         {}",
                format_time_period(&get_time_period(in_seconds(t)))
            ),
            Err(err) => println!("  Fill time:         - ({})", AppError::from(err)),
        }
        return Ok(());
    }

    let zone = svc.zone();
    if let (Some(start), Some(end)) = (
        svc.fill().get_start_time_formatted(zone)?,
        svc.fill().get_end_time_formatted(zone)?,
    ) {
        println!("  Started {start}, done at {end}");
    }
    if let Some(remaining) = progress.remaining_formatted() {
        println!("  Remaining:         {remaining}");
    }
    if let Some(litres) = progress.litres_filled {
        println!("  Filled so far:     {litres:.0} L");
    }
    if let Some(pressure) = progress.current_pressure_bar {
        println!("  Current pressure:  {pressure:.0} bar");
    }
    if let Some(fraction) = progress.fraction_complete {
        println!("  Progress:          {:.0}%", fraction * 100.0);
    }
    Ok(())
}

fn cmd_set(svc: &mut FillService, params: PartialFillParameters) -> AppResult<()> {
    if params.is_empty() {
        return Err(AppError::InvalidInput(
            "nothing to set (see --help)".to_string(),
        ));
    }
    svc.set_parameters(&params)?;
    println!("✓ Parameters updated");
    print_parameters(svc);
    Ok(())
}

fn cmd_use_log_rate(svc: &mut FillService) -> AppResult<()> {
    match svc.apply_fill_rate_from_log()? {
        Some(rate) => println!("✓ Fill rate set to {rate:.2} L/min from the log"),
        None => println!("No logged fills yet; fill rate unchanged"),
    }
    Ok(())
}

fn cmd_start(svc: &mut FillService) -> AppResult<()> {
    svc.start()?;
    let zone = svc.zone();
    let end = svc.fill().get_end_time_formatted(zone)?.unwrap_or_default();
    let duration = in_seconds(svc.fill().get_fill_time()?);
    println!(
        "✓ Fill started, done in {} at {}",
        format_time_period(&get_time_period(duration)),
        end
    );
    Ok(())
}

fn cmd_finish(svc: &mut FillService) -> AppResult<()> {
    let entry = svc.finish_fill()?;
    println!("✓ Logged fill {}", entry.id);
    println!(
        "  {} L, {} -> {} bar in {}, {:.2} L/min",
        entry.cylinder_size,
        entry.starting_pressure,
        entry.target_pressure,
        format_time_period(&get_time_period(entry.duration())),
        entry.fill_rate()
    );
    Ok(())
}

fn cmd_log_list(svc: &FillService) -> AppResult<()> {
    let logs = svc.log().get_logs();
    if logs.is_empty() {
        println!("No fills logged");
        return Ok(());
    }

    let zone = svc.zone();
    println!("Logged fills:");
    for entry in logs {
        println!(
            "  {}  {}  {} L  {} -> {} bar  {}  {:.2} L/min",
            entry.id,
            zone.format(entry.start_time, "%Y-%m-%d %H:%M")?,
            entry.cylinder_size,
            entry.starting_pressure,
            entry.target_pressure,
            format_time_period(&get_time_period(entry.duration)),
            entry.fill_rate
        );
    }
    Ok(())
}

fn cmd_log_stats(svc: &FillService) -> AppResult<()> {
    let stats = svc.stats()?;
    println!("Fills logged: {}", stats.log_count);
    println!(
        "  Average fill rate today: {}",
        fmt_opt(stats.fill_rate_today.map(round2), "L/min")
    );
    println!(
        "  Average fill rate:       {}",
        fmt_opt(stats.fill_rate_all.map(round2), "L/min")
    );
    Ok(())
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn cmd_log_export(svc: &FillService, output: Option<&Path>) -> AppResult<()> {
    let csv = svc.export_csv()?;

    if let Some(path) = output {
        std::fs::write(path, &csv)?;
        println!(
            "✓ Exported {} fills to {}",
            svc.log().number_of_log_entries(),
            path.display()
        );
    } else {
        println!("{}", csv);
    }
    Ok(())
}

fn cmd_log_delete(svc: &mut FillService, id: &str) -> AppResult<()> {
    let id: EntryId = id.parse()?;
    if svc.delete_entry(&id)? {
        println!("✓ Deleted {id}");
    } else {
        println!("No log entry {id}");
    }
    Ok(())
}
