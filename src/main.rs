//! Device Checkup CLI
//!
//! Entry point for the `devcheck` command-line tool.

use clap::{Parser, Subcommand, ValueEnum};
use device_checkup::catalog::{Catalog, TestKind};
use device_checkup::config::{
    default_user_config_path, parse_override, set_path, ConfigError, EffectiveConfig, OutputFormat,
};
use device_checkup::signal::SignalHandler;
use device_checkup::{
    logging, run_probe, CheckStatus, Checklist, ChecklistError, ProbeRegistry, RunEnd,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "devcheck")]
#[command(about = "Device hardware diagnostics checklist", version)]
struct Cli {
    /// Path to config file (default: ~/.config/devcheck/config.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Path to the session file (overrides session.path)
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    /// Override a config value, e.g. --set probe.simulate=false
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    overrides: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every check with its current status
    Catalog {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Record a verdict for a check
    Record {
        /// Check id, e.g. camera-rear
        id: String,

        /// Whether the hardware works
        verdict: Verdict,
    },

    /// Show the recorded outcome of one check
    Show {
        /// Check id
        id: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show pass/fail totals
    Summary {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Clear every recorded verdict
    Reset {
        /// Skip the confirmation requirement
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Run a check: stream its probe, then record the verdict
    Run {
        /// Check id
        id: String,

        /// Record this verdict instead of asking
        #[arg(long)]
        verdict: Option<Verdict>,

        /// How long to stream readings (default: probe.duration_ms)
        #[arg(long)]
        duration_ms: Option<u64>,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Verdict {
    /// The hardware works
    #[value(alias = "works", alias = "ok")]
    Pass,
    /// The hardware has a problem
    #[value(alias = "problem")]
    Fail,
}

impl Verdict {
    fn passed(self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// CLI errors
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Checklist(#[from] ChecklistError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid override '{0}', expected KEY=VALUE")]
    InvalidOverride(String),

    #[error("Reset not confirmed; pass --yes or set reset.confirm = false")]
    ResetNotConfirmed,

    #[error("No verdict given; nothing recorded")]
    NoVerdict,

    #[error("Probe error: {0}")]
    Probe(#[from] device_checkup::ProbeError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Error serializing output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Checklist(ChecklistError::Catalog(_)) => 2,
            _ => 1,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    };

    logging::init(&config.settings.log.level);

    if let Err(e) = dispatch(cli.command, &config) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn load_config(cli: &Cli) -> Result<EffectiveConfig, CliError> {
    let mut overrides = serde_json::Value::Object(serde_json::Map::new());
    let mut has_overrides = false;

    for pair in &cli.overrides {
        let (key, value) =
            parse_override(pair).ok_or_else(|| CliError::InvalidOverride(pair.clone()))?;
        set_path(&mut overrides, &key, value);
        has_overrides = true;
    }

    if let Some(ref session) = cli.session {
        set_path(
            &mut overrides,
            "session.path",
            serde_json::Value::String(session.to_string_lossy().to_string()),
        );
        has_overrides = true;
    }

    let user_path = cli.config.clone().or_else(default_user_config_path);

    Ok(EffectiveConfig::build(
        user_path.as_deref(),
        has_overrides.then_some(overrides),
    )?)
}

fn open_checklist(config: &EffectiveConfig) -> Result<Checklist, CliError> {
    let catalog = Catalog::builtin();
    let session = &config.settings.session;
    if session.persist {
        Ok(Checklist::open(catalog, &session.path)?)
    } else {
        Ok(Checklist::in_memory(catalog))
    }
}

fn output_format(json: bool, config: &EffectiveConfig) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else {
        config.settings.output.format
    }
}

fn dispatch(command: Commands, config: &EffectiveConfig) -> Result<(), CliError> {
    match command {
        Commands::Catalog { json } => run_catalog(output_format(json, config), config),
        Commands::Record { id, verdict } => run_record(&id, verdict, config),
        Commands::Show { id, json } => run_show(&id, output_format(json, config), config),
        Commands::Summary { json } => run_summary(output_format(json, config), config),
        Commands::Reset { yes } => run_reset(yes, config),
        Commands::Run {
            id,
            verdict,
            duration_ms,
        } => run_check(&id, verdict, duration_ms, config),
        Commands::Config => {
            println!("{}", config.to_json()?);
            Ok(())
        }
    }
}

fn run_catalog(format: OutputFormat, config: &EffectiveConfig) -> Result<(), CliError> {
    let checklist = open_checklist(config)?;

    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "session_id": checklist.session_id(),
            "checks": checklist.rows(),
            "summary": checklist.summary(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for section in checklist.catalog().sections() {
        println!("{}", section.category.title());
        for def in section.tests {
            println!(
                "  {} {:<18} {}",
                checklist.status_of(def.id).mark(),
                def.id,
                def.display_name
            );
        }
        println!();
    }
    println!("{}", checklist.summary().human_summary());
    Ok(())
}

fn run_record(id: &str, verdict: Verdict, config: &EffectiveConfig) -> Result<(), CliError> {
    let mut checklist = open_checklist(config)?;
    let passed = verdict.passed();
    checklist.record(id, passed)?;
    checklist.save()?;

    println!(
        "{} {} recorded as {}",
        CheckStatus::from_outcome(checklist.store().outcome_for(id)).mark(),
        id,
        if passed { "works" } else { "problem" }
    );
    Ok(())
}

fn run_show(id: &str, format: OutputFormat, config: &EffectiveConfig) -> Result<(), CliError> {
    let checklist = open_checklist(config)?;
    let outcome = checklist.outcome_for(id)?;

    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "test_id": id,
            "status": CheckStatus::from_outcome(outcome),
            "outcome": outcome,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match outcome {
        Some(o) => println!(
            "{} {}: {} (recorded {})",
            CheckStatus::from_outcome(Some(o)).mark(),
            id,
            if o.passed { "works" } else { "problem" },
            o.recorded_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => println!("{} {}: not run", CheckStatus::NotRun.mark(), id),
    }
    Ok(())
}

fn run_summary(format: OutputFormat, config: &EffectiveConfig) -> Result<(), CliError> {
    let checklist = open_checklist(config)?;
    let summary = checklist.summary();

    if format == OutputFormat::Json {
        println!("{}", summary.to_json()?);
        return Ok(());
    }

    println!(
        "Total: {}  Passed: {}  Failed: {}  Not run: {}",
        summary.total,
        summary.passed_count,
        summary.failed_count,
        checklist.remaining()
    );
    println!("{}", summary.human_summary());
    Ok(())
}

fn run_reset(yes: bool, config: &EffectiveConfig) -> Result<(), CliError> {
    if config.settings.reset.confirm && !yes {
        return Err(CliError::ResetNotConfirmed);
    }

    // A damaged session file must not block clearing it
    let session = &config.settings.session;
    let mut checklist = if session.persist {
        Checklist::open_or_fresh(Catalog::builtin(), &session.path)
    } else {
        Checklist::in_memory(Catalog::builtin())
    };
    checklist.reset();
    checklist.save()?;
    println!("All checks reset");
    Ok(())
}

fn run_check(
    id: &str,
    verdict: Option<Verdict>,
    duration_ms: Option<u64>,
    config: &EffectiveConfig,
) -> Result<(), CliError> {
    let mut checklist = open_checklist(config)?;
    let def = checklist.catalog().require(id).map_err(ChecklistError::from)?;
    let kind = checklist.catalog().kind_of(def.id);

    println!("{} ({})", def.display_name, def.id);
    describe_kind(&kind);

    if kind.needs_probe() {
        let probe_settings = &config.settings.probe;
        let registry = if probe_settings.simulate {
            ProbeRegistry::simulated(probe_settings.interval())
        } else {
            ProbeRegistry::new()
        };
        let mut probe = registry.probe_for(&kind);
        let duration = duration_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| probe_settings.duration());

        let handler = SignalHandler::new();
        if let Err(e) = handler.install() {
            eprintln!("Warning: could not install Ctrl-C handler: {}", e);
        }
        let interrupt = handler.state();

        match run_probe(&kind, probe.as_mut(), duration, Some(interrupt.as_ref()), |reading| {
            println!("  {}", reading)
        }) {
            Ok(run) => {
                if run.end == RunEnd::Interrupted {
                    println!("Stopped after {} reading(s)", run.readings);
                }
                interrupt.rearm();
            }
            Err(e) if e.allows_manual_fallback() => {
                eprintln!("{}; confirm the check manually", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let passed = match verdict {
        Some(v) => v.passed(),
        None => prompt_verdict()?,
    };

    checklist.record(def.id, passed)?;
    checklist.save()?;
    println!(
        "{} {} recorded as {}",
        CheckStatus::from_outcome(checklist.store().outcome_for(def.id)).mark(),
        def.id,
        if passed { "works" } else { "problem" }
    );
    Ok(())
}

fn describe_kind(kind: &TestKind) {
    match kind {
        TestKind::ColorCycle { colors } => {
            println!("Show each colour full-screen and look for dead pixels or spots:");
            println!("  {}", colors.join("  "));
        }
        TestKind::MultiTouch => println!("Touch the screen with several fingers at once"),
        TestKind::Speaker {
            position,
            frequency_hz,
        } => println!(
            "Playing {} Hz through the {} speaker",
            frequency_hz,
            format!("{:?}", position).to_lowercase()
        ),
        TestKind::Microphone => println!("Speak into the microphone and watch the level"),
        TestKind::Camera { facing } => println!(
            "Check the {} camera preview",
            format!("{:?}", facing).to_lowercase()
        ),
        TestKind::Proximity => println!("Cover and uncover the proximity sensor"),
        TestKind::Motion { sensor } => println!(
            "Move the device and watch the {}",
            format!("{:?}", sensor).to_lowercase()
        ),
        TestKind::Battery => println!("Reading battery level and charging state"),
        TestKind::Manual => println!("Inspect the device and confirm"),
    }
}

fn prompt_verdict() -> Result<bool, CliError> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Does it work? [y/n]: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Err(CliError::NoVerdict);
        };
        match line?.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("Please answer y or n"),
        }
    }
}
