use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use n8n_validate::config::DEFAULT_CONFIG_FILE;
use n8n_validate::{CycleMode, ValidatorConfig, runner};

#[derive(Parser, Debug)]
#[command(
    name = "n8n-validate",
    version,
    about = "Validate n8n workflow JSON documents"
)]
struct Cli {
    /// Workflow file, or directory scanned recursively for workflow files.
    path: PathBuf,

    /// Treat a workflow without a trigger node as an error.
    #[arg(long)]
    strict: bool,

    /// How cycles between nodes are reported.
    #[arg(long, value_enum)]
    cycles: Option<CyclesArg>,

    /// Config file (default: ./n8n-validate.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report format on stdout.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Only print failing documents and the summary.
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CyclesArg {
    Error,
    Warning,
    Allow,
}

impl From<CyclesArg> for CycleMode {
    fn from(arg: CyclesArg) -> Self {
        match arg {
            CyclesArg::Error => CycleMode::Error,
            CyclesArg::Warning => CycleMode::Warning,
            CyclesArg::Allow => CycleMode::Allow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match try_main(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn try_main(cli: &Cli) -> Result<bool> {
    let config = load_config(cli)?;
    let run = runner::run(&cli.path, &config)
        .with_context(|| format!("validation of '{}' aborted", cli.path.display()))?;

    match cli.format {
        Format::Text => print!("{}", run.render_text(cli.quiet)),
        Format::Json => println!("{}", run.render_json()?),
    }

    Ok(run.success)
}

fn load_config(cli: &Cli) -> Result<ValidatorConfig> {
    let mut config = match &cli.config {
        Some(path) => ValidatorConfig::load(path)?,
        None => ValidatorConfig::load_optional(Path::new(DEFAULT_CONFIG_FILE))?.unwrap_or_default(),
    };
    config.apply_env_overrides();

    if cli.strict {
        config.strict = true;
    }
    if let Some(cycles) = cli.cycles {
        config.cycles = cycles.into();
    }
    tracing::debug!(?config, "effective configuration");
    Ok(config)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
