use std::io::{self, BufReader, Cursor};
use std::path::Path;
use taskboard::TaskManager;
use taskboard::cli::{
    Args, ConfigDiscovery, ExecutionMode, InteractiveConfig, OutputFormat, RunOptions,
    RunSummary, ScriptConfig, TaskboardConfig, load_script, run_commands,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match mode {
        ExecutionMode::Script(config) => run_script_mode(config).await,
        ExecutionMode::Interactive(config) => run_interactive_mode(config).await,
        ExecutionMode::ShowConfig { config_override } => {
            let config = ConfigDiscovery::load(config_override.as_deref())?;
            println!("{}", ConfigDiscovery::discovery_report());
            println!("Effective configuration:\n");
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

/// RUST_LOG wins over the configured filter; `--verbose` raises it to debug.
fn init_logging(config: &TaskboardConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("taskboard=debug")
        } else {
            EnvFilter::new(&config.logging.filter)
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(config_override: Option<&Path>, json: bool) -> anyhow::Result<TaskboardConfig> {
    let mut config = ConfigDiscovery::load(config_override)?;
    if json {
        config.output.format = OutputFormat::Json;
    }
    Ok(config)
}

async fn run_script_mode(config: ScriptConfig) -> anyhow::Result<()> {
    let board_config = load_config(config.config_override.as_deref(), config.json)?;
    init_logging(&board_config, config.verbose);
    info!("Running script {:?}", config.script);

    let script = load_script(&config.script)?;
    let manager = TaskManager::new(board_config.registry.clone());
    let options = RunOptions::script(board_config.output.format, config.strict);

    let mut stdout = io::stdout().lock();
    let summary = run_commands(&manager, Cursor::new(script), &mut stdout, &options).await?;
    report(&summary);

    if summary.failed > 0 {
        error!("{} line(s) could not be parsed", summary.failed);
        std::process::exit(2);
    }
    Ok(())
}

async fn run_interactive_mode(config: InteractiveConfig) -> anyhow::Result<()> {
    let board_config = load_config(config.config_override.as_deref(), config.json)?;
    init_logging(&board_config, config.verbose);
    info!("Starting interactive session");

    let manager = TaskManager::new(board_config.registry.clone());
    let options = RunOptions::interactive(board_config.output.format);

    let stdin = BufReader::new(io::stdin().lock());
    let mut stdout = io::stdout().lock();
    let summary = run_commands(&manager, stdin, &mut stdout, &options).await?;
    report(&summary);
    Ok(())
}

fn report(summary: &RunSummary) {
    info!(
        executed = summary.executed,
        failed = summary.failed,
        quit = summary.quit,
        "Command loop finished"
    );
}
