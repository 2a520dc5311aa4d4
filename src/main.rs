use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use taskrank::domain::{PriorityBand, ScoredTask, parse_batch, parse_tasks};
use taskrank::ipc::{IpcClient, IpcServer, IpcServerConfig, PrioritizerHandler};
use taskrank::scoring::Prioritizer;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskrank")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("taskrank.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Analyze { file, json, daemon } => handle_analyze_command(file, *json, *daemon, config),
        Commands::Suggest { file, count, json } => {
            handle_suggest_command(file.as_deref(), count.unwrap_or(config.suggest.count), *json, config)
        }
        Commands::Serve { socket } => handle_serve_command(socket.as_ref(), config),
    }
}

fn handle_analyze_command(file: &Path, json: bool, daemon: bool, config: &Config) -> Result<()> {
    info!("Analyzing tasks from {} (daemon: {})", file.display(), daemon);
    let input = read_input(file)?;

    let ranked = if daemon {
        let batch = parse_batch(&input).context("Failed to read task batch")?;
        block_on(async {
            let mut client = IpcClient::connect_to(&config.server.socket_path).await?;
            client.analyze(batch).await
        })?
        .context("Daemon analysis failed")?
    } else {
        let tasks = parse_tasks(&input).context("Failed to read task batch")?;
        Prioritizer::new().score(&tasks).context("Analysis failed")?
    };

    print_tasks("Ranked tasks", &ranked, json)
}

fn handle_suggest_command(file: Option<&Path>, count: usize, json: bool, config: &Config) -> Result<()> {
    info!("Suggesting {} task(s) from {:?}", count, file);

    let top = match file {
        Some(file) => {
            let tasks = parse_tasks(&read_input(file)?).context("Failed to read task batch")?;
            Prioritizer::new().suggest(Some(&tasks), count).context("Suggestion failed")?
        }
        None => block_on(async {
            let mut client = IpcClient::connect_to(&config.server.socket_path).await?;
            client.suggest(None, Some(count)).await
        })?
        .context("Daemon suggestion failed")?,
    };

    print_tasks("Suggested next", &top, json)
}

fn handle_serve_command(socket: Option<&PathBuf>, config: &Config) -> Result<()> {
    let socket_path = socket.cloned().unwrap_or_else(|| config.server.socket_path.clone());
    let server_config = IpcServerConfig::default()
        .with_socket_path(&socket_path)
        .with_max_clients(config.server.max_clients);
    let handler = Arc::new(PrioritizerHandler::new(Prioritizer::new()).with_default_count(config.suggest.count));

    println!("{} {}", "Serving on".green(), socket_path.display());
    block_on(async move {
        let mut server = IpcServer::with_config(server_config);
        let shutdown = server.shutdown_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, shutting down");
                let _ = shutdown.send(()).await;
            }
        });
        server.run(handler).await
    })?
    .context("Daemon failed")?;

    println!("{}", "Daemon stopped".yellow());
    Ok(())
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

/// Read a task file, or stdin when the path is `-`
fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read tasks from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(file).context(format!("Failed to read {}", file.display()))
}

fn print_tasks(heading: &str, tasks: &[ScoredTask], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tasks).context("Failed to encode result")?);
        return Ok(());
    }

    println!("{} ({})", heading.bold(), tasks.len());
    for (position, scored) in tasks.iter().enumerate() {
        let score = format!("{:>5.2}", scored.score);
        let score = match scored.band() {
            PriorityBand::High => score.red().bold(),
            PriorityBand::Medium => score.yellow(),
            PriorityBand::Low => score.green(),
        };
        println!(
            "{:>3}. {} [{}] {} {}",
            position + 1,
            score,
            scored.band().as_str(),
            scored.id().cyan(),
            scored.task.title
        );
        if !scored.explanation.is_empty() {
            println!("       {}", scored.explanation.to_string().dimmed());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
