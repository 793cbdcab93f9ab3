//! Referee command line: plays a scripted bout and prints the combat log.
//!
//! ```bash
//! ARENA_SEED=7 cargo run -p arena-cli -- demos/duel.ron
//! ```
mod config;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use arena_content::ContentFactory;
use arena_runtime::{BoutScript, DEFAULT_SEED, Session, play};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::CliConfig;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env().with_args(std::env::args().skip(1));
    let _guard = setup_logging(config.log_dir.as_deref())?;

    let script_path = config
        .script
        .as_deref()
        .ok_or_else(|| anyhow!("no bout script given (pass a path or set ARENA_SCRIPT)"))?;
    let script = BoutScript::load(script_path)
        .with_context(|| format!("Failed to load bout script {}", script_path.display()))?;

    let seed = config.seed.or(script.seed).unwrap_or(DEFAULT_SEED);
    let mut session = build_session(config.data_dir.as_deref(), seed)?;

    tracing::info!(script = %script_path.display(), seed, steps = script.steps.len(), "Playing bout");
    let report = play(&mut session, &script, config.stop_on_rejection)?;

    for line in &report.lines {
        println!("{line}");
    }
    for (step, reason) in &report.rejected {
        println!("step {step} rejected: {reason}");
    }

    let state = session.state();
    match (state.is_game_over(), state.outcome.winner) {
        (true, Some(winner)) => {
            let name = state.fighter(winner).map_or("?", |f| f.name.as_str());
            println!("Winner: {name}");
        }
        (true, None) => println!("Match over without a winner"),
        (false, _) => println!(
            "Turn {}: {} to act",
            state.turn.number,
            state
                .fighter(state.current_actor())
                .map_or("?", |f| f.name.as_str())
        ),
    }

    if config.export_json {
        println!("{}", session.export_json()?);
    }

    Ok(())
}

fn build_session(data_dir: Option<&Path>, seed: u64) -> Result<Session> {
    let Some(dir) = data_dir else {
        return Ok(Session::standard(seed)?);
    };

    let factory = ContentFactory::new(dir);
    let config = factory.load_config()?;
    let catalog = factory.load_moves()?;
    let roster = factory.load_roster(&catalog)?;
    tracing::info!(
        data_dir = %factory.data_dir().display(),
        moves = catalog.len(),
        fighters = roster.len(),
        "Content loaded"
    );

    Ok(Session::builder()
        .config(config)
        .catalog(catalog)
        .roster(roster)
        .seed(seed)
        .build()?)
}

/// Logs to stderr, and to `arena.log` in `log_dir` when one is given.
fn setup_logging(
    log_dir: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)?;
    let file_appender = tracing_appender::rolling::never(dir, "arena.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    tracing::info!(log_dir = %dir.display(), "File logging enabled");
    Ok(Some(guard))
}
