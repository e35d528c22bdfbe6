mod cli;
mod runner;

use std::io::Write;
use std::process::ExitCode;

use orrery_config::validation::validate;
use orrery_config::SceneConfig;
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::runner::RunOptions;

fn init_logging(directive: &str) {
    let directive: Directive = directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
}

fn check(config: &SceneConfig) -> ExitCode {
    match validate(config) {
        Ok(()) => {
            println!("scene ok: {} layer(s)", config.layers.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Logging depends on the config, so load it first and report errors after.
    let loaded = orrery_config::load_config(args.config.as_deref());
    let config_level = loaded
        .as_ref()
        .map(|c| c.logging.level.as_directive())
        .unwrap_or("info");
    init_logging(args.log_level.as_deref().unwrap_or(config_level));

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("failed to load scene: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        "Orrery v{} ({} layer(s))",
        env!("CARGO_PKG_VERSION"),
        config.layers.len()
    );

    if args.check {
        return check(&config);
    }

    let options = RunOptions {
        frames: args.frames,
        fps: args.fps,
        viewport: args.viewport,
        resizes: args.resize_at,
        at: args.at,
        accelerated: args.accelerated,
        stats: args.stats,
    };
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    let result = runner::run(&config, &options, &mut out).and_then(|()| out.flush().map_err(Into::into));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("run failed: {e}");
            ExitCode::FAILURE
        }
    }
}
