use clap::{Parser, ValueEnum};
use log::{error, info};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use warren_config::{load_config, Config, ConfigError, RunMode, SerializerType};
use warren_core::{Entity, Pacing, Plane, Position, TickClock};
use warren_simulation::{
    Completed, Rabbit, RandomHeadings, SerialDriver, SimulationError, ThreadedDriver,
};
use warren_transport::{JsonSerializer, Serializer, StdioSender, TextSerializer, Transport};

/// `info` for the `warren` binary and the `warren_*` crates (targets match by
/// prefix); dependencies stay quiet unless `RUST_LOG` asks.
const DEFAULT_LOG_FILTER: &str = "warren=info";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON configuration file. Built-in defaults are used without one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run both rabbits in one loop, or one thread per rabbit
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Seed for the regular rabbit's headings
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output line format
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Do not sleep between ticks in threaded mode
    #[arg(long)]
    no_pacing: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ModeArg {
    Serial,
    Threaded,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum FormatArg {
    Text,
    Json,
}

#[derive(Error, Debug)]
enum RunError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Simulation(#[from] SimulationError),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), RunError> {
    let config = resolve_config(args)?;
    let clock = TickClock::new(config.run.simulation_time, config.run.time_step);
    let rabbits = build_rabbits(&config);
    let mut transport = create_transport(&config);

    let done = match config.run.mode {
        RunMode::Serial => SerialDriver::new(clock).run(rabbits, &mut transport)?,
        RunMode::Threaded => {
            let pacing = if config.run.pacing {
                Pacing::per_step(clock.dt())
            } else {
                Pacing::Unpaced
            };
            ThreadedDriver::new(clock)
                .with_pacing(pacing)
                .run(rabbits, &mut transport)?
        }
    };

    log_summary(&done);
    Ok(())
}

/// Config file (or defaults), then command-line overrides, then validation.
fn resolve_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Using configuration from {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(mode) = args.mode {
        config.run.mode = match mode {
            ModeArg::Serial => RunMode::Serial,
            ModeArg::Threaded => RunMode::Threaded,
        };
    }
    if let Some(format) = args.format {
        config.output.format = match format {
            FormatArg::Text => SerializerType::Text,
            FormatArg::Json => SerializerType::Json,
        };
    }
    if args.seed.is_some() {
        config.run.seed = args.seed;
    }
    if args.no_pacing {
        config.run.pacing = false;
    }

    config.validate()?;
    Ok(config)
}

fn build_rabbits(config: &Config) -> Vec<Rabbit> {
    let plane = Plane::new(config.world_settings.width, config.world_settings.height);
    let (x, y) = config.regular_start();
    let headings = match config.run.seed {
        Some(seed) => RandomHeadings::seeded(seed),
        None => RandomHeadings::from_entropy(),
    };
    info!("Regular rabbit heading seed: {}", headings.seed());

    vec![
        Rabbit::regular(
            plane,
            Position::new(x, y),
            config.rabbits.speed,
            Box::new(headings),
        ),
        Rabbit::albino(plane, config.albino_start_x(), config.rabbits.speed),
    ]
}

fn create_transport(config: &Config) -> Transport {
    let serializer: Box<dyn Serializer> = match config.output.format {
        SerializerType::Text => Box::new(TextSerializer),
        SerializerType::Json => Box::new(JsonSerializer),
    };
    Transport::new(serializer, Box::new(StdioSender::new()))
}

fn log_summary(done: &[Completed<Rabbit>]) {
    for completed in done {
        let report = completed.entity.report();
        info!(
            "{} rabbit finished after {} ticks at ({:.2}, {:.2})",
            completed.entity.kind(),
            completed.ticks,
            report.position.x,
            report.position.y
        );
    }
}
