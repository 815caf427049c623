mod demo;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flatworld_kernel::{WorldConfig, WorldManager};
use flatworld_render::{Renderer, TextRenderer};
use flatworld_tools::WorldInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flatworld-cli", about = "CLI tool for flatworld simulations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Run the walker demo and print frames
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "20")]
        ticks: u64,
        /// YAML world config; the built-in demo world is used otherwise
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of walkers to spawn
        #[arg(short, long, default_value = "3")]
        walkers: usize,
        /// Print a frame every N ticks (0 prints only the final frame)
        #[arg(short, long, default_value = "5")]
        frames: u64,
    },
    /// Print the default world config as YAML
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Info => {
            println!("flatworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", flatworld_kernel::crate_info());
            println!("render: {}", flatworld_render::crate_info());
            println!("tools: {}", flatworld_tools::crate_info());
        }
        Commands::Run {
            ticks,
            config,
            walkers,
            frames,
        } => {
            let config = match config {
                Some(path) => WorldConfig::load(&path)?,
                None => demo::default_config(),
            };
            let mut world = WorldManager::from_config(config)?;
            let leader = demo::populate(&mut world, walkers)?;
            world.follow_entity(leader)?;
            println!("{}", WorldInspector::summary(&world));

            let mut renderer = TextRenderer::new();
            for step in 1..=ticks {
                world.tick(step);
                if frames > 0 && step % frames == 0 {
                    println!("{}\n", renderer.render(&mut world));
                }
            }
            if frames == 0 {
                println!("{}\n", renderer.render(&mut world));
            }

            println!("{}", WorldInspector::summary(&world));
            for id in WorldInspector::list_entities(&world) {
                if let Some(info) = WorldInspector::inspect_entity(&world, id) {
                    tracing::debug!("{info}");
                }
            }
            let destroyed = world.shutdown();
            tracing::info!(destroyed, "done");
        }
        Commands::Config => {
            print!("{}", WorldConfig::default().to_yaml()?);
        }
    }

    Ok(())
}
