//! Preview a GO2 task: random-policy rollouts on a placeholder base.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use go2_lab::{rollout, Go2Env, RandomPolicy, TaskConfig};

#[derive(Parser, Debug)]
#[command(name = "go2-preview", about = "Run short random-policy rollouts of the GO2 task")]
struct Args {
    /// Task config (JSON); defaults are used for missing keys
    #[arg(long)]
    config: Option<PathBuf>,

    /// Step cap per rollout, independent of the episode length
    #[arg(long, default_value_t = 60)]
    max_steps: u64,

    /// Overrides control_hz from the config
    #[arg(long)]
    control_hz: Option<u32>,

    /// Overrides steps_per_episode from the config
    #[arg(long)]
    steps_per_episode: Option<u64>,

    #[arg(long, default_value_t = 1)]
    episodes: u32,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print each rollout summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TaskConfig::load(path)
            .with_context(|| format!("loading task config {}", path.display()))?,
        None => TaskConfig::default(),
    };
    if let Some(hz) = args.control_hz {
        config.control_hz = hz;
    }
    if let Some(steps) = args.steps_per_episode {
        config.steps_per_episode = steps;
    }
    config.validate()?;

    log::info!(
        "Preview: control_hz={} dt={:.4} steps_per_episode={} episodes={}",
        config.control_hz,
        config.dt(),
        config.steps_per_episode,
        args.episodes
    );

    let mut env = Go2Env::placeholder(&config);
    let mut policy = RandomPolicy::new(args.seed);

    for episode in 0..args.episodes {
        let summary = rollout(&mut env, &mut policy, args.max_steps)?;
        if args.json {
            println!("{}", serde_json::to_string(&summary)?);
        } else {
            log::info!(
                "Episode {}: steps={} return={:.3} pos={:?}",
                episode,
                summary.steps,
                summary.total_return,
                summary.final_observation.pos
            );
        }
    }

    env.close();
    Ok(())
}
