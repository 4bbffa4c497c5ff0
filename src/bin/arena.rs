use anyhow::Context;
use pokearena::prelude::*;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::env;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

struct CliOptions {
    player: String,
    opponent: String,
    difficulty: Difficulty,
    seed: u64,
}

/// Auto-plays one battle against the live catalog, picking random moves for
/// the player, and prints the narration log.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = parse_args()?;
    let client = PokeApiClient::new().context("failed to build the catalog client")?;
    let engine = BattleEngine::new(Arc::new(Cached::new(client)), opts.seed);

    let start = engine.start_session(&StartSessionRequest {
        player: opts.player,
        opponent: opts.opponent,
        difficulty: opts.difficulty,
    })?;
    for line in &start.state.log {
        println!("{line}");
    }

    let mut rng = SmallRng::seed_from_u64(opts.seed);
    let mut printed = start.state.log.len();
    for _ in 0..200 {
        let move_id = start
            .player
            .moves
            .choose(&mut rng)
            .map(|m| m.id.clone())
            .context("player has no moves")?;
        let state = engine.perform_action(start.session_id, &move_id)?;
        for line in &state.log[printed..] {
            println!("{line}");
        }
        printed = state.log.len();
        if state.winner.is_some() {
            return Ok(());
        }
    }
    anyhow::bail!("battle did not finish within 200 exchanges")
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut opts = CliOptions {
        player: "pikachu".to_string(),
        opponent: "random".to_string(),
        difficulty: Difficulty::Normal,
        seed: 0,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--player" => {
                opts.player = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--player needs a name"))?;
            }
            "--opponent" => {
                opts.opponent = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--opponent needs a name or 'random'"))?;
            }
            "--difficulty" => {
                let raw = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--difficulty needs a tier"))?;
                opts.difficulty = raw.parse().unwrap_or_default();
            }
            "--seed" => {
                opts.seed = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed needs a number"))?
                    .parse()
                    .context("--seed must be an integer")?;
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(opts)
}
