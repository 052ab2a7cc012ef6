//! Top-level simulation driver: one projection per invocation, stateless
//! between calls. Batch slates fan out over rayon; each game only reads the
//! shared immutable inputs and writes its own trial buffer.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::baseline::LeagueBaseline;
use crate::error::{SimError, SimResult};
use crate::model_config::{ModelConfig, ModelKind, SimConfig};
use crate::nets::build_nets;
use crate::pace::allocate_pace;
use crate::sampler::sample_trials;
use crate::scoring::{ScoreProjection, drive_projection, gaussian_projection};
use crate::summary::{SimulationSummary, summarize};
use crate::team::{TeamDb, TeamStats};

/// Simulate one matchup. Pure with respect to its inputs: the same seed and
/// inputs always reproduce the same summary.
pub fn simulate_game(
    home: &TeamStats,
    away: &TeamStats,
    baseline: &LeagueBaseline,
    model: &ModelConfig,
    sim: &SimConfig,
) -> SimResult<SimulationSummary> {
    sim.validate()?;

    let home_nets = build_nets(home, away, baseline, model);
    let away_nets = build_nets(away, home, baseline, model);
    let pace = allocate_pace(home, away, &home_nets, baseline, model);

    let hfa = sim.home_field_advantage_points;
    let (home_proj, away_proj) = match model.kind {
        ModelKind::Gaussian => (
            gaussian_projection(&home_nets, pace.home_drives(), true, hfa, baseline, model),
            gaussian_projection(&away_nets, pace.away_drives(), false, hfa, baseline, model),
        ),
        ModelKind::PerDrive => (
            drive_projection(&home_nets, away, &pace, true, hfa, baseline, model),
            drive_projection(&away_nets, home, &pace, false, hfa, baseline, model),
        ),
    };

    let rho = match (&model.correlation, model.kind) {
        (Some(corr), ModelKind::Gaussian) => {
            let expected_spread = home_proj.mean_points() - away_proj.mean_points();
            corr.conditioned(expected_spread, model.conditions)
        }
        _ => 0.0,
    };

    debug!(
        home = %home.name,
        away = %away.name,
        total_drives = pace.total_drives,
        home_share = pace.home_share,
        home_mean = home_proj.mean_points(),
        away_mean = away_proj.mean_points(),
        rho,
        "projection built"
    );

    let mut rng = match sim.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let trials = sample_trials(&mut rng, &home_proj, &away_proj, sim.trial_count, rho);

    Ok(summarize(
        &home.name,
        &away.name,
        &trials,
        sim.market_total,
        sim.market_spread,
    ))
}

fn lookup<'a>(teams: &'a TeamDb, name: &str) -> SimResult<&'a TeamStats> {
    teams
        .get(name)
        .ok_or_else(|| SimError::MissingInput(format!("no loaded stats for team '{name}'")))
}

/// Simulate a slate of matchups in parallel. `on_game` fires once per
/// finished game with the slate index; ordering of callbacks is not
/// guaranteed, ordering of results is. Per-game seeds are derived from the
/// base seed so results do not depend on scheduling.
pub fn simulate_slate<F>(
    games: &[(String, String)],
    teams: &TeamDb,
    baseline: &LeagueBaseline,
    model: &ModelConfig,
    sim: &SimConfig,
    on_game: F,
) -> Vec<SimResult<SimulationSummary>>
where
    F: Fn(usize, &SimResult<SimulationSummary>) + Sync,
{
    info!(games = games.len(), trials = sim.trial_count, "running slate");
    games
        .par_iter()
        .enumerate()
        .map(|(idx, (home_name, away_name))| {
            let result = (|| {
                let home = lookup(teams, home_name)?;
                let away = lookup(teams, away_name)?;
                let game_sim = SimConfig {
                    seed: sim.seed.map(|s| s.wrapping_add(idx as u64)),
                    ..sim.clone()
                };
                simulate_game(home, away, baseline, model, &game_sim)
            })();
            on_game(idx, &result);
            result
        })
        .collect()
}

/// Gaussian-path expected means without sampling, used by tests pinning the
/// HFA invariant and by callers that only want point estimates.
pub fn expected_means(
    home: &TeamStats,
    away: &TeamStats,
    baseline: &LeagueBaseline,
    model: &ModelConfig,
    hfa_points: f64,
) -> (f64, f64) {
    let home_nets = build_nets(home, away, baseline, model);
    let away_nets = build_nets(away, home, baseline, model);
    let pace = allocate_pace(home, away, &home_nets, baseline, model);
    let h = gaussian_projection(&home_nets, pace.home_drives(), true, hfa_points, baseline, model);
    let a = gaussian_projection(&away_nets, pace.away_drives(), false, hfa_points, baseline, model);
    match (h, a) {
        (ScoreProjection::Gaussian { mean: mh, .. }, ScoreProjection::Gaussian { mean: ma, .. }) => {
            (mh, ma)
        }
        _ => unreachable!("gaussian_projection always returns the gaussian arm"),
    }
}
