use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gridiron_mc::baseline::LeagueBaseline;
use gridiron_mc::engine::{simulate_game, simulate_slate};
use gridiron_mc::model_config::{ModelConfig, ModelKind, SimConfig};
use gridiron_mc::normalizer::parse_team_csv;
use gridiron_mc::summary::SimulationSummary;
use gridiron_mc::team::TeamDb;

const USAGE: &str = "usage: gridiron_mc <teams.csv> <home> <away> [options]
       gridiron_mc <teams.csv> --slate <games.csv> [options]

options:
  --trials N        trial count (default 10000)
  --hfa PTS         home-field advantage in points (default 2.0)
  --total LINE      market total for over/under probabilities
  --spread LINE     market spread (negative = home favored)
  --seed N          RNG seed for reproducible runs
  --model NAME      gaussian | gaussian_correlated | per_drive
  --baseline MODE   static (league constants) | data (recompute from file)";

struct CliArgs {
    teams_path: PathBuf,
    matchup: Matchup,
    sim: SimConfig,
    model: ModelConfig,
    baseline_from_data: bool,
}

enum Matchup {
    Single { home: String, away: String },
    Slate { path: PathBuf },
}

#[derive(Serialize)]
struct Report<'a> {
    generated_at: String,
    model: &'a str,
    games: Vec<&'a SimulationSummary>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1).collect())?;

    let raw = fs::read_to_string(&args.teams_path)
        .with_context(|| format!("read team file {}", args.teams_path.display()))?;
    let normalized = parse_team_csv(&raw)?;

    for team in &normalized {
        if !team.defaulted.is_empty() {
            warn!(
                team = %team.stats.name,
                defaulted = team.defaulted.len(),
                metrics = ?team.defaulted,
                "metrics missing from source, using league defaults"
            );
        }
    }

    let stats: Vec<_> = normalized.iter().map(|t| t.stats.clone()).collect();
    let baseline = if args.baseline_from_data {
        info!(teams = stats.len(), "recomputing league baseline from loaded data");
        LeagueBaseline::from_teams(&stats)
    } else {
        LeagueBaseline::static_default().clone()
    };

    let teams: TeamDb = stats.into_iter().map(|t| (t.name.clone(), t)).collect();

    let model_name = match (args.model.kind, args.model.correlation.is_some()) {
        (ModelKind::Gaussian, true) => "gaussian_correlated",
        (ModelKind::Gaussian, false) => "gaussian",
        (ModelKind::PerDrive, _) => "per_drive",
    };

    let summaries: Vec<SimulationSummary> = match &args.matchup {
        Matchup::Single { home, away } => {
            let home = teams
                .get(home)
                .with_context(|| format!("cannot run: missing input: team '{home}' not in file"))?;
            let away = teams
                .get(away)
                .with_context(|| format!("cannot run: missing input: team '{away}' not in file"))?;
            vec![simulate_game(home, away, &baseline, &args.model, &args.sim)?]
        }
        Matchup::Slate { path } => {
            let games = read_slate(path)?;
            let results =
                simulate_slate(&games, &teams, &baseline, &args.model, &args.sim, |idx, r| {
                    match r {
                        Ok(s) => info!(game = idx, home = %s.home_team, away = %s.away_team, "done"),
                        Err(e) => warn!(game = idx, error = %e, "skipped"),
                    }
                });
            let mut ok = Vec::new();
            for r in results {
                match r {
                    Ok(s) => ok.push(s),
                    Err(e) => warn!(error = %e, "no result for game"),
                }
            }
            if ok.is_empty() {
                bail!("no slate game produced a result");
            }
            ok
        }
    };

    let report = Report {
        generated_at: Utc::now().to_rfc3339(),
        model: model_name,
        games: summaries.iter().collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_slate(path: &PathBuf) -> Result<Vec<(String, String)>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read slate file {}", path.display()))?;
    let mut games = Vec::new();
    for (i, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((home, away)) = line.split_once(',') else {
            bail!("slate line {}: expected 'home,away', got '{line}'", i + 1);
        };
        games.push((home.trim().to_string(), away.trim().to_string()));
    }
    if games.is_empty() {
        bail!("slate file {} has no games", path.display());
    }
    Ok(games)
}

fn parse_args(argv: Vec<String>) -> Result<CliArgs> {
    if argv.is_empty() {
        bail!("{USAGE}");
    }

    let teams_path = PathBuf::from(&argv[0]);
    let mut sim = SimConfig::default();
    let mut model = ModelConfig::default();
    let mut baseline_from_data = false;
    let mut slate: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut flags: HashMap<String, String> = HashMap::new();
    let mut it = argv[1..].iter();
    while let Some(arg) = it.next() {
        if let Some(name) = arg.strip_prefix("--") {
            let value = it
                .next()
                .with_context(|| format!("--{name} requires a value\n{USAGE}"))?;
            flags.insert(name.to_string(), value.clone());
        } else {
            positional.push(arg.clone());
        }
    }

    for (name, value) in &flags {
        match name.as_str() {
            "trials" => {
                sim.trial_count = value.parse().with_context(|| {
                    format!("--trials expects a positive integer, got '{value}'")
                })?;
            }
            "hfa" => {
                sim.home_field_advantage_points = value
                    .parse()
                    .with_context(|| format!("--hfa expects a number, got '{value}'"))?;
            }
            "total" => {
                sim.market_total = Some(value.parse().with_context(|| {
                    format!("--total expects a numeric market line, got '{value}'")
                })?);
            }
            "spread" => {
                sim.market_spread = Some(value.parse().with_context(|| {
                    format!("--spread expects a numeric market line, got '{value}'")
                })?);
            }
            "seed" => {
                sim.seed = Some(value.parse().with_context(|| {
                    format!("--seed expects an unsigned integer, got '{value}'")
                })?);
            }
            "model" => {
                model = ModelConfig::preset(value).with_context(|| {
                    format!("unknown model '{value}' (gaussian, gaussian_correlated, per_drive)")
                })?;
            }
            "baseline" => match value.as_str() {
                "static" => baseline_from_data = false,
                "data" => baseline_from_data = true,
                other => bail!("--baseline expects 'static' or 'data', got '{other}'"),
            },
            "slate" => slate = Some(PathBuf::from(value)),
            other => bail!("unknown option --{other}\n{USAGE}"),
        }
    }

    let matchup = if let Some(path) = slate {
        if !positional.is_empty() {
            bail!("--slate cannot be combined with home/away arguments\n{USAGE}");
        }
        Matchup::Slate { path }
    } else {
        match positional.as_slice() {
            [home, away] => Matchup::Single {
                home: home.clone(),
                away: away.clone(),
            },
            _ => bail!("cannot run: missing input: expected <home> <away> team names\n{USAGE}"),
        }
    };

    Ok(CliArgs {
        teams_path,
        matchup,
        sim,
        model,
        baseline_from_data,
    })
}
