//! Scoring models: two variants behind one projection type.
//!
//! Gaussian: matchup nets -> weighted net advantage -> points-per-drive ->
//! expected points mean plus a modulated per-team SD.
//!
//! Per-drive: matchup nets -> chained logistic probabilities for each
//! possession outcome (three-and-out, touchdown, field goal, empty).

use crate::baseline::LeagueBaseline;
use crate::metrics::Metric;
use crate::model_config::ModelConfig;
use crate::nets::MatchupNets;
use crate::pace::GamePace;
use crate::team::TeamStats;

/// One team's scoring projection for one matchup.
#[derive(Debug, Clone, Copy)]
pub enum ScoreProjection {
    Gaussian { mean: f64, sd: f64 },
    PerDrive { probs: DriveProbs, possessions: u32 },
}

/// Per-possession outcome distribution. Always sums to 1 with every entry
/// non-negative.
#[derive(Debug, Clone, Copy)]
pub struct DriveProbs {
    pub three_out: f64,
    pub touchdown: f64,
    pub field_goal: f64,
    pub empty: f64,
}

impl DriveProbs {
    pub fn expected_points(&self) -> f64 {
        7.0 * self.touchdown + 3.0 * self.field_goal
    }
}

impl ScoreProjection {
    pub fn mean_points(&self) -> f64 {
        match self {
            ScoreProjection::Gaussian { mean, .. } => *mean,
            ScoreProjection::PerDrive { probs, possessions } => {
                probs.expected_points() * (*possessions as f64)
            }
        }
    }
}

/// Weighted combination of the matchup nets into one z-like advantage score.
pub fn net_advantage(nets: &MatchupNets, cfg: &ModelConfig) -> f64 {
    let w = &cfg.weights;
    w.epa * nets.epa_net
        + w.success * nets.sr_net
        + w.ppd_resid * nets.ppd_resid_net
        + w.explosive * nets.explosive_net
        + w.red_zone * nets.red_zone_net
        + w.three_out * nets.three_out_net
        + w.dvoa_prior * nets.dvoa_net
        + w.turnover_prior * nets.turnover_net
        + w.field_pos_prior * nets.field_pos_z
        + w.penalty_prior * nets.penalty_net
}

/// Continuous variant. `drives` is the share of `pace` allocated to this
/// team; `hfa_points` applies only when `is_home`.
pub fn gaussian_projection(
    nets: &MatchupNets,
    drives: f64,
    is_home: bool,
    hfa_points: f64,
    baseline: &LeagueBaseline,
    cfg: &ModelConfig,
) -> ScoreProjection {
    let ppd_base = baseline.get(Metric::PointsPerDrive);
    let adv = net_advantage(nets, cfg);

    let mut ppd = (ppd_base.mean + adv * ppd_base.sd).clamp(cfg.ppd_min, cfg.ppd_max);
    if is_home {
        // Added after the clamp so the total scoring shift equals exactly the
        // configured HFA in expectation.
        ppd += hfa_points / drives;
    }
    let mean = ppd * drives;

    // Per-team SD (not half the game SD): boom/bust three-and-out exposure
    // widens it, a consistency edge narrows it.
    let v = &cfg.variance;
    let adverse_three_out = (-nets.three_out_net).max(0.0);
    let favorable_sr = nets.sr_net.max(0.0);
    let sd = (v.base_sd
        * (1.0 + v.three_out_inflation * adverse_three_out)
        * (1.0 - v.success_deflation * favorable_sr))
        .clamp(v.min_sd, v.max_sd);

    ScoreProjection::Gaussian { mean, sd }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Raw per-possession outcome probabilities before any home tilt.
pub fn drive_probs(
    nets: &MatchupNets,
    defense: &TeamStats,
    baseline: &LeagueBaseline,
    cfg: &ModelConfig,
) -> DriveProbs {
    let d = &cfg.drive;
    let league_three_out = baseline.get(Metric::ThreeOutRate).mean;
    let opp_forced = defense.defense(Metric::ThreeOutRate);

    let p_three_out = sigmoid(
        d.three_out_intercept
            - d.three_out_epa * nets.epa_net
            - d.three_out_sr * nets.sr_net
            + d.three_out_opp_rate * (opp_forced - league_three_out)
            + d.three_out_red_zone * (-nets.red_zone_net),
    )
    .clamp(0.0, 1.0);

    let p_td_given_sustained = sigmoid(
        d.td_intercept
            + d.td_epa * nets.epa_net
            + d.td_sr * nets.sr_net
            + d.td_red_zone * nets.red_zone_net
            + d.td_ppd_resid * nets.ppd_resid_net,
    )
    .clamp(0.0, 1.0);

    let sustained = 1.0 - p_three_out;
    let touchdown = sustained * p_td_given_sustained;
    let field_goal = sustained * (1.0 - p_td_given_sustained) * d.fg_share;
    let empty = (1.0 - (p_three_out + touchdown + field_goal)).max(0.0);

    DriveProbs {
        three_out: p_three_out,
        touchdown,
        field_goal,
        empty,
    }
}

/// Apply the home-side tilt: fewer three-and-outs, more touchdowns, scaled
/// back proportionally if the tilted mass exceeds 1.
pub fn tilt_home(probs: DriveProbs, hfa_points: f64, cfg: &ModelConfig) -> DriveProbs {
    let d = &cfg.drive;
    let three_out = (probs.three_out * (1.0 - d.hfa_three_out_pct * hfa_points)).max(0.0);
    let touchdown = (probs.touchdown * (1.0 + d.hfa_td_pct * hfa_points)).max(0.0);
    let field_goal = probs.field_goal.max(0.0);

    let sum = three_out + touchdown + field_goal;
    let scale = if sum > 1.0 { 1.0 / sum } else { 1.0 };
    let three_out = three_out * scale;
    let touchdown = touchdown * scale;
    let field_goal = field_goal * scale;

    DriveProbs {
        three_out,
        touchdown,
        field_goal,
        empty: (1.0 - (three_out + touchdown + field_goal)).max(0.0),
    }
}

/// Discrete variant: outcome probabilities plus the integer possession count
/// allocated from the game pace.
pub fn drive_projection(
    nets: &MatchupNets,
    defense: &TeamStats,
    pace: &GamePace,
    is_home: bool,
    hfa_points: f64,
    baseline: &LeagueBaseline,
    cfg: &ModelConfig,
) -> ScoreProjection {
    let drives = if is_home {
        pace.home_drives()
    } else {
        pace.away_drives()
    };
    let possessions = drives.round().max(1.0) as u32;

    let mut probs = drive_probs(nets, defense, baseline, cfg);
    if is_home {
        probs = tilt_home(probs, hfa_points, cfg);
    }

    ScoreProjection::PerDrive { probs, possessions }
}
