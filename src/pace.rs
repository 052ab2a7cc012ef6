//! Pace/Drive-Allocator: expected combined possessions for the game and the
//! home side's share of them.

use crate::baseline::LeagueBaseline;
use crate::metrics::{Metric, Side};
use crate::model_config::ModelConfig;
use crate::nets::MatchupNets;
use crate::team::TeamStats;

#[derive(Debug, Clone, Copy)]
pub struct GamePace {
    /// Combined drives for both teams, clamped to a realistic NFL range.
    pub total_drives: f64,
    /// Fraction of those drives going to the home offense, clamped to a
    /// symmetric band around 0.5.
    pub home_share: f64,
}

impl GamePace {
    pub fn home_drives(&self) -> f64 {
        self.total_drives * self.home_share
    }

    pub fn away_drives(&self) -> f64 {
        self.total_drives * (1.0 - self.home_share)
    }
}

/// `home_nets` is the home-offense-vs-away-defense record.
pub fn allocate_pace(
    home: &TeamStats,
    away: &TeamStats,
    home_nets: &MatchupNets,
    baseline: &LeagueBaseline,
    cfg: &ModelConfig,
) -> GamePace {
    // Each team's drive count is its own offensive pace blended with what the
    // opposing defense allows; the game total is the SUM of the two estimates.
    // Averaging all four numbers instead would halve the game and is the
    // classic undercount bug.
    let home_est = 0.5
        * (home.offense(Metric::DrivesPerGame) + away.defense(Metric::DrivesPerGame));
    let away_est = 0.5
        * (away.offense(Metric::DrivesPerGame) + home.defense(Metric::DrivesPerGame));
    let base = home_est + away_est;

    let z = |team: &TeamStats, metric: Metric| -> f64 {
        baseline
            .zscore(metric, team.get(metric, Side::Offense))
            .clamp(-cfg.z_clamp, cfg.z_clamp)
    };

    // Small multiplicative tilts, each bounded by its configured weight.
    let nh_z = 0.5 * (z(home, Metric::NoHuddleRate) + z(away, Metric::NoHuddleRate));
    let pass_z =
        0.5 * (z(home, Metric::EarlyDownPassRate) + z(away, Metric::EarlyDownPassRate));
    let tempo = 1.0
        + cfg.pace.no_huddle_weight * (nh_z / cfg.z_clamp)
        + cfg.pace.pass_rate_weight * (pass_z / cfg.z_clamp);

    let total_drives = (base * tempo).clamp(cfg.pace.min_drives, cfg.pace.max_drives);

    let raw_share =
        0.5 + cfg.pace.share_k * (home_nets.sr_net + 0.5 * home_nets.epa_net);
    let home_share = raw_share.clamp(cfg.pace.min_share, cfg.pace.max_share);

    GamePace {
        total_drives,
        home_share,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn team_with(entries: &[(Metric, Side, f64)]) -> TeamStats {
        let mut vals = HashMap::new();
        for &(m, s, v) in entries {
            vals.insert((m, s), v);
        }
        TeamStats::new("T", vals)
    }

    #[test]
    fn drives_are_the_sum_of_two_averages() {
        // (12+11)/2 + (11.5+12.5)/2 = 11.5 + 12 = 23.5, not the four-way
        // average 11.75.
        let home = team_with(&[
            (Metric::DrivesPerGame, Side::Offense, 12.0),
            (Metric::DrivesPerGame, Side::Defense, 12.5),
        ]);
        let away = team_with(&[
            (Metric::DrivesPerGame, Side::Offense, 11.5),
            (Metric::DrivesPerGame, Side::Defense, 11.0),
        ]);
        let nets = MatchupNets::default();
        let pace = allocate_pace(
            &home,
            &away,
            &nets,
            LeagueBaseline::static_default(),
            &ModelConfig::default(),
        );
        // Both teams sit at league-average tempo metrics, so no adjustment.
        assert!((pace.total_drives - 23.5).abs() < 1e-9);
    }

    #[test]
    fn drives_and_share_respect_bounds() {
        let fast = team_with(&[
            (Metric::DrivesPerGame, Side::Offense, 19.0),
            (Metric::DrivesPerGame, Side::Defense, 19.0),
            (Metric::NoHuddleRate, Side::Offense, 0.6),
        ]);
        let cfg = ModelConfig::default();
        let mut nets = MatchupNets::default();
        nets.sr_net = 7.0;
        nets.epa_net = 7.0;
        let pace = allocate_pace(&fast, &fast, &nets, LeagueBaseline::static_default(), &cfg);
        assert_eq!(pace.total_drives, cfg.pace.max_drives);
        assert_eq!(pace.home_share, cfg.pace.max_share);

        let slow = team_with(&[
            (Metric::DrivesPerGame, Side::Offense, 6.0),
            (Metric::DrivesPerGame, Side::Defense, 6.0),
        ]);
        nets.sr_net = -7.0;
        nets.epa_net = -7.0;
        let pace = allocate_pace(&slow, &slow, &nets, LeagueBaseline::static_default(), &cfg);
        assert_eq!(pace.total_drives, cfg.pace.min_drives);
        assert_eq!(pace.home_share, cfg.pace.min_share);
    }

    #[test]
    fn no_huddle_tempo_adds_drives() {
        let base = team_with(&[(Metric::DrivesPerGame, Side::Offense, 11.2)]);
        let hurry = team_with(&[
            (Metric::DrivesPerGame, Side::Offense, 11.2),
            (Metric::NoHuddleRate, Side::Offense, 0.25),
        ]);
        let nets = MatchupNets::default();
        let b = LeagueBaseline::static_default();
        let cfg = ModelConfig::default();
        let normal = allocate_pace(&base, &base, &nets, b, &cfg);
        let uptempo = allocate_pace(&hurry, &hurry, &nets, b, &cfg);
        assert!(uptempo.total_drives > normal.total_drives);
    }

    #[test]
    fn drive_split_conserves_total() {
        let pace = GamePace {
            total_drives: 24.0,
            home_share: 0.55,
        };
        assert!((pace.home_drives() + pace.away_drives() - 24.0).abs() < 1e-12);
    }
}
