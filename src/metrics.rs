use serde::{Deserialize, Serialize};

/// Canonical per-team metrics. Every metric exists in an offensive and a
/// defensive (allowed/forced) flavor, and both flavors share one league
/// baseline because the quantity is defined identically on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    PointsPerDrive,
    EpaPerPlay,
    SuccessRate,
    ExplosiveRate,
    RedZoneTdRate,
    ThreeOutRate,
    PenaltiesPerDrive,
    TurnoverEpa,
    StartingFieldPosition,
    Dvoa,
    DrivesPerGame,
    PlaysPerDrive,
    EarlyDownPassRate,
    NoHuddleRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Offense,
    Defense,
}

pub const ALL_METRICS: [Metric; 14] = [
    Metric::PointsPerDrive,
    Metric::EpaPerPlay,
    Metric::SuccessRate,
    Metric::ExplosiveRate,
    Metric::RedZoneTdRate,
    Metric::ThreeOutRate,
    Metric::PenaltiesPerDrive,
    Metric::TurnoverEpa,
    Metric::StartingFieldPosition,
    Metric::Dvoa,
    Metric::DrivesPerGame,
    Metric::PlaysPerDrive,
    Metric::EarlyDownPassRate,
    Metric::NoHuddleRate,
];

impl Metric {
    /// League-average fallback used when a source record has no usable value.
    /// 2023-24 NFL full-season ballpark figures.
    pub fn default_value(self) -> f64 {
        match self {
            Metric::PointsPerDrive => 2.10,
            Metric::EpaPerPlay => 0.0,
            Metric::SuccessRate => 0.43,
            Metric::ExplosiveRate => 0.11,
            Metric::RedZoneTdRate => 0.57,
            Metric::ThreeOutRate => 0.22,
            Metric::PenaltiesPerDrive => 0.35,
            Metric::TurnoverEpa => 0.0,
            Metric::StartingFieldPosition => 28.5,
            Metric::Dvoa => 0.0,
            Metric::DrivesPerGame => 11.2,
            Metric::PlaysPerDrive => 5.9,
            Metric::EarlyDownPassRate => 0.52,
            Metric::NoHuddleRate => 0.05,
        }
    }

    /// True when a larger value is good for the offense producing it.
    /// Three-and-outs and penalties hurt the side accumulating them, so net
    /// signals for those flip direction in the net builder.
    pub fn higher_is_better(self) -> bool {
        !matches!(self, Metric::ThreeOutRate | Metric::PenaltiesPerDrive)
    }

    /// Stable identifier used in config files and diagnostics output.
    pub fn key(self) -> &'static str {
        match self {
            Metric::PointsPerDrive => "ppd",
            Metric::EpaPerPlay => "epa_play",
            Metric::SuccessRate => "success_rate",
            Metric::ExplosiveRate => "explosive_rate",
            Metric::RedZoneTdRate => "rz_td_rate",
            Metric::ThreeOutRate => "three_out_rate",
            Metric::PenaltiesPerDrive => "penalties_per_drive",
            Metric::TurnoverEpa => "turnover_epa",
            Metric::StartingFieldPosition => "start_field_pos",
            Metric::Dvoa => "dvoa",
            Metric::DrivesPerGame => "drives_per_game",
            Metric::PlaysPerDrive => "plays_per_drive",
            Metric::EarlyDownPassRate => "early_down_pass_rate",
            Metric::NoHuddleRate => "no_huddle_rate",
        }
    }
}

impl Side {
    pub fn prefix(self) -> &'static str {
        match self {
            Side::Offense => "off",
            Side::Defense => "def",
        }
    }
}

/// "off_ppd", "def_three_out_rate", ... — the canonical column name the
/// normalizer maps aliases onto.
pub fn canonical_key(metric: Metric, side: Side) -> String {
    format!("{}_{}", side.prefix(), metric.key())
}
