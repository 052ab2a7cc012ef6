//! League Baseline Store: per-metric (mean, sd) pairs used to standardize
//! raw team values. Either the static league-wide constants or a snapshot
//! recomputed from a loaded team batch; in both cases the snapshot is fixed
//! before any simulation reads it.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::metrics::{ALL_METRICS, Metric, Side};
use crate::team::TeamStats;

/// Floor applied to recomputed standard deviations so a degenerate batch
/// (one team, identical teams) cannot produce a zero divisor.
const SD_FLOOR: f64 = 0.001;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricBaseline {
    pub mean: f64,
    pub sd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueBaseline {
    map: HashMap<Metric, MetricBaseline>,
}

static STATIC_BASELINE: Lazy<LeagueBaseline> = Lazy::new(|| {
    // Full-season NFL spreads; means match the per-metric defaults so a
    // default-filled team standardizes to zero everywhere.
    let table = [
        (Metric::PointsPerDrive, 2.10, 0.45),
        (Metric::EpaPerPlay, 0.0, 0.08),
        (Metric::SuccessRate, 0.43, 0.035),
        (Metric::ExplosiveRate, 0.11, 0.02),
        (Metric::RedZoneTdRate, 0.57, 0.09),
        (Metric::ThreeOutRate, 0.22, 0.045),
        (Metric::PenaltiesPerDrive, 0.35, 0.08),
        (Metric::TurnoverEpa, 0.0, 1.6),
        (Metric::StartingFieldPosition, 28.5, 1.8),
        (Metric::Dvoa, 0.0, 12.0),
        (Metric::DrivesPerGame, 11.2, 0.9),
        (Metric::PlaysPerDrive, 5.9, 0.5),
        (Metric::EarlyDownPassRate, 0.52, 0.05),
        (Metric::NoHuddleRate, 0.05, 0.06),
    ];
    let map = table
        .into_iter()
        .map(|(m, mean, sd)| (m, MetricBaseline { mean, sd }))
        .collect();
    LeagueBaseline { map }
});

impl LeagueBaseline {
    /// The fixed league-constants preset.
    pub fn static_default() -> &'static LeagueBaseline {
        &STATIC_BASELINE
    }

    /// Recompute mean/SD per metric from a loaded team batch. Offensive and
    /// defensive values are pooled: the metric means the same thing measured
    /// as production or as allowed, and pooling doubles the sample.
    pub fn from_teams(teams: &[TeamStats]) -> LeagueBaseline {
        let mut map = HashMap::new();
        for m in ALL_METRICS {
            let values: Vec<f64> = teams
                .iter()
                .flat_map(|t| [t.get(m, Side::Offense), t.get(m, Side::Defense)])
                .filter(|v| v.is_finite())
                .collect();
            map.insert(m, sample_baseline(&values, m));
        }
        LeagueBaseline { map }
    }

    pub fn get(&self, metric: Metric) -> MetricBaseline {
        self.map.get(&metric).copied().unwrap_or(MetricBaseline {
            mean: metric.default_value(),
            sd: 0.0,
        })
    }

    /// Standardize a raw value. A zero or non-finite SD yields exactly 0
    /// (no signal); NaN/Infinity can never leave this function.
    pub fn zscore(&self, metric: Metric, value: f64) -> f64 {
        let b = self.get(metric);
        if !value.is_finite() || !b.sd.is_finite() || b.sd <= 0.0 || !b.mean.is_finite() {
            return 0.0;
        }
        (value - b.mean) / b.sd
    }
}

fn sample_baseline(values: &[f64], metric: Metric) -> MetricBaseline {
    if values.is_empty() {
        return MetricBaseline {
            mean: metric.default_value(),
            sd: SD_FLOOR,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    MetricBaseline {
        mean,
        sd: variance.sqrt().max(SD_FLOOR),
    }
}
