use std::collections::HashMap;

use crate::metrics::{ALL_METRICS, Metric, Side};

/// One team's season statistics, complete by construction: every metric on
/// both sides has a value, either parsed from source data or a league-default
/// fallback. Immutable after construction.
#[derive(Debug, Clone)]
pub struct TeamStats {
    pub name: String,
    values: HashMap<(Metric, Side), f64>,
}

impl TeamStats {
    /// Build from whatever values the caller has; anything missing (or
    /// non-finite) is filled with the metric's league default.
    pub fn new(name: impl Into<String>, mut values: HashMap<(Metric, Side), f64>) -> Self {
        for m in ALL_METRICS {
            for side in [Side::Offense, Side::Defense] {
                let entry = values.entry((m, side)).or_insert_with(|| m.default_value());
                if !entry.is_finite() {
                    *entry = m.default_value();
                }
            }
        }
        Self {
            name: name.into(),
            values,
        }
    }

    /// A team sitting exactly at every league default. Handy as a neutral
    /// opponent in tests and as the end-to-end symmetry fixture.
    pub fn league_average(name: impl Into<String>) -> Self {
        Self::new(name, HashMap::new())
    }

    pub fn offense(&self, metric: Metric) -> f64 {
        self.get(metric, Side::Offense)
    }

    pub fn defense(&self, metric: Metric) -> f64 {
        self.get(metric, Side::Defense)
    }

    pub fn get(&self, metric: Metric, side: Side) -> f64 {
        // The constructor guarantees the key exists; the fallback keeps this
        // infallible even for a hand-built map that bypassed `new`.
        self.values
            .get(&(metric, side))
            .copied()
            .unwrap_or_else(|| metric.default_value())
    }
}

/// Name-keyed collection held for the duration of a session.
pub type TeamDb = HashMap<String, TeamStats>;
