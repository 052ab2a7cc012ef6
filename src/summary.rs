//! Aggregation of the raw trial sequence into summary statistics and
//! market-probability estimates.

use serde::Serialize;

/// Distribution summary for one quantity across all trials.
///
/// Percentiles use sorted-array indexing with `floor((n-1)*p)` — the pinned
/// convention; no interpolation. The median is the midpoint average for even
/// trial counts.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DistSummary {
    pub mean: f64,
    pub median: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OverUnder {
    pub line: f64,
    pub p_over: f64,
    pub p_under: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SpreadCover {
    pub line: f64,
    pub p_home_cover: f64,
    pub p_away_cover: f64,
}

/// Final simulation output. Immutable once computed; the trial sequence it
/// was reduced from is discarded.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub home_team: String,
    pub away_team: String,
    pub trials: usize,
    pub home_score: DistSummary,
    pub away_score: DistSummary,
    pub total: DistSummary,
    pub margin: DistSummary,
    pub p_home_win: f64,
    pub p_away_win: f64,
    pub p_tie: f64,
    pub over_under: Option<OverUnder>,
    pub spread: Option<SpreadCover>,
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Midpoint-average median of a sorted slice.
pub fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
    }
}

/// Percentile by sorted-array index `floor((n-1)*p)`, p in [0,1].
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let p = p.clamp(0.0, 1.0);
    let idx = ((sorted.len() - 1) as f64 * p).floor() as usize;
    sorted[idx]
}

fn dist_summary(values: &[f64]) -> DistSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    DistSummary {
        mean: mean(&sorted),
        median: median(&sorted),
        p10: percentile(&sorted, 0.10),
        p25: percentile(&sorted, 0.25),
        p50: percentile(&sorted, 0.50),
        p75: percentile(&sorted, 0.75),
        p90: percentile(&sorted, 0.90),
    }
}

/// Reduce the full trial sequence to a `SimulationSummary`.
///
/// Spread sign convention: a negative market spread means the home side is
/// favored by that many points, so home covers when `margin > -spread`.
pub fn summarize(
    home_team: &str,
    away_team: &str,
    trials: &[(u32, u32)],
    market_total: Option<f64>,
    market_spread: Option<f64>,
) -> SimulationSummary {
    let n = trials.len();
    let n_f = n.max(1) as f64;

    let home: Vec<f64> = trials.iter().map(|&(h, _)| h as f64).collect();
    let away: Vec<f64> = trials.iter().map(|&(_, a)| a as f64).collect();
    let totals: Vec<f64> = trials.iter().map(|&(h, a)| (h + a) as f64).collect();
    let margins: Vec<f64> = trials
        .iter()
        .map(|&(h, a)| h as f64 - a as f64)
        .collect();

    let home_wins = margins.iter().filter(|&&m| m > 0.0).count() as f64;
    let away_wins = margins.iter().filter(|&&m| m < 0.0).count() as f64;
    let ties = n as f64 - home_wins - away_wins;

    let over_under = market_total.map(|line| {
        let over = totals.iter().filter(|&&t| t > line).count() as f64;
        let under = totals.iter().filter(|&&t| t < line).count() as f64;
        OverUnder {
            line,
            p_over: over / n_f,
            p_under: under / n_f,
        }
    });

    let spread = market_spread.map(|line| {
        let threshold = -line;
        let home_cover = margins.iter().filter(|&&m| m > threshold).count() as f64;
        let away_cover = margins.iter().filter(|&&m| m < threshold).count() as f64;
        SpreadCover {
            line,
            p_home_cover: home_cover / n_f,
            p_away_cover: away_cover / n_f,
        }
    });

    SimulationSummary {
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        trials: n,
        home_score: dist_summary(&home),
        away_score: dist_summary(&away),
        total: dist_summary(&totals),
        margin: dist_summary(&margins),
        p_home_win: home_wins / n_f,
        p_away_win: away_wins / n_f,
        p_tie: ties / n_f,
        over_under,
        spread,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_sequence_aggregates_exactly() {
        let sorted = [38.0, 41.0, 45.0, 50.0, 52.0];
        assert_eq!(median(&sorted), 45.0);
        assert_eq!(percentile(&sorted, 0.50), 45.0);
        assert!((mean(&sorted) - 45.2).abs() < 1e-12);
    }

    #[test]
    fn even_count_median_is_midpoint() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(median(&sorted), 25.0);
    }

    #[test]
    fn percentile_uses_floor_index_convention() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        // floor(9 * 0.10) = 0, floor(9 * 0.25) = 2, floor(9 * 0.90) = 8.
        assert_eq!(percentile(&sorted, 0.10), 1.0);
        assert_eq!(percentile(&sorted, 0.25), 3.0);
        assert_eq!(percentile(&sorted, 0.90), 9.0);
        assert_eq!(percentile(&sorted, 1.0), 10.0);
    }

    #[test]
    fn over_probability_is_an_exact_count() {
        // 6,000 totals of 48 (over 47.5) and 4,000 of 44.
        let mut trials = Vec::with_capacity(10_000);
        for _ in 0..6_000 {
            trials.push((24u32, 24u32));
        }
        for _ in 0..4_000 {
            trials.push((22u32, 22u32));
        }
        let s = summarize("H", "A", &trials, Some(47.5), None);
        let ou = s.over_under.unwrap();
        assert_eq!(ou.p_over, 0.60);
        assert_eq!(ou.p_under, 0.40);
    }

    #[test]
    fn negative_spread_means_home_favored() {
        // Home -3: home covers only when margin > 3.
        let trials = vec![(27u32, 20u32), (23, 21), (20, 24), (24, 21)];
        let s = summarize("H", "A", &trials, None, Some(-3.0));
        let sp = s.spread.unwrap();
        // Margins: 7, 2, -4, 3. Only 7 > 3 covers; 3 is a push.
        assert_eq!(sp.p_home_cover, 0.25);
        assert_eq!(sp.p_away_cover, 0.50);
    }

    #[test]
    fn moneyline_counts_partition_trials() {
        let trials = vec![(28u32, 14u32), (14, 28), (21, 21), (35, 3)];
        let s = summarize("H", "A", &trials, None, None);
        assert_eq!(s.p_home_win, 0.5);
        assert_eq!(s.p_away_win, 0.25);
        assert_eq!(s.p_tie, 0.25);
        assert!((s.p_home_win + s.p_away_win + s.p_tie - 1.0).abs() < 1e-12);
    }

    #[test]
    fn summary_serializes_to_json() {
        let trials = vec![(24u32, 20u32), (17, 27)];
        let s = summarize("KC", "BUF", &trials, Some(44.5), Some(-2.5));
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"home_team\":\"KC\""));
        assert!(json.contains("p_over"));
    }
}
