//! All model tuning in one explicit value object. The historical engine
//! variants differed only in these numbers, so variants are presets of
//! `ModelConfig`, never code forks.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Continuous expected-points mean/SD per team, Gaussian sampling.
    Gaussian,
    /// Discrete per-possession outcome sampling (3-out / TD / FG / empty).
    PerDrive,
}

/// Weights for the net-advantage sum. The first block (summing informally to
/// ~1) carries the matchup nets; the prior block applies small per-z nudges
/// from slower-moving team-quality signals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalWeights {
    pub epa: f64,
    pub success: f64,
    pub ppd_resid: f64,
    pub explosive: f64,
    pub red_zone: f64,
    pub three_out: f64,
    pub dvoa_prior: f64,
    pub turnover_prior: f64,
    pub field_pos_prior: f64,
    pub penalty_prior: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            epa: 0.40,
            success: 0.18,
            ppd_resid: 0.14,
            explosive: 0.10,
            red_zone: 0.09,
            three_out: 0.09,
            dvoa_prior: 0.05,
            turnover_prior: 0.06,
            field_pos_prior: 0.04,
            penalty_prior: 0.04,
        }
    }
}

/// Coefficients stripping the PPD variance already explained by EPA/play and
/// success rate, so all three can feed the weighted sum without
/// triple-counting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResidCoefs {
    pub epa: f64,
    pub sr: f64,
}

impl Default for ResidCoefs {
    fn default() -> Self {
        Self { epa: 0.56, sr: 0.21 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaceConfig {
    /// Multiplicative weight on combined no-huddle tendency.
    pub no_huddle_weight: f64,
    /// Multiplicative weight on early-down pass rate asymmetry vs league.
    pub pass_rate_weight: f64,
    pub min_drives: f64,
    pub max_drives: f64,
    /// k in share = 0.5 + k*(sr_net + 0.5*epa_net).
    pub share_k: f64,
    pub min_share: f64,
    pub max_share: f64,
}

impl Default for PaceConfig {
    fn default() -> Self {
        Self {
            no_huddle_weight: 0.12,
            pass_rate_weight: 0.08,
            min_drives: 20.0,
            max_drives: 30.0,
            share_k: 0.10,
            min_share: 0.42,
            max_share: 0.58,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VarianceConfig {
    /// Single-team scoring SD before modulation. This is a per-team figure,
    /// not half the total-game SD.
    pub base_sd: f64,
    pub min_sd: f64,
    pub max_sd: f64,
    /// SD inflation per unit of adverse three-and-out differential.
    pub three_out_inflation: f64,
    /// SD deflation per unit of favorable success-rate differential.
    pub success_deflation: f64,
}

impl Default for VarianceConfig {
    fn default() -> Self {
        Self {
            base_sd: 10.0,
            min_sd: 6.0,
            max_sd: 14.0,
            three_out_inflation: 0.06,
            success_deflation: 0.05,
        }
    }
}

/// Logistic-link coefficients for the per-drive variant. The intercepts and
/// the field-goal share are calibration anchors fit to historical league
/// rates; treat them as configuration, not truth.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DriveModelConfig {
    pub three_out_intercept: f64,
    pub three_out_epa: f64,
    pub three_out_sr: f64,
    pub three_out_opp_rate: f64,
    pub three_out_red_zone: f64,
    pub td_intercept: f64,
    pub td_epa: f64,
    pub td_sr: f64,
    pub td_red_zone: f64,
    pub td_ppd_resid: f64,
    /// Fraction of sustained non-TD drives ending in a field goal.
    pub fg_share: f64,
    /// Home tilt: fractional reduction of p_three_out per HFA point.
    pub hfa_three_out_pct: f64,
    /// Home tilt: fractional increase of p_touchdown per HFA point.
    pub hfa_td_pct: f64,
}

impl Default for DriveModelConfig {
    fn default() -> Self {
        Self {
            three_out_intercept: -1.31,
            three_out_epa: 0.35,
            three_out_sr: 0.25,
            three_out_opp_rate: 2.0,
            three_out_red_zone: 0.10,
            td_intercept: -0.76,
            td_epa: 0.30,
            td_sr: 0.20,
            td_red_zone: 0.18,
            td_ppd_resid: 0.12,
            fg_share: 0.32,
            hfa_three_out_pct: 0.01,
            hfa_td_pct: 0.02,
        }
    }
}

/// Cross-team score correlation for the correlated-pair Gaussian variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CorrelationConfig {
    pub base_rho: f64,
    pub min_rho: f64,
    pub max_rho: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            base_rho: 0.22,
            min_rho: -0.05,
            max_rho: 0.50,
        }
    }
}

/// Game conditions feeding the rho adjustment. All optional; the default is
/// an outdoor game in calm weather with no market spread context.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GameConditions {
    pub dome: bool,
    pub wind_mph: f64,
    pub precipitation: bool,
}

impl CorrelationConfig {
    /// Condition rho on game context: up for small spreads and domes (shared
    /// pace dominates), down for wind, precipitation, and lopsided spreads.
    pub fn conditioned(&self, expected_spread: f64, cond: GameConditions) -> f64 {
        let mut rho = self.base_rho;
        let spread = expected_spread.abs();
        if spread <= 3.0 {
            rho += 0.05;
        } else if spread >= 10.0 {
            rho -= 0.08;
        }
        if cond.dome {
            rho += 0.04;
        }
        if cond.wind_mph >= 15.0 {
            rho -= 0.06;
        }
        if cond.precipitation {
            rho -= 0.05;
        }
        rho.clamp(self.min_rho, self.max_rho)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub kind: ModelKind,
    pub weights: SignalWeights,
    pub resid: ResidCoefs,
    /// Outlier guard on every standardized input.
    pub z_clamp: f64,
    pub ppd_min: f64,
    pub ppd_max: f64,
    pub variance: VarianceConfig,
    pub pace: PaceConfig,
    pub drive: DriveModelConfig,
    /// None = independent home/away draws (baseline continuous variant).
    pub correlation: Option<CorrelationConfig>,
    pub conditions: GameConditions,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::Gaussian,
            weights: SignalWeights::default(),
            resid: ResidCoefs::default(),
            z_clamp: 3.5,
            ppd_min: 0.4,
            ppd_max: 4.0,
            variance: VarianceConfig::default(),
            pace: PaceConfig::default(),
            drive: DriveModelConfig::default(),
            correlation: None,
            conditions: GameConditions::default(),
        }
    }
}

impl ModelConfig {
    pub fn gaussian() -> Self {
        Self::default()
    }

    pub fn gaussian_correlated() -> Self {
        Self {
            correlation: Some(CorrelationConfig::default()),
            ..Self::default()
        }
    }

    pub fn per_drive() -> Self {
        Self {
            kind: ModelKind::PerDrive,
            ..Self::default()
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "gaussian" => Some(Self::gaussian()),
            "gaussian_correlated" => Some(Self::gaussian_correlated()),
            "per_drive" => Some(Self::per_drive()),
            _ => None,
        }
    }
}

/// Per-invocation simulation options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub home_field_advantage_points: f64,
    pub trial_count: usize,
    pub market_total: Option<f64>,
    pub market_spread: Option<f64>,
    /// Set for reproducible runs; None draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            home_field_advantage_points: 2.0,
            trial_count: 10_000,
            market_total: None,
            market_spread: None,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.trial_count < 1 {
            return Err(SimError::Config(format!(
                "trial_count must be >= 1, got {}",
                self.trial_count
            )));
        }
        if !self.home_field_advantage_points.is_finite() {
            return Err(SimError::Config(
                "home_field_advantage_points must be finite".to_string(),
            ));
        }
        for (label, line) in [
            ("market_total", self.market_total),
            ("market_spread", self.market_spread),
        ] {
            if let Some(v) = line {
                if !v.is_finite() {
                    return Err(SimError::Config(format!("{label} must be a finite number")));
                }
            }
        }
        Ok(())
    }
}
