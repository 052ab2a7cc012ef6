//! Trial sampler: draws N (home, away) score pairs from a pair of score
//! projections. Pure RNG consumption, no other side effects.

use rand::Rng;

use crate::scoring::{DriveProbs, ScoreProjection};

/// One Box-Muller transform: two independent standard normals from two
/// uniform draws.
pub fn standard_normal_pair<R: Rng>(rng: &mut R) -> (f64, f64) {
    // Guard u1 away from zero so ln() stays finite.
    let u1: f64 = rng.gen_range(f64::MIN_POSITIVE..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let r = (-2.0 * u1.ln()).sqrt();
    let theta = 2.0 * std::f64::consts::PI * u2;
    (r * theta.cos(), r * theta.sin())
}

fn clamp_score(points: f64) -> u32 {
    points.round().max(0.0) as u32
}

fn sample_drive_score<R: Rng>(rng: &mut R, probs: &DriveProbs, possessions: u32) -> u32 {
    let mut points = 0u32;
    for _ in 0..possessions {
        let u: f64 = rng.gen_range(0.0..1.0);
        // Cumulative classification in fixed order: 3-out, TD, FG, empty.
        if u < probs.three_out {
            // three-and-out, no points
        } else if u < probs.three_out + probs.touchdown {
            points += 7;
        } else if u < probs.three_out + probs.touchdown + probs.field_goal {
            points += 3;
        }
        // else: sustained but empty possession
    }
    points
}

fn sample_one<R: Rng>(rng: &mut R, proj: &ScoreProjection) -> u32 {
    match proj {
        ScoreProjection::Gaussian { mean, sd } => {
            let (z, _) = standard_normal_pair(rng);
            clamp_score(mean + z * sd)
        }
        ScoreProjection::PerDrive { probs, possessions } => {
            sample_drive_score(rng, probs, *possessions)
        }
    }
}

/// Draw `trials` independent (home, away) score pairs. `rho` correlates the
/// home/away normal draws in the Gaussian path (0.0 = the baseline
/// independent variant); the discrete path shares only the game pace and
/// ignores `rho`.
pub fn sample_trials<R: Rng>(
    rng: &mut R,
    home: &ScoreProjection,
    away: &ScoreProjection,
    trials: usize,
    rho: f64,
) -> Vec<(u32, u32)> {
    let mut out = Vec::with_capacity(trials);
    match (home, away) {
        (
            ScoreProjection::Gaussian { mean: mh, sd: sh },
            ScoreProjection::Gaussian { mean: ma, sd: sa },
        ) => {
            let rho = rho.clamp(-1.0, 1.0);
            let mix = (1.0 - rho * rho).sqrt();
            for _ in 0..trials {
                let (z1, z2) = standard_normal_pair(rng);
                let zh = z1;
                let za = rho * z1 + mix * z2;
                out.push((clamp_score(mh + zh * sh), clamp_score(ma + za * sa)));
            }
        }
        _ => {
            for _ in 0..trials {
                let h = sample_one(rng, home);
                let a = sample_one(rng, away);
                out.push((h, a));
            }
        }
    }
    out
}
