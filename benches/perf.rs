use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use gridiron_mc::baseline::LeagueBaseline;
use gridiron_mc::engine::simulate_game;
use gridiron_mc::model_config::{ModelConfig, SimConfig};
use gridiron_mc::nets::build_nets;
use gridiron_mc::team::TeamStats;

fn fixtures() -> (TeamStats, TeamStats) {
    (
        TeamStats::league_average("HOME"),
        TeamStats::league_average("AWAY"),
    )
}

fn bench_build_nets(c: &mut Criterion) {
    let (home, away) = fixtures();
    let b = LeagueBaseline::static_default();
    let model = ModelConfig::default();
    c.bench_function("build_nets", |bch| {
        bch.iter(|| {
            let nets = build_nets(black_box(&home), black_box(&away), b, &model);
            black_box(nets.epa_net);
        })
    });
}

fn bench_gaussian_10k(c: &mut Criterion) {
    let (home, away) = fixtures();
    let b = LeagueBaseline::static_default();
    let model = ModelConfig::gaussian();
    let sim = SimConfig {
        trial_count: 10_000,
        seed: Some(1),
        ..SimConfig::default()
    };
    c.bench_function("simulate_gaussian_10k", |bch| {
        bch.iter(|| {
            let s = simulate_game(black_box(&home), black_box(&away), b, &model, &sim).unwrap();
            black_box(s.total.mean);
        })
    });
}

fn bench_per_drive_10k(c: &mut Criterion) {
    let (home, away) = fixtures();
    let b = LeagueBaseline::static_default();
    let model = ModelConfig::per_drive();
    let sim = SimConfig {
        trial_count: 10_000,
        seed: Some(1),
        ..SimConfig::default()
    };
    c.bench_function("simulate_per_drive_10k", |bch| {
        bch.iter(|| {
            let s = simulate_game(black_box(&home), black_box(&away), b, &model, &sim).unwrap();
            black_box(s.total.mean);
        })
    });
}

criterion_group!(benches, bench_build_nets, bench_gaussian_10k, bench_per_drive_10k);
criterion_main!(benches);
