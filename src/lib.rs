pub mod baseline;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod model_config;
pub mod nets;
pub mod normalizer;
pub mod pace;
pub mod sampler;
pub mod scoring;
pub mod summary;
pub mod team;
