//! Seeded synthetic datasets for the regression exercises.
//!
//! Both generators draw `x ~ U(lo, hi)` and Gaussian noise `ε ~ N(0, σ)` from a
//! `StdRng` seeded with the configured seed, so a given configuration always
//! produces the same dataset. With `noise_sd = 0` the response is exactly linear.

use super::dataset::{DataError, Dataset};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// `y = intercept + slope * x + ε`.
#[derive(Debug, Clone)]
pub struct LinearDataConfig {
    pub n: usize,
    pub intercept: f64,
    pub slope: f64,
    pub noise_sd: f64,
    pub x_range: (f64, f64),
    pub seed: u64,
}

impl Default for LinearDataConfig {
    fn default() -> Self {
        Self {
            n: 50,
            intercept: 2.0,
            slope: 3.0,
            noise_sd: 1.0,
            x_range: (0.0, 10.0),
            seed: 42,
        }
    }
}

/// `y = intercept + offset[group] + slope * x + ε`, with `n_per_group` rows per level.
#[derive(Debug, Clone)]
pub struct GroupedDataConfig {
    pub n_per_group: usize,
    pub intercept: f64,
    pub slope: f64,
    pub noise_sd: f64,
    pub x_range: (f64, f64),
    /// Group labels and their intercept shifts.
    pub groups: Vec<(String, f64)>,
    pub seed: u64,
}

impl Default for GroupedDataConfig {
    fn default() -> Self {
        Self {
            n_per_group: 20,
            intercept: 10.0,
            slope: 1.5,
            noise_sd: 1.0,
            x_range: (0.0, 10.0),
            groups: vec![
                ("control".to_string(), 0.0),
                ("low".to_string(), 2.0),
                ("high".to_string(), 5.0),
            ],
            seed: 42,
        }
    }
}

struct Sampler {
    rng: StdRng,
    noise: Normal<f64>,
    lo: f64,
    hi: f64,
}

impl Sampler {
    fn new(seed: u64, noise_sd: f64, (lo, hi): (f64, f64)) -> Result<Self, DataError> {
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(DataError::InvalidParameter(format!(
                "x_range must satisfy lo < hi, got ({lo}, {hi})"
            )));
        }
        let noise = Normal::new(0.0, noise_sd).map_err(|e| {
            DataError::InvalidParameter(format!("noise_sd = {noise_sd}: {e}"))
        })?;
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            noise,
            lo,
            hi,
        })
    }

    fn x(&mut self) -> f64 {
        self.rng.gen_range(self.lo..self.hi)
    }

    fn eps(&mut self) -> f64 {
        self.noise.sample(&mut self.rng)
    }
}

/// Simple linear data with columns `x` and `y`.
pub fn simple_linear(config: &LinearDataConfig) -> Result<Dataset, DataError> {
    let mut sampler = Sampler::new(config.seed, config.noise_sd, config.x_range)?;

    let mut x = Vec::with_capacity(config.n);
    let mut y = Vec::with_capacity(config.n);
    for _ in 0..config.n {
        let xi = sampler.x();
        x.push(xi);
        y.push(config.intercept + config.slope * xi + sampler.eps());
    }

    Dataset::new().with_numeric("x", x)?.with_numeric("y", y)
}

/// Grouped linear data with columns `x`, `group` and `y`.
pub fn grouped_linear(config: &GroupedDataConfig) -> Result<Dataset, DataError> {
    if config.groups.is_empty() {
        return Err(DataError::InvalidParameter("at least one group is required".into()));
    }
    let mut sampler = Sampler::new(config.seed, config.noise_sd, config.x_range)?;

    let n = config.n_per_group * config.groups.len();
    let mut x = Vec::with_capacity(n);
    let mut group = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);

    for (label, offset) in &config.groups {
        for _ in 0..config.n_per_group {
            let xi = sampler.x();
            x.push(xi);
            group.push(label.clone());
            y.push(config.intercept + offset + config.slope * xi + sampler.eps());
        }
    }

    Dataset::new()
        .with_numeric("x", x)?
        .with_categorical("group", group)?
        .with_numeric("y", y)
}
