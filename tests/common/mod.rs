//! Common test utilities and data generators.
#![allow(dead_code)]

use lm_workbook::data::Dataset;
use std::path::PathBuf;

/// Ten points close to y = 1 + 2x, x = 1..10.
pub fn small_linear_data() -> Dataset {
    let x: Vec<f64> = (1..=10).map(f64::from).collect();
    let y = vec![3.1, 4.9, 7.2, 8.8, 11.1, 13.0, 14.8, 17.2, 18.9, 21.1];
    Dataset::new()
        .with_numeric("x", x)
        .and_then(|d| d.with_numeric("y", y))
        .expect("valid dataset")
}

/// y = intercept + slope * x exactly, x = 0..n.
pub fn exact_line(n: usize, intercept: f64, slope: f64) -> Dataset {
    let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let y: Vec<f64> = x.iter().map(|&xi| intercept + slope * xi).collect();
    Dataset::new()
        .with_numeric("x", x)
        .and_then(|d| d.with_numeric("y", y))
        .expect("valid dataset")
}

/// Linear data with deterministic pseudo-random noise in [-noise, noise].
pub fn noisy_line(n: usize, intercept: f64, slope: f64, noise: f64, seed: u64) -> Dataset {
    // Simple deterministic "random" for reproducibility
    let mut rng_state = seed;
    let mut next_rand = || -> f64 {
        rng_state = rng_state.wrapping_mul(6364136223846793005).wrapping_add(1);
        ((rng_state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
    };

    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let xi = i as f64 * 0.5;
        x.push(xi);
        y.push(intercept + slope * xi + noise * next_rand());
    }
    Dataset::new()
        .with_numeric("x", x)
        .and_then(|d| d.with_numeric("y", y))
        .expect("valid dataset")
}

/// Same as `noisy_line` with the response of row `index` shifted by `shift`.
pub fn line_with_outlier(n: usize, index: usize, shift: f64) -> Dataset {
    let base = noisy_line(n, 1.0, 2.0, 0.3, 7);
    let x = base.numeric("x").expect("numeric x").to_vec();
    let mut y = base.numeric("y").expect("numeric y").to_vec();
    y[index] += shift;
    Dataset::new()
        .with_numeric("x", x)
        .and_then(|d| d.with_numeric("y", y))
        .expect("valid dataset")
}

/// Three groups with intercept shifts 0 (A), 3 (B) and -2 (C) around
/// y = 5 + 1.5x, with alternating ±0.25 noise.
pub fn grouped_data(n_per_group: usize) -> Dataset {
    let groups = [("A", 0.0), ("B", 3.0), ("C", -2.0)];
    let mut x = Vec::new();
    let mut group = Vec::new();
    let mut y = Vec::new();

    for (g, (label, offset)) in groups.iter().enumerate() {
        for i in 0..n_per_group {
            let xi = (i as f64) + 0.3 * g as f64;
            let noise = if (i + g) % 2 == 0 { 0.25 } else { -0.25 };
            x.push(xi);
            group.push(*label);
            y.push(5.0 + offset + 1.5 * xi + noise);
        }
    }

    Dataset::new()
        .with_numeric("x", x)
        .and_then(|d| d.with_categorical("group", group))
        .and_then(|d| d.with_numeric("y", y))
        .expect("valid dataset")
}

/// Path of the bundled exercise dataset.
pub fn exercise_csv() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/exercise.csv")
}

/// Fresh scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lm-workbook-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
