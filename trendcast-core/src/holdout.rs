//! Hold-out accuracy diagnostic.
//!
//! Shuffles a series' observations with a seeded RNG, fits a line on the
//! training share and scores it on the rest. The result is informational
//! only: projections always use the full-history fit from
//! [`crate::projector::fit`].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::domain::{Observation, Series, TrendModel};
use crate::error::TrendError;
use crate::projector::{fit, MIN_OBSERVATIONS};

/// Train/test split settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldoutConfig {
    /// Fraction of observations held out for testing, in `[0, 1]`.
    pub test_share: f64,
    /// RNG seed for the shuffle.
    pub seed: u64,
}

impl Default for HoldoutConfig {
    fn default() -> Self {
        Self {
            test_share: 0.2,
            seed: 42,
        }
    }
}

/// Scores of a line fitted on the training split, measured on the test split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldoutReport {
    pub series: String,
    pub train_model: TrendModel,
    pub n_train: usize,
    pub n_test: usize,
    /// Held-out periods, ascending.
    pub test_periods: Vec<i32>,
    pub mae: f64,
    pub rmse: f64,
    /// `None` when the test values have zero variance.
    pub r_squared: Option<f64>,
}

/// Number of observations held out from `n` at `test_share` (rounded up).
pub fn test_size(n: usize, test_share: f64) -> usize {
    let share = test_share.clamp(0.0, 1.0);
    ((n as f64 * share).ceil() as usize).min(n)
}

/// Fit on a seeded training split of `series` and score on the held-out rest.
///
/// # Errors
///
/// [`TrendError::InsufficientData`] unless the split leaves at least two
/// training and one test observation; fit errors on the training split are
/// propagated.
pub fn evaluate_holdout(
    series: &Series,
    config: &HoldoutConfig,
) -> Result<HoldoutReport, TrendError> {
    let n = series.len();
    let n_test = test_size(n, config.test_share);
    if n_test == 0 || n - n_test < MIN_OBSERVATIONS {
        return Err(TrendError::InsufficientData {
            series: series.name().to_string(),
            required: MIN_OBSERVATIONS + 1,
            actual: n,
        });
    }

    let mut shuffled: Vec<Observation> = series.observations().to_vec();
    let mut rng = StdRng::seed_from_u64(config.seed);
    shuffled.shuffle(&mut rng);

    let (test, train) = shuffled.split_at(n_test);
    let train_series = Series::new(series.name(), train.to_vec());
    let train_model = fit(&train_series)?;

    let errors: Vec<f64> = test
        .iter()
        .map(|o| o.value - train_model.predict(o.period))
        .collect();
    let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n_test as f64;
    let rmse = (errors.iter().map(|e| e * e).sum::<f64>() / n_test as f64).sqrt();

    let test_mean = test.iter().map(|o| o.value).sum::<f64>() / n_test as f64;
    let ss_tot: f64 = test.iter().map(|o| (o.value - test_mean).powi(2)).sum();
    let ss_res: f64 = errors.iter().map(|e| e * e).sum();
    let r_squared = (ss_tot > 0.0).then(|| 1.0 - ss_res / ss_tot);

    let mut test_periods: Vec<i32> = test.iter().map(|o| o.period).collect();
    test_periods.sort_unstable();

    Ok(HoldoutReport {
        series: series.name().to_string(),
        train_model,
        n_train: train.len(),
        n_test,
        test_periods,
        mae,
        rmse,
        r_squared,
    })
}
