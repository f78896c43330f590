//! Linear model relating sentiment features to the market reaction.
//!
//! Ordinary least squares on the probability features (plus the predicted
//! label when present), solved through the normal equations with a small
//! ridge term for numerical stability.

use crate::analysis::AlignedEvent;
use crate::error::AnalysisError;
use anyhow::{Context, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Errors from fitting or applying the reaction model.
#[derive(Error, Debug)]
pub enum RegressionError {
    #[error("model has not been fitted yet")]
    NotFitted,

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("normal equations are singular")]
    Singular,
}

/// OLS regression of reaction on sentiment features.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReactionModel {
    /// Fitted coefficients, one per feature column.
    pub coefficients: Option<Array1<f64>>,
    /// Intercept term.
    pub intercept: Option<f64>,
    /// Feature names in column order.
    pub feature_names: Vec<String>,
    /// In-sample R².
    pub r_squared: Option<f64>,
}

/// Build the design matrix and target vector from aligned events.
///
/// Columns are the prefix-matching numeric attributes in sorted name order,
/// followed by the predicted-label attribute when any event carries it.
/// Events missing a selected attribute contribute 0 in that column. Fails
/// with a schema error when no attribute matches the prefix.
pub fn feature_matrix(
    aligned: &[AlignedEvent],
    feature_prefix: &str,
) -> Result<(Array2<f64>, Array1<f64>, Vec<String>), AnalysisError> {
    let mut names: BTreeSet<String> = BTreeSet::new();
    let mut has_prediction = false;
    for entry in aligned {
        for (name, value) in &entry.event.attributes {
            if name.starts_with(feature_prefix) && value.as_number().is_some() {
                names.insert(name.clone());
            }
        }
        if entry
            .event
            .number(crate::defaults::PREDICTION_ATTRIBUTE)
            .is_some()
        {
            has_prediction = true;
        }
    }
    if names.is_empty() {
        return Err(AnalysisError::Schema(format!(
            "no numeric attribute with prefix '{}'",
            feature_prefix
        )));
    }

    let mut columns: Vec<String> = names.into_iter().collect();
    if has_prediction {
        columns.push(crate::defaults::PREDICTION_ATTRIBUTE.to_string());
    }

    let mut x = Array2::<f64>::zeros((aligned.len(), columns.len()));
    let mut y = Array1::<f64>::zeros(aligned.len());
    for (row, entry) in aligned.iter().enumerate() {
        for (column, name) in columns.iter().enumerate() {
            x[[row, column]] = entry.event.number(name).unwrap_or(0.0);
        }
        y[row] = entry.reaction;
    }

    Ok((x, y, columns))
}

impl ReactionModel {
    /// Fit by OLS with an intercept.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), RegressionError> {
        if x.nrows() != y.len() {
            return Err(RegressionError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(RegressionError::DimensionMismatch {
                expected: 1,
                got: 0,
            });
        }

        let n = x.nrows() as f64;
        let column_means: Array1<f64> = x
            .columns()
            .into_iter()
            .map(|column| column.sum() / n)
            .collect();
        let y_mean = y.sum() / n;

        // Center both sides so the intercept falls out of the solve.
        let mut centered = x.clone();
        for (column, &mean) in column_means.iter().enumerate() {
            centered.column_mut(column).mapv_inplace(|v| v - mean);
        }
        let y_centered = y.mapv(|v| v - y_mean);

        let xtx = centered.t().dot(&centered);
        let xty = centered.t().dot(&y_centered);
        let coefficients = solve_linear_system(&xtx, &xty).ok_or(RegressionError::Singular)?;

        let intercept = y_mean - column_means.dot(&coefficients);

        let predictions = x.dot(&coefficients) + intercept;
        let ss_tot: f64 = y.iter().map(|&v| (v - y_mean).powi(2)).sum();
        let ss_res: f64 = y
            .iter()
            .zip(predictions.iter())
            .map(|(&actual, &predicted)| (actual - predicted).powi(2))
            .sum();
        self.r_squared = if ss_tot > 0.0 {
            Some(1.0 - ss_res / ss_tot)
        } else {
            None
        };

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        Ok(())
    }

    /// Predicted reaction for each row of the design matrix.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, RegressionError> {
        let coefficients = self.coefficients.as_ref().ok_or(RegressionError::NotFitted)?;
        let intercept = self.intercept.ok_or(RegressionError::NotFitted)?;
        if x.ncols() != coefficients.len() {
            return Err(RegressionError::DimensionMismatch {
                expected: coefficients.len(),
                got: x.ncols(),
            });
        }
        Ok(x.dot(coefficients) + intercept)
    }

    /// Persist the fitted model as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create model directory: {:?}", parent))?;
        }
        let file = File::create(path)
            .with_context(|| format!("failed to create model file: {:?}", path))?;
        serde_json::to_writer(file, self).context("failed to serialize reaction model")?;
        Ok(())
    }

    /// Load a model previously written by [`ReactionModel::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("failed to open model file: {:?}", path))?;
        serde_json::from_reader(file).context("failed to deserialize reaction model")
    }
}

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
///
/// A tiny ridge term keeps nearly-collinear probability columns (which sum
/// to 1 by construction) from producing a singular system.
fn solve_linear_system(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n == 0 || a.ncols() != n || b.len() != n {
        return None;
    }

    let mut matrix = a.clone();
    for i in 0..n {
        matrix[[i, i]] += 1e-10;
    }
    let mut rhs = b.clone();

    for pivot in 0..n {
        let mut best = pivot;
        for row in (pivot + 1)..n {
            if matrix[[row, pivot]].abs() > matrix[[best, pivot]].abs() {
                best = row;
            }
        }
        if matrix[[best, pivot]].abs() < 1e-12 {
            return None;
        }
        if best != pivot {
            for column in 0..n {
                let tmp = matrix[[pivot, column]];
                matrix[[pivot, column]] = matrix[[best, column]];
                matrix[[best, column]] = tmp;
            }
            rhs.swap(pivot, best);
        }

        for row in (pivot + 1)..n {
            let factor = matrix[[row, pivot]] / matrix[[pivot, pivot]];
            for column in pivot..n {
                matrix[[row, column]] -= factor * matrix[[pivot, column]];
            }
            rhs[row] -= factor * rhs[pivot];
        }
    }

    let mut solution = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let mut sum = rhs[row];
        for column in (row + 1)..n {
            sum -= matrix[[row, column]] * solution[column];
        }
        solution[row] = sum / matrix[[row, row]];
    }
    Some(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NewsEvent;
    use chrono::Utc;
    use ndarray::array;
    use tempfile::tempdir;

    fn make_aligned(reaction: f64, prob_positive: f64) -> AlignedEvent {
        let timestamp = Utc::now();
        AlignedEvent {
            event: NewsEvent::new(timestamp)
                .with_attr("sentiment_prob_positive", prob_positive)
                .with_attr("sentiment_pred", if prob_positive > 0.5 { 1.0 } else { -1.0 }),
            matched_at: timestamp,
            reaction,
        }
    }

    #[test]
    fn test_fit_recovers_linear_relationship() {
        // y = 2x + 1, exactly.
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![1.0, 3.0, 5.0, 7.0];

        let mut model = ReactionModel::default();
        model.fit(&x, &y).unwrap();

        let coefficients = model.coefficients.as_ref().unwrap();
        assert!((coefficients[0] - 2.0).abs() < 1e-6);
        assert!((model.intercept.unwrap() - 1.0).abs() < 1e-6);
        assert!(model.r_squared.unwrap() > 0.999);
    }

    #[test]
    fn test_predict_matches_fit() {
        let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [2.0, 1.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];

        let mut model = ReactionModel::default();
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();
        for (actual, predicted) in y.iter().zip(predictions.iter()) {
            assert!((actual - predicted).abs() < 1e-6);
        }
    }

    #[test]
    fn test_feature_matrix_selects_prefix_and_prediction() {
        let aligned = vec![make_aligned(0.01, 0.9), make_aligned(-0.02, 0.2)];
        let (x, y, names) = feature_matrix(&aligned, "sentiment_prob_").unwrap();

        assert_eq!(names, vec!["sentiment_prob_positive", "sentiment_pred"]);
        assert_eq!(x.nrows(), 2);
        assert_eq!(x[[0, 0]], 0.9);
        assert_eq!(y[1], -0.02);
    }

    #[test]
    fn test_feature_matrix_without_features_is_schema_error() {
        let timestamp = Utc::now();
        let aligned = vec![AlignedEvent {
            event: NewsEvent::new(timestamp),
            matched_at: timestamp,
            reaction: 0.0,
        }];
        let err = feature_matrix(&aligned, "sentiment_prob_").unwrap_err();
        assert!(matches!(err, AnalysisError::Schema(_)));
    }

    #[test]
    fn test_unfitted_predict_errors() {
        let model = ReactionModel::default();
        let err = model.predict(&array![[1.0]]).unwrap_err();
        assert!(matches!(err, RegressionError::NotFitted));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let x = array![[0.0], [1.0], [2.0]];
        let y = array![0.5, 1.5, 2.5];
        let mut model = ReactionModel::default();
        model.fit(&x, &y).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("reaction.json");
        model.save(&path).unwrap();

        let loaded = ReactionModel::load(&path).unwrap();
        let original = model.predict(&x).unwrap();
        let reloaded = loaded.predict(&x).unwrap();
        for (a, b) in original.iter().zip(reloaded.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
