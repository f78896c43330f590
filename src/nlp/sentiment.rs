//! Sentiment classification over TF-IDF features.
//!
//! Multinomial softmax regression fitted by gradient descent on seed-labeled
//! headlines. Classes are fixed at negative (-1), neutral (0), and positive
//! (1), matching the seed labeler's output.

use crate::nlp::vectorizer::TfidfVectorizer;
use anyhow::{Context, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Class labels in column order.
pub const CLASS_LABELS: [i64; 3] = [-1, 0, 1];

/// Human-readable class name for a label.
pub fn class_name(label: i64) -> &'static str {
    match label {
        -1 => "negative",
        0 => "neutral",
        1 => "positive",
        _ => "unknown",
    }
}

/// Errors from fitting or applying the sentiment model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model has not been fitted yet")]
    NotFitted,

    #[error("unknown class label: {0}")]
    UnknownLabel(i64),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Softmax-regression sentiment classifier over TF-IDF vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentModel {
    vectorizer: TfidfVectorizer,
    weights: Option<Array2<f64>>,
    intercept: Option<Array1<f64>>,
    learning_rate: f64,
    max_iter: usize,
    l2: f64,
}

impl Default for SentimentModel {
    fn default() -> Self {
        Self::new(TfidfVectorizer::default())
    }
}

impl SentimentModel {
    /// Create an unfitted model over the given vectorizer.
    pub fn new(vectorizer: TfidfVectorizer) -> Self {
        Self {
            vectorizer,
            weights: None,
            intercept: None,
            learning_rate: 0.5,
            max_iter: 500,
            l2: 1e-4,
        }
    }

    /// Set the gradient-descent learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the number of gradient-descent iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Fit the vectorizer and classifier on seed-labeled texts.
    pub fn fit(&mut self, texts: &[String], labels: &[i64]) -> Result<(), ModelError> {
        if texts.len() != labels.len() {
            return Err(ModelError::DimensionMismatch {
                expected: texts.len(),
                got: labels.len(),
            });
        }

        let x = self.vectorizer.fit_transform(texts);
        let n_samples = x.nrows() as f64;
        let n_classes = CLASS_LABELS.len();

        let mut one_hot = Array2::<f64>::zeros((texts.len(), n_classes));
        for (row, &label) in labels.iter().enumerate() {
            let column = class_index(label).ok_or(ModelError::UnknownLabel(label))?;
            one_hot[[row, column]] = 1.0;
        }

        let mut weights = Array2::<f64>::zeros((x.ncols(), n_classes));
        let mut intercept = Array1::<f64>::zeros(n_classes);

        for _ in 0..self.max_iter {
            let logits = x.dot(&weights) + &intercept;
            let probs = softmax_rows(&logits);
            let diff = &probs - &one_hot;

            let grad_w = x.t().dot(&diff) / n_samples + &weights.mapv(|w| w * self.l2);
            let grad_b = diff.sum_axis(Axis(0)) / n_samples;

            weights = weights - grad_w * self.learning_rate;
            intercept = intercept - grad_b * self.learning_rate;
        }

        self.weights = Some(weights);
        self.intercept = Some(intercept);
        Ok(())
    }

    /// Class probabilities for each text, one row per input in class order
    /// negative, neutral, positive.
    pub fn predict_proba(&self, texts: &[String]) -> Result<Array2<f64>, ModelError> {
        let weights = self.weights.as_ref().ok_or(ModelError::NotFitted)?;
        let intercept = self.intercept.as_ref().ok_or(ModelError::NotFitted)?;

        let x = self.vectorizer.transform(texts);
        if x.ncols() != weights.nrows() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.nrows(),
                got: x.ncols(),
            });
        }

        let logits = x.dot(weights) + intercept;
        Ok(softmax_rows(&logits))
    }

    /// Most probable class label for each text.
    pub fn predict(&self, texts: &[String]) -> Result<Vec<i64>, ModelError> {
        let probs = self.predict_proba(texts)?;
        Ok(probs
            .rows()
            .into_iter()
            .map(|row| {
                let best = row
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(index, _)| index)
                    .unwrap_or(1);
                CLASS_LABELS[best]
            })
            .collect())
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
        serde_json::to_writer(file, self).context("failed to serialize sentiment model")?;
        Ok(())
    }

    /// Load a model previously written by [`SentimentModel::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("failed to open model file: {:?}", path))?;
        serde_json::from_reader(file).context("failed to deserialize sentiment model")
    }
}

fn class_index(label: i64) -> Option<usize> {
    CLASS_LABELS.iter().position(|&l| l == label)
}

fn softmax_rows(logits: &Array2<f64>) -> Array2<f64> {
    let mut probs = logits.clone();
    for mut row in probs.rows_mut() {
        let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        row.mapv_inplace(|v| (v - max).exp());
        let sum: f64 = row.iter().sum();
        if sum > 0.0 {
            row.mapv_inplace(|v| v / sum);
        }
    }
    probs
}
