//! Feature/reaction association ranking.
//!
//! Ranks event attributes by their Pearson correlation with the reaction
//! value. Attributes are selected by name prefix, following the convention
//! that model probability features share a common prefix.

use crate::analysis::AlignedEvent;
use crate::error::AnalysisError;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Pearson correlation coefficient between two equal-length samples.
///
/// Returns `NaN` when fewer than two pairs are available or either side has
/// zero variance; degenerate features are reported explicitly rather than
/// coerced to 0.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    covariance / (var_x.sqrt() * var_y.sqrt())
}

/// Rank prefix-matching numeric attributes by correlation with the reaction.
///
/// Each qualifying attribute is correlated against the reaction vector over
/// the events that carry it, and the table is sorted descending by
/// correlation with `NaN` entries last. Fails with a schema error when no
/// attribute matches the prefix across the whole input.
pub fn rank(
    aligned: &[AlignedEvent],
    feature_prefix: &str,
) -> Result<Vec<(String, f64)>, AnalysisError> {
    let mut names: BTreeSet<&str> = BTreeSet::new();
    for entry in aligned {
        for (name, value) in &entry.event.attributes {
            if name.starts_with(feature_prefix) && value.as_number().is_some() {
                names.insert(name);
            }
        }
    }
    if names.is_empty() {
        return Err(AnalysisError::Schema(format!(
            "no numeric attribute with prefix '{}'",
            feature_prefix
        )));
    }

    let mut table: Vec<(String, f64)> = names
        .into_iter()
        .map(|name| {
            let mut feature = Vec::new();
            let mut reaction = Vec::new();
            for entry in aligned {
                if let Some(value) = entry.event.number(name) {
                    feature.push(value);
                    reaction.push(entry.reaction);
                }
            }
            (name.to_string(), pearson(&feature, &reaction))
        })
        .collect();

    table.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal),
    });

    Ok(table)
}
