//! Probability feature attachment.
//!
//! Runs the sentiment model over aligned events and attaches the predicted
//! label plus one probability attribute per class, named with a common
//! prefix so the association ranker can select them.

use crate::analysis::AlignedEvent;
use crate::nlp::sentiment::{class_name, ModelError, SentimentModel, CLASS_LABELS};

/// Attach `sentiment_pred` and per-class probability attributes.
///
/// The model is applied to each event's `text_attribute` (empty string when
/// the attribute is missing, which the vectorizer maps to a zero vector).
/// Probability attributes are named `{prefix}{class_name}`.
pub fn attach_probability_features(
    aligned: &mut [AlignedEvent],
    model: &SentimentModel,
    prefix: &str,
    text_attribute: &str,
) -> Result<(), ModelError> {
    let texts: Vec<String> = aligned
        .iter()
        .map(|entry| {
            entry
                .event
                .text(text_attribute)
                .unwrap_or_default()
                .to_string()
        })
        .collect();

    let predictions = model.predict(&texts)?;
    let probabilities = model.predict_proba(&texts)?;

    for (row, entry) in aligned.iter_mut().enumerate() {
        entry
            .event
            .set_attr(crate::defaults::PREDICTION_ATTRIBUTE, predictions[row] as f64);
        for (column, &label) in CLASS_LABELS.iter().enumerate() {
            entry.event.set_attr(
                format!("{}{}", prefix, class_name(label)),
                probabilities[[row, column]],
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NewsEvent;
    use crate::nlp::TfidfVectorizer;
    use chrono::Utc;

    fn make_aligned(text: &str) -> AlignedEvent {
        let timestamp = Utc::now();
        AlignedEvent {
            event: NewsEvent::new(timestamp).with_attr("clean_text", text),
            matched_at: timestamp,
            reaction: 0.01,
        }
    }

    fn fitted_model() -> SentimentModel {
        let texts = vec![
            "record profit".to_string(),
            "fraud loss".to_string(),
            "profit growth".to_string(),
            "loss decline".to_string(),
        ];
        let labels = vec![1, -1, 1, -1];
        let mut model = SentimentModel::new(TfidfVectorizer::new(50));
        model.fit(&texts, &labels).unwrap();
        model
    }

    #[test]
    fn test_attaches_prediction_and_probabilities() {
        let model = fitted_model();
        let mut aligned = vec![make_aligned("record profit"), make_aligned("fraud loss")];

        attach_probability_features(&mut aligned, &model, "sentiment_prob_", "clean_text")
            .unwrap();

        for entry in &aligned {
            assert!(entry.event.number("sentiment_pred").is_some());
            let total: f64 = ["negative", "neutral", "positive"]
                .iter()
                .map(|name| {
                    entry
                        .event
                        .number(&format!("sentiment_prob_{}", name))
                        .unwrap()
                })
                .sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
        assert_eq!(aligned[0].event.number("sentiment_pred"), Some(1.0));
        assert_eq!(aligned[1].event.number("sentiment_pred"), Some(-1.0));
    }

    #[test]
    fn test_missing_text_attribute_still_gets_features() {
        let model = fitted_model();
        let timestamp = Utc::now();
        let mut aligned = vec![AlignedEvent {
            event: NewsEvent::new(timestamp),
            matched_at: timestamp,
            reaction: 0.0,
        }];

        attach_probability_features(&mut aligned, &model, "sentiment_prob_", "clean_text")
            .unwrap();
        assert!(aligned[0]
            .event
            .number("sentiment_prob_positive")
            .is_some());
    }
}
