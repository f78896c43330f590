//! TF-IDF text vectorization.
//!
//! Unigram + bigram term counts weighted by smoothed inverse document
//! frequency, with L2-normalized rows. Vocabulary selection and column
//! order are deterministic so fitted models reproduce exactly.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

/// TF-IDF vectorizer over whitespace-tokenized text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    max_features: usize,
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(crate::defaults::MAX_FEATURES)
    }
}

impl TfidfVectorizer {
    /// Create a vectorizer keeping at most `max_features` terms.
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            vocabulary: HashMap::new(),
            terms: Vec::new(),
            idf: Vec::new(),
        }
    }

    /// Unigram and bigram tokens of a document.
    pub fn tokenize(text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut tokens: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        for pair in words.windows(2) {
            tokens.push(format!("{} {}", pair[0], pair[1]));
        }
        tokens
    }

    /// Learn the vocabulary and document frequencies from a corpus.
    pub fn fit(&mut self, corpus: &[String]) {
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for document in corpus {
            let mut unique: Vec<String> = Self::tokenize(document);
            unique.sort();
            unique.dedup();
            for token in unique {
                *doc_freq.entry(token).or_insert(0) += 1;
            }
        }

        // Keep the most frequent terms; ties and final column order are
        // alphabetical for determinism.
        let mut ranked: Vec<(String, usize)> = doc_freq.into_iter().collect();
        ranked.sort_by(|a, b| (Reverse(a.1), &a.0).cmp(&(Reverse(b.1), &b.0)));
        ranked.truncate(self.max_features);
        ranked.sort_by(|a, b| a.0.cmp(&b.0));

        let n_docs = corpus.len() as f64;
        self.vocabulary.clear();
        self.terms.clear();
        self.idf.clear();
        for (index, (term, df)) in ranked.into_iter().enumerate() {
            self.vocabulary.insert(term.clone(), index);
            self.terms.push(term);
            self.idf
                .push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
        }
    }

    /// Transform a corpus into a dense TF-IDF matrix.
    ///
    /// Out-of-vocabulary tokens are ignored; each row is L2-normalized
    /// unless it is all zeros.
    pub fn transform(&self, corpus: &[String]) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((corpus.len(), self.terms.len()));
        for (row, document) in corpus.iter().enumerate() {
            for token in Self::tokenize(document) {
                if let Some(&column) = self.vocabulary.get(&token) {
                    matrix[[row, column]] += self.idf[column];
                }
            }
            let norm = matrix.row(row).iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                matrix.row_mut(row).mapv_inplace(|v| v / norm);
            }
        }
        matrix
    }

    /// Fit on the corpus and transform it in one step.
    pub fn fit_transform(&mut self, corpus: &[String]) -> Array2<f64> {
        self.fit(corpus);
        self.transform(corpus)
    }

    /// Number of learned terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Learned terms in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}
