//! TF-IDF vectorization.
//!
//! Converts raw text into fixed-dimension numeric vectors using a
//! term-frequency / inverse-document-frequency scheme fit once over the
//! corpus. Everything here is deliberately order-free: term dimensions come
//! from lexicographic term order, never from map iteration order, so the
//! same corpus always produces the same vector space.
//!
//! # Fixed choices
//! - Tokenization: Unicode lowercasing, then maximal alphanumeric runs;
//!   every other character is a separator. No stop-words, no stemming.
//! - Weighting: `tf(t, d) * idf(t)` with `idf(t) = ln(N / df(t)) + 1`,
//!   raw term counts for `tf`, no per-vector normalization. Cosine
//!   comparisons downstream normalize at comparison time.

use crate::corpus::Corpus;
use crate::error::{IndexError, IndexResult};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Split text into lowercase alphanumeric tokens.
///
/// The rule is fixed: case-fold the input, keep maximal runs of alphanumeric
/// characters, drop everything else. `"Multi-hop search!"` tokenizes to
/// `["multi", "hop", "search"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Term dimensions and IDF weights, frozen after fit.
///
/// Shared read-only by all subsequent vector computations, documents and
/// queries alike.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Terms in lexicographic order; position = vector dimension
    terms: Vec<Box<str>>,
    /// Reverse lookup from term to dimension
    index: HashMap<Box<str>, usize>,
    /// IDF weight per dimension
    idf: Vec<f32>,
    /// Corpus size the vocabulary was fit on
    documents: usize,
}

impl Vocabulary {
    /// Fit a vocabulary over a corpus.
    ///
    /// Computes document frequency for every term that appears in at least
    /// one document and derives `idf(t) = ln(N / df(t)) + 1`. Fails with
    /// [`IndexError::EmptyCorpus`] when the corpus holds no documents.
    pub fn fit(corpus: &Corpus) -> IndexResult<Self> {
        if corpus.is_empty() {
            return Err(IndexError::EmptyCorpus);
        }

        // BTreeMap keeps terms lexicographically sorted, which fixes the
        // dimension numbering.
        let mut document_frequency: BTreeMap<String, u32> = BTreeMap::new();
        for document in corpus.iter() {
            let distinct: BTreeSet<String> = tokenize(&document.text).into_iter().collect();
            for term in distinct {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let n = corpus.len() as f32;
        let mut terms = Vec::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (term, df) in document_frequency {
            terms.push(term.into_boxed_str());
            idf.push((n / df as f32).ln() + 1.0);
        }

        let index = terms
            .iter()
            .enumerate()
            .map(|(dimension, term)| (term.clone(), dimension))
            .collect();

        Ok(Self {
            terms,
            index,
            idf,
            documents: corpus.len(),
        })
    }

    /// Transform text into a TF-IDF vector.
    ///
    /// Entries for terms outside the vocabulary are zero; text made up
    /// entirely of unseen terms yields the all-zero vector, which is a valid
    /// degenerate query, not an error.
    #[must_use]
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for token in tokenize(text) {
            *counts.entry(token).or_insert(0) += 1;
        }

        // Each in-vocabulary term writes exactly one dimension, so map
        // iteration order cannot affect the result.
        let mut vector = vec![0.0_f32; self.terms.len()];
        for (term, count) in counts {
            if let Some(&dimension) = self.index.get(term.as_str()) {
                vector[dimension] = count as f32 * self.idf[dimension];
            }
        }
        vector
    }

    /// Number of dimensions (distinct corpus terms).
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when no term survived the fit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Corpus size the vocabulary was fit on.
    #[must_use]
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Term at a dimension.
    #[must_use]
    pub fn term(&self, dimension: usize) -> &str {
        &self.terms[dimension]
    }

    /// Dimension of a term, if it is in the vocabulary.
    #[must_use]
    pub fn dimension_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(texts: &[(&str, &str)]) -> Corpus {
        Corpus::from_pairs(texts.iter().map(|&(n, t)| (n, t))).unwrap()
    }

    #[test]
    fn test_tokenize_case_folds_and_strips_punctuation() {
        assert_eq!(
            tokenize("Multi-hop Search, bounded!"),
            vec!["multi", "hop", "search", "bounded"]
        );
        assert_eq!(tokenize("...!?"), Vec::<String>::new());
        assert_eq!(tokenize("top2 results"), vec!["top2", "results"]);
    }

    #[test]
    fn test_fit_rejects_empty_corpus() {
        let empty = Corpus::from_pairs(Vec::<(&str, &str)>::new()).unwrap();
        assert!(matches!(
            Vocabulary::fit(&empty),
            Err(IndexError::EmptyCorpus)
        ));
    }

    #[test]
    fn test_dimensions_are_lexicographic() {
        let corpus = corpus(&[("d1", "zebra apple"), ("d2", "mango apple")]);
        let vocabulary = Vocabulary::fit(&corpus).unwrap();

        assert_eq!(vocabulary.len(), 3);
        assert_eq!(vocabulary.term(0), "apple");
        assert_eq!(vocabulary.term(1), "mango");
        assert_eq!(vocabulary.term(2), "zebra");
        assert_eq!(vocabulary.dimension_of("mango"), Some(1));
        assert_eq!(vocabulary.dimension_of("kiwi"), None);
    }

    #[test]
    fn test_idf_formula() {
        // "apple" appears in both documents, "zebra" in one.
        let corpus = corpus(&[("d1", "zebra apple"), ("d2", "mango apple")]);
        let vocabulary = Vocabulary::fit(&corpus).unwrap();

        let apple = vocabulary.transform("apple");
        let expected_apple = (2.0_f32 / 2.0).ln() + 1.0;
        assert!((apple[0] - expected_apple).abs() < 1e-6);

        let zebra = vocabulary.transform("zebra");
        let expected_zebra = (2.0_f32 / 1.0).ln() + 1.0;
        assert!((zebra[2] - expected_zebra).abs() < 1e-6);
    }

    #[test]
    fn test_transform_multiplies_raw_term_frequency() {
        let corpus = corpus(&[("d1", "apple"), ("d2", "banana")]);
        let vocabulary = Vocabulary::fit(&corpus).unwrap();

        let single = vocabulary.transform("apple");
        let triple = vocabulary.transform("apple apple apple");
        assert!((triple[0] - 3.0 * single[0]).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_vocabulary_text_is_zero_vector() {
        let corpus = corpus(&[("d1", "apple"), ("d2", "banana")]);
        let vocabulary = Vocabulary::fit(&corpus).unwrap();

        let vector = vocabulary.transform("quantum chromodynamics");
        assert_eq!(vector.len(), vocabulary.len());
        assert!(vector.iter().all(|&w| w == 0.0));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let corpus = corpus(&[
            ("d1", "graph retrieval connects entities"),
            ("d2", "clustering groups similar documents"),
            ("d3", "deterministic pipelines matter"),
        ]);
        let a = Vocabulary::fit(&corpus).unwrap();
        let b = Vocabulary::fit(&corpus).unwrap();

        assert_eq!(a.terms, b.terms);
        assert_eq!(a.idf, b.idf);
        assert_eq!(
            a.transform("graph clustering"),
            b.transform("graph clustering")
        );
    }
}
