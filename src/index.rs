//! Index build and query entry points.
//!
//! `Index::build` is the one-shot batch step: vectorize the corpus, cluster
//! the vectors, freeze one community summary per cluster. It either fully
//! succeeds or fails with no partially-built index escaping. The frozen
//! index is read-only for the life of the process; `answer` touches only
//! frozen state and produces no side effects, so shared references can
//! serve queries from any number of threads without locks.

use crate::cluster::{self, Cluster};
use crate::corpus::Corpus;
use crate::error::IndexResult;
use crate::retrieve;
use crate::router::{self, RoutingDecision};
use crate::summary::{self, CommunitySummary};
use crate::types::Score;
use crate::vectorizer::Vocabulary;
use serde::Serialize;

/// Build-time knobs for [`Index::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOptions {
    /// Number of clusters (k)
    pub clusters: usize,
    /// Rotation offset into canonical document order for centroid seeding
    pub seed: u64,
    /// Cap on K-means iterations
    pub max_iterations: usize,
}

impl IndexOptions {
    /// Options for a given cluster count, other knobs at their defaults.
    #[must_use]
    pub fn with_clusters(clusters: usize) -> Self {
        Self {
            clusters,
            ..Self::default()
        }
    }
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            clusters: 2,
            seed: 0,
            max_iterations: cluster::MAX_ITERATIONS,
        }
    }
}

/// A frozen two-stage retrieval index.
///
/// Holds the fitted vocabulary, the document vectors, the clusters, and the
/// per-cluster community summaries. Immutable after build.
#[derive(Debug, Clone)]
pub struct Index {
    corpus: Corpus,
    vocabulary: Vocabulary,
    vectors: Vec<Vec<f32>>,
    clusters: Vec<Cluster>,
    summaries: Vec<CommunitySummary>,
    iterations: usize,
}

impl Index {
    /// Build an index from a corpus.
    ///
    /// Fails with [`crate::IndexError::EmptyCorpus`] on an empty corpus and
    /// [`crate::IndexError::InvalidClusterCount`] when the cluster count
    /// falls outside `[1, N]`. There is no partial-failure state.
    pub fn build(corpus: Corpus, options: &IndexOptions) -> IndexResult<Self> {
        let vocabulary = Vocabulary::fit(&corpus)?;
        let vectors: Vec<Vec<f32>> = corpus
            .iter()
            .map(|document| vocabulary.transform(&document.text))
            .collect();

        let outcome = cluster::kmeans(
            &vectors,
            options.clusters,
            options.seed,
            options.max_iterations,
        )?;
        let iterations = outcome.iterations;
        let clusters = outcome.into_clusters();
        let summaries = summary::summarize(&clusters, &vectors);

        tracing::debug!(
            documents = corpus.len(),
            terms = vocabulary.len(),
            clusters = clusters.len(),
            iterations,
            "index frozen"
        );

        Ok(Self {
            corpus,
            vocabulary,
            vectors,
            clusters,
            summaries,
            iterations,
        })
    }

    /// Answer a query against the frozen index.
    ///
    /// Vectorizes the query, routes it to one cluster, and ranks that
    /// cluster's documents. Total for any query text: a fully
    /// out-of-vocabulary query yields the zero vector, routes to cluster 0,
    /// and scores every member at zero.
    #[must_use]
    pub fn answer(&self, query_text: &str, limit: Option<usize>) -> Answer {
        let query_vector = self.vocabulary.transform(query_text);
        let routed = router::route(&query_vector, &self.clusters);
        let cluster = &self.clusters[routed.cluster.to_index()];
        let ranked = retrieve::retrieve(&query_vector, cluster, &self.vectors, limit);
        let summary = self.summaries[routed.cluster.to_index()];

        Answer {
            query: query_text.to_string(),
            routed,
            summary: AnswerSummary {
                document: self.corpus.name(summary.document).to_string(),
                text: self.corpus.get(summary.document).text.clone(),
            },
            results: ranked
                .iter()
                .map(|hit| AnswerHit {
                    document: self.corpus.name(hit.document).to_string(),
                    score: hit.score,
                    text: self.corpus.get(hit.document).text.clone(),
                })
                .collect(),
        }
    }

    /// The corpus this index was built from.
    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// The fitted vocabulary.
    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Frozen clusters, indexed by cluster id.
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Frozen community summaries, one per cluster.
    #[must_use]
    pub fn summaries(&self) -> &[CommunitySummary] {
        &self.summaries
    }

    /// Document vectors in canonical order.
    #[must_use]
    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// K-means iterations taken at build time.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

/// Symbolic answer to one query: the routed community and its ranked
/// members. No natural-language generation — extractive only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub query: String,
    /// Routed cluster and its centroid similarity
    pub routed: RoutingDecision,
    /// Frozen summary of the routed community
    pub summary: AnswerSummary,
    /// Ranked members of the routed cluster
    pub results: Vec<AnswerHit>,
}

/// The community summary as resolved document name and text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerSummary {
    pub document: String,
    pub text: String,
}

/// One ranked document in an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerHit {
    pub document: String,
    pub score: Score,
    pub text: String,
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "[community {} | {}] {}: {}",
            self.routed.cluster, self.routed.similarity, self.summary.document, self.summary.text
        )?;
        writeln!(f, "Top matches:")?;
        for (rank, hit) in self.results.iter().enumerate() {
            writeln!(
                f,
                "  {}. ({}) {}: {}",
                rank + 1,
                hit.score,
                hit.document,
                hit.text
            )?;
        }
        write!(f, "Query: {}", self.query)
    }
}
