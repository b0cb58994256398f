//! Local retrieval.
//!
//! Exact similarity ranking of a query against the documents of one routed
//! cluster — never documents outside it. This is the "local" half of the
//! global + local pipeline: the router has already committed to a single
//! community, so the scan here is bounded by that community's size.

use crate::cluster::{Cluster, cosine_similarity};
use crate::types::{DocumentId, Score};
use serde::Serialize;

/// One scored document from the routed cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedDocument {
    pub document: DocumentId,
    pub score: Score,
}

/// Rank every member of `cluster` against the query vector.
///
/// Results are ordered by descending score with exact ties broken by the
/// lowest document id. `limit` truncates after ordering, so a truncated
/// list is always a prefix of the full one.
#[must_use]
pub fn retrieve(
    query_vector: &[f32],
    cluster: &Cluster,
    vectors: &[Vec<f32>],
    limit: Option<usize>,
) -> Vec<RankedDocument> {
    let mut ranked: Vec<RankedDocument> = cluster
        .members
        .iter()
        .map(|&document| {
            let similarity = cosine_similarity(query_vector, &vectors[document.to_index()]);
            RankedDocument {
                document,
                score: Score::new(similarity.clamp(0.0, 1.0)).unwrap_or_else(Score::zero),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.document.cmp(&b.document)));

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{MAX_ITERATIONS, kmeans};

    fn clusters_for(vectors: &[Vec<f32>], k: usize) -> Vec<Cluster> {
        kmeans(vectors, k, 0, MAX_ITERATIONS).unwrap().into_clusters()
    }

    #[test]
    fn test_results_stay_inside_the_cluster() {
        let vectors = vec![
            vec![1.0, 0.0],
            vec![0.9, 0.1],
            vec![0.0, 1.0],
            vec![0.1, 0.9],
        ];
        let clusters = clusters_for(&vectors, 2);

        for cluster in &clusters {
            let results = retrieve(&[1.0, 0.0], cluster, &vectors, None);
            assert_eq!(results.len(), cluster.members.len());
            for result in &results {
                assert!(cluster.members.contains(&result.document));
            }
        }
    }

    #[test]
    fn test_ordering_is_descending_with_id_ties() {
        // Documents 1 and 2 are identical, so they tie; the lower id must
        // come first.
        let vectors = vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![0.5, 0.5],
        ];
        let cluster = Cluster {
            id: crate::types::ClusterId::new(0),
            centroid: vec![0.8, 0.2],
            members: vec![
                DocumentId::new_unchecked(1),
                DocumentId::new_unchecked(2),
                DocumentId::new_unchecked(3),
            ],
        };

        let results = retrieve(&[1.0, 0.0], &cluster, &vectors, None);
        let ids: Vec<u32> = results.iter().map(|r| r.document.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_truncation_is_a_prefix() {
        let vectors = vec![
            vec![1.0, 0.0],
            vec![0.9, 0.1],
            vec![0.8, 0.2],
            vec![0.7, 0.3],
        ];
        let cluster = Cluster {
            id: crate::types::ClusterId::new(0),
            centroid: vec![0.85, 0.15],
            members: (1..=4).map(DocumentId::new_unchecked).collect(),
        };

        let full = retrieve(&[1.0, 0.0], &cluster, &vectors, None);
        let truncated = retrieve(&[1.0, 0.0], &cluster, &vectors, Some(2));
        assert_eq!(truncated.len(), 2);
        assert_eq!(&full[..2], &truncated[..]);
    }

    #[test]
    fn test_zero_query_scores_everything_zero() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let cluster = Cluster {
            id: crate::types::ClusterId::new(0),
            centroid: vec![0.5, 0.5],
            members: vec![DocumentId::new_unchecked(1), DocumentId::new_unchecked(2)],
        };

        let results = retrieve(&[0.0, 0.0], &cluster, &vectors, None);
        assert!(results.iter().all(|r| r.score == Score::zero()));
        // Ties collapse to ascending document id.
        let ids: Vec<u32> = results.iter().map(|r| r.document.get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
