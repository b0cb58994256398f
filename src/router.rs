//! Query routing.
//!
//! Routing picks the single cluster a query is evaluated against: the
//! centroid most similar to the query vector, under the same cosine metric
//! the clusterer uses. Routing is total — every query routes somewhere,
//! including the all-zero vector of a fully out-of-vocabulary query, which
//! ties every centroid at similarity zero and lands on cluster 0.

use crate::cluster::{Cluster, nearest_centroid};
use crate::types::{ClusterId, Score};
use serde::Serialize;

/// Ephemeral result of routing one query. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoutingDecision {
    /// Chosen cluster, ties broken toward the lowest id
    pub cluster: ClusterId,
    /// Similarity between the query vector and that cluster's centroid
    pub similarity: Score,
}

/// Route a query vector to exactly one cluster.
#[must_use]
pub fn route(query_vector: &[f32], clusters: &[Cluster]) -> RoutingDecision {
    let centroids: Vec<Vec<f32>> = clusters.iter().map(|c| c.centroid.clone()).collect();
    let (cluster, similarity) = nearest_centroid(query_vector, &centroids);

    RoutingDecision {
        cluster,
        similarity: Score::new(similarity.clamp(0.0, 1.0)).unwrap_or_else(Score::zero),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{MAX_ITERATIONS, kmeans};

    fn clusters_for(vectors: &[Vec<f32>], k: usize) -> Vec<Cluster> {
        kmeans(vectors, k, 0, MAX_ITERATIONS).unwrap().into_clusters()
    }

    #[test]
    fn test_routes_to_most_similar_centroid() {
        let vectors = vec![
            vec![1.0, 0.0],
            vec![0.9, 0.1],
            vec![0.0, 1.0],
            vec![0.1, 0.9],
        ];
        let clusters = clusters_for(&vectors, 2);

        let decision = route(&[1.0, 0.05], &clusters);
        let routed = &clusters[decision.cluster.to_index()];
        // The x-axis documents live in the routed cluster.
        assert!(routed.members.iter().any(|d| d.get() == 1));
        assert!(decision.similarity.get() > 0.9);
    }

    #[test]
    fn test_zero_vector_routes_to_cluster_zero() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let clusters = clusters_for(&vectors, 2);

        let decision = route(&[0.0, 0.0], &clusters);
        assert_eq!(decision.cluster.get(), 0);
        assert_eq!(decision.similarity, Score::zero());
    }

    #[test]
    fn test_routing_is_total_over_cluster_range() {
        let vectors = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ];
        let clusters = clusters_for(&vectors, 3);

        for probe in [
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.5, 0.5],
            vec![0.3, 0.3, 0.3],
            vec![0.0, 0.0, 0.0],
        ] {
            let decision = route(&probe, &clusters);
            assert!(decision.cluster.to_index() < clusters.len());
        }
    }
}
