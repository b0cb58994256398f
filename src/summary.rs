//! Community summaries.
//!
//! A community summary is the one member document whose vector sits closest
//! to its cluster centroid, frozen after clustering and reused for every
//! query without recomputation. Selection is a pure function of the frozen
//! cluster state: repeated invocations on the same clusters produce
//! identical summaries.

use crate::cluster::{Cluster, cosine_similarity};
use crate::types::{ClusterId, DocumentId, Score};
use serde::Serialize;

/// The frozen representative of one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CommunitySummary {
    pub cluster: ClusterId,
    /// Member closest to the centroid, ties to the lowest document id
    pub document: DocumentId,
    /// Similarity between that member and the centroid
    pub similarity: Score,
}

/// Select one summary per cluster.
///
/// `vectors` is the full document vector set in canonical order; only the
/// members of each cluster are consulted.
#[must_use]
pub fn summarize(clusters: &[Cluster], vectors: &[Vec<f32>]) -> Vec<CommunitySummary> {
    clusters
        .iter()
        .map(|cluster| {
            let mut best: Option<(DocumentId, f32)> = None;
            // Members are ascending, so strict comparison keeps the lowest
            // document id on exact ties.
            for &member in &cluster.members {
                let similarity =
                    cosine_similarity(&vectors[member.to_index()], &cluster.centroid);
                let closer = match best {
                    None => true,
                    Some((_, current)) => similarity > current,
                };
                if closer {
                    best = Some((member, similarity));
                }
            }

            let (document, similarity) =
                best.expect("clusters are non-empty after the K-means fix-up");
            CommunitySummary {
                cluster: cluster.id,
                document,
                similarity: Score::new(similarity.clamp(0.0, 1.0))
                    .unwrap_or_else(Score::zero),
            }
        })
        .collect()
}
