//! Deterministic K-means clustering.
//!
//! Partitions document vectors into a fixed number of groups via the usual
//! assign/update iteration, with every source of run-to-run variation
//! engineered out:
//!
//! - Initialization is canonical-order seeding: initial centroid `i` is the
//!   vector at position `(seed + i) mod N` in ascending document order.
//!   There is no pseudo-random draw anywhere.
//! - Distance metric: cosine similarity. Assignment ties go to the lowest
//!   cluster id.
//! - Centroids are arithmetic means accumulated in ascending document
//!   order, so floating-point summation order is fixed.
//! - An iteration that empties a cluster is repaired immediately by moving
//!   the document least similar to its own centroid into the empty slot
//!   (ties to the lowest document id); a cluster slot is never dropped.
//! - Convergence: assignments unchanged between consecutive iterations, or
//!   the iteration cap.

use crate::error::{IndexError, IndexResult};
use crate::types::{ClusterId, DocumentId};

/// Default iteration cap for the assign/update loop.
pub const MAX_ITERATIONS: usize = 100;

/// A frozen cluster: centroid plus member documents.
///
/// Mutated only while the K-means loop runs; once built through
/// [`KMeansOutcome::into_clusters`] it never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub id: ClusterId,
    /// Arithmetic mean of the member vectors
    pub centroid: Vec<f32>,
    /// Member document ids, ascending
    pub members: Vec<DocumentId>,
}

/// Result of a K-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansOutcome {
    /// Cluster centroids; index = cluster id
    pub centroids: Vec<Vec<f32>>,
    /// Cluster assignment per vector, in document order
    pub assignments: Vec<ClusterId>,
    /// Iterations until convergence (or the cap)
    pub iterations: usize,
}

/// Cluster vectors into exactly `k` non-empty groups.
///
/// `vectors` must be in canonical document order; assignments come back in
/// the same order. Fails with [`IndexError::InvalidClusterCount`] unless
/// `1 <= k <= vectors.len()`.
pub fn kmeans(
    vectors: &[Vec<f32>],
    k: usize,
    seed: u64,
    max_iterations: usize,
) -> IndexResult<KMeansOutcome> {
    if k == 0 || k > vectors.len() {
        return Err(IndexError::InvalidClusterCount {
            k,
            documents: vectors.len(),
        });
    }

    let n = vectors.len();
    let offset = (seed % n as u64) as usize;
    let mut centroids: Vec<Vec<f32>> = (0..k).map(|i| vectors[(offset + i) % n].clone()).collect();

    let mut assignments: Vec<ClusterId> = vec![ClusterId::new(0); n];
    let mut iterations = 0;

    loop {
        iterations += 1;

        let mut new_assignments: Vec<ClusterId> = vectors
            .iter()
            .map(|vector| nearest_centroid(vector, &centroids).0)
            .collect();
        fix_empty_clusters(vectors, &centroids, &mut new_assignments, k);

        // The initial `assignments` value is a placeholder, so the first
        // iteration never counts as converged.
        let converged = iterations > 1 && new_assignments == assignments;
        assignments = new_assignments;

        // Recomputing after the final assignment freezes each centroid as
        // the exact mean of its members.
        centroids = compute_centroids(vectors, &assignments, k);

        if converged || iterations >= max_iterations {
            break;
        }
    }

    Ok(KMeansOutcome {
        centroids,
        assignments,
        iterations,
    })
}

impl KMeansOutcome {
    /// Assemble frozen clusters from the raw outcome.
    ///
    /// Member lists come out ascending because assignments are walked in
    /// document order.
    #[must_use]
    pub fn into_clusters(self) -> Vec<Cluster> {
        let mut clusters: Vec<Cluster> = self
            .centroids
            .into_iter()
            .enumerate()
            .map(|(i, centroid)| Cluster {
                id: ClusterId::new(i as u32),
                centroid,
                members: Vec::new(),
            })
            .collect();

        for (index, assignment) in self.assignments.iter().enumerate() {
            clusters[assignment.to_index()]
                .members
                .push(DocumentId::from_index(index));
        }

        clusters
    }
}

/// Most similar centroid for a vector, ties to the lowest cluster id.
#[must_use]
pub fn nearest_centroid(vector: &[f32], centroids: &[Vec<f32>]) -> (ClusterId, f32) {
    let mut best_similarity = f32::NEG_INFINITY;
    let mut best_cluster = 0;

    for (i, centroid) in centroids.iter().enumerate() {
        let similarity = cosine_similarity(vector, centroid);
        // Strict comparison keeps the lowest cluster id on exact ties.
        if similarity > best_similarity {
            best_similarity = similarity;
            best_cluster = i;
        }
    }

    (ClusterId::new(best_cluster as u32), best_similarity)
}

/// Computes cosine similarity between two vectors.
///
/// Returns a value in [-1, 1]; zero when either vector has zero norm, which
/// is how fully out-of-vocabulary queries compare against every centroid.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have same dimension");

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

/// Arithmetic mean of each cluster's members, accumulated in ascending
/// document order.
fn compute_centroids(
    vectors: &[Vec<f32>],
    assignments: &[ClusterId],
    k: usize,
) -> Vec<Vec<f32>> {
    let dimension = vectors.first().map_or(0, Vec::len);
    let mut centroids = vec![vec![0.0_f32; dimension]; k];
    let mut sizes = vec![0_usize; k];

    for (vector, &cluster) in vectors.iter().zip(assignments.iter()) {
        let target = &mut centroids[cluster.to_index()];
        for (slot, &value) in target.iter_mut().zip(vector.iter()) {
            *slot += value;
        }
        sizes[cluster.to_index()] += 1;
    }

    for (centroid, &size) in centroids.iter_mut().zip(sizes.iter()) {
        // Empty clusters were repaired before this point; the guard only
        // protects the placeholder state of the very first iteration.
        if size > 0 {
            for value in centroid.iter_mut() {
                *value /= size as f32;
            }
        }
    }

    centroids
}

/// Repair clusters that lost every member during an assignment step.
///
/// Empty clusters are filled in ascending cluster-id order. Each one takes
/// the document least similar to the centroid it is currently assigned to,
/// drawing only from clusters that would keep at least one member, with
/// exact ties going to the lowest document id. Since `k <= N`, a donor
/// always exists and the loop terminates with every cluster non-empty.
fn fix_empty_clusters(
    vectors: &[Vec<f32>],
    centroids: &[Vec<f32>],
    assignments: &mut [ClusterId],
    k: usize,
) {
    let mut sizes = vec![0_usize; k];
    for assignment in assignments.iter() {
        sizes[assignment.to_index()] += 1;
    }

    for empty in 0..k {
        if sizes[empty] > 0 {
            continue;
        }

        let mut donor: Option<(usize, f32)> = None;
        for (document, assignment) in assignments.iter().enumerate() {
            let current = assignment.to_index();
            if sizes[current] < 2 {
                continue;
            }
            let similarity = cosine_similarity(&vectors[document], &centroids[current]);
            let further = match donor {
                None => true,
                // Strict comparison keeps the lowest document id on ties.
                Some((_, best)) => similarity < best,
            };
            if further {
                donor = Some((document, similarity));
            }
        }

        if let Some((document, _)) = donor {
            sizes[assignments[document].to_index()] -= 1;
            assignments[document] = ClusterId::new(empty as u32);
            sizes[empty] += 1;
        }
    }
}
