//! Type-safe wrappers for the retrieval pipeline.
//!
//! This module provides newtypes following the project's strict type safety
//! guidelines. All types implement necessary traits for ergonomic usage
//! while preventing primitive obsession.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Type-safe wrapper for document IDs.
///
/// Documents are numbered 1..=N in ascending lexicographic order of their
/// external names, so comparing two `DocumentId`s compares canonical corpus
/// order. Uses `NonZeroU32` internally so an id of zero can never represent
/// a real document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(NonZeroU32);

impl DocumentId {
    /// Creates a new `DocumentId` from a non-zero u32.
    ///
    /// Returns `None` if the provided id is zero.
    #[must_use]
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    /// Creates a new `DocumentId` from a non-zero u32, panicking if zero.
    ///
    /// # Panics
    /// Panics if `id` is zero. Use `new()` for fallible construction.
    #[must_use]
    pub fn new_unchecked(id: u32) -> Self {
        Self(NonZeroU32::new(id).expect("DocumentId cannot be zero"))
    }

    /// Returns the underlying u32 value.
    #[must_use]
    pub fn get(&self) -> u32 {
        self.0.get()
    }

    /// Position of this document in the canonical corpus ordering.
    #[must_use]
    pub fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Inverse of [`DocumentId::to_index`].
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::new_unchecked(index as u32 + 1)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe wrapper for cluster IDs.
///
/// Cluster ids run 0..k and double as indices into the frozen cluster list,
/// so zero is a valid id and a plain u32 is used rather than NonZeroU32.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ClusterId(u32);

impl ClusterId {
    /// Creates a new `ClusterId`.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Index of this cluster in the frozen cluster list.
    #[must_use]
    pub const fn to_index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe wrapper for similarity scores.
///
/// Scores are cosine similarities over non-negative TF-IDF weights and
/// therefore fall in [0.0, 1.0]:
/// - 1.0 indicates identical direction
/// - 0.0 indicates no shared vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score(f32);

impl Score {
    /// Creates a new `Score` with validation.
    ///
    /// Returns `None` if the value is NaN or outside [0.0, 1.0].
    #[must_use]
    pub fn new(value: f32) -> Option<Self> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return None;
        }
        Some(Self(value))
    }

    /// Creates a score of 0.0 (no similarity).
    #[must_use]
    pub const fn zero() -> Self {
        Self(0.0)
    }

    /// Returns the underlying f32 value.
    #[must_use]
    pub fn get(&self) -> f32 {
        self.0
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
