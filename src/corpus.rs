//! Corpus ingestion.
//!
//! A corpus is the frozen input to an index build: a set of named documents
//! sorted into canonical order. Canonical order is ascending lexicographic
//! order of the external document name, fixed at ingest time, and every
//! later stage (vectorization, clustering, tie-breaking) leans on it.
//!
//! The core only requires the name-to-text mapping; how it was produced
//! (files, database, inline fixtures) is the caller's concern. This module
//! ships the two constructors the CLI and tests need.

use crate::error::{IndexError, IndexResult};
use crate::types::DocumentId;
use std::path::Path;
use walkdir::WalkDir;

/// A single ingested document.
///
/// Immutable after ingest; the derived TF-IDF vector lives in the index,
/// keyed by `id`, not on the document itself.
#[derive(Debug, Clone)]
pub struct Document {
    /// Canonical id, assigned from the sorted name order
    pub id: DocumentId,
    /// External name (file path or caller-supplied id)
    pub name: Box<str>,
    /// Raw text as ingested
    pub text: String,
}

/// An ordered, deduplicated document set.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Build a corpus from (name, text) pairs.
    ///
    /// Pairs may arrive in any order; they are sorted by name before ids are
    /// assigned, so the same set of pairs always produces the same corpus.
    pub fn from_pairs<N, T>(pairs: impl IntoIterator<Item = (N, T)>) -> IndexResult<Self>
    where
        N: Into<Box<str>>,
        T: Into<String>,
    {
        let mut named: Vec<(Box<str>, String)> = pairs
            .into_iter()
            .map(|(name, text)| (name.into(), text.into()))
            .collect();
        named.sort_by(|a, b| a.0.cmp(&b.0));

        for pair in named.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(IndexError::DuplicateDocument {
                    id: pair[0].0.to_string(),
                });
            }
        }

        let documents = named
            .into_iter()
            .enumerate()
            .map(|(index, (name, text))| Document {
                id: DocumentId::from_index(index),
                name,
                text,
            })
            .collect();

        Ok(Self { documents })
    }

    /// Load a corpus from a directory tree.
    ///
    /// Files whose extension matches one of `extensions` (without the dot)
    /// become documents; the document name is the path relative to `root`,
    /// with `/` separators on every platform so ids are portable.
    pub fn from_dir(root: impl AsRef<Path>, extensions: &[String]) -> IndexResult<Self> {
        let root = root.as_ref();
        let mut pairs: Vec<(Box<str>, String)> = Vec::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    return Err(IndexError::FileRead {
                        path,
                        source: e
                            .into_io_error()
                            .unwrap_or_else(|| std::io::Error::other("walk error")),
                    });
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|e| e == ext));
            if !matches {
                continue;
            }

            let text = std::fs::read_to_string(entry.path()).map_err(|source| {
                IndexError::FileRead {
                    path: entry.path().to_path_buf(),
                    source,
                }
            })?;
            let name = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace(std::path::MAIN_SEPARATOR, "/");
            pairs.push((name.into(), text));
        }

        if pairs.is_empty() {
            return Err(IndexError::EmptyCorpusDir {
                path: root.to_path_buf(),
            });
        }

        Self::from_pairs(pairs)
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True when the corpus holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Look up a document by id.
    ///
    /// Ids are dense, so this is a direct index into the canonical order.
    #[must_use]
    pub fn get(&self, id: DocumentId) -> &Document {
        &self.documents[id.to_index()]
    }

    /// External name for a document id.
    #[must_use]
    pub fn name(&self, id: DocumentId) -> &str {
        &self.get(id).name
    }
}
