// src/core/records/mod.rs

//! JSON record source: loads passages and queries, validates their
//! embeddings, and keeps the id -> text dictionary used to enrich results.
//!
//! Input files hold a JSON array of objects such as
//! `{"id": 3, "embedding": [0.1, 0.2], "text": "..."}`. The embedding may also
//! be a bare number for one-dimensional data. Extra fields are ignored.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::common::KdSearchError;
use crate::core::types::{PointId, VectorData};

/// Embedding as written in an input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEmbedding {
    Scalar(f32),
    Vector(Vec<f32>),
}

impl RawEmbedding {
    pub fn dimension(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Vector(v) => v.len(),
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            Self::Scalar(x) => x.is_finite(),
            Self::Vector(v) => v.iter().all(|x| x.is_finite()),
        }
    }
}

/// One passage: an id, its embedding and optional text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub id: PointId,
    pub embedding: RawEmbedding,
    #[serde(default)]
    pub text: Option<String>,
}

/// The query: an embedding and optional text. Ids are not required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Query {
    pub embedding: RawEmbedding,
    #[serde(default)]
    pub text: Option<String>,
}

/// Parses a non-empty JSON array, naming the offending element on failure.
fn parse_array<T: for<'de> Deserialize<'de>>(json: &str, what: &str) -> Result<Vec<T>, KdSearchError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let items = match value {
        serde_json::Value::Array(items) if !items.is_empty() => items,
        _ => {
            return Err(KdSearchError::invalid_input(format!(
                "{} JSON must be an array with at least 1 element",
                what
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item).map_err(|e| {
                KdSearchError::invalid_input(format!("{} element {}: {}", what, i, e))
            })
        })
        .collect()
}

/// Parses passage records from a JSON string.
pub fn parse_records(json: &str) -> Result<Vec<Record>, KdSearchError> {
    parse_array(json, "Passages")
}

/// Parses a query file's contents and returns its first element.
pub fn parse_query(json: &str) -> Result<Query, KdSearchError> {
    let mut queries: Vec<Query> = parse_array(json, "Query")?;
    if queries.len() > 1 {
        log::warn!("query file holds {} entries; only the first is used", queries.len());
    }
    Ok(queries.swap_remove(0))
}

/// Loads passage records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<Record>, KdSearchError> {
    let contents = fs::read_to_string(path)?;
    let records = parse_records(&contents)?;
    log::info!("loaded {} records from '{}'", records.len(), path.display());
    Ok(records)
}

/// Loads the first query from a JSON file.
pub fn load_query(path: &Path) -> Result<Query, KdSearchError> {
    let contents = fs::read_to_string(path)?;
    parse_query(&contents)
}

/// Validated points, split by embedding shape.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingSet {
    Scalar(Vec<(f32, PointId)>),
    Vector { dimension: usize, points: Vec<(VectorData, PointId)> },
}

impl EmbeddingSet {
    /// Validates `records` and converts them into index input.
    ///
    /// All records must share one shape and, for vectors, one length equal to
    /// `dimension` when given (otherwise the first record's length). Every
    /// coordinate must be finite.
    pub fn from_records(records: &[Record], dimension: Option<usize>) -> Result<Self, KdSearchError> {
        if let Some(bad) = records.iter().find(|r| !r.embedding.is_finite()) {
            return Err(KdSearchError::invalid_input(format!(
                "record {} has a non-finite coordinate",
                bad.id
            )));
        }

        let Some(first) = records.first() else {
            return match dimension {
                Some(dimension) => Ok(Self::Vector { dimension, points: Vec::new() }),
                None => Err(KdSearchError::UnconfiguredDimension),
            };
        };

        match first.embedding {
            RawEmbedding::Scalar(_) => {
                if let Some(expected) = dimension.filter(|&d| d != 1) {
                    return Err(KdSearchError::DimensionMismatch { expected, found: 1 });
                }
                records
                    .iter()
                    .map(|r| match r.embedding {
                        RawEmbedding::Scalar(x) => Ok((x, r.id)),
                        RawEmbedding::Vector(_) => Err(mixed_shapes(r.id)),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Self::Scalar)
            }
            RawEmbedding::Vector(ref v) => {
                let dimension = dimension.unwrap_or(v.len());
                if dimension == 0 {
                    return Err(KdSearchError::invalid_input(format!(
                        "record {} has an empty embedding",
                        first.id
                    )));
                }
                let points = records
                    .iter()
                    .map(|r| match &r.embedding {
                        RawEmbedding::Vector(v) if v.len() == dimension => {
                            Ok((VectorData::from_vec(v.clone()), r.id))
                        }
                        RawEmbedding::Vector(v) => {
                            Err(KdSearchError::DimensionMismatch { expected: dimension, found: v.len() })
                        }
                        RawEmbedding::Scalar(_) => Err(mixed_shapes(r.id)),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Vector { dimension, points })
            }
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Vector { dimension, .. } => *dimension,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(points) => points.len(),
            Self::Vector { points, .. } => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn mixed_shapes(id: PointId) -> KdSearchError {
    KdSearchError::invalid_input(format!(
        "record {} mixes scalar and vector embeddings with earlier records",
        id
    ))
}

/// id -> text dictionary for result enrichment. A repeated id keeps the
/// text of its last record.
#[derive(Debug, Clone, Default)]
pub struct TextLookup {
    texts: HashMap<PointId, String>,
}

impl TextLookup {
    pub const MISSING: &'static str = "(no text)";

    pub fn from_records(records: &[Record]) -> Self {
        let texts = records
            .iter()
            .filter_map(|r| r.text.as_ref().map(|t| (r.id, t.clone())))
            .collect();
        Self { texts }
    }

    pub fn get(&self, id: PointId) -> Option<&str> {
        self.texts.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PASSAGES: &str = r#"[
        {"id": 0, "embedding": [0.0, 0.0], "text": "origin"},
        {"id": 1, "embedding": [1.0, 1.0], "text": "one", "url": "ignored"},
        {"id": 2, "embedding": [5.0, 5.0]}
    ]"#;

    #[test]
    fn test_parse_vector_records() {
        let records = parse_records(PASSAGES).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].embedding, RawEmbedding::Vector(vec![1.0, 1.0]));
        assert_eq!(records[2].text, None);

        let set = EmbeddingSet::from_records(&records, None).unwrap();
        assert_eq!(set.dimension(), 2);
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_parse_scalar_records() {
        let records =
            parse_records(r#"[{"id": 4, "embedding": 10}, {"id": 5, "embedding": 2.5}]"#).unwrap();
        let set = EmbeddingSet::from_records(&records, None).unwrap();
        assert_eq!(set, EmbeddingSet::Scalar(vec![(10.0, 4), (2.5, 5)]));
        assert_eq!(set.dimension(), 1);
        assert!(EmbeddingSet::from_records(&records, Some(1)).is_ok());
        assert!(matches!(
            EmbeddingSet::from_records(&records, Some(3)),
            Err(KdSearchError::DimensionMismatch { expected: 3, found: 1 })
        ));
    }

    #[test]
    fn test_rejects_non_arrays_and_empty_arrays() {
        assert!(matches!(parse_records("{}"), Err(KdSearchError::InvalidInput { .. })));
        assert!(matches!(parse_records("[]"), Err(KdSearchError::InvalidInput { .. })));
        assert!(matches!(parse_records("[1, 2"), Err(KdSearchError::Json(_))));
    }

    #[test]
    fn test_rejects_records_missing_fields() {
        let err = parse_records(r#"[{"id": 1, "embedding": [1.0]}, {"embedding": [2.0]}]"#)
            .unwrap_err();
        match err {
            KdSearchError::InvalidInput { message } => assert!(message.contains("element 1")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(parse_records(r#"[{"id": 1, "embedding": "abc"}]"#).is_err());
    }

    #[test]
    fn test_dimension_mismatch_between_records() {
        let records = parse_records(
            r#"[{"id": 0, "embedding": [1.0, 2.0]}, {"id": 1, "embedding": [1.0, 2.0, 3.0]}]"#,
        )
        .unwrap();
        assert!(matches!(
            EmbeddingSet::from_records(&records, None),
            Err(KdSearchError::DimensionMismatch { expected: 2, found: 3 })
        ));
        assert!(matches!(
            EmbeddingSet::from_records(&records, Some(3)),
            Err(KdSearchError::DimensionMismatch { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_mixed_shapes_and_empty_vectors_rejected() {
        let mixed =
            parse_records(r#"[{"id": 0, "embedding": [1.0]}, {"id": 1, "embedding": 2.0}]"#).unwrap();
        assert!(matches!(
            EmbeddingSet::from_records(&mixed, None),
            Err(KdSearchError::InvalidInput { .. })
        ));

        let empty = parse_records(r#"[{"id": 0, "embedding": []}]"#).unwrap();
        assert!(matches!(
            EmbeddingSet::from_records(&empty, None),
            Err(KdSearchError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        let records = vec![Record {
            id: 9,
            embedding: RawEmbedding::Vector(vec![1.0, f32::NAN]),
            text: None,
        }];
        assert!(matches!(
            EmbeddingSet::from_records(&records, None),
            Err(KdSearchError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_no_records_needs_a_dimension() {
        assert!(matches!(
            EmbeddingSet::from_records(&[], None),
            Err(KdSearchError::UnconfiguredDimension)
        ));
        let set = EmbeddingSet::from_records(&[], Some(4)).unwrap();
        assert_eq!(set.dimension(), 4);
        assert!(set.is_empty());
    }

    #[test]
    fn test_query_uses_first_element() {
        let query = parse_query(
            r#"[{"embedding": [0.5, 0.5], "text": "what"}, {"embedding": [9.0, 9.0]}]"#,
        )
        .unwrap();
        assert_eq!(query.embedding.dimension(), 2);
        assert_eq!(query.text.as_deref(), Some("what"));
    }

    #[test]
    fn test_text_lookup() {
        let records = parse_records(PASSAGES).unwrap();
        let lookup = TextLookup::from_records(&records);
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.get(0), Some("origin"));
        assert_eq!(lookup.get(2), None);
        assert_eq!(lookup.get(2).unwrap_or(TextLookup::MISSING), "(no text)");
    }

    #[test]
    fn test_load_from_files() {
        let mut passages = NamedTempFile::new().unwrap();
        passages.write_all(PASSAGES.as_bytes()).unwrap();
        assert_eq!(load_records(passages.path()).unwrap().len(), 3);

        let mut query = NamedTempFile::new().unwrap();
        query.write_all(br#"[{"embedding": 3}]"#).unwrap();
        assert_eq!(load_query(query.path()).unwrap().embedding, RawEmbedding::Scalar(3.0));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_records(&dir.path().join("nope.json")), Err(KdSearchError::Io(_))));
    }
}
