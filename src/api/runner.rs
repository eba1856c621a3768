// src/api/runner.rs

//! End-to-end query: load records, build an index, search, attach texts.

use std::path::Path;

use serde::Serialize;

use crate::core::common::KdSearchError;
use crate::core::config::Config;
use crate::core::indexing::vector::kdtree::{KdTree, KdTreeError, Neighbor, SearchParams};
use crate::core::indexing::vector::{LinearIndex, NearestNeighborIndex};
use crate::core::performance::PhaseTimer;
use crate::core::records::{self, EmbeddingSet, Query, RawEmbedding, Record, TextLookup};
use crate::core::types::{Embedding, PointId, VectorData};

/// A neighbor ready for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNeighbor {
    /// 1-based position, closest first.
    pub rank: usize,
    pub id: PointId,
    pub distance: f32,
    pub text: Option<String>,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct QueryReport {
    pub query_text: Option<String>,
    /// Name of the index that answered (`kdtree` or `linear`).
    pub backend: String,
    pub dimension: usize,
    pub point_count: usize,
    pub neighbors: Vec<RankedNeighbor>,
    pub timings: PhaseTimer,
}

/// Runs queries according to a [`Config`].
#[derive(Debug, Clone)]
pub struct QueryRunner {
    config: Config,
}

impl QueryRunner {
    pub fn new(config: Config) -> Result<Self, KdSearchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loads both files, then behaves like [`QueryRunner::run_records`].
    pub fn run(&self, query_path: &Path, passages_path: &Path) -> Result<QueryReport, KdSearchError> {
        let mut timer = PhaseTimer::start();
        let (query, passages) = timer.time("load", || -> Result<_, KdSearchError> {
            Ok((records::load_query(query_path)?, records::load_records(passages_path)?))
        })?;
        self.execute(query, &passages, timer)
    }

    /// Searches `passages` for the neighbors of `query`.
    ///
    /// The dimension comes from the config when set, otherwise from the query.
    pub fn run_records(&self, query: Query, passages: &[Record]) -> Result<QueryReport, KdSearchError> {
        self.execute(query, passages, PhaseTimer::start())
    }

    fn execute(
        &self,
        query: Query,
        passages: &[Record],
        mut timer: PhaseTimer,
    ) -> Result<QueryReport, KdSearchError> {
        let dimension = self.config.dimension.unwrap_or_else(|| query.embedding.dimension());
        let set = EmbeddingSet::from_records(passages, Some(dimension))?;
        let lookup = TextLookup::from_records(passages);
        let point_count = set.len();

        if self.config.k > point_count {
            log::warn!(
                "K = {} exceeds the {} indexed points; returning all of them",
                self.config.k,
                point_count
            );
        }
        let params = SearchParams::exact(self.config.k).with_epsilon(self.config.epsilon);

        let (backend, neighbors) = match (set, query.embedding) {
            (EmbeddingSet::Scalar(points), RawEmbedding::Scalar(q)) => {
                self.search(points, &q, 1, params, &mut timer)?
            }
            (EmbeddingSet::Scalar(points), RawEmbedding::Vector(q)) => match q.as_slice() {
                [x] => self.search(points, x, 1, params, &mut timer)?,
                _ => return Err(KdSearchError::DimensionMismatch { expected: 1, found: q.len() }),
            },
            (EmbeddingSet::Vector { dimension, points }, RawEmbedding::Vector(q)) => {
                self.search(points, &VectorData::from_vec(q), dimension, params, &mut timer)?
            }
            // A bare number against one-wide vectors.
            (EmbeddingSet::Vector { dimension, points }, RawEmbedding::Scalar(q)) => {
                self.search(points, &VectorData::from_vec(vec![q]), dimension, params, &mut timer)?
            }
        };
        log::info!(
            "{} search over {} points returned {} neighbors",
            backend,
            point_count,
            neighbors.len()
        );

        let neighbors = neighbors
            .into_iter()
            .enumerate()
            .map(|(i, n)| RankedNeighbor {
                rank: i + 1,
                id: n.id,
                distance: n.distance,
                text: lookup.get(n.id).map(str::to_string),
            })
            .collect();

        timer.record("processing", timer.elapsed());
        Ok(QueryReport {
            query_text: query.text,
            backend,
            dimension,
            point_count,
            neighbors,
            timings: timer,
        })
    }

    fn search<E: Embedding + 'static>(
        &self,
        points: Vec<(E, PointId)>,
        query: &E,
        dimension: usize,
        params: SearchParams,
        timer: &mut PhaseTimer,
    ) -> Result<(String, Vec<Neighbor>), KdSearchError> {
        let use_linear_scan = self.config.use_linear_scan;
        let index = timer.time("build", || -> Result<Box<dyn NearestNeighborIndex<E>>, KdTreeError> {
            if use_linear_scan {
                Ok(Box::new(LinearIndex::new(points, dimension)?))
            } else {
                Ok(Box::new(KdTree::build(points, dimension)?))
            }
        })?;
        let neighbors = timer.time("query", || index.search_knn(query, params))?;
        Ok((index.name().to_string(), neighbors))
    }
}
