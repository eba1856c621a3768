//! Public API for running nearest-neighbor queries over JSON passage files.
//!
//! The main entry point is [`QueryRunner`], which loads a query and its
//! passages, builds the configured index, and returns a [`QueryReport`] that
//! [`report::render`] turns into the text printed by the `kdsearch` binary.

pub mod report;
pub mod runner;

pub use report::{render, render_json, TextReport};
pub use runner::{QueryReport, QueryRunner, RankedNeighbor};
