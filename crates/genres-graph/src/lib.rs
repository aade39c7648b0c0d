//! Genres Graph — Neo4j access layer for genre concepts.
//!
//! This crate is the single mutation point for genre nodes and their
//! identifier nodes. Every public operation issues exactly one batch of
//! statements through a `CypherRunner`, so the graph stays consistent
//! under repeated, idempotent writes and partial deletes.

pub mod client;
pub mod identifiers;
pub mod mutations;
pub mod queries;
pub mod service;
pub mod statement;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use mutations::DeleteOutcome;
pub use queries::ThingRecord;
pub use service::GenreService;
pub use statement::{CypherRunner, Param, Record, Statement, StatementResult};
