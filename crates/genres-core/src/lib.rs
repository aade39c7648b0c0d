//! genres-core: Shared types, configuration, and error handling for the genres service.
//!
//! This crate provides the foundational types used by the graph layer and the CLI:
//! - The `Genre` entity and its alternative identifiers
//! - Identifier schemes and entity labels as they appear in the graph
//! - Capability traits for encoding entities as graph nodes
//! - Configuration management
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use error::GenresError;
pub use types::{
    AlternativeIdentifiers, EntityLabel, Genre, GraphEncodable, Identifiable, IdentifierScheme,
};
