//! The genre service: a stateless component over an injected `CypherRunner`.
//!
//! Writes and deletes live in `mutations`, reads in `queries`.

use std::io::Read;

use genres_core::{EntityLabel, Genre, GenresError, IdentifierScheme};

use crate::client::GraphError;
use crate::statement::CypherRunner;

/// Read/write access to genres stored in the graph.
pub struct GenreService<R> {
    pub(crate) runner: R,
}

impl<R: CypherRunner> GenreService<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Ensure the uniqueness constraints the write path relies on.
    pub async fn initialise(&self) -> Result<(), GraphError> {
        let targets = unique_constraints();
        for (label, property) in &targets {
            self.runner.ensure_unique_constraint(label, property).await?;
        }
        tracing::info!(constraints = targets.len(), "Constraints ensured");
        Ok(())
    }

    /// Connectivity check against the store.
    pub async fn check(&self) -> Result<(), GraphError> {
        self.runner.check().await
    }

    /// Decode one JSON genre record and return it with its uuid.
    pub fn decode_json(reader: impl Read) -> Result<(Genre, String), GenresError> {
        let genre: Genre = serde_json::from_reader(reader)?;
        let uuid = genre.uuid.clone();
        Ok((genre, uuid))
    }
}

/// `(label, property)` pairs that must be unique: `uuid` on every entity
/// label, `value` on every identifier scheme label.
pub fn unique_constraints() -> Vec<(&'static str, &'static str)> {
    EntityLabel::ALL
        .iter()
        .map(|l| (l.as_str(), "uuid"))
        .chain(IdentifierScheme::ALL.iter().map(|s| (s.label(), "value")))
        .collect()
}
