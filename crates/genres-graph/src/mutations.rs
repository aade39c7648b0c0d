//! Write operations for genres.
//!
//! Entity nodes are merged by uuid so repeated writes are idempotent. A write
//! replaces the node's properties and its identifier set in full; a delete
//! demotes the node to a bare `Thing` and removes it only when nothing else
//! refers to it.

use genres_core::{EntityLabel, Genre, GraphEncodable, Identifiable};

use crate::client::GraphError;
use crate::identifiers;
use crate::service::GenreService;
use crate::statement::{expect_results, CypherRunner, Statement};

const UPSERT_GENRE: &str = "MERGE (n:Thing {uuid: $uuid})
SET n = $props
SET n:Concept:Classification:Genre";

/// Strip semantic labels and wipe properties down to the uuid. Returns how
/// many semantic labels were present; no row means nothing matched.
const DEMOTE: &str = "MATCH (t:Thing {uuid: $uuid})
WITH t, size([l IN labels(t) WHERE l IN ['Concept', 'Classification', 'Genre']]) AS labels_removed
REMOVE t:Concept:Classification:Genre
SET t = {uuid: $uuid}
RETURN labels_removed";

const PURGE_IF_UNUSED: &str = "MATCH (t:Thing {uuid: $uuid})
OPTIONAL MATCH (t)-[a]-()
WITH t, count(a) AS rel_count
WHERE rel_count = 0
DELETE t
RETURN count(*) AS purged";

/// Outcome of a delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct DeleteOutcome {
    /// The node was matched and lost at least one semantic label: it is no
    /// longer a genre.
    pub degraded: bool,
    /// The node was physically removed because no relationships remained.
    pub purged: bool,
}

impl DeleteOutcome {
    /// Whether the genre is gone as a genre, whether or not the node survives.
    pub fn deleted(&self) -> bool {
        self.degraded
    }
}

/// Upsert statement for an encodable entity. Only label sets with a
/// prepared statement are accepted.
pub fn upsert_statement<E: GraphEncodable>(entity: &E) -> Result<Statement, GraphError> {
    let cypher = match entity.labels() {
        [EntityLabel::Thing, EntityLabel::Concept, EntityLabel::Classification, EntityLabel::Genre] => {
            UPSERT_GENRE
        }
        other => {
            return Err(GraphError::InvalidInput(format!(
                "no upsert statement for label set {other:?}"
            )))
        }
    };

    Ok(Statement::new(cypher)
        .param("uuid", entity.id())
        .param("props", entity.properties()))
}

/// The full write batch: identifier removal, entity upsert, identifier
/// creation, in that order.
pub fn write_batch(genre: &Genre) -> Result<Vec<Statement>, GraphError> {
    let uuid = genre.id();
    if uuid.trim().is_empty() {
        return Err(GraphError::InvalidInput(
            "genre uuid must not be empty".to_string(),
        ));
    }

    let (delete_previous, create_new) = identifiers::reconcile(uuid, &genre.alternative_identifiers);

    let mut batch = Vec::with_capacity(create_new.len() + 2);
    batch.push(delete_previous);
    batch.push(upsert_statement(genre)?);
    batch.extend(create_new);
    Ok(batch)
}

/// The delete batch: demote, then purge if unused.
pub fn delete_batch(uuid: &str) -> Vec<Statement> {
    vec![
        Statement::new(DEMOTE).param("uuid", uuid),
        Statement::new(PURGE_IF_UNUSED).param("uuid", uuid),
    ]
}

impl<R: CypherRunner> GenreService<R> {
    /// Create or fully replace a genre and its identifiers.
    pub async fn write(&self, genre: &Genre) -> Result<(), GraphError> {
        let batch = write_batch(genre)?;
        self.runner.run_batch(&batch).await?;

        tracing::info!(
            uuid = %genre.uuid,
            statements = batch.len(),
            "Genre written"
        );
        Ok(())
    }

    /// Demote a genre to a bare `Thing`, removing the node when unused.
    ///
    /// An unknown uuid is not an error: both signals come back false.
    pub async fn delete(&self, uuid: &str) -> Result<DeleteOutcome, GraphError> {
        let batch = delete_batch(uuid);
        let results = expect_results(self.runner.run_batch(&batch).await?, batch.len())?;

        let labels_removed = results[0].first_i64("labels_removed");
        let outcome = DeleteOutcome {
            degraded: labels_removed.is_some_and(|n| n > 0),
            purged: results[1].first_i64("purged").unwrap_or(0) > 0,
        };

        tracing::info!(
            uuid,
            matched = labels_removed.is_some(),
            labels_removed = labels_removed.unwrap_or(0),
            degraded = outcome.degraded,
            purged = outcome.purged,
            "Genre deleted"
        );
        Ok(outcome)
    }
}
