//! Read operations for genres.

use genres_core::types::canonical_label_order;
use genres_core::Genre;

use crate::client::GraphError;
use crate::service::GenreService;
use crate::statement::{expect_results, CypherRunner, Record, Statement};

const READ_GENRE: &str = "MATCH (n:Thing:Genre {uuid: $uuid})
OPTIONAL MATCH (upp:UPPIdentifier)-[:IDENTIFIES]->(n)
OPTIONAL MATCH (tme:TMEIdentifier)-[:IDENTIFIES]->(n)
OPTIONAL MATCH (fs:FactsetIdentifier)-[:IDENTIFIES]->(n)
OPTIONAL MATCH (lei:LegalEntityIdentifier)-[:IDENTIFIES]->(n)
RETURN n.uuid AS uuid, n.prefLabel AS prefLabel, labels(n) AS types,
       {uuids: collect(DISTINCT upp.value),
        TME: collect(DISTINCT tme.value),
        factsetIdentifier: coalesce(head(collect(DISTINCT fs.value)), ''),
        leiCode: coalesce(head(collect(DISTINCT lei.value)), '')} AS alternativeIdentifiers";

const COUNT_GENRES: &str = "MATCH (n:Genre) RETURN count(n) AS cnt";

const FIND_THING: &str = "MATCH (t:Thing {uuid: $uuid})
OPTIONAL MATCH (t)<-[:IDENTIFIES]-(i)
RETURN t.uuid AS uuid, labels(t) AS labels, keys(t) AS property_keys, count(i) AS identifier_count";

/// What is left of an entity node, whatever its semantic state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ThingRecord {
    pub uuid: String,
    pub labels: Vec<String>,
    pub property_keys: Vec<String>,
    /// Incoming `IDENTIFIES` edges.
    pub identifier_count: i64,
}

impl ThingRecord {
    /// A node reduced to its base label and uuid.
    pub fn is_bare(&self) -> bool {
        self.labels.iter().all(|l| l == "Thing") && self.property_keys.iter().all(|k| k == "uuid")
    }
}

impl<R: CypherRunner> GenreService<R> {
    /// Read a genre with all its identifiers.
    ///
    /// Returns `(Genre::default(), false)` when no genre-labeled node carries
    /// the uuid, including when only a bare `Thing` remains.
    pub async fn read(&self, uuid: &str) -> Result<(Genre, bool), GraphError> {
        let batch = [Statement::new(READ_GENRE).param("uuid", uuid)];
        let results = expect_results(self.runner.run_batch(&batch).await?, 1)?;

        let Some(row) = results[0].first() else {
            tracing::debug!(uuid, "Genre not found");
            return Ok((Genre::default(), false));
        };

        let mut genre: Genre = decode_row(row, "genre")?;
        canonical_label_order(&mut genre.types);
        Ok((genre, true))
    }

    /// Number of nodes carrying the `Genre` label.
    pub async fn count(&self) -> Result<i64, GraphError> {
        let batch = [Statement::new(COUNT_GENRES)];
        let results = expect_results(self.runner.run_batch(&batch).await?, 1)?;
        results[0].first_i64("cnt").ok_or_else(|| {
            GraphError::Serialization("count row is missing integer column cnt".to_string())
        })
    }

    /// Probe for the base-labeled node of `uuid`, genre or not.
    pub async fn find_thing(&self, uuid: &str) -> Result<Option<ThingRecord>, GraphError> {
        let batch = [Statement::new(FIND_THING).param("uuid", uuid)];
        let results = expect_results(self.runner.run_batch(&batch).await?, 1)?;

        results[0]
            .first()
            .map(|row| decode_row(row, "thing"))
            .transpose()
    }
}

fn decode_row<T: serde::de::DeserializeOwned>(row: &Record, what: &str) -> Result<T, GraphError> {
    serde_json::from_value(serde_json::Value::Object(row.clone()))
        .map_err(|e| GraphError::Serialization(format!("Failed to decode {what} row: {e}")))
}

#[cfg(test)]
mod tests {
    use genres_core::AlternativeIdentifiers;
    use serde_json::json;

    use super::*;
    use crate::service::testing::{record, RecordingRunner};
    use crate::statement::StatementResult;

    fn service_with(rows: Vec<Record>) -> GenreService<RecordingRunner> {
        let runner = RecordingRunner::default();
        runner.respond(Ok(vec![StatementResult::new(rows)]));
        GenreService::new(runner)
    }

    #[tokio::test]
    async fn test_read_full_genre() {
        let service = service_with(vec![record(&[
            ("uuid", json!("u1")),
            ("prefLabel", json!("Drama")),
            ("types", json!(["Genre", "Thing", "Classification", "Concept"])),
            (
                "alternativeIdentifiers",
                json!({"uuids": ["u1"], "TME": ["t1", "t2"], "factsetIdentifier": "", "leiCode": ""}),
            ),
        ])]);

        let (genre, found) = service.read("u1").await.unwrap();
        assert!(found);
        assert_eq!(
            genre,
            Genre {
                uuid: "u1".to_string(),
                pref_label: Some("Drama".to_string()),
                alternative_identifiers: AlternativeIdentifiers {
                    tme: vec!["t1".to_string(), "t2".to_string()],
                    uuids: vec!["u1".to_string()],
                    ..Default::default()
                },
                types: vec![
                    "Thing".to_string(),
                    "Concept".to_string(),
                    "Classification".to_string(),
                    "Genre".to_string()
                ],
            }
        );

        let batches = service.runner().batches();
        assert_eq!(batches[0][0].cypher(), READ_GENRE);
    }

    #[tokio::test]
    async fn test_read_tolerates_missing_identifiers_and_label() {
        let service = service_with(vec![record(&[
            ("uuid", json!("u1")),
            ("prefLabel", json!(null)),
            ("types", json!(["Thing", "Concept", "Classification", "Genre"])),
            (
                "alternativeIdentifiers",
                json!({"uuids": [], "TME": [], "factsetIdentifier": "", "leiCode": ""}),
            ),
        ])]);

        let (genre, found) = service.read("u1").await.unwrap();
        assert!(found);
        assert_eq!(genre.pref_label, None);
        assert!(genre.alternative_identifiers.is_empty());
    }

    #[tokio::test]
    async fn test_read_not_found() {
        let service = service_with(vec![]);
        let (genre, found) = service.read("u1").await.unwrap();
        assert!(!found);
        assert_eq!(genre, Genre::default());
    }

    #[tokio::test]
    async fn test_read_undecodable_row() {
        let service = service_with(vec![record(&[("uuid", json!(7))])]);
        let err = service.read("u1").await.unwrap_err();
        assert!(matches!(err, GraphError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_count() {
        let service = service_with(vec![record(&[("cnt", json!(2))])]);
        assert_eq!(service.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_count_rejects_malformed_row() {
        for rows in [vec![], vec![record(&[("cnt", json!("2"))])]] {
            let err = service_with(rows).count().await.unwrap_err();
            assert!(matches!(err, GraphError::Serialization(_)));
        }
    }

    #[tokio::test]
    async fn test_find_thing_bare_node() {
        let service = service_with(vec![record(&[
            ("uuid", json!("u1")),
            ("labels", json!(["Thing"])),
            ("property_keys", json!(["uuid"])),
            ("identifier_count", json!(2)),
        ])]);

        let thing = service.find_thing("u1").await.unwrap().unwrap();
        assert!(thing.is_bare());
        assert_eq!(thing.identifier_count, 2);
    }

    #[tokio::test]
    async fn test_find_thing_absent() {
        let service = service_with(vec![]);
        assert_eq!(service.find_thing("u1").await.unwrap(), None);
    }
}
