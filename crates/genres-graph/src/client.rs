//! Neo4j connection management and the batch runner behind the service.

use genres_core::config::Neo4jSettings;
use neo4rs::{query, ConfigBuilder, Graph, Query, Txn};

use crate::statement::{CypherRunner, Record, Statement, StatementResult};

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Batch returned {actual} results for {expected} statements")]
    UnexpectedResults { expected: usize, actual: usize },
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::from(&Neo4jSettings::default())
    }
}

impl From<&Neo4jSettings> for GraphConfig {
    fn from(settings: &Neo4jSettings) -> Self {
        Self {
            uri: settings.uri.clone(),
            user: settings.user.clone(),
            password: settings.password.clone(),
            max_connections: settings.max_connections,
            fetch_size: settings.fetch_size,
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Execute a write-only query outside any batch.
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        self.graph.run(query).await?;
        Ok(())
    }
}

impl CypherRunner for GraphClient {
    /// Runs the whole batch inside one explicit transaction, rolling back on
    /// the first failing statement.
    async fn run_batch(&self, batch: &[Statement]) -> Result<Vec<StatementResult>, GraphError> {
        let mut txn = self.graph.start_txn().await?;

        match execute_in_txn(&mut txn, batch).await {
            Ok(results) => {
                txn.commit().await?;
                tracing::debug!(statements = batch.len(), "Batch committed");
                Ok(results)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback after failed batch failed");
                }
                Err(e)
            }
        }
    }

    async fn ensure_unique_constraint(&self, label: &str, property: &str) -> Result<(), GraphError> {
        if !is_plain_identifier(label) || !is_plain_identifier(property) {
            return Err(GraphError::InvalidInput(format!(
                "constraint target must be plain identifiers, got {label}.{property}"
            )));
        }

        let cypher = format!(
            "CREATE CONSTRAINT {label}_{property}_unique IF NOT EXISTS
             FOR (n:{label}) REQUIRE n.{property} IS UNIQUE"
        );
        self.graph.run(query(&cypher)).await?;

        tracing::debug!(label, property, "Unique constraint ensured");
        Ok(())
    }
}

async fn execute_in_txn(
    txn: &mut Txn,
    batch: &[Statement],
) -> Result<Vec<StatementResult>, GraphError> {
    let mut results = Vec::with_capacity(batch.len());
    for stmt in batch {
        let mut stream = txn.execute(stmt.to_query()).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next(txn.handle()).await? {
            rows.push(row_to_record(&row)?);
        }
        results.push(StatementResult::new(rows));
    }
    Ok(results)
}

/// Convert a neo4rs row into a JSON record keyed by column alias.
fn row_to_record(row: &neo4rs::Row) -> Result<Record, GraphError> {
    let value: serde_json::Value = row
        .to()
        .map_err(|e| GraphError::Serialization(format!("Failed to deserialize row: {e}")))?;

    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(GraphError::Serialization(format!(
            "Expected row to be a map, got {other}"
        ))),
    }
}

/// Labels and property keys that can be spliced into schema statements.
fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
