//! Statements and the batch-execution contract consumed by the service.
//!
//! Statement text is always a `&'static str`: node labels are chosen when the
//! statement is built, from closed enums, and every value travels as a bound
//! parameter.

use std::collections::HashMap;
use std::future::Future;

use neo4rs::{query, BoltType, Query};

use crate::client::GraphError;

/// One result row, keyed by the `RETURN` aliases of its statement.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// A bound parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Text(String),
    Map(HashMap<String, String>),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<HashMap<String, String>> for Param {
    fn from(value: HashMap<String, String>) -> Self {
        Param::Map(value)
    }
}

impl From<Param> for BoltType {
    fn from(param: Param) -> Self {
        match param {
            Param::Text(s) => s.into(),
            Param::Map(m) => m.into(),
        }
    }
}

/// A single Cypher statement with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    cypher: &'static str,
    params: Vec<(&'static str, Param)>,
}

impl Statement {
    pub fn new(cypher: &'static str) -> Self {
        Self {
            cypher,
            params: Vec::new(),
        }
    }

    /// Bind a parameter, replacing any previous value under the same key.
    pub fn param(mut self, key: &'static str, value: impl Into<Param>) -> Self {
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    pub fn cypher(&self) -> &'static str {
        self.cypher
    }

    #[cfg(test)]
    pub(crate) fn params(&self) -> &[(&'static str, Param)] {
        &self.params
    }

    /// Look up a bound parameter by key.
    pub fn get(&self, key: &str) -> Option<&Param> {
        self.params.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Convert into a neo4rs query.
    pub fn to_query(&self) -> Query {
        self.params
            .iter()
            .fold(query(self.cypher), |q, (key, value)| {
                q.param(key, BoltType::from(value.clone()))
            })
    }
}

/// Rows produced by one statement of a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    pub rows: Vec<Record>,
}

impl StatementResult {
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    pub fn first(&self) -> Option<&Record> {
        self.rows.first()
    }

    /// Integer column of the first row, if present.
    pub fn first_i64(&self, key: &str) -> Option<i64> {
        self.first()
            .and_then(|row| row.get(key))
            .and_then(serde_json::Value::as_i64)
    }
}

/// Executes ordered statement batches against the graph store.
///
/// Statements within a batch observe each other's effects in order. A batch
/// either succeeds as a whole and yields one `StatementResult` per statement,
/// or fails with the store's error.
pub trait CypherRunner: Send + Sync {
    fn run_batch(
        &self,
        batch: &[Statement],
    ) -> impl Future<Output = Result<Vec<StatementResult>, GraphError>> + Send;

    /// Idempotently establish a uniqueness constraint on `(label, property)`.
    fn ensure_unique_constraint(
        &self,
        label: &str,
        property: &str,
    ) -> impl Future<Output = Result<(), GraphError>> + Send;

    /// Connectivity probe.
    fn check(&self) -> impl Future<Output = Result<(), GraphError>> + Send {
        async move {
            self.run_batch(&[Statement::new("RETURN 1 AS ok")])
                .await
                .map(|_| ())
        }
    }
}

/// Ensure a batch came back with exactly one result per statement.
pub(crate) fn expect_results(
    results: Vec<StatementResult>,
    expected: usize,
) -> Result<Vec<StatementResult>, GraphError> {
    if results.len() != expected {
        return Err(GraphError::UnexpectedResults {
            expected,
            actual: results.len(),
        });
    }
    Ok(results)
}
