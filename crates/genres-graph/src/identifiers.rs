//! Identifier reconciliation.
//!
//! A write fully replaces the identifier nodes of an entity: every existing
//! `IDENTIFIES` edge into the entity is removed together with its identifier
//! node, then one fresh node is created per supplied value. Identifier values
//! may repeat across schemes, so removal always precedes creation within the
//! batch.

use genres_core::{AlternativeIdentifiers, IdentifierScheme};

use crate::statement::Statement;

/// Removes every identifier node pointing at the entity, regardless of scheme.
const DELETE_IDENTIFIERS: &str = "MATCH (t:Thing {uuid: $uuid})
OPTIONAL MATCH (t)<-[iden:IDENTIFIES]-(i)
DELETE iden, i";

macro_rules! create_identifier {
    ($label:literal) => {
        concat!(
            "MERGE (t:Thing {uuid: $uuid})
CREATE (i:Identifier {value: $value})
MERGE (t)<-[:IDENTIFIES]-(i)
SET i:",
            $label
        )
    };
}

/// Creation statement text for one scheme, with the scheme label fixed at
/// compile time.
fn create_identifier_cypher(scheme: IdentifierScheme) -> &'static str {
    match scheme {
        IdentifierScheme::Tme => create_identifier!("TMEIdentifier"),
        IdentifierScheme::Upp => create_identifier!("UPPIdentifier"),
        IdentifierScheme::Factset => create_identifier!("FactsetIdentifier"),
        IdentifierScheme::Lei => create_identifier!("LegalEntityIdentifier"),
    }
}

/// Statement removing all identifier nodes of `uuid`.
pub fn delete_identifiers_statement(uuid: &str) -> Statement {
    Statement::new(DELETE_IDENTIFIERS).param("uuid", uuid)
}

/// Statement creating one identifier node of `scheme` for `uuid`.
pub fn create_identifier_statement(uuid: &str, scheme: IdentifierScheme, value: &str) -> Statement {
    Statement::new(create_identifier_cypher(scheme))
        .param("uuid", uuid)
        .param("value", value)
}

/// Build the reconciliation for a write: the deletion statement followed by
/// one creation statement per identifier value.
///
/// Returns the deletion separately so callers can place other statements
/// between the two phases without breaking delete-before-create.
pub fn reconcile(uuid: &str, identifiers: &AlternativeIdentifiers) -> (Statement, Vec<Statement>) {
    let creates = identifiers
        .iter()
        .map(|(scheme, value)| create_identifier_statement(uuid, scheme, value))
        .collect();

    (delete_identifiers_statement(uuid), creates)
}
