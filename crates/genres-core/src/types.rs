//! Core domain types for the genres service.
//!
//! A `Genre` is stored as a `Thing` node carrying the semantic labels
//! `Concept`, `Classification` and `Genre`. Alternative identifiers live on
//! separate identifier nodes that point at the genre through `IDENTIFIES`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ── Capability Traits ─────────────────────────────────────────────

/// Anything addressable by a globally unique id in the node space.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// An entity that knows how to present itself as a labeled graph node.
pub trait GraphEncodable: Identifiable {
    /// Labels applied on upsert, base label first.
    fn labels(&self) -> &'static [EntityLabel];

    /// The complete scalar property set of the node. Writes replace the
    /// stored properties with exactly this map.
    fn properties(&self) -> HashMap<String, String>;
}

// ── Labels ────────────────────────────────────────────────────────

/// Labels an entity node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    /// Base label kept by every entity node, even after demotion.
    Thing,
    Concept,
    Classification,
    Genre,
}

impl EntityLabel {
    /// Canonical label order, base label first.
    pub const ALL: [EntityLabel; 4] = [
        EntityLabel::Thing,
        EntityLabel::Concept,
        EntityLabel::Classification,
        EntityLabel::Genre,
    ];

    /// Labels stripped on delete.
    pub const SEMANTIC: [EntityLabel; 3] = [
        EntityLabel::Concept,
        EntityLabel::Classification,
        EntityLabel::Genre,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thing => "Thing",
            Self::Concept => "Concept",
            Self::Classification => "Classification",
            Self::Genre => "Genre",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == name)
    }
}

/// Sort node labels into canonical order. Unknown labels keep their
/// relative order after the known ones.
pub fn canonical_label_order(labels: &mut [String]) {
    labels.sort_by_key(|name| {
        EntityLabel::from_name(name)
            .and_then(|l| EntityLabel::ALL.iter().position(|x| *x == l))
            .unwrap_or(EntityLabel::ALL.len())
    });
}

// ── Identifier Schemes ────────────────────────────────────────────

/// External identifier schemes. Each maps to its own node label.
///
/// `Tme` and `Upp` admit many values per entity, `Factset` and `Lei` at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierScheme {
    Tme,
    Upp,
    Factset,
    Lei,
}

impl IdentifierScheme {
    pub const ALL: [IdentifierScheme; 4] = [
        IdentifierScheme::Tme,
        IdentifierScheme::Upp,
        IdentifierScheme::Factset,
        IdentifierScheme::Lei,
    ];

    /// Node label applied to identifier nodes of this scheme.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tme => "TMEIdentifier",
            Self::Upp => "UPPIdentifier",
            Self::Factset => "FactsetIdentifier",
            Self::Lei => "LegalEntityIdentifier",
        }
    }
}

// ── Genre ─────────────────────────────────────────────────────────

/// A genre concept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub uuid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,

    #[serde(default)]
    pub alternative_identifiers: AlternativeIdentifiers,

    /// Labels on the stored node. Filled in on read, ignored on write.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

/// Alternative identifiers grouped by scheme.
///
/// Many-valued schemes are lists; single-valued schemes are plain strings
/// where the empty string means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeIdentifiers {
    #[serde(rename = "TME", default, skip_serializing_if = "Vec::is_empty")]
    pub tme: Vec<String>,

    #[serde(rename = "uuids", default)]
    pub uuids: Vec<String>,

    #[serde(
        rename = "factsetIdentifier",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub factset_identifier: String,

    #[serde(rename = "leiCode", default, skip_serializing_if = "String::is_empty")]
    pub lei_code: String,
}

impl AlternativeIdentifiers {
    /// Values recorded for one scheme. Empty strings are skipped.
    pub fn values(&self, scheme: IdentifierScheme) -> Vec<&str> {
        let raw: Vec<&str> = match scheme {
            IdentifierScheme::Tme => self.tme.iter().map(String::as_str).collect(),
            IdentifierScheme::Upp => self.uuids.iter().map(String::as_str).collect(),
            IdentifierScheme::Factset => vec![self.factset_identifier.as_str()],
            IdentifierScheme::Lei => vec![self.lei_code.as_str()],
        };
        raw.into_iter().filter(|v| !v.is_empty()).collect()
    }

    /// Every (scheme, value) pair, in scheme order then value order.
    pub fn iter(&self) -> impl Iterator<Item = (IdentifierScheme, &str)> + '_ {
        IdentifierScheme::ALL
            .into_iter()
            .flat_map(move |scheme| self.values(scheme).into_iter().map(move |v| (scheme, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl Identifiable for Genre {
    fn id(&self) -> &str {
        &self.uuid
    }
}

impl GraphEncodable for Genre {
    fn labels(&self) -> &'static [EntityLabel] {
        &EntityLabel::ALL
    }

    fn properties(&self) -> HashMap<String, String> {
        let mut props = HashMap::new();
        props.insert("uuid".to_string(), self.uuid.clone());
        if let Some(label) = self.pref_label.as_ref().filter(|l| !l.is_empty()) {
            props.insert("prefLabel".to_string(), label.clone());
        }
        props
    }
}
