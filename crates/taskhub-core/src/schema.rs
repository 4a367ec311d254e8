//! Property schemas: target definitions, live kinds, and the kind-level diff.
//!
//! The diff is deliberately coarse. A target property is part of the diff only
//! when it is missing from the live schema or its kind differs; option lists
//! of a property whose kind already matches are never compared.
//!
//! A store has exactly one title property. A `Title` target is satisfied by
//! whatever title property the live store already has, under any name, so the
//! diff never asks for a second one.

use std::fmt;

use indexmap::IndexMap;

/// Display format of a number property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    #[default]
    Number,
    NumberWithCommas,
    Percent,
    Dollar,
    Euro,
}

impl NumberFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::NumberWithCommas => "number_with_commas",
            Self::Percent => "percent",
            Self::Dollar => "dollar",
            Self::Euro => "euro",
        }
    }
}

/// Kind tag of a property, as reported by a live store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Title,
    Select,
    Status,
    Date,
    Number,
    Text,
    Relation,
    /// A kind this engine never declares (checkbox, formula, ...).
    Other(String),
}

impl PropertyKind {
    /// Parses a remote kind tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "title" => Self::Title,
            "select" => Self::Select,
            "status" => Self::Status,
            "date" => Self::Date,
            "number" => Self::Number,
            "rich_text" => Self::Text,
            "relation" => Self::Relation,
            other => Self::Other(other.to_string()),
        }
    }

    /// Remote kind tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::Select => "select",
            Self::Status => "status",
            Self::Date => "date",
            Self::Number => "number",
            Self::Text => "rich_text",
            Self::Relation => "relation",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Declared definition of a single property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyDefinition {
    Title,
    /// Single select with ordered option labels.
    Select { options: Vec<String> },
    Status,
    Date,
    Number { format: NumberFormat },
    Text,
    /// Single-property relation to another store.
    Relation { database_id: String },
}

impl PropertyDefinition {
    /// Builds a single select from option labels.
    #[must_use]
    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Select {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a relation targeting the given store.
    #[must_use]
    pub fn relation(database_id: impl Into<String>) -> Self {
        Self::Relation {
            database_id: database_id.into(),
        }
    }

    #[must_use]
    pub fn number(format: NumberFormat) -> Self {
        Self::Number { format }
    }

    /// Kind tag this definition produces.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Title => PropertyKind::Title,
            Self::Select { .. } => PropertyKind::Select,
            Self::Status => PropertyKind::Status,
            Self::Date => PropertyKind::Date,
            Self::Number { .. } => PropertyKind::Number,
            Self::Text => PropertyKind::Text,
            Self::Relation { .. } => PropertyKind::Relation,
        }
    }
}

/// Ordered mapping from property name to definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    properties: IndexMap<String, PropertyDefinition>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property, replacing any previous definition with the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, definition: PropertyDefinition) -> Self {
        self.insert(name, definition);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, definition: PropertyDefinition) {
        self.properties.insert(name.into(), definition);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyDefinition)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Kind view of this schema.
    #[must_use]
    pub fn kinds(&self) -> LiveSchema {
        self.iter()
            .map(|(name, def)| (name.to_string(), def.kind()))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, PropertyDefinition)> for Schema {
    fn from_iter<T: IntoIterator<Item = (S, PropertyDefinition)>>(iter: T) -> Self {
        Self {
            properties: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Property kinds read from a store at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveSchema {
    properties: IndexMap<String, PropertyKind>,
}

impl LiveSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, kind: PropertyKind) -> Self {
        self.properties.insert(name.into(), kind);
        self
    }

    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<&PropertyKind> {
        self.properties.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyKind)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Name of the title property, if the store has one.
    #[must_use]
    pub fn title_property(&self) -> Option<&str> {
        self.iter()
            .find(|(_, kind)| **kind == PropertyKind::Title)
            .map(|(name, _)| name)
    }

    /// Returns `true` when every target property is present with the same kind.
    #[must_use]
    pub fn satisfies(&self, target: &Schema) -> bool {
        diff_schema(self, target).is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, PropertyKind)> for LiveSchema {
    fn from_iter<T: IntoIterator<Item = (S, PropertyKind)>>(iter: T) -> Self {
        Self {
            properties: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Why a target property was included in a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeReason {
    /// The store has no property with this name.
    Missing,
    /// The store has the property with a different kind; it will be replaced.
    KindMismatch { live: PropertyKind },
}

impl fmt::Display for ChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::KindMismatch { live } => write!(f, "kind mismatch (live: {live})"),
        }
    }
}

/// One property to (re)define.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange {
    pub name: String,
    pub definition: PropertyDefinition,
    pub reason: ChangeReason,
}

/// Properties that must be sent to bring a store up to its target schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    pub changes: Vec<PropertyChange>,
    /// Title property the store ends up with once the diff is applied.
    pub title_property: Option<String>,
}

impl SchemaDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// The diff as a batch of property definitions.
    #[must_use]
    pub fn to_schema(&self) -> Schema {
        self.changes
            .iter()
            .map(|c| (c.name.clone(), c.definition.clone()))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.changes.iter().map(|c| c.name.as_str())
    }
}

/// Computes the kind-level diff between a live store and its target schema.
///
/// Changes are returned in target order.
#[must_use]
pub fn diff_schema(live: &LiveSchema, target: &Schema) -> SchemaDiff {
    let live_title = live.title_property();
    let changes = target
        .iter()
        .filter_map(|(name, definition)| {
            if *definition == PropertyDefinition::Title && live_title.is_some() {
                return None;
            }
            let reason = match live.kind_of(name) {
                None => ChangeReason::Missing,
                Some(kind) if *kind != definition.kind() => ChangeReason::KindMismatch {
                    live: kind.clone(),
                },
                Some(_) => return None,
            };
            Some(PropertyChange {
                name: name.to_string(),
                definition: definition.clone(),
                reason,
            })
        })
        .collect();
    let title_property = live_title
        .or_else(|| {
            target
                .iter()
                .find(|(_, definition)| **definition == PropertyDefinition::Title)
                .map(|(name, _)| name)
        })
        .map(str::to_string);
    SchemaDiff {
        changes,
        title_property,
    }
}
