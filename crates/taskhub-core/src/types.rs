//! Resource types exchanged with the remote workspace.
//!
//! Handles are opaque: the engine only ever compares and forwards them.

use std::fmt;

use indexmap::IndexMap;

use crate::schema::{PropertyKind, Schema};

/// Structural kind of a remote resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A page; may act as a scope for child pages and stores.
    Page,
    /// A schema-bearing tabular store.
    Database,
    /// A row inside a store.
    Row,
    /// Any other content block.
    Block,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => write!(f, "page"),
            Self::Database => write!(f, "database"),
            Self::Row => write!(f, "row"),
            Self::Block => write!(f, "block"),
        }
    }
}

/// Opaque reference to a remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle {
    /// Remote identifier.
    pub id: String,
    /// Structural kind.
    pub kind: ResourceKind,
}

impl Handle {
    /// Creates a new handle.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Creates a page handle.
    #[must_use]
    pub fn page(id: impl Into<String>) -> Self {
        Self::new(id, ResourceKind::Page)
    }

    /// Creates a store handle.
    #[must_use]
    pub fn database(id: impl Into<String>) -> Self {
        Self::new(id, ResourceKind::Database)
    }

    /// Creates a row handle.
    #[must_use]
    pub fn row(id: impl Into<String>) -> Self {
        Self::new(id, ResourceKind::Row)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// One entry of a child listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    /// The child resource.
    pub handle: Handle,
    /// Display name; empty for plain content blocks.
    pub title: String,
}

impl ChildEntry {
    /// Creates a new child entry.
    #[must_use]
    pub fn new(handle: Handle, title: impl Into<String>) -> Self {
        Self {
            handle,
            title: title.into(),
        }
    }
}

/// One page of a child listing.
#[derive(Debug, Clone, Default)]
pub struct ChildListing {
    /// Children on this page, in remote order.
    pub entries: Vec<ChildEntry>,
    /// Cursor for the next page, `None` when this is the last page.
    pub next_cursor: Option<String>,
}

/// Parameters for a row query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowQuery {
    /// Maximum number of rows to return.
    pub page_size: u32,
    /// Cursor returned by a previous query.
    pub start_cursor: Option<String>,
}

impl RowQuery {
    /// Creates a query for the first page.
    #[must_use]
    pub fn first(page_size: u32) -> Self {
        Self {
            page_size,
            start_cursor: None,
        }
    }

    /// Continues from the given cursor.
    #[must_use]
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.start_cursor = Some(cursor.into());
        self
    }
}

/// One page of query results.
#[derive(Debug, Clone, Default)]
pub struct RowPage {
    /// Row handles in remote order.
    pub rows: Vec<Handle>,
    /// Total row count, when the remote reports it.
    pub total: Option<u64>,
    /// Cursor for the next page, `None` when this is the last page.
    pub next_cursor: Option<String>,
}

/// Spec for creating a page under a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSpec {
    /// Page title.
    pub title: String,
}

impl PageSpec {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Spec for creating a store under a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSpec {
    /// Store title.
    pub title: String,
    /// Initial property schema.
    pub schema: Schema,
}

impl DatabaseSpec {
    #[must_use]
    pub fn new(title: impl Into<String>, schema: Schema) -> Self {
        Self {
            title: title.into(),
            schema,
        }
    }
}

/// What to create when a resource is absent.
#[derive(Debug, Clone, PartialEq)]
pub enum CreationSpec {
    Page(PageSpec),
    Database(DatabaseSpec),
}

impl CreationSpec {
    /// Structural kind of the resource this spec creates.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Page(_) => ResourceKind::Page,
            Self::Database(_) => ResourceKind::Database,
        }
    }

    /// Display name used to find an existing resource.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Page(spec) => &spec.title,
            Self::Database(spec) => &spec.title,
        }
    }
}

impl From<PageSpec> for CreationSpec {
    fn from(spec: PageSpec) -> Self {
        Self::Page(spec)
    }
}

impl From<DatabaseSpec> for CreationSpec {
    fn from(spec: DatabaseSpec) -> Self {
        Self::Database(spec)
    }
}

/// A value assigned to a row property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Title(String),
    Select(String),
    Status(String),
    /// ISO-8601 start date.
    Date(String),
    Number(f64),
    Text(String),
    /// Ids of referenced rows.
    Relation(Vec<String>),
}

impl PropertyValue {
    /// Kind of property this value can be assigned to.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::Title(_) => PropertyKind::Title,
            Self::Select(_) => PropertyKind::Select,
            Self::Status(_) => PropertyKind::Status,
            Self::Date(_) => PropertyKind::Date,
            Self::Number(_) => PropertyKind::Number,
            Self::Text(_) => PropertyKind::Text,
            Self::Relation(_) => PropertyKind::Relation,
        }
    }
}

/// Spec for creating a row; values keyed by property name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSpec {
    pub values: IndexMap<String, PropertyValue>,
}

impl RowSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Adds a property value when present.
    #[must_use]
    pub fn with_opt(self, name: impl Into<String>, value: Option<PropertyValue>) -> Self {
        match value {
            Some(value) => self.with(name, value),
            None => self,
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    /// Moves the title value under `property`, keeping its position.
    #[must_use]
    pub fn with_title_property(mut self, property: &str) -> Self {
        let Some(index) = self
            .values
            .values()
            .position(|v| matches!(v, PropertyValue::Title(_)))
        else {
            return self;
        };
        if let Some((name, _)) = self.values.get_index(index)
            && name == property
        {
            return self;
        }
        if self.values.contains_key(property) {
            return self;
        }
        if let Some((_, value)) = self.values.shift_remove_index(index) {
            self.values.shift_insert(index, property.to_string(), value);
        }
        self
    }
}

/// Content block appended to a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading2(String),
    Heading3(String),
    Paragraph(String),
    BulletedListItem(String),
    /// Link to a store.
    LinkToDatabase(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PropertyDefinition;

    #[test]
    fn test_row_title_moves_to_live_property() {
        let row = RowSpec::new()
            .with("Name", PropertyValue::Title("Inbox".into()))
            .with("Status", PropertyValue::Status("Done".into()))
            .with_title_property("Project");

        let names: Vec<&str> = row.values.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Project", "Status"]);
        assert_eq!(row.get("Project"), Some(&PropertyValue::Title("Inbox".into())));

        let untouched = RowSpec::new()
            .with("Status", PropertyValue::Status("Done".into()))
            .with_title_property("Project");
        assert!(untouched.get("Project").is_none());
    }

    #[test]
    fn test_creation_spec_key() {
        let page: CreationSpec = PageSpec::new("Hub").into();
        assert_eq!(page.kind(), ResourceKind::Page);
        assert_eq!(page.title(), "Hub");

        let db: CreationSpec =
            DatabaseSpec::new("Store", Schema::new().with("Name", PropertyDefinition::Title))
                .into();
        assert_eq!(db.kind(), ResourceKind::Database);
        assert_eq!(db.title(), "Store");
    }

    #[test]
    fn test_row_spec_optional_values() {
        let row = RowSpec::new()
            .with("Name", PropertyValue::Title("a".into()))
            .with_opt("Due", None)
            .with_opt("Notes", Some(PropertyValue::Text("n".into())));
        assert_eq!(row.values.len(), 2);
        assert!(row.get("Due").is_none());
        assert_eq!(row.get("Notes"), Some(&PropertyValue::Text("n".into())));
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(Handle::database("x1").to_string(), "database/x1");
    }
}
