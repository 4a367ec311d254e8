//! JSON payloads of the Notion API (version 2022-06-28).
//!
//! Request bodies are built with `json!`; responses are decoded into the
//! small structs below, which only carry the fields the engine needs.

use serde::Deserialize;
use serde_json::{Map, Value, json};
use taskhub_core::{
    Block, ChildEntry, DatabaseSpec, Handle, LiveSchema, PageSpec, PropertyDefinition,
    PropertyKind, PropertyValue, ResourceKind, RowSpec, Schema,
};

fn rich_text(content: &str) -> Value {
    json!([{ "type": "text", "text": { "content": content } }])
}

/// Encodes a property definition as used by create/update database.
pub fn definition(definition: &PropertyDefinition) -> Value {
    match definition {
        PropertyDefinition::Title => json!({ "title": {} }),
        PropertyDefinition::Select { options } => {
            let options: Vec<Value> = options.iter().map(|o| json!({ "name": o })).collect();
            json!({ "select": { "options": options } })
        }
        PropertyDefinition::Status => json!({ "status": {} }),
        PropertyDefinition::Date => json!({ "date": {} }),
        PropertyDefinition::Number { format } => json!({ "number": { "format": format.as_str() } }),
        PropertyDefinition::Text => json!({ "rich_text": {} }),
        PropertyDefinition::Relation { database_id } => json!({
            "relation": {
                "database_id": database_id,
                "type": "single_property",
                "single_property": {}
            }
        }),
    }
}

pub fn schema_properties(schema: &Schema) -> Value {
    let properties: Map<String, Value> = schema
        .iter()
        .map(|(name, def)| (name.to_string(), definition(def)))
        .collect();
    Value::Object(properties)
}

/// Encodes a row property value.
pub fn value(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Title(s) => json!({ "title": rich_text(s) }),
        PropertyValue::Select(s) => json!({ "select": { "name": s } }),
        PropertyValue::Status(s) => json!({ "status": { "name": s } }),
        PropertyValue::Date(start) => json!({ "date": { "start": start } }),
        PropertyValue::Number(n) => json!({ "number": n }),
        PropertyValue::Text(s) => json!({ "rich_text": rich_text(s) }),
        PropertyValue::Relation(ids) => {
            let ids: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
            json!({ "relation": ids })
        }
    }
}

pub fn block(block: &Block) -> Value {
    let text_block = |kind: &str, content: &str| {
        let mut object = json!({ "object": "block", "type": kind });
        object[kind] = json!({ "rich_text": rich_text(content) });
        object
    };
    match block {
        Block::Heading2(s) => text_block("heading_2", s),
        Block::Heading3(s) => text_block("heading_3", s),
        Block::Paragraph(s) => text_block("paragraph", s),
        Block::BulletedListItem(s) => text_block("bulleted_list_item", s),
        Block::LinkToDatabase(id) => json!({
            "object": "block",
            "type": "link_to_page",
            "link_to_page": { "type": "database_id", "database_id": id }
        }),
    }
}

pub fn create_page_body(parent: &Handle, spec: &PageSpec) -> Value {
    json!({
        "parent": { "type": "page_id", "page_id": parent.id },
        "properties": { "title": { "title": rich_text(&spec.title) } }
    })
}

pub fn create_database_body(parent: &Handle, spec: &DatabaseSpec) -> Value {
    json!({
        "parent": { "type": "page_id", "page_id": parent.id },
        "title": rich_text(&spec.title),
        "properties": schema_properties(&spec.schema)
    })
}

pub fn update_database_body(properties: &Schema) -> Value {
    json!({ "properties": schema_properties(properties) })
}

pub fn create_row_body(database: &Handle, row: &RowSpec) -> Value {
    let properties: Map<String, Value> = row
        .values
        .iter()
        .map(|(name, v)| (name.clone(), value(v)))
        .collect();
    json!({
        "parent": { "database_id": database.id },
        "properties": properties
    })
}

pub fn query_body(page_size: u32, start_cursor: Option<&str>) -> Value {
    let mut body = json!({ "page_size": page_size });
    if let Some(cursor) = start_cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}

pub fn append_blocks_body(blocks: &[Block]) -> Value {
    let children: Vec<Value> = blocks.iter().map(block).collect();
    json!({ "children": children })
}

// ==================== Responses ====================

/// Any object that carries an id, e.g. a created page or a query result.
#[derive(Debug, Deserialize)]
pub struct ObjectRef {
    pub id: String,
}

/// Paginated list envelope.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
    /// Not sent by Notion today; honoured when present.
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> ListResponse<T> {
    /// Cursor for the next page, only while `has_more` is set.
    pub fn cursor(&self) -> Option<String> {
        self.next_cursor.clone().filter(|_| self.has_more)
    }
}

#[derive(Debug, Deserialize)]
pub struct TitledChild {
    pub title: String,
}

/// A child block as returned by list-children.
#[derive(Debug, Deserialize)]
pub struct BlockObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub child_page: Option<TitledChild>,
    #[serde(default)]
    pub child_database: Option<TitledChild>,
}

impl BlockObject {
    pub fn into_entry(self) -> ChildEntry {
        match (self.kind.as_str(), self.child_page, self.child_database) {
            ("child_page", Some(page), _) => ChildEntry::new(Handle::page(self.id), page.title),
            ("child_database", _, Some(db)) => {
                ChildEntry::new(Handle::database(self.id), db.title)
            }
            _ => ChildEntry::new(Handle::new(self.id, ResourceKind::Block), ""),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PropertyObject {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseObject {
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl DatabaseObject {
    /// Kind view of the live properties. Entries without a `type` are skipped.
    pub fn live_schema(&self) -> LiveSchema {
        self.properties
            .iter()
            .filter_map(|(name, raw)| {
                let property = PropertyObject::deserialize(raw).ok()?;
                Some((name.clone(), PropertyKind::from_tag(&property.kind)))
            })
            .collect()
    }
}

/// Error envelope: `{"object":"error","status":..,"code":..,"message":..}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
