//! Schema data model handed over by the editor.
//!
//! The generator only ever reads a [`Schema`]. Decoding accepts both the
//! editor's camelCase snapshot and the snake_case rows returned by the
//! persistence API, so a project fetched from the backend can be fed in as-is.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Schema {
    /// Project name, used in generated headers when present
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tables: Vec<Table>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Table {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// `None` marks a half-built table; it is left out of generated output.
    #[serde(default, deserialize_with = "lenient_columns")]
    pub columns: Option<Vec<Column>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(rename = "isPrimary", alias = "is_primary", default)]
    pub is_primary: bool,
    #[serde(rename = "isUnique", alias = "is_unique", default)]
    pub is_unique: bool,
    #[serde(rename = "isForeign", alias = "is_foreign", default)]
    pub is_foreign: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ColumnType {
    Uuid,
    #[default]
    Varchar,
    Text,
    Integer,
    Decimal,
    Boolean,
    Timestamp,
    Date,
    Json,
    /// Anything the editor sent that is not in the list above
    Other(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum RelationKind {
    OneToOne,
    #[default]
    OneToMany,
    ManyToOne,
    ManyToMany,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub id: String,
    #[serde(alias = "source_id")]
    pub source: String,
    #[serde(alias = "target_id")]
    pub target: String,
    #[serde(rename = "sourceKey", alias = "source_key", default)]
    pub source_key: String,
    #[serde(rename = "targetKey", alias = "target_key", default)]
    pub target_key: String,
    #[serde(rename = "type", default)]
    pub kind: Option<RelationKind>,
    #[serde(default)]
    pub through: Option<String>,
}

impl Schema {
    pub fn new(tables: Vec<Table>, relationships: Vec<Relationship>) -> Self {
        Self {
            name: None,
            tables,
            relationships,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Decode an editor snapshot or a persisted project.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(text)?)
    }

}

// The editor sends half-edited state; a null or broken entry is skipped
// instead of rejecting the whole snapshot.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .filter_map(decode_entry)
        .collect())
}

fn lenient_columns<'de, D>(deserializer: D) -> Result<Option<Vec<Column>>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(entries.map(|entries| entries.into_iter().filter_map(decode_entry).collect()))
}

fn decode_entry<T: DeserializeOwned>(entry: serde_json::Value) -> Option<T> {
    if entry.is_null() {
        debug!(entry = std::any::type_name::<T>(), "skipping null entry");
        return None;
    }
    match serde_json::from_value(entry) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(entry = std::any::type_name::<T>(), error = %e, "skipping undecodable entry");
            None
        }
    }
}

/// Read and decode a schema JSON file.
pub fn load_schema(path: impl AsRef<Path>) -> Result<Schema, SchemaError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Schema::from_json(&text)
}

impl Table {
    pub fn new(id: impl Into<String>, name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            x: 0.0,
            y: 0.0,
            columns: Some(columns),
        }
    }

    /// A table the editor has not finished building (no column list at all).
    pub fn malformed(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            columns: None,
            ..Self::new(id, name, Vec::new())
        }
    }

    pub fn lower_name(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.as_deref()?.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            is_primary: false,
            is_unique: false,
            is_foreign: false,
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn foreign(mut self) -> Self {
        self.is_foreign = true;
        self
    }
}

impl From<String> for ColumnType {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "uuid" => Self::Uuid,
            "varchar" => Self::Varchar,
            "text" => Self::Text,
            "integer" => Self::Integer,
            "decimal" => Self::Decimal,
            "boolean" => Self::Boolean,
            "timestamp" => Self::Timestamp,
            "date" => Self::Date,
            "json" => Self::Json,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for ColumnType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl RelationKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "one-to-one" => Some(Self::OneToOne),
            "one-to-many" => Some(Self::OneToMany),
            "many-to-one" => Some(Self::ManyToOne),
            "many-to-many" => Some(Self::ManyToMany),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToOne => "many-to-one",
            Self::ManyToMany => "many-to-many",
        }
    }
}

// Unknown spellings get the editor's default rather than an error
impl From<String> for RelationKind {
    fn from(s: String) -> Self {
        Self::from_str(&s).unwrap_or_default()
    }
}

impl Relationship {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        source_key: impl Into<String>,
        target_key: impl Into<String>,
        kind: RelationKind,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_key: source_key.into(),
            target_key: target_key.into(),
            kind: Some(kind),
            through: None,
        }
    }

    pub fn through(mut self, name: impl Into<String>) -> Self {
        self.through = Some(name.into());
        self
    }

    pub fn kind(&self) -> RelationKind {
        self.kind.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_editor_snapshot() {
        let json = r#"{
            "tables": [
                {"id": "t1", "name": "User", "x": 10, "y": 20, "columns": [
                    {"name": "id", "type": "uuid", "isPrimary": true},
                    {"name": "email", "type": "varchar", "isUnique": true}
                ]}
            ],
            "relationships": [
                {"id": "r1", "source": "t1", "target": "t2", "sourceKey": "id", "targetKey": "user_id"}
            ]
        }"#;
        let schema = Schema::from_json(json).unwrap();

        assert_eq!(schema.tables.len(), 1);
        let columns = schema.tables[0].columns.as_ref().unwrap();
        assert!(columns[0].is_primary);
        assert_eq!(columns[0].column_type, ColumnType::Uuid);
        assert!(columns[1].is_unique);
        assert!(!columns[1].is_foreign);
        assert_eq!(schema.relationships[0].kind, None);
        assert_eq!(schema.relationships[0].kind(), RelationKind::OneToMany);
    }

    #[test]
    fn test_decode_persisted_project() {
        let json = r#"{
            "id": "p1", "name": "Blog", "description": null, "user_id": "u1",
            "tables": [
                {"id": "t1", "name": "User", "x": 0, "y": 0, "project_id": "p1", "columns": [
                    {"id": "c1", "name": "id", "type": "uuid", "is_primary": true,
                     "is_unique": false, "is_foreign": false, "table_id": "t1"}
                ]}
            ],
            "relationships": [
                {"id": "r1", "source_id": "t1", "target_id": "t2", "source_key": "id",
                 "target_key": "user_id", "through": null, "type": "many-to-many", "project_id": "p1"}
            ]
        }"#;
        let schema = Schema::from_json(json).unwrap();

        assert_eq!(schema.name.as_deref(), Some("Blog"));
        assert!(schema.tables[0].columns.as_ref().unwrap()[0].is_primary);
        let rel = &schema.relationships[0];
        assert_eq!(rel.source, "t1");
        assert_eq!(rel.target_key, "user_id");
        assert_eq!(rel.kind(), RelationKind::ManyToMany);
        assert_eq!(rel.through, None);
    }

    #[test]
    fn test_null_entries_are_skipped() {
        let json = r#"{
            "tables": [
                null,
                {"id": "t1", "name": "User", "columns": [
                    null,
                    {"name": "id", "type": "uuid", "isPrimary": true},
                    {"type": "varchar"}
                ]},
                {"name": "NoId", "columns": []}
            ],
            "relationships": [null, {"source": "t1", "target": "t1"}]
        }"#;
        let schema = Schema::from_json(json).unwrap();

        assert_eq!(schema.tables.len(), 1);
        let columns = schema.tables[0].columns.as_ref().unwrap();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].name, "id");
        assert_eq!(schema.relationships.len(), 1);
    }

    #[test]
    fn test_null_columns_is_malformed() {
        let schema =
            Schema::from_json(r#"{"tables": [{"id": "t1", "name": "Draft", "columns": null}]}"#)
                .unwrap();
        assert_eq!(schema.tables[0].columns, None);
    }

    #[test]
    fn test_missing_columns_is_malformed() {
        let schema = Schema::from_json(r#"{"tables": [{"id": "t1", "name": "Draft"}]}"#).unwrap();
        assert_eq!(schema.tables[0].columns, None);
        assert!(schema.relationships.is_empty());
    }

    #[test]
    fn test_unknown_types_fall_back() {
        assert_eq!(ColumnType::from("money"), ColumnType::Other("money".to_string()));
        assert_eq!(ColumnType::from("UUID"), ColumnType::Uuid);
        assert_eq!(RelationKind::from("sideways".to_string()), RelationKind::OneToMany);
        for kind in [RelationKind::OneToOne, RelationKind::ManyToMany] {
            assert_eq!(RelationKind::from(kind.as_str().to_string()), kind);
        }
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(Schema::from_json("{"), Err(SchemaError::Json(_))));
        assert!(matches!(
            Schema::from_json(r#"{"tables": 3}"#),
            Err(SchemaError::Json(_))
        ));
    }
}
