//! In-memory table catalog
//!
//! Tables are registered programmatically or loaded from a JSON file holding
//! an array of table schemas.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use super::types::{TableName, TableSchema};
use super::TableCatalog;

/// Catalog construction errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Table '{0}' is already registered")]
    DuplicateTable(String),

    #[error("Table name '{0}' must be keyspace-qualified")]
    UnqualifiedTable(String),

    #[error("Malformed schema for '{table}': {reason}")]
    MalformedSchema { table: String, reason: String },

    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog backed by a hash map keyed on the qualified table name
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    tables: HashMap<TableName, TableSchema>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table. The schema must be keyspace-qualified and
    /// structurally valid.
    pub fn register(&mut self, schema: TableSchema) -> CatalogResult<()> {
        if !schema.name.has_keyspace() {
            return Err(CatalogError::UnqualifiedTable(schema.name.to_string()));
        }

        schema
            .validate_structure()
            .map_err(|reason| CatalogError::MalformedSchema {
                table: schema.name.to_string(),
                reason,
            })?;

        if self.tables.contains_key(&schema.name) {
            return Err(CatalogError::DuplicateTable(schema.name.to_string()));
        }

        self.tables.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Parses a JSON array of table schemas
    pub fn from_json_str(content: &str) -> CatalogResult<Self> {
        let schemas: Vec<TableSchema> = serde_json::from_str(content)?;
        let mut catalog = Self::new();
        for schema in schemas {
            catalog.register(schema)?;
        }
        Ok(catalog)
    }

    /// Loads a JSON catalog file
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableCatalog for MemoryCatalog {
    fn lookup(&self, name: &TableName) -> Option<TableSchema> {
        self.tables.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::DataType;
    use serde_json::json;

    #[test]
    fn test_register_and_lookup() {
        let mut catalog = MemoryCatalog::new();
        let schema = TableSchema::builder(TableName::new("ks", "t"))
            .hash_column("h", DataType::Int)
            .build();
        catalog.register(schema.clone()).unwrap();

        assert_eq!(catalog.lookup(&TableName::new("ks", "t")), Some(schema));
        assert!(catalog.lookup(&TableName::new("ks", "other")).is_none());
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let mut catalog = MemoryCatalog::new();
        let schema = TableSchema::builder(TableName::new("ks", "t"))
            .hash_column("h", DataType::Int)
            .build();
        catalog.register(schema.clone()).unwrap();

        assert!(matches!(
            catalog.register(schema),
            Err(CatalogError::DuplicateTable(_))
        ));
    }

    #[test]
    fn test_unqualified_table_rejected() {
        let mut catalog = MemoryCatalog::new();
        let schema = TableSchema::builder(TableName::unqualified("t"))
            .hash_column("h", DataType::Int)
            .build();

        assert!(matches!(
            catalog.register(schema),
            Err(CatalogError::UnqualifiedTable(_))
        ));
    }

    #[test]
    fn test_from_json() {
        let content = json!([
            {
                "name": { "keyspace": "ks", "table": "t" },
                "columns": [
                    { "name": "h", "id": 10, "kind": "hash", "data_type": "int" },
                    { "name": "c", "id": 11, "kind": "range", "data_type": "text" },
                    { "name": "s", "id": 12, "kind": "static", "data_type": "bigint" }
                ]
            }
        ])
        .to_string();

        let catalog = MemoryCatalog::from_json_str(&content).unwrap();
        let schema = catalog.lookup(&TableName::new("ks", "t")).unwrap();
        assert_eq!(schema.num_key_columns(), 2);
        assert_eq!(schema.columns[2].id, 12);
    }

    #[test]
    fn test_malformed_json_schema_rejected() {
        let content = json!([
            {
                "name": { "keyspace": "ks", "table": "t" },
                "columns": [
                    { "name": "r", "id": 0, "kind": "regular", "data_type": "int" },
                    { "name": "h", "id": 1, "kind": "hash", "data_type": "int" }
                ]
            }
        ])
        .to_string();

        assert!(matches!(
            MemoryCatalog::from_json_str(&content),
            Err(CatalogError::MalformedSchema { .. })
        ));
    }
}
