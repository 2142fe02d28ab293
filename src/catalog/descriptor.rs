//! Column descriptors built once per statement from the table schema

use serde::Serialize;

use super::types::{DataType, TableSchema};

/// How a column participates in a WHERE clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Hash,
    Clustering,
    Static,
    Regular,
}

/// Immutable description of one table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    index: usize,
    stable_id: i32,
    name: String,
    is_hash: bool,
    is_primary: bool,
    is_static: bool,
    value_type: DataType,
}

impl ColumnDescriptor {
    pub fn new(
        index: usize,
        stable_id: i32,
        name: impl Into<String>,
        is_hash: bool,
        is_primary: bool,
        is_static: bool,
        value_type: DataType,
    ) -> Self {
        debug_assert!(!is_hash || is_primary);
        Self {
            index,
            stable_id,
            name: name.into(),
            is_hash,
            is_primary,
            is_static,
            value_type,
        }
    }

    /// Position in the catalog
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn stable_id(&self) -> i32 {
        self.stable_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_hash(&self) -> bool {
        self.is_hash
    }

    /// Hash or clustering column
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn value_type(&self) -> DataType {
        self.value_type
    }

    pub fn role(&self) -> ColumnRole {
        if self.is_hash {
            ColumnRole::Hash
        } else if self.is_primary {
            ColumnRole::Clustering
        } else if self.is_static {
            ColumnRole::Static
        } else {
            ColumnRole::Regular
        }
    }
}

/// Ordered column descriptors of one table: `[hash][clustering][others]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCatalog {
    columns: Vec<ColumnDescriptor>,
    num_key_columns: usize,
    num_hash_columns: usize,
}

impl ColumnCatalog {
    /// Builds descriptors in schema order. Key flags are positional:
    /// the first `num_hash_key_columns` columns are hash columns and the
    /// first `num_key_columns` are primary.
    pub fn from_schema(schema: &TableSchema) -> Self {
        let num_key_columns = schema.num_key_columns();
        let num_hash_columns = schema.num_hash_key_columns();

        let columns = schema
            .columns
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                ColumnDescriptor::new(
                    idx,
                    col.id,
                    col.name.clone(),
                    idx < num_hash_columns,
                    idx < num_key_columns,
                    col.is_static(),
                    col.data_type,
                )
            })
            .collect();

        Self {
            columns,
            num_key_columns,
            num_hash_columns,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn num_key_columns(&self) -> usize {
        self.num_key_columns
    }

    pub fn num_hash_columns(&self) -> usize {
        self.num_hash_columns
    }

    /// Number of clustering columns
    pub fn num_range_columns(&self) -> usize {
        self.num_key_columns - self.num_hash_columns
    }

    pub fn hash_columns(&self) -> &[ColumnDescriptor] {
        &self.columns[..self.num_hash_columns]
    }

    pub fn range_columns(&self) -> &[ColumnDescriptor] {
        &self.columns[self.num_hash_columns..self.num_key_columns]
    }
}
