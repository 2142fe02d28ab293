//! Table schema types returned by the catalog
//!
//! Column order is significant: hash columns first, then the remaining
//! (clustering) key columns, then static and regular columns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::Value;

/// Column value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int,
    Bigint,
    Double,
    Text,
    Boolean,
    Timestamp,
    Counter,
}

impl DataType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Bigint => "bigint",
            DataType::Double => "double",
            DataType::Text => "text",
            DataType::Boolean => "boolean",
            DataType::Timestamp => "timestamp",
            DataType::Counter => "counter",
        }
    }

    /// Checks whether a literal can be stored in a column of this type.
    ///
    /// Null is accepted everywhere; integers widen to double, timestamp
    /// and counter. Timestamps also accept text.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (DataType::Int, Value::Int(v)) => i32::try_from(*v).is_ok(),
            (DataType::Bigint | DataType::Counter | DataType::Timestamp, Value::Int(_)) => true,
            (DataType::Double, Value::Int(_) | Value::Float(_)) => true,
            (DataType::Text | DataType::Timestamp, Value::Text(_)) => true,
            (DataType::Boolean, Value::Bool(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Role a column plays in the table's key structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Partition key column
    Hash,
    /// Clustering key column
    Range,
    /// Shared by all rows of a partition
    Static,
    Regular,
}

impl ColumnKind {
    fn rank(&self) -> u8 {
        match self {
            ColumnKind::Hash => 0,
            ColumnKind::Range => 1,
            ColumnKind::Static | ColumnKind::Regular => 2,
        }
    }
}

/// Column definition as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    /// Stable id, survives renames
    pub id: i32,
    pub kind: ColumnKind,
    pub data_type: DataType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, id: i32, kind: ColumnKind, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            id,
            kind,
            data_type,
        }
    }

    pub fn is_hash(&self) -> bool {
        self.kind == ColumnKind::Hash
    }

    pub fn is_primary(&self) -> bool {
        matches!(self.kind, ColumnKind::Hash | ColumnKind::Range)
    }

    pub fn is_static(&self) -> bool {
        self.kind == ColumnKind::Static
    }
}

/// Possibly unqualified table name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableName {
    #[serde(default)]
    pub keyspace: Option<String>,
    pub table: String,
}

impl TableName {
    pub fn new(keyspace: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            keyspace: Some(keyspace.into()),
            table: table.into(),
        }
    }

    pub fn unqualified(table: impl Into<String>) -> Self {
        Self {
            keyspace: None,
            table: table.into(),
        }
    }

    pub fn has_keyspace(&self) -> bool {
        self.keyspace.is_some()
    }

    /// Fills in the keyspace if missing
    pub fn qualified_with(&self, default_keyspace: &str) -> TableName {
        TableName {
            keyspace: Some(
                self.keyspace
                    .clone()
                    .unwrap_or_else(|| default_keyspace.to_string()),
            ),
            table: self.table.clone(),
        }
    }

    pub fn is_in_keyspace(&self, keyspace: &str) -> bool {
        self.keyspace.as_deref() == Some(keyspace)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.keyspace {
            Some(ks) => write!(f, "{}.{}", ks, self.table),
            None => write!(f, "{}", self.table),
        }
    }
}

/// Ordered table schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: TableName,
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new(name: TableName, columns: Vec<ColumnSchema>) -> Self {
        Self { name, columns }
    }

    /// Starts a schema whose column ids are assigned in declaration order
    pub fn builder(name: TableName) -> TableSchemaBuilder {
        TableSchemaBuilder {
            name,
            columns: Vec::new(),
        }
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_key_columns(&self) -> usize {
        self.columns.iter().filter(|c| c.is_primary()).count()
    }

    pub fn num_hash_key_columns(&self) -> usize {
        self.columns.iter().filter(|c| c.is_hash()).count()
    }

    /// Validates column ordering and naming.
    ///
    /// Returns a description of the first problem found.
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.num_hash_key_columns() == 0 {
            return Err(format!("table '{}' has no hash column", self.name));
        }

        let mut last_rank = 0;
        for (idx, column) in self.columns.iter().enumerate() {
            if column.name.is_empty() {
                return Err(format!("column {} has an empty name", idx));
            }
            let rank = column.kind.rank();
            if rank < last_rank {
                return Err(format!(
                    "column '{}' is out of key order (hash, range, then others)",
                    column.name
                ));
            }
            last_rank = rank;
        }
        Ok(())
    }
}

/// Builder for [`TableSchema`]
pub struct TableSchemaBuilder {
    name: TableName,
    columns: Vec<ColumnSchema>,
}

impl TableSchemaBuilder {
    fn push(mut self, name: &str, kind: ColumnKind, data_type: DataType) -> Self {
        let id = self.columns.len() as i32;
        self.columns.push(ColumnSchema::new(name, id, kind, data_type));
        self
    }

    pub fn hash_column(self, name: &str, data_type: DataType) -> Self {
        self.push(name, ColumnKind::Hash, data_type)
    }

    pub fn range_column(self, name: &str, data_type: DataType) -> Self {
        self.push(name, ColumnKind::Range, data_type)
    }

    pub fn static_column(self, name: &str, data_type: DataType) -> Self {
        self.push(name, ColumnKind::Static, data_type)
    }

    pub fn column(self, name: &str, data_type: DataType) -> Self {
        self.push(name, ColumnKind::Regular, data_type)
    }

    pub fn build(self) -> TableSchema {
        TableSchema::new(self.name, self.columns)
    }
}
