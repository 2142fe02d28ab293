//! Table catalog access for semantic analysis
//!
//! The catalog service itself lives outside this crate. The analyzer sees
//! it through [`TableCatalog`] and calls it once per statement; the result
//! is turned into a statement-owned [`ColumnCatalog`] and [`SymbolTable`].

mod descriptor;
mod memory;
mod symbols;
mod types;

pub use descriptor::{ColumnCatalog, ColumnDescriptor, ColumnRole};
pub use memory::{CatalogError, CatalogResult, MemoryCatalog};
pub use symbols::SymbolTable;
pub use types::{ColumnKind, ColumnSchema, DataType, TableName, TableSchema, TableSchemaBuilder};

/// Read-only schema lookup by qualified table name
pub trait TableCatalog {
    /// Returns the schema of the table, or `None` if it does not exist
    fn lookup(&self, name: &TableName) -> Option<TableSchema>;
}

impl<T: TableCatalog + ?Sized> TableCatalog for &T {
    fn lookup(&self, name: &TableName) -> Option<TableSchema> {
        (**self).lookup(name)
    }
}

/// Supplies the keyspace used to qualify unqualified table names
pub trait KeyspaceResolver {
    fn current_keyspace(&self) -> &str;
}

impl KeyspaceResolver for str {
    fn current_keyspace(&self) -> &str {
        self
    }
}

impl KeyspaceResolver for String {
    fn current_keyspace(&self) -> &str {
        self
    }
}
