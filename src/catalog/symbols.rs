//! Statement-local symbol table
//!
//! Maps column names to catalog positions so identifiers in the expression
//! tree can be bound to descriptors.

use std::collections::HashMap;

use crate::analyzer::{SemError, SemResult};
use crate::ast::Location;

use super::descriptor::{ColumnCatalog, ColumnDescriptor};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    columns: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a column name. Fails with `DuplicateColumn` when the name
    /// is already mapped.
    pub fn map_symbol(&mut self, name: &str, index: usize, loc: Location) -> SemResult<()> {
        if self.columns.contains_key(name) {
            return Err(SemError::duplicate_column(loc, name));
        }
        self.columns.insert(name.to_string(), index);
        Ok(())
    }

    /// Builds the table for every column of `catalog`
    pub fn for_catalog(catalog: &ColumnCatalog, loc: Location) -> SemResult<Self> {
        let mut symbols = Self::new();
        for desc in catalog.columns() {
            symbols.map_symbol(desc.name(), desc.index(), loc)?;
        }
        Ok(symbols)
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    /// Resolves a name to its descriptor, or `UndefinedColumn`
    pub fn resolve<'c>(
        &self,
        catalog: &'c ColumnCatalog,
        name: &str,
        loc: Location,
    ) -> SemResult<&'c ColumnDescriptor> {
        self.lookup(name)
            .and_then(|idx| catalog.column(idx))
            .ok_or_else(|| SemError::undefined_column(loc, name))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
