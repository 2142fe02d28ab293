//! Write-target classification
//!
//! A write that only touches static columns does not address a clustering
//! row, so its WHERE clause may omit the clustering key entirely.

use crate::ast::{Expr, Location};
use crate::catalog::{ColumnCatalog, ColumnDescriptor};

use super::errors::{SemError, SemResult};
use super::expr::SemContext;

/// Value assigned to one column by a write statement
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnArg {
    column: ColumnDescriptor,
    value: Expr,
}

impl ColumnArg {
    pub fn new(column: ColumnDescriptor, value: Expr) -> Self {
        Self { column, value }
    }

    pub fn column(&self) -> &ColumnDescriptor {
        &self.column
    }

    pub fn value(&self) -> &Expr {
        &self.value
    }
}

/// `SET column = value` as handed over by the parser
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
    pub loc: Location,
}

impl Assignment {
    pub fn new(column: impl Into<String>, value: Expr) -> Self {
        Self {
            column: column.into(),
            value,
            loc: Location::default(),
        }
    }

    pub fn at(mut self, loc: Location) -> Self {
        self.loc = loc;
        self
    }
}

/// Resolves assignments into one optional arg per catalog column.
///
/// Key columns cannot be assigned; a column may be assigned once.
pub fn analyze_assignments(
    ctx: &mut SemContext<'_>,
    assignments: &[Assignment],
) -> SemResult<Vec<Option<ColumnArg>>> {
    let catalog = ctx.catalog();
    let mut args: Vec<Option<ColumnArg>> = vec![None; catalog.len()];

    for assignment in assignments {
        let column = ctx.resolve_column(&assignment.column, assignment.loc)?;
        if column.is_primary() {
            return Err(SemError::invalid_arguments(
                assignment.loc,
                format!(
                    "Primary key column '{}' cannot be updated",
                    column.name()
                ),
            ));
        }
        ctx.analyze_value(&assignment.value, column.value_type())?;

        let slot = &mut args[column.index()];
        if slot.is_some() {
            return Err(SemError::duplicate_column(assignment.loc, column.name()));
        }
        *slot = Some(ColumnArg::new(column.clone(), assignment.value.clone()));
    }
    Ok(args)
}

/// True iff at least one column is written, no clustering column is
/// written, and every written non-key column is static.
pub fn static_column_args_only(catalog: &ColumnCatalog, args: &[Option<ColumnArg>]) -> bool {
    let num_hash = catalog.num_hash_columns();
    let num_key = catalog.num_key_columns();

    let writes_range = args
        .iter()
        .take(num_key)
        .skip(num_hash)
        .any(Option::is_some);

    let mut writes_static = false;
    let mut writes_non_static = false;
    for arg in args.iter().skip(num_key).flatten() {
        if arg.column().is_static() {
            writes_static = true;
        } else {
            writes_non_static = true;
        }
    }

    writes_static && !writes_range && !writes_non_static
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SemErrorCode;
    use crate::catalog::{DataType, SymbolTable, TableName, TableSchema};

    fn catalog() -> ColumnCatalog {
        let schema = TableSchema::builder(TableName::new("ks", "t"))
            .hash_column("h", DataType::Int)
            .range_column("c", DataType::Int)
            .static_column("s", DataType::Int)
            .static_column("s2", DataType::Text)
            .column("r", DataType::Int)
            .build();
        ColumnCatalog::from_schema(&schema)
    }

    fn args_for(catalog: &ColumnCatalog, columns: &[usize]) -> Vec<Option<ColumnArg>> {
        let mut args = vec![None; catalog.len()];
        for &idx in columns {
            let desc = catalog.column(idx).unwrap().clone();
            args[idx] = Some(ColumnArg::new(desc, Expr::lit(1)));
        }
        args
    }

    #[test]
    fn test_static_only() {
        let catalog = catalog();
        assert!(static_column_args_only(&catalog, &args_for(&catalog, &[2])));
        assert!(static_column_args_only(&catalog, &args_for(&catalog, &[2, 3])));
    }

    #[test]
    fn test_not_static_only() {
        let catalog = catalog();
        // Nothing written
        assert!(!static_column_args_only(&catalog, &args_for(&catalog, &[])));
        assert!(!static_column_args_only(&catalog, &[]));
        // Regular column mixed in
        assert!(!static_column_args_only(&catalog, &args_for(&catalog, &[2, 4])));
        // Clustering column written
        assert!(!static_column_args_only(&catalog, &args_for(&catalog, &[1, 2])));
    }

    #[test]
    fn test_analyze_assignments() {
        let catalog = catalog();
        let symbols = SymbolTable::for_catalog(&catalog, Location::default()).unwrap();
        let mut ctx = SemContext::new(&catalog, &symbols);

        let args = analyze_assignments(
            &mut ctx,
            &[Assignment::new("s2", Expr::lit("x")), Assignment::new("r", Expr::bind(0))],
        )
        .unwrap();

        assert_eq!(args.len(), 5);
        assert!(args[3].is_some());
        assert!(args[4].is_some());
        assert!(args[..3].iter().all(Option::is_none));
        assert_eq!(ctx.into_bind_variables().len(), 1);
    }

    #[test]
    fn test_assignment_errors() {
        let catalog = catalog();
        let symbols = SymbolTable::for_catalog(&catalog, Location::default()).unwrap();

        let mut ctx = SemContext::new(&catalog, &symbols);
        let err = analyze_assignments(&mut ctx, &[Assignment::new("c", Expr::lit(1))]).unwrap_err();
        assert_eq!(err.code(), SemErrorCode::InvalidArguments);

        let mut ctx = SemContext::new(&catalog, &symbols);
        let err = analyze_assignments(
            &mut ctx,
            &[Assignment::new("r", Expr::lit(1)), Assignment::new("r", Expr::lit(2))],
        )
        .unwrap_err();
        assert_eq!(err.code(), SemErrorCode::DuplicateColumn);

        let mut ctx = SemContext::new(&catalog, &symbols);
        let err = analyze_assignments(&mut ctx, &[Assignment::new("s2", Expr::lit(2))]).unwrap_err();
        assert_eq!(err.code(), SemErrorCode::DatatypeMismatch);
    }
}
