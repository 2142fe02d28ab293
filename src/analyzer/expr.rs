//! Expression sub-analyzer
//!
//! Binds identifiers through the statement's symbol table, checks literal
//! types against column types and collects bind-variable placeholders.
//! WHERE analysis passes a [`WhereExprState`] down so each comparison leaf
//! can report its classification.

use crate::ast::{Expr, Location, Value};
use crate::catalog::{ColumnCatalog, ColumnDescriptor, DataType, SymbolTable};

use super::column_op::ComparisonKind;
use super::errors::{SemError, SemResult};
use super::where_clause::WhereExprState;

/// Placeholder found during analysis, with the type it must be bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindVariable {
    pub position: usize,
    pub name: Option<String>,
    pub expected_type: DataType,
    pub loc: Location,
}

/// Analysis context for one statement
pub struct SemContext<'a> {
    catalog: &'a ColumnCatalog,
    symbols: &'a SymbolTable,
    bind_variables: Vec<BindVariable>,
}

impl<'a> SemContext<'a> {
    pub fn new(catalog: &'a ColumnCatalog, symbols: &'a SymbolTable) -> Self {
        Self {
            catalog,
            symbols,
            bind_variables: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &'a ColumnCatalog {
        self.catalog
    }

    /// Binds a column name to its descriptor
    pub fn resolve_column(&self, name: &str, loc: Location) -> SemResult<&'a ColumnDescriptor> {
        self.symbols.resolve(self.catalog, name, loc)
    }

    /// Analyzes a boolean condition.
    ///
    /// With a WHERE state only AND conjunctions of `column <op> value`
    /// comparisons are accepted and every comparison is classified. Without
    /// one (IF clauses) OR and NOT are allowed as well.
    pub fn analyze_condition(
        &mut self,
        expr: &Expr,
        mut where_state: Option<&mut WhereExprState<'_>>,
    ) -> SemResult<()> {
        match expr {
            Expr::And { left, right, .. } => {
                self.analyze_condition(left, where_state.as_deref_mut())?;
                self.analyze_condition(right, where_state)
            }
            Expr::Or { loc, .. } | Expr::Not { loc, .. } if where_state.is_some() => {
                Err(SemError::unsupported_expression(
                    *loc,
                    "Only AND conjunctions are supported in WHERE clause",
                ))
            }
            Expr::Or { left, right, .. } => {
                self.analyze_condition(left, None)?;
                self.analyze_condition(right, None)
            }
            Expr::Not { operand, .. } => self.analyze_condition(operand, None),
            Expr::Compare {
                op,
                left,
                right,
                loc,
            } => {
                let column = match left.as_ref() {
                    Expr::Column { name, loc } => self.resolve_column(name, *loc)?,
                    other => {
                        return Err(SemError::unsupported_expression(
                            other.loc(),
                            "Left side of a comparison must be a column",
                        ))
                    }
                };
                if where_state.is_some() && ComparisonKind::from_op(*op).is_none() {
                    return Err(SemError::unsupported_operator(*loc, op.symbol()));
                }
                self.analyze_value(right, column.value_type())?;

                match where_state {
                    Some(state) => state.analyze_column_op(*loc, *op, column, right),
                    None => Ok(()),
                }
            }
            Expr::Literal {
                value: Value::Bool(_),
                ..
            } if where_state.is_none() => Ok(()),
            other if where_state.is_some() => Err(SemError::unsupported_expression(
                other.loc(),
                "WHERE clause must be a conjunction of column comparisons",
            )),
            other => Err(SemError::datatype_mismatch(
                other.loc(),
                "boolean expression",
                describe(other),
            )),
        }
    }

    /// Analyzes a value expression assigned to or compared with a column of
    /// type `expected`.
    pub fn analyze_value(&mut self, expr: &Expr, expected: DataType) -> SemResult<()> {
        match expr {
            Expr::Literal { value, loc } => {
                if expected.accepts(value) {
                    Ok(())
                } else {
                    Err(SemError::datatype_mismatch(*loc, expected, value.type_name()))
                }
            }
            Expr::BindVar {
                position,
                name,
                loc,
            } => {
                self.bind_variables.push(BindVariable {
                    position: *position,
                    name: name.clone(),
                    expected_type: expected,
                    loc: *loc,
                });
                Ok(())
            }
            other => Err(SemError::unsupported_expression(
                other.loc(),
                format!("Expected a literal or bind marker, found {}", describe(other)),
            )),
        }
    }

    /// Placeholders in the order they were encountered
    pub fn into_bind_variables(self) -> Vec<BindVariable> {
        self.bind_variables
    }
}

fn describe(expr: &Expr) -> &'static str {
    match expr {
        Expr::Literal { value, .. } => value.type_name(),
        Expr::Column { .. } => "column reference",
        Expr::BindVar { .. } => "bind marker",
        Expr::Compare { .. } => "comparison",
        Expr::And { .. } | Expr::Or { .. } | Expr::Not { .. } => "logical expression",
    }
}
