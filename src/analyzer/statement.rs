//! Analyzed DML statement
//!
//! A statement is built once per statement text, analyzed once by
//! [`DmlAnalyzer`](super::DmlAnalyzer), then executed any number of times
//! with fresh bind values. Only the [`ParamBindings`] buffer and the derived
//! write arguments change after analysis.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::ast::{Expr, Location, Value};
use crate::catalog::{ColumnCatalog, SymbolTable, TableName};
use crate::config::AnalyzerConfig;
use crate::observability::{log_event_with_fields, Event};

use super::column_op::ColumnOp;
use super::errors::{SemError, SemResult};
use super::expr::BindVariable;
use super::ttl::validate_ttl;
use super::write_target::{Assignment, ColumnArg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Select,
    Update,
    Delete,
}

impl StatementKind {
    pub fn is_write(&self) -> bool {
        matches!(self, StatementKind::Update | StatementKind::Delete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

/// Values bound to a statement's placeholders for one execution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamBindings {
    values: BTreeMap<usize, Value>,
}

impl ParamBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(&position)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn set(&mut self, position: usize, value: Value) {
        self.values.insert(position, value);
    }
}

/// Everything analysis derives, committed to the statement in one step
#[derive(Debug, Clone)]
pub(crate) struct StatementAnalysis {
    pub(crate) table: TableName,
    pub(crate) is_system: bool,
    pub(crate) catalog: ColumnCatalog,
    pub(crate) symbols: SymbolTable,
    pub(crate) key_slots: Vec<Option<ColumnOp>>,
    pub(crate) filter_ops: VecDeque<ColumnOp>,
    pub(crate) write_column_args: Vec<Option<ColumnArg>>,
    pub(crate) static_only: bool,
    pub(crate) bind_variables: Vec<BindVariable>,
}

/// SELECT, UPDATE or DELETE statement
#[derive(Debug, Clone)]
pub struct DmlStatement {
    kind: StatementKind,
    loc: Location,
    table_name: TableName,
    table_loc: Location,
    where_clause: Option<Expr>,
    if_clause: Option<Expr>,
    ttl_seconds: Option<Expr>,
    assignments: Vec<Assignment>,

    // Fixed by analysis
    qualified_table: Option<TableName>,
    is_system: bool,
    catalog: Option<ColumnCatalog>,
    symbols: SymbolTable,
    key_slots: Vec<Option<ColumnOp>>,
    filter_ops: VecDeque<ColumnOp>,
    static_only: bool,
    bind_variables: Vec<BindVariable>,

    // Cleared by reset()
    write_column_args: Vec<Option<ColumnArg>>,
    bindings: ParamBindings,
}

impl DmlStatement {
    pub fn new(kind: StatementKind, table_name: TableName) -> Self {
        Self {
            kind,
            loc: Location::default(),
            table_name,
            table_loc: Location::default(),
            where_clause: None,
            if_clause: None,
            ttl_seconds: None,
            assignments: Vec::new(),
            qualified_table: None,
            is_system: false,
            catalog: None,
            symbols: SymbolTable::new(),
            key_slots: Vec::new(),
            filter_ops: VecDeque::new(),
            static_only: false,
            bind_variables: Vec::new(),
            write_column_args: Vec::new(),
            bindings: ParamBindings::new(),
        }
    }

    pub fn select(table_name: TableName) -> Self {
        Self::new(StatementKind::Select, table_name)
    }

    pub fn update(table_name: TableName) -> Self {
        Self::new(StatementKind::Update, table_name)
    }

    pub fn delete(table_name: TableName) -> Self {
        Self::new(StatementKind::Delete, table_name)
    }

    pub fn with_where(mut self, expr: Expr) -> Self {
        self.where_clause = Some(expr);
        self
    }

    pub fn with_if(mut self, expr: Expr) -> Self {
        self.if_clause = Some(expr);
        self
    }

    /// `USING TTL <expr>`
    pub fn with_ttl(mut self, expr: Expr) -> Self {
        self.ttl_seconds = Some(expr);
        self
    }

    pub fn with_assignment(mut self, assignment: Assignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    /// `SET column = value`
    pub fn set(self, column: impl Into<String>, value: Expr) -> Self {
        self.with_assignment(Assignment::new(column, value))
    }

    pub fn at(mut self, loc: Location) -> Self {
        self.loc = loc;
        self
    }

    pub fn table_at(mut self, loc: Location) -> Self {
        self.table_loc = loc;
        self
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn is_write_only(&self) -> bool {
        self.kind.is_write()
    }

    pub fn loc(&self) -> Location {
        self.loc
    }

    pub fn table_loc(&self) -> Location {
        self.table_loc
    }

    /// Table name as written in the statement
    pub fn table_name(&self) -> &TableName {
        &self.table_name
    }

    pub fn where_clause(&self) -> Option<&Expr> {
        self.where_clause.as_ref()
    }

    pub fn if_clause(&self) -> Option<&Expr> {
        self.if_clause.as_ref()
    }

    pub fn ttl_expr(&self) -> Option<&Expr> {
        self.ttl_seconds.as_ref()
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub(crate) fn commit(&mut self, analysis: StatementAnalysis) {
        self.qualified_table = Some(analysis.table);
        self.is_system = analysis.is_system;
        self.catalog = Some(analysis.catalog);
        self.symbols = analysis.symbols;
        self.key_slots = analysis.key_slots;
        self.filter_ops = analysis.filter_ops;
        self.write_column_args = analysis.write_column_args;
        self.static_only = analysis.static_only;
        self.bind_variables = analysis.bind_variables;
        self.bindings = ParamBindings::new();
    }

    pub fn is_analyzed(&self) -> bool {
        self.catalog.is_some()
    }

    /// Fully qualified table name, once analyzed
    pub fn qualified_table(&self) -> Option<&TableName> {
        self.qualified_table.as_ref()
    }

    /// True if the table lives in the system keyspace
    pub fn is_system(&self) -> bool {
        self.is_system
    }

    pub fn catalog(&self) -> Option<&ColumnCatalog> {
        self.catalog.as_ref()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Equality conditions usable for key lookup, one per key position
    pub fn key_slots(&self) -> &[Option<ColumnOp>] {
        &self.key_slots
    }

    /// Residual predicates evaluated during the scan
    pub fn filter_ops(&self) -> &VecDeque<ColumnOp> {
        &self.filter_ops
    }

    /// Per-column assigned values; empty before analysis and after reset
    pub fn write_column_args(&self) -> &[Option<ColumnArg>] {
        &self.write_column_args
    }

    /// True if the write touches static columns only
    pub fn static_column_args_only(&self) -> bool {
        self.static_only
    }

    pub fn bind_variables(&self) -> &[BindVariable] {
        &self.bind_variables
    }

    pub fn bindings(&self) -> &ParamBindings {
        &self.bindings
    }

    /// Checks that `value` may be bound at `position` without storing it.
    pub fn check_binding(&self, position: usize, value: &Value) -> SemResult<()> {
        let mut found = false;
        for var in self.bind_variables.iter().filter(|v| v.position == position) {
            found = true;
            if !var.expected_type.accepts(value) {
                return Err(SemError::datatype_mismatch(
                    var.loc,
                    var.expected_type,
                    value.type_name(),
                ));
            }
        }
        if !found {
            return Err(SemError::invalid_arguments(
                self.loc,
                format!("No bind marker at position {}", position),
            ));
        }
        Ok(())
    }

    /// Binds `value` into the statement's own buffer
    pub fn bind(&mut self, position: usize, value: Value) -> SemResult<()> {
        self.check_binding(position, &value)?;
        self.bindings.set(position, value);
        Ok(())
    }

    /// Binds into a caller-owned buffer, for executions that must not share
    /// the statement's buffer.
    pub fn bind_into(
        &self,
        bindings: &mut ParamBindings,
        position: usize,
        value: Value,
    ) -> SemResult<()> {
        self.check_binding(position, &value)?;
        bindings.set(position, value);
        Ok(())
    }

    /// True when every placeholder has a value in `bindings`
    pub fn is_fully_bound(&self, bindings: &ParamBindings) -> bool {
        self.bind_variables
            .iter()
            .all(|v| bindings.get(v.position).is_some())
    }

    /// Clears bind values and derived write arguments. The analysis itself
    /// (catalog, key slots, filters) is kept.
    pub fn reset(&mut self) {
        self.bindings = ParamBindings::new();
        self.write_column_args = Vec::new();

        let table = self.table_name.to_string();
        log_event_with_fields(Event::StatementReset, &[("table", table.as_str())]);
    }

    /// Resolves the TTL for execution using the statement's own bindings
    pub fn ttl_seconds(&self, config: &AnalyzerConfig) -> SemResult<Option<i64>> {
        self.ttl_seconds_with(&self.bindings, config)
    }

    /// Resolves the TTL against `bindings`, range-checking bound values
    pub fn ttl_seconds_with(
        &self,
        bindings: &ParamBindings,
        config: &AnalyzerConfig,
    ) -> SemResult<Option<i64>> {
        let Some(expr) = &self.ttl_seconds else {
            return Ok(None);
        };

        let (value, loc) = match expr {
            Expr::Literal { value, loc } => (Some(value), *loc),
            Expr::BindVar { position, loc, .. } => (bindings.get(*position), *loc),
            other => {
                return Err(SemError::unsupported_expression(
                    other.loc(),
                    "TTL must be a literal or bind marker",
                ))
            }
        };

        match value {
            Some(Value::Int(seconds)) => {
                validate_ttl(*seconds, config, loc)?;
                Ok(Some(*seconds))
            }
            Some(_) => Err(SemError::invalid_ttl(
                loc,
                config.min_ttl_seconds,
                config.max_ttl_seconds,
            )),
            None => Err(SemError::invalid_arguments(loc, "TTL bind marker is not bound")),
        }
    }
}
