//! DML statement analyzer
//!
//! Analysis order is fixed:
//! 1. Resolve the table and build the column catalog
//! 2. Analyze SET assignments and classify the write target
//! 3. Analyze WHERE
//! 4. Analyze IF
//! 5. Analyze USING TTL
//!
//! Results are committed to the statement only when every step succeeds.

use crate::catalog::{
    ColumnCatalog, KeyspaceResolver, SymbolTable, TableCatalog, TableName,
};
use crate::config::AnalyzerConfig;
use crate::observability::{log_event_with_fields, Event};

use super::errors::{SemError, SemResult};
use super::expr::SemContext;
use super::statement::{DmlStatement, StatementAnalysis, StatementKind};
use super::ttl::analyze_using_clause;
use super::where_clause::WhereClauseAnalyzer;
use super::write_target::{analyze_assignments, static_column_args_only};

/// Table metadata fetched once per statement
#[derive(Debug)]
struct ResolvedTable {
    name: TableName,
    is_system: bool,
    catalog: ColumnCatalog,
    symbols: SymbolTable,
}

/// Analyzes DML statements against a table catalog
pub struct DmlAnalyzer<'a, C: TableCatalog + ?Sized, K: KeyspaceResolver + ?Sized> {
    catalog: &'a C,
    keyspace: &'a K,
    config: &'a AnalyzerConfig,
}

impl<'a, C, K> DmlAnalyzer<'a, C, K>
where
    C: TableCatalog + ?Sized,
    K: KeyspaceResolver + ?Sized,
{
    pub fn new(
        catalog: &'a C,
        keyspace: &'a K,
        config: &'a AnalyzerConfig,
    ) -> Self {
        Self {
            catalog,
            keyspace,
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        self.config
    }

    /// Analyzes `stmt` in place.
    ///
    /// On error the statement keeps whatever analysis it had before the call.
    pub fn analyze(&self, stmt: &mut DmlStatement) -> SemResult<()> {
        let table = stmt.table_name().to_string();
        log_event_with_fields(
            Event::AnalysisStart,
            &[("kind", stmt.kind().as_str()), ("table", table.as_str())],
        );

        match self.run(stmt) {
            Ok(analysis) => {
                let key_slots = analysis.key_slots.len().to_string();
                let filters = analysis.filter_ops.len().to_string();
                stmt.commit(analysis);
                log_event_with_fields(
                    Event::AnalysisComplete,
                    &[
                        ("filter_ops", filters.as_str()),
                        ("key_slots", key_slots.as_str()),
                        ("table", table.as_str()),
                    ],
                );
                Ok(())
            }
            Err(err) => {
                let location = err.location().to_string();
                log_event_with_fields(
                    Event::AnalysisRejected,
                    &[
                        ("code", err.code().code()),
                        ("location", location.as_str()),
                        ("reason", err.message()),
                        ("table", table.as_str()),
                    ],
                );
                Err(err)
            }
        }
    }

    fn run(&self, stmt: &DmlStatement) -> SemResult<StatementAnalysis> {
        let table = self.lookup_table(stmt)?;
        let write_only = stmt.is_write_only();

        let mut ctx = SemContext::new(&table.catalog, &table.symbols);

        // The write target decides how much of the key WHERE must supply.
        // Only UPDATE carries assignments; DELETE must name the full key.
        let (write_column_args, static_only) = match stmt.kind() {
            StatementKind::Update => {
                let args = analyze_assignments(&mut ctx, stmt.assignments())?;
                let static_only = static_column_args_only(&table.catalog, &args);
                (args, static_only)
            }
            kind => {
                if let Some(assignment) = stmt.assignments().first() {
                    return Err(SemError::invalid_arguments(
                        assignment.loc,
                        format!("SET is not allowed in {}", kind.as_str()),
                    ));
                }
                (Vec::new(), false)
            }
        };

        let where_analyzer = if write_only {
            WhereClauseAnalyzer::for_write(&table.catalog, static_only)
        } else {
            WhereClauseAnalyzer::for_read(&table.catalog)
        };
        let where_result = where_analyzer.analyze(&mut ctx, stmt.where_clause(), stmt.loc())?;

        let table_str = table.name.to_string();
        let key_slots = where_result.key_slots.len().to_string();
        log_event_with_fields(
            Event::WhereClauseAnalyzed,
            &[
                ("key_slots", key_slots.as_str()),
                ("static_only", if static_only { "true" } else { "false" }),
                ("table", table_str.as_str()),
            ],
        );

        if let Some(expr) = stmt.if_clause() {
            if !write_only {
                return Err(SemError::invalid_arguments(
                    expr.loc(),
                    "IF clause is not allowed in SELECT",
                ));
            }
            ctx.analyze_condition(expr, None)?;
        }

        analyze_using_clause(&mut ctx, stmt.ttl_expr(), self.config)?;

        let bind_variables = ctx.into_bind_variables();
        Ok(StatementAnalysis {
            table: table.name,
            is_system: table.is_system,
            catalog: table.catalog,
            symbols: table.symbols,
            key_slots: where_result.key_slots,
            filter_ops: where_result.filter_ops,
            write_column_args,
            static_only,
            bind_variables,
        })
    }

    fn lookup_table(&self, stmt: &DmlStatement) -> SemResult<ResolvedTable> {
        let name = stmt
            .table_name()
            .qualified_with(self.keyspace.current_keyspace());
        let is_system = name.is_in_keyspace(&self.config.system_keyspace);

        if is_system && stmt.is_write_only() && self.config.system_namespace_readonly {
            return Err(SemError::system_namespace_readonly(stmt.table_loc(), &name));
        }

        let schema = self
            .catalog
            .lookup(&name)
            .ok_or_else(|| SemError::table_not_found(stmt.table_loc(), &name))?;

        let catalog = ColumnCatalog::from_schema(&schema);
        let symbols = SymbolTable::for_catalog(&catalog, stmt.table_loc())?;

        let table = name.to_string();
        let columns = catalog.len().to_string();
        log_event_with_fields(
            Event::TableResolved,
            &[("columns", columns.as_str()), ("table", table.as_str())],
        );

        Ok(ResolvedTable {
            name,
            is_system,
            catalog,
            symbols,
        })
    }
}
