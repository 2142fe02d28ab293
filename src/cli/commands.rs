//! CLI command implementations
//!
//! Each command loads configuration first, then the catalog, then does its
//! work. Nothing is cached between invocations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyzer::{
    Assignment, DmlAnalyzer, DmlStatement, ExplainPlan, SemError, StatementKind,
};
use crate::ast::{Expr, Value};
use crate::catalog::{MemoryCatalog, TableName};
use crate::config::AnalyzerConfig;
use crate::observability::{log_event_with_fields, Event, Logger};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_response, write_text};

/// One `SET column = value`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentRequest {
    pub column: String,
    pub value: Expr,
}

/// One bind value applied after analysis
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingRequest {
    pub position: usize,
    pub value: Value,
}

/// Statement as read from JSON
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatementRequest {
    pub kind: StatementKind,
    pub table: TableName,
    #[serde(default, rename = "where")]
    pub where_clause: Option<Expr>,
    #[serde(default, rename = "if")]
    pub if_clause: Option<Expr>,
    #[serde(default)]
    pub ttl: Option<Expr>,
    #[serde(default)]
    pub set: Vec<AssignmentRequest>,
    #[serde(default)]
    pub bindings: Vec<BindingRequest>,
}

impl StatementRequest {
    pub fn from_json_str(content: &str) -> CliResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Builds the statement; bindings are applied separately after analysis
    pub fn to_statement(&self) -> DmlStatement {
        let mut stmt = DmlStatement::new(self.kind, self.table.clone());
        if let Some(expr) = &self.where_clause {
            stmt = stmt.with_where(expr.clone());
        }
        if let Some(expr) = &self.if_clause {
            stmt = stmt.with_if(expr.clone());
        }
        if let Some(expr) = &self.ttl {
            stmt = stmt.with_ttl(expr.clone());
        }
        for set in &self.set {
            stmt = stmt.with_assignment(
                Assignment::new(set.column.clone(), set.value.clone()).at(set.value.loc()),
            );
        }
        stmt
    }
}

/// Explain output: the plan plus the execution-time TTL when resolvable
#[derive(Debug, Clone, Serialize)]
pub struct ExplainReport {
    #[serde(flatten)]
    pub plan: ExplainPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<i64>,
}

impl ExplainReport {
    fn rejected(stmt: &DmlStatement, err: &SemError) -> Self {
        Self {
            plan: ExplainPlan::from_error(stmt, err),
            ttl_seconds: None,
        }
    }
}

/// Parse arguments and run the selected command.
///
/// Stdout is reserved for the response, so log lines go to stderr.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    Logger::set_stderr_only(true);
    run_command(cli.command)
}

/// Run a CLI command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Explain {
            catalog,
            statement,
            config,
            keyspace,
            text,
        } => explain(&catalog, statement.as_deref(), config.as_deref(), &keyspace, text),
        Command::Check { catalog, config } => check(&catalog, config.as_deref()),
    }
}

/// Load configuration, or defaults when no path is given, and apply the
/// configured log level.
pub fn load_config(path: Option<&Path>) -> CliResult<AnalyzerConfig> {
    let config = match path {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };

    if let Some(severity) = config.log_severity() {
        Logger::set_min_severity(severity);
    }

    let source = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<defaults>".to_string());
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("log_level", config.log_level.as_str()),
            ("source", source.as_str()),
        ],
    );
    Ok(config)
}

/// Load a catalog file
pub fn load_catalog(path: &Path) -> CliResult<MemoryCatalog> {
    let catalog = MemoryCatalog::load(path)?;

    let source = path.display().to_string();
    let tables = catalog.len().to_string();
    log_event_with_fields(
        Event::CatalogLoaded,
        &[("source", source.as_str()), ("tables", tables.as_str())],
    );
    Ok(catalog)
}

/// Analyze a statement request and build its report.
///
/// Rejections are part of the report, not errors.
pub fn explain_request(
    catalog: &MemoryCatalog,
    keyspace: &str,
    config: &AnalyzerConfig,
    request: &StatementRequest,
) -> ExplainReport {
    let mut stmt = request.to_statement();
    let analyzer = DmlAnalyzer::new(catalog, keyspace, config);

    if let Err(err) = analyzer.analyze(&mut stmt) {
        return ExplainReport::rejected(&stmt, &err);
    }

    for binding in &request.bindings {
        if let Err(err) = stmt.bind(binding.position, binding.value.clone()) {
            return ExplainReport::rejected(&stmt, &err);
        }
    }

    let mut ttl_seconds = None;
    if stmt.ttl_expr().is_some() && stmt.is_fully_bound(stmt.bindings()) {
        match stmt.ttl_seconds(config) {
            Ok(ttl) => ttl_seconds = ttl,
            Err(err) => return ExplainReport::rejected(&stmt, &err),
        }
    }

    ExplainReport {
        plan: ExplainPlan::from_statement(&stmt),
        ttl_seconds,
    }
}

/// Explain one statement
pub fn explain(
    catalog_path: &Path,
    statement_path: Option<&Path>,
    config_path: Option<&Path>,
    keyspace: &str,
    text: bool,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(catalog_path)?;
    let request = StatementRequest::from_json_str(&read_request(statement_path)?)?;

    let report = explain_request(&catalog, keyspace, &config, &request);

    if text {
        write_text(&report.plan.to_string())?;
    } else {
        let status = if report.plan.accepted { "ok" } else { "rejected" };
        write_response(status, &report)?;
    }

    match &report.plan.rejection_code {
        Some(code) => Err(CliError::Rejected { code: code.clone() }),
        None => Ok(()),
    }
}

/// Validate a catalog and configuration
pub fn check(catalog_path: &Path, config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let catalog = load_catalog(catalog_path)?;

    write_response(
        "ok",
        &serde_json::json!({
            "tables": catalog.len(),
            "config": config,
        }),
    )
}
