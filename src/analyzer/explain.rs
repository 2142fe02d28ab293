//! Explain output for analyzed statements
//!
//! Deterministic, serializable summary of how a statement will reach its
//! rows, or why it was rejected.

use std::fmt;

use serde::Serialize;

use super::errors::SemError;
use super::statement::DmlStatement;

/// How the executor reaches the rows a statement touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessPath {
    /// Every key column fixed by equality
    PointLookup,
    /// Partition fixed, clustering columns scanned
    PartitionScan,
    /// Write addressed to a partition's static row
    StaticRowWrite,
    /// Partition not fixed
    FullScan,
}

impl AccessPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessPath::PointLookup => "POINT_LOOKUP",
            AccessPath::PartitionScan => "PARTITION_SCAN",
            AccessPath::StaticRowWrite => "STATIC_ROW_WRITE",
            AccessPath::FullScan => "FULL_SCAN",
        }
    }

    /// Derives the access path of an analyzed statement
    pub fn of(stmt: &DmlStatement) -> Option<Self> {
        let catalog = stmt.catalog()?;
        let num_key = catalog.num_key_columns();
        let slots = stmt.key_slots();

        if stmt.is_write_only() {
            return Some(if slots.len() == num_key {
                AccessPath::PointLookup
            } else {
                AccessPath::StaticRowWrite
            });
        }

        if slots.is_empty() {
            return Some(AccessPath::FullScan);
        }

        let clustering_fixed = catalog.range_columns().iter().all(|column| {
            stmt.filter_ops()
                .iter()
                .any(|op| op.column().index() == column.index() && op.kind().is_eq())
        });
        Some(if clustering_fixed {
            AccessPath::PointLookup
        } else {
            AccessPath::PartitionScan
        })
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Explain plan output
#[derive(Debug, Clone, Serialize)]
pub struct ExplainPlan {
    /// Whether analysis succeeded
    pub accepted: bool,
    /// Statement kind
    pub statement: String,
    /// Table as resolved, or as written if rejected
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_path: Option<AccessPath>,
    /// Key lookup conditions in key order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_conditions: Vec<String>,
    /// Residual filters in evaluation order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
    pub static_only: bool,
    pub bind_variables: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from an analyzed statement
    pub fn from_statement(stmt: &DmlStatement) -> Self {
        let table = stmt
            .qualified_table()
            .unwrap_or_else(|| stmt.table_name())
            .to_string();

        Self {
            accepted: true,
            statement: stmt.kind().as_str().to_string(),
            table,
            access_path: AccessPath::of(stmt),
            key_conditions: stmt
                .key_slots()
                .iter()
                .flatten()
                .map(|op| op.to_string())
                .collect(),
            filters: stmt.filter_ops().iter().map(|op| op.to_string()).collect(),
            static_only: stmt.static_column_args_only(),
            bind_variables: stmt.bind_variables().len(),
            rejection_code: None,
            rejection_reason: None,
            location: None,
        }
    }

    /// Creates an explain plan from an analysis error
    pub fn from_error(stmt: &DmlStatement, err: &SemError) -> Self {
        let location = err.location();
        Self {
            accepted: false,
            statement: stmt.kind().as_str().to_string(),
            table: stmt.table_name().to_string(),
            access_path: None,
            key_conditions: Vec::new(),
            filters: Vec::new(),
            static_only: false,
            bind_variables: 0,
            rejection_code: Some(err.code().code().to_string()),
            rejection_reason: Some(err.message().to_string()),
            location: location.is_known().then(|| location.to_string()),
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN {} {} ===", self.statement, self.table)?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            if let Some(path) = &self.access_path {
                writeln!(f, "Access Path: {}", path)?;
            }
            if !self.key_conditions.is_empty() {
                writeln!(f, "Key Conditions:")?;
                for cond in &self.key_conditions {
                    writeln!(f, "  - {}", cond)?;
                }
            }
            if !self.filters.is_empty() {
                writeln!(f, "Filters:")?;
                for filter in &self.filters {
                    writeln!(f, "  - {}", filter)?;
                }
            }
            if self.static_only {
                writeln!(f, "Static Columns Only: yes")?;
            }
            if self.bind_variables > 0 {
                writeln!(f, "Bind Variables: {}", self.bind_variables)?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
            if let Some(location) = &self.location {
                writeln!(f, "Location: {}", location)?;
            }
        }

        Ok(())
    }
}
