//! Semantic analysis of DML statements
//!
//! Validates a parsed SELECT, UPDATE or DELETE against the table's schema and
//! splits its WHERE clause into key lookup conditions and residual filters.
//!
//! # Design Principles
//!
//! - Deterministic: same statement and schema give the same result
//! - Fail closed: any unclassifiable condition rejects the statement
//! - All-or-nothing: a rejected statement keeps no partial analysis
//!
//! # WHERE classification
//!
//! - Hash columns: equality only; fills a key slot
//! - Clustering columns: equality fills a key slot on writes; reads keep
//!   them as filters
//! - Static and regular columns: filters on reads, rejected on writes

mod column_op;
mod counter;
mod dml;
mod errors;
mod explain;
mod expr;
mod statement;
mod ttl;
mod where_clause;
mod write_target;

pub use column_op::{ColumnOp, ComparisonKind, OpFamily, WhereAnalysisResult};
pub use counter::{OpCounters, OperatorCounter};
pub use dml::DmlAnalyzer;
pub use errors::{SemError, SemErrorCode, SemResult, Severity};
pub use explain::{AccessPath, ExplainPlan};
pub use expr::{BindVariable, SemContext};
pub use statement::{DmlStatement, ParamBindings, StatementKind};
pub use ttl::{analyze_using_clause, validate_ttl};
pub use where_clause::{WhereClauseAnalyzer, WhereExprState};
pub use write_target::{analyze_assignments, static_column_args_only, Assignment, ColumnArg};
