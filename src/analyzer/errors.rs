//! Semantic analysis errors
//!
//! Error codes:
//! - SEM_SYSTEM_NAMESPACE_READONLY (REJECT)
//! - SEM_TABLE_NOT_FOUND (REJECT)
//! - SEM_DUPLICATE_COLUMN (REJECT)
//! - SEM_MISSING_PARTITION_KEY (REJECT)
//! - SEM_MISSING_KEY_CONDITION (REJECT)
//! - SEM_NON_KEY_COLUMN_IN_WHERE (REJECT)
//! - SEM_PARTITION_COLUMN_IN_RANGE_EXPR (REJECT)
//! - SEM_RANGE_NOT_YET_SUPPORTED (REJECT)
//! - SEM_ILLEGAL_RANGE_CONDITION (REJECT)
//! - SEM_UNSUPPORTED_OPERATOR (REJECT)
//! - SEM_UNSUPPORTED_EXPRESSION (REJECT)
//! - SEM_UNDEFINED_COLUMN (REJECT)
//! - SEM_DATATYPE_MISMATCH (REJECT)
//! - SEM_INVALID_TTL (REJECT)
//! - SEM_INVALID_ARGUMENTS (REJECT)
//!
//! Every error is reported verbatim to the statement's caller and is never
//! retried internally.

use std::fmt;

use crate::ast::Location;

/// Severity levels for analysis errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Statement rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Analysis error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemErrorCode {
    /// Write into the reserved system keyspace while it is read-only
    SystemNamespaceReadOnly,
    TableNotFound,
    /// Name registered twice in the statement's symbol table
    DuplicateColumn,
    /// Write statement without a WHERE clause
    MissingPartitionKey,
    /// Key column left unconstrained where a condition is required
    MissingKeyCondition,
    NonKeyColumnInWhere,
    /// Range comparison on a hash column
    PartitionColumnInRangeExpr,
    /// Range comparison on a key column of a write
    RangeNotYetSupported,
    /// Comparison conflicting with earlier comparisons on the same column
    IllegalRangeCondition,
    UnsupportedOperator,
    /// Boolean structure other than an AND conjunction of comparisons
    UnsupportedExpression,
    UndefinedColumn,
    DatatypeMismatch,
    InvalidTtl,
    InvalidArguments,
}

impl SemErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SemErrorCode::SystemNamespaceReadOnly => "SEM_SYSTEM_NAMESPACE_READONLY",
            SemErrorCode::TableNotFound => "SEM_TABLE_NOT_FOUND",
            SemErrorCode::DuplicateColumn => "SEM_DUPLICATE_COLUMN",
            SemErrorCode::MissingPartitionKey => "SEM_MISSING_PARTITION_KEY",
            SemErrorCode::MissingKeyCondition => "SEM_MISSING_KEY_CONDITION",
            SemErrorCode::NonKeyColumnInWhere => "SEM_NON_KEY_COLUMN_IN_WHERE",
            SemErrorCode::PartitionColumnInRangeExpr => "SEM_PARTITION_COLUMN_IN_RANGE_EXPR",
            SemErrorCode::RangeNotYetSupported => "SEM_RANGE_NOT_YET_SUPPORTED",
            SemErrorCode::IllegalRangeCondition => "SEM_ILLEGAL_RANGE_CONDITION",
            SemErrorCode::UnsupportedOperator => "SEM_UNSUPPORTED_OPERATOR",
            SemErrorCode::UnsupportedExpression => "SEM_UNSUPPORTED_EXPRESSION",
            SemErrorCode::UndefinedColumn => "SEM_UNDEFINED_COLUMN",
            SemErrorCode::DatatypeMismatch => "SEM_DATATYPE_MISMATCH",
            SemErrorCode::InvalidTtl => "SEM_INVALID_TTL",
            SemErrorCode::InvalidArguments => "SEM_INVALID_ARGUMENTS",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for SemErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Analysis error with source position
#[derive(Debug, Clone, PartialEq)]
pub struct SemError {
    code: SemErrorCode,
    message: String,
    location: Location,
}

impl SemError {
    pub fn new(code: SemErrorCode, location: Location, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location,
        }
    }

    pub fn system_namespace_readonly(location: Location, table: impl fmt::Display) -> Self {
        Self::new(
            SemErrorCode::SystemNamespaceReadOnly,
            location,
            format!("System namespace is read-only, cannot write to '{}'", table),
        )
    }

    pub fn table_not_found(location: Location, table: impl fmt::Display) -> Self {
        Self::new(
            SemErrorCode::TableNotFound,
            location,
            format!("Table '{}' not found", table),
        )
    }

    pub fn duplicate_column(location: Location, column: &str) -> Self {
        Self::new(
            SemErrorCode::DuplicateColumn,
            location,
            format!("Column '{}' is defined more than once", column),
        )
    }

    pub fn missing_partition_key(location: Location) -> Self {
        Self::new(
            SemErrorCode::MissingPartitionKey,
            location,
            "Missing partition key",
        )
    }

    pub fn missing_key_condition(location: Location) -> Self {
        Self::new(
            SemErrorCode::MissingKeyCondition,
            location,
            "Missing condition on key columns in WHERE clause",
        )
    }

    pub fn non_key_column_in_where(location: Location, column: &str) -> Self {
        Self::new(
            SemErrorCode::NonKeyColumnInWhere,
            location,
            format!("Non primary key '{}' cannot be used in where clause", column),
        )
    }

    pub fn partition_column_in_range_expr(location: Location, column: &str) -> Self {
        Self::new(
            SemErrorCode::PartitionColumnInRangeExpr,
            location,
            format!(
                "Partition column '{}' cannot be used in this expression",
                column
            ),
        )
    }

    pub fn range_not_yet_supported(location: Location) -> Self {
        Self::new(
            SemErrorCode::RangeNotYetSupported,
            location,
            "Range expression is not yet supported",
        )
    }

    /// Equality after any earlier comparison on the same column
    pub fn illogical_condition(location: Location, column: &str) -> Self {
        Self::new(
            SemErrorCode::IllegalRangeCondition,
            location,
            format!("Illogical condition for where clause on '{}'", column),
        )
    }

    /// Range after an equality or a same-direction range on the same column
    pub fn illegal_range_condition(location: Location, column: &str) -> Self {
        Self::new(
            SemErrorCode::IllegalRangeCondition,
            location,
            format!("Illogical range condition on '{}'", column),
        )
    }

    pub fn unsupported_operator(location: Location, op: &str) -> Self {
        Self::new(
            SemErrorCode::UnsupportedOperator,
            location,
            format!("Operator '{}' is not supported in where clause", op),
        )
    }

    pub fn unsupported_expression(location: Location, reason: impl Into<String>) -> Self {
        Self::new(SemErrorCode::UnsupportedExpression, location, reason)
    }

    pub fn undefined_column(location: Location, column: &str) -> Self {
        Self::new(
            SemErrorCode::UndefinedColumn,
            location,
            format!("Undefined column '{}'", column),
        )
    }

    pub fn datatype_mismatch(
        location: Location,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self::new(
            SemErrorCode::DatatypeMismatch,
            location,
            format!("Datatype mismatch: expected {}, found {}", expected, actual),
        )
    }

    pub fn invalid_ttl(location: Location, min: i64, max: i64) -> Self {
        Self::new(
            SemErrorCode::InvalidTtl,
            location,
            format!("Valid ttl range : [{}, {}]", min, max),
        )
    }

    pub fn invalid_arguments(location: Location, reason: impl Into<String>) -> Self {
        Self::new(SemErrorCode::InvalidArguments, location, reason)
    }

    /// Returns the error code
    pub fn code(&self) -> SemErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the location of the offending node
    pub fn location(&self) -> Location {
        self.location
    }
}

impl fmt::Display for SemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if self.location.is_known() {
            write!(f, " (at {})", self.location)?;
        }
        Ok(())
    }
}

impl std::error::Error for SemError {}

/// Result type for analysis operations
pub type SemResult<T> = Result<T, SemError>;
