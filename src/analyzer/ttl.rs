//! USING TTL validation

use crate::ast::{Expr, Location, Value};
use crate::catalog::DataType;
use crate::config::AnalyzerConfig;

use super::errors::{SemError, SemResult};
use super::expr::SemContext;

/// Checks `seconds` against the configured TTL bounds
pub fn validate_ttl(seconds: i64, config: &AnalyzerConfig, loc: Location) -> SemResult<()> {
    if !config.is_valid_ttl(seconds) {
        return Err(SemError::invalid_ttl(
            loc,
            config.min_ttl_seconds,
            config.max_ttl_seconds,
        ));
    }
    Ok(())
}

/// Analyzes the USING clause.
///
/// A literal TTL is range-checked now; a bind marker is recorded and checked
/// when the statement is executed with a bound value.
pub fn analyze_using_clause(
    ctx: &mut SemContext<'_>,
    ttl: Option<&Expr>,
    config: &AnalyzerConfig,
) -> SemResult<()> {
    let Some(expr) = ttl else {
        return Ok(());
    };

    ctx.analyze_value(expr, DataType::Bigint)?;
    match expr {
        Expr::Literal {
            value: Value::Int(seconds),
            loc,
        } => validate_ttl(*seconds, config, *loc),
        Expr::Literal { loc, .. } => Err(SemError::invalid_ttl(
            *loc,
            config.min_ttl_seconds,
            config.max_ttl_seconds,
        )),
        _ => Ok(()),
    }
}
