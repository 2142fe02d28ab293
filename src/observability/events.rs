//! Observable analyzer events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration loaded
    ConfigLoaded,
    /// Catalog loaded
    CatalogLoaded,

    /// Statement analysis begins
    AnalysisStart,
    /// Table resolved and column catalog built
    TableResolved,
    /// WHERE clause classified
    WhereClauseAnalyzed,
    /// Analysis committed to the statement
    AnalysisComplete,
    /// Statement rejected
    AnalysisRejected,

    /// Bind parameters cleared for re-execution
    StatementReset,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogLoaded => "CATALOG_LOADED",
            Event::AnalysisStart => "ANALYSIS_BEGIN",
            Event::TableResolved => "TABLE_RESOLVED",
            Event::WhereClauseAnalyzed => "WHERE_ANALYZED",
            Event::AnalysisComplete => "ANALYSIS_COMPLETE",
            Event::AnalysisRejected => "ANALYSIS_REJECTED",
            Event::StatementReset => "STATEMENT_RESET",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::CatalogLoaded => Severity::Info,
            Event::AnalysisRejected => Severity::Warn,
            Event::AnalysisStart
            | Event::TableResolved
            | Event::WhereClauseAnalyzed
            | Event::AnalysisComplete
            | Event::StatementReset => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
