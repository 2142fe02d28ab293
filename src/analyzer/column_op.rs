//! Validated filter predicates and key slots

use std::collections::VecDeque;
use std::fmt;

use serde::Serialize;

use crate::ast::{Expr, RelationalOp};
use crate::catalog::ColumnDescriptor;

/// Comparisons the analyzer can classify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// Which operator counter a comparison feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpFamily {
    Equal,
    /// LT / LTE
    Upper,
    /// GT / GTE
    Lower,
}

impl ComparisonKind {
    /// Maps a parser operator; `None` for operators the analyzer rejects
    pub fn from_op(op: RelationalOp) -> Option<Self> {
        match op {
            RelationalOp::Eq => Some(ComparisonKind::Eq),
            RelationalOp::Lt => Some(ComparisonKind::Lt),
            RelationalOp::Lte => Some(ComparisonKind::Lte),
            RelationalOp::Gt => Some(ComparisonKind::Gt),
            RelationalOp::Gte => Some(ComparisonKind::Gte),
            RelationalOp::Ne | RelationalOp::In | RelationalOp::Like => None,
        }
    }

    pub fn family(&self) -> OpFamily {
        match self {
            ComparisonKind::Eq => OpFamily::Equal,
            ComparisonKind::Lt | ComparisonKind::Lte => OpFamily::Upper,
            ComparisonKind::Gt | ComparisonKind::Gte => OpFamily::Lower,
        }
    }

    pub fn is_eq(&self) -> bool {
        *self == ComparisonKind::Eq
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonKind::Eq => "=",
            ComparisonKind::Lt => "<",
            ComparisonKind::Lte => "<=",
            ComparisonKind::Gt => ">",
            ComparisonKind::Gte => ">=",
        }
    }
}

/// One accepted comparison `column <kind> value`
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnOp {
    column: ColumnDescriptor,
    value: Expr,
    kind: ComparisonKind,
}

impl ColumnOp {
    pub fn new(column: ColumnDescriptor, value: Expr, kind: ComparisonKind) -> Self {
        Self {
            column,
            value,
            kind,
        }
    }

    pub fn column(&self) -> &ColumnDescriptor {
        &self.column
    }

    pub fn value(&self) -> &Expr {
        &self.value
    }

    pub fn kind(&self) -> ComparisonKind {
        self.kind
    }
}

impl fmt::Display for ColumnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.column.name(),
            self.kind.symbol(),
            self.value
        )
    }
}

/// Output of WHERE-clause analysis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereAnalysisResult {
    /// One slot per key position considered for point lookup
    pub key_slots: Vec<Option<ColumnOp>>,
    /// Residual predicates in traversal order
    pub filter_ops: VecDeque<ColumnOp>,
}

impl WhereAnalysisResult {
    pub fn with_slots(num_slots: usize) -> Self {
        Self {
            key_slots: vec![None; num_slots],
            filter_ops: VecDeque::new(),
        }
    }

    /// True when every slot in `0..n` is filled
    pub fn slots_filled(&self, n: usize) -> bool {
        self.key_slots.len() >= n && self.key_slots[..n].iter().all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_mapping() {
        assert_eq!(
            ComparisonKind::from_op(RelationalOp::Lte),
            Some(ComparisonKind::Lte)
        );
        assert_eq!(ComparisonKind::from_op(RelationalOp::Ne), None);
        assert_eq!(ComparisonKind::from_op(RelationalOp::In), None);
        assert_eq!(ComparisonKind::Lte.family(), OpFamily::Upper);
        assert_eq!(ComparisonKind::Gt.family(), OpFamily::Lower);
        assert_eq!(ComparisonKind::Eq.family(), OpFamily::Equal);
    }

    #[test]
    fn test_slots_filled() {
        let mut result = WhereAnalysisResult::with_slots(2);
        assert!(!result.slots_filled(1));
        assert!(result.slots_filled(0));

        let desc = ColumnDescriptor::new(
            0,
            0,
            "h",
            true,
            true,
            false,
            crate::catalog::DataType::Int,
        );
        result.key_slots[0] = Some(ColumnOp::new(desc, Expr::lit(1), ComparisonKind::Eq));
        assert!(result.slots_filled(1));
        assert!(!result.slots_filled(2));
        assert!(!result.slots_filled(3));
    }
}
