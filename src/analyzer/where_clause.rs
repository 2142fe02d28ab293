//! WHERE-clause classification
//!
//! Each comparison leaf is classified against the column's key role and the
//! comparisons already seen on that column, then either fills a key slot or
//! becomes a residual filter. After the walk, write statements are checked
//! for key completeness and reads with a partial hash key fall back to a
//! filtered scan.
//!
//! Leaves are processed depth-first, left to right. The order matters:
//! every conflict rule is phrased as "an earlier comparison of kind X was
//! already recorded on this column".

use crate::ast::{Expr, Location, RelationalOp};
use crate::catalog::{ColumnCatalog, ColumnDescriptor, ColumnRole};

use super::column_op::{ColumnOp, ComparisonKind, OpFamily, WhereAnalysisResult};
use super::counter::{OpCounters, OperatorCounter};
use super::errors::{SemError, SemResult};
use super::expr::SemContext;

/// Where an accepted comparison goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    KeySlot,
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    IllogicalCondition,
    NonKeyColumn,
    PartitionColumnInRange,
    RangeNotYetSupported,
    IllegalRange,
}

impl Rejection {
    fn into_error(self, loc: Location, column: &ColumnDescriptor) -> SemError {
        match self {
            Rejection::IllogicalCondition => SemError::illogical_condition(loc, column.name()),
            Rejection::NonKeyColumn => SemError::non_key_column_in_where(loc, column.name()),
            Rejection::PartitionColumnInRange => {
                SemError::partition_column_in_range_expr(loc, column.name())
            }
            Rejection::RangeNotYetSupported => SemError::range_not_yet_supported(loc),
            Rejection::IllegalRange => SemError::illegal_range_condition(loc, column.name()),
        }
    }
}

/// Decides the fate of one comparison.
///
/// An equality is illegal after any earlier comparison on the column. On
/// reads, a range on a clustering column is illegal after an equality or an
/// earlier range in the same direction.
fn classify(
    role: ColumnRole,
    family: OpFamily,
    write_only: bool,
    prior: OperatorCounter,
) -> Result<Placement, Rejection> {
    use ColumnRole::{Clustering, Hash, Regular, Static};
    use OpFamily::{Equal, Lower, Upper};

    match (role, family) {
        (_, Equal) if prior.is_constrained() => Err(Rejection::IllogicalCondition),
        (Hash, Equal) => Ok(Placement::KeySlot),
        (Clustering, Equal) if write_only => Ok(Placement::KeySlot),
        (Clustering, Equal) => Ok(Placement::Filter),
        (Static | Regular, Equal) if write_only => Err(Rejection::NonKeyColumn),
        (Static | Regular, Equal) => Ok(Placement::Filter),

        (Hash, Upper | Lower) => Err(Rejection::PartitionColumnInRange),
        (Clustering, Upper | Lower) if write_only => Err(Rejection::RangeNotYetSupported),
        (Clustering, Upper) if prior.eq_count() > 0 || prior.lt_count() > 0 => {
            Err(Rejection::IllegalRange)
        }
        (Clustering, Lower) if prior.eq_count() > 0 || prior.gt_count() > 0 => {
            Err(Rejection::IllegalRange)
        }
        (Clustering, Upper | Lower) => Ok(Placement::Filter),
        (Static | Regular, Upper | Lower) if write_only => Err(Rejection::NonKeyColumn),
        (Static | Regular, Upper | Lower) => Ok(Placement::Filter),
    }
}

/// Mutable state threaded through the WHERE walk
pub struct WhereExprState<'a> {
    result: &'a mut WhereAnalysisResult,
    counters: &'a mut OpCounters,
    write_only: bool,
}

impl<'a> WhereExprState<'a> {
    pub fn new(
        result: &'a mut WhereAnalysisResult,
        counters: &'a mut OpCounters,
        write_only: bool,
    ) -> Self {
        Self {
            result,
            counters,
            write_only,
        }
    }

    /// Classifies `column <op> value` and records it.
    pub fn analyze_column_op(
        &mut self,
        loc: Location,
        op: RelationalOp,
        column: &ColumnDescriptor,
        value: &Expr,
    ) -> SemResult<()> {
        let kind = ComparisonKind::from_op(op)
            .ok_or_else(|| SemError::unsupported_operator(loc, op.symbol()))?;

        let prior = self.counters.get(column.index());
        let placement = classify(column.role(), kind.family(), self.write_only, prior)
            .map_err(|rejection| rejection.into_error(loc, column))?;

        let counter = self.counters.get_mut(column.index());
        match kind.family() {
            OpFamily::Equal => counter.increase_eq(),
            OpFamily::Upper => counter.increase_lt(),
            OpFamily::Lower => counter.increase_gt(),
        }

        let column_op = ColumnOp::new(column.clone(), value.clone(), kind);
        match placement {
            Placement::KeySlot => self.result.key_slots[column.index()] = Some(column_op),
            Placement::Filter => self.result.filter_ops.push_back(column_op),
        }
        Ok(())
    }
}

/// Runs WHERE analysis for one statement
pub struct WhereClauseAnalyzer<'a> {
    catalog: &'a ColumnCatalog,
    write_only: bool,
    static_only: bool,
}

impl<'a> WhereClauseAnalyzer<'a> {
    pub fn for_read(catalog: &'a ColumnCatalog) -> Self {
        Self {
            catalog,
            write_only: false,
            static_only: false,
        }
    }

    /// `static_only` must already reflect the statement's write target.
    pub fn for_write(catalog: &'a ColumnCatalog, static_only: bool) -> Self {
        Self {
            catalog,
            write_only: true,
            static_only,
        }
    }

    /// Analyzes the optional WHERE clause. `stmt_loc` is reported when the
    /// clause is missing.
    pub fn analyze(
        &self,
        ctx: &mut SemContext<'_>,
        where_clause: Option<&Expr>,
        stmt_loc: Location,
    ) -> SemResult<WhereAnalysisResult> {
        let Some(expr) = where_clause else {
            if self.write_only {
                return Err(SemError::missing_partition_key(stmt_loc));
            }
            return Ok(WhereAnalysisResult::default());
        };

        let num_slots = if self.write_only {
            self.catalog.num_key_columns()
        } else {
            self.catalog.num_hash_columns()
        };
        let mut result = WhereAnalysisResult::with_slots(num_slots);
        let mut counters = OpCounters::new(self.catalog.len());

        {
            let mut state = WhereExprState::new(&mut result, &mut counters, self.write_only);
            ctx.analyze_condition(expr, Some(&mut state))?;
        }

        if self.write_only {
            self.check_write_keys(&counters, &mut result, expr.loc())?;
        } else {
            self.demote_partial_hash(&mut result);
        }
        Ok(result)
    }

    fn check_write_keys(
        &self,
        counters: &OpCounters,
        result: &mut WhereAnalysisResult,
        loc: Location,
    ) -> SemResult<()> {
        let num_hash = self.catalog.num_hash_columns();
        let num_key = self.catalog.num_key_columns();

        if counters.eq_columns(0..num_hash) != num_hash {
            return Err(SemError::missing_key_condition(loc));
        }

        // Static-only writes may give the whole clustering key or none of it.
        let range_keys = counters.eq_columns(num_hash..num_key);
        let num_range = num_key - num_hash;
        if self.static_only {
            if range_keys != num_range && range_keys != 0 {
                return Err(SemError::missing_key_condition(loc));
            }
            if range_keys == 0 {
                result.key_slots.truncate(num_hash);
            }
        } else if range_keys != num_range {
            return Err(SemError::missing_key_condition(loc));
        }
        Ok(())
    }

    /// A read without the full hash key cannot be a point lookup: the
    /// filled hash slots move to the front of the filters in slot order and
    /// the slots are dropped.
    fn demote_partial_hash(&self, result: &mut WhereAnalysisResult) {
        if result.slots_filled(self.catalog.num_hash_columns()) {
            return;
        }
        for slot in result.key_slots.drain(..).rev() {
            if let Some(op) = slot {
                result.filter_ops.push_front(op);
            }
        }
    }
}
