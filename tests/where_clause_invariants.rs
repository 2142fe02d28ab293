//! WHERE-clause Invariant Tests
//!
//! Tests for WHERE classification:
//! - Writes must fix every hash column by equality
//! - Writes must fix the clustering key unless they touch static columns only
//! - Reads with a partial hash key fall back to filters in slot order
//! - Re-specifying a column is rejected
//! - Range comparisons are rejected on hash columns and on write keys

use dmlsem::analyzer::{
    ComparisonKind, DmlAnalyzer, DmlStatement, SemError, SemErrorCode, SemResult,
};
use dmlsem::ast::{Expr, Location, RelationalOp};
use dmlsem::catalog::{DataType, MemoryCatalog, TableName, TableSchema};
use dmlsem::config::AnalyzerConfig;

// =============================================================================
// Helper Functions
// =============================================================================

/// T(h int hash, c int range, s int static, r int)
fn setup_catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();
    catalog
        .register(
            TableSchema::builder(TableName::new("ks", "t"))
                .hash_column("h", DataType::Int)
                .range_column("c", DataType::Int)
                .static_column("s", DataType::Int)
                .column("r", DataType::Int)
                .build(),
        )
        .unwrap();
    catalog
        .register(
            TableSchema::builder(TableName::new("ks", "wide"))
                .hash_column("h1", DataType::Int)
                .hash_column("h2", DataType::Int)
                .hash_column("h3", DataType::Int)
                .range_column("c1", DataType::Int)
                .range_column("c2", DataType::Text)
                .static_column("s", DataType::Text)
                .column("r", DataType::Int)
                .build(),
        )
        .unwrap();
    catalog
}

fn analyze(stmt: DmlStatement) -> SemResult<DmlStatement> {
    let catalog = setup_catalog();
    let config = AnalyzerConfig::default();
    let analyzer = DmlAnalyzer::new(&catalog, "ks", &config);

    let mut stmt = stmt;
    analyzer.analyze(&mut stmt)?;
    Ok(stmt)
}

fn analyze_err(stmt: DmlStatement) -> SemError {
    match analyze(stmt) {
        Ok(stmt) => panic!("expected rejection, got {:?}", stmt.key_slots()),
        Err(err) => err,
    }
}

fn select(table: &str) -> DmlStatement {
    DmlStatement::select(TableName::unqualified(table))
}

fn update(table: &str) -> DmlStatement {
    DmlStatement::update(TableName::unqualified(table))
}

fn delete(table: &str) -> DmlStatement {
    DmlStatement::delete(TableName::unqualified(table))
}

fn and_all(terms: Vec<Expr>) -> Expr {
    Expr::conjunction(terms).unwrap()
}

fn filter_strings(stmt: &DmlStatement) -> Vec<String> {
    stmt.filter_ops().iter().map(|op| op.to_string()).collect()
}

// =============================================================================
// Write Key Completeness
// =============================================================================

/// UPDATE T SET s=1 WHERE h=5: static-only, clustering key omitted.
#[test]
fn test_static_update_without_clustering_key() {
    let stmt = analyze(update("t").set("s", Expr::lit(1)).with_where(Expr::eq("h", 5))).unwrap();

    assert!(stmt.static_column_args_only());
    assert_eq!(stmt.key_slots().len(), 1);
    let slot = stmt.key_slots()[0].as_ref().unwrap();
    assert_eq!(slot.column().name(), "h");
    assert_eq!(slot.kind(), ComparisonKind::Eq);
    assert!(stmt.filter_ops().is_empty());
}

/// UPDATE T SET r=1 WHERE h=5: regular column needs the full key.
#[test]
fn test_regular_update_requires_clustering_key() {
    let err = analyze_err(update("t").set("r", Expr::lit(1)).with_where(Expr::eq("h", 5)));
    assert_eq!(err.code(), SemErrorCode::MissingKeyCondition);
}

/// Static-only write given the full key keeps every key slot.
#[test]
fn test_static_update_with_full_key() {
    let stmt = analyze(
        update("t")
            .set("s", Expr::lit(1))
            .with_where(Expr::and(Expr::eq("h", 5), Expr::eq("c", 2))),
    )
    .unwrap();

    assert!(stmt.static_column_args_only());
    assert_eq!(stmt.key_slots().len(), 2);
    assert!(stmt.key_slots().iter().all(Option::is_some));
}

/// Static-only write with part of the clustering key is rejected.
#[test]
fn test_static_update_with_partial_clustering_key() {
    let err = analyze_err(
        update("wide")
            .set("s", Expr::lit("x"))
            .with_where(and_all(vec![
                Expr::eq("h1", 1),
                Expr::eq("h2", 2),
                Expr::eq("h3", 3),
                Expr::eq("c1", 4),
            ])),
    );
    assert_eq!(err.code(), SemErrorCode::MissingKeyCondition);
}

/// Every hash column needs an EQ, for any write.
#[test]
fn test_write_requires_every_hash_column() {
    let err = analyze_err(
        update("wide")
            .set("s", Expr::lit("x"))
            .with_where(and_all(vec![Expr::eq("h1", 1), Expr::eq("h3", 3)])),
    );
    assert_eq!(err.code(), SemErrorCode::MissingKeyCondition);

    let err = analyze_err(delete("t").with_where(Expr::eq("c", 1)));
    assert_eq!(err.code(), SemErrorCode::MissingKeyCondition);
}

/// A write without WHERE has no partition key at all.
#[test]
fn test_write_without_where() {
    let err = analyze_err(update("t").set("s", Expr::lit(1)).at(Location::new(1, 1)));
    assert_eq!(err.code(), SemErrorCode::MissingPartitionKey);
    assert_eq!(err.location(), Location::new(1, 1));
}

/// DELETE with the full key fills every slot in key order.
#[test]
fn test_delete_full_key_slot_order() {
    let stmt = analyze(delete("wide").with_where(and_all(vec![
        Expr::eq("c2", "k"),
        Expr::eq("h3", 3),
        Expr::eq("c1", 4),
        Expr::eq("h1", 1),
        Expr::eq("h2", 2),
    ])))
    .unwrap();

    let names: Vec<_> = stmt
        .key_slots()
        .iter()
        .map(|slot| slot.as_ref().unwrap().column().name().to_string())
        .collect();
    assert_eq!(names, vec!["h1", "h2", "h3", "c1", "c2"]);
    assert!(!stmt.static_column_args_only());
}

/// Non-key columns cannot appear in a write's WHERE.
#[test]
fn test_write_rejects_non_key_columns() {
    let err = analyze_err(
        update("t")
            .set("r", Expr::lit(1))
            .with_where(and_all(vec![Expr::eq("h", 1), Expr::eq("c", 1), Expr::eq("r", 0)])),
    );
    assert_eq!(err.code(), SemErrorCode::NonKeyColumnInWhere);

    let err = analyze_err(
        delete("t").with_where(and_all(vec![Expr::eq("h", 1), Expr::eq("c", 1), Expr::gt("s", 0)])),
    );
    assert_eq!(err.code(), SemErrorCode::NonKeyColumnInWhere);
}

// =============================================================================
// Read Classification
// =============================================================================

/// SELECT * FROM T WHERE h=5 AND c>3
#[test]
fn test_read_complete_hash_with_clustering_range() {
    let stmt = analyze(select("t").with_where(Expr::and(Expr::eq("h", 5), Expr::gt("c", 3)))).unwrap();

    assert_eq!(stmt.key_slots().len(), 1);
    assert_eq!(stmt.key_slots()[0].as_ref().unwrap().to_string(), "h = 5");
    assert_eq!(filter_strings(&stmt), vec!["c > 3"]);
}

/// SELECT * FROM T WHERE c>3
#[test]
fn test_read_without_hash_predicate() {
    let stmt = analyze(select("t").with_where(Expr::gt("c", 3))).unwrap();

    assert!(stmt.key_slots().is_empty());
    assert_eq!(filter_strings(&stmt), vec!["c > 3"]);
}

/// Partial hash key: filled slots move to the front of the filters in slot
/// order, ahead of filters recorded during the walk.
#[test]
fn test_read_partial_hash_front_insert_order() {
    let stmt = analyze(select("wide").with_where(and_all(vec![
        Expr::eq("r", 7),
        Expr::eq("h3", 3),
        Expr::gte("c1", 0),
        Expr::eq("h1", 1),
    ])))
    .unwrap();

    assert!(stmt.key_slots().is_empty());
    assert_eq!(
        filter_strings(&stmt),
        vec!["h1 = 1", "h3 = 3", "r = 7", "c1 >= 0"]
    );
}

/// Full hash key in any order fills slots by position.
#[test]
fn test_read_complete_hash_any_order() {
    let stmt = analyze(select("wide").with_where(and_all(vec![
        Expr::eq("h2", 2),
        Expr::eq("h3", 3),
        Expr::eq("h1", 1),
        Expr::eq("c1", 9),
    ])))
    .unwrap();

    let slots: Vec<_> = stmt
        .key_slots()
        .iter()
        .map(|s| s.as_ref().unwrap().to_string())
        .collect();
    assert_eq!(slots, vec!["h1 = 1", "h2 = 2", "h3 = 3"]);
    assert_eq!(filter_strings(&stmt), vec!["c1 = 9"]);
}

/// A read without WHERE is a valid full scan.
#[test]
fn test_read_without_where() {
    let stmt = analyze(select("t")).unwrap();
    assert!(stmt.key_slots().is_empty());
    assert!(stmt.filter_ops().is_empty());
}

/// Static and regular columns become filters on reads, ranges included.
#[test]
fn test_read_non_key_columns_are_filters() {
    let stmt = analyze(select("t").with_where(and_all(vec![
        Expr::eq("h", 1),
        Expr::lt("r", 10),
        Expr::gt("r", 2),
        Expr::eq("s", 4),
    ])))
    .unwrap();

    assert_eq!(stmt.key_slots().len(), 1);
    assert_eq!(filter_strings(&stmt), vec!["r < 10", "r > 2", "s = 4"]);
}

/// Opposite-direction ranges on one clustering column are a valid window.
#[test]
fn test_read_clustering_range_window() {
    let stmt = analyze(select("t").with_where(and_all(vec![
        Expr::eq("h", 1),
        Expr::gte("c", 1),
        Expr::lt("c", 9),
    ])))
    .unwrap();
    assert_eq!(filter_strings(&stmt), vec!["c >= 1", "c < 9"]);
}

// =============================================================================
// Conflicting Conditions
// =============================================================================

/// EQ followed by EQ on the same column is illegal for every role.
#[test]
fn test_repeated_equality_rejected() {
    for column in ["h", "c", "s", "r"] {
        let err = analyze_err(
            select("t").with_where(Expr::and(Expr::eq(column, 1), Expr::eq(column, 1))),
        );
        assert_eq!(err.code(), SemErrorCode::IllegalRangeCondition, "{}", column);
    }
}

/// EQ after a range on the same column is illegal.
#[test]
fn test_equality_after_range_rejected() {
    let err = analyze_err(select("t").with_where(Expr::and(Expr::gt("c", 1), Expr::eq("c", 3))));
    assert_eq!(err.code(), SemErrorCode::IllegalRangeCondition);
}

/// A clustering range after an EQ or a same-direction range is illegal.
#[test]
fn test_clustering_range_conflicts() {
    let err = analyze_err(select("t").with_where(Expr::and(Expr::eq("c", 1), Expr::lt("c", 3))));
    assert_eq!(err.code(), SemErrorCode::IllegalRangeCondition);

    let err = analyze_err(select("t").with_where(Expr::and(Expr::lt("c", 5), Expr::lte("c", 3))));
    assert_eq!(err.code(), SemErrorCode::IllegalRangeCondition);

    let err = analyze_err(select("t").with_where(Expr::and(Expr::gt("c", 5), Expr::gte("c", 3))));
    assert_eq!(err.code(), SemErrorCode::IllegalRangeCondition);
}

/// LT on a hash column fails for every statement kind.
#[test]
fn test_range_on_hash_column() {
    let err = analyze_err(select("t").with_where(Expr::lt("h", 5)));
    assert_eq!(err.code(), SemErrorCode::PartitionColumnInRangeExpr);

    let err = analyze_err(update("t").set("r", Expr::lit(1)).with_where(Expr::lt("h", 5)));
    assert_eq!(err.code(), SemErrorCode::PartitionColumnInRangeExpr);

    let err = analyze_err(delete("t").with_where(Expr::gte("h", 5)));
    assert_eq!(err.code(), SemErrorCode::PartitionColumnInRangeExpr);
}

/// GT on a clustering column in a write is not supported.
#[test]
fn test_range_on_clustering_column_in_write() {
    let err = analyze_err(
        update("t")
            .set("r", Expr::lit(1))
            .with_where(Expr::and(Expr::eq("h", 5), Expr::gt("c", 3))),
    );
    assert_eq!(err.code(), SemErrorCode::RangeNotYetSupported);
}

// =============================================================================
// Expression Shape
// =============================================================================

/// Only AND conjunctions are accepted in WHERE.
#[test]
fn test_or_and_not_rejected() {
    let err = analyze_err(select("t").with_where(Expr::or(Expr::eq("h", 1), Expr::eq("h", 2))));
    assert_eq!(err.code(), SemErrorCode::UnsupportedExpression);

    let err = analyze_err(select("t").with_where(Expr::not(Expr::eq("h", 1))));
    assert_eq!(err.code(), SemErrorCode::UnsupportedExpression);
}

/// Operators outside EQ/LT/LTE/GT/GTE are rejected.
#[test]
fn test_unsupported_operators() {
    for op in [RelationalOp::Ne, RelationalOp::In, RelationalOp::Like] {
        let err = analyze_err(select("t").with_where(Expr::compare(op, "r", Expr::lit(1))));
        assert_eq!(err.code(), SemErrorCode::UnsupportedOperator);
    }
}

/// The operator is rejected before the operand is type-checked.
#[test]
fn test_unsupported_operator_wins_over_type_mismatch() {
    for op in [RelationalOp::Like, RelationalOp::In] {
        let err = analyze_err(select("wide").with_where(Expr::compare(op, "h1", Expr::lit(5))));
        assert_eq!(err.code(), SemErrorCode::UnsupportedOperator);

        let err = analyze_err(
            update("t")
                .set("r", Expr::lit(1))
                .with_where(Expr::compare(op, "h", Expr::lit("five"))),
        );
        assert_eq!(err.code(), SemErrorCode::UnsupportedOperator);
    }
}

/// Unknown columns and mistyped literals are rejected.
#[test]
fn test_column_and_type_checks() {
    let err = analyze_err(select("t").with_where(Expr::eq("nope", 1)));
    assert_eq!(err.code(), SemErrorCode::UndefinedColumn);

    let err = analyze_err(select("t").with_where(Expr::eq("h", "five")));
    assert_eq!(err.code(), SemErrorCode::DatatypeMismatch);
}

/// Classification is deterministic across repeated analyses.
#[test]
fn test_classification_is_deterministic() {
    let build = || {
        select("wide").with_where(and_all(vec![
            Expr::eq("h2", 2),
            Expr::lt("c1", 4),
            Expr::eq("r", 1),
        ]))
    };
    let first = filter_strings(&analyze(build()).unwrap());
    for _ in 0..20 {
        assert_eq!(filter_strings(&analyze(build()).unwrap()), first);
    }
}
