//! Expression tree consumed by semantic analysis
//!
//! The parser produces these nodes; analysis never rewrites them; it only
//! reads them and clones the value side of accepted comparisons.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::value::Value;

/// Source position of a node (1-based; 0 means unknown)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    pub fn is_known(&self) -> bool {
        self.line != 0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Relational operators the parser can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationalOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    Like,
}

impl RelationalOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            RelationalOp::Eq => "=",
            RelationalOp::Ne => "!=",
            RelationalOp::Lt => "<",
            RelationalOp::Lte => "<=",
            RelationalOp::Gt => ">",
            RelationalOp::Gte => ">=",
            RelationalOp::In => "IN",
            RelationalOp::Like => "LIKE",
        }
    }
}

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Literal {
        value: Value,
        #[serde(default)]
        loc: Location,
    },
    Column {
        name: String,
        #[serde(default)]
        loc: Location,
    },
    /// Positional bind marker (`?`) or named marker (`:name`)
    BindVar {
        position: usize,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        loc: Location,
    },
    Compare {
        op: RelationalOp,
        left: Box<Expr>,
        right: Box<Expr>,
        #[serde(default)]
        loc: Location,
    },
    And {
        left: Box<Expr>,
        right: Box<Expr>,
        #[serde(default)]
        loc: Location,
    },
    Or {
        left: Box<Expr>,
        right: Box<Expr>,
        #[serde(default)]
        loc: Location,
    },
    Not {
        operand: Box<Expr>,
        #[serde(default)]
        loc: Location,
    },
}

impl Expr {
    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal {
            value: value.into(),
            loc: Location::default(),
        }
    }

    pub fn col(name: impl Into<String>) -> Self {
        Expr::Column {
            name: name.into(),
            loc: Location::default(),
        }
    }

    pub fn bind(position: usize) -> Self {
        Expr::BindVar {
            position,
            name: None,
            loc: Location::default(),
        }
    }

    pub fn named_bind(position: usize, name: impl Into<String>) -> Self {
        Expr::BindVar {
            position,
            name: Some(name.into()),
            loc: Location::default(),
        }
    }

    /// `column <op> value`
    pub fn compare(op: RelationalOp, column: impl Into<String>, value: Expr) -> Self {
        Expr::Compare {
            op,
            left: Box::new(Expr::col(column)),
            right: Box::new(value),
            loc: Location::default(),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(RelationalOp::Eq, column, Expr::lit(value))
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(RelationalOp::Lt, column, Expr::lit(value))
    }

    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(RelationalOp::Lte, column, Expr::lit(value))
    }

    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(RelationalOp::Gt, column, Expr::lit(value))
    }

    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(RelationalOp::Gte, column, Expr::lit(value))
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And {
            left: Box::new(left),
            right: Box::new(right),
            loc: Location::default(),
        }
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or {
            left: Box::new(left),
            right: Box::new(right),
            loc: Location::default(),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Expr) -> Self {
        Expr::Not {
            operand: Box::new(operand),
            loc: Location::default(),
        }
    }

    /// Left-deep AND chain of the given terms. Returns `None` for no terms.
    pub fn conjunction(terms: impl IntoIterator<Item = Expr>) -> Option<Self> {
        terms.into_iter().reduce(Expr::and)
    }

    /// Returns the node's source location
    pub fn loc(&self) -> Location {
        match self {
            Expr::Literal { loc, .. }
            | Expr::Column { loc, .. }
            | Expr::BindVar { loc, .. }
            | Expr::Compare { loc, .. }
            | Expr::And { loc, .. }
            | Expr::Or { loc, .. }
            | Expr::Not { loc, .. } => *loc,
        }
    }

    /// Sets the node's source location
    pub fn at(mut self, location: Location) -> Self {
        match &mut self {
            Expr::Literal { loc, .. }
            | Expr::Column { loc, .. }
            | Expr::BindVar { loc, .. }
            | Expr::Compare { loc, .. }
            | Expr::And { loc, .. }
            | Expr::Or { loc, .. }
            | Expr::Not { loc, .. } => *loc = location,
        }
        self
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal { value, .. } => write!(f, "{}", value),
            Expr::Column { name, .. } => write!(f, "{}", name),
            Expr::BindVar {
                name: Some(name), ..
            } => write!(f, ":{}", name),
            Expr::BindVar { position, .. } => write!(f, "?{}", position),
            Expr::Compare {
                op, left, right, ..
            } => write!(f, "{} {} {}", left, op.symbol(), right),
            Expr::And { left, right, .. } => write!(f, "{} AND {}", left, right),
            Expr::Or { left, right, .. } => write!(f, "({} OR {})", left, right),
            Expr::Not { operand, .. } => write!(f, "NOT ({})", operand),
        }
    }
}
