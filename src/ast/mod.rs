//! Parsed statement fragments handed to the analyzer
//!
//! Lexing and parsing live upstream; this module only defines the tree
//! shapes the analyzer walks.

mod expr;
mod value;

pub use expr::{Expr, Location, RelationalOp};
pub use value::Value;
