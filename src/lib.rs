//! dmlsem - semantic analysis of DML statements
//!
//! Resolves a statement's table, classifies its WHERE clause into key
//! lookups and filters, and validates the rest of the statement before it
//! reaches the executor.

pub mod analyzer;
pub mod ast;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod observability;
