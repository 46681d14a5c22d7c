//! Compiler test modules.
//!
//! Tests are organized by category:
//! - `core`: SELECT, INSERT, UPDATE, DELETE on the generic dialect
//! - `dialects`: per-dialect quoting, paging, literals and hints
//! - `features`: CTEs, set operations, aggregates, scopes, variables
//! - `ddl`: CREATE / DROP / TRUNCATE TABLE

mod core;
mod dialects;

use crate::ast::Query;
use crate::config::CompilerOptions;
use crate::transpiler::{Compiler, Dialect, SqlResult};

pub(super) fn compile(dialect: Dialect, query: &Query) -> SqlResult {
    Compiler::new(dialect).compile(query).unwrap()
}

pub(super) fn compile_with(dialect: Dialect, options: CompilerOptions, query: &Query) -> SqlResult {
    Compiler::with_options(dialect, options).compile(query).unwrap()
}
