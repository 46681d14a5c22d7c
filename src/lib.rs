//! # sqlcraft
//!
//! A fluent SQL builder with one clause model and a compiler per dialect.
//!
//! Build a [`Query`](ast::Query), then render it for SqlServer, MySQL,
//! Postgres, SQLite, Oracle, Firebird or generic SQL. The output carries the
//! SQL text with the dialect's parameter syntax and the bindings in
//! placeholder order.
//!
//! ## Quick Example
//!
//! ```
//! use sqlcraft::prelude::*;
//!
//! let query = Query::table("orders as o")
//!     .select(["o.id", "o.total"])
//!     .where_in("o.status", ["paid", "shipped"])
//!     .order_by_desc("o.created_at")
//!     .limit(20);
//!
//! let result = Compiler::new(Dialect::SqlServer).compile(&query).unwrap();
//! assert_eq!(
//!     result.sql,
//!     "SELECT [o].[id], [o].[total] FROM [orders] AS [o] \
//!      WHERE [o].[status] IN (@p0, @p1) ORDER BY [o].[created_at] DESC \
//!      OFFSET @p2 ROWS FETCH NEXT @p3 ROWS ONLY"
//! );
//! assert_eq!(result.bindings.len(), 4);
//! ```
//!
//! ## Raw fragments
//!
//! Raw expressions quote `{name}` / `[name]` markers with the dialect's
//! identifier quotes and pair each `?` with a binding. `\?` is a literal
//! question mark (for operators such as Postgres' JSON `?`).

pub mod ast;
pub mod config;
pub mod error;
pub mod transpiler;

pub use config::{CompilerConfig, CompilerOptions};
pub use error::{CraftError, CraftResult};
pub use transpiler::{Compiler, Dialect, SqlResult, ToSql};

pub mod prelude {
    pub use crate::ast::{
        AggregateFunc, Conditions, DataType, DatePart, Join, JoinKind, LockMode, Operator, Query,
        SetOp, TableColumn, Value,
    };
    pub use crate::config::{CompilerConfig, CompilerOptions};
    pub use crate::error::{CraftError, CraftResult};
    pub use crate::transpiler::{Compiler, Dialect, SqlResult, ToSql};
}
