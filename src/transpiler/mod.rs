//! SQL compiler for the query AST.
//!
//! Renders a [`Query`] into dialect SQL plus ordered bindings.

pub mod binder;
pub mod conditions;
pub mod context;
pub mod ddl;
pub mod dialect;
pub mod dml;
pub mod result;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use std::path::Path;

use crate::ast::{Method, Query};
use crate::config::{CompilerConfig, CompilerOptions};
use crate::error::{CraftError, CraftResult};

pub use binder::ParamStyle;
pub use context::Ctx;
pub use dialect::Dialect;
pub use result::SqlResult;
pub use traits::SqlGenerator;

/// Compiles queries for one dialect with fixed options.
///
/// Holds no per-statement state, so one compiler can be shared across
/// threads.
pub struct Compiler {
    dialect: Dialect,
    options: CompilerOptions,
    generator: Box<dyn SqlGenerator>,
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("dialect", &self.dialect)
            .field("options", &self.options)
            .finish()
    }
}

impl Compiler {
    pub fn new(dialect: Dialect) -> Self {
        Self::with_options(dialect, CompilerOptions::default())
    }

    pub fn with_options(dialect: Dialect, options: CompilerOptions) -> Self {
        let generator = dialect.generator(&options);
        Self {
            dialect,
            options,
            generator,
        }
    }

    /// Compiler for a dialect code such as `"mysql"`.
    pub fn from_code(code: &str) -> CraftResult<Self> {
        Ok(Self::new(code.parse()?))
    }

    /// Compiler from a TOML file naming the dialect and options.
    pub fn from_config(path: impl AsRef<Path>) -> CraftResult<Self> {
        let config = CompilerConfig::from_file(path)?;
        Ok(Self::with_options(config.dialect()?, config.options))
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile any statement: SELECT, INSERT, UPDATE, DELETE or table DDL.
    pub fn compile(&self, query: &Query) -> CraftResult<SqlResult> {
        if let Some(err) = query.error() {
            return Err(err.clone());
        }

        let mut ctx = Ctx::new(self.generator.as_ref(), &self.options);
        let raw_sql = match query.method {
            Method::CreateTable => {
                ctx.enter(query);
                ddl::compile_create_table(&mut ctx, query)?
            }
            Method::CreateTableAs => {
                ctx.enter(query);
                ddl::compile_create_table_as(&mut ctx, query)?
            }
            Method::DropTable => ddl::compile_drop_table(&mut ctx, query)?,
            Method::TruncateTable => ddl::compile_truncate_table(&mut ctx, query)?,
            _ => dml::compile_statement(&mut ctx, query)?,
        };

        tracing::debug!(
            dialect = %self.dialect,
            method = %query.method,
            bindings = ctx.bindings.len(),
            "compiled statement"
        );

        binder::bind(raw_sql, ctx.bindings, &self.param_style())
    }

    /// `CREATE TABLE` from the query's table clauses.
    pub fn compile_create_table(&self, query: &Query) -> CraftResult<SqlResult> {
        self.compile_as(query, Method::CreateTable)
    }

    pub fn compile_drop_table(&self, query: &Query) -> CraftResult<SqlResult> {
        self.compile_as(query, Method::DropTable)
    }

    pub fn compile_truncate_table(&self, query: &Query) -> CraftResult<SqlResult> {
        self.compile_as(query, Method::TruncateTable)
    }

    fn compile_as(&self, query: &Query, method: Method) -> CraftResult<SqlResult> {
        if query.method == method {
            return self.compile(query);
        }
        let mut query = query.clone();
        query.method = method;
        self.compile(&query)
    }

    fn param_style(&self) -> ParamStyle {
        let prefix = match self.options.parameter_prefix.as_deref() {
            Some("?") => None,
            Some(prefix) => Some(prefix.to_string()),
            None => self.generator.parameter_prefix().map(str::to_string),
        };
        match prefix {
            Some(prefix) => ParamStyle::Named {
                prefix,
                base: self.options.parameter_base,
            },
            None => ParamStyle::Positional,
        }
    }
}

/// Shorthand compilation without building a [`Compiler`].
pub trait ToSql {
    /// Compile for the generic dialect.
    fn to_sql(&self) -> CraftResult<SqlResult> {
        self.to_sql_with_dialect(Dialect::default())
    }

    fn to_sql_with_dialect(&self, dialect: Dialect) -> CraftResult<SqlResult>;
}

impl ToSql for Query {
    fn to_sql_with_dialect(&self, dialect: Dialect) -> CraftResult<SqlResult> {
        Compiler::new(dialect).compile(self)
    }
}

impl From<Dialect> for Compiler {
    fn from(dialect: Dialect) -> Self {
        Compiler::new(dialect)
    }
}

impl TryFrom<&str> for Compiler {
    type Error = CraftError;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        Compiler::from_code(code)
    }
}
