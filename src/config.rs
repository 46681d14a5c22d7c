//! Compiler configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CraftError, CraftResult};
use crate::transpiler::Dialect;

/// Options applied by a [`Compiler`](crate::Compiler) to every statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerOptions {
    /// SqlServer `TOP`/`ROW_NUMBER()` and Oracle `ROWNUM` paging instead of
    /// `OFFSET ... FETCH`.
    #[serde(default)]
    pub legacy_pagination: bool,

    /// SqlServer `WITH (NOLOCK)` after every table reference.
    #[serde(default)]
    pub no_lock: bool,

    /// Override the dialect's parameter prefix. `"?"` forces positional
    /// placeholders.
    #[serde(default)]
    pub parameter_prefix: Option<String>,

    /// Index of the first named parameter.
    #[serde(default)]
    pub parameter_base: usize,

    /// Prepended to every table name.
    #[serde(default)]
    pub table_prefix: Option<String>,

    /// Replace the select list of EXISTS subqueries with `1`.
    #[serde(default = "default_true")]
    pub omit_select_inside_exists: bool,
}

fn default_true() -> bool { true }

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            legacy_pagination: false,
            no_lock: false,
            parameter_prefix: None,
            parameter_base: 0,
            table_prefix: None,
            omit_select_inside_exists: true,
        }
    }
}

impl CompilerOptions {
    /// Create a new options builder
    pub fn builder() -> CompilerOptionsBuilder {
        CompilerOptionsBuilder::default()
    }

    pub fn from_toml_str(input: &str) -> CraftResult<Self> {
        toml::from_str(input).map_err(|e| CraftError::config(e.to_string()))
    }
}

/// Builder for CompilerOptions
#[derive(Debug, Default)]
pub struct CompilerOptionsBuilder {
    options: CompilerOptions,
}

impl CompilerOptionsBuilder {
    pub fn legacy_pagination(mut self, enabled: bool) -> Self {
        self.options.legacy_pagination = enabled;
        self
    }

    pub fn no_lock(mut self, enabled: bool) -> Self {
        self.options.no_lock = enabled;
        self
    }

    /// Set the parameter prefix (`"$"`, `":v"`, or `"?"` for positional)
    pub fn parameter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.parameter_prefix = Some(prefix.into());
        self
    }

    pub fn parameter_base(mut self, base: usize) -> Self {
        self.options.parameter_base = base;
        self
    }

    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.table_prefix = Some(prefix.into());
        self
    }

    pub fn omit_select_inside_exists(mut self, enabled: bool) -> Self {
        self.options.omit_select_inside_exists = enabled;
        self
    }

    /// Build the options
    pub fn build(self) -> CompilerOptions {
        self.options
    }
}

/// A dialect plus its options, as read from a TOML file.
///
/// ```toml
/// dialect = "sqlserver"
/// legacy_pagination = true
/// table_prefix = "app_"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default = "default_dialect")]
    pub dialect: String,

    #[serde(flatten)]
    pub options: CompilerOptions,
}

fn default_dialect() -> String {
    Dialect::Generic.code().to_string()
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            options: CompilerOptions::default(),
        }
    }
}

impl CompilerConfig {
    pub fn from_toml_str(input: &str) -> CraftResult<Self> {
        let config: CompilerConfig =
            toml::from_str(input).map_err(|e| CraftError::config(e.to_string()))?;
        // Reject unknown dialects at load time.
        config.dialect()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> CraftResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CraftError::config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loading compiler config");
        Self::from_toml_str(&content)
    }

    pub fn dialect(&self) -> CraftResult<Dialect> {
        self.dialect.parse()
    }
}
