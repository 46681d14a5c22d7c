//! The `Query` value and its core mutation plumbing.
//!
//! Builder methods live in `ast::builders`; this module owns the storage,
//! the engine scope, pending `or`/`not` modifiers, variable scopes and the
//! sticky builder error.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ast::clauses::FromClause;
use crate::ast::components::{Clause, ClauseKind, Component, ComponentList};
use crate::ast::operators::Method;
use crate::ast::values::Value;
use crate::error::{CraftError, CraftResult};
use crate::transpiler::Dialect;

/// Modifiers consumed by the next condition-adding call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pending {
    pub or: bool,
    pub not: bool,
}

/// Read-only snapshot of an ancestor's variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    variables: IndexMap<String, Value>,
    parent: Option<Arc<Scope>>,
}

impl Scope {
    pub fn new(variables: IndexMap<String, Value>, parent: Option<Arc<Scope>>) -> Self {
        Self { variables, parent }
    }

    pub fn own(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Walk this scope and its ancestors.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(value) = current.variables.get(name) {
                return Some(value);
            }
            scope = current.parent.as_deref();
        }
        None
    }
}

/// A statement under construction.
///
/// # Example
///
/// ```
/// use sqlcraft::prelude::*;
///
/// let query = Query::table("users")
///     .select(["id", "email"])
///     .where_eq("status", "active")
///     .limit(10);
///
/// let result = Compiler::new(Dialect::Postgres).compile(&query).unwrap();
/// assert_eq!(
///     result.sql,
///     r#"SELECT "id", "email" FROM "users" WHERE "status" = @p0 LIMIT @p1"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub components: ComponentList,
    pub method: Method,
    pub distinct: bool,
    pub alias: Option<String>,
    pub variables: IndexMap<String, Value>,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<Scope>>,
    #[serde(skip)]
    pub(crate) engine_scope: Option<Dialect>,
    #[serde(skip)]
    pub(crate) pending: Pending,
    #[serde(skip)]
    pub(crate) error: Option<CraftError>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a select from `table` (may be `"table as alias"`).
    pub fn table(table: impl Into<String>) -> Self {
        Self::new().from(table)
    }

    pub fn from(self, table: impl Into<String>) -> Self {
        self.replace_component(Component::From, ClauseKind::From(FromClause::Table(table.into())))
    }

    /// Select from a derived table. The subquery's alias names it.
    pub fn from_query(mut self, query: Query) -> Self {
        self.absorb(&query);
        self.replace_component(Component::From, ClauseKind::From(FromClause::Subquery(Box::new(query))))
    }

    pub fn from_raw<I, V>(self, expression: impl Into<String>, bindings: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.replace_component(
            Component::From,
            ClauseKind::From(FromClause::Raw {
                alias: None,
                expression: expression.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
            }),
        )
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    // ---- Variables ----

    /// Define a variable usable as `Value::var(name)` here and in children.
    pub fn define(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Look a variable up here, then in the ancestor snapshots.
    pub fn resolve(&self, name: &str) -> CraftResult<&Value> {
        self.variables
            .get(name)
            .or_else(|| self.parent.as_deref().and_then(|p| p.lookup(name)))
            .ok_or_else(|| CraftError::UndefinedVariable(name.to_string()))
    }

    /// Snapshot of this query's variables for a child builder.
    pub(crate) fn scope(&self) -> Arc<Scope> {
        Arc::new(Scope::new(self.variables.clone(), self.parent.clone()))
    }

    /// A fresh query that inherits the engine scope and sees this query's variables.
    pub fn child(&self) -> Query {
        Query {
            parent: Some(self.scope()),
            engine_scope: self.engine_scope,
            ..Query::default()
        }
    }

    // ---- Engine scope and modifiers ----

    /// Scope every clause added inside `f` to `engine`.
    pub fn for_engine(mut self, engine: Dialect, f: impl FnOnce(Self) -> Self) -> Self {
        let previous = self.engine_scope.replace(engine);
        let mut query = f(self);
        query.engine_scope = previous;
        query
    }

    pub fn engine_scope(&self) -> Option<Dialect> {
        self.engine_scope
    }

    /// Join the next condition with OR.
    pub fn or(mut self) -> Self {
        self.pending.or = true;
        self
    }

    /// Negate the next condition.
    pub fn not(mut self) -> Self {
        self.pending.not = !self.pending.not;
        self
    }

    pub(crate) fn take_pending(&mut self) -> Pending {
        std::mem::take(&mut self.pending)
    }

    // ---- Sticky error ----

    /// First error recorded by a builder step, returned by `compile`.
    pub fn error(&self) -> Option<&CraftError> {
        self.error.as_ref()
    }

    pub(crate) fn fail(mut self, err: CraftError) -> Self {
        if self.error.is_none() {
            tracing::debug!(error = %err, "query builder recorded error");
            self.error = Some(err);
        }
        self
    }

    /// Carry a nested query's error up to this one.
    pub(crate) fn absorb(&mut self, other: &Query) {
        if self.error.is_none() {
            self.error = other.error.clone();
        }
    }

    // ---- Component plumbing ----

    pub fn add_component(mut self, component: Component, kind: ClauseKind) -> Self {
        if self.error.is_some() {
            return self;
        }
        self.components.add(Clause::new(component, self.engine_scope, kind));
        self
    }

    pub fn replace_component(mut self, component: Component, kind: ClauseKind) -> Self {
        if self.error.is_some() {
            return self;
        }
        match self
            .components
            .add_or_replace(Clause::new(component, self.engine_scope, kind))
        {
            Ok(()) => self,
            Err(err) => self.fail(err),
        }
    }

    pub fn clear_component(mut self, component: Component) -> Self {
        self.components.clear(component);
        self
    }

    pub fn has_component(&self, component: Component, engine: Option<Dialect>) -> bool {
        self.components.has(component, engine)
    }

    pub fn get_limit(&self, engine: Option<Dialect>) -> u64 {
        self.components
            .get_one(Component::Limit, engine)
            .and_then(Clause::as_count)
            .unwrap_or(0)
    }

    pub fn get_offset(&self, engine: Option<Dialect>) -> u64 {
        self.components
            .get_one(Component::Offset, engine)
            .and_then(Clause::as_count)
            .unwrap_or(0)
    }

    pub fn has_offset(&self, engine: Option<Dialect>) -> bool {
        self.get_offset(engine) > 0
    }

    pub fn has_limit(&self, engine: Option<Dialect>) -> bool {
        self.get_limit(engine) > 0
    }

    /// Main FROM clause for `engine`.
    pub fn get_from(&self, engine: Option<Dialect>) -> Option<&FromClause> {
        self.components
            .get_one(Component::From, engine)
            .and_then(Clause::as_from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_resolve_through_parents() {
        let root = Query::table("users").define("status", "active");
        let child = root.child().define("role", "admin");
        let grandchild = child.child();

        assert_eq!(grandchild.resolve("status"), Ok(&Value::from("active")));
        assert_eq!(grandchild.resolve("role"), Ok(&Value::from("admin")));
        assert_eq!(
            grandchild.resolve("missing"),
            Err(CraftError::UndefinedVariable("missing".into()))
        );
    }

    #[test]
    fn test_child_shadows_parent() {
        let root = Query::new().define("x", 1);
        let child = root.child().define("x", 2);
        assert_eq!(child.resolve("x"), Ok(&Value::Int(2)));
    }

    #[test]
    fn test_for_engine_restores_scope() {
        let query = Query::table("t")
            .for_engine(Dialect::MySQL, |q| {
                assert_eq!(q.engine_scope(), Some(Dialect::MySQL));
                q.limit(3)
            })
            .offset(1);

        assert_eq!(query.engine_scope(), None);
        assert_eq!(query.get_limit(Some(Dialect::MySQL)), 3);
        assert_eq!(query.get_limit(Some(Dialect::Postgres)), 0);
        assert_eq!(query.get_offset(Some(Dialect::Postgres)), 1);
    }

    #[test]
    fn test_first_error_is_kept() {
        let query = Query::new()
            .fail(CraftError::structural("first"))
            .fail(CraftError::structural("second"));
        assert_eq!(query.error(), Some(&CraftError::structural("first")));
    }
}
