use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::builders::Conditions;
use crate::ast::clauses::FromClause;
use crate::ast::components::{Clause, ClauseKind, Component, ComponentList};
use crate::ast::operators::{JoinKind, Operator};
use crate::ast::query::{Pending, Query, Scope};
use crate::error::CraftError;
use crate::transpiler::Dialect;

/// A join definition.
///
/// A join holds its target under `from` and its ON constraints under
/// `where`, so it shares the condition builders with [`Query`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub components: ComponentList,
    /// Index hint, rendered by dialects that support one.
    #[serde(default)]
    pub index: Option<String>,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<Scope>>,
    #[serde(skip)]
    pub(crate) engine_scope: Option<Dialect>,
    #[serde(skip)]
    pub(crate) pending: Pending,
    #[serde(skip)]
    pub(crate) error: Option<CraftError>,
}

impl Join {
    pub fn new(kind: JoinKind) -> Self {
        Self {
            kind,
            components: ComponentList::new(),
            index: None,
            parent: None,
            engine_scope: None,
            pending: Pending::default(),
            error: None,
        }
    }

    /// A join owned by `query`: same engine scope, sees its variables.
    pub(crate) fn within(query: &Query, kind: JoinKind) -> Self {
        Self {
            parent: Some(query.scope()),
            engine_scope: query.engine_scope,
            ..Self::new(kind)
        }
    }

    pub fn table(self, table: impl Into<String>) -> Self {
        self.target(FromClause::Table(table.into()))
    }

    /// Join a derived table; the subquery's alias names it.
    pub fn subquery(mut self, query: Query) -> Self {
        if self.error.is_none() {
            self.error = match query.alias {
                None => Some(CraftError::structural("No alias found for the joined subquery")),
                Some(_) => query.error.clone(),
            };
        }
        self.target(FromClause::Subquery(Box::new(query)))
    }

    fn target(mut self, from: FromClause) -> Self {
        let clause = Clause::new(Component::From, self.engine_scope, ClauseKind::From(from));
        if let Err(err) = self.components.add_or_replace(clause) {
            self.error.get_or_insert(err);
        }
        self
    }

    pub fn kind(mut self, kind: JoinKind) -> Self {
        self.kind = kind;
        self
    }

    /// `ON first = second`
    pub fn on(self, first: impl AsRef<str>, second: impl AsRef<str>) -> Self {
        self.on_op(first, Operator::Eq, second)
    }

    pub fn or_on(self, first: impl AsRef<str>, second: impl AsRef<str>) -> Self {
        self.or().on(first, second)
    }

    pub fn on_op(self, first: impl AsRef<str>, op: Operator, second: impl AsRef<str>) -> Self {
        self.where_columns(first, op, second)
    }

    pub fn use_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn error(&self) -> Option<&CraftError> {
        self.error.as_ref()
    }

    pub fn get_from(&self, engine: Option<Dialect>) -> Option<&FromClause> {
        self.components
            .get_one(Component::From, engine)
            .and_then(Clause::as_from)
    }
}
