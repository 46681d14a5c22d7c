//! Join builders.

use crate::ast::components::{ClauseKind, Component};
use crate::ast::joins::Join;
use crate::ast::operators::JoinKind;
use crate::ast::query::Query;

impl Query {
    /// `INNER JOIN table ON first = second`
    pub fn join(self, table: impl Into<String>, first: impl AsRef<str>, second: impl AsRef<str>) -> Self {
        self.join_with(JoinKind::Inner, table, |j| j.on(first, second))
    }

    pub fn left_join(
        self,
        table: impl Into<String>,
        first: impl AsRef<str>,
        second: impl AsRef<str>,
    ) -> Self {
        self.join_with(JoinKind::Left, table, |j| j.on(first, second))
    }

    pub fn right_join(
        self,
        table: impl Into<String>,
        first: impl AsRef<str>,
        second: impl AsRef<str>,
    ) -> Self {
        self.join_with(JoinKind::Right, table, |j| j.on(first, second))
    }

    pub fn cross_join(self, table: impl Into<String>) -> Self {
        self.join_with(JoinKind::Cross, table, |j| j)
    }

    /// Join `table` with constraints built by `f`.
    pub fn join_with(self, kind: JoinKind, table: impl Into<String>, f: impl FnOnce(Join) -> Join) -> Self {
        let join = f(Join::within(&self, kind).table(table));
        self.push_join(join)
    }

    /// Join a derived table. The subquery must carry an alias.
    pub fn join_query(self, kind: JoinKind, query: Query, f: impl FnOnce(Join) -> Join) -> Self {
        let join = f(Join::within(&self, kind).subquery(query));
        self.push_join(join)
    }

    fn push_join(mut self, join: Join) -> Self {
        if let Some(err) = join.error() {
            return self.fail(err.clone());
        }
        self.take_pending();
        self.add_component(Component::Join, ClauseKind::Join(Box::new(join)))
    }
}
