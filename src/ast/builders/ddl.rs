//! Table definition builders.

use crate::ast::clauses::FromClause;
use crate::ast::components::{ClauseKind, Component};
use crate::ast::ddl::{TableColumn, TableExtension, TableKind};
use crate::ast::operators::Method;
use crate::ast::query::Query;
use crate::error::CraftError;

impl Query {
    /// `CREATE TABLE` on the query's table with the given columns.
    pub fn create_table<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = TableColumn>,
    {
        let columns: Vec<TableColumn> = columns.into_iter().collect();
        if columns.iter().filter(|c| c.identity).count() > 1 {
            return self.fail(CraftError::validation(
                "A table can have only one identity column",
            ));
        }
        self.method = Method::CreateTable;
        self = self.clear_component(Component::TableColumn);
        for column in columns {
            self = self.add_component(Component::TableColumn, ClauseKind::TableColumn(column));
        }
        self
    }

    /// `CREATE TABLE ... AS <select>`
    pub fn create_table_as(mut self, query: Query) -> Self {
        self.method = Method::CreateTableAs;
        self.absorb(&query);
        self.replace_component(
            Component::TableSource,
            ClauseKind::From(FromClause::Subquery(Box::new(query))),
        )
    }

    pub fn temporary(self) -> Self {
        self.replace_component(Component::TableKind, ClauseKind::TableKind(TableKind::Temporary))
    }

    /// Oracle/Firebird temporary tables keep their rows after commit.
    pub fn on_commit_preserve_rows(self, preserve: bool) -> Self {
        self.replace_component(
            Component::TableExtension,
            ClauseKind::TableExtension(TableExtension::OnCommitPreserveRows(preserve)),
        )
    }

    pub fn drop_table(mut self) -> Self {
        self.method = Method::DropTable;
        self
    }

    pub fn truncate_table(mut self) -> Self {
        self.method = Method::TruncateTable;
        self
    }
}
