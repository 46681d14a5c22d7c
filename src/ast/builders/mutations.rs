//! INSERT / UPDATE / DELETE builders.

use crate::ast::clauses::{InsertClause, UpdateClause};
use crate::ast::components::{ClauseKind, Component};
use crate::ast::operators::Method;
use crate::ast::query::Query;
use crate::ast::values::Value;
use crate::error::CraftError;

fn split_pairs<P, S, V>(pairs: P) -> (Vec<String>, Vec<Value>)
where
    P: IntoIterator<Item = (S, V)>,
    S: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(column, value)| (column.into(), value.into()))
        .unzip()
}

impl Query {
    /// Insert one or more rows, e.g. `as_insert(["a", "b"], [[1, 2], [3, 4]])`.
    pub fn as_insert<C, S, R, I, V>(mut self, columns: C, rows: R) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let rows: Vec<Vec<Value>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        if columns.is_empty() || rows.is_empty() {
            return self.fail(CraftError::structural(
                "Columns and values cannot be empty for an insert",
            ));
        }
        if rows.iter().any(|row| row.len() != columns.len()) {
            return self.fail(CraftError::structural(
                "Columns count should be equal to each values count",
            ));
        }

        self.method = Method::Insert;
        self = self.clear_component(Component::Insert);
        for values in rows {
            self = self.add_component(
                Component::Insert,
                ClauseKind::Insert(InsertClause::Values {
                    columns: columns.clone(),
                    values,
                    return_id: false,
                }),
            );
        }
        self
    }

    /// Insert a single row from `(column, value)` pairs.
    pub fn as_insert_row<P, S, V>(self, pairs: P) -> Self
    where
        P: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Value>,
    {
        self.insert_row(pairs, false)
    }

    /// Single-row insert followed by the dialect's last-insert-id query.
    pub fn as_insert_get_id<P, S, V>(self, pairs: P) -> Self
    where
        P: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Value>,
    {
        self.insert_row(pairs, true)
    }

    fn insert_row<P, S, V>(mut self, pairs: P, return_id: bool) -> Self
    where
        P: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Value>,
    {
        let (columns, values) = split_pairs(pairs);
        if columns.is_empty() {
            return self.fail(CraftError::structural(
                "Columns and values cannot be empty for an insert",
            ));
        }
        self.method = Method::Insert;
        self.clear_component(Component::Insert).add_component(
            Component::Insert,
            ClauseKind::Insert(InsertClause::Values {
                columns,
                values,
                return_id,
            }),
        )
    }

    /// `INSERT INTO table (columns) SELECT ...`
    pub fn as_insert_query<C, S>(mut self, columns: C, query: Query) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.method = Method::Insert;
        self.absorb(&query);
        self.clear_component(Component::Insert).add_component(
            Component::Insert,
            ClauseKind::Insert(InsertClause::Query {
                columns: columns.into_iter().map(Into::into).collect(),
                query: Box::new(query),
            }),
        )
    }

    /// `UPDATE table SET col = ?, ...` from `(column, value)` pairs.
    pub fn as_update<P, S, V>(self, pairs: P) -> Self
    where
        P: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<Value>,
    {
        let (columns, values) = split_pairs(pairs);
        self.update_set(columns, values)
    }

    pub fn as_update_columns<C, S, I, V>(self, columns: C, values: I) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if columns.len() != values.len() {
            return self.fail(CraftError::structural(
                "Columns count should be equal to values count",
            ));
        }
        self.update_set(columns, values)
    }

    fn update_set(mut self, columns: Vec<String>, values: Vec<Value>) -> Self {
        if columns.is_empty() {
            return self.fail(CraftError::structural(
                "Columns and values cannot be empty for an update",
            ));
        }
        self.method = Method::Update;
        self.replace_component(
            Component::Update,
            ClauseKind::Update(UpdateClause::Set { columns, values }),
        )
    }

    /// `UPDATE table SET col = col + by`
    pub fn as_increment(mut self, column: impl Into<String>, by: i64) -> Self {
        self.method = Method::Update;
        self.replace_component(
            Component::Update,
            ClauseKind::Update(UpdateClause::Increment {
                column: column.into(),
                value: by,
            }),
        )
    }

    pub fn as_decrement(self, column: impl Into<String>, by: i64) -> Self {
        self.as_increment(column, -by)
    }

    pub fn as_delete(mut self) -> Self {
        self.method = Method::Delete;
        self
    }
}
