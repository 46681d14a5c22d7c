pub mod builders;
pub mod clauses;
pub mod components;
pub mod conditions;
pub mod ddl;
pub mod joins;
pub mod operators;
pub mod query;
pub mod values;

pub use self::builders::Conditions;
pub use self::clauses::{AggregateClause, Column, Combine, FromClause, InsertClause, OrderBy, UpdateClause};
pub use self::components::{Clause, ClauseKind, Component, ComponentList};
pub use self::conditions::{Condition, ConditionKind};
pub use self::ddl::{DataType, TableColumn, TableExtension, TableKind};
pub use self::joins::Join;
pub use self::operators::{
    AggregateFunc, DatePart, JoinKind, LockMode, Method, Operator, SetOp, StringMatch,
};
pub use self::query::{Pending, Query, Scope};
pub use self::values::Value;
