//! Fluent builder methods for [`Query`](crate::ast::Query).

mod combine;
pub mod conditions;
mod ddl;
mod joins;
mod mutations;
mod select;

pub use conditions::Conditions;
