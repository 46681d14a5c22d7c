use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CraftError;

/// The statement a query compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Method {
    #[default]
    Select,
    /// Aggregate over the select (`as_count`, `as_sum`, ...)
    Aggregate,
    Insert,
    Update,
    Delete,
    CreateTable,
    CreateTableAs,
    DropTable,
    TruncateTable,
}

impl Method {
    pub fn is_ddl(&self) -> bool {
        matches!(
            self,
            Method::CreateTable | Method::CreateTableAs | Method::DropTable | Method::TruncateTable
        )
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Select => write!(f, "select"),
            Method::Aggregate => write!(f, "aggregate"),
            Method::Insert => write!(f, "insert"),
            Method::Update => write!(f, "update"),
            Method::Delete => write!(f, "delete"),
            Method::CreateTable => write!(f, "create_table"),
            Method::CreateTableAs => write!(f, "create_table_as"),
            Method::DropTable => write!(f, "drop_table"),
            Method::TruncateTable => write!(f, "truncate_table"),
        }
    }
}

/// Comparison operators accepted in conditions.
///
/// Parsing from text is whitelisted: anything not listed here is rejected
/// with [`CraftError::InvalidOperator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Equal (=)
    Eq,
    /// Not equal (<>)
    Ne,
    /// Not equal (!=)
    NotEq,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// Null-safe equal (<=>, MySQL)
    NullSafeEq,
    Like,
    NotLike,
    /// Case-insensitive LIKE (Postgres)
    ILike,
    NotILike,
    /// Regular expression match (MySQL)
    Regexp,
    NotRegexp,
    /// SIMILAR TO (Postgres)
    SimilarTo,
    NotSimilarTo,
}

impl Operator {
    /// Returns the SQL symbol/keyword for this operator.
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::NullSafeEq => "<=>",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::ILike => "ILIKE",
            Operator::NotILike => "NOT ILIKE",
            Operator::Regexp => "REGEXP",
            Operator::NotRegexp => "NOT REGEXP",
            Operator::SimilarTo => "SIMILAR TO",
            Operator::NotSimilarTo => "NOT SIMILAR TO",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql_symbol())
    }
}

impl FromStr for Operator {
    type Err = CraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        match normalized.as_str() {
            "=" => Ok(Operator::Eq),
            "<>" => Ok(Operator::Ne),
            "!=" => Ok(Operator::NotEq),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Gte),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Lte),
            "<=>" => Ok(Operator::NullSafeEq),
            "like" => Ok(Operator::Like),
            "not like" => Ok(Operator::NotLike),
            "ilike" => Ok(Operator::ILike),
            "not ilike" => Ok(Operator::NotILike),
            "regexp" | "rlike" => Ok(Operator::Regexp),
            "not regexp" | "not rlike" => Ok(Operator::NotRegexp),
            "similar to" => Ok(Operator::SimilarTo),
            "not similar to" => Ok(Operator::NotSimilarTo),
            _ => Err(CraftError::InvalidOperator(s.to_string())),
        }
    }
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunc {
    /// Lowercase name, used as the result column alias.
    pub fn alias(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "count",
            AggregateFunc::Sum => "sum",
            AggregateFunc::Avg => "avg",
            AggregateFunc::Min => "min",
            AggregateFunc::Max => "max",
        }
    }
}

impl std::fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateFunc::Count => write!(f, "COUNT"),
            AggregateFunc::Sum => write!(f, "SUM"),
            AggregateFunc::Avg => write!(f, "AVG"),
            AggregateFunc::Min => write!(f, "MIN"),
            AggregateFunc::Max => write!(f, "MAX"),
        }
    }
}

/// Join Type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// Set operation type for combining queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOp {
    Union,
    Intersect,
    Except,
}

impl SetOp {
    pub fn keyword(&self) -> &'static str {
        match self {
            SetOp::Union => "UNION",
            SetOp::Intersect => "INTERSECT",
            SetOp::Except => "EXCEPT",
        }
    }
}

/// Row lock requested by a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockMode {
    Update,
    Share,
}

/// Date or time component compared by a date condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatePart {
    Date,
    Time,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl DatePart {
    pub fn keyword(&self) -> &'static str {
        match self {
            DatePart::Date => "DATE",
            DatePart::Time => "TIME",
            DatePart::Year => "YEAR",
            DatePart::Month => "MONTH",
            DatePart::Day => "DAY",
            DatePart::Hour => "HOUR",
            DatePart::Minute => "MINUTE",
            DatePart::Second => "SECOND",
        }
    }
}

/// Pattern shape for string conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StringMatch {
    /// Pattern used verbatim
    Like,
    /// `value%`
    Starts,
    /// `%value`
    Ends,
    /// `%value%`
    Contains,
}

impl StringMatch {
    pub fn pattern(&self, value: &str) -> String {
        match self {
            StringMatch::Like => value.to_string(),
            StringMatch::Starts => format!("{}%", value),
            StringMatch::Ends => format!("%{}", value),
            StringMatch::Contains => format!("%{}%", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_whitelist() {
        assert_eq!("=".parse::<Operator>(), Ok(Operator::Eq));
        assert_eq!("NOT  LIKE".parse::<Operator>(), Ok(Operator::NotLike));
        assert_eq!("similar to".parse::<Operator>(), Ok(Operator::SimilarTo));
        assert_eq!(
            "; drop table users".parse::<Operator>(),
            Err(CraftError::InvalidOperator("; drop table users".into()))
        );
    }

    #[test]
    fn test_string_patterns() {
        assert_eq!(StringMatch::Starts.pattern("ab"), "ab%");
        assert_eq!(StringMatch::Ends.pattern("ab"), "%ab");
        assert_eq!(StringMatch::Contains.pattern("ab"), "%ab%");
        assert_eq!(StringMatch::Like.pattern("a_b"), "a_b");
    }
}
