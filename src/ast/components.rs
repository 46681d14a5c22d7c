//! Ordered clause storage with per-engine overrides.
//!
//! Each clause carries the component it belongs to and an optional engine.
//! A clause without an engine applies to every dialect; a scoped clause only
//! applies when compiling for that dialect and wins over the generic one for
//! singleton components.

use serde::{Deserialize, Serialize};

use crate::ast::clauses::{
    AggregateClause, Column, Combine, FromClause, InsertClause, OrderBy, UpdateClause,
};
use crate::ast::conditions::Condition;
use crate::ast::ddl::{TableColumn, TableExtension, TableKind};
use crate::ast::joins::Join;
use crate::ast::operators::LockMode;
use crate::error::{CraftError, CraftResult};
use crate::transpiler::Dialect;

/// The section of a statement a clause belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Select,
    Aggregate,
    From,
    Join,
    Where,
    Group,
    Having,
    Order,
    Limit,
    Offset,
    Combine,
    Cte,
    Insert,
    Update,
    Lock,
    TableColumn,
    TableKind,
    TableExtension,
    /// Source select of CREATE TABLE AS.
    TableSource,
}

impl Component {
    pub fn name(&self) -> &'static str {
        match self {
            Component::Select => "select",
            Component::Aggregate => "aggregate",
            Component::From => "from",
            Component::Join => "join",
            Component::Where => "where",
            Component::Group => "group",
            Component::Having => "having",
            Component::Order => "order",
            Component::Limit => "limit",
            Component::Offset => "offset",
            Component::Combine => "combine",
            Component::Cte => "cte",
            Component::Insert => "insert",
            Component::Update => "update",
            Component::Lock => "lock",
            Component::TableColumn => "table_column",
            Component::TableKind => "table_kind",
            Component::TableExtension => "table_extension",
            Component::TableSource => "table_source",
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub component: Component,
    pub engine: Option<Dialect>,
    pub kind: ClauseKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClauseKind {
    Condition(Condition),
    From(FromClause),
    Join(Box<Join>),
    Column(Column),
    Order(OrderBy),
    Limit(u64),
    Offset(u64),
    Aggregate(AggregateClause),
    Combine(Combine),
    Insert(InsertClause),
    Update(UpdateClause),
    Lock(LockMode),
    TableColumn(TableColumn),
    TableKind(TableKind),
    TableExtension(TableExtension),
}

impl Clause {
    pub fn new(component: Component, engine: Option<Dialect>, kind: ClauseKind) -> Self {
        Self {
            component,
            engine,
            kind,
        }
    }

    pub fn as_condition(&self) -> Option<&Condition> {
        match &self.kind {
            ClauseKind::Condition(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_from(&self) -> Option<&FromClause> {
        match &self.kind {
            ClauseKind::From(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_join(&self) -> Option<&Join> {
        match &self.kind {
            ClauseKind::Join(j) => Some(j),
            _ => None,
        }
    }

    pub fn as_column(&self) -> Option<&Column> {
        match &self.kind {
            ClauseKind::Column(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_order(&self) -> Option<&OrderBy> {
        match &self.kind {
            ClauseKind::Order(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_aggregate(&self) -> Option<&AggregateClause> {
        match &self.kind {
            ClauseKind::Aggregate(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_combine(&self) -> Option<&Combine> {
        match &self.kind {
            ClauseKind::Combine(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_insert(&self) -> Option<&InsertClause> {
        match &self.kind {
            ClauseKind::Insert(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_update(&self) -> Option<&UpdateClause> {
        match &self.kind {
            ClauseKind::Update(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_lock(&self) -> Option<LockMode> {
        match &self.kind {
            ClauseKind::Lock(mode) => Some(*mode),
            _ => None,
        }
    }

    pub fn as_table_column(&self) -> Option<&TableColumn> {
        match &self.kind {
            ClauseKind::TableColumn(c) => Some(c),
            _ => None,
        }
    }

    /// Value of a limit or offset clause.
    pub fn as_count(&self) -> Option<u64> {
        match &self.kind {
            ClauseKind::Limit(n) | ClauseKind::Offset(n) => Some(*n),
            _ => None,
        }
    }

    fn applies_to(&self, engine: Option<Dialect>) -> bool {
        engine.is_none() || self.engine.is_none() || self.engine == engine
    }
}

/// Ordered list of clauses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentList {
    clauses: Vec<Clause>,
}

impl ComponentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Replace the clause with the same component and engine, or append.
    pub fn add_or_replace(&mut self, clause: Clause) -> CraftResult<()> {
        let matched = self
            .clauses
            .iter()
            .filter(|c| c.component == clause.component && c.engine == clause.engine)
            .count();
        if matched > 1 {
            return Err(CraftError::structural(format!(
                "Cannot replace component '{}': {} clauses match engine {}",
                clause.component,
                matched,
                clause.engine.map_or("generic".to_string(), |e| e.to_string())
            )));
        }
        self.clauses
            .retain(|c| !(c.component == clause.component && c.engine == clause.engine));
        self.clauses.push(clause);
        Ok(())
    }

    /// Clauses of `component` applicable to `engine`. `None` matches every engine.
    pub fn get(
        &self,
        component: Component,
        engine: Option<Dialect>,
    ) -> impl Iterator<Item = &Clause> + '_ {
        self.clauses
            .iter()
            .filter(move |c| c.component == component && c.applies_to(engine))
    }

    /// The engine-scoped clause if present, else the generic one.
    pub fn get_one(&self, component: Component, engine: Option<Dialect>) -> Option<&Clause> {
        let mut generic = None;
        for clause in self.get(component, engine) {
            if clause.engine == engine {
                return Some(clause);
            }
            if generic.is_none() && clause.engine.is_none() {
                generic = Some(clause);
            }
        }
        generic
    }

    pub fn has(&self, component: Component, engine: Option<Dialect>) -> bool {
        self.get(component, engine).next().is_some()
    }

    /// Remove the clauses of `component` scoped exactly to `engine`.
    pub fn remove(&mut self, component: Component, engine: Option<Dialect>) {
        self.clauses
            .retain(|c| !(c.component == component && c.engine == engine));
    }

    /// Remove every clause of `component`, whatever its engine.
    pub fn clear(&mut self, component: Component) {
        self.clauses.retain(|c| c.component != component);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
