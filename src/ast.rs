//! Clauses pulled out of a SELECT statement.
//!
//! These are plain strings, kept verbatim (lower-cased) from the query text.
//! Nothing here is validated; see [`crate::validator`].

use serde::{Deserialize, Serialize};

/// A `JOIN <table> [ON <left> <op> <right>]` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinClause {
    pub table: String,
    /// Verbatim ON condition. `None` means a cartesian product.
    #[serde(default)]
    pub on: Option<String>,
}

impl JoinClause {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            on: None,
        }
    }

    pub fn on(mut self, condition: impl Into<String>) -> Self {
        self.on = Some(condition.into());
        self
    }
}

/// Everything the extractor found in one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedClauses {
    /// Raw SELECT list, e.g. `"nome, cliente.email"` or `"*"`.
    pub projected_columns: String,
    /// FROM table. Empty when no identifier follows `from`.
    pub base_table: String,
    /// JOIN clauses in textual order.
    pub joins: Vec<JoinClause>,
    pub where_condition: Option<String>,
}

impl Default for ParsedClauses {
    fn default() -> Self {
        Self {
            projected_columns: "*".to_string(),
            base_table: String::new(),
            joins: Vec::new(),
            where_condition: None,
        }
    }
}

impl ParsedClauses {
    /// Create clauses for `SELECT * FROM <table>`.
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            base_table: table.into(),
            ..Self::default()
        }
    }

    /// Set the SELECT list.
    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.projected_columns = columns.into();
        self
    }

    /// Append a join clause.
    pub fn join(mut self, join: JoinClause) -> Self {
        self.joins.push(join);
        self
    }

    /// Set the WHERE condition.
    pub fn filter(mut self, condition: impl Into<String>) -> Self {
        self.where_condition = Some(condition.into());
        self
    }

    /// Base table followed by joined tables, in textual order, duplicates kept.
    pub fn referenced_tables(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.base_table.as_str())
            .filter(|t| !t.is_empty())
            .chain(self.joins.iter().map(|j| j.table.as_str()))
    }
}
