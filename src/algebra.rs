//! Relational-algebra expression tree.

use serde::Serialize;

use crate::ast::ParsedClauses;

/// A relational-algebra expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RelExpr {
    /// A base relation (table name).
    Relation { name: String },
    /// `left ⋈[condition] right`
    ThetaJoin {
        left: Box<RelExpr>,
        condition: String,
        right: Box<RelExpr>,
    },
    /// `left × right`
    Product {
        left: Box<RelExpr>,
        right: Box<RelExpr>,
    },
    /// `σ[condition](input)`
    Selection {
        condition: String,
        input: Box<RelExpr>,
    },
    /// `π[columns](input)`
    Projection {
        columns: String,
        input: Box<RelExpr>,
    },
}

impl RelExpr {
    pub fn relation(name: impl Into<String>) -> Self {
        Self::Relation { name: name.into() }
    }

    pub fn theta_join(self, condition: impl Into<String>, right: RelExpr) -> Self {
        Self::ThetaJoin {
            left: Box::new(self),
            condition: condition.into(),
            right: Box::new(right),
        }
    }

    pub fn product(self, right: RelExpr) -> Self {
        Self::Product {
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    pub fn select(self, condition: impl Into<String>) -> Self {
        Self::Selection {
            condition: condition.into(),
            input: Box::new(self),
        }
    }

    pub fn project(self, columns: impl Into<String>) -> Self {
        Self::Projection {
            columns: columns.into(),
            input: Box::new(self),
        }
    }

    /// Build the expression for validated clauses, innermost first:
    /// joins left to right in textual order, then the WHERE selection,
    /// then the projection. No rewriting or condition merging happens.
    pub fn from_clauses(clauses: &ParsedClauses) -> Self {
        let mut expr = Self::relation(&clauses.base_table);

        for join in &clauses.joins {
            let right = Self::relation(&join.table);
            expr = match &join.on {
                Some(condition) => expr.theta_join(condition, right),
                None => expr.product(right),
            };
        }

        if let Some(condition) = &clauses.where_condition {
            expr = expr.select(condition);
        }

        let expr = expr.project(&clauses.projected_columns);
        tracing::debug!("Built algebra tree: {:?}", expr);
        expr
    }
}

impl From<&ParsedClauses> for RelExpr {
    fn from(clauses: &ParsedClauses) -> Self {
        Self::from_clauses(clauses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::JoinClause;

    #[test]
    fn test_single_table() {
        let clauses = ParsedClauses::from_table("cliente").columns("nome");
        assert_eq!(
            RelExpr::from_clauses(&clauses),
            RelExpr::relation("cliente").project("nome")
        );
    }

    #[test]
    fn test_empty_base_table_is_kept() {
        let clauses = ParsedClauses::from_table("")
            .columns("nome")
            .join(JoinClause::new("cliente"));
        assert_eq!(
            RelExpr::from_clauses(&clauses),
            RelExpr::relation("")
                .product(RelExpr::relation("cliente"))
                .project("nome")
        );
    }

    #[test]
    fn test_joins_nest_left_associatively() {
        let clauses = ParsedClauses::from_table("a")
            .join(JoinClause::new("b").on("a.x=b.y"))
            .join(JoinClause::new("c"))
            .filter("a.z > 1");
        let expected = RelExpr::relation("a")
            .theta_join("a.x=b.y", RelExpr::relation("b"))
            .product(RelExpr::relation("c"))
            .select("a.z > 1")
            .project("*");
        assert_eq!(RelExpr::from(&clauses), expected);
    }
}
