//! Query pipeline: extract, validate, translate.
//!
//! The translator only runs on queries the validator accepted.

use serde::Serialize;

use crate::algebra::RelExpr;
use crate::parser;
use crate::schema::Schema;
use crate::transpiler::{Notation, ToAlgebra};
use crate::validator::{ValidationError, Validator};

/// Converts SQL text to relational algebra against an injected schema.
#[derive(Debug, Clone)]
pub struct Engine {
    schema: Schema,
    notation: Notation,
}

/// Report for one evaluated query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub query: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algebra: Option<String>,
    pub errors: Vec<String>,
}

impl Engine {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            notation: Notation::default(),
        }
    }

    /// Set the output notation.
    pub fn notation(mut self, notation: Notation) -> Self {
        self.notation = notation;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn validator(&self) -> Validator<'_> {
        Validator::new(&self.schema)
    }

    /// Validate a query and, if it is valid, build its algebra tree.
    pub fn plan(&self, query: &str) -> Result<RelExpr, Vec<ValidationError>> {
        self.validator().validate(query)?;
        Ok(RelExpr::from_clauses(&parser::extract(query)))
    }

    /// Validate a query and, if it is valid, render its algebra expression.
    pub fn convert(&self, query: &str) -> Result<String, Vec<ValidationError>> {
        self.plan(query)
            .map(|expr| expr.to_algebra_with(self.notation))
    }

    /// Evaluate a query into a printable report.
    pub fn evaluate(&self, query: &str) -> Outcome {
        match self.convert(query) {
            Ok(algebra) => {
                tracing::debug!("Accepted query: {}", algebra);
                Outcome {
                    query: query.to_string(),
                    valid: true,
                    algebra: Some(algebra),
                    errors: Vec::new(),
                }
            }
            Err(errors) => {
                tracing::debug!("Rejected query with {} error(s)", errors.len());
                Outcome {
                    query: query.to_string(),
                    valid: false,
                    algebra: None,
                    errors: errors.iter().map(|e| e.to_string()).collect(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_valid() {
        let engine = Engine::new(Schema::store());
        assert_eq!(
            engine.convert("select nome, email from cliente").unwrap(),
            "π[nome, email](cliente)"
        );
    }

    #[test]
    fn test_convert_latex() {
        let engine = Engine::new(Schema::store()).notation(Notation::Latex);
        assert_eq!(
            engine.convert("select nome from cliente where idcliente = 1").unwrap(),
            "\\pi_{nome}(\\sigma_{idcliente = 1}(cliente))"
        );
    }

    #[test]
    fn test_invalid_query_is_not_translated() {
        let engine = Engine::new(Schema::store());
        let outcome = engine.evaluate("select x from naotabela");
        assert!(!outcome.valid);
        assert_eq!(outcome.algebra, None);
        assert_eq!(
            outcome.errors,
            vec!["table 'naotabela' does not exist in the schema"]
        );
    }

    #[test]
    fn test_outcome_json() {
        let engine = Engine::new(Schema::store());
        let json = serde_json::to_value(engine.evaluate("select nome from cliente")).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["algebra"], "π[nome](cliente)");
        assert!(json["errors"].as_array().unwrap().is_empty());
    }
}
