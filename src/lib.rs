//! # relalg — SQL to relational algebra
//!
//! Validates a small subset of SQL `SELECT` statements against a fixed
//! schema and translates valid ones into relational-algebra expressions.
//!
//! ## Quick Example
//!
//! ```
//! use relalg::prelude::*;
//!
//! let engine = Engine::new(Schema::store());
//! let algebra = engine.convert("select nome, email from cliente").unwrap();
//! assert_eq!(algebra, "π[nome, email](cliente)");
//! ```
//!
//! ## Pipeline
//!
//! | Stage      | Module        | Output                        |
//! |------------|---------------|-------------------------------|
//! | Extract    | [`parser`]    | [`ast::ParsedClauses`]        |
//! | Validate   | [`validator`] | `Result<(), Vec<ValidationError>>` |
//! | Translate  | [`transpiler`]| algebra text (`π`, `σ`, `⋈`, `×`) |

pub mod algebra;
pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod schema;
pub mod transpiler;
pub mod validator;

pub mod prelude {
    pub use crate::algebra::RelExpr;
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::engine::{Engine, Outcome};
    pub use crate::error::*;
    pub use crate::schema::{Schema, Table};
    pub use crate::transpiler::{Notation, ToAlgebra};
    pub use crate::validator::{ErrorKind, ValidationError, ValidationResult, Validator};
}

/// Extract the clauses of a SQL query.
///
/// # Example
///
/// ```
/// let clauses = relalg::extract("SELECT nome FROM cliente");
/// assert_eq!(clauses.base_table, "cliente");
/// ```
pub fn extract(query: &str) -> ast::ParsedClauses {
    parser::extract(query)
}

