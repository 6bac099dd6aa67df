//! Relational-algebra transpiler.
//!
//! Renders [`RelExpr`] trees (or clauses, via [`RelExpr::from_clauses`]) as
//! text. Two notations are supported:
//!
//! | Operator | Unicode          | LaTeX                  |
//! |----------|------------------|------------------------|
//! | π        | `π[cols](e)`     | `\pi_{cols}(e)`        |
//! | σ        | `σ[cond](e)`     | `\sigma_{cond}(e)`     |
//! | ⋈        | `(l ⋈[cond] r)`  | `(l \bowtie_{cond} r)` |
//! | ×        | `(l × r)`        | `(l \times r)`         |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::algebra::RelExpr;
use crate::ast::ParsedClauses;
use crate::error::RelalgError;

/// Output notation for algebra expressions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    #[default]
    Unicode,
    Latex,
}

impl FromStr for Notation {
    type Err = RelalgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unicode" => Ok(Self::Unicode),
            "latex" | "tex" => Ok(Self::Latex),
            other => Err(RelalgError::InvalidNotation(other.to_string())),
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Unicode => write!(f, "unicode"),
            Notation::Latex => write!(f, "latex"),
        }
    }
}

/// Trait for converting nodes to relational-algebra text.
pub trait ToAlgebra {
    /// Render in the given notation.
    fn to_algebra_with(&self, notation: Notation) -> String;

    /// Render with Unicode operators.
    fn to_algebra(&self) -> String {
        self.to_algebra_with(Notation::Unicode)
    }

    /// Render with LaTeX operators.
    fn to_latex(&self) -> String {
        self.to_algebra_with(Notation::Latex)
    }
}

impl ToAlgebra for RelExpr {
    fn to_algebra_with(&self, notation: Notation) -> String {
        let mut out = String::new();
        write_expr(self, notation, &mut out);
        out
    }
}

impl ToAlgebra for ParsedClauses {
    fn to_algebra_with(&self, notation: Notation) -> String {
        RelExpr::from_clauses(self).to_algebra_with(notation)
    }
}

impl fmt::Display for RelExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebra())
    }
}

fn write_expr(expr: &RelExpr, notation: Notation, out: &mut String) {
    match expr {
        RelExpr::Relation { name } => out.push_str(name),
        RelExpr::ThetaJoin {
            left,
            condition,
            right,
        } => {
            out.push('(');
            write_expr(left, notation, out);
            match notation {
                Notation::Unicode => out.push_str(&format!(" ⋈[{}] ", condition)),
                Notation::Latex => out.push_str(&format!(" \\bowtie_{{{}}} ", condition)),
            }
            write_expr(right, notation, out);
            out.push(')');
        }
        RelExpr::Product { left, right } => {
            out.push('(');
            write_expr(left, notation, out);
            out.push_str(match notation {
                Notation::Unicode => " × ",
                Notation::Latex => " \\times ",
            });
            write_expr(right, notation, out);
            out.push(')');
        }
        RelExpr::Selection { condition, input } => {
            match notation {
                Notation::Unicode => out.push_str(&format!("σ[{}](", condition)),
                Notation::Latex => out.push_str(&format!("\\sigma_{{{}}}(", condition)),
            }
            write_expr(input, notation, out);
            out.push(')');
        }
        RelExpr::Projection { columns, input } => {
            match notation {
                Notation::Unicode => out.push_str(&format!("π[{}](", columns)),
                Notation::Latex => out.push_str(&format!("\\pi_{{{}}}(", columns)),
            }
            write_expr(input, notation, out);
            out.push(')');
        }
    }
}
