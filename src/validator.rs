//! Schema validator for extracted SELECT clauses.
//!
//! Checks run in a fixed order and stop at the first failing category:
//! query shape, table collection, table existence, column extraction,
//! column existence. Within the table and column categories every
//! violation is collected before returning.
//!
//! Column checks are not join-aware: a projected column passes if any
//! referenced table declares it.

use thiserror::Error;

use crate::ast::ParsedClauses;
use crate::parser;
use crate::schema::Schema;

/// Broad category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    UnknownTable,
    UnknownColumn,
}

/// A single problem found in a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("query must contain SELECT and FROM")]
    MissingSelectFrom,

    #[error("no table found in the FROM/JOIN clauses")]
    NoTables,

    #[error("could not extract columns from the SELECT clause")]
    UnreadableSelectList,

    #[error("table '{table}' does not exist in the schema")]
    UnknownTable { table: String },

    #[error(
        "column '{column}' not found in any of the referenced tables ({})",
        .searched.join(", ")
    )]
    UnknownColumn {
        column: String,
        searched: Vec<String>,
    },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSelectFrom | Self::NoTables | Self::UnreadableSelectList => {
                ErrorKind::Syntax
            }
            Self::UnknownTable { .. } => ErrorKind::UnknownTable,
            Self::UnknownColumn { .. } => ErrorKind::UnknownColumn,
        }
    }
}

/// Result of validation.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Validates queries against a borrowed schema.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'s> {
    schema: &'s Schema,
}

impl<'s> Validator<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Validate raw query text.
    pub fn validate(&self, query: &str) -> ValidationResult {
        if !parser::has_select_from(query) {
            return Err(vec![ValidationError::MissingSelectFrom]);
        }

        let clauses = parser::extract(query);
        let tables = self.check_tables(&clauses)?;
        match parser::select_list_of(query) {
            Some(list) => self.check_columns(&list, &tables),
            None => Err(vec![ValidationError::UnreadableSelectList]),
        }
    }

    /// Validate pre-extracted clauses (everything after the shape check).
    pub fn validate_clauses(&self, clauses: &ParsedClauses) -> ValidationResult {
        let tables = self.check_tables(clauses)?;
        self.check_columns(&clauses.projected_columns, &tables)
    }

    fn check_columns(&self, select_list: &str, tables: &[&str]) -> ValidationResult {
        if select_list.trim().is_empty() {
            return Err(vec![ValidationError::UnreadableSelectList]);
        }

        let mut errors = Vec::new();
        for column in projected_column_names(select_list) {
            let found = tables.iter().any(|t| {
                self.schema
                    .table(t)
                    .is_some_and(|table| table.has_column(column))
            });
            if !found {
                errors.push(ValidationError::UnknownColumn {
                    column: column.to_string(),
                    searched: tables.iter().map(|t| t.to_string()).collect(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!("Column validation failed: {:?}", errors);
            Err(errors)
        }
    }

    /// Collect the distinct referenced tables and check each exists.
    fn check_tables<'c>(
        &self,
        clauses: &'c ParsedClauses,
    ) -> Result<Vec<&'c str>, Vec<ValidationError>> {
        let mut tables: Vec<&str> = Vec::new();
        for table in clauses.referenced_tables() {
            if !tables.contains(&table) {
                tables.push(table);
            }
        }
        tracing::debug!("Referenced tables: {:?}", tables);

        if tables.is_empty() {
            return Err(vec![ValidationError::NoTables]);
        }

        let errors: Vec<ValidationError> = tables
            .iter()
            .filter(|t| !self.schema.contains_table(t))
            .map(|t| ValidationError::UnknownTable {
                table: t.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(tables)
        } else {
            Err(errors)
        }
    }
}

/// Split a SELECT list into bare column names, dropping `*` and any
/// `table.` qualifier.
pub fn projected_column_names(select_list: &str) -> impl Iterator<Item = &str> {
    select_list
        .split(',')
        .map(|piece| piece.rsplit('.').next().unwrap_or(piece).trim())
        .filter(|col| *col != "*")
}
