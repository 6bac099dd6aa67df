//! Clause extractor using nom.
//!
//! Pulls the pieces of a `SELECT` statement out of the query text without
//! building a full grammar. Each clause is located by scanning for the first
//! position where its combinator matches, the way a regex search would.
//!
//! # Recognised shape
//!
//! ```text
//! select nome, email from pedido join cliente on pedido.idcliente = cliente.idcliente where status = 'ok'
//!        ─────┬─────      ──┬───  ─────────────────────┬────────────────────────── ──────────┬───────
//!             │             │                          │                                    │
//!             │             │                          │                                    └── WHERE (up to group by / order by)
//!             │             │                          └── JOINs, each with an optional ON
//!             │             └── Base table
//!             └── SELECT list (verbatim)
//! ```
//!
//! Extraction never fails. Missing pieces come back empty or `None`; the
//! validator decides what is an error.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{anychar, multispace0, multispace1, one_of},
    combinator::{eof, opt, peek, recognize, value},
    multi::many_till,
    sequence::{pair, preceded, tuple},
};

use crate::ast::{JoinClause, ParsedClauses};

/// Extract all clauses from a query. The query is lower-cased first.
pub fn extract(query: &str) -> ParsedClauses {
    let query = query.to_lowercase();

    let projected_columns = find_first(&query, select_list)
        .map(|(_, cols)| cols.trim().to_string())
        .unwrap_or_else(|| "*".to_string());

    let base_table = find_first(&query, from_table)
        .map(|(_, table)| table.to_string())
        .unwrap_or_default();

    let joins = find_all(&query, join_clause);

    let where_condition = find_first(&query, where_body)
        .map(|(_, cond)| cond.trim())
        .filter(|cond| !cond.is_empty())
        .map(str::to_string);

    let clauses = ParsedClauses {
        projected_columns,
        base_table,
        joins,
        where_condition,
    };
    tracing::debug!("Extracted clauses: {:?}", clauses);
    clauses
}

/// Check the minimal `select <something> from <something>` shape.
pub fn has_select_from(query: &str) -> bool {
    find_first(&query.to_lowercase(), select_from_shape).is_some()
}

/// Raw SELECT list of a query, `None` when it cannot be isolated.
pub fn select_list_of(query: &str) -> Option<String> {
    find_first(&query.to_lowercase(), select_list).map(|(_, cols)| cols.to_string())
}

/// Run `parser` at each char boundary of `input` and return the first match.
fn find_first<'a, O, F>(input: &'a str, mut parser: F) -> Option<(&'a str, O)>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    input
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(input.len()))
        .find_map(|start| parser(&input[start..]).ok())
}

/// Collect every non-overlapping match of `parser`, left to right.
fn find_all<'a, O, F>(input: &'a str, mut parser: F) -> Vec<O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    let mut found = Vec::new();
    let mut remaining = input;
    while let Some((rest, out)) = find_first(remaining, &mut parser) {
        found.push(out);
        if rest.len() >= remaining.len() {
            break;
        }
        remaining = rest;
    }
    found
}

/// Parse an identifier (table or column name).
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')(input)
}

/// Exactly one whitespace character.
fn ws_char(input: &str) -> IResult<&str, char> {
    one_of(" \t\r\n")(input)
}

/// `select <ws> (...)` up to the first `<ws> from`.
fn select_list(input: &str) -> IResult<&str, &str> {
    let (input, _) = tag("select")(input)?;
    let (input, _) = ws_char(input)?;
    recognize(many_till(anychar, peek(pair(multispace1, tag("from")))))(input)
}

/// `from <ws> <identifier>`.
fn from_table(input: &str) -> IResult<&str, &str> {
    preceded(pair(tag("from"), multispace1), identifier)(input)
}

/// `join <ws> <identifier> [<ws> on <ws> <condition>]`.
fn join_clause(input: &str) -> IResult<&str, JoinClause> {
    let (input, _) = tag("join")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, table) = identifier(input)?;
    let (input, on) = opt(preceded(
        tuple((multispace1, tag("on"), multispace1)),
        join_condition,
    ))(input)?;

    Ok((
        input,
        JoinClause {
            table: table.to_string(),
            on: on.map(str::to_string),
        },
    ))
}

/// `<operand> <op> <operand>`, kept verbatim.
fn join_condition(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        operand,
        multispace0,
        comparison,
        multispace0,
        operand,
    )))(input)
}

/// `table.column` or a bare identifier.
fn operand(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.'
    })(input)
}

fn comparison(input: &str) -> IResult<&str, &str> {
    alt((
        tag("<="),
        tag(">="),
        tag("<>"),
        tag("!="),
        tag("="),
        tag("<"),
        tag(">"),
    ))(input)
}

/// `where <ws> (...)` up to `group by`, `order by` or end of input.
fn where_body(input: &str) -> IResult<&str, &str> {
    let (input, _) = tag("where")(input)?;
    let (input, _) = ws_char(input)?;
    recognize(many_till(anychar, peek(where_terminator)))(input)
}

fn where_terminator(input: &str) -> IResult<&str, ()> {
    alt((
        value((), tuple((multispace1, tag("group"), multispace1, tag("by")))),
        value((), tuple((multispace1, tag("order"), multispace1, tag("by")))),
        value((), eof),
    ))(input)
}

/// `select <ws> <any>+ <ws> from <ws> <any>+`.
fn select_from_shape(input: &str) -> IResult<&str, ()> {
    let (input, _) = tag("select")(input)?;
    let (input, _) = ws_char(input)?;
    let (input, _) = anychar(input)?;
    let (input, _) = many_till(
        anychar,
        peek(tuple((multispace1, tag("from"), ws_char, anychar))),
    )(input)?;
    Ok((input, ()))
}
