use thiserror::Error;

use crate::record::{Row, TableError};

/// A parsed data statement, ready to execute against a table
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Insert(Row),
    Select,
}

/// A parsed `.`-prefixed meta-command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
}

#[derive(Debug, Error, PartialEq)]
pub enum PrepareError {
    #[error("Unrecognized keyword at start of '{0}'.")]
    UnrecognizedStatement(String),

    #[error("Unrecognized command '{0}'.")]
    UnrecognizedMetaCommand(String),

    #[error("Syntax error. Could not parse statement.")]
    SyntaxError,

    #[error("String is too long.")]
    StringTooLong,

    #[error("ID must be positive.")]
    NegativeId,
}

/// Parse a `.`-prefixed input line into a meta-command
pub fn prepare_meta_command(input: &str) -> Result<MetaCommand, PrepareError> {
    match input {
        ".exit" => Ok(MetaCommand::Exit),
        _ => Err(PrepareError::UnrecognizedMetaCommand(input.to_string())),
    }
}

/// Parse an input line into a statement. All argument validation happens
/// here; the storage layer only ever sees well-formed rows.
pub fn prepare_statement(input: &str) -> Result<Statement, PrepareError> {
    let mut tokens = input.split_whitespace();
    match tokens.next() {
        Some("insert") => prepare_insert(tokens),
        Some("select") => Ok(Statement::Select),
        _ => Err(PrepareError::UnrecognizedStatement(input.to_string())),
    }
}

fn prepare_insert<'a>(
    mut tokens: impl Iterator<Item = &'a str>,
) -> Result<Statement, PrepareError> {
    let id = tokens.next().ok_or(PrepareError::SyntaxError)?;
    let username = tokens.next().ok_or(PrepareError::SyntaxError)?;
    let email = tokens.next().ok_or(PrepareError::SyntaxError)?;

    let id: i64 = id.parse().map_err(|_| PrepareError::SyntaxError)?;
    if id < 0 {
        return Err(PrepareError::NegativeId);
    }
    let id = u32::try_from(id).map_err(|_| PrepareError::SyntaxError)?;

    match Row::new(id, username, email) {
        Ok(row) => Ok(Statement::Insert(row)),
        Err(TableError::ValueTooLong { .. }) => Err(PrepareError::StringTooLong),
        Err(_) => Err(PrepareError::SyntaxError),
    }
}
