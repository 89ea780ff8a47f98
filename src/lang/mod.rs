// src/lang/mod.rs

//! Textual command source: turns lines of text into [`Operation`]s.
//!
//! One command per line, whitespace-separated, case-sensitive. Parsing a
//! multi-line input stops at the first bad line and hands back everything
//! parsed before it along with the error.

mod parser;

use crate::ops::Operation;
use std::io::BufRead;
use thiserror::Error;

/// The kind of a [`ParseError`], for callers that only care about the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnknownCommand,
    InvalidParamsCount,
    InvalidParams,
    InvalidCoordinates,
    Io,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: invalid params count for `{command}`: expected {expected}, found {found}")]
    InvalidParamsCount {
        line: usize,
        command: String,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid params: `{token}` is not a finite number")]
    InvalidParams { line: usize, token: String },

    #[error("line {line}: invalid coordinates: {value} is outside [0, 1]")]
    InvalidCoordinates { line: usize, value: f32 },

    #[error("line {line}: failed to read command input")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            ParseError::UnknownCommand { .. } => ParseErrorKind::UnknownCommand,
            ParseError::InvalidParamsCount { .. } => ParseErrorKind::InvalidParamsCount,
            ParseError::InvalidParams { .. } => ParseErrorKind::InvalidParams,
            ParseError::InvalidCoordinates { .. } => ParseErrorKind::InvalidCoordinates,
            ParseError::Io { .. } => ParseErrorKind::Io,
        }
    }

    /// 1-based input line the error refers to. For `Io`, the line that
    /// could not be read.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnknownCommand { line, .. }
            | ParseError::InvalidParamsCount { line, .. }
            | ParseError::InvalidParams { line, .. }
            | ParseError::InvalidCoordinates { line, .. }
            | ParseError::Io { line, .. } => *line,
        }
    }
}

/// Operations parsed before the first error, plus that error.
#[derive(Debug, Error)]
#[error("command parsing stopped after {} operation(s)", .parsed.len())]
pub struct PartialParse {
    pub parsed: Vec<Operation>,
    #[source]
    pub error: ParseError,
}

/// Parser for the painter command language. Stateless.
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Parser
    }

    /// Parse a whole input, one command per line.
    pub fn parse<R: BufRead>(&self, input: R) -> Result<Vec<Operation>, PartialParse> {
        let mut parsed = Vec::new();

        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;
            let result = line
                .map_err(|source| ParseError::Io {
                    line: line_no,
                    source,
                })
                .and_then(|line| self.parse_line(&line, line_no));
            match result {
                Ok(Some(op)) => parsed.push(op),
                Ok(None) => {}
                Err(error) => return Err(PartialParse { parsed, error }),
            }
        }

        Ok(parsed)
    }

    pub fn parse_str(&self, input: &str) -> Result<Vec<Operation>, PartialParse> {
        self.parse(input.as_bytes())
    }

    /// Parse one line. `line_no` is only used in error messages.
    pub fn parse_line(&self, line: &str, line_no: usize) -> Result<Option<Operation>, ParseError> {
        parser::parse_line(line, line_no)
    }
}
