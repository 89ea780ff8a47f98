// src/lang/parser.rs

//! Line-oriented parser for the painter command language.
//!
//! ```text
//! white | green | update | reset
//! bgrect x1 y1 x2 y2      (each in [0, 1])
//! figure x y              (each in [0, 1])
//! move dx dy              (any finite value)
//! ```
//!
//! Checks run in a fixed order: command name, parameter count, then each
//! parameter left to right (number first, range second).

use super::ParseError;
use crate::color::Color;
use crate::ops::Operation;

/// Allowed range for a command's numeric parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bounds {
    /// Fractional canvas coordinate, `[0, 1]` inclusive.
    Unit,
    Unrestricted,
}

/// Parses a single line. Blank lines yield `Ok(None)`.
pub(super) fn parse_line(line: &str, line_no: usize) -> Result<Option<Operation>, ParseError> {
    let mut tokens = line.split_whitespace();
    let Some(command) = tokens.next() else {
        return Ok(None);
    };
    let params: Vec<&str> = tokens.collect();

    let op = match command {
        "white" => {
            expect_no_params(command, &params, line_no)?;
            Operation::fill(Color::WHITE)
        }
        "green" => {
            expect_no_params(command, &params, line_no)?;
            Operation::fill(Color::GREEN)
        }
        "update" => {
            expect_no_params(command, &params, line_no)?;
            Operation::RenderTrigger
        }
        "reset" => {
            expect_no_params(command, &params, line_no)?;
            Operation::Reset
        }
        "bgrect" => {
            let [x1, y1, x2, y2] = parse_params::<4>(command, &params, Bounds::Unit, line_no)?;
            Operation::background_rect(x1, y1, x2, y2)
        }
        "figure" => {
            let [x, y] = parse_params::<2>(command, &params, Bounds::Unit, line_no)?;
            Operation::figure(x, y)
        }
        "move" => {
            let [dx, dy] = parse_params::<2>(command, &params, Bounds::Unrestricted, line_no)?;
            Operation::move_by(dx, dy)
        }
        _ => {
            return Err(ParseError::UnknownCommand {
                line: line_no,
                command: command.to_string(),
            })
        }
    };

    Ok(Some(op))
}

fn expect_no_params(command: &str, params: &[&str], line_no: usize) -> Result<(), ParseError> {
    parse_params::<0>(command, params, Bounds::Unrestricted, line_no).map(|_| ())
}

fn parse_params<const N: usize>(
    command: &str,
    params: &[&str],
    bounds: Bounds,
    line_no: usize,
) -> Result<[f32; N], ParseError> {
    if params.len() != N {
        return Err(ParseError::InvalidParamsCount {
            line: line_no,
            command: command.to_string(),
            expected: N,
            found: params.len(),
        });
    }

    let mut values = [0.0f32; N];
    for (value, token) in values.iter_mut().zip(params) {
        let parsed = token
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseError::InvalidParams {
                line: line_no,
                token: token.to_string(),
            })?;

        if bounds == Bounds::Unit && !(0.0..=1.0).contains(&parsed) {
            return Err(ParseError::InvalidCoordinates {
                line: line_no,
                value: parsed,
            });
        }
        *value = parsed;
    }

    Ok(values)
}
