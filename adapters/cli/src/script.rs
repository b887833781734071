//! Line-oriented click scripts replayed by the command-line adapter.
//!
//! ```text
//! # select the red piece and move it next to the tower
//! click 6 7
//! click 5 7
//! point 900.5 700
//! board
//! ```

use diplomacy_core::Position;
use glam::Vec2;
use thiserror::Error;

/// Single instruction read from a script.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ScriptStep {
    /// Primary click on a board cell.
    Click(Position),
    /// Primary click at a pixel position on the virtual board.
    Point(Vec2),
    /// Print the board without interacting.
    Board,
}

/// Step together with the 1-based line it was read from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ScriptLine {
    pub(crate) number: usize,
    pub(crate) step: ScriptStep,
}

/// Errors raised while parsing a script.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    #[error("line {line}: unknown step `{keyword}`")]
    UnknownStep { line: usize, keyword: String },
    #[error("line {line}: `{keyword}` expects {expected} arguments, found {found}")]
    ArgumentCount {
        line: usize,
        keyword: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: `{value}` is not a valid {kind}")]
    InvalidNumber {
        line: usize,
        value: String,
        kind: &'static str,
    },
}

/// Parses a whole script, skipping blank lines and `#` comments.
pub(crate) fn parse(source: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut lines = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let number = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let step = parse_step(number, content)?;
        lines.push(ScriptLine { number, step });
    }
    Ok(lines)
}

fn parse_step(line: usize, content: &str) -> Result<ScriptStep, ScriptError> {
    let mut words = content.split_whitespace();
    let keyword = words.next().unwrap_or_default();
    let arguments: Vec<&str> = words.collect();

    match keyword {
        "click" => {
            expect_arguments(line, "click", &arguments, 2)?;
            let row = parse_number::<u32>(line, arguments[0], "cell index")?;
            let column = parse_number::<u32>(line, arguments[1], "cell index")?;
            Ok(ScriptStep::Click(Position::new(row, column)))
        }
        "point" => {
            expect_arguments(line, "point", &arguments, 2)?;
            let x = parse_number::<f32>(line, arguments[0], "coordinate")?;
            let y = parse_number::<f32>(line, arguments[1], "coordinate")?;
            Ok(ScriptStep::Point(Vec2::new(x, y)))
        }
        "board" => {
            expect_arguments(line, "board", &arguments, 0)?;
            Ok(ScriptStep::Board)
        }
        other => Err(ScriptError::UnknownStep {
            line,
            keyword: other.to_owned(),
        }),
    }
}

fn expect_arguments(
    line: usize,
    keyword: &'static str,
    arguments: &[&str],
    expected: usize,
) -> Result<(), ScriptError> {
    if arguments.len() == expected {
        Ok(())
    } else {
        Err(ScriptError::ArgumentCount {
            line,
            keyword,
            expected,
            found: arguments.len(),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    line: usize,
    value: &str,
    kind: &'static str,
) -> Result<T, ScriptError> {
    value.parse().map_err(|_| ScriptError::InvalidNumber {
        line,
        value: value.to_owned(),
        kind,
    })
}
