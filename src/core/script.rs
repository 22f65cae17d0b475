//! Scenario script parser
//!
//! One command per line, `#` starts a comment:
//!
//! ```text
//! spawn 1 at 0 0
//! spawn 2 at 0 12 heading 0 material plate_red
//! couple 1f 2r
//! tick 3
//! activate 1f
//! tick
//! ```

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::types::{CouplerId, CouplingError};

lazy_static! {
    static ref RE_SPAWN: Regex = Regex::new(
        r"(?i)^spawn\s+(\d+)\s+at\s+(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)(?:\s+heading\s+(-?\d+(?:\.\d+)?))?(?:\s+material\s+(\S+))?$"
    ).unwrap();
    static ref RE_DESPAWN: Regex = Regex::new(r"(?i)^despawn\s+(\d+)$").unwrap();
    static ref RE_MOVE: Regex = Regex::new(
        r"(?i)^move\s+(\d+)\s+to\s+(-?\d+(?:\.\d+)?)\s+(-?\d+(?:\.\d+)?)$"
    ).unwrap();
    static ref RE_COUPLE: Regex = Regex::new(r"(?i)^couple\s+(\d+[fr])\s+(\d+[fr])$").unwrap();
    static ref RE_UNCOUPLE: Regex = Regex::new(r"(?i)^uncouple\s+(\d+[fr])$").unwrap();
    static ref RE_ACTIVATE: Regex = Regex::new(r"(?i)^activate\s+(\d+[fr])$").unwrap();
    static ref RE_TICK: Regex = Regex::new(r"(?i)^tick(?:\s+(\d+))?$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Spawn {
        car: u32,
        x: f32,
        z: f32,
        heading: f32,
        material: Option<String>,
    },
    Despawn {
        car: u32,
    },
    Move {
        car: u32,
        x: f32,
        z: f32,
    },
    Couple {
        a: CouplerId,
        b: CouplerId,
    },
    Uncouple {
        coupler: CouplerId,
    },
    Activate {
        coupler: CouplerId,
    },
    Tick {
        count: usize,
    },
}

/// Parse one line. Blank lines and comments yield `None`.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Command>, CouplingError> {
    let text = match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
    .trim();
    if text.is_empty() {
        return Ok(None);
    }

    let command = if let Some(c) = RE_SPAWN.captures(text) {
        Command::Spawn {
            car: number(line_no, &c, 1)?,
            x: number(line_no, &c, 2)?,
            z: number(line_no, &c, 3)?,
            heading: match c.get(4) {
                Some(_) => number(line_no, &c, 4)?,
                None => 0.0,
            },
            material: c.get(5).map(|m| m.as_str().to_string()),
        }
    } else if let Some(c) = RE_DESPAWN.captures(text) {
        Command::Despawn {
            car: number(line_no, &c, 1)?,
        }
    } else if let Some(c) = RE_MOVE.captures(text) {
        Command::Move {
            car: number(line_no, &c, 1)?,
            x: number(line_no, &c, 2)?,
            z: number(line_no, &c, 3)?,
        }
    } else if let Some(c) = RE_COUPLE.captures(text) {
        Command::Couple {
            a: coupler(line_no, &c, 1)?,
            b: coupler(line_no, &c, 2)?,
        }
    } else if let Some(c) = RE_UNCOUPLE.captures(text) {
        Command::Uncouple {
            coupler: coupler(line_no, &c, 1)?,
        }
    } else if let Some(c) = RE_ACTIVATE.captures(text) {
        Command::Activate {
            coupler: coupler(line_no, &c, 1)?,
        }
    } else if let Some(c) = RE_TICK.captures(text) {
        Command::Tick {
            count: match c.get(1) {
                Some(_) => number(line_no, &c, 1)?,
                None => 1,
            },
        }
    } else {
        return Err(CouplingError::script(
            line_no,
            format!("unrecognised command `{}`", text),
        ));
    };
    Ok(Some(command))
}

/// Parse a whole script, keeping 1-based line numbers
pub fn parse_script(text: &str) -> Result<Vec<(usize, Command)>, CouplingError> {
    let mut commands = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(command) = parse_line(i + 1, line)? {
            commands.push((i + 1, command));
        }
    }
    Ok(commands)
}

fn number<T: std::str::FromStr>(line_no: usize, caps: &Captures, idx: usize) -> Result<T, CouplingError> {
    let raw = caps.get(idx).map(|m| m.as_str()).unwrap_or_default();
    raw.parse::<T>()
        .map_err(|_| CouplingError::script(line_no, format!("number out of range `{}`", raw)))
}

fn coupler(line_no: usize, caps: &Captures, idx: usize) -> Result<CouplerId, CouplingError> {
    let raw = caps.get(idx).map(|m| m.as_str()).unwrap_or_default();
    raw.parse::<CouplerId>()
        .map_err(|e| CouplingError::script(line_no, e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
