use std::fmt;

use serde::{Deserialize, Serialize};

/// A loosely typed value from a player row.
///
/// Player rows come straight out of a membership database, so a column may
/// hold a number, a string, a boolean or nothing at all depending on how the
/// row was exported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// True when the cell holds the value `1` (integer, float or `true`).
    ///
    /// The text `"1"` is not one.
    pub fn is_one(&self) -> bool {
        match self {
            Cell::Bool(b) => *b,
            Cell::Int(i) => *i == 1,
            Cell::Float(f) => *f == 1.0,
            Cell::Null | Cell::Text(_) => false,
        }
    }

    /// False for null, `false`, zero and the empty string.
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Null => false,
            Cell::Bool(b) => *b,
            Cell::Int(i) => *i != 0,
            Cell::Float(f) => *f != 0.0,
            Cell::Text(s) => !s.is_empty(),
        }
    }

    /// The display string, or `""` when the cell is not truthy.
    pub fn or_empty(&self) -> String {
        if self.is_truthy() {
            self.to_string()
        } else {
            String::new()
        }
    }

    /// `"YES"` when the cell equals `1`, otherwise `"NO"`.
    pub fn yes_no(&self) -> &'static str {
        if self.is_one() { "YES" } else { "NO" }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Int(i) => write!(f, "{i}"),
            // Whole floats keep their `.0`, as exported spreadsheets show them.
            Cell::Float(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{x:.1}"),
            Cell::Float(x) => write!(f, "{x}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}
