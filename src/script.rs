//! Operation scripts: one array operation per line
//!
//! ```text
//! # comment
//! insert 0 first value
//! append second
//! remove first value
//! read 0
//! print
//! ```

use std::fmt;
use std::io::BufRead;

use bstr::{BString, ByteSlice};

use crate::error::{DynarrError, Result};

/// Script run when no files are given
pub const DEMO_SCRIPT: &str = "\
insert 0 STRING1
append STRING4
insert 0 STRING2
insert 1 STRING3
print
remove STRING3
print
";

/// A single array operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Insert { index: i64, value: BString },
    Append(BString),
    Remove(BString),
    Read(i64),
    Print,
    Grow,
    Len,
}

/// Script name used for the built-in demo
pub const DEMO_ORIGIN: &str = "<demo>";

/// Script name used for standard input
pub const STDIN_ORIGIN: &str = "<stdin>";

/// An operation with the script and line it came from (1-indexed)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub origin: String,
    pub line: usize,
    pub op: Op,
}

impl Op {
    /// Parse one script line; `None` for blank lines and comments
    pub fn parse(line: &[u8]) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with(b"#") {
            return Ok(None);
        }

        let (verb, rest) = split_word(line);
        let op = match verb {
            b"insert" => {
                let (index, value) = split_word(rest);
                Op::Insert {
                    index: parse_index(index)?,
                    value: require_value(value)?,
                }
            }
            b"append" => Op::Append(require_value(rest)?),
            b"remove" => Op::Remove(require_value(rest)?),
            b"read" => Op::Read(parse_index(rest)?),
            b"print" => no_args(Op::Print, rest)?,
            b"grow" => no_args(Op::Grow, rest)?,
            b"len" => no_args(Op::Len, rest)?,
            other => {
                return Err(DynarrError::Syntax(format!(
                    "unknown operation '{}'",
                    other.as_bstr()
                )));
            }
        };

        Ok(Some(op))
    }
}

/// Renders back to script syntax
impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Insert { index, value } => write!(f, "insert {} {}", index, value),
            Op::Append(value) => write!(f, "append {}", value),
            Op::Remove(value) => write!(f, "remove {}", value),
            Op::Read(index) => write!(f, "read {}", index),
            Op::Print => f.write_str("print"),
            Op::Grow => f.write_str("grow"),
            Op::Len => f.write_str("len"),
        }
    }
}

/// Split off the first blank-delimited word
fn split_word(s: &[u8]) -> (&[u8], &[u8]) {
    let s = s.trim_start();
    match s.find_byteset(b" \t") {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, &b""[..]),
    }
}

fn parse_index(word: &[u8]) -> Result<i64> {
    let parse_err = || DynarrError::Syntax(format!("invalid index '{}'", word.as_bstr()));
    if word.is_empty() {
        return Err(DynarrError::Syntax("missing index".to_string()));
    }
    word.to_str()
        .map_err(|_| parse_err())?
        .parse::<i64>()
        .map_err(|_| parse_err())
}

fn require_value(value: &[u8]) -> Result<BString> {
    if value.is_empty() {
        return Err(DynarrError::Syntax("missing value".to_string()));
    }
    Ok(BString::from(value))
}

fn no_args(op: Op, rest: &[u8]) -> Result<Op> {
    if rest.is_empty() {
        Ok(op)
    } else {
        Err(DynarrError::Syntax(format!(
            "unexpected argument '{}'",
            rest.as_bstr()
        )))
    }
}

/// Read and parse every step of a script named `origin`
pub fn read_script<R: BufRead>(mut reader: R, origin: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    let mut buffer = Vec::new();
    let mut line_no = 0;

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line_no += 1;

        // Strip delimiter if present at end
        if buffer.last() == Some(&b'\n') {
            buffer.pop();
        }

        let parsed =
            Op::parse(&buffer).map_err(|e| DynarrError::at_line(origin, line_no, e))?;
        if let Some(op) = parsed {
            steps.push(Step {
                origin: origin.to_string(),
                line: line_no,
                op,
            });
        }
    }

    Ok(steps)
}
