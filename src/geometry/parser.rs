//! Line-oriented vertex record parser.
//!
//! Only `v x y z [r g b]` records are data; every other line is ignored.
//! Malformed records are skipped with a [`RecordWarning`] and never abort the
//! parse.

use std::fmt;
use std::io::{self, BufRead};

use glam::DVec3;

use crate::schema::{Color, PointRecord, PointSet};

/// Minimum tokens for a position record (`v x y z`).
const POSITION_TOKENS: usize = 4;
/// Minimum tokens for a colored record (`v x y z r g b`).
const COLOR_TOKENS: usize = 7;

/// Reason a record line was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// Fewer than four tokens on a `v ` line.
    TooFewTokens { found: usize },
    /// A position token is not a finite decimal number.
    InvalidNumber { token: String },
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::TooFewTokens { found } => {
                write!(f, "expected at least {POSITION_TOKENS} tokens, found {found}")
            }
            WarningKind::InvalidNumber { token } => write!(f, "invalid number {token:?}"),
        }
    }
}

/// A skipped record. Non-fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct RecordWarning {
    /// 1-based source line number.
    pub line: usize,
    pub kind: WarningKind,
}

/// Result of parsing one geometry source.
#[derive(Debug, Clone, Default)]
pub struct ParsedGeometry {
    pub points: PointSet,
    pub warnings: Vec<RecordWarning>,
    /// Records whose color tokens failed to parse and fell back to colorless.
    pub degraded_colors: usize,
}

/// Parse a complete text buffer.
pub fn parse_str(text: &str) -> ParsedGeometry {
    parse_lines(text.lines())
}

/// Parse a sequence of lines.
pub fn parse_lines<I, S>(lines: I) -> ParsedGeometry
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = LineParser::default();
    for line in lines {
        parser.feed(line.as_ref());
    }
    parser.finish()
}

/// Parse from a buffered reader. Only I/O failures are errors.
///
/// Lines are decoded one at a time, replacing invalid UTF-8 sequences, so an
/// undecodable byte only affects the line it appears on.
pub fn parse_reader<R: BufRead>(mut reader: R) -> io::Result<ParsedGeometry> {
    let mut parser = LineParser::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        parser.feed(line.trim_end_matches(['\n', '\r']));
    }
    Ok(parser.finish())
}

/// Incremental parser state.
#[derive(Default)]
struct LineParser {
    line_number: usize,
    points: Vec<PointRecord>,
    warnings: Vec<RecordWarning>,
    degraded_colors: usize,
}

impl LineParser {
    fn feed(&mut self, raw: &str) {
        self.line_number += 1;

        let line = raw.trim();
        if !line.starts_with("v ") {
            return;
        }

        let tokens: Vec<&str> = line
            .split([' ', '\t'])
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.len() < POSITION_TOKENS {
            self.warn(WarningKind::TooFewTokens {
                found: tokens.len(),
            });
            return;
        }

        let position = match parse_triple(&tokens[1..4]) {
            Ok([x, y, z]) => DVec3::new(x, y, z),
            Err(token) => {
                self.warn(WarningKind::InvalidNumber {
                    token: token.to_string(),
                });
                return;
            }
        };

        let color = if tokens.len() >= COLOR_TOKENS {
            match parse_triple(&tokens[4..7]) {
                Ok([r, g, b]) => Some(Color::new(r, g, b)),
                Err(token) => {
                    log::debug!(
                        "line {}: color token {:?} invalid, point kept without color",
                        self.line_number,
                        token
                    );
                    self.degraded_colors += 1;
                    None
                }
            }
        } else {
            None
        };

        self.points.push(PointRecord { position, color });
    }

    fn warn(&mut self, kind: WarningKind) {
        let warning = RecordWarning {
            line: self.line_number,
            kind,
        };
        log::warn!("Skipping vertex record: {}", warning);
        self.warnings.push(warning);
    }

    fn finish(self) -> ParsedGeometry {
        let points = PointSet::new(self.points);
        log::debug!(
            "Parsed {} points, {} colored, {} warnings",
            points.len(),
            points.iter().filter(|p| p.has_color()).count(),
            self.warnings.len()
        );
        ParsedGeometry {
            points,
            warnings: self.warnings,
            degraded_colors: self.degraded_colors,
        }
    }
}

/// Parse a locale-independent finite decimal number.
#[inline]
fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse three numeric tokens, returning the first offending token on failure.
fn parse_triple<'a>(tokens: &[&'a str]) -> Result<[f64; 3], &'a str> {
    let mut out = [0.0; 3];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = parse_number(token).ok_or(*token)?;
    }
    Ok(out)
}
