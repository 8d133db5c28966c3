//! `.pts` text parser.
//!
//! # Format
//!
//! ```text
//! 3
//! -0.41025 -2.0806 8.00981 55 52 44 65
//! 0 0 0 5 255 0 0
//! 1 1 1 5 0 255 0
//! ```
//!
//! The first non-blank line is the point count. Each following non-blank
//! line holds `x y z intensity r g b`, whitespace separated. Extra columns are
//! ignored.
//!
//! The count is only a hint for progress reporting. Every row after it is
//! parsed, and a mismatch between the count and the rows found is logged as
//! a warning. A second count line, as left by concatenating two files, is not
//! a valid row and fails the parse.

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use pts_core::RawPointRecord;
use pts_math::Vec3;
use rayon::prelude::*;
use thiserror::Error;

/// Rows between progress log lines.
const PROGRESS_INTERVAL: usize = 500_000;

/// Errors that can occur while parsing a `.pts` file.
#[derive(Error, Debug)]
pub enum PtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No point count found")]
    MissingCount,

    #[error("Invalid point count at line {line}: {value:?}")]
    InvalidCount { line: usize, value: String },

    #[error("Missing {field} value at line {line}")]
    MissingField { line: usize, field: &'static str },

    #[error("Invalid {field} value at line {line}: {value:?}")]
    InvalidValue {
        line: usize,
        field: &'static str,
        value: String,
    },
}

/// Result type for parsing operations.
pub type PtsResult<T> = Result<T, PtsError>;

/// Load and parse a `.pts` file.
pub fn load_pts<P: AsRef<Path>>(path: P) -> PtsResult<Vec<RawPointRecord>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    log::debug!("Read {} bytes from {}", contents.len(), path.display());
    parse_pts(&contents)
}

/// Parse `.pts` text into records, in file order.
pub fn parse_pts(contents: &str) -> PtsResult<Vec<RawPointRecord>> {
    let mut lines = contents
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (count_line, count_str) = lines.next().ok_or(PtsError::MissingCount)?;
    let count: usize = count_str.parse().map_err(|_| PtsError::InvalidCount {
        line: count_line,
        value: count_str.to_string(),
    })?;

    let rows: Vec<(usize, &str)> = lines.collect();
    if rows.len() != count {
        log::warn!(
            "Header declares {} points but {} rows follow; parsing all rows",
            count,
            rows.len()
        );
    }

    let total = rows.len();
    let parsed = AtomicUsize::new(0);
    let points = rows
        .par_iter()
        .map(|&(line, text)| {
            let done = parsed.fetch_add(1, Ordering::Relaxed);
            if done > 0 && done % PROGRESS_INTERVAL == 0 {
                log::debug!("Parsed {}/{} points", done, total);
            }
            parse_row(line, text)
        })
        .collect::<PtsResult<Vec<_>>>()?;

    log::debug!("Parsed {} points", points.len());
    Ok(points)
}

fn parse_row(line: usize, text: &str) -> PtsResult<RawPointRecord> {
    let mut tokens = text.split_whitespace();
    let mut next = |field: &'static str| tokens.next().ok_or(PtsError::MissingField { line, field });

    let x = parse_field::<f32>(line, "x", next("x")?)?;
    let y = parse_field::<f32>(line, "y", next("y")?)?;
    let z = parse_field::<f32>(line, "z", next("z")?)?;
    let intensity = parse_field::<i32>(line, "intensity", next("intensity")?)?;
    let r = parse_field::<u8>(line, "red", next("red")?)?;
    let g = parse_field::<u8>(line, "green", next("green")?)?;
    let b = parse_field::<u8>(line, "blue", next("blue")?)?;

    Ok(RawPointRecord::new(Vec3::new(x, y, z), intensity, [r, g, b]))
}

fn parse_field<N: FromStr>(line: usize, field: &'static str, value: &str) -> PtsResult<N> {
    value.parse().map_err(|_| PtsError::InvalidValue {
        line,
        field,
        value: value.to_string(),
    })
}
