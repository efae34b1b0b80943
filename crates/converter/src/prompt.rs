//! Interactive prompts.
//!
//! Parsing is kept in pure functions; the loops only move lines between the
//! reader and writer they are given, so tests drive them with in-memory
//! buffers instead of a terminal.

use std::io::{self, BufRead, Write};
use std::num::NonZeroU32;
use thiserror::Error;

/// Reasons a typed height is rejected. Messages are shown to the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeightError {
    #[error("Please enter a number.")]
    NotANumber,

    #[error("Please enter a height greater than zero.")]
    NotPositive,

    #[error("Please enter a smaller height.")]
    TooLarge,
}

/// Parses a target height, ignoring surrounding whitespace.
pub fn parse_height(input: &str) -> Result<NonZeroU32, HeightError> {
    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| HeightError::NotANumber)?;

    if value <= 0 {
        return Err(HeightError::NotPositive);
    }

    u32::try_from(value)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(HeightError::TooLarge)
}

/// Only a lone `y`, in either case and with any surrounding whitespace, counts.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Asks for a target height until a valid one is entered.
///
/// # Errors
/// Returns `UnexpectedEof` if the input ends before a valid height arrives,
/// plus any IO error from reading or writing.
pub fn prompt_target_height<R, W>(input: &mut R, out: &mut W) -> io::Result<NonZeroU32>
where
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(out, "Enter the height of the converted video (e.g. 480)")?;
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for a height",
            ));
        }

        match parse_height(&line) {
            Ok(height) => {
                writeln!(out)?;
                return Ok(height);
            }
            Err(e) => {
                writeln!(out, "{}", e)?;
                writeln!(out)?;
            }
        }
    }
}

/// Asks whether to start audio extraction. End of input counts as "no".
pub fn confirm_extraction<R, W>(input: &mut R, out: &mut W) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    write!(out, "Start audio extraction? (y/n): ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let confirmed = is_affirmative(&line);
    if confirmed {
        writeln!(out)?;
    }
    Ok(confirmed)
}
