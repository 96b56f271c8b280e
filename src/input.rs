// Interactive order input: symbol and quantity, re-asked until valid.

use std::io::{self, BufRead, Write};

use thiserror::Error;

pub const MAX_SYMBOL_LEN: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid stock symbol. Please enter 1-5 alphabetic characters.")]
    InvalidSymbol,
    #[error("Invalid quantity. Please enter a positive integer.")]
    NonPositiveQuantity,
    #[error("Invalid input. Please enter a valid integer.")]
    NotAnInteger,
    #[error("input closed before a valid value was entered")]
    Eof,
}

/// Returns the upper-cased symbol.
pub fn validate_symbol(raw: &str) -> Result<String, InputError> {
    let symbol = raw.trim();
    if symbol.is_empty() || symbol.len() > MAX_SYMBOL_LEN || !symbol.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(InputError::InvalidSymbol);
    }
    Ok(symbol.to_ascii_uppercase())
}

pub fn parse_quantity(raw: &str) -> Result<i64, InputError> {
    let quantity: i64 = raw.trim().parse().map_err(|_| InputError::NotAnInteger)?;
    if quantity <= 0 {
        return Err(InputError::NonPositiveQuantity);
    }
    Ok(quantity)
}

fn prompt<R, W, T>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
    parse: impl Fn(&str) -> Result<T, InputError>,
) -> anyhow::Result<T>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(writer, "{}", question)?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(InputError::Eof.into());
        }
        match parse(&line) {
            Ok(value) => return Ok(value),
            Err(e) => writeln!(writer, "❌ {}", e)?,
        }
    }
}

pub fn prompt_symbol<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> anyhow::Result<String> {
    prompt(reader, writer, "Enter stock symbol (e.g., AAPL): ", validate_symbol)
}

pub fn prompt_quantity<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> anyhow::Result<i64> {
    prompt(reader, writer, "Enter quantity to buy (Integer): ", parse_quantity)
}

/// Convenience wrappers over the process stdin/stdout.
pub fn ask_symbol() -> anyhow::Result<String> {
    prompt_symbol(&mut io::stdin().lock(), &mut io::stdout())
}

pub fn ask_quantity() -> anyhow::Result<i64> {
    prompt_quantity(&mut io::stdin().lock(), &mut io::stdout())
}
