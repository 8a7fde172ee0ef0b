//! A1-style cell addresses

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Location of one cell, stored as 0-based row and column.
///
/// A1 text is 1-based: `E1` is `{ row: 0, col: 4 }`. `$` markers are
/// accepted when parsing and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub row: u32,
    /// A = 0, XFD = 16383
    pub col: u16,
}

impl CellAddress {
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse `E1`, `e1`, `$E$1` and friends
    ///
    /// ```
    /// use grade_sheets_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("E1").unwrap();
    /// assert_eq!((addr.row, addr.col), (0, 4));
    ///
    /// let addr = CellAddress::parse("$B$2").unwrap();
    /// assert_eq!((addr.row, addr.col), (1, 1));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        let body = text.strip_prefix('$').unwrap_or(text);

        let split = body
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(body.len());
        let (letters, rest) = body.split_at(split);
        let digits = rest.strip_prefix('$').unwrap_or(rest);

        if letters.is_empty() || digits.is_empty() {
            return Err(Error::InvalidAddress(text.to_string()));
        }

        let col = Self::letters_to_column(letters)?;
        let row_number: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(text.to_string()))?;

        match row_number {
            0 => Err(Error::InvalidAddress(text.to_string())),
            n if n > MAX_ROWS => Err(Error::RowOutOfBounds(n - 1, MAX_ROWS - 1)),
            n => Ok(Self::new(n - 1, col)),
        }
    }

    /// 0 -> "A", 25 -> "Z", 26 -> "AA"
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::new();
        let mut n = col as u32 + 1;

        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }

        letters.iter().rev().map(|&b| b as char).collect()
    }

    /// "A" -> 0, "aa" -> 26; anything past XFD is out of bounds
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::InvalidAddress(letters.to_string()));
        }

        let number = letters.bytes().try_fold(0u32, |acc, b| {
            let next = acc * 26 + (b.to_ascii_uppercase() - b'A') as u32 + 1;
            if next > MAX_COLS as u32 {
                None
            } else {
                Some(next)
            }
        });

        match number {
            Some(n) => Ok((n - 1) as u16),
            None => Err(Error::ColumnOutOfBounds(MAX_COLS, MAX_COLS - 1)),
        }
    }

    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
