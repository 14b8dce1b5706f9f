//! Text to emission-unit parser.
//!
//! Walks the input with an explicit cursor, one logical unit at a time. A `<`
//! opens a procedural escape that ends at the first following `>`; there is
//! no nesting.

use crate::{tables, MorseCode, MorseError, Result};

/// One step of output produced by [`TextParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionUnit {
    Code(MorseCode),
    WordSpace,
}

/// Lazy parser over an input string.
///
/// Units are yielded as they are recognised so that callers can emit audio
/// for the prefix before a malformed token is reached. The parser stops after
/// the first error.
#[derive(Debug, Clone)]
pub struct TextParser {
    chars: Vec<char>,
    cursor: usize,
    short_numbers: bool,
}

impl TextParser {
    pub fn new(text: &str, short_numbers: bool) -> Self {
        Self {
            chars: text.chars().map(|c| c.to_ascii_uppercase()).collect(),
            cursor: 0,
            short_numbers,
        }
    }

    /// Parses the whole input eagerly.
    pub fn parse(text: &str, short_numbers: bool) -> Result<Vec<EmissionUnit>> {
        Self::new(text, short_numbers).collect()
    }

    fn procedural_escape(&mut self) -> Result<EmissionUnit> {
        let open = self.cursor;
        let close = self.chars[open + 1..]
            .iter()
            .position(|&c| c == '>')
            .map(|offset| open + 1 + offset)
            .ok_or(MorseError::UnterminatedProceduralCharacter)?;

        let name: String = self.chars[open + 1..close].iter().collect();
        let code =
            tables::procedural(&name).ok_or(MorseError::UnknownProceduralCharacter(name))?;
        self.cursor = close + 1;
        Ok(EmissionUnit::Code(code))
    }

    fn next_unit(&mut self) -> Result<EmissionUnit> {
        let c = self.chars[self.cursor];
        if c == '<' {
            return self.procedural_escape();
        }

        let unit = if let Some(code) = tables::character(c, self.short_numbers) {
            EmissionUnit::Code(code)
        } else if c == ' ' {
            EmissionUnit::WordSpace
        } else {
            return Err(MorseError::UnknownCharacter(c));
        };
        self.cursor += 1;
        Ok(unit)
    }
}

impl Iterator for TextParser {
    type Item = Result<EmissionUnit>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.chars.len() {
            return None;
        }

        let unit = self.next_unit();
        if unit.is_err() {
            self.cursor = self.chars.len();
        }
        Some(unit)
    }
}
