//! Static Morse code tables.
//!
//! Every table is a constant slice of `(key, code)` pairs where the code is a
//! string over `.` and `-`. Lookups expect uppercase keys; callers normalise
//! before asking.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MorseError;

/// A single element of a Morse code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MorseSymbol {
    Dot,
    Dash,
}

/// An immutable dot/dash sequence taken from one of the static tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MorseCode(&'static str);

impl MorseCode {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Number of symbols in the code.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = MorseSymbol> + 'static {
        self.0.bytes().map(|b| match b {
            b'.' => MorseSymbol::Dot,
            _ => MorseSymbol::Dash,
        })
    }
}

impl fmt::Display for MorseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

const LETTERS: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
];

const DIGITS: &[(char, &str)] = &[
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('0', "-----"),
];

// Cut numbers. 4 and 6 keep their full form.
const DIGITS_SHORT: &[(char, &str)] = &[
    ('1', ".-"),
    ('2', "..-"),
    ('3', "...-"),
    ('4', "....-"),
    ('5', "."),
    ('6', "-...."),
    ('7', "-..."),
    ('8', "-.."),
    ('9', "-."),
    ('0', "-"),
];

const PUNCTUATION: &[(char, &str)] = &[
    (',', "--..--"),
    ('?', "..--.."),
    (':', "---..."),
    ('-', "-....-"),
    ('"', ".-..-."),
    ('(', "-.--."),
    ('=', "-...-"),
    ('.', ".-.-.-"),
    (';', "-.-.-."),
    ('/', "-..-."),
    ('\'', ".----."),
    ('_', "..--.-"),
    (')', "-.--.-"),
    ('+', ".-.-."),
    ('@', ".--.-."),
];

const PROCEDURAL: &[(&str, &str)] = &[
    ("AR", ".-.-."),
    ("AS", ".-..."),
    ("BK", "-...-.-"),
    ("EC", ".-.-."),
    ("HH", "........"),
    ("KA", "-.-.-"),
    ("KN", "-.--."),
    ("RT", ".-.-"),
    ("SK", "...-.-"),
    ("SOS", "...---..."),
    ("VE", "...-."),
];

fn find<K: PartialEq + Copy>(table: &[(K, &'static str)], key: K) -> Option<MorseCode> {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, code)| MorseCode(code))
}

/// Looks up an uppercase letter.
pub fn letter(c: char) -> Option<MorseCode> {
    find(LETTERS, c)
}

/// Looks up a digit in the standard table, or in the cut-number table when
/// `short` is set.
pub fn digit(c: char, short: bool) -> Option<MorseCode> {
    find(if short { DIGITS_SHORT } else { DIGITS }, c)
}

pub fn punctuation(c: char) -> Option<MorseCode> {
    find(PUNCTUATION, c)
}

/// Looks up a single character across letters, digits and punctuation.
pub fn character(c: char, short_numbers: bool) -> Option<MorseCode> {
    letter(c)
        .or_else(|| digit(c, short_numbers))
        .or_else(|| punctuation(c))
}

/// Looks up a procedural character by name, ignoring case.
pub fn procedural(name: &str) -> Option<MorseCode> {
    PROCEDURAL
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, code)| MorseCode(code))
}

pub fn letters() -> impl Iterator<Item = (char, MorseCode)> {
    LETTERS.iter().map(|&(c, code)| (c, MorseCode(code)))
}

pub fn digits(short: bool) -> impl Iterator<Item = (char, MorseCode)> {
    let table = if short { DIGITS_SHORT } else { DIGITS };
    table.iter().map(|&(c, code)| (c, MorseCode(code)))
}

pub fn punctuation_marks() -> impl Iterator<Item = (char, MorseCode)> {
    PUNCTUATION.iter().map(|&(c, code)| (c, MorseCode(code)))
}

pub fn procedural_characters() -> impl Iterator<Item = (&'static str, MorseCode)> {
    PROCEDURAL.iter().map(|&(name, code)| (name, MorseCode(code)))
}

/// Named procedural signals with a dedicated encoder shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProceduralSignal {
    EndOfMessage,
    Wait,
    BreakIn,
    EndCopy,
    Correction,
    Attention,
    GoAhead,
    NewLine,
    SilentKey,
    Sos,
    Verified,
}

impl ProceduralSignal {
    pub const ALL: [ProceduralSignal; 11] = [
        Self::EndOfMessage,
        Self::Wait,
        Self::BreakIn,
        Self::EndCopy,
        Self::Correction,
        Self::Attention,
        Self::GoAhead,
        Self::NewLine,
        Self::SilentKey,
        Self::Sos,
        Self::Verified,
    ];

    /// The table name used inside `<...>` escapes.
    pub fn name(self) -> &'static str {
        match self {
            Self::EndOfMessage => "AR",
            Self::Wait => "AS",
            Self::BreakIn => "BK",
            Self::EndCopy => "EC",
            Self::Correction => "HH",
            Self::Attention => "KA",
            Self::GoAhead => "KN",
            Self::NewLine => "RT",
            Self::SilentKey => "SK",
            Self::Sos => "SOS",
            Self::Verified => "VE",
        }
    }

    pub fn code(self) -> MorseCode {
        // Every variant name is present in PROCEDURAL.
        procedural(self.name()).unwrap_or(MorseCode(""))
    }
}

impl FromStr for ProceduralSignal {
    type Err = MorseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|signal| signal.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MorseError::UnknownProceduralCharacter(s.to_ascii_uppercase()))
    }
}

/// Serializable snapshot of every table, keyed by character or name.
#[derive(Debug, Clone, Serialize)]
pub struct Catalogue {
    pub letters: BTreeMap<String, &'static str>,
    pub digits: BTreeMap<String, &'static str>,
    pub digits_short: BTreeMap<String, &'static str>,
    pub punctuation: BTreeMap<String, &'static str>,
    pub procedural: BTreeMap<String, &'static str>,
}

impl Catalogue {
    pub fn new() -> Self {
        fn collect(entries: impl Iterator<Item = (char, MorseCode)>) -> BTreeMap<String, &'static str> {
            entries.map(|(c, code)| (c.to_string(), code.as_str())).collect()
        }

        Self {
            letters: collect(letters()),
            digits: collect(digits(false)),
            digits_short: collect(digits(true)),
            punctuation: collect(punctuation_marks()),
            procedural: procedural_characters()
                .map(|(name, code)| (name.to_string(), code.as_str()))
                .collect(),
        }
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::new()
    }
}
