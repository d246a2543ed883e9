//! Four-character packed identifiers.
//!
//! An [`Identifier`] stores one `u32`. The byte view (`b0..b3`, little-endian)
//! and the character view (`c0..c3`) are both computed from it on demand, so
//! the two can never drift apart. The character view is lossy: bytes outside
//! the allowed range read back as [`EMPTY_CHAR`], while the byte view keeps
//! them unchanged.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::CodecError;

/// Character reported for bytes outside the allowed range.
pub const EMPTY_CHAR: char = '\0';

/// Lowest byte rendered as a character (space).
const FIRST_VALID: u8 = 0x20;

/// Highest byte rendered as a character (`z`). `{|}~` and DEL are excluded.
const LAST_VALID: u8 = 0x7A;

/// A 4-character code packed into a little-endian `u32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(u32);

impl Identifier {
    /// The all-zero identifier.
    pub const EMPTY: Self = Self(0);

    /// Wraps a raw 32-bit value.
    #[must_use]
    pub const fn from_int(value: u32) -> Self {
        Self(value)
    }

    /// Packs four characters, `c0` in the least significant byte.
    ///
    /// Characters outside the allowed range are stored as byte `0`.
    #[must_use]
    pub fn from_chars(c0: char, c1: char, c2: char, c3: char) -> Self {
        Self::from_bytes([
            char_to_byte(c0),
            char_to_byte(c1),
            char_to_byte(c2),
            char_to_byte(c3),
        ])
    }

    /// Packs four bytes, `bytes[0]` in the least significant byte.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    /// Returns the raw 32-bit value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the four bytes in little-endian order.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Returns byte `index` (0..4).
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    #[must_use]
    pub const fn byte(self, index: usize) -> u8 {
        self.to_bytes()[index]
    }

    /// Replaces byte `index` (0..4), leaving the others untouched.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    pub fn set_byte(&mut self, index: usize, value: u8) {
        let mut bytes = self.to_bytes();
        bytes[index] = value;
        self.0 = u32::from_le_bytes(bytes);
    }

    /// Returns character `index` (0..4), or [`EMPTY_CHAR`] if the byte is
    /// outside the allowed range.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    #[must_use]
    pub fn char(self, index: usize) -> char {
        byte_to_char(self.byte(index))
    }

    /// Replaces character `index` (0..4). Invalid characters store byte `0`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    pub fn set_char(&mut self, index: usize, value: char) {
        self.set_byte(index, char_to_byte(value));
    }

    /// Byte 0 (least significant).
    #[must_use]
    pub const fn b0(self) -> u8 {
        self.byte(0)
    }

    /// Byte 1.
    #[must_use]
    pub const fn b1(self) -> u8 {
        self.byte(1)
    }

    /// Byte 2.
    #[must_use]
    pub const fn b2(self) -> u8 {
        self.byte(2)
    }

    /// Byte 3 (most significant).
    #[must_use]
    pub const fn b3(self) -> u8 {
        self.byte(3)
    }

    /// Sets byte 0.
    pub fn set_b0(&mut self, value: u8) {
        self.set_byte(0, value);
    }

    /// Sets byte 1.
    pub fn set_b1(&mut self, value: u8) {
        self.set_byte(1, value);
    }

    /// Sets byte 2.
    pub fn set_b2(&mut self, value: u8) {
        self.set_byte(2, value);
    }

    /// Sets byte 3.
    pub fn set_b3(&mut self, value: u8) {
        self.set_byte(3, value);
    }

    /// Character view of byte 0.
    #[must_use]
    pub fn c0(self) -> char {
        self.char(0)
    }

    /// Character view of byte 1.
    #[must_use]
    pub fn c1(self) -> char {
        self.char(1)
    }

    /// Character view of byte 2.
    #[must_use]
    pub fn c2(self) -> char {
        self.char(2)
    }

    /// Character view of byte 3.
    #[must_use]
    pub fn c3(self) -> char {
        self.char(3)
    }

    /// Sets character 0.
    pub fn set_c0(&mut self, value: char) {
        self.set_char(0, value);
    }

    /// Sets character 1.
    pub fn set_c1(&mut self, value: char) {
        self.set_char(1, value);
    }

    /// Sets character 2.
    pub fn set_c2(&mut self, value: char) {
        self.set_char(2, value);
    }

    /// Sets character 3.
    pub fn set_c3(&mut self, value: char) {
        self.set_char(3, value);
    }

    /// Returns `true` if every byte has a character projection.
    #[must_use]
    pub fn is_printable(self) -> bool {
        self.to_bytes().iter().all(|&b| is_valid_byte(b))
    }
}

/// Whether `byte` projects onto a character.
#[must_use]
pub const fn is_valid_byte(byte: u8) -> bool {
    byte >= FIRST_VALID && byte <= LAST_VALID
}

fn byte_to_char(byte: u8) -> char {
    if is_valid_byte(byte) {
        char::from(byte)
    } else {
        EMPTY_CHAR
    }
}

fn char_to_byte(c: char) -> u8 {
    match u8::try_from(c) {
        Ok(b) if is_valid_byte(b) => b,
        _ => 0,
    }
}

impl From<u32> for Identifier {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Identifier> for u32 {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

/// Prints `c3 c2 c1 c0`, skipping empty characters.
impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in (0..4).rev() {
            let c = self.char(index);
            if c != EMPTY_CHAR {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// Parses the display form: up to four characters, the last one landing in
/// byte 0.
impl FromStr for Identifier {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() > 4 {
            return Err(CodecError::invalid_argument(format!(
                "identifier '{s}' is longer than 4 characters"
            )));
        }
        if let Some(bad) = chars.iter().find(|&&c| char_to_byte(c) == 0) {
            return Err(CodecError::invalid_argument(format!(
                "identifier '{s}' contains invalid character {bad:?}"
            )));
        }

        let mut id = Self::EMPTY;
        for (index, &c) in chars.iter().rev().enumerate() {
            id.set_char(index, c);
        }
        Ok(id)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
