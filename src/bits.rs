//! MSB-first bit sequences: the exchange format between typed values and hardware buffers.
//!
//! A [`BitArray`] always has exactly the width of the type that produced it. Registers and
//! FIFO elements travel through the driver as right-aligned 64-bit words; [`BitArray::to_words`]
//! and [`BitArray::from_words`] convert between the two, and the byte variants serialize
//! those words with the requested [`Endianness`].

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Byte order used when serializing transport words to bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endianness {
    Big,
    Little,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BitsError {
    #[error("invalid bit character {found:?} at index {index}")]
    InvalidDigit { index: usize, found: char },
    #[error("{width} bits do not fit in a {max}-bit integer")]
    TooWide { width: usize, max: usize },
    #[error("buffer holds {available} bits, {needed} needed")]
    BufferTooShort { needed: usize, available: usize },
    #[error("byte buffer length {0} is not a multiple of 8")]
    UnalignedBuffer(usize),
}

/// Fixed-length ordered bits, most significant first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitArray {
    bits: Vec<bool>,
}

impl BitArray {
    pub fn new() -> Self {
        BitArray { bits: Vec::new() }
    }

    pub fn with_capacity(n: usize) -> Self {
        BitArray { bits: Vec::with_capacity(n) }
    }

    pub fn zeros(n: usize) -> Self {
        BitArray { bits: vec![false; n] }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Appends all bits of `other` after the current ones.
    pub fn extend(&mut self, other: &BitArray) {
        self.bits.extend_from_slice(&other.bits);
    }

    /// Copies out `range`. Panics like slice indexing when the range is out of bounds;
    /// callers check lengths before slicing.
    pub fn slice(&self, range: Range<usize>) -> BitArray {
        BitArray { bits: self.bits[range].to_vec() }
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Low `width` bits of `value`, MSB first.
    pub fn from_u128(value: u128, width: usize) -> Result<Self, BitsError> {
        if width > 128 {
            return Err(BitsError::TooWide { width, max: 128 });
        }
        let bits = (0..width).rev().map(|i| (value >> i) & 1 == 1).collect();
        Ok(BitArray { bits })
    }

    /// Unsigned interpretation of the whole array.
    pub fn to_u128(&self) -> Result<u128, BitsError> {
        if self.bits.len() > 128 {
            return Err(BitsError::TooWide { width: self.bits.len(), max: 128 });
        }
        Ok(self.bits.iter().fold(0u128, |acc, &b| (acc << 1) | b as u128))
    }

    /// Right-aligned 64-bit words, most significant word first. Leading pad bits are zero.
    pub fn to_words(&self) -> Vec<u64> {
        let n_words = (self.bits.len() + 63) / 64;
        let pad = n_words * 64 - self.bits.len();
        let mut words = vec![0u64; n_words];
        for (i, &bit) in self.bits.iter().enumerate() {
            if bit {
                let pos = pad + i;
                words[pos / 64] |= 1u64 << (63 - pos % 64);
            }
        }
        words
    }

    /// Inverse of [`BitArray::to_words`]: takes the last `width` bits of `words`.
    /// Pad bits above `width` are ignored (drivers may sign-extend them).
    pub fn from_words(words: &[u64], width: usize) -> Result<Self, BitsError> {
        let available = words.len() * 64;
        if available < width {
            return Err(BitsError::BufferTooShort { needed: width, available });
        }
        let skip = available - width;
        let bits = (skip..available)
            .map(|pos| (words[pos / 64] >> (63 - pos % 64)) & 1 == 1)
            .collect();
        Ok(BitArray { bits })
    }

    /// [`BitArray::to_words`] serialized as 8 bytes per word.
    pub fn to_bytes(&self, endianness: Endianness) -> Vec<u8> {
        let words = self.to_words();
        let mut buf = vec![0u8; words.len() * 8];
        match endianness {
            Endianness::Big => BigEndian::write_u64_into(&words, &mut buf),
            Endianness::Little => LittleEndian::write_u64_into(&words, &mut buf),
        }
        buf
    }

    pub fn from_bytes(
        bytes: &[u8],
        width: usize,
        endianness: Endianness,
    ) -> Result<Self, BitsError> {
        if bytes.len() % 8 != 0 {
            return Err(BitsError::UnalignedBuffer(bytes.len()));
        }
        let mut words = vec![0u64; bytes.len() / 8];
        match endianness {
            Endianness::Big => BigEndian::read_u64_into(bytes, &mut words),
            Endianness::Little => LittleEndian::read_u64_into(bytes, &mut words),
        }
        Self::from_words(&words, width)
    }
}

impl FromIterator<bool> for BitArray {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        BitArray { bits: iter.into_iter().collect() }
    }
}

impl From<Vec<bool>> for BitArray {
    fn from(bits: Vec<bool>) -> Self {
        BitArray { bits }
    }
}

/// Parses `'0'`/`'1'` digits; `'_'` may be used as a visual separator.
impl FromStr for BitArray {
    type Err = BitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bits = Vec::with_capacity(s.len());
        for (index, c) in s.chars().enumerate() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                '_' => {}
                found => return Err(BitsError::InvalidDigit { index, found }),
            }
        }
        Ok(BitArray { bits })
    }
}

impl fmt::Display for BitArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}
