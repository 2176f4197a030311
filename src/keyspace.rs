//! Keyspace indexing
//!
//! Maps every index in `[0, |A|^L)` to exactly one candidate of length `L`
//! using a base-`|A|` positional encoding, most significant symbol first.

use std::ops::RangeInclusive;

use crate::charset::Alphabet;
use crate::error::{Result, SearchError};

/// Number of candidates of exactly `length` symbols over `base` symbols
pub fn combinations(base: usize, length: usize) -> Result<u64> {
    let exponent = u32::try_from(length).map_err(|_| SearchError::KeyspaceOverflow { base, length })?;

    (base as u64)
        .checked_pow(exponent)
        .ok_or(SearchError::KeyspaceOverflow { base, length })
}

/// Decode `index` into a candidate of `length` symbols.
///
/// Indices at or above `|A|^length` wrap; only the low `length` digits are used.
pub fn encode(index: u64, length: usize, alphabet: &Alphabet) -> String {
    let mut encoder = CandidateEncoder::new(alphabet, length);
    encoder.encode(index).to_string()
}

/// Inverse of [`encode`]. `None` if a symbol is outside the alphabet or the index overflows.
pub fn decode(candidate: &str, alphabet: &Alphabet) -> Option<u64> {
    let base = alphabet.len() as u64;

    candidate.chars().try_fold(0u64, |acc, c| {
        let digit = alphabet.position(c)? as u64;
        acc.checked_mul(base)?.checked_add(digit)
    })
}

/// Reusable encoder for the worker hot loop
pub struct CandidateEncoder<'a> {
    alphabet: &'a Alphabet,
    symbols: Vec<char>,
    text: String,
}

impl<'a> CandidateEncoder<'a> {
    pub fn new(alphabet: &'a Alphabet, length: usize) -> Self {
        Self {
            alphabet,
            symbols: vec![alphabet.symbol(0); length],
            text: String::with_capacity(length * 4),
        }
    }

    pub fn length(&self) -> usize {
        self.symbols.len()
    }

    /// Decode `index` into the internal buffer
    #[inline]
    pub fn encode(&mut self, mut index: u64) -> &str {
        let base = self.alphabet.len() as u64;

        // Least significant digit fills the last position
        for slot in self.symbols.iter_mut().rev() {
            *slot = self.alphabet.symbol((index % base) as usize);
            index /= base;
        }

        self.text.clear();
        self.text.extend(self.symbols.iter());
        &self.text
    }
}

/// Alphabet plus the inclusive length bound
#[derive(Debug, Clone)]
pub struct SearchSpace {
    alphabet: Alphabet,
    max_length: usize,
    total: u64,
}

impl SearchSpace {
    pub fn new(alphabet: Alphabet, max_length: usize) -> Result<Self> {
        if alphabet.is_empty() {
            return Err(SearchError::EmptyAlphabet);
        }
        if max_length == 0 {
            return Err(SearchError::InvalidMaxLength);
        }

        let base = alphabet.len();
        let mut total: u64 = 0;
        for length in 1..=max_length {
            total = total
                .checked_add(combinations(base, length)?)
                .ok_or(SearchError::KeyspaceOverflow { base, length })?;
        }

        Ok(Self {
            alphabet,
            max_length,
            total,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Lengths in search order, shortest first
    pub fn lengths(&self) -> RangeInclusive<usize> {
        1..=self.max_length
    }

    /// Candidates of exactly `length` symbols
    pub fn combinations(&self, length: usize) -> u64 {
        // Bounded by the total checked in `new`
        (self.alphabet.len() as u64).pow(length as u32)
    }

    /// Candidates across every length
    pub fn total_candidates(&self) -> u64 {
        self.total
    }
}
