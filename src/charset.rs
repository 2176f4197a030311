//! Charset module
//!
//! Preset candidate alphabets and the ordered, duplicate-free `Alphabet` the
//! keyspace is enumerated over.

use log::warn;
use std::fmt;

use crate::error::{Result, SearchError};

pub const DIGITS: &str = "0123456789";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const ALPHANUMERIC: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const PRINTABLE: &str = " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// Preset charsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Digits,
    Lowercase,
    Alphanumeric,
    Printable,
}

impl Charset {
    /// Resolve a name ("lowercase", "alnum") or menu number ("2")
    pub fn from_identifier(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "1" | "digits" | "numeric" => Some(Self::Digits),
            "2" | "lowercase" | "lower" => Some(Self::Lowercase),
            "3" | "alphanumeric" | "alnum" => Some(Self::Alphanumeric),
            "4" | "printable" | "all" => Some(Self::Printable),
            _ => None,
        }
    }

    /// Resolve an identifier, substituting digits on unknown input.
    ///
    /// Returns the charset and whether a substitution happened.
    pub fn resolve_or_default(id: &str) -> (Self, bool) {
        match Self::from_identifier(id) {
            Some(charset) => (charset, false),
            None => (Self::default(), true),
        }
    }

    pub fn resolve_strict(id: &str) -> Result<Self> {
        Self::from_identifier(id).ok_or_else(|| SearchError::UnknownCharset(id.to_string()))
    }

    pub fn symbols(&self) -> &'static str {
        match self {
            Self::Digits => DIGITS,
            Self::Lowercase => LOWERCASE,
            Self::Alphanumeric => ALPHANUMERIC,
            Self::Printable => PRINTABLE,
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        Alphabet {
            symbols: self.symbols().chars().collect(),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Digits => "digits",
            Self::Lowercase => "lowercase",
            Self::Alphanumeric => "alphanumeric",
            Self::Printable => "printable",
        };
        f.write_str(name)
    }
}

/// Ordered sequence of unique symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from a custom string.
    ///
    /// Repeated symbols keep their first position; an empty string is rejected.
    pub fn new(symbols: &str) -> Result<Self> {
        let mut unique: Vec<char> = Vec::with_capacity(symbols.len());
        for c in symbols.chars() {
            if !unique.contains(&c) {
                unique.push(c);
            }
        }

        if unique.is_empty() {
            return Err(SearchError::EmptyAlphabet);
        }

        let dropped = symbols.chars().count() - unique.len();
        if dropped > 0 {
            warn!("Dropped {} duplicate symbol(s) from custom charset", dropped);
        }

        Ok(Self { symbols: unique })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn symbol(&self, position: usize) -> char {
        self.symbols[position]
    }

    pub fn position(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&c| c == symbol)
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.symbols {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_sizes() {
        assert_eq!(Charset::Digits.alphabet().len(), 10);
        assert_eq!(Charset::Lowercase.alphabet().len(), 26);
        assert_eq!(Charset::Alphanumeric.alphabet().len(), 62);
        assert_eq!(Charset::Printable.alphabet().len(), 95);
    }

    #[test]
    fn test_presets_have_unique_symbols() {
        for charset in [Charset::Digits, Charset::Lowercase, Charset::Alphanumeric, Charset::Printable] {
            let alphabet = Alphabet::new(charset.symbols()).unwrap();
            assert_eq!(alphabet, charset.alphabet(), "{} has duplicates", charset);
        }
    }

    #[test]
    fn test_identifier_resolution() {
        assert_eq!(Charset::from_identifier("2"), Some(Charset::Lowercase));
        assert_eq!(Charset::from_identifier(" Alnum "), Some(Charset::Alphanumeric));
        assert_eq!(Charset::resolve_or_default("hex"), (Charset::Digits, true));
        assert_eq!(Charset::resolve_or_default("printable"), (Charset::Printable, false));
        assert!(Charset::resolve_strict("hex").is_err());
    }

    #[test]
    fn test_custom_alphabet_dedup() {
        let alphabet = Alphabet::new("abcabcd").unwrap();
        assert_eq!(alphabet.to_string(), "abcd");
        assert_eq!(alphabet.position('d'), Some(3));
        assert_eq!(alphabet.position('z'), None);
    }

    #[test]
    fn test_custom_alphabet_unicode() {
        let alphabet = Alphabet::new("äöü").unwrap();
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.symbol(1), 'ö');
    }

    #[test]
    fn test_empty_alphabet_rejected() {
        assert!(matches!(Alphabet::new(""), Err(SearchError::EmptyAlphabet)));
    }
}
