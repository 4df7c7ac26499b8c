// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the IPA -> phone mapping.
/// `ipa` is always stored in NFC form once it has passed through the table builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub ipa: String,
    pub pron: String,
    /// True when the phone can carry lexical stress (a syllable nucleus).
    pub nucleus: bool,
}

impl MappingEntry {
    pub fn new(ipa: &str, pron: &str, nucleus: bool) -> Self {
        Self {
            ipa: ipa.to_string(),
            pron: pron.to_string(),
            nucleus,
        }
    }
}

/// Lexical stress carried by a nucleus token, rendered as a digit suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stress {
    #[default]
    Unmarked,
    Primary,
    Secondary,
}

impl Stress {
    pub fn digit(self) -> char {
        match self {
            Stress::Unmarked => '0',
            Stress::Primary => '1',
            Stress::Secondary => '2',
        }
    }
}

/// Recoverable problems found while converting a single pronunciation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A code point with no mapping; it was skipped.
    UnmatchedSymbol { symbol: char, offset: usize },
    /// Several nuclei and no stress marks at all; the placeholder digits were stripped.
    UnmarkedPolysyllable { ipa: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnmatchedSymbol { symbol, offset } => write!(
                f,
                "could not match symbol '{}' (U+{:04X}) at byte offset {}",
                symbol, *symbol as u32, offset
            ),
            Diagnostic::UnmarkedPolysyllable { ipa } => {
                write!(f, "polysyllabic word with no stress markers found - {}", ipa)
            }
        }
    }
}

/// Output of one engine run: the phone string plus whatever it had to warn about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Conversion {
    pub pron: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Conversion {
    pub fn unmatched_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::UnmatchedSymbol { .. }))
            .count()
    }

    pub fn is_unmarked_polysyllable(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UnmarkedPolysyllable { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stress_digits() {
        assert_eq!(Stress::default().digit(), '0');
        assert_eq!(Stress::Primary.digit(), '1');
        assert_eq!(Stress::Secondary.digit(), '2');
    }

    #[test]
    fn test_unmatched_display_names_code_point() {
        let d = Diagnostic::UnmatchedSymbol { symbol: 'ʔ', offset: 3 };
        assert_eq!(d.to_string(), "could not match symbol 'ʔ' (U+0294) at byte offset 3");
    }
}
