// File: src/core/converter.rs
use crate::config::ConverterConfig;
use crate::core::table::MappingTable;
use crate::core::types::{Conversion, Diagnostic, Stress};
use tracing::warn;

/// Stress bookkeeping for one word while it is being scanned.
#[derive(Debug, Default)]
struct StressState {
    pending: Stress,
    nuclei: usize,
}

impl StressState {
    /// A later marker replaces one that has not been consumed yet.
    fn mark(&mut self, stress: Stress) {
        self.pending = stress;
    }

    fn take_for_nucleus(&mut self) -> Stress {
        self.nuclei += 1;
        std::mem::take(&mut self.pending)
    }
}

/// Greedy longest-match IPA to phone converter with stress assignment.
/// Holds no per-word state, so one instance can serve any number of words.
#[derive(Debug, Clone, Default)]
pub struct IpaConverter {
    config: ConverterConfig,
}

impl IpaConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Converts one NFC-normalized IPA string into a space-separated phone string.
    pub fn convert(&self, ipa: &str, table: &MappingTable) -> String {
        self.convert_detailed(ipa, table).pron
    }

    /// Same as [`convert`](Self::convert) but also hands back the diagnostics.
    pub fn convert_detailed(&self, ipa: &str, table: &MappingTable) -> Conversion {
        let mut tokens: Vec<String> = Vec::new();
        let mut diagnostics = Vec::new();
        let mut state = StressState::default();
        let mut cursor = 0;

        while let Some(c) = ipa[cursor..].chars().next() {
            if c == ' ' {
                cursor += 1;
                continue;
            }
            if c == self.config.primary_marker {
                state.mark(Stress::Primary);
                cursor += c.len_utf8();
                continue;
            }
            if c == self.config.secondary_marker {
                state.mark(Stress::Secondary);
                cursor += c.len_utf8();
                continue;
            }

            match table.longest_match(&ipa[cursor..]) {
                Some((entry, len)) => {
                    let mut token = entry.pron.clone();
                    if entry.nucleus {
                        token.push(state.take_for_nucleus().digit());
                    }
                    tokens.push(token);
                    cursor += len;
                }
                None => {
                    let diagnostic = Diagnostic::UnmatchedSymbol { symbol: c, offset: cursor };
                    warn!(ipa, "{}", diagnostic);
                    diagnostics.push(diagnostic);
                    cursor += c.len_utf8();
                }
            }
        }

        let mut pron = tokens.join(" ");
        // The rules below look at digit characters in the whole output string.
        if state.nuclei == 1 && pron.contains('0') {
            pron = pron.replace('0', "1");
        } else if pron.contains('0') && !pron.contains('1') && !pron.contains('2') {
            pron = pron.replace('0', "");
            let diagnostic = Diagnostic::UnmarkedPolysyllable { ipa: ipa.to_string() };
            warn!("{}", diagnostic);
            diagnostics.push(diagnostic);
        }

        Conversion { pron, diagnostics }
    }
}

/// Converts with the default stress markers.
pub fn convert(ipa: &str, table: &MappingTable) -> String {
    IpaConverter::new().convert(ipa, table)
}
