use crate::config::ConverterConfig;
use crate::core::{converter::IpaConverter, table::MappingTable, types::Conversion};
use crate::document::Lexicon;
use anyhow::{anyhow, Result};
use std::fmt;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

/// A lexicon row the converter can read an IPA pronunciation from and write results back to.
pub trait PronunciationRecord {
    fn ipa(&self) -> Option<&str>;
    fn set_field(&mut self, key: &str, value: &str);
}

/// Totals for one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionReport {
    pub entries: usize,
    pub unmatched_symbols: usize,
    pub unmarked_polysyllables: usize,
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries converted, {} unmatched symbols, {} unmarked polysyllables",
            self.entries, self.unmatched_symbols, self.unmarked_polysyllables
        )
    }
}

// The batch converter owns the table; each entry is converted on its own.
pub struct LexiconConverter {
    table: MappingTable,
    converter: IpaConverter,
}

impl LexiconConverter {
    pub fn new(table: MappingTable) -> Self {
        Self::with_config(table, ConverterConfig::default())
    }

    pub fn with_config(table: MappingTable, config: ConverterConfig) -> Self {
        Self {
            table,
            converter: IpaConverter::with_config(config),
        }
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// NFC-normalizes `ipa` and runs the converter over it.
    pub fn convert_entry(&self, ipa: &str) -> Conversion {
        let ipa: String = ipa.nfc().collect();
        self.converter.convert_detailed(&ipa, &self.table)
    }

    /// Converts every record in order, writing back `ipa` (NFC), `pron` and `provenance`.
    /// A record without `ipa` is a malformed document and stops the batch.
    pub fn convert_records<R: PronunciationRecord>(
        &self,
        records: &mut [R],
    ) -> Result<ConversionReport> {
        let provenance = self.converter.config().provenance.as_str();
        let mut report = ConversionReport::default();

        for (i, record) in records.iter_mut().enumerate() {
            let ipa: String = record
                .ipa()
                .ok_or_else(|| anyhow!("lexicon entry {} has no `ipa` field", i + 1))?
                .nfc()
                .collect();
            let conversion = self.converter.convert_detailed(&ipa, &self.table);
            debug!(ipa = %ipa, pron = %conversion.pron, "converted");

            report.entries += 1;
            report.unmatched_symbols += conversion.unmatched_count();
            if conversion.is_unmarked_polysyllable() {
                report.unmarked_polysyllables += 1;
            }

            record.set_field("ipa", &ipa);
            record.set_field("pron", &conversion.pron);
            record.set_field("provenance", provenance);
        }

        Ok(report)
    }

    pub fn convert_lexicon(&self, lexicon: &mut Lexicon) -> Result<ConversionReport> {
        let report = match lexicon {
            Lexicon::Xml(doc) => self.convert_records(&mut doc.records)?,
            Lexicon::Json(records) => self.convert_records(records)?,
        };
        info!(%report, "lexicon converted");
        Ok(report)
    }
}
