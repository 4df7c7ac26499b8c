// File: src/config.rs
pub const PRIMARY_STRESS: char = '\u{02c8}'; // ˈ
pub const SECONDARY_STRESS: char = '\u{02cc}'; // ˌ
pub const PROVENANCE: &str = "IPA conversion";

/// Knobs shared by the converter and the lexicon layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    pub primary_marker: char,
    pub secondary_marker: char,
    /// Written into the `provenance` field of every converted lexicon record.
    pub provenance: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            primary_marker: PRIMARY_STRESS,
            secondary_marker: SECONDARY_STRESS,
            provenance: PROVENANCE.to_string(),
        }
    }
}
