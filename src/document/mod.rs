// src/document/mod.rs
//! Reading and writing the mapping and lexicon files.

pub mod json;
pub mod xml;

use crate::core::table::{MappingTable, TableBuilder};
use crate::persistence::{load_table, write_atomically};
use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

use self::json::JsonRecord;
use self::xml::XmlDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Xml,
    Json,
    /// A mapping table saved by `persistence::save_table`.
    Snapshot,
}

impl DocumentFormat {
    /// Picks the format from the file extension; anything unknown is XML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("bin") => DocumentFormat::Snapshot,
            _ => DocumentFormat::Xml,
        }
    }
}

/// A parsed lexicon, kept in its source format so it can be written back unchanged
/// apart from the converted fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Lexicon {
    Xml(XmlDocument),
    Json(Vec<JsonRecord>),
}

impl Lexicon {
    pub fn len(&self) -> usize {
        match self {
            Lexicon::Xml(doc) => doc.records.len(),
            Lexicon::Json(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn format(&self) -> DocumentFormat {
        match self {
            Lexicon::Xml(_) => DocumentFormat::Xml,
            Lexicon::Json(_) => DocumentFormat::Json,
        }
    }

    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self> {
        match format {
            DocumentFormat::Xml => Ok(Lexicon::Xml(XmlDocument::parse(content)?)),
            DocumentFormat::Json => Ok(Lexicon::Json(json::parse_lexicon(content)?)),
            DocumentFormat::Snapshot => bail!("a lexicon cannot be read from a table snapshot"),
        }
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        match self {
            Lexicon::Xml(doc) => doc.write_to(writer),
            Lexicon::Json(records) => {
                serde_json::to_writer_pretty(&mut writer, records)?;
                writer.write_all(b"\n")?;
                Ok(())
            }
        }
    }
}

/// Builds the mapping table from XML or JSON text.
pub fn parse_mapping(content: &str, format: DocumentFormat) -> Result<MappingTable> {
    let mut builder = TableBuilder::new();
    match format {
        DocumentFormat::Xml => {
            let doc = XmlDocument::parse(content)?;
            for (i, record) in doc.records.iter().enumerate() {
                let ipa = record
                    .get("ipa")
                    .ok_or_else(|| anyhow!("mapping row {} is missing `ipa`", i + 1))?;
                let pron = record
                    .get("pron")
                    .ok_or_else(|| anyhow!("mapping row {} is missing `pron`", i + 1))?;
                builder.insert(ipa, pron, record.get("nucleus") == Some("true"));
            }
        }
        DocumentFormat::Json => {
            for entry in json::parse_mapping(content)? {
                builder.insert(&entry.ipa, &entry.pron, entry.nucleus);
            }
        }
        DocumentFormat::Snapshot => bail!("snapshots are binary, use `read_mapping`"),
    }
    Ok(builder.build())
}

pub fn read_mapping(path: &Path) -> Result<MappingTable> {
    let format = DocumentFormat::from_path(path);
    let table = match format {
        DocumentFormat::Snapshot => load_table(path)?,
        _ => {
            let content =
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            parse_mapping(&content, format)
                .with_context(|| format!("parsing mapping {}", path.display()))?
        }
    };
    info!(path = %path.display(), symbols = table.len(), "mapping loaded");
    Ok(table)
}

pub fn read_lexicon(path: &Path) -> Result<Lexicon> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let lexicon = Lexicon::parse(&content, DocumentFormat::from_path(path))
        .with_context(|| format!("parsing lexicon {}", path.display()))?;
    info!(path = %path.display(), entries = lexicon.len(), "lexicon loaded");
    Ok(lexicon)
}

/// Writes the lexicon in the format it was read in.
pub fn write_lexicon(lexicon: &Lexicon, path: &Path) -> Result<()> {
    write_atomically(path, |writer| lexicon.write_to(writer))?;
    info!(
        path = %path.display(),
        entries = lexicon.len(),
        format = ?lexicon.format(),
        "lexicon written"
    );
    Ok(())
}
