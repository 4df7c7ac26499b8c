// File: src/persistence.rs
use crate::core::table::MappingTable;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Writes `path` through a temp file in the same directory and renames it into place,
/// so a failed run never leaves a truncated file behind.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>,
{
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)
        .with_context(|| format!("creating directory {}", parent_dir.display()))?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }

    temp_file
        .persist(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Saves a built mapping table so later runs can skip parsing the mapping document.
pub fn save_table(table: &MappingTable, path: &Path) -> Result<()> {
    write_atomically(path, |writer| {
        bincode::serialize_into(writer, table).context("encoding mapping table")
    })?;
    info!(path = %path.display(), symbols = table.len(), "mapping table saved");
    Ok(())
}

pub fn load_table(path: &Path) -> Result<MappingTable> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let table: MappingTable = bincode::deserialize_from(reader)
        .with_context(|| format!("decoding mapping table {}", path.display()))?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::converter::convert;
    use crate::core::table::TableBuilder;
    use crate::core::types::MappingEntry;

    #[test]
    fn test_save_and_load_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("table.bin");

        let mut builder = TableBuilder::new();
        builder.insert("a", "AA", true);
        builder.insert("aɪ", "AY", true);
        builder.insert("t", "T", false);
        let table = builder.build();

        save_table(&table, &path).unwrap();
        let loaded = load_table(&path).unwrap();

        assert_eq!(loaded.len(), 3);
        let order: Vec<&str> = loaded.symbols_by_length().collect();
        assert_eq!(order, vec!["aɪ", "a", "t"]);
        assert_eq!(loaded.longest_match("aɪt").map(|(e, _)| e.pron.as_str()), Some("AY"));
    }

    #[test]
    fn test_load_rebuilds_lookup_from_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.bin");

        // Entries as another writer might have left them: a duplicate, an empty symbol,
        // and a decomposed one.
        let entries = vec![
            MappingEntry::new("a", "A", false),
            MappingEntry::new("", "E", false),
            MappingEntry::new("a", "AA", true),
            MappingEntry::new("e\u{301}", "EY", true),
        ];
        fs::write(&path, bincode::serialize(&entries).unwrap()).unwrap();

        let loaded = load_table(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(convert("a", &loaded), "AA1");
        assert_eq!(convert("\u{e9}", &loaded), "EY1");
        assert_eq!(convert("xa", &loaded), "AA1");
    }

    #[test]
    fn test_load_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.bin");
        fs::write(&path, b"\xff\xff\xff\xff\xff\xff\xff\xff\xff").unwrap();
        assert!(load_table(&path).is_err());
    }

    #[test]
    fn test_failed_write_keeps_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old").unwrap();

        let result = write_atomically(&path, |writer| {
            writer.write_all(b"partial")?;
            anyhow::bail!("boom")
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
    }
}
