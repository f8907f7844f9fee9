use std::io::{Cursor, Write};
use indexmap::IndexMap;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Pack named files into an in-memory deflated ZIP
///
/// Entries are written in first-seen order of their names. A repeated name
/// replaces the earlier content, so the last write wins.
pub fn build_zip<I>(entries: I) -> zip::result::ZipResult<Vec<u8>>
where
    I: IntoIterator<Item = (String, Vec<u8>)>,
{
    let mut unique: IndexMap<String, Vec<u8>> = IndexMap::new();
    for (name, bytes) in entries {
        if unique.insert(name.clone(), bytes).is_some() {
            tracing::warn!("Archive entry {} written more than once, keeping the last", name);
        }
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, bytes) in &unique {
        writer.start_file(name.as_str(), options)?;
        writer.write_all(bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}
