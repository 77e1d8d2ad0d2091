//! Output persistence: the GeoJSON document and run statistics.
//!
//! Supports pretty GeoJSON files, JSON logging of stats, and CSV append.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::stats::ConversionStats;
use crate::transform::types::FeatureCollection;
use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the collection as two-space indented UTF-8 JSON and returns the
/// size of the written file in bytes.
///
/// Non-ASCII text is written as-is, not escaped.
pub fn write_geojson(path: &str, collection: &FeatureCollection) -> Result<u64> {
    let file = File::create(path).with_context(|| format!("failed to create '{path}'"))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, collection)?;
    writer.flush()?;
    drop(writer);

    let size = std::fs::metadata(path)?.len();
    debug!(path, size, "GeoJSON written");
    Ok(size)
}

/// Logs conversion statistics as pretty-printed JSON.
pub fn print_json(stats: &ConversionStats) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}

/// Appends a [`ConversionStats`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, stats: &ConversionStats) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(stats)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::feature::build_feature;
    use crate::transform::site::NormalizedSite;
    use serde_json::{Map, Value};
    use std::fs;

    fn collection_with_town(town: &str) -> FeatureCollection {
        let mut properties = Map::new();
        properties.insert("town".into(), Value::String(town.into()));
        properties.insert("score".into(), Value::from(22.0));
        FeatureCollection::new(vec![build_feature(NormalizedSite {
            latitude: 47.07,
            longitude: 15.44,
            score: 22.0,
            properties,
        })])
    }

    #[test]
    fn test_write_geojson_pretty_and_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.geojson");
        let path = path.to_str().unwrap();

        let size = write_geojson(path, &collection_with_town("Sankt Pölten")).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(size, content.len() as u64);
        assert!(content.contains("\"town\": \"Sankt Pölten\""));
        assert!(content.starts_with("{\n  \"type\": \"FeatureCollection\",\n  \"features\": ["));
    }

    #[test]
    fn test_write_geojson_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.geojson");
        let path = path.to_str().unwrap();

        write_geojson(path, &FeatureCollection::new(Vec::new())).unwrap();

        let parsed: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed, serde_json::json!({"type": "FeatureCollection", "features": []}));
    }

    #[test]
    fn test_write_geojson_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("out.geojson");
        assert!(write_geojson(path.to_str().unwrap(), &FeatureCollection::new(Vec::new())).is_err());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let stats = ConversionStats::default();
        print_json(&stats).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        let path = path.to_str().unwrap();

        let stats = ConversionStats::default().with_source("feed.xml");
        append_record(path, &stats).unwrap();
        append_record(path, &stats).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);
        // 1 header + 2 data rows
        assert_eq!(content.lines().count(), 3);
    }
}
