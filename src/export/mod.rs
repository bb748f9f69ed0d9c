use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::models::ListingRecord;

/// Fixed CSV column order; one header row is always emitted.
const HEADER: [&str; 7] = ["Title", "Price", "Address", "Rooms", "Floor", "Size", "URL"];

/// Write `records` to a CSV file at `path`, overwriting any previous file.
///
/// Parent directories are created as needed. Zero records still produces a
/// valid file containing only the header row.
pub async fn write_csv(records: &[ListingRecord], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(HEADER)
        .context("Failed to write CSV header")?;
    for record in records {
        writer
            .write_record([
                record.title.as_str(),
                record.price.as_str(),
                record.address.as_str(),
                record.rooms.as_str(),
                record.floor.as_str(),
                record.size.as_str(),
                record.url.as_str(),
            ])
            .context("Failed to write CSV row")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV buffer: {}", e))?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_records_still_writes_header_and_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join("listings.csv");

        write_csv(&[], &path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), "Title,Price,Address,Rooms,Floor,Size,URL");
    }

    #[tokio::test]
    async fn writes_one_row_per_record_in_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.csv");

        let record = ListingRecord {
            title: "דירה בתל אביב".to_string(),
            price: "3,100,000 ₪".to_string(),
            address: "רחוב הרצל 10".to_string(),
            rooms: "4 חדרים".to_string(),
            floor: "קומה 2".to_string(),
            size: "80 מ\"ר".to_string(),
            url: "https://www.yad2.co.il/item/abc123".to_string(),
        };
        write_csv(&[record.clone(), record], &path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("דירה בתל אביב,"));
        assert!(lines[1].ends_with("https://www.yad2.co.il/item/abc123"));
    }

    #[tokio::test]
    async fn overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.csv");

        let mut record = ListingRecord::default();
        record.title = "first".to_string();
        write_csv(&[record], &path).await.unwrap();

        write_csv(&[], &path).await.unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("first"));
    }

    #[tokio::test]
    async fn fields_with_commas_are_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.csv");

        let mut record = ListingRecord::default();
        record.price = "3,100,000".to_string();
        write_csv(&[record], &path).await.unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "3,100,000");
    }
}
