use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::model::FlatRecord;

/// Write flat records to a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – one record per line; lines may differ in length
/// * `.json` – `[["label", "v1", ...], ...]`
pub fn write_records(path: &Path, records: &[FlatRecord]) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => write_csv(path, records),
        "json" => write_json(path, records),
        other => bail!("Unsupported export extension: .{other}"),
    }?;

    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

fn write_csv(path: &Path, records: &[FlatRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("creating CSV file")?;
    for (i, record) in records.iter().enumerate() {
        writer
            .write_record(record.fields())
            .with_context(|| format!("writing CSV record {i}"))?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_json(path: &Path, records: &[FlatRecord]) -> Result<()> {
    let file = std::fs::File::create(path).context("creating JSON file")?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records).context("writing JSON records")?;
    writer.flush().context("flushing JSON file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn records() -> Vec<FlatRecord> {
        vec![
            FlatRecord::new("s defocus (um)".into(), ["-25.0".to_string(), "25.0".to_string()]),
            FlatRecord::new("s % MTF avg at 10.0 lp/mm".into(), ["50.0".to_string()]),
        ]
    }

    #[test]
    fn csv_rows_may_be_ragged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_records(&path, &records()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["s defocus (um),-25.0,25.0", "s % MTF avg at 10.0 lp/mm,50.0"]);
    }

    #[test]
    fn json_is_array_of_arrays() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.JSON");
        write_records(&path, &records()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Vec<String>> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[1], vec!["s % MTF avg at 10.0 lp/mm", "50.0"]);
    }

    #[test]
    fn unknown_extension() {
        let dir = TempDir::new().unwrap();
        assert!(write_records(&dir.path().join("out.xlsx"), &records()).is_err());
    }
}
