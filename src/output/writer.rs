use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Save a report to `path` as pretty JSON.
///
/// The previous file, if any, is only replaced once the new one is complete.
pub fn save_report<T: Serialize>(path: &Path, report: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize report")?;
    file.write_all(b"\n")
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    file.commit()
        .with_context(|| format!("Failed to save report to {}", path.display()))?;

    tracing::debug!(path = %path.display(), "report saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_save_report_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("plan.json");

        save_report(&path, &json!({ "combinedScore": 0.9 })).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["combinedScore"], 0.9);
    }

    #[test]
    fn test_save_report_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, "stale").unwrap();

        save_report(&path, &json!([1, 2, 3])).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }
}
