//! Tab-separated summary of an evaluation run.

use std::io::Write;
use std::path::Path;

use super::config::FailureMarker;
use super::error::Error;
use super::record::EvaluationRecord;

pub const HEADER: [&str; 4] = ["ID", "delta_G", "Kd", "mutations (AA)"];
/// Written in place of energies for rows whose docking failed.
pub const SENTINEL: &str = "NA";

/// Serializes records under the fixed header, in the order given.
pub fn write<W: Write>(
    writer: W,
    records: &[EvaluationRecord],
    marker: FailureMarker,
) -> Result<(), csv::Error> {
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);
    tsv.write_record(HEADER)?;
    for record in records {
        let (delta_g, kd) = match (record.is_failed(), marker) {
            (true, FailureMarker::Sentinel) => (SENTINEL.to_string(), SENTINEL.to_string()),
            _ => (record.mean_delta_g.to_string(), record.mean_kd.to_string()),
        };
        tsv.write_record([
            record.id.as_str(),
            delta_g.as_str(),
            kd.as_str(),
            record.mutation_count.to_string().as_str(),
        ])?;
    }
    tsv.flush()?;
    Ok(())
}

pub fn to_string(records: &[EvaluationRecord], marker: FailureMarker) -> Result<String, Error> {
    let mut buf = Vec::new();
    write(&mut buf, records, marker)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes the summary to `path` via a temporary file in the same
/// directory, so readers never observe a partial file.
pub fn write_file(
    path: &Path,
    records: &[EvaluationRecord],
    marker: FailureMarker,
) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::fs(dir, e))?;
    write(&mut tmp, records, marker)?;
    tmp.persist(path).map_err(|e| Error::fs(path, e.error))?;
    log::info!("wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::record::RecordStatus;

    fn records() -> Vec<EvaluationRecord> {
        vec![
            EvaluationRecord {
                id: "batch_0/src".into(),
                mean_delta_g: -7.5,
                mean_kd: 0.25,
                mutation_count: 0,
                status: RecordStatus::Docked,
            },
            EvaluationRecord {
                id: "batch_0/0".into(),
                mean_delta_g: 0.0,
                mean_kd: 1.0,
                mutation_count: 3,
                status: RecordStatus::DockingFailed,
            },
        ]
    }

    #[test]
    fn sentinel_marks_failed_rows() {
        let text = to_string(&records(), FailureMarker::Sentinel).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID\tdelta_G\tKd\tmutations (AA)");
        assert_eq!(lines[1], "batch_0/src\t-7.5\t0.25\t0");
        assert_eq!(lines[2], "batch_0/0\tNA\tNA\t3");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn zero_marker_writes_placeholder_values() {
        let text = to_string(&records(), FailureMarker::Zero).unwrap();
        assert_eq!(text.lines().nth(2), Some("batch_0/0\t0\t1\t3"));
    }

    #[test]
    fn empty_run_still_has_header() {
        let text = to_string(&[], FailureMarker::Sentinel).unwrap();
        assert_eq!(text, "ID\tdelta_G\tKd\tmutations (AA)\n");
    }

    #[test]
    fn file_is_replaced_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.tsv");
        std::fs::write(&path, "stale contents that are longer than the new file\n".repeat(20))
            .unwrap();
        write_file(&path, &records(), FailureMarker::Sentinel).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("ID\t"));
        assert!(!text.contains("stale"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
